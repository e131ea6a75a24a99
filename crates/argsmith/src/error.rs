//! Error types.
//!
//! [`DefinitionError`] covers programmer mistakes while declaring arguments.
//! [`Error`] is what `ArgumentParser::parse_args` returns when parsing cannot
//! produce a [`ParseResult`](crate::ParseResult).

use thiserror::Error;

use crate::result::ErrorKind;

/// An argument declaration is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// No usable name was given.
    #[error("an argument must have a name")]
    MissingName,
    /// A name contains whitespace.
    #[error("argument names must not contain spaces: '{0}'")]
    NameWithSpaces(String),
    /// Dashed and dash-free names were mixed in one declaration.
    #[error("the argument must be either positional or an option: {}", .0.join(", "))]
    MixedNames(Vec<String>),
    /// A short name has more than one character after the dash.
    #[error("short option name has too many characters: '{0}'")]
    ShortNameTooLong(String),
    /// A short name is not of the form `-x`.
    #[error("short option name must look like '-x': '{0}'")]
    InvalidShortName(String),
    /// A long name does not start with `--`.
    #[error("long option name must start with '--': '{0}'")]
    InvalidLongName(String),
    /// A rename would take a name that another option already uses.
    #[error("option name '{0}' is already in use")]
    NameInUse(String),
    /// More than one of `nargs`, `minargs` and `maxargs` was applied.
    #[error("only one of nargs, minargs and maxargs can be used for '{0}'")]
    ArityAlreadySet(String),
    /// A group name was reused with the other exclusivity.
    #[error("mixing group types in group '{0}'")]
    MixingGroupTypes(String),
    /// A required option was placed in an exclusive group.
    #[error("option '{option}' is required in exclusive group '{group}'")]
    RequiredExclusiveOption { group: String, option: String },
    /// A help trigger must be a dashed option name.
    #[error("a help argument must be an option: '{0}'")]
    HelpNotAnOption(String),
    /// `describe_argument` was asked about a name nobody declared.
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
}

/// Parsing did not produce a result.
#[derive(Debug, Error)]
pub enum Error {
    /// The parser definition is invalid.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    /// Parsing was terminated by `arg` (help requested) under the error exit mode.
    #[error("parsing terminated by '{arg}': {kind}")]
    Terminated { arg: String, kind: ErrorKind },
    /// Writing the help text failed.
    #[error("failed to write help output: {0}")]
    Io(#[from] std::io::Error),
}
