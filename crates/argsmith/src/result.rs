//! Parse results and diagnostics.

use std::fmt;

use serde::Serialize;

/// Errors known by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The option is not known by the parser.
    UnknownOption,
    /// Multiple options from an exclusive group are present.
    ExclusiveOption,
    /// A required option is missing.
    MissingOption,
    /// No option from a required group is present.
    MissingOptionGroup,
    /// A required argument is missing.
    MissingArgument,
    /// The argument could not be converted.
    ConversionError,
    /// The argument is not one of the allowed choices.
    InvalidChoice,
    /// A flag was given an `=value`.
    FlagParameter,
    /// Help was requested (only reported under the return exit mode).
    HelpRequested,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::UnknownOption => "unknown option",
            Self::ExclusiveOption => "option conflicts with another option of its exclusive group",
            Self::MissingOption => "missing required option",
            Self::MissingOptionGroup => "missing an option from required group",
            Self::MissingArgument => "missing argument",
            Self::ConversionError => "invalid value",
            Self::InvalidChoice => "invalid choice",
            Self::FlagParameter => "flag does not take a value",
            Self::HelpRequested => "help requested",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One diagnostic: which option (or group) and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub option: String,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(option: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            option: option.into(),
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.option)
    }
}

/// Outcome of one parse: leftover arguments and collected diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParseResult {
    pub free_arguments: Vec<String>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// A result carrying only the signal that stopped parsing.
    pub(crate) fn terminated(arg: &str, kind: ErrorKind) -> Self {
        Self {
            free_arguments: Vec::new(),
            errors: vec![ParseError::new(arg, kind)],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub(crate) fn push_error(&mut self, option: &str, kind: ErrorKind) {
        self.errors.push(ParseError::new(option, kind));
    }

    pub(crate) fn push_free_argument(&mut self, arg: &str) {
        self.free_arguments.push(arg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_stable_kind_names() {
        let mut result = ParseResult::default();
        result.push_error("--bogus", ErrorKind::UnknownOption);
        result.push_free_argument("rest");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["free-arguments"][0], "rest");
        assert_eq!(json["errors"][0]["kind"], "UNKNOWN_OPTION");
        assert_eq!(json["errors"][0]["option"], "--bogus");
    }

    #[test]
    fn display_names_option_and_kind() {
        let err = ParseError::new("--count", ErrorKind::ConversionError);
        assert_eq!(err.to_string(), "invalid value: --count");
    }
}
