//! The public parser: declarations, parsing and exit handling.

use std::io::{self, Write};

use crate::config::{ExitMode, ParserConfig};
use crate::describe::{self, ArgumentDescription};
use crate::error::{DefinitionError, Error};
use crate::help;
use crate::parser::Tokenizer;
use crate::registry::{GroupConfig, OptionConfig, Registry};
use crate::result::{ErrorKind, ParseResult};
use crate::validate;
use crate::value::{SlotId, Value};

/// A bundle of declarations that can be added to a parser in one go.
pub trait Arguments {
    fn add_arguments(&self, parser: &mut ArgumentParser) -> Result<(), DefinitionError>;
}

/// Result of the parsing core, before the exit policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Parsed(ParseResult),
    /// A help trigger was found; carries the token that triggered it.
    HelpRequested(String),
}

#[derive(Debug, Default)]
pub struct ArgumentParser {
    config: ParserConfig,
    registry: Registry,
}

impl ArgumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            registry: Registry::default(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ParserConfig) {
        self.config = config;
    }

    /// Add an option (dashed names) or a positional (one dash-free name)
    /// storing into `value`.
    pub fn add_option<V: Value>(
        &mut self,
        value: V,
        names: &[&str],
    ) -> Result<OptionConfig<'_, V>, DefinitionError> {
        let (option, slot) = self.registry.add(value, names)?;
        Ok(OptionConfig::new(&mut self.registry, option, slot))
    }

    /// Add another option that stores into an existing slot.
    pub fn add_alias<V: Value>(
        &mut self,
        slot: SlotId<V>,
        names: &[&str],
    ) -> Result<OptionConfig<'_, V>, DefinitionError> {
        let option = self.registry.add_alias(slot, names)?;
        Ok(OptionConfig::new(&mut self.registry, option, slot))
    }

    /// Declare the options that print help. Without this, `--help` and `-h`
    /// are installed on the first parse.
    pub fn add_help_option(&mut self, names: &[&str]) -> Result<(), DefinitionError> {
        self.registry.add_help_option(names).map(|_| ())
    }

    /// Start (or reopen) an inclusive group. Options added until
    /// [`end_group`](Self::end_group) belong to it.
    pub fn add_group(&mut self, name: &str) -> Result<GroupConfig<'_>, DefinitionError> {
        let group = self.registry.declare_group(name, false)?;
        Ok(GroupConfig::new(&mut self.registry, group))
    }

    /// Start (or reopen) a group of which at most one option may be used.
    pub fn add_exclusive_group(&mut self, name: &str) -> Result<GroupConfig<'_>, DefinitionError> {
        let group = self.registry.declare_group(name, true)?;
        Ok(GroupConfig::new(&mut self.registry, group))
    }

    pub fn end_group(&mut self) {
        self.registry.end_group();
    }

    pub fn add_arguments<A: Arguments + ?Sized>(&mut self, args: &A) -> Result<(), DefinitionError> {
        args.add_arguments(self)
    }

    /// The value stored in `slot` by the last parse.
    ///
    /// # Panics
    ///
    /// Panics if `slot` was issued by a different parser. Such a handle may
    /// point past this parser's slots, or at a slot holding another type.
    /// Use [`try_get`](Self::try_get) when the handle's origin is unknown.
    pub fn get<V: Value>(&self, slot: SlotId<V>) -> &V {
        match self.registry.try_get(slot) {
            Some(value) => value,
            None => panic!("slot {} was not issued by this parser", slot.index()),
        }
    }

    /// Like [`get`](Self::get), but `None` for a handle from another parser.
    pub fn try_get<V: Value>(&self, slot: SlotId<V>) -> Option<&V> {
        self.registry.try_get(slot)
    }

    /// Whether any option bound to `slot` received a value in the last parse.
    /// False for a handle from another parser.
    pub fn was_assigned<V>(&self, slot: SlotId<V>) -> bool {
        self.registry
            .slot(slot.index())
            .is_some_and(|slot| slot.assign_count() > 0)
    }

    /// Whether an argument for `slot` was rejected in the last parse.
    /// False for a handle from another parser.
    pub fn has_errors<V>(&self, slot: SlotId<V>) -> bool {
        self.registry
            .slot(slot.index())
            .is_some_and(|slot| slot.has_errors())
    }

    pub fn describe_argument(&self, name: &str) -> Result<ArgumentDescription, DefinitionError> {
        let option = if name.starts_with('-') {
            self.registry.find_option(name)
        } else {
            self.registry.find_positional(name)
        };
        let option = option.ok_or_else(|| DefinitionError::UnknownArgument(name.to_string()))?;
        Ok(describe::describe(
            &self.registry,
            self.registry.definition(option),
        ))
    }

    /// Options first, then positionals, each in declaration order.
    pub fn describe_arguments(&self) -> Vec<ArgumentDescription> {
        self.registry
            .options()
            .iter()
            .chain(self.registry.positionals())
            .map(|def| describe::describe(&self.registry, def))
            .collect()
    }

    pub fn help(&self) -> String {
        help::render(&self.config, &self.describe_arguments())
    }

    /// Parse `args` without applying the exit policy.
    ///
    /// Every call starts from empty values, so one parser can be reused.
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Outcome, DefinitionError> {
        self.registry.ensure_help_option()?;
        validate::verify_definitions(&self.registry)?;
        self.registry.reset();

        if let Some(arg) = args
            .iter()
            .map(|a| a.as_ref())
            .find(|a| self.registry.is_help_name(a))
        {
            tracing::debug!(trigger = arg, "help requested");
            return Ok(Outcome::HelpRequested(arg.to_string()));
        }

        tracing::debug!(args = args.len(), "parsing arguments");
        let mut result = Tokenizer::new(&mut self.registry).run(args);
        validate::validate(&self.registry, &mut result);
        tracing::debug!(
            errors = result.errors.len(),
            free = result.free_arguments.len(),
            "parsing finished"
        );
        Ok(Outcome::Parsed(result))
    }

    /// Parse `args`, printing help to stdout when requested.
    pub fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<ParseResult, Error> {
        let mut stdout = io::stdout().lock();
        self.parse_args_to(args, &mut stdout)
    }

    /// Parse `args`, writing help to `out` when requested, then apply the
    /// configured [`ExitMode`].
    pub fn parse_args_to<S: AsRef<str>>(
        &mut self,
        args: &[S],
        out: &mut dyn Write,
    ) -> Result<ParseResult, Error> {
        match self.parse(args)? {
            Outcome::Parsed(result) => Ok(result),
            Outcome::HelpRequested(arg) => {
                out.write_all(self.help().as_bytes())?;
                out.flush()?;
                exit_parser(self.config.exit_mode(), arg, ErrorKind::HelpRequested)
            }
        }
    }
}

fn exit_parser(mode: ExitMode, arg: String, kind: ErrorKind) -> Result<ParseResult, Error> {
    match mode {
        ExitMode::Terminate => std::process::exit(0),
        ExitMode::Error => Err(Error::Terminated { arg, kind }),
        ExitMode::Return => Ok(ParseResult::terminated(&arg, kind)),
    }
}
