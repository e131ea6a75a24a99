//! The token consumption state machine.
//!
//! Tokens are classified by their literal prefix:
//! - `--` switches to ignore-options mode; later tokens go to positionals or
//!   the free list, and further bare `--` tokens are dropped
//! - `--name`, `--name=value` and `-x` start a single option
//! - `-abc` starts `-a`, `-b` and `-c` in order
//! - anything else is a value for the active option, the next positional, or
//!   a free argument
//!
//! Errors are collected and scanning always runs to the end of the input.

use crate::option::AssignError;
use crate::registry::{OptionRef, Registry};
use crate::result::{ErrorKind, ParseResult};

pub(crate) struct Tokenizer<'r> {
    registry: &'r mut Registry,
    ignore_options: bool,
    /// Index of the positional currently being filled.
    position: usize,
    /// The option that receives the following value tokens.
    active: Option<OptionRef>,
    result: ParseResult,
}

impl<'r> Tokenizer<'r> {
    pub(crate) fn new(registry: &'r mut Registry) -> Self {
        Self {
            registry,
            ignore_options: false,
            position: 0,
            active: None,
            result: ParseResult::default(),
        }
    }

    pub(crate) fn run<S: AsRef<str>>(mut self, args: &[S]) -> ParseResult {
        for arg in args {
            let arg = arg.as_ref();

            if arg == "--" {
                tracing::trace!("'--' seen, options are no longer recognized");
                self.ignore_options = true;
                continue;
            }

            // The active option stays open but never receives these.
            if self.ignore_options {
                self.add_free_argument(arg);
                continue;
            }

            if arg.starts_with("--") {
                self.start_option(arg);
                continue;
            }

            match arg.strip_prefix('-') {
                Some(rest) if rest.chars().count() == 1 => self.start_option(arg),
                Some(rest) if !rest.is_empty() => {
                    tracing::trace!(cluster = arg, "expanding short option cluster");
                    for ch in rest.chars() {
                        self.start_option(&format!("-{ch}"));
                    }
                }
                // Plain values, including a lone `-`.
                _ => self.take_value(arg),
            }
        }

        self.close_option();
        self.result
    }

    fn start_option(&mut self, token: &str) {
        self.close_option();

        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };

        let Some(option) = self.registry.find_option(name) else {
            tracing::trace!(option = name, "unknown option");
            self.result.push_error(name, ErrorKind::UnknownOption);
            return;
        };

        self.registry.on_option_started(option);
        if self.registry.will_accept_argument(option) {
            self.active = Some(option);
        } else {
            let flag_value = self.registry.definition(option).flag_value().to_string();
            self.assign(option, &flag_value);
        }

        let Some(value) = inline.filter(|v| !v.is_empty()) else {
            return;
        };
        if self.registry.definition(option).accepts_any_arguments() {
            self.assign(option, value);
            if !self.registry.will_accept_argument(option) {
                self.close_option();
            }
        } else {
            self.result.push_error(name, ErrorKind::FlagParameter);
        }
    }

    fn close_option(&mut self) {
        let Some(option) = self.active.take() else {
            return;
        };

        if self.registry.needs_more_arguments(option) {
            let name = self.registry.definition(option).name().to_string();
            tracing::trace!(option = %name, "option closed without enough arguments");
            self.result.push_error(&name, ErrorKind::MissingArgument);
        } else if self.registry.will_accept_argument(option)
            && !self.registry.was_assigned_through_this_option(option)
        {
            let flag_value = self.registry.definition(option).flag_value().to_string();
            self.assign(option, &flag_value);
        }
    }

    fn take_value(&mut self, arg: &str) {
        if let Some(option) = self.active {
            if self.registry.will_accept_argument(option) {
                self.assign(option, arg);
                if !self.registry.will_accept_argument(option) {
                    self.close_option();
                }
                return;
            }
        }
        self.add_free_argument(arg);
    }

    fn add_free_argument(&mut self, arg: &str) {
        while self.position < self.registry.positional_count() {
            let positional = OptionRef::Positional(self.position);
            if self.registry.will_accept_argument(positional) {
                self.assign(positional, arg);
                return;
            }
            self.position += 1;
        }
        self.result.push_free_argument(arg);
    }

    fn assign(&mut self, option: OptionRef, raw: &str) {
        let kind = match self.registry.assign(option, raw) {
            Ok(()) => return,
            Err(AssignError::InvalidChoice) => ErrorKind::InvalidChoice,
            Err(AssignError::Conversion(err)) => {
                tracing::trace!(error = %err, "conversion failed");
                ErrorKind::ConversionError
            }
        };
        let name = self.registry.definition(option).name().to_string();
        self.result.push_error(&name, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Multi, Single, Switch};

    fn run(registry: &mut Registry, args: &[&str]) -> ParseResult {
        registry.reset();
        Tokenizer::new(registry).run(args)
    }

    #[test]
    fn lone_dash_is_a_value() {
        let mut reg = Registry::default();
        let (_, input) = reg.add(Single::<String>::new(), &["input"]).unwrap();
        let result = run(&mut reg, &["-"]);
        assert!(result.is_ok());
        assert_eq!(reg.get(input).get().map(String::as_str), Some("-"));
    }

    #[test]
    fn double_dash_keeps_values_away_from_active_option() {
        let mut reg = Registry::default();
        let (opt, out) = reg.add(Single::<String>::new(), &["--value"]).unwrap();
        crate::registry::OptionConfig::new(&mut reg, opt, out)
            .nargs(1)
            .unwrap();
        let (_, skipped) = reg.add(Switch::new(), &["--skipped"]).unwrap();

        let result = run(&mut reg, &["--value", "--", "--skipped"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].option, "--value");
        assert_eq!(result.errors[0].kind, ErrorKind::MissingArgument);
        assert_eq!(result.free_arguments, vec!["--skipped".to_string()]);
        assert_eq!(reg.get(out).get(), None);
        assert!(!reg.get(skipped).get());
    }

    #[test]
    fn double_dash_routes_to_positionals_and_closes_with_flag_value() {
        let mut reg = Registry::default();
        let (opt, a) = reg.add(Multi::<String>::new(), &["-a"]).unwrap();
        crate::registry::OptionConfig::new(&mut reg, opt, a)
            .maxargs(1)
            .unwrap();
        let (_, file) = reg.add(Single::<String>::new(), &["file"]).unwrap();

        let result = run(&mut reg, &["-a", "--", "x"]);
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(reg.get(file).get().map(String::as_str), Some("x"));
        assert_eq!(reg.get(a).values(), ["1".to_string()]);
    }

    #[test]
    fn every_bare_double_dash_is_dropped() {
        let mut reg = Registry::default();
        let result = run(&mut reg, &["--", "x", "--", "y"]);
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.free_arguments, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn cluster_closes_earlier_members_before_later_ones_start() {
        let mut reg = Registry::default();
        let (a, a_slot) = reg.add(Multi::<String>::new(), &["-a"]).unwrap();
        crate::registry::OptionConfig::new(&mut reg, a, a_slot)
            .maxargs(1)
            .unwrap();
        let (_, b_slot) = reg.add(Switch::new(), &["-b"]).unwrap();

        let result = run(&mut reg, &["-ab", "tail"]);
        assert!(result.is_ok(), "{:?}", result.errors);
        // `-a` received nothing before `-b` started, so it got its flag value.
        assert_eq!(reg.get(a_slot).values(), ["1".to_string()]);
        assert!(reg.get(b_slot).get());
        assert_eq!(result.free_arguments, vec!["tail".to_string()]);
    }

    #[test]
    fn inline_value_that_fills_option_closes_it() {
        let mut reg = Registry::default();
        let (opt, slot) = reg.add(Single::<i64>::new(), &["--count"]).unwrap();
        crate::registry::OptionConfig::new(&mut reg, opt, slot)
            .has_argument()
            .unwrap();

        let result = run(&mut reg, &["--count=3", "extra"]);
        assert!(result.is_ok());
        assert_eq!(reg.get(slot).get(), Some(&3));
        assert_eq!(result.free_arguments, vec!["extra".to_string()]);
    }

    #[test]
    fn bad_conversion_consumes_token() {
        let mut reg = Registry::default();
        let (opt, slot) = reg.add(Single::<i64>::new(), &["-a"]).unwrap();
        crate::registry::OptionConfig::new(&mut reg, opt, slot)
            .has_argument()
            .unwrap();

        let result = run(&mut reg, &["-a", "wrong", "next"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::ConversionError);
        assert_eq!(result.free_arguments, vec!["next".to_string()]);
    }
}
