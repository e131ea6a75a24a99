//! Checks that need the whole picture: required options, exclusive groups
//! and required groups.

use std::collections::HashSet;

use crate::error::DefinitionError;
use crate::registry::{OptionRef, Registry};
use crate::result::{ErrorKind, ParseResult};

/// A required option can not be in an exclusive group.
pub(crate) fn verify_definitions(registry: &Registry) -> Result<(), DefinitionError> {
    for option in registry.options() {
        if !option.is_required() {
            continue;
        }
        let Some(group) = option.group().and_then(|g| registry.group(g)) else {
            continue;
        };
        if group.is_exclusive() {
            return Err(DefinitionError::RequiredExclusiveOption {
                group: group.name().to_string(),
                option: option.name().to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn validate(registry: &Registry, result: &mut ParseResult) {
    report_missing_options(registry, result);
    report_exclusive_violations(registry, result);
    report_missing_groups(registry, result);
}

fn report_missing_options(registry: &Registry, result: &mut ParseResult) {
    for (i, option) in registry.options().iter().enumerate() {
        if option.is_required() && !registry.was_assigned(OptionRef::Named(i)) {
            result.push_error(option.name(), ErrorKind::MissingOption);
        }
    }
    for (i, positional) in registry.positionals().iter().enumerate() {
        if registry.needs_more_arguments(OptionRef::Positional(i)) {
            result.push_error(positional.name(), ErrorKind::MissingArgument);
        }
    }
}

fn report_exclusive_violations(registry: &Registry, result: &mut ParseResult) {
    for (group_index, group) in registry.groups().iter() {
        if !group.is_exclusive() {
            continue;
        }
        // Count distinct slots, not options: aliases share a slot and its
        // assign count, so using two names of one value is a single use.
        let mut slots = HashSet::new();
        let mut first = None;
        for (i, option) in registry.options().iter().enumerate() {
            if option.group() != Some(group_index) || !registry.was_assigned(OptionRef::Named(i)) {
                continue;
            }
            if slots.insert(option.slot()) && first.is_none() {
                first = Some(option.name());
            }
        }
        if slots.len() > 1 {
            if let Some(name) = first {
                result.push_error(name, ErrorKind::ExclusiveOption);
            }
        }
    }
}

fn report_missing_groups(registry: &Registry, result: &mut ParseResult) {
    for (group_index, group) in registry.groups().iter() {
        if !group.is_required() {
            continue;
        }
        let named = registry
            .options()
            .iter()
            .enumerate()
            .map(|(i, o)| (OptionRef::Named(i), o.group()));
        let positional = registry
            .positionals()
            .iter()
            .enumerate()
            .map(|(i, o)| (OptionRef::Positional(i), o.group()));
        let satisfied = named
            .chain(positional)
            .filter(|(_, g)| *g == Some(group_index))
            .any(|(option, _)| registry.was_assigned(option));
        if !satisfied {
            result.push_error(group.name(), ErrorKind::MissingOptionGroup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OptionConfig;
    use crate::value::{Single, Switch};

    #[test]
    fn required_option_in_exclusive_group_is_rejected() {
        let mut reg = Registry::default();
        reg.declare_group("mode", true).unwrap();
        let (option, slot) = reg.add(Switch::new(), &["--fast"]).unwrap();
        OptionConfig::new(&mut reg, option, slot).required();

        let err = verify_definitions(&reg).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::RequiredExclusiveOption {
                group: "mode".to_string(),
                option: "--fast".to_string(),
            }
        );
    }

    #[test]
    fn aliases_in_exclusive_group_do_not_conflict() {
        let mut reg = Registry::default();
        reg.declare_group("level", true).unwrap();
        let (first, slot) = reg.add(Single::<String>::new(), &["--quiet"]).unwrap();
        let second = reg.add_alias(slot, &["--silent"]).unwrap();
        reg.add(Switch::new(), &["--loud"]).unwrap();

        reg.on_option_started(first);
        reg.assign(second, "x").unwrap();

        let mut result = ParseResult::default();
        validate(&reg, &mut result);
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn empty_required_group_is_reported_by_name() {
        let mut reg = Registry::default();
        let group = reg.declare_group("Output", false).unwrap();
        crate::registry::GroupConfig::new(&mut reg, group).required();
        reg.add(Switch::new(), &["--json"]).unwrap();
        reg.add(Switch::new(), &["--text"]).unwrap();

        let mut result = ParseResult::default();
        validate(&reg, &mut result);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].option, "Output");
        assert_eq!(result.errors[0].kind, ErrorKind::MissingOptionGroup);
    }
}
