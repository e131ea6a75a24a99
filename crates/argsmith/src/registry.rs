//! Argument declarations: options, positionals, groups and the slot table.

use std::any::Any;
use std::collections::HashMap;

use crate::error::DefinitionError;
use crate::group::{Groups, OptionGroup};
use crate::option::{AssignAction, AssignError, OptionDef};
use crate::value::{Slot, SlotId, Value, Void};

pub(crate) const DEFAULT_HELP_NAMES: [&str; 2] = ["--help", "-h"];
const HELP_TEXT: &str = "Print this help message and exit.";

/// Reference to a definition in one of the two lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionRef {
    Named(usize),
    Positional(usize),
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    options: Vec<OptionDef>,
    positionals: Vec<OptionDef>,
    slots: Vec<Slot>,
    names: HashMap<String, usize>,
    groups: Groups,
    active_group: Option<usize>,
    help_names: Vec<String>,
}

enum NameKind {
    Option,
    Positional,
}

fn classify_names(names: &[&str]) -> Result<NameKind, DefinitionError> {
    if names.is_empty() {
        return Err(DefinitionError::MissingName);
    }
    if let Some(name) = names.iter().find(|n| n.chars().any(char::is_whitespace)) {
        return Err(DefinitionError::NameWithSpaces(name.to_string()));
    }
    if names.iter().all(|n| n.starts_with('-')) {
        Ok(NameKind::Option)
    } else if names.iter().all(|n| !n.starts_with('-')) {
        Ok(NameKind::Positional)
    } else {
        Err(DefinitionError::MixedNames(
            names.iter().map(|n| n.to_string()).collect(),
        ))
    }
}

fn validate_short_name(name: &str) -> Result<(), DefinitionError> {
    if name.chars().count() > 2 {
        return Err(DefinitionError::ShortNameTooLong(name.to_string()));
    }
    Ok(())
}

impl Registry {
    pub(crate) fn add<V: Value>(
        &mut self,
        value: V,
        names: &[&str],
    ) -> Result<(OptionRef, SlotId<V>), DefinitionError> {
        let names: Vec<&str> = names.iter().copied().filter(|n| !n.is_empty()).collect();
        let kind = classify_names(&names)?;

        let slot = self.slots.len();
        let is_vector = value.is_vector();
        let option = self.push_definition(kind, slot, is_vector, &names)?;
        self.slots.push(Slot::new(Box::new(value)));
        Ok((option, SlotId::new(slot)))
    }

    pub(crate) fn add_alias<V: Value>(
        &mut self,
        slot: SlotId<V>,
        names: &[&str],
    ) -> Result<OptionRef, DefinitionError> {
        let names: Vec<&str> = names.iter().copied().filter(|n| !n.is_empty()).collect();
        let kind = classify_names(&names)?;
        let index = slot.index();
        let is_vector = self.slots.get(index).is_some_and(Slot::is_vector);
        self.push_definition(kind, index, is_vector, &names)
    }

    fn push_definition(
        &mut self,
        kind: NameKind,
        slot: usize,
        is_vector: bool,
        names: &[&str],
    ) -> Result<OptionRef, DefinitionError> {
        match kind {
            NameKind::Positional => {
                let mut def = OptionDef::positional(slot, names[0], is_vector);
                // Positionals are always filled in order, so exclusivity does
                // not apply to them.
                if let Some(group) = self.active_group {
                    if self.groups.get(group).is_some_and(|g| !g.is_exclusive()) {
                        def.set_group(group);
                    }
                }
                self.positionals.push(def);
                Ok(OptionRef::Positional(self.positionals.len() - 1))
            }
            NameKind::Option => {
                let mut def = OptionDef::option(slot);
                for &name in names {
                    if name == "-" || name == "--" {
                        continue;
                    }
                    if name.starts_with("--") {
                        def.set_long_name(name);
                    } else {
                        validate_short_name(name)?;
                        def.set_short_name(name);
                    }
                }
                if def.name().is_empty() {
                    return Err(DefinitionError::MissingName);
                }
                if let Some(group) = self.active_group {
                    def.set_group(group);
                }

                let index = self.options.len();
                for name in [def.short_name(), def.long_name()] {
                    if !name.is_empty() {
                        self.names.entry(name.to_string()).or_insert(index);
                    }
                }
                self.options.push(def);
                Ok(OptionRef::Named(index))
            }
        }
    }

    pub(crate) fn add_help_option(&mut self, names: &[&str]) -> Result<OptionRef, DefinitionError> {
        if let Some(name) = names.iter().find(|n| !n.is_empty() && !n.starts_with('-')) {
            return Err(DefinitionError::HelpNotAnOption(name.to_string()));
        }
        let (option, _) = self.add(Void, names)?;
        self.definition_mut(option).set_help(HELP_TEXT);
        self.help_names.extend(
            names
                .iter()
                .filter(|n| !n.is_empty())
                .map(|n| n.to_string()),
        );
        Ok(option)
    }

    pub(crate) fn ensure_help_option(&mut self) -> Result<(), DefinitionError> {
        if self.help_names.is_empty() {
            self.add_help_option(&DEFAULT_HELP_NAMES)?;
        }
        Ok(())
    }

    pub(crate) fn is_help_name(&self, arg: &str) -> bool {
        self.help_names.iter().any(|n| n == arg)
    }

    pub(crate) fn declare_group(&mut self, name: &str, exclusive: bool) -> Result<usize, DefinitionError> {
        let index = self.groups.declare(name, exclusive)?;
        self.active_group = Some(index);
        Ok(index)
    }

    pub(crate) fn end_group(&mut self) {
        self.active_group = None;
    }

    pub(crate) fn groups(&self) -> &Groups {
        &self.groups
    }

    pub(crate) fn group(&self, index: usize) -> Option<&OptionGroup> {
        self.groups.get(index)
    }

    pub(crate) fn options(&self) -> &[OptionDef] {
        &self.options
    }

    pub(crate) fn positionals(&self) -> &[OptionDef] {
        &self.positionals
    }

    pub(crate) fn positional_count(&self) -> usize {
        self.positionals.len()
    }

    pub(crate) fn find_option(&self, name: &str) -> Option<OptionRef> {
        self.names.get(name).map(|&i| OptionRef::Named(i))
    }

    /// Positionals are looked up by their declared name.
    pub(crate) fn find_positional(&self, name: &str) -> Option<OptionRef> {
        self.positionals
            .iter()
            .position(|p| p.has_name(name))
            .map(OptionRef::Positional)
    }

    pub(crate) fn definition(&self, option: OptionRef) -> &OptionDef {
        match option {
            OptionRef::Named(i) => &self.options[i],
            OptionRef::Positional(i) => &self.positionals[i],
        }
    }

    fn definition_mut(&mut self, option: OptionRef) -> &mut OptionDef {
        match option {
            OptionRef::Named(i) => &mut self.options[i],
            OptionRef::Positional(i) => &mut self.positionals[i],
        }
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_of(&self, option: OptionRef) -> &Slot {
        &self.slots[self.definition(option).slot()]
    }

    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    pub(crate) fn on_option_started(&mut self, option: OptionRef) {
        let slot = self.definition(option).slot();
        self.slots[slot].on_option_started();
    }

    pub(crate) fn will_accept_argument(&self, option: OptionRef) -> bool {
        self.definition(option)
            .will_accept_argument(self.slot_of(option))
    }

    pub(crate) fn needs_more_arguments(&self, option: OptionRef) -> bool {
        self.definition(option)
            .needs_more_arguments(self.slot_of(option))
    }

    pub(crate) fn was_assigned(&self, option: OptionRef) -> bool {
        self.definition(option).was_assigned(self.slot_of(option))
    }

    pub(crate) fn was_assigned_through_this_option(&self, option: OptionRef) -> bool {
        self.definition(option)
            .was_assigned_through_this_option(self.slot_of(option))
    }

    pub(crate) fn assign(&mut self, option: OptionRef, raw: &str) -> Result<(), AssignError> {
        let def = match option {
            OptionRef::Named(i) => &self.options[i],
            OptionRef::Positional(i) => &self.positionals[i],
        };
        let slot = &mut self.slots[def.slot()];
        def.set_value(slot, raw)
    }

    /// `None` when `slot` belongs to another registry: its index is out of
    /// range or names a slot of a different type.
    pub(crate) fn try_get<V: Value>(&self, slot: SlotId<V>) -> Option<&V> {
        let value: &dyn Any = self.slots.get(slot.index())?.value();
        value.downcast_ref::<V>()
    }

    #[cfg(test)]
    pub(crate) fn get<V: Value>(&self, slot: SlotId<V>) -> &V {
        self.try_get(slot).expect("slot was not issued by this registry")
    }
}

/// Configures an option after it was added.
///
/// Obtained from `ArgumentParser::add_option`; call [`OptionConfig::slot`]
/// to keep the handle of the value destination.
pub struct OptionConfig<'r, V> {
    registry: &'r mut Registry,
    option: OptionRef,
    slot: SlotId<V>,
}

impl<'r, V> OptionConfig<'r, V> {
    pub(crate) fn new(registry: &'r mut Registry, option: OptionRef, slot: SlotId<V>) -> Self {
        Self {
            registry,
            option,
            slot,
        }
    }

    fn def(&mut self) -> &mut OptionDef {
        self.registry.definition_mut(self.option)
    }

    /// Handle of the value this option writes into.
    pub fn slot(&self) -> SlotId<V> {
        self.slot
    }

    pub fn short_name(mut self, name: &str) -> Result<Self, DefinitionError> {
        if !name.starts_with('-') || name.starts_with("--") || name.len() < 2 {
            return Err(DefinitionError::InvalidShortName(name.to_string()));
        }
        validate_short_name(name)?;
        self.registry.rename(self.option, name, NameSlot::Short)?;
        Ok(self)
    }

    pub fn long_name(mut self, name: &str) -> Result<Self, DefinitionError> {
        if !name.starts_with("--") || name.len() < 3 {
            return Err(DefinitionError::InvalidLongName(name.to_string()));
        }
        self.registry.rename(self.option, name, NameSlot::Long)?;
        Ok(self)
    }

    pub fn metavar(mut self, metavar: &str) -> Self {
        self.def().set_metavar(metavar);
        self
    }

    pub fn help(mut self, help: &str) -> Self {
        self.def().set_help(help);
        self
    }

    /// Exactly `count` arguments per occurrence.
    pub fn nargs(mut self, count: usize) -> Result<Self, DefinitionError> {
        self.ensure_arity_not_set()?;
        let def = self.def();
        def.set_nargs(count);
        def.mark_arity_set();
        Ok(self)
    }

    /// At least `count` arguments, no upper bound.
    pub fn minargs(mut self, count: usize) -> Result<Self, DefinitionError> {
        self.ensure_arity_not_set()?;
        let def = self.def();
        def.set_min_args(count);
        def.mark_arity_set();
        Ok(self)
    }

    /// Up to `count` arguments.
    pub fn maxargs(mut self, count: usize) -> Result<Self, DefinitionError> {
        self.ensure_arity_not_set()?;
        let def = self.def();
        def.set_max_args(count);
        def.mark_arity_set();
        Ok(self)
    }

    /// Shorthand for `nargs(1)`.
    pub fn has_argument(self) -> Result<Self, DefinitionError> {
        self.nargs(1)
    }

    pub fn required(mut self) -> Self {
        self.def().set_required(true);
        self
    }

    /// Value stored when the option appears without an argument.
    pub fn flag_value(mut self, value: &str) -> Self {
        self.def().set_flag_value(value);
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect();
        self.def().set_choices(choices);
        self
    }

    pub fn action<A>(mut self, action: A) -> Self
    where
        A: AssignAction + 'static,
    {
        self.def().set_action(Box::new(action));
        self
    }

    fn ensure_arity_not_set(&self) -> Result<(), DefinitionError> {
        let def = self.registry.definition(self.option);
        if def.arity_set() {
            return Err(DefinitionError::ArityAlreadySet(def.name().to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum NameSlot {
    Short,
    Long,
}

impl Registry {
    /// Replace the short or long name of `option`, unbinding the old one.
    fn rename(&mut self, option: OptionRef, name: &str, which: NameSlot) -> Result<(), DefinitionError> {
        let index = match option {
            OptionRef::Named(index) => index,
            OptionRef::Positional(_) => {
                let def = self.definition_mut(option);
                match which {
                    NameSlot::Short => def.set_short_name(name),
                    NameSlot::Long => def.set_long_name(name),
                }
                return Ok(());
            }
        };
        if self.names.get(name).is_some_and(|&owner| owner != index) {
            return Err(DefinitionError::NameInUse(name.to_string()));
        }

        let def = &mut self.options[index];
        let old = match which {
            NameSlot::Short => def.short_name().to_string(),
            NameSlot::Long => def.long_name().to_string(),
        };
        match which {
            NameSlot::Short => def.set_short_name(name),
            NameSlot::Long => def.set_long_name(name),
        }
        if old != name && self.names.get(&old) == Some(&index) {
            self.names.remove(&old);
        }
        self.names.insert(name.to_string(), index);
        Ok(())
    }
}

/// Configures a group after it was declared.
pub struct GroupConfig<'r> {
    registry: &'r mut Registry,
    group: usize,
}

impl<'r> GroupConfig<'r> {
    pub(crate) fn new(registry: &'r mut Registry, group: usize) -> Self {
        Self { registry, group }
    }

    /// Require at least one option of the group.
    pub fn required(self) -> Self {
        if let Some(group) = self.registry.groups.get_mut(self.group) {
            group.set_required(true);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Multi, Single, Switch};

    #[test]
    fn rejects_bad_names() {
        let mut reg = Registry::default();
        assert_eq!(
            reg.add(Single::<String>::new(), &[]).unwrap_err(),
            DefinitionError::MissingName
        );
        assert_eq!(
            reg.add(Single::<String>::new(), &[""]).unwrap_err(),
            DefinitionError::MissingName
        );
        assert_eq!(
            reg.add(Single::<String>::new(), &["-"]).unwrap_err(),
            DefinitionError::MissingName
        );
        assert_eq!(
            reg.add(Single::<String>::new(), &["--"]).unwrap_err(),
            DefinitionError::MissingName
        );
        assert!(matches!(
            reg.add(Single::<String>::new(), &["--a b"]),
            Err(DefinitionError::NameWithSpaces(_))
        ));
        assert!(matches!(
            reg.add(Single::<String>::new(), &["-x", "file"]),
            Err(DefinitionError::MixedNames(_))
        ));
        assert!(matches!(
            reg.add(Single::<String>::new(), &["-long"]),
            Err(DefinitionError::ShortNameTooLong(_))
        ));
    }

    #[test]
    fn positional_arity_depends_on_slot_kind() {
        let mut reg = Registry::default();
        let (single, _) = reg.add(Single::<String>::new(), &["input"]).unwrap();
        let (multi, _) = reg.add(Multi::<String>::new(), &["rest"]).unwrap();
        assert_eq!(reg.definition(single).argument_counts(), (1, Some(1)));
        assert_eq!(reg.definition(multi).argument_counts(), (0, None));
    }

    #[test]
    fn positionals_skip_exclusive_groups() {
        let mut reg = Registry::default();
        reg.declare_group("mode", true).unwrap();
        let (opt, _) = reg.add(Single::<String>::new(), &["--fast"]).unwrap();
        let (pos, _) = reg.add(Single::<String>::new(), &["file"]).unwrap();
        assert!(reg.definition(opt).group().is_some());
        assert!(reg.definition(pos).group().is_none());

        reg.end_group();
        reg.declare_group("inputs", false).unwrap();
        let (pos, _) = reg.add(Single::<String>::new(), &["other"]).unwrap();
        assert!(reg.definition(pos).group().is_some());
    }

    #[test]
    fn arity_can_only_be_set_once() {
        let mut reg = Registry::default();
        let (option, slot) = reg.add(Single::<String>::new(), &["--value"]).unwrap();
        let config = OptionConfig::new(&mut reg, option, slot).nargs(1).unwrap();
        let err = config.minargs(2).err().unwrap();
        assert!(matches!(err, DefinitionError::ArityAlreadySet(name) if name == "--value"));
    }

    #[test]
    fn alias_shares_slot() {
        let mut reg = Registry::default();
        let (first, slot) = reg.add(Single::<String>::new(), &["-a"]).unwrap();
        let second = reg.add_alias(slot, &["-b"]).unwrap();
        assert_eq!(
            reg.definition(first).slot(),
            reg.definition(second).slot()
        );
        reg.on_option_started(second);
        reg.assign(second, "x").unwrap();
        assert!(reg.was_assigned(first));
    }

    #[test]
    fn renaming_unbinds_the_old_name() {
        let mut reg = Registry::default();
        let (option, slot) = reg.add(Single::<String>::new(), &["--old"]).unwrap();
        OptionConfig::new(&mut reg, option, slot)
            .long_name("--new")
            .unwrap();
        assert_eq!(reg.find_option("--new"), Some(option));
        assert_eq!(reg.find_option("--old"), None);

        let (other, other_slot) = reg.add(Switch::new(), &["-x"]).unwrap();
        let err = OptionConfig::new(&mut reg, other, other_slot)
            .long_name("--new")
            .err();
        assert_eq!(err, Some(DefinitionError::NameInUse("--new".to_string())));
        assert_eq!(reg.find_option("--new"), Some(option));
    }

    #[test]
    fn help_names_must_be_dashed() {
        let mut reg = Registry::default();
        assert!(matches!(
            reg.add_help_option(&["help"]),
            Err(DefinitionError::HelpNotAnOption(_))
        ));
        reg.ensure_help_option().unwrap();
        assert!(reg.is_help_name("--help"));
        assert!(reg.is_help_name("-h"));
    }
}
