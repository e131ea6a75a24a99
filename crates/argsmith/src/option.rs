//! Option and positional argument definitions.

use std::fmt;

use crate::value::{ConversionError, Slot, Value};

pub(crate) const DEFAULT_FLAG_VALUE: &str = "1";

/// Hook that runs before a value reaches its destination.
///
/// Return the string to store the normal way (possibly rewritten), or `None`
/// after writing `target` directly. A `None` still counts as an assignment.
pub trait AssignAction {
    fn assign(&self, target: &mut dyn Value, raw: &str) -> Option<String>;
}

impl<F> AssignAction for F
where
    F: Fn(&mut dyn Value, &str) -> Option<String>,
{
    fn assign(&self, target: &mut dyn Value, raw: &str) -> Option<String> {
        self(target, raw)
    }
}

#[derive(Debug)]
pub(crate) enum AssignError {
    InvalidChoice,
    Conversion(ConversionError),
}

/// One named option or positional argument.
pub(crate) struct OptionDef {
    slot: usize,
    short_name: String,
    long_name: String,
    metavar: String,
    help: String,
    flag_value: String,
    choices: Vec<String>,
    action: Option<Box<dyn AssignAction>>,
    group: Option<usize>,
    min_args: usize,
    /// `None` means unbounded.
    max_args: Option<usize>,
    required: bool,
    arity_set: bool,
    positional: bool,
}

impl OptionDef {
    pub(crate) fn option(slot: usize) -> Self {
        Self {
            slot,
            short_name: String::new(),
            long_name: String::new(),
            metavar: String::new(),
            help: String::new(),
            flag_value: DEFAULT_FLAG_VALUE.to_string(),
            choices: Vec::new(),
            action: None,
            group: None,
            min_args: 0,
            max_args: Some(0),
            required: false,
            arity_set: false,
            positional: false,
        }
    }

    /// A positional takes one argument, or any number when its slot collects
    /// a vector.
    pub(crate) fn positional(slot: usize, name: &str, is_vector: bool) -> Self {
        let mut def = Self::option(slot);
        def.long_name = name.to_string();
        def.positional = true;
        if is_vector {
            def.set_min_args(0);
        } else {
            def.set_nargs(1);
        }
        def
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }

    /// Long name if present, short name otherwise.
    pub(crate) fn name(&self) -> &str {
        if self.long_name.is_empty() {
            &self.short_name
        } else {
            &self.long_name
        }
    }

    pub(crate) fn short_name(&self) -> &str {
        &self.short_name
    }

    pub(crate) fn long_name(&self) -> &str {
        &self.long_name
    }

    pub(crate) fn has_name(&self, name: &str) -> bool {
        (!self.short_name.is_empty() && self.short_name == name)
            || (!self.long_name.is_empty() && self.long_name == name)
    }

    pub(crate) fn set_short_name(&mut self, name: &str) {
        self.short_name = name.to_string();
    }

    pub(crate) fn set_long_name(&mut self, name: &str) {
        self.long_name = name.to_string();
    }

    pub(crate) fn metavar(&self) -> String {
        if !self.metavar.is_empty() {
            return self.metavar.clone();
        }
        if self.positional {
            return self.name().to_string();
        }
        self.name().trim_start_matches('-').to_uppercase()
    }

    pub(crate) fn set_metavar(&mut self, metavar: &str) {
        self.metavar = metavar.to_string();
    }

    pub(crate) fn help(&self) -> &str {
        &self.help
    }

    pub(crate) fn set_help(&mut self, help: &str) {
        self.help = help.to_string();
    }

    pub(crate) fn flag_value(&self) -> &str {
        &self.flag_value
    }

    pub(crate) fn set_flag_value(&mut self, value: &str) {
        self.flag_value = value.to_string();
    }

    pub(crate) fn set_choices(&mut self, choices: Vec<String>) {
        self.choices = choices;
    }

    pub(crate) fn set_action(&mut self, action: Box<dyn AssignAction>) {
        self.action = Some(action);
    }

    pub(crate) fn group(&self) -> Option<usize> {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: usize) {
        self.group = Some(group);
    }

    pub(crate) fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub(crate) fn arity_set(&self) -> bool {
        self.arity_set
    }

    pub(crate) fn mark_arity_set(&mut self) {
        self.arity_set = true;
    }

    pub(crate) fn set_nargs(&mut self, count: usize) {
        self.min_args = count;
        self.max_args = Some(count);
    }

    pub(crate) fn set_min_args(&mut self, count: usize) {
        self.min_args = count;
        self.max_args = None;
    }

    pub(crate) fn set_max_args(&mut self, count: usize) {
        self.min_args = 0;
        self.max_args = Some(count);
    }

    pub(crate) fn argument_counts(&self) -> (usize, Option<usize>) {
        (self.min_args, self.max_args)
    }

    /// Distinguishes value-taking options from pure flags.
    pub(crate) fn accepts_any_arguments(&self) -> bool {
        self.min_args > 0 || self.max_args != Some(0)
    }

    pub(crate) fn will_accept_argument(&self, slot: &Slot) -> bool {
        match self.max_args {
            None => true,
            Some(max) => slot.option_assign_count() < max,
        }
    }

    pub(crate) fn needs_more_arguments(&self, slot: &Slot) -> bool {
        slot.option_assign_count() < self.min_args
    }

    /// True when any option sharing the slot received a value.
    pub(crate) fn was_assigned(&self, slot: &Slot) -> bool {
        slot.assign_count() > 0
    }

    pub(crate) fn was_assigned_through_this_option(&self, slot: &Slot) -> bool {
        slot.option_assign_count() > 0
    }

    pub(crate) fn set_value(&self, slot: &mut Slot, raw: &str) -> Result<(), AssignError> {
        if !self.choices.is_empty() && !self.choices.iter().any(|c| c == raw) {
            slot.mark_bad_argument();
            return Err(AssignError::InvalidChoice);
        }

        let value = match &self.action {
            Some(action) => match action.assign(slot.value_mut(), raw) {
                Some(value) => value,
                None => {
                    slot.mark_assigned();
                    return Ok(());
                }
            },
            None => raw.to_string(),
        };

        slot.set_value(&value).map_err(|err| {
            slot.mark_bad_argument();
            AssignError::Conversion(err)
        })
    }
}

impl fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("slot", &self.slot)
            .field("short_name", &self.short_name)
            .field("long_name", &self.long_name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("required", &self.required)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Single, Void};

    fn flag() -> (OptionDef, Slot) {
        let mut def = OptionDef::option(0);
        def.set_short_name("-v");
        (def, Slot::new(Box::new(Void)))
    }

    #[test]
    fn metavar_strips_dashes_for_options() {
        let mut def = OptionDef::option(0);
        def.set_long_name("--bees");
        assert_eq!(def.metavar(), "BEES");

        def.set_metavar("WORK");
        assert_eq!(def.metavar(), "WORK");

        let positional = OptionDef::positional(0, "input", false);
        assert_eq!(positional.metavar(), "input");
    }

    #[test]
    fn pure_flag_accepts_no_arguments() {
        let (def, slot) = flag();
        assert!(!def.accepts_any_arguments());
        assert!(!def.will_accept_argument(&slot));
        assert!(!def.needs_more_arguments(&slot));
    }

    #[test]
    fn bounded_arity_tracks_occurrence_counter() {
        let mut def = OptionDef::option(0);
        def.set_long_name("--pair");
        def.set_nargs(2);
        let mut slot = Slot::new(Box::new(Void));

        assert!(def.needs_more_arguments(&slot));
        def.set_value(&mut slot, "a").unwrap();
        assert!(def.will_accept_argument(&slot));
        def.set_value(&mut slot, "b").unwrap();
        assert!(!def.will_accept_argument(&slot));
        assert!(!def.needs_more_arguments(&slot));
    }

    #[test]
    fn rejected_choice_still_consumes_argument() {
        let mut def = OptionDef::option(0);
        def.set_long_name("--format");
        def.set_nargs(1);
        def.set_choices(vec!["plain".to_string(), "json".to_string()]);
        let mut slot = Slot::new(Box::new(Single::<String>::new()));

        let err = def.set_value(&mut slot, "xml").unwrap_err();
        assert!(matches!(err, AssignError::InvalidChoice));
        assert!(!def.was_assigned(&slot));
        assert!(def.was_assigned_through_this_option(&slot));
        assert!(!def.will_accept_argument(&slot));
    }

    #[test]
    fn action_can_rewrite_or_store_itself() {
        let mut def = OptionDef::option(0);
        def.set_long_name("--name");
        def.set_min_args(0);
        def.set_action(Box::new(|target: &mut dyn Value, raw: &str| {
            if let Some(name) = raw.strip_prefix("raw:") {
                match target.assign(name) {
                    Ok(()) => None,
                    Err(_) => Some(name.to_string()),
                }
            } else {
                Some(raw.to_uppercase())
            }
        }));
        let mut slot = Slot::new(Box::new(Single::<String>::new()));

        def.set_value(&mut slot, "raw:abc").unwrap();
        assert!(def.was_assigned(&slot));
        assert_eq!(slot.option_assign_count(), 1);
        let any: &dyn std::any::Any = slot.value();
        let stored = any.downcast_ref::<Single<String>>().unwrap();
        assert_eq!(stored.get().map(String::as_str), Some("abc"));

        def.set_value(&mut slot, "abc").unwrap();
        assert_eq!(slot.assign_count(), 2);
    }
}
