//! Value destinations and the slot table entries that wrap them.
//!
//! A [`Value`] converts raw argument strings into a typed destination. The
//! registry stores every destination as a boxed trait object inside a
//! [`Slot`], so options of different types live in one homogeneous table.
//! Callers keep a [`SlotId`] and read the typed destination back through
//! `ArgumentParser::get`.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use thiserror::Error;

/// A raw argument could not be converted into the destination type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}': {reason}")]
pub struct ConversionError {
    /// The raw argument as it appeared on the command line.
    pub value: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// A typed destination for argument values.
///
/// Implement this for custom destinations. `assign` is called once per
/// accepted argument; `reset` must restore the empty state so that the same
/// parser can be reused.
pub trait Value: Any {
    /// Convert `raw` and store it.
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError>;

    /// Restore the empty state.
    fn reset(&mut self);

    /// Whether repeated assignments accumulate instead of overwriting.
    fn is_vector(&self) -> bool {
        false
    }
}

/// Holds the last value assigned, converted with `FromStr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Single<T> {
    value: Option<T>,
}

impl<T> Single<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T> Default for Single<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Value for Single<T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError> {
        let parsed = raw.parse::<T>().map_err(|e| ConversionError::new(raw, e))?;
        self.value = Some(parsed);
        Ok(())
    }

    fn reset(&mut self) {
        self.value = None;
    }
}

/// Collects every value assigned, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Multi<T> {
    values: Vec<T>,
}

impl<T> Multi<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn values(&self) -> &[T] {
        self.values.as_slice()
    }
}

impl<T> Default for Multi<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Value for Multi<T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError> {
        let parsed = raw.parse::<T>().map_err(|e| ConversionError::new(raw, e))?;
        self.values.push(parsed);
        Ok(())
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn is_vector(&self) -> bool {
        true
    }
}

/// A boolean destination.
///
/// Accepts `1/true/yes/on` and `0/false/no/off`, ignoring case, so it works
/// with the default flag value `"1"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Switch {
    on: bool,
}

impl Switch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.on
    }
}

impl Value for Switch {
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError> {
        self.on = match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => return Err(ConversionError::new(raw, "expected a boolean")),
        };
        Ok(())
    }

    fn reset(&mut self) {
        self.on = false;
    }
}

type ConvertFn<T> = Box<dyn Fn(&str) -> Result<T, ConversionError>>;

/// Holds the last value produced by a caller-supplied conversion.
pub struct Converted<T> {
    value: Option<T>,
    convert: ConvertFn<T>,
}

impl<T> Converted<T> {
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<T, ConversionError> + 'static,
    {
        Self {
            value: None,
            convert: Box::new(convert),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T: fmt::Debug> fmt::Debug for Converted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converted")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Value for Converted<T> {
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError> {
        self.value = Some((self.convert)(raw)?);
        Ok(())
    }

    fn reset(&mut self) {
        self.value = None;
    }
}

/// Accepts anything and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Void;

impl Value for Void {
    fn assign(&mut self, _raw: &str) -> Result<(), ConversionError> {
        Ok(())
    }

    fn reset(&mut self) {}
}

/// Typed handle of a slot in a parser's slot table.
pub struct SlotId<V> {
    index: usize,
    _marker: PhantomData<fn() -> V>,
}

impl<V> SlotId<V> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.index
    }
}

impl<V> Clone for SlotId<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for SlotId<V> {}

impl<V> fmt::Debug for SlotId<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotId").field(&self.index).finish()
    }
}

/// Storage shared by every option bound to the same destination.
pub(crate) struct Slot {
    value: Box<dyn Value>,
    /// Assignments through any option sharing this slot.
    assign_count: usize,
    /// Arguments consumed by the current option occurrence.
    option_assign_count: usize,
    has_errors: bool,
}

impl Slot {
    pub(crate) fn new(value: Box<dyn Value>) -> Self {
        Self {
            value,
            assign_count: 0,
            option_assign_count: 0,
            has_errors: false,
        }
    }

    pub(crate) fn set_value(&mut self, raw: &str) -> Result<(), ConversionError> {
        match self.value.assign(raw) {
            Ok(()) => {
                self.assign_count += 1;
                self.option_assign_count += 1;
                Ok(())
            }
            Err(err) => {
                self.has_errors = true;
                Err(err)
            }
        }
    }

    /// Count a rejected argument as consumed so the flag value is not
    /// applied afterwards.
    pub(crate) fn mark_bad_argument(&mut self) {
        self.option_assign_count += 1;
        self.has_errors = true;
    }

    /// Count an argument that an assign action stored on its own.
    pub(crate) fn mark_assigned(&mut self) {
        self.assign_count += 1;
        self.option_assign_count += 1;
    }

    pub(crate) fn on_option_started(&mut self) {
        self.option_assign_count = 0;
    }

    pub(crate) fn reset(&mut self) {
        self.assign_count = 0;
        self.option_assign_count = 0;
        self.has_errors = false;
        self.value.reset();
    }

    pub(crate) fn assign_count(&self) -> usize {
        self.assign_count
    }

    pub(crate) fn option_assign_count(&self) -> usize {
        self.option_assign_count
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub(crate) fn is_vector(&self) -> bool {
        self.value.is_vector()
    }

    pub(crate) fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    pub(crate) fn value_mut(&mut self) -> &mut dyn Value {
        self.value.as_mut()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("assign_count", &self.assign_count)
            .field("option_assign_count", &self.option_assign_count)
            .field("has_errors", &self.has_errors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_counts_successful_assignments_only() {
        let mut slot = Slot::new(Box::new(Single::<i64>::new()));
        slot.set_value("12").unwrap();
        assert_eq!(slot.assign_count(), 1);
        assert_eq!(slot.option_assign_count(), 1);

        let err = slot.set_value("twelve").unwrap_err();
        assert_eq!(err.value, "twelve");
        assert_eq!(slot.assign_count(), 1);
        assert!(slot.has_errors());
    }

    #[test]
    fn option_counter_restarts_per_occurrence() {
        let mut slot = Slot::new(Box::new(Multi::<String>::new()));
        slot.set_value("a").unwrap();
        slot.set_value("b").unwrap();
        slot.on_option_started();
        assert_eq!(slot.option_assign_count(), 0);
        assert_eq!(slot.assign_count(), 2);

        slot.mark_bad_argument();
        assert_eq!(slot.option_assign_count(), 1);
        assert_eq!(slot.assign_count(), 2);
    }

    #[test]
    fn reset_restores_empty_destination() {
        let mut slot = Slot::new(Box::new(Multi::<u32>::new()));
        slot.set_value("1").unwrap();
        slot.set_value("2").unwrap();
        slot.reset();
        assert_eq!(slot.assign_count(), 0);
        assert!(!slot.has_errors());

        let any: &dyn Any = slot.value();
        let multi = any.downcast_ref::<Multi<u32>>().unwrap();
        assert!(multi.values().is_empty());
    }

    #[test]
    fn switch_accepts_common_spellings() {
        let mut switch = Switch::new();
        switch.assign("YES").unwrap();
        assert!(switch.get());
        switch.assign("off").unwrap();
        assert!(!switch.get());
        assert!(switch.assign("maybe").is_err());
    }

    #[test]
    fn converted_uses_custom_function() {
        let mut reversed = Converted::new(|raw: &str| Ok(raw.chars().rev().collect::<String>()));
        reversed.assign("value").unwrap();
        assert_eq!(reversed.get().map(String::as_str), Some("eulav"));
        reversed.reset();
        assert!(reversed.get().is_none());
    }
}
