//! Option groups.

use indexmap::IndexMap;

use crate::error::DefinitionError;

#[derive(Debug, Clone)]
pub(crate) struct OptionGroup {
    name: String,
    exclusive: bool,
    required: bool,
}

impl OptionGroup {
    fn new(name: &str, exclusive: bool) -> Self {
        Self {
            name: name.to_string(),
            exclusive,
            required: false,
        }
    }

    /// Name as first declared.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub(crate) fn is_required(&self) -> bool {
        self.required
    }

    /// A group may be declared in several places; it is required as soon as
    /// one of them says so.
    pub(crate) fn set_required(&mut self, required: bool) {
        if !self.required {
            self.required = required;
        }
    }
}

/// Groups keyed by lower-cased name, in declaration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Groups {
    groups: IndexMap<String, OptionGroup>,
}

impl Groups {
    /// Find or create the group `name`, returning its index.
    pub(crate) fn declare(&mut self, name: &str, exclusive: bool) -> Result<usize, DefinitionError> {
        let key = name.to_lowercase();
        if let Some((index, _, group)) = self.groups.get_full(&key) {
            if group.is_exclusive() != exclusive {
                return Err(DefinitionError::MixingGroupTypes(name.to_string()));
            }
            return Ok(index);
        }
        let (index, _) = self
            .groups
            .insert_full(key, OptionGroup::new(name, exclusive));
        Ok(index)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&OptionGroup> {
        self.groups.get_index(index).map(|(_, g)| g)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut OptionGroup> {
        self.groups.get_index_mut(index).map(|(_, g)| g)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &OptionGroup)> {
        self.groups.values().enumerate()
    }
}
