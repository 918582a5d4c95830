//! Static table from button id to shell command.

use std::collections::BTreeMap;

use crate::mapping::MappingError;

/// Read-only button → command table
///
/// Built once at startup and never mutated afterwards. Ids are unique;
/// construction fails on the first duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonMapping {
    commands: BTreeMap<u8, String>,
}

impl ButtonMapping {
    /// Builds a mapping from `(id, command)` pairs.
    ///
    /// # Errors
    ///
    /// * [`MappingError::DuplicateButton`] - an id appears twice
    /// * [`MappingError::EmptyCommand`] - a command is blank
    pub fn new<I, C>(bindings: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (u8, C)>,
        C: Into<String>,
    {
        let mut commands = BTreeMap::new();

        for (id, command) in bindings {
            let command = command.into();
            if command.trim().is_empty() {
                return Err(MappingError::EmptyCommand(id));
            }
            if commands.insert(id, command).is_some() {
                return Err(MappingError::DuplicateButton(id));
            }
        }

        Ok(Self { commands })
    }

    pub fn command(&self, id: u8) -> Option<&str> {
        self.commands.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: u8) -> bool {
        self.commands.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.commands.keys().copied()
    }

    /// Bindings in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.commands.iter().map(|(id, cmd)| (*id, cmd.as_str()))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl IntoIterator for ButtonMapping {
    type Item = (u8, String);
    type IntoIter = std::collections::btree_map::IntoIter<u8, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
