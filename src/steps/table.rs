//! Name lookup for shared steps.

use std::collections::HashMap;

use tracing::warn;

use super::candidates::NameCandidates;
use crate::model::SharedStep;

/// Shared steps keyed by name.
///
/// Built once per run and only read while expanding. Names are assumed to
/// be unique; when they are not, the last group with a given name wins.
#[derive(Debug, Clone, Default)]
pub struct SharedStepTable {
    groups: HashMap<String, SharedStep>,
}

impl SharedStepTable {
    /// Build a table from every fetched group.
    #[must_use]
    pub fn from_groups(groups: impl IntoIterator<Item = SharedStep>) -> Self {
        let mut table = Self::default();
        for group in groups {
            if let Some(previous) = table.groups.insert(group.name.clone(), group) {
                warn!(
                    name = %previous.name,
                    number = previous.number,
                    "shared step name is not unique; keeping the later definition"
                );
            }
        }
        table
    }

    /// Look up a group by its exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SharedStep> {
        self.groups.get(name)
    }

    /// Resolve a possibly parameterised reference to a registered group.
    ///
    /// Candidates are probed from most to least specific; the first one
    /// registered wins. `None` means the reference is unresolved, which is
    /// not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use magicpod_steps::model::SharedStep;
    /// use magicpod_steps::steps::SharedStepTable;
    ///
    /// let table = SharedStepTable::from_groups([SharedStep {
    ///     number: 1,
    ///     name: "Login".into(),
    ///     human_readable_steps: "Enter username".into(),
    /// }]);
    /// let group = table.resolve("Login (email: a@b.com)").expect("resolved");
    /// assert_eq!(group.name, "Login");
    /// ```
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<&SharedStep> {
        NameCandidates::new(reference).find_map(|candidate| self.get(candidate))
    }

    /// Number of registered groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no groups are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
