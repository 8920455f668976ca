//! Two-tier variable scopes: one global namespace plus named sections.
//!
//! The store only maps names to [`ValueId`]s. The values themselves are owned
//! by the engine's [`ValueArena`](crate::values::ValueArena), and releasing a
//! value displaced by [`VariableStore::bind`] is the caller's job.

use crate::values::ValueId;
use crate::{String, ToOwned};

use hashbrown::HashMap;

/// Where a variable is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Global,
    Section(&'a str),
}

impl<'a> Scope<'a> {
    /// `Global` for `None`, otherwise the named section.
    pub fn from_section(section: Option<&'a str>) -> Self {
        match section {
            Some(name) => Scope::Section(name),
            None => Scope::Global,
        }
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &'a str {
        match self {
            Scope::Global => "<Global>",
            Scope::Section(name) => name,
        }
    }
}

#[derive(Debug, Default)]
struct Section {
    enabled: bool,
    values: HashMap<String, ValueId>,
}

#[derive(Debug, Default)]
pub struct VariableStore {
    globals: HashMap<String, ValueId>,
    sections: HashMap<String, Section>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `id` in `scope`, returning the value it displaced.
    ///
    /// The first binding into a section creates that section, enabled.
    pub fn bind(&mut self, scope: Scope<'_>, key: &str, id: ValueId) -> Option<ValueId> {
        let map = match scope {
            Scope::Global => &mut self.globals,
            Scope::Section(name) => {
                &mut self
                    .sections
                    .entry_ref(name)
                    .or_insert_with(|| Section {
                        enabled: true,
                        values: HashMap::new(),
                    })
                    .values
            }
        };
        map.insert(key.to_owned(), id)
    }

    pub fn lookup(&self, scope: Scope<'_>, key: &str) -> Option<ValueId> {
        match scope {
            Scope::Global => self.globals.get(key).copied(),
            Scope::Section(name) => self.sections.get(name)?.values.get(key).copied(),
        }
    }

    /// Look `key` up in `section` if it is enabled, then in the global scope.
    pub fn lookup_with_fallback(&self, section: Option<&str>, key: &str) -> Option<ValueId> {
        section
            .filter(|name| self.is_section_enabled(name))
            .and_then(|name| self.lookup(Scope::Section(name), key))
            .or_else(|| self.lookup(Scope::Global, key))
    }

    /// Unknown sections count as disabled.
    pub fn is_section_enabled(&self, name: &str) -> bool {
        self.sections.get(name).is_some_and(|s| s.enabled)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Returns `false` and does nothing for an unknown section.
    pub fn set_section_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.sections.get_mut(name) {
            Some(section) => {
                section.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Every bound value, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.globals
            .values()
            .chain(self.sections.values().flat_map(|s| s.values.values()))
            .copied()
    }

    /// Number of bound keys across all scopes.
    pub fn len(&self) -> usize {
        self.globals.len() + self.sections.values().map(|s| s.values.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every binding and every section.
    pub fn clear(&mut self) {
        self.globals.clear();
        self.sections.clear();
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
