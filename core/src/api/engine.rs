//! The Kettle templating engine.

use core::ops::Deref;

use super::{EngineOptions, Error};
use crate::evaluator::Evaluator;
use crate::store::{Scope, VariableStore};
use crate::values::{Value, ValueArena, ValueId};
use crate::{String, Vec};
use bumpalo::Bump;

/// The Kettle templating engine.
///
/// The engine owns:
/// - Runtime configuration (EngineOptions)
/// - The value arena every host and template value is allocated in
/// - The variable store (global scope and named sections)
/// - A scratch arena for intermediate output, reset on every cook
///
/// # Example
///
/// ```
/// use kettle_core::api::Engine;
///
/// let mut engine = Engine::default();
/// engine.new_value("name").set_string("world");
///
/// let out = engine.cook("Hello, `name`!").unwrap();
/// assert_eq!(out, "Hello, world!");
/// ```
pub struct Engine {
    options: EngineOptions,
    arena: ValueArena,
    store: VariableStore,
    /// Values allocated with [`Engine::new_orphan_value`].
    orphans: Vec<ValueId>,
    scratch: Bump,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        let arena = ValueArena::new(options.arena_initial_capacity, options.arena_max_capacity);
        Self {
            options,
            arena,
            store: VariableStore::new(),
            orphans: Vec::new(),
            scratch: Bump::new(),
        }
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Bind a fresh `None` value to `key` in the global scope.
    ///
    /// Any value previously bound to `key` is released, so its handle stops
    /// resolving.
    pub fn new_value(&mut self, key: &str) -> ValueMut<'_> {
        self.bind(Scope::Global, key)
    }

    /// Bind a fresh `None` value to `key` in `section`, creating the section
    /// (enabled) if this is its first binding.
    pub fn new_section_value(&mut self, section: &str, key: &str) -> ValueMut<'_> {
        self.bind(Scope::Section(section), key)
    }

    /// Allocate a value that is not bound to any key, typically a list
    /// element. It lives until the next [`clear`](Self::clear).
    ///
    /// # Example
    ///
    /// ```
    /// use kettle_core::api::Engine;
    ///
    /// let mut engine = Engine::default();
    /// let first = engine.new_orphan_value().set_string("a").id();
    /// let second = engine.new_orphan_value().set_number(2).id();
    /// engine.new_value("items").set_list([first, second]);
    ///
    /// assert_eq!(engine.cook("`[items]{($)}`").unwrap(), "(a)(2)");
    /// assert_eq!(engine.cook("`items{<$>}`").unwrap(), "<a2>");
    /// ```
    pub fn new_orphan_value(&mut self) -> ValueMut<'_> {
        let id = self.arena.acquire(Value::None);
        self.orphans.push(id);
        self.value_mut_unchecked(id)
    }

    fn bind(&mut self, scope: Scope<'_>, key: &str) -> ValueMut<'_> {
        let id = self.arena.acquire(Value::None);
        if let Some(displaced) = self.store.bind(scope, key, id) {
            self.arena.release(displaced);
        }
        self.value_mut_unchecked(id)
    }

    fn value_mut_unchecked(&mut self, id: ValueId) -> ValueMut<'_> {
        match self.arena.get_mut(id) {
            Some(value) => ValueMut { id, value },
            None => unreachable!("value {:?} was acquired but does not resolve", id),
        }
    }

    /// The value behind `id`, or `None` if the handle is stale.
    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.arena.get(id)
    }

    pub fn value_mut(&mut self, id: ValueId) -> Option<ValueMut<'_>> {
        let value = self.arena.get_mut(id)?;
        Some(ValueMut { id, value })
    }

    /// Handle of the value bound to `key` in `scope`. Section lookups do not
    /// fall back to the global scope.
    pub fn lookup(&self, scope: Scope<'_>, key: &str) -> Option<ValueId> {
        self.store.lookup(scope, key)
    }

    /// Enable a section. Returns `false` if no value was ever bound in it.
    pub fn enable_section(&mut self, name: &str) -> bool {
        self.store.set_section_enabled(name, true)
    }

    /// Disable a section. Returns `false` if no value was ever bound in it.
    pub fn disable_section(&mut self, name: &str) -> bool {
        self.store.set_section_enabled(name, false)
    }

    /// Sections nobody bound a value in count as disabled.
    pub fn is_section_enabled(&self, name: &str) -> bool {
        self.store.is_section_enabled(name)
    }

    /// Handles of the orphan values allocated since the last clear.
    pub fn orphans(&self) -> &[ValueId] {
        &self.orphans
    }

    /// Number of values currently allocated, bound or orphaned.
    pub fn live_values(&self) -> usize {
        self.arena.len()
    }

    /// Drop every binding, section and orphan value.
    ///
    /// All previously issued handles stop resolving. Arena pages are kept for
    /// reuse.
    pub fn clear(&mut self) {
        self.store.clear();
        self.orphans.clear();
        self.arena.reclaim();
    }

    /// Like [`clear`](Self::clear), but also returns arena and scratch memory
    /// to the system.
    pub fn release_memory(&mut self) {
        self.store.clear();
        self.orphans.clear();
        self.arena.clear();
        self.scratch = Bump::new();
    }

    /// Render `text`, substituting every code segment.
    ///
    /// # Example
    ///
    /// ```
    /// use kettle_core::api::Engine;
    ///
    /// let mut engine = Engine::default();
    /// engine.new_value("x").set_number(5);
    /// assert_eq!(engine.cook("`x{val=$}`").unwrap(), "val=5");
    ///
    /// let err = engine.cook("`[5-2]`").unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "[Error(1,3)]: The left operand of a range must be less than the right operand, found 5-2"
    /// );
    /// ```
    pub fn cook(&mut self, text: &str) -> Result<String, Error> {
        let mut output = String::new();
        self.cook_into(text, &mut output)?;
        Ok(output)
    }

    /// Render `text` into `output`, which is cleared first.
    ///
    /// On failure `output` is left empty.
    pub fn cook_into(&mut self, text: &str, output: &mut String) -> Result<(), Error> {
        output.clear();
        self.scratch.reset();
        tracing::debug!(len = text.len(), "Cooking template");

        let result = Evaluator::new(
            text,
            &self.store,
            &mut self.arena,
            &self.scratch,
            self.options.max_depth,
            self.options.max_range_len,
        )
        .cook(output);

        match result {
            Ok(()) => {
                tracing::debug!(output_len = output.len(), "Cooked template");
                Ok(())
            }
            Err(err) => {
                output.clear();
                tracing::debug!(offset = err.offset, error = %err, "Cooking failed");
                Err(Error::from_eval(err, text))
            }
        }
    }
}

/// Mutable access to a value the host is filling in.
///
/// Setters return `&mut Self` so they can be chained after
/// [`Engine::new_value`].
pub struct ValueMut<'a> {
    id: ValueId,
    value: &'a mut Value,
}

impl ValueMut<'_> {
    /// Handle for looking the value up again or using it as a list element.
    pub fn id(&self) -> ValueId {
        self.id
    }

    pub fn set_none(&mut self) -> &mut Self {
        self.value.set_none();
        self
    }

    pub fn set_number(&mut self, number: i64) -> &mut Self {
        self.value.set_number(number);
        self
    }

    pub fn set_string(&mut self, string: impl Into<String>) -> &mut Self {
        self.value.set_string(string);
        self
    }

    /// Make this value a list of `elements`.
    ///
    /// Elements are shared, not copied: the list refers to the same arena
    /// values the handles name.
    pub fn set_list(&mut self, elements: impl IntoIterator<Item = ValueId>) -> &mut Self {
        self.value.set_list(elements);
        self
    }

    /// Replace this value with a copy of `other`. Lists copy their element
    /// handles, not the elements.
    pub fn copy_from(&mut self, other: &Value) -> &mut Self {
        self.value.copy_from(other);
        self
    }
}

impl Deref for ValueMut<'_> {
    type Target = Value;

    fn deref(&self) -> &Value {
        self.value
    }
}
