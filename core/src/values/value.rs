use crate::{String, Vec};
use crate::values::{ValueArena, ValueId};

use core::fmt;

/// Rendering of a [`Value::None`].
pub const NULL_MARKER: &str = "<:null:>";

// Lists can be made to contain themselves through host handles.
const MAX_RENDER_DEPTH: usize = 128;

/// A template value.
///
/// Exactly one representation is active at a time. Replacing it drops the
/// previous payload first, so a string or list buffer is never leaked or
/// shared by accident.
///
/// `Clone` is a half-shallow copy: strings and numbers are copied, while a
/// list copies only its element handles. Both lists then refer to the same
/// element slots in the [`ValueArena`]. Dropping a list never releases its
/// elements; that must be done explicitly through the arena.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    #[default]
    None,
    Number(i64),
    String(String),
    List(Vec<ValueId>),
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    None,
    Number,
    String,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::None => write!(f, "none"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::String => write!(f, "string"),
            ValueKind::List => write!(f, "list"),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn set_none(&mut self) {
        *self = Value::None;
    }

    pub fn set_number(&mut self, number: i64) {
        *self = Value::Number(number);
    }

    pub fn set_string(&mut self, string: impl Into<String>) {
        *self = Value::String(string.into());
    }

    pub fn set_list(&mut self, elements: impl IntoIterator<Item = ValueId>) {
        *self = Value::List(elements.into_iter().collect());
    }

    /// Half-shallow copy of `other` into this value. See [`Value`].
    pub fn copy_from(&mut self, other: &Value) {
        self.clone_from(other);
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ValueId]> {
        match self {
            Value::List(elements) => Some(elements),
            _ => None,
        }
    }

    /// Append the textual form of this value to `out`.
    ///
    /// Lists render as the concatenation of their elements. Element handles
    /// that no longer resolve render as [`NULL_MARKER`].
    pub fn render<W: fmt::Write + ?Sized>(&self, arena: &ValueArena, out: &mut W) {
        self.render_at_depth(arena, out, 0);
    }

    fn render_at_depth<W: fmt::Write + ?Sized>(&self, arena: &ValueArena, out: &mut W, depth: usize) {
        // Writing into a string buffer cannot fail.
        match self {
            Value::None => {
                let _ = out.write_str(NULL_MARKER);
            }
            Value::Number(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::String(s) => {
                let _ = out.write_str(s);
            }
            Value::List(elements) => {
                if depth >= MAX_RENDER_DEPTH {
                    tracing::warn!(depth, "List nesting too deep to render, truncating");
                    return;
                }
                for &id in elements {
                    match arena.get(id) {
                        Some(element) => element.render_at_depth(arena, out, depth + 1),
                        None => {
                            tracing::warn!(?id, "Rendering stale value handle");
                            let _ = out.write_str(NULL_MARKER);
                        }
                    }
                }
            }
        }
    }

    /// The textual form of this value as a new string.
    pub fn to_text(&self, arena: &ValueArena) -> String {
        let mut out = String::new();
        self.render(arena, &mut out);
        out
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Number(number)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Value::String(string.into())
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::String(string)
    }
}

impl From<Vec<ValueId>> for Value {
    fn from(elements: Vec<ValueId>) -> Self {
        Value::List(elements)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
