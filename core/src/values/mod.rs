//! Template values and the arena that owns them.

pub mod arena;
pub mod value;

pub use arena::{ValueArena, ValueId};
pub use value::{NULL_MARKER, Value, ValueKind};
