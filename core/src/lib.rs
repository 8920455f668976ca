#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![deny(unsafe_code)]

// Needed so that doc examples and tests can uniformly refer to `::kettle_core`
// from within this crate or a different one.
extern crate self as kettle_core;

// This works on std and no_std and is harmless.
extern crate alloc;

#[doc(hidden)]
pub mod shim {
    pub use alloc::{borrow::ToOwned, boxed::Box, format, string::String, string::ToString, vec, vec::Vec};
}

// Re-export (crate only) for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use shim::*;

pub mod api;
pub mod evaluator;
pub mod lexer;
pub mod skipper;
pub mod store;
pub mod values;
