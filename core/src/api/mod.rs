//! Public API for the Kettle templating engine.
//!
//! The host binds values with [`Engine::new_value`] and friends, toggles
//! sections, and cooks templates. Failures come back as an [`Error`] carrying
//! a [`Diagnostic`] with the line and column of the problem.
//!
//! # Example
//!
//! ```
//! use kettle_core::api::{Engine, EngineOptions};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//! engine.new_value("user").set_string("ada");
//! engine.new_section_value("admin", "badge").set_string(" [admin]");
//! engine.disable_section("admin");
//!
//! let out = engine.cook(r#"`user``<"admin"> badge >` logged in"#).unwrap();
//! assert_eq!(out, "ada logged in");
//!
//! engine.enable_section("admin");
//! let out = engine.cook(r#"`user``<"admin"> badge >` logged in"#).unwrap();
//! assert_eq!(out, "ada [admin] logged in");
//! ```

pub mod engine;
pub mod error;
pub mod options;

pub use engine::{Engine, ValueMut};
pub use error::{Diagnostic, Error};
pub use options::EngineOptions;
