//! Kettle - A small, embeddable text templating engine
//!
//! # Overview
//!
//! Kettle copies template text verbatim and substitutes backtick-delimited
//! code segments with the values the host has bound. Common use cases include:
//!
//! - Generated source files and configuration
//! - Email and notification bodies
//! - HTML fragments
//!
//! # Quick Start
//!
//! ```
//! use kettle::{Engine, EngineOptions};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//!
//! // Bind a few values
//! engine.new_value("name").set_string("Ada");
//! engine.new_value("count").set_number(3);
//!
//! // Cook a template
//! let out = engine
//!     .cook("Hi `name`, you have `count` new messages:`[1-4]{ #$}`")
//!     .unwrap();
//! assert_eq!(out, "Hi Ada, you have 3 new messages: #1 #2 #3");
//! ```
//!
//! # Template Syntax
//!
//! - `` \` `` is a literal backtick; a bare backtick opens a code segment.
//! - Atomics: `42`, `"text"`, `name`.
//! - Lists: `[a, b, c]`, ranges `[0-5]` (upper bound excluded), nesting
//!   `[[1, 2], 3]`.
//! - Bodies: `item{ ... $ ... }` repeats the text with `$` bound to the
//!   item, or once per element for a list. `\$` writes a literal `$`.
//! - Sections: `<"name"> ... >` only evaluates its statements while the
//!   section is enabled.
//!
//! # Sections
//!
//! ```
//! use kettle::Engine;
//!
//! let mut engine = Engine::default();
//! engine.new_section_value("debug", "build").set_string(" (debug build)");
//!
//! let template = r#"Version 1.0`<"debug"> build >`"#;
//! assert_eq!(engine.cook(template).unwrap(), "Version 1.0 (debug build)");
//!
//! engine.disable_section("debug");
//! assert_eq!(engine.cook(template).unwrap(), "Version 1.0");
//! ```

// Error rendering utilities
pub mod error_renderer;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

// Re-export public API from kettle_core
pub use kettle_core::api::{Diagnostic, Engine, EngineOptions, Error, ValueMut};

// Re-export commonly used types and values
pub use kettle_core::store::Scope;
pub use kettle_core::values::{self, Value, ValueId, ValueKind};
