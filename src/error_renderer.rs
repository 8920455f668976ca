//! Beautiful error rendering using ariadne
//!
//! This module renders Kettle errors with the offending template line, a
//! label under the failing token and any help text.

use crate::{Diagnostic, Error};
use ariadne::{ColorGenerator, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Use Unicode characters for rich visual output.
    #[default]
    Unicode,
    /// Use ASCII-only characters for compatibility.
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The filename to display in error messages.
    /// Falls back to the error's own filename, then to "<template>".
    pub filename: Option<&'a str>,
    /// The character set to use for rendering.
    /// Defaults to Unicode for rich visual output.
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        RenderConfig::default()
    }
}

impl RenderConfig<'_> {
    const fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Render an error with beautiful formatting to stderr using default config.
///
/// # Example
/// ```no_run
/// use kettle::{Engine, render_error};
///
/// let mut engine = Engine::default();
/// if let Err(e) = engine.cook("`[5-2]`") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render an error to a writer with the given configuration.
///
/// This is the main rendering function. Use this when you need control over
/// the output destination or rendering options.
///
/// # Example
/// ```
/// use kettle::{Engine, RenderConfig, render_error_to};
///
/// let mut engine = Engine::default();
/// let err = engine.cook("Hello `name`").unwrap_err();
///
/// // Render without colors to a string
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, &mut buf, &config).unwrap();
/// let output = String::from_utf8_lossy(&buf);
/// assert!(output.contains("Variable 'name' in section '<Global>' does not exist"));
/// ```
pub fn render_error_to(
    error: &Error,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let filename = config
        .filename
        .or_else(|| error.filename())
        .unwrap_or("<template>");
    let kind = match error {
        Error::Template { .. } => ReportKind::Error,
        Error::ResourceExceeded { .. } => ReportKind::Custom("Resource limit exceeded", ariadne::Color::Red),
        Error::Internal { .. } => ReportKind::Custom("Internal error", ariadne::Color::Red),
    };
    render_diagnostic(
        error.template(),
        error.diagnostic(),
        kind,
        writer,
        config,
        filename,
    )
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    kind: ReportKind<'_>,
    writer: &mut dyn Write,
    config: &RenderConfig,
    filename: &str,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let ariadne_charset = match config.charset {
        CharSet::Unicode => ariadne::CharSet::Unicode,
        CharSet::Ascii => ariadne::CharSet::Ascii,
    };
    // Diagnostic spans are byte offsets into the template.
    let ariadne_config = ariadne::Config::default()
        .with_color(config.color)
        .with_char_set(ariadne_charset)
        .with_index_type(IndexType::Byte);

    let mut report = Report::build(kind, (filename, diag.span.clone()))
        .with_message(&diag.message)
        .with_code(diag.code)
        .with_config(ariadne_config);

    let color = colors.next();
    report = report.with_label(
        Label::new((filename, diag.span.clone()))
            .with_message(&diag.message)
            .with_color(color),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    // Render to the writer (need to reborrow to avoid moving)
    report
        .finish()
        .write((filename, Source::from(source)), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, EngineOptions};

    const UNICODE_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.kt"),
        charset: CharSet::Unicode,
    };

    const ASCII_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.kt"),
        charset: CharSet::Ascii,
    };

    fn render_error_string(engine: &mut Engine, source: &str, config: &RenderConfig) -> String {
        match engine.cook(source) {
            Err(e) => {
                let mut buf = Vec::new();
                render_error_to(&e, &mut buf, config).unwrap();
                String::from_utf8_lossy(&buf).into_owned()
            }
            Ok(out) => panic!("Expected cook error for source: {source}, got {out:?}"),
        }
    }

    #[test]
    fn test_unknown_variable_unicode() {
        let output = render_error_string(&mut Engine::default(), "Hi `who`!", &UNICODE_CONFIG);
        assert!(output.contains("[K201] Error: Variable 'who' in section '<Global>' does not exist"));
        assert!(output.contains("test.kt:1:5"));
        assert!(output.contains("Hi `who`!"));
        assert!(output.contains("Help: Bind the variable before cooking"));
        assert!(output.contains('╭'));
    }

    #[test]
    fn test_unknown_variable_ascii() {
        let output = render_error_string(&mut Engine::default(), "Hi `who`!", &ASCII_CONFIG);
        assert!(output.contains("[K201] Error:"));
        assert!(output.contains(",-[ test.kt:1:5 ]"));
        assert!(output.is_ascii());
    }

    #[test]
    fn test_location_on_second_line() {
        let output = render_error_string(
            &mut Engine::default(),
            "line one\nand `[3-1]` here",
            &ASCII_CONFIG,
        );
        assert!(output.contains("[K203] Error:"));
        assert!(output.contains("test.kt:2:6"));
        assert!(output.contains("and `[3-1]` here"));
    }

    #[test]
    fn test_resource_exceeded() {
        let mut engine = Engine::new(EngineOptions::default().with_max_depth(2));
        let output = render_error_string(&mut engine, "`1{`1{`1{x}`}`}`", &ASCII_CONFIG);
        assert!(output.contains("[K301] Resource limit exceeded:"));
        assert!(output.contains("maximum depth of 2"));
    }

    #[test]
    fn test_error_filename_is_used_when_config_has_none() {
        let err = Engine::default()
            .cook("`[]`")
            .unwrap_err()
            .with_filename("page.kt");
        let mut buf = Vec::new();
        let config = RenderConfig {
            color: false,
            ..Default::default()
        };
        render_error_to(&err, &mut buf, &config).unwrap();
        let output = String::from_utf8_lossy(&buf);
        assert!(output.contains("page.kt:1:2"));
        assert!(output.contains("Empty list"));
    }

    #[test]
    fn test_charset_default_is_unicode() {
        assert_eq!(CharSet::default(), CharSet::Unicode);
    }

    #[test]
    fn test_render_config_default_charset() {
        let config = RenderConfig::default();
        assert_eq!(config.charset, CharSet::Unicode);
    }
}
