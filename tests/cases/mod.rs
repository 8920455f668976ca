// Helper macro to distinguish between patterns and expressions
#[macro_export]
macro_rules! assert_case {
    // Guard patterns - patterns with if conditions
    ($result:expr, { $pattern:pat if $guard:expr }) => {
        match $result {
            $pattern if $guard => {},
            other => panic!("Expected {} if {} but got {:?}", stringify!($pattern), stringify!($guard), other),
        }
    };

    // Pattern matching cases - detect common pattern forms
    ($result:expr, { Ok($($pattern:tt)*) }) => {
        match $result {
            Ok($($pattern)*) => {},
            other => panic!("Expected Ok({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { Err($($pattern:tt)*) }) => {
        match $result {
            Err($($pattern)*) => {},
            other => panic!("Expected Err({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    // Wildcard pattern
    ($result:expr, { _ }) => {
        // Always passes - just to ensure the expression compiles
        let _ = $result;
    };

    // Default case - treat as expression for equality comparison
    ($result:expr, { $expected:expr }) => {
        match $result {
            Ok(actual) => {
                pretty_assertions::assert_eq!($expected, actual, "Expected {:#?} but got {:#?}\n\n< expected / got >", $expected, actual);
            },
            other => panic!("Expected Ok(...) but got {:?}", other),
        }
    };
}

// Helper macro to generate test functions based on field names
#[macro_export]
macro_rules! handle_case {
    // With attributes (including empty attribute list)
    ([$($attrs:meta)*] output, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_output() {
            let mut engine = engine();
            let result = engine.cook(input());
            assert_case!(result, $expected);
        }
    };

    ([$($attrs:meta)*] error, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_error() {
            let mut engine = engine();
            let err = match engine.cook(input()) {
                Err(e) => e,
                Ok(out) => panic!("Expected cook error, but got output {:?}", out),
            };
            let err_string = err.to_string();
            let result: Result<&str, ()> = Ok(err_string.as_str());
            assert_case!(result, $expected);
        }
    };

    ([$($attrs:meta)*] error_message, { $expected:expr }) => {
        $(#[$attrs])*
        #[test]
        fn validate_error_message() {
            let mut engine = engine();
            let err = match engine.cook(input()) {
                Err(e) => e,
                Ok(out) => panic!("Expected cook error, but got output {:?}", out),
            };
            assert!(
                err.message().contains($expected),
                "Expected error message containing {:?}, got {:?}",
                $expected,
                err.message()
            );
        }
    };

    ([$($attrs:meta)*] rendered, { $expected:expr }) => {
        $(#[$attrs])*
        #[test]
        fn validate_rendered() {
            let mut engine = engine();
            let err = match engine.cook(input()) {
                Err(e) => e,
                Ok(out) => panic!("Expected cook error, but got output {:?}", out),
            };
            let mut buf = Vec::new();
            let config = kettle::RenderConfig {
                color: false,
                filename: Some("case.kt"),
                charset: kettle::CharSet::Ascii,
            };
            kettle::render_error_to(&err, &mut buf, &config).unwrap();
            let rendered = String::from_utf8_lossy(&buf);
            assert!(
                rendered.contains($expected),
                "Expected rendered error containing {:?}, got:\n{}",
                $expected,
                rendered
            );
        }
    };

    // Generic case for unknown field names
    ([$($attrs:meta)*] $field_name:ident, $expected:tt) => {
        compile_error!(concat!("Unknown test case field: ", stringify!($field_name)));
    };
}

// Helper macro to recursively parse assertion fields (now correctly capturing braces)
#[macro_export]
macro_rules! parse_assertions {
    // Base case: no more fields to parse
    (@parse [$($test_functions:tt)*]) => {
        $($test_functions)*
    };

    // Parse assertion field with potential attributes (handles both cases)
    (@parse [$($test_functions:tt)*] $(#[$attr:meta])* $field_name:ident: $field_value:tt, $($rest:tt)*) => {
        parse_assertions! {@parse [
            $($test_functions)*
            handle_case! {[$($attr)*] $field_name, $field_value}
        ] $($rest)*}
    };
}

// Main macro - name first, input second, an optional engine setup, then any
// order for assertions
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        setup: $setup:expr,
        $($assertion_fields:tt)*
    ) => {
        mod $name {
            #![allow(unused_imports, dead_code)]

            use super::*;

            // Make `$input` available to all test functions
            fn input() -> &'static str {
                $input
            }

            // Every test function cooks on its own freshly prepared engine
            fn engine() -> kettle::Engine {
                let mut engine = kettle::Engine::default();
                let setup: fn(&mut kettle::Engine) = $setup;
                setup(&mut engine);
                engine
            }

            // Generate all test functions
            parse_assertions! {@parse [] $($assertion_fields)*}
        }
    };

    (
        name: $name:ident,
        input: $input:expr,
        $($assertion_fields:tt)*
    ) => {
        test_case! {
            name: $name,
            input: $input,
            setup: |_| {},
            $($assertion_fields)*
        }
    };
}
