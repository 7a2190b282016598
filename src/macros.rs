//! `#define` line normaliser.
//!
//! Turns the predefined-macro dump of a compiler (`-E -dM`) into the
//! `NAME=VALUE` expressions an IntelliSense configuration expects, for
//! example:
//!
//! - `#define __ARMCC_VERSION 6190004` → `__ARMCC_VERSION=6190004`
//! - `#define __has_include(x) 1`      → `__has_include(x)=`
//! - `#define __STDC__`                → `__STDC__=`
//!
//! Function-like macros keep only their signature: downstream tooling only
//! needs to know the macro exists and expands to nothing.
//!
//! Uses [`chumsky`] for the grammar.
//!
//! ## Grammar
//!
//! ```text
//! line      = '#define' blank (object | function)
//! object    = ident (blank rest)? EOF
//! function  = ident '(' [^)]* ')' (blank rest)? EOF
//! ident     = [A-Za-z0-9_]+
//! blank     = [ \t]+
//! ```
//!
//! `object` is tried first, so a name directly followed by `(` can only ever
//! be read as a function-like macro.

use chumsky::prelude::*;

/// One parsed `#define` directive, borrowing from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroDefinition<'a> {
    /// `#define NAME VALUE`; `value` is empty for a bodiless define.
    Object { name: &'a str, value: &'a str },
    /// `#define NAME(args) BODY`; the body is dropped.
    Function { signature: &'a str },
}

impl MacroDefinition<'_> {
    /// Render as a `-D` style expression.
    pub fn to_expression(&self) -> String {
        match self {
            MacroDefinition::Object { name, value } => format!("{name}={value}"),
            MacroDefinition::Function { signature } => format!("{signature}="),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Chumsky parser
// ═══════════════════════════════════════════════════════════════════════════════

fn define_parser<'a>() -> impl Parser<'a, &'a str, MacroDefinition<'a>, extra::Err<Simple<'a, char>>> {
    let blank = one_of(" \t").repeated().at_least(1);

    let ident = any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice();

    let rest = blank.clone().ignore_then(any().repeated().to_slice());

    // ── Object-like:  NAME [VALUE] ───────────────────────────────────────
    let object = ident
        .clone()
        .then(rest.clone().or_not())
        .then_ignore(end())
        .map(|(name, value)| MacroDefinition::Object {
            name,
            value: value.unwrap_or(""),
        });

    // ── Function-like:  NAME(args) [BODY] ────────────────────────────────
    let function = ident
        .then(just('('))
        .then(none_of(')').repeated())
        .then(just(')'))
        .to_slice()
        .then_ignore(rest.or_not())
        .then_ignore(end())
        .map(|signature| MacroDefinition::Function { signature });

    just("#define")
        .ignore_then(blank)
        .ignore_then(choice((object, function)))
}

/// Parse one line into a [`MacroDefinition`]; `None` when the line is not a
/// `#define` directive.
pub fn parse_define(line: &str) -> Option<MacroDefinition<'_>> {
    define_parser().parse(line.trim()).into_result().ok()
}

/// Normalise one line of a macro dump into a `NAME=VALUE` / `NAME(args)=`
/// expression.  Blank lines and anything that is not a `#define` yield
/// `None`.
pub fn to_expression(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    parse_define(line).map(|def| def.to_expression())
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // ── Object-like ──────────────────────────────────────────────────────

    #[test]
    fn object_macro_with_value() {
        assert_eq!(to_expression("#define FOO 42").as_deref(), Some("FOO=42"));
    }

    #[test]
    fn object_macro_value_keeps_inner_spaces() {
        assert_eq!(
            to_expression("#define __VERSION__ \"Clang 17.0.0\"").as_deref(),
            Some("__VERSION__=\"Clang 17.0.0\"")
        );
    }

    #[test]
    fn object_macro_value_starting_with_paren() {
        assert_eq!(
            to_expression("#define __INT_MAX__ (2147483647)").as_deref(),
            Some("__INT_MAX__=(2147483647)")
        );
    }

    #[test]
    fn bodiless_object_macro() {
        assert_eq!(
            parse_define("#define BAZ"),
            Some(MacroDefinition::Object { name: "BAZ", value: "" })
        );
        assert_eq!(to_expression("#define BAZ").as_deref(), Some("BAZ="));
    }

    // ── Function-like ────────────────────────────────────────────────────

    #[test]
    fn function_macro_drops_body() {
        assert_eq!(
            to_expression("#define BAR(x,y) ((x)+(y))").as_deref(),
            Some("BAR(x,y)=")
        );
    }

    #[test]
    fn function_macro_is_never_read_as_object() {
        assert_eq!(
            parse_define("#define BAR(x,y) ((x)+(y))"),
            Some(MacroDefinition::Function { signature: "BAR(x,y)" })
        );
    }

    #[test]
    fn function_macro_with_spaced_args_and_no_body() {
        assert_eq!(
            to_expression("#define __has_feature(x, y)").as_deref(),
            Some("__has_feature(x, y)=")
        );
    }

    #[test]
    fn function_macro_with_empty_args() {
        assert_eq!(to_expression("#define __nop() ").as_deref(), Some("__nop()="));
    }

    // ── Non-matches ──────────────────────────────────────────────────────

    #[test]
    fn comment_yields_nothing() {
        assert_eq!(to_expression("// comment"), None);
    }

    #[test]
    fn blank_line_yields_nothing() {
        assert_eq!(to_expression(""), None);
        assert_eq!(to_expression("   \t"), None);
    }

    #[test]
    fn other_directives_yield_nothing() {
        assert_eq!(to_expression("#undef FOO"), None);
        assert_eq!(to_expression("#definefoo 1"), None);
        assert_eq!(to_expression("#define"), None);
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        assert_eq!(to_expression("#define __arm__ 1\r").as_deref(), Some("__arm__=1"));
    }

    #[test]
    fn realistic_dump() {
        let dump = "#define __ARMCC_VERSION 6190004\n\
                    #define __ARM_ARCH 4\n\
                    \n\
                    #define __has_include(x) 0\n\
                    #define __clang__ 1\n";
        let exprs: Vec<String> = dump.lines().filter_map(to_expression).collect();
        assert_eq!(
            exprs,
            [
                "__ARMCC_VERSION=6190004",
                "__ARM_ARCH=4",
                "__has_include(x)=",
                "__clang__=1",
            ]
        );
    }
}
