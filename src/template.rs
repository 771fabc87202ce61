//! Positional message templates.
//!
//! # Syntax
//!
//! - `{}` takes the next implicit argument
//! - `{N}` takes argument `N` (zero based) and does not advance the implicit counter
//! - `{{` and `}}` are literal braces
//!
//! Anything else between braces, or an unbalanced brace, is a [`TemplateError`].
//!
//! # Two Rendering Modes
//!
//! - [`render_strict`] is used by `ErrorDescriptor::instantiate`. The argument count
//!   must equal the template arity.
//! - [`render_lenient`] is used when wrapping a cause and for the internal
//!   formatting-failure message. It never fails: absent arguments become
//!   [`MISSING_ARG_TOKEN`], extra arguments are ignored, and a malformed template is
//!   returned verbatim.
//!
//! Templates with no placeholders and no escapes render to a borrowed `Cow`, so the
//! common `instantiate(&[])` path does not allocate.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::{self, Write};
use thiserror::Error;

/// Substituted for placeholders that have no matching argument.
pub const MISSING_ARG_TOKEN: &str = "<missing>";

/// Reasons a template cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{` without a closing `}`.
    #[error("unclosed placeholder at byte {offset}")]
    UnclosedPlaceholder {
        /// Byte offset into the template.
        offset: usize,
    },
    /// `}` that neither closes a placeholder nor is escaped.
    #[error("unmatched '}}' at byte {offset}")]
    UnmatchedClose {
        /// Byte offset into the template.
        offset: usize,
    },
    /// Placeholder content is not empty and not a decimal index.
    #[error("invalid placeholder at byte {offset}")]
    InvalidPlaceholder {
        /// Byte offset into the template.
        offset: usize,
    },
    /// Strict rendering with the wrong number of arguments.
    #[error("template expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Arguments the template needs.
        expected: usize,
        /// Arguments supplied.
        actual: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'t> {
    Literal(&'t str),
    Arg(usize),
}

/// Parsed template: segments plus arity.
struct Parsed<'t> {
    segments: SmallVec<[Segment<'t>; 8]>,
    arity: usize,
}

impl<'t> Parsed<'t> {
    /// True when the template renders to itself.
    fn is_verbatim(&self, template: &str) -> bool {
        match self.segments.as_slice() {
            [] => true,
            [Segment::Literal(s)] => s.len() == template.len(),
            _ => false,
        }
    }
}

fn parse(template: &str) -> Result<Parsed<'_>, TemplateError> {
    let bytes = template.as_bytes();
    let mut segments = SmallVec::new();
    let mut implicit = 0usize;
    let mut arity = 0usize;
    let mut literal_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                // keep one brace, drop the escape
                push_literal(&mut segments, &template[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            b'{' => {
                let close = template[i + 1..]
                    .find('}')
                    .map(|rel| i + 1 + rel)
                    .ok_or(TemplateError::UnclosedPlaceholder { offset: i })?;
                let content = &template[i + 1..close];
                let index = if content.is_empty() {
                    implicit += 1;
                    implicit - 1
                } else if content.bytes().all(|b| b.is_ascii_digit()) {
                    content
                        .parse::<usize>()
                        .map_err(|_| TemplateError::InvalidPlaceholder { offset: i })?
                } else {
                    return Err(TemplateError::InvalidPlaceholder { offset: i });
                };
                arity = arity.max(index.saturating_add(1));
                push_literal(&mut segments, &template[literal_start..i]);
                segments.push(Segment::Arg(index));
                i = close + 1;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_literal(&mut segments, &template[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            b'}' => return Err(TemplateError::UnmatchedClose { offset: i }),
            _ => i += 1,
        }
    }
    push_literal(&mut segments, &template[literal_start..]);

    Ok(Parsed { segments, arity })
}

#[inline]
fn push_literal<'t>(segments: &mut SmallVec<[Segment<'t>; 8]>, s: &'t str) {
    if !s.is_empty() {
        segments.push(Segment::Literal(s));
    }
}

fn write_segments(out: &mut String, segments: &[Segment<'_>], args: &[&dyn fmt::Display]) {
    for segment in segments {
        // Writing into a String cannot fail.
        let _ = match segment {
            Segment::Literal(s) => out.write_str(s),
            Segment::Arg(index) => match args.get(*index) {
                Some(arg) => write!(out, "{}", arg),
                None => out.write_str(MISSING_ARG_TOKEN),
            },
        };
    }
}

/// Number of arguments the template consumes.
///
/// # Errors
///
/// Returns the syntax error if the template is malformed.
pub fn arity(template: &str) -> Result<usize, TemplateError> {
    parse(template).map(|parsed| parsed.arity)
}

/// Render with exactly `arity(template)` arguments.
///
/// # Errors
///
/// Syntax errors, or [`TemplateError::ArgumentCount`] on an arity mismatch.
pub fn render_strict<'t>(
    template: &'t str,
    args: &[&dyn fmt::Display],
) -> Result<Cow<'t, str>, TemplateError> {
    let parsed = parse(template)?;
    if parsed.arity != args.len() {
        return Err(TemplateError::ArgumentCount {
            expected: parsed.arity,
            actual: args.len(),
        });
    }
    if parsed.is_verbatim(template) {
        return Ok(Cow::Borrowed(template));
    }

    let mut out = String::with_capacity(template.len() + 16 * args.len());
    write_segments(&mut out, &parsed.segments, args);
    Ok(Cow::Owned(out))
}

/// Render without ever failing.
pub fn render_lenient<'t>(template: &'t str, args: &[&dyn fmt::Display]) -> Cow<'t, str> {
    let Ok(parsed) = parse(template) else {
        return Cow::Borrowed(template);
    };
    if parsed.is_verbatim(template) {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len() + 16 * args.len());
    write_segments(&mut out, &parsed.segments, args);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_template_is_borrowed() {
        let rendered = render_strict("invalid timestamp", &[]).unwrap();
        assert!(matches!(rendered, Cow::Borrowed("invalid timestamp")));
    }

    #[test]
    fn empty_template() {
        assert_eq!(arity("").unwrap(), 0);
        assert_eq!(render_strict("", &[]).unwrap(), "");
    }

    #[test]
    fn implicit_placeholders_in_order() {
        let rendered = render_strict("store {} has {} regions", &[&7u64, &"many"]).unwrap();
        assert_eq!(rendered, "store 7 has many regions");
    }

    #[test]
    fn explicit_indices_do_not_advance_counter() {
        assert_eq!(arity("{1} then {} then {0}").unwrap(), 2);
        let rendered = render_strict("{1} then {} then {0}", &[&"a", &"b"]).unwrap();
        assert_eq!(rendered, "b then a then a");
    }

    #[test]
    fn escaped_braces() {
        assert_eq!(arity("{{literal}} {}").unwrap(), 1);
        let rendered = render_strict("{{literal}} {}", &[&1]).unwrap();
        assert_eq!(rendered, "{literal} 1");
        assert_eq!(render_strict("{{}}", &[]).unwrap(), "{}");
    }

    #[test]
    fn syntax_errors_carry_offsets() {
        assert_eq!(
            arity("region {"),
            Err(TemplateError::UnclosedPlaceholder { offset: 7 })
        );
        assert_eq!(arity("a } b"), Err(TemplateError::UnmatchedClose { offset: 2 }));
        assert_eq!(
            arity("{name}"),
            Err(TemplateError::InvalidPlaceholder { offset: 0 })
        );
        assert_eq!(
            arity("{99999999999999999999999}"),
            Err(TemplateError::InvalidPlaceholder { offset: 0 })
        );
    }

    #[test]
    fn strict_rejects_wrong_count() {
        assert_eq!(
            render_strict("region {} not found", &[]),
            Err(TemplateError::ArgumentCount { expected: 1, actual: 0 })
        );
        assert_eq!(
            render_strict("no args", &[&1]),
            Err(TemplateError::ArgumentCount { expected: 0, actual: 1 })
        );
    }

    #[test]
    fn lenient_substitutes_missing_token() {
        assert_eq!(
            render_lenient("region {} not found in {}", &[&42]),
            "region 42 not found in <missing>"
        );
        assert_eq!(render_lenient("store {}", &[&1, &2]), "store 1");
    }

    #[test]
    fn lenient_returns_malformed_template_verbatim() {
        assert_eq!(render_lenient("broken {", &[&1]), "broken {");
    }

    #[test]
    fn multibyte_literals_survive() {
        let rendered = render_strict("région {} · ok", &[&"α"]).unwrap();
        assert_eq!(rendered, "région α · ok");
    }
}
