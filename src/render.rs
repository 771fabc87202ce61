//! Canonical rendering of classified errors.
//!
//! ```text
//! [<namespace>:<subsystem>:<name>] <effective message>
//! ```
//!
//! The effective message is the cause's own `Display` text when a cause is
//! attached, otherwise the message rendered at construction. The bracket is the
//! same either way, so log scrapers keyed on it never special-case wrapped errors.
//!
//! Rendering is infallible apart from the sink's own errors, holds no state and
//! writes straight into the destination without intermediate buffers.

use crate::{Classified, ErrorDescriptor};
use std::error::Error;
use std::fmt;

enum Body<'a> {
    Message(&'a str),
    Cause(&'a (dyn Error + 'a)),
}

/// Borrowed view that renders the canonical form on `Display`.
///
/// # Example
///
/// ```rust
/// use pd_errs::{Canonical, definitions};
///
/// let cause = std::io::Error::other("test error");
/// let line = Canonical::with_cause(&definitions::ERR_INVALID_TIMESTAMP, &cause).to_string();
/// assert_eq!(line, "[PD:tso:ErrInvalidTimestamp] test error");
/// ```
pub struct Canonical<'a> {
    descriptor: &'static ErrorDescriptor,
    body: Body<'a>,
}

impl<'a> Canonical<'a> {
    /// View over any classified error.
    pub fn of(err: &'a (dyn Classified + 'a)) -> Self {
        let body = match err.cause() {
            Some(cause) => Body::Cause(cause),
            None => Body::Message(err.message()),
        };
        Self {
            descriptor: err.descriptor(),
            body,
        }
    }

    /// View over a descriptor and a raw underlying error, without building a
    /// `ClassifiedError`.
    pub fn with_cause(descriptor: &'static ErrorDescriptor, cause: &'a (dyn Error + 'a)) -> Self {
        Self {
            descriptor,
            body: Body::Cause(cause),
        }
    }

    /// The descriptor being rendered.
    #[inline]
    pub fn descriptor(&self) -> &'static ErrorDescriptor {
        self.descriptor
    }

    /// Write the canonical form to any `fmt::Write` sink.
    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write_code(out, self.descriptor)?;
        out.write_char(' ')?;
        match self.body {
            Body::Message(message) => out.write_str(message),
            Body::Cause(cause) => write!(out, "{}", cause),
        }
    }
}

impl fmt::Display for Canonical<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl fmt::Debug for Canonical<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Canonical({:?})", self.to_string())
    }
}

/// Write only the bracketed code, `[PD:tso:ErrInvalidTimestamp]`.
pub fn write_code(out: &mut impl fmt::Write, descriptor: &ErrorDescriptor) -> fmt::Result {
    out.write_char('[')?;
    out.write_str(descriptor.namespace().as_str())?;
    out.write_char(':')?;
    out.write_str(descriptor.subsystem())?;
    out.write_char(':')?;
    out.write_str(descriptor.name())?;
    out.write_char(']')
}

/// Render into a new `String`.
pub fn render(err: &dyn Classified) -> String {
    Canonical::of(err).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{ERR_ETCD_TXN, ERR_INVALID_TIMESTAMP, ERR_STORE_NOT_FOUND};
    use std::io;

    #[test]
    fn renders_message_without_cause() {
        let err = ERR_INVALID_TIMESTAMP.instantiate(&[]);
        assert_eq!(render(&err), "[PD:tso:ErrInvalidTimestamp] invalid timestamp");
    }

    #[test]
    fn cause_text_replaces_message() {
        let err = ERR_INVALID_TIMESTAMP.wrap(io::Error::other("test error"));
        assert_eq!(render(&err), "[PD:tso:ErrInvalidTimestamp] test error");
    }

    #[test]
    fn cause_text_is_not_escaped() {
        let err = ERR_ETCD_TXN.wrap(io::Error::other("key \"a]b\"\n\tnext: [x]"));
        assert_eq!(render(&err), "[PD:etcd:ErrEtcdTxn] key \"a]b\"\n\tnext: [x]");
    }

    #[test]
    fn empty_cause_text_keeps_separator() {
        let err = ERR_ETCD_TXN.wrap(io::Error::other(""));
        assert_eq!(render(&err), "[PD:etcd:ErrEtcdTxn] ");
    }

    #[test]
    fn raw_cause_view() {
        let cause = io::Error::other("store 9 unreachable");
        let view = Canonical::with_cause(&ERR_STORE_NOT_FOUND, &cause);
        assert_eq!(view.to_string(), "[PD:core:ErrStoreNotFound] store 9 unreachable");
        assert!(std::ptr::eq(view.descriptor(), &ERR_STORE_NOT_FOUND));
    }

    #[test]
    fn write_code_only() {
        let mut out = String::new();
        write_code(&mut out, &ERR_STORE_NOT_FOUND).unwrap();
        assert_eq!(out, "[PD:core:ErrStoreNotFound]");
    }

    #[test]
    fn rendering_is_idempotent() {
        let err = ERR_STORE_NOT_FOUND.instantiate(&[&5]);
        let first = render(&err);
        let second = render(&err);
        assert_eq!(first, second);
        assert_eq!(err.to_string(), first);
    }
}
