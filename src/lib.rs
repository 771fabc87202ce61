//! # PD Errs
//!
//! Classified error codes for the placement driver.
//!
//! Any component can raise an error tied to a registered descriptor. Wherever that
//! error ends up, in `Display` output or in a structured log field, it renders as
//!
//! ```text
//! [<namespace>:<subsystem>:<ErrorName>] <message>
//! ```
//!
//! ## Design
//!
//! 1. **Descriptors are static and frozen.** Each one is a `static` with a
//!    compile-time checked identity ([`codes`], [`definitions`]).
//! 2. **The registry is explicit.** A [`RegistryBuilder`] is filled during start-up
//!    and sealed into a read-only [`Registry`] that is handed to whoever needs it.
//! 3. **Messages are rendered once.** [`ErrorDescriptor::instantiate`] formats the
//!    template at construction; rendering never re-formats it.
//! 4. **Causes are kept verbatim.** [`ErrorDescriptor::wrap`] stores the underlying
//!    error; its text replaces the message only at output time.
//! 5. **Logging is lazy.** [`logging::error_field`] hands `tracing` a field that is
//!    rendered only if a subscriber records it.
//!
//! ## Quick Start
//!
//! ```rust
//! use pd_errs::{definitions, logging, Result};
//!
//! fn check_timestamp(physical: i64) -> Result<()> {
//!     if physical <= 0 {
//!         return Err(definitions::ERR_INVALID_TIMESTAMP.instantiate(&[]));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_timestamp(0).unwrap_err();
//! assert_eq!(err.to_string(), "[PD:tso:ErrInvalidTimestamp] invalid timestamp");
//!
//! tracing::error!(error = logging::error_field(&err), "allocate tso failed");
//! ```
//!
//! ## Wrapping a Cause
//!
//! ```rust
//! use pd_errs::definitions;
//!
//! let cause = std::io::Error::other("test error");
//! let err = definitions::ERR_INVALID_TIMESTAMP.wrap(cause);
//! assert_eq!(err.to_string(), "[PD:tso:ErrInvalidTimestamp] test error");
//! assert_eq!(err.message(), "invalid timestamp");
//! ```
//!
//! ## Features
//!
//! - `strict_taxonomy`: error names must start with `Err` and subsystems must be
//!   lowercase

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::result;
use std::sync::Arc;

pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod logging;
pub mod models;
pub mod registry;
pub mod render;
pub mod template;

pub use codes::*;
pub use logging::{
    ErrorField, classified_code_field, classified_field, code_field, emit, emit_at,
    emit_classified, emit_classified_at, error_field, wrap_field,
};
pub use models::*;
pub use registry::*;
pub use render::{Canonical, render};
pub use template::{MISSING_ARG_TOKEN, TemplateError};

/// Type alias for Results carrying a classified error.
pub type Result<T> = result::Result<T, ClassifiedError>;

type SharedCause = Arc<dyn Error + Send + Sync + 'static>;

/// Runtime error raised from a registered descriptor.
///
/// # Properties
///
/// - Descriptor and message are fixed at construction
/// - The message is rendered once, borrowed from the template when it has no
///   placeholders
/// - The cause, if any, is shared and exposed through [`Error::source`]
/// - `Send + Sync + Clone`, safe to hand across threads and tasks
///
/// `Display` writes the canonical `[<code>] <effective message>` form.
#[derive(Clone)]
#[must_use = "errors should be handled or logged"]
pub struct ClassifiedError {
    descriptor: &'static ErrorDescriptor,
    message: Cow<'static, str>,
    cause: Option<SharedCause>,
}

impl ClassifiedError {
    #[inline]
    pub(crate) fn from_parts(
        descriptor: &'static ErrorDescriptor,
        message: Cow<'static, str>,
        cause: Option<SharedCause>,
    ) -> Self {
        Self {
            descriptor,
            message,
            cause,
        }
    }

    /// The descriptor this error was raised from.
    #[inline]
    pub const fn descriptor(&self) -> &'static ErrorDescriptor {
        self.descriptor
    }

    /// Bare error name, e.g. `ErrInvalidTimestamp`.
    #[inline]
    pub const fn code(&self) -> &'static str {
        self.descriptor.name()
    }

    /// Severity of the descriptor.
    #[inline]
    pub const fn severity(&self) -> Severity {
        self.descriptor.severity()
    }

    /// Template text after substitution. Does not include the cause.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped error, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Whether this error comes from `descriptor`.
    #[inline]
    pub fn is(&self, descriptor: &ErrorDescriptor) -> bool {
        self.descriptor.name() == descriptor.name()
    }

    /// Borrowed canonical view.
    #[inline]
    pub fn canonical(&self) -> Canonical<'_> {
        Canonical::of(self)
    }
}

impl Classified for ClassifiedError {
    #[inline]
    fn descriptor(&self) -> &'static ErrorDescriptor {
        self.descriptor
    }

    #[inline]
    fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    fn cause(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

impl fmt::Debug for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifiedError")
            .field("code", &format_args!("{}", self.descriptor))
            .field("severity", &self.descriptor.severity())
            .field("message", &self.message)
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Canonical::of(self).write_to(f)
    }
}

impl Error for ClassifiedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::definitions::{ERR_INVALID_TIMESTAMP, ERR_LOAD_RULE, ERR_STORE_TOMBSTONE};
    use std::io;
    use std::thread;

    fn assert_send_sync<T: Send + Sync + 'static>() {}

    #[test]
    fn classified_error_is_send_sync() {
        assert_send_sync::<ClassifiedError>();
        assert_send_sync::<Registry>();
    }

    #[test]
    fn static_template_is_not_copied() {
        let err = ERR_INVALID_TIMESTAMP.instantiate(&[]);
        assert!(matches!(err.message, Cow::Borrowed(_)));
        assert!(std::ptr::eq(err.message().as_ptr(), ERR_INVALID_TIMESTAMP.template().as_ptr()));
    }

    #[test]
    fn accessors() {
        let err = ERR_STORE_TOMBSTONE.instantiate(&[&4]);
        assert_eq!(err.code(), "ErrStoreTombstone");
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.message(), "store 4 has been removed");
        assert!(err.is(&ERR_STORE_TOMBSTONE));
        assert!(!err.is(&ERR_INVALID_TIMESTAMP));
    }

    #[test]
    fn source_exposes_cause() {
        let err = ERR_LOAD_RULE.wrap(io::Error::new(io::ErrorKind::NotFound, "rules.json"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "rules.json");
        assert_eq!(
            source.downcast_ref::<io::Error>().unwrap().kind(),
            io::ErrorKind::NotFound
        );
        assert!(ERR_INVALID_TIMESTAMP.instantiate(&[]).source().is_none());
    }

    #[test]
    fn clone_shares_cause() {
        let err = ERR_LOAD_RULE.wrap(io::Error::other("boom"));
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
        assert!(std::ptr::eq(
            err.cause().unwrap() as *const _ as *const u8,
            copy.cause().unwrap() as *const _ as *const u8
        ));
    }

    #[test]
    fn debug_shows_code_and_cause() {
        let err = ERR_LOAD_RULE.wrap(io::Error::other("boom"));
        let debug = format!("{:?}", err);
        assert!(debug.contains("PD:placement:ErrLoadRule"));
        assert!(debug.contains("boom"));
    }

    #[test]
    fn crosses_threads() {
        let err = ERR_INVALID_TIMESTAMP.wrap(io::Error::other("test error"));
        let rendered = thread::spawn(move || err.to_string()).join().unwrap();
        assert_eq!(rendered, "[PD:tso:ErrInvalidTimestamp] test error");
    }

    #[test]
    fn question_mark_propagation() {
        fn inner() -> Result<u64> {
            Err(ERR_STORE_TOMBSTONE.instantiate(&[&1]))
        }
        fn outer() -> Result<u64> {
            let v = inner()?;
            Ok(v + 1)
        }
        assert!(ERR_STORE_TOMBSTONE.is(&outer().unwrap_err()));
    }
}
