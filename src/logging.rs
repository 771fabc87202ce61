//! Bridge from classified errors to `tracing` fields.
//!
//! # Lazy Rendering
//!
//! [`ErrorField`] borrows the error and renders only when a subscriber records
//! the field. Events below the active level never pay for formatting.
//!
//! # Field Layout
//!
//! | key     | classified error                       | plain error      |
//! |---------|----------------------------------------|------------------|
//! | `error` | `[PD:tso:ErrInvalidTimestamp] <text>`  | error's own text |
//! | `code`  | `ErrInvalidTimestamp`                  | absent           |
//!
//! Callers must not assume every logged error carries a code.
//!
//! # Dispatch
//!
//! The `&dyn Error` entry points ([`error_field`], [`code_field`], [`emit`],
//! [`emit_at`]) recognize [`ClassifiedError`] by downcasting. Other error types
//! that implement [`Classified`] go through the `classified_*` and
//! `emit_classified*` entry points, which take the capability directly.
//!
//! # Example
//!
//! ```rust
//! use pd_errs::{definitions, logging};
//!
//! let err = definitions::ERR_INVALID_TIMESTAMP.instantiate(&[]);
//! tracing::error!(
//!     error = logging::error_field(&err),
//!     code = logging::code_field(&err),
//!     "allocate tso failed"
//! );
//!
//! // Descriptor plus raw cause, no ClassifiedError allocated:
//! let cause = std::io::Error::other("test error");
//! tracing::error!(
//!     error = logging::wrap_field(&definitions::ERR_INVALID_TIMESTAMP, &cause),
//!     "allocate tso failed"
//! );
//! ```

use crate::{Canonical, Classified, ClassifiedError, ErrorDescriptor};
use std::error::Error;
use std::fmt;
use tracing::Level;
use tracing::field::{DisplayValue, display};

enum Source<'a> {
    Classified(&'a (dyn Classified + 'a)),
    Plain(&'a (dyn Error + 'a)),
}

/// Borrowed error ready to be recorded as a log field.
///
/// Cannot outlive the error it was taken from.
pub struct ErrorField<'a> {
    source: Source<'a>,
}

impl<'a> ErrorField<'a> {
    /// Field for any type implementing [`Classified`].
    #[inline]
    pub fn classified(err: &'a (dyn Classified + 'a)) -> Self {
        Self {
            source: Source::Classified(err),
        }
    }

    /// Field for an unclassified error; renders its own text, no code.
    #[inline]
    pub fn plain(err: &'a (dyn Error + 'a)) -> Self {
        Self {
            source: Source::Plain(err),
        }
    }

    /// Dispatch on the concrete type: [`ClassifiedError`] gets the canonical
    /// form, anything else falls back to [`ErrorField::plain`].
    pub fn from_dyn(err: &'a (dyn Error + 'static)) -> Self {
        match err.downcast_ref::<ClassifiedError>() {
            Some(classified) => Self::classified(classified),
            None => Self::plain(err),
        }
    }

    /// Descriptor behind the field, if classified.
    #[inline]
    pub fn descriptor(&self) -> Option<&'static ErrorDescriptor> {
        match self.source {
            Source::Classified(err) => Some(err.descriptor()),
            Source::Plain(_) => None,
        }
    }

    /// Bare error name, if classified.
    #[inline]
    pub fn code(&self) -> Option<&'static str> {
        self.descriptor().map(ErrorDescriptor::name)
    }

    /// Whether the field renders in canonical form.
    #[inline]
    pub fn is_classified(&self) -> bool {
        matches!(self.source, Source::Classified(_))
    }

    /// Level [`emit`] picks: the severity's default, ERROR when unclassified.
    #[inline]
    pub fn default_level(&self) -> Level {
        self.descriptor()
            .map_or(Level::ERROR, |descriptor| descriptor.severity().default_level())
    }

    /// Write the field value without allocating.
    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self.source {
            Source::Classified(err) => Canonical::of(err).write_to(out),
            Source::Plain(err) => write!(out, "{}", err),
        }
    }
}

impl fmt::Display for ErrorField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl fmt::Debug for ErrorField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorField")
            .field("code", &self.code())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Field constructors
// ============================================================================

/// `error` field value for any error.
///
/// Only [`ClassifiedError`] is recognized here; use [`classified_field`] for
/// other [`Classified`] types.
///
/// ```rust
/// # use pd_errs::{definitions, logging};
/// let err = definitions::ERR_STORE_NOT_FOUND.instantiate(&[&1]);
/// tracing::warn!(error = logging::error_field(&err), "heartbeat rejected");
/// ```
#[inline]
pub fn error_field<'a>(err: &'a (dyn Error + 'static)) -> DisplayValue<ErrorField<'a>> {
    display(ErrorField::from_dyn(err))
}

/// `error` field value for a custom [`Classified`] type.
#[inline]
pub fn classified_field<'a>(err: &'a (dyn Classified + 'a)) -> DisplayValue<ErrorField<'a>> {
    display(ErrorField::classified(err))
}

/// `code` field value: the bare name, or `None` for plain errors.
///
/// `tracing` skips `None` fields entirely.
#[inline]
pub fn code_field(err: &(dyn Error + 'static)) -> Option<&'static str> {
    ErrorField::from_dyn(err).code()
}

/// `code` field value for a custom [`Classified`] type.
#[inline]
pub fn classified_code_field(err: &dyn Classified) -> &'static str {
    err.code()
}

/// `error` field for a descriptor and a raw cause: `[<code>] <cause text>`.
#[inline]
pub fn wrap_field<'a>(
    descriptor: &'static ErrorDescriptor,
    cause: &'a (dyn Error + 'a),
) -> DisplayValue<Canonical<'a>> {
    display(Canonical::with_cause(descriptor, cause))
}

// ============================================================================
// Emission
// ============================================================================

/// Log `err` at its descriptor's default level.
///
/// Plain errors are logged at ERROR. Fields: `error`, and `code` when classified.
pub fn emit(err: &(dyn Error + 'static), message: &str) {
    let field = ErrorField::from_dyn(err);
    record(field.default_level(), &field, message);
}

/// Log `err` at an explicit level, overriding its severity.
pub fn emit_at(level: Level, err: &(dyn Error + 'static), message: &str) {
    record(level, &ErrorField::from_dyn(err), message);
}

/// [`emit`] for any type implementing [`Classified`].
pub fn emit_classified(err: &dyn Classified, message: &str) {
    let field = ErrorField::classified(err);
    record(field.default_level(), &field, message);
}

/// [`emit_at`] for any type implementing [`Classified`].
pub fn emit_classified_at(level: Level, err: &dyn Classified, message: &str) {
    record(level, &ErrorField::classified(err), message);
}

fn record(level: Level, field: &ErrorField<'_>, message: &str) {
    let code = field.code();
    if level == Level::ERROR {
        tracing::error!(error = %field, code = code, "{}", message);
    } else if level == Level::WARN {
        tracing::warn!(error = %field, code = code, "{}", message);
    } else if level == Level::INFO {
        tracing::info!(error = %field, code = code, "{}", message);
    } else if level == Level::DEBUG {
        tracing::debug!(error = %field, code = code, "{}", message);
    } else {
        tracing::trace!(error = %field, code = code, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{
        ERR_INVALID_TIMESTAMP, ERR_NOT_LEADER, ERR_REGION_NOT_FOUND, ERR_STORE_TOMBSTONE,
    };
    use crate::Severity;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    /// Plain error counting how often it is rendered.
    #[derive(Debug)]
    struct CountingError(Arc<AtomicUsize>);

    impl fmt::Display for CountingError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("counted")
        }
    }

    impl Error for CountingError {}

    /// Custom error type carrying the capability.
    #[derive(Debug)]
    struct LeaseExpired;

    impl fmt::Display for LeaseExpired {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("lease expired")
        }
    }

    impl Error for LeaseExpired {}

    impl Classified for LeaseExpired {
        fn descriptor(&self) -> &'static ErrorDescriptor {
            &ERR_NOT_LEADER
        }

        fn message(&self) -> &str {
            "lease expired"
        }

        fn cause(&self) -> Option<&(dyn Error + 'static)> {
            None
        }
    }

    #[test]
    fn classified_field_renders_canonical_form() {
        let err = ERR_INVALID_TIMESTAMP.instantiate(&[]);
        let field = ErrorField::from_dyn(&err);
        assert!(field.is_classified());
        assert_eq!(field.code(), Some("ErrInvalidTimestamp"));
        assert_eq!(field.to_string(), "[PD:tso:ErrInvalidTimestamp] invalid timestamp");
    }

    #[test]
    fn plain_field_has_no_bracket() {
        let err = io::Error::other("connection reset");
        let field = ErrorField::from_dyn(&err);
        assert!(!field.is_classified());
        assert_eq!(field.code(), None);
        assert_eq!(field.to_string(), "connection reset");
        assert_eq!(code_field(&err), None);
    }

    #[test]
    fn custom_classified_type() {
        let field = ErrorField::classified(&LeaseExpired);
        assert_eq!(field.to_string(), "[PD:member:ErrNotLeader] lease expired");
        assert_eq!(field.code(), Some("ErrNotLeader"));
    }

    #[test]
    fn custom_classified_type_through_capability_entry_points() {
        let err = LeaseExpired;
        assert_eq!(classified_field(&err).to_string(), "[PD:member:ErrNotLeader] lease expired");
        assert_eq!(classified_code_field(&err), "ErrNotLeader");
        assert_eq!(ErrorField::classified(&err).default_level(), Level::INFO);

        // The error-taking path only knows ClassifiedError.
        assert_eq!(code_field(&err), None);
        assert_eq!(ErrorField::from_dyn(&err).default_level(), Level::ERROR);
    }

    #[test]
    fn field_is_not_rendered_when_level_disabled() {
        let renders = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::ERROR)
            .with_writer(io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let cause = CountingError(Arc::clone(&renders));
            let err = ERR_STORE_TOMBSTONE.wrap(io::Error::other("unused"));
            emit_at(Level::DEBUG, &cause, "skipped");
            tracing::debug!(error = wrap_field(&ERR_STORE_TOMBSTONE, &cause), "skipped");
            tracing::info!(error = error_field(&err), "skipped");
        });
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn field_is_rendered_when_enabled() {
        let renders = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let cause = CountingError(Arc::clone(&renders));
            emit_at(Level::ERROR, &cause, "recorded");
        });
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[traced_test]
    #[test]
    fn emit_writes_error_and_code_fields() {
        emit(&ERR_REGION_NOT_FOUND.instantiate(&[&12]), "get region");
        assert!(logs_contain("get region"));
        assert!(logs_contain("error=[PD:region:ErrRegionNotFound] region 12 not found"));
        assert!(logs_contain("code=\"ErrRegionNotFound\""));
    }

    #[traced_test]
    #[test]
    fn emit_uses_descriptor_severity() {
        assert_eq!(ERR_STORE_TOMBSTONE.severity(), Severity::Warning);
        emit(&ERR_STORE_TOMBSTONE.instantiate(&[&3]), "store heartbeat");
        assert!(logs_contain("WARN"));
        assert!(logs_contain("store 3 has been removed"));
    }

    #[traced_test]
    #[test]
    fn emit_plain_error_omits_code() {
        emit(&io::Error::other("socket closed"), "stream broken");
        assert!(logs_contain("error=socket closed"));
        assert!(!logs_contain("code="));
        assert!(logs_contain("ERROR"));
    }

    #[traced_test]
    #[test]
    fn emit_at_overrides_level() {
        emit_at(Level::INFO, &ERR_INVALID_TIMESTAMP.instantiate(&[]), "retrying");
        assert!(logs_contain("INFO"));
        assert!(logs_contain("[PD:tso:ErrInvalidTimestamp] invalid timestamp"));
    }

    #[traced_test]
    #[test]
    fn emit_classified_uses_capability() {
        emit_classified(&LeaseExpired, "campaign lost");
        assert!(logs_contain("INFO"));
        assert!(logs_contain("error=[PD:member:ErrNotLeader] lease expired"));
        assert!(logs_contain("code=\"ErrNotLeader\""));
    }

    #[traced_test]
    #[test]
    fn emit_classified_at_overrides_level() {
        emit_classified_at(Level::WARN, &LeaseExpired, "campaign lost");
        assert!(logs_contain("WARN"));
        assert!(logs_contain("[PD:member:ErrNotLeader] lease expired"));
    }
}
