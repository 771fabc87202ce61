//! Classification metadata shared by descriptors and the log adapter.
//!
//! # Severity
//!
//! Every descriptor carries a [`Severity`]. It is advisory: it picks the default
//! `tracing` level when an error is emitted through [`crate::logging::emit`], and a
//! caller may always override it with [`crate::logging::emit_at`].
//!
//! # Capability
//!
//! [`Classified`] is the capability the log adapter dispatches on. The crate's own
//! [`crate::ClassifiedError`] implements it, and so can any other error type that
//! carries a descriptor and a pre-rendered message.

use crate::ErrorDescriptor;
use std::error::Error;
use std::fmt;
use tracing::Level;

// ============================================================================
// Severity
// ============================================================================

/// Severity class of an error code.
///
/// # Copy Semantics
///
/// Small metadata enum, passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Expected condition worth recording (a stale request, a redirect).
    Informational,
    /// Degraded but self-healing condition.
    Warning,
    /// Operation failed.
    Error,
    /// The component cannot keep serving.
    Fatal,
}

impl Severity {
    /// Lowercase label used in structured output.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "info",
            Self::Warning => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Default log level for errors of this severity.
    ///
    /// `tracing` has no level above ERROR, so `Fatal` shares it.
    #[inline]
    pub const fn default_level(self) -> Level {
        match self {
            Self::Informational => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Fatal => Level::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classified Capability
// ============================================================================

/// An error value tied to a registered descriptor.
///
/// Implementors must keep `descriptor()` and `message()` stable for the lifetime
/// of the value: rendering the same error twice yields identical text.
pub trait Classified: fmt::Debug {
    /// The registry entry this error was raised from.
    fn descriptor(&self) -> &'static ErrorDescriptor;

    /// Message rendered from the descriptor's template at construction.
    fn message(&self) -> &str;

    /// Underlying error, if this value wraps one.
    fn cause(&self) -> Option<&(dyn Error + 'static)>;

    /// Bare error name, e.g. `ErrInvalidTimestamp`.
    #[inline]
    fn code(&self) -> &'static str {
        self.descriptor().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_maps_to_default_level() {
        assert_eq!(Severity::Informational.default_level(), Level::INFO);
        assert_eq!(Severity::Warning.default_level(), Level::WARN);
        assert_eq!(Severity::Error.default_level(), Level::ERROR);
        assert_eq!(Severity::Fatal.default_level(), Level::ERROR);
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Informational < Severity::Warning);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Fatal.to_string(), "fatal");
        assert_eq!(Severity::Warning.to_string(), "warn");
    }
}
