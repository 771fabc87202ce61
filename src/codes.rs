//! Error identity: namespaces and descriptors.
//!
//! A descriptor is one registry entry: `namespace`, `subsystem`, `name`, message
//! template and [`Severity`]. Its RFC code text, `PD:tso:ErrInvalidTimestamp`, is
//! what operators and tooling grep for, so the three identifiers are frozen:
//!
//! - non-empty
//! - no `:`, `[`, `]` or whitespace (they would break the bracket format)
//! - with `strict_taxonomy`: names start with `Err`, subsystems are lowercase
//!
//! # Construction APIs
//!
//! - [`ErrorDescriptor::const_new`]: for `static` tables. A violation is a compile
//!   error in const context.
//! - [`ErrorDescriptor::checked_new`]: for runtime definition. Returns
//!   [`DescriptorViolation`], never panics, and also validates the template.
//!
//! # Example
//!
//! ```rust
//! use pd_errs::{ErrorDescriptor, Severity, namespaces};
//!
//! static ERR_LEADER_NIL: ErrorDescriptor = ErrorDescriptor::const_new(
//!     &namespaces::PD,
//!     "member",
//!     "ErrLeaderNil",
//!     "leader is nil",
//!     Severity::Warning,
//! );
//!
//! assert_eq!(ERR_LEADER_NIL.to_string(), "PD:member:ErrLeaderNil");
//! let err = ERR_LEADER_NIL.instantiate(&[]);
//! assert_eq!(err.to_string(), "[PD:member:ErrLeaderNil] leader is nil");
//! ```

use crate::template::{self, TemplateError};
use crate::{ClassifiedError, Severity, definitions};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Error Namespace (Frozen Identity)
// ============================================================================

/// Product tag that prefixes every code, e.g. `PD`.
///
/// Private field: only the instances in [`namespaces`] exist.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorNamespace {
    name: &'static str,
    _private: (),
}

impl ErrorNamespace {
    #[doc(hidden)]
    pub const fn __internal_new(name: &'static str) -> Self {
        assert!(is_valid_identifier(name), "Invalid namespace identifier");
        Self { name, _private: () }
    }

    /// Tag as it appears inside the brackets.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ErrorNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Canonical namespace instances.
pub mod namespaces {
    use super::ErrorNamespace;

    /// Placement driver.
    pub const PD: ErrorNamespace = ErrorNamespace::__internal_new("PD");
}

// ============================================================================
// Identifier Policy
// ============================================================================

/// Whether `s` can appear between the brackets of a rendered code.
pub const fn is_valid_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b':' | b'[' | b']' | b' ' | b'\t' | b'\n' | b'\r' => return false,
            _ => {}
        }
        i += 1;
    }
    true
}

mod taxonomy_policy {
    #[cfg(feature = "strict_taxonomy")]
    pub(super) const fn name_permitted(name: &str) -> bool {
        let b = name.as_bytes();
        b.len() > 3 && b[0] == b'E' && b[1] == b'r' && b[2] == b'r'
    }

    #[cfg(feature = "strict_taxonomy")]
    pub(super) const fn subsystem_permitted(subsystem: &str) -> bool {
        let b = subsystem.as_bytes();
        let mut i = 0;
        while i < b.len() {
            if !(b[i].is_ascii_lowercase() || b[i].is_ascii_digit() || b[i] == b'_') {
                return false;
            }
            i += 1;
        }
        true
    }

    #[cfg(not(feature = "strict_taxonomy"))]
    pub(super) const fn name_permitted(_name: &str) -> bool {
        true
    }

    #[cfg(not(feature = "strict_taxonomy"))]
    pub(super) const fn subsystem_permitted(_subsystem: &str) -> bool {
        true
    }
}

/// Why a descriptor cannot be defined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorViolation {
    /// Subsystem is empty or contains a reserved character.
    #[error("invalid subsystem '{value}': {reason}")]
    InvalidSubsystem {
        /// Rejected subsystem.
        value: &'static str,
        /// Policy that was broken.
        reason: &'static str,
    },
    /// Name is empty or contains a reserved character.
    #[error("invalid error name '{value}': {reason}")]
    InvalidName {
        /// Rejected name.
        value: &'static str,
        /// Policy that was broken.
        reason: &'static str,
    },
    /// Message template does not parse.
    #[error("invalid message template for {name}: {source}")]
    Template {
        /// Descriptor whose template failed.
        name: &'static str,
        /// Parse failure.
        #[source]
        source: TemplateError,
    },
}

const RESERVED_CHARS: &str = "must be non-empty without ':', '[', ']' or whitespace";

// ============================================================================
// Error Descriptor
// ============================================================================

/// Immutable registry entry for one error code.
///
/// Descriptors live for the whole process and are shared as
/// `&'static ErrorDescriptor`. Equality and hashing cover every field; the
/// registry enforces uniqueness on `name` alone.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorDescriptor {
    namespace: &'static ErrorNamespace,
    subsystem: &'static str,
    name: &'static str,
    template: &'static str,
    severity: Severity,
}

impl ErrorDescriptor {
    /// Create a descriptor for a `static` table.
    ///
    /// # Panics
    ///
    /// If `subsystem` or `name` violates the identifier policy. In const
    /// context this is a compile error. The template is validated when the
    /// descriptor is registered.
    pub const fn const_new(
        namespace: &'static ErrorNamespace,
        subsystem: &'static str,
        name: &'static str,
        template: &'static str,
        severity: Severity,
    ) -> Self {
        assert!(is_valid_identifier(subsystem), "Invalid subsystem identifier");
        assert!(is_valid_identifier(name), "Invalid error name identifier");
        assert!(
            taxonomy_policy::subsystem_permitted(subsystem),
            "Subsystem not permitted by taxonomy"
        );
        assert!(
            taxonomy_policy::name_permitted(name),
            "Error name not permitted by taxonomy"
        );

        Self {
            namespace,
            subsystem,
            name,
            template,
            severity,
        }
    }

    /// Create a descriptor with runtime validation.
    ///
    /// # Errors
    ///
    /// Returns the first policy violation, including template syntax errors.
    pub fn checked_new(
        namespace: &'static ErrorNamespace,
        subsystem: &'static str,
        name: &'static str,
        template: &'static str,
        severity: Severity,
    ) -> Result<Self, DescriptorViolation> {
        let descriptor = Self {
            namespace,
            subsystem,
            name,
            template,
            severity,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Re-run every check `checked_new` performs.
    ///
    /// Used by the registry, since `const_new` cannot parse templates.
    pub fn validate(&self) -> Result<(), DescriptorViolation> {
        if !is_valid_identifier(self.subsystem) {
            return Err(DescriptorViolation::InvalidSubsystem {
                value: self.subsystem,
                reason: RESERVED_CHARS,
            });
        }
        if !taxonomy_policy::subsystem_permitted(self.subsystem) {
            return Err(DescriptorViolation::InvalidSubsystem {
                value: self.subsystem,
                reason: "must be lowercase",
            });
        }
        if !is_valid_identifier(self.name) {
            return Err(DescriptorViolation::InvalidName {
                value: self.name,
                reason: RESERVED_CHARS,
            });
        }
        if !taxonomy_policy::name_permitted(self.name) {
            return Err(DescriptorViolation::InvalidName {
                value: self.name,
                reason: "must start with 'Err'",
            });
        }
        template::arity(self.template).map_err(|source| DescriptorViolation::Template {
            name: self.name,
            source,
        })?;
        Ok(())
    }

    /// Owning namespace.
    #[inline]
    pub const fn namespace(&self) -> &'static ErrorNamespace {
        self.namespace
    }

    /// Subsystem within the namespace.
    #[inline]
    pub const fn subsystem(&self) -> &'static str {
        self.subsystem
    }

    /// Registry-unique error name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Unrendered message template.
    #[inline]
    pub const fn template(&self) -> &'static str {
        self.template
    }

    /// Advisory severity; picks the default log level.
    #[inline]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Instantiate with positional arguments and no cause.
    ///
    /// The message is rendered here, once. An argument count that does not match
    /// the template yields an `ErrFormatTemplate` error describing the mismatch
    /// instead of panicking.
    pub fn instantiate(&'static self, args: &[&dyn fmt::Display]) -> ClassifiedError {
        match template::render_strict(self.template, args) {
            Ok(message) => ClassifiedError::from_parts(self, message, None),
            Err(err) => self.format_failure(&err),
        }
    }

    /// Wrap an underlying error.
    ///
    /// The cause's own text is kept verbatim and becomes the effective message
    /// when rendered. Unfilled placeholders in the template get the missing token.
    pub fn wrap<E>(&'static self, cause: E) -> ClassifiedError
    where
        E: Error + Send + Sync + 'static,
    {
        self.wrap_shared(Arc::new(cause), &[])
    }

    /// Wrap an underlying error, filling the template with `args`.
    pub fn wrap_with<E>(&'static self, cause: E, args: &[&dyn fmt::Display]) -> ClassifiedError
    where
        E: Error + Send + Sync + 'static,
    {
        self.wrap_shared(Arc::new(cause), args)
    }

    /// Wrap a cause that is already shared or boxed.
    pub fn wrap_shared(
        &'static self,
        cause: Arc<dyn Error + Send + Sync + 'static>,
        args: &[&dyn fmt::Display],
    ) -> ClassifiedError {
        let message = template::render_lenient(self.template, args);
        ClassifiedError::from_parts(self, message, Some(cause))
    }

    /// Whether `err`, or anything in its `source()` chain, was raised from this
    /// descriptor.
    pub fn is(&self, err: &(dyn Error + 'static)) -> bool {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(classified) = e.downcast_ref::<ClassifiedError>() {
                if classified.descriptor().name == self.name {
                    return true;
                }
            }
            current = e.source();
        }
        false
    }

    fn format_failure(&'static self, err: &TemplateError) -> ClassifiedError {
        let reserved = &definitions::ERR_FORMAT_TEMPLATE;
        let message = template::render_lenient(reserved.template, &[self, err]);
        ClassifiedError::from_parts(reserved, message, None)
    }
}

impl fmt::Display for ErrorDescriptor {
    /// Code text, `<namespace>:<subsystem>:<name>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace.as_str(), self.subsystem, self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
