//! Error code registry.
//!
//! # Lifecycle
//!
//! 1. **Population**: a [`RegistryBuilder`] is filled on one thread during process
//!    start. Reserved descriptors go in first, then the service table.
//! 2. **Sealing**: [`RegistryBuilder::build`] moves the table into a [`Registry`].
//!    From then on it is read-only, `Send + Sync`, and needs no locks.
//!
//! There is no registration after sealing, so the set of codes is finite and can
//! be enumerated for documentation and tooling with [`Registry::iter`].
//!
//! # Uniqueness
//!
//! `name` is unique across the whole registry. Two descriptors with the same name
//! collide even if their namespaces or subsystems differ. A collision is a
//! programming error: [`Registry::standard`] aborts start-up on it.
//!
//! # Example
//!
//! ```rust
//! use pd_errs::{Registry, Severity, definitions, namespaces};
//! use std::sync::Arc;
//!
//! let mut builder = Registry::builder();
//! builder.register_all(definitions::ALL).unwrap();
//! builder
//!     .define(&namespaces::PD, "keyspace", "ErrKeyspaceNotFound", "keyspace {} not found", Severity::Warning)
//!     .unwrap();
//! let registry = Arc::new(builder.build());
//!
//! let descriptor = registry.lookup("ErrKeyspaceNotFound").unwrap();
//! assert_eq!(descriptor.to_string(), "PD:keyspace:ErrKeyspaceNotFound");
//! ```

use crate::codes::DescriptorViolation;
use crate::{ErrorDescriptor, ErrorNamespace, Severity, definitions};
use std::collections::HashMap;
use thiserror::Error;

/// Why a descriptor was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A descriptor with the same name is already registered.
    #[error("duplicate error name {name}: {existing} already registered, refusing {rejected}")]
    DuplicateName {
        /// Contested name.
        name: &'static str,
        /// Code text of the descriptor already registered.
        existing: String,
        /// Code text of the descriptor turned away.
        rejected: String,
    },
    /// The descriptor breaks the identifier or template policy.
    #[error(transparent)]
    Invalid(#[from] DescriptorViolation),
}

// ============================================================================
// Builder (population phase)
// ============================================================================

/// Mutable registry used during process start.
#[derive(Debug)]
pub struct RegistryBuilder {
    by_name: HashMap<&'static str, &'static ErrorDescriptor>,
    ordered: Vec<&'static ErrorDescriptor>,
}

impl RegistryBuilder {
    /// Builder holding only the reserved descriptors.
    pub fn new() -> Self {
        let mut builder = Self {
            by_name: HashMap::with_capacity(definitions::ALL.len() + definitions::RESERVED.len()),
            ordered: Vec::with_capacity(definitions::ALL.len() + definitions::RESERVED.len()),
        };
        for &descriptor in definitions::RESERVED {
            builder.insert(descriptor);
        }
        builder
    }

    /// Register a static descriptor.
    ///
    /// Returns the same reference on success, so call sites can keep it as
    /// their handle.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateName`] if the name is taken,
    /// [`RegistryError::Invalid`] if the descriptor fails validation.
    pub fn register(
        &mut self,
        descriptor: &'static ErrorDescriptor,
    ) -> Result<&'static ErrorDescriptor, RegistryError> {
        descriptor.validate()?;
        self.check_vacant(descriptor.name(), descriptor)?;
        self.insert(descriptor);
        Ok(descriptor)
    }

    /// Register every descriptor of a static table, stopping at the first error.
    pub fn register_all(
        &mut self,
        table: &[&'static ErrorDescriptor],
    ) -> Result<(), RegistryError> {
        for &descriptor in table {
            self.register(descriptor)?;
        }
        Ok(())
    }

    /// Define and register a descriptor from its parts.
    ///
    /// The descriptor is allocated once and lives for the rest of the process,
    /// like the ones in `static` tables.
    pub fn define(
        &mut self,
        namespace: &'static ErrorNamespace,
        subsystem: &'static str,
        name: &'static str,
        template: &'static str,
        severity: Severity,
    ) -> Result<&'static ErrorDescriptor, RegistryError> {
        let descriptor = ErrorDescriptor::checked_new(namespace, subsystem, name, template, severity)?;
        self.check_vacant(name, &descriptor)?;
        let descriptor: &'static ErrorDescriptor = Box::leak(Box::new(descriptor));
        self.insert(descriptor);
        Ok(descriptor)
    }

    /// Number of descriptors registered so far, reserved ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Seal the registry.
    pub fn build(self) -> Registry {
        tracing::debug!(descriptors = self.ordered.len(), "error code registry sealed");
        Registry {
            by_name: self.by_name,
            ordered: self.ordered.into_boxed_slice(),
        }
    }

    fn check_vacant(
        &self,
        name: &'static str,
        candidate: &ErrorDescriptor,
    ) -> Result<(), RegistryError> {
        match self.by_name.get(name) {
            Some(existing) => Err(RegistryError::DuplicateName {
                name,
                existing: existing.to_string(),
                rejected: candidate.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, descriptor: &'static ErrorDescriptor) {
        self.by_name.insert(descriptor.name(), descriptor);
        self.ordered.push(descriptor);
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Registry (read-only phase)
// ============================================================================

/// Sealed, read-only set of error codes.
///
/// Pass it (or an `Arc` of it) to the components that need lookups; there is no
/// process-global instance.
#[derive(Debug)]
pub struct Registry {
    by_name: HashMap<&'static str, &'static ErrorDescriptor>,
    ordered: Box<[&'static ErrorDescriptor]>,
}

impl Registry {
    /// Start a population phase.
    #[inline]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding the reserved descriptors and [`definitions::ALL`].
    ///
    /// # Panics
    ///
    /// If the static table conflicts with itself. See [`Registry::from_table`].
    pub fn standard() -> Self {
        Self::from_table(definitions::ALL)
    }

    /// Fallible form of [`Registry::standard`].
    pub fn try_standard() -> Result<Self, RegistryError> {
        Self::try_from_table(definitions::ALL)
    }

    /// Registry holding the reserved descriptors and `table`.
    ///
    /// # Panics
    ///
    /// If `table` conflicts with itself or with a reserved descriptor. Call
    /// this before serving traffic; a shadowed error code must not reach
    /// production.
    pub fn from_table(table: &[&'static ErrorDescriptor]) -> Self {
        match Self::try_from_table(table) {
            Ok(registry) => registry,
            Err(err) => {
                tracing::error!(error = %err, "invalid error code table");
                panic!("invalid error code table: {err}");
            }
        }
    }

    /// Fallible form of [`Registry::from_table`].
    pub fn try_from_table(table: &[&'static ErrorDescriptor]) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder.register_all(table)?;
        Ok(builder.build())
    }

    /// Find a descriptor by name.
    ///
    /// Returns the exact instance that was registered.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&'static ErrorDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Whether `name` is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of descriptors, reserved ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the registry holds nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Descriptors in registration order, reserved ones first.
    pub fn iter(&self) -> impl Iterator<Item = &'static ErrorDescriptor> + '_ {
        self.ordered.iter().copied()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'static ErrorDescriptor;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, &'static ErrorDescriptor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter().copied()
    }
}

// ============================================================================
// Tests
// ============================================================================
