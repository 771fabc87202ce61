//! Macros for defining descriptors and raising classified errors.
//!
//! # Usage
//!
//! ```rust
//! use pd_errs::{define_error_descriptors, instantiate, wrap, namespaces};
//!
//! define_error_descriptors! {
//!     &namespaces::PD, "keyspace" => {
//!         ERR_KEYSPACE_NOT_FOUND = ("ErrKeyspaceNotFound", "keyspace {} not found", Warning),
//!         ERR_KEYSPACE_EXISTS = ("ErrKeyspaceExists", "keyspace already exists", Error),
//!     }
//! }
//!
//! let err = instantiate!(ERR_KEYSPACE_NOT_FOUND, "tenant-a");
//! assert_eq!(err.to_string(), "[PD:keyspace:ErrKeyspaceNotFound] keyspace tenant-a not found");
//!
//! let cause = std::io::Error::other("conflict on /keyspaces/7");
//! let err = wrap!(ERR_KEYSPACE_EXISTS, cause);
//! assert_eq!(err.to_string(), "[PD:keyspace:ErrKeyspaceExists] conflict on /keyspaces/7");
//! ```
//!
//! Identifiers are checked at compile time: a name containing `:` or `]` fails
//! const evaluation of the generated `static`.
//!
//! ```rust,compile_fail
//! use pd_errs::{define_error_descriptors, namespaces};
//!
//! define_error_descriptors! {
//!     &namespaces::PD, "tso" => {
//!         ERR_BROKEN = ("Err:Broken", "broken", Error),
//!     }
//! }
//! ```

/// Define one descriptor as a `pub static`.
///
/// # Example
///
/// ```rust
/// # use pd_errs::{define_error_descriptor, namespaces, Severity};
/// define_error_descriptor!(
///     ERR_TSO_PROXY,
///     &namespaces::PD,
///     "tso",
///     "ErrTSOProxy",
///     "tso proxy failed",
///     Severity::Error
/// );
/// assert_eq!(ERR_TSO_PROXY.to_string(), "PD:tso:ErrTSOProxy");
/// ```
#[macro_export]
macro_rules! define_error_descriptor {
    ($ident:ident, $namespace:expr, $subsystem:literal, $name:literal, $template:literal, $severity:expr) => {
        #[doc = concat!("`", $name, "`: ", $template)]
        pub static $ident: $crate::ErrorDescriptor = $crate::ErrorDescriptor::const_new(
            $namespace,
            $subsystem,
            $name,
            $template,
            $severity,
        );
    };
}

/// Define several descriptors sharing a namespace and subsystem.
///
/// Severity is given as a bare [`crate::Severity`] variant.
#[macro_export]
macro_rules! define_error_descriptors {
    ($namespace:expr, $subsystem:literal => { $( $ident:ident = ($name:literal, $template:literal, $severity:ident) ),+ $(,)? }) => {
        $(
            $crate::define_error_descriptor!(
                $ident,
                $namespace,
                $subsystem,
                $name,
                $template,
                $crate::Severity::$severity
            );
        )+
    };
}

/// Instantiate a descriptor with positional `Display` arguments.
///
/// Expands to [`crate::ErrorDescriptor::instantiate`].
#[macro_export]
macro_rules! instantiate {
    ($descriptor:expr $(, $arg:expr)* $(,)?) => {
        $descriptor.instantiate(&[$( &$arg as &dyn ::std::fmt::Display ),*])
    };
}

/// Wrap a cause, optionally filling the template with positional arguments.
///
/// Expands to [`crate::ErrorDescriptor::wrap_with`].
#[macro_export]
macro_rules! wrap {
    ($descriptor:expr, $cause:expr $(, $arg:expr)* $(,)?) => {
        $descriptor.wrap_with($cause, &[$( &$arg as &dyn ::std::fmt::Display ),*])
    };
}

// ============================================================================
// Tests
// ============================================================================
