//! Error types for link operations

use crate::types::{LinkId, Role};
use smol_str::SmolStr;
use std::error::Error;
use std::fmt;

/// Boxed error type for error sources
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Result type alias for caller-facing link operations
pub type Result<T> = std::result::Result<T, LinksError>;

/// Errors surfaced to callers of the pagination engine, the mutation guard
/// and the lookup helpers.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LinksError {
    /// No caller identity, or the identity does not resolve to a known user
    #[error("not authenticated")]
    #[diagnostic(
        code(linkshelf::unauthenticated),
        help("sign in with an account that exists in this service")
    )]
    Unauthenticated,

    /// The caller is known but lacks the elevated role
    #[error("{email} has role {role}, creating links requires {required}", required = Role::Admin)]
    #[diagnostic(code(linkshelf::forbidden))]
    Forbidden {
        /// The caller's email
        email: SmolStr,
        /// The role the caller actually holds
        role: Role,
    },

    /// The supplied cursor does not name any link
    #[error("cursor {0} does not match any link")]
    #[diagnostic(
        code(linkshelf::invalid_cursor),
        help("cursors are the endCursor values returned by a previous page")
    )]
    InvalidCursor(LinkId),

    /// The requested link does not exist
    #[error("link not found: {0}")]
    #[diagnostic(code(linkshelf::link_not_found))]
    LinkNotFound(LinkId),

    /// The backing store failed
    #[error("store error: {0}")]
    Store(
        #[from]
        #[diagnostic_source]
        StoreError,
    ),
}

/// Store operation error with rich diagnostics
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub struct StoreError {
    kind: StoreErrorKind,
    #[source]
    source: Option<BoxError>,
    #[help]
    help: Option<String>,
    context: Option<String>,
}

/// Error categories for store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A referenced key (link id, cursor) is absent
    NotFound,
    /// A unique key is already taken
    Conflict,
    /// The store could not be reached
    Unavailable,
    /// Anything else
    Other,
}

impl StoreError {
    /// Create a new error with the given kind and optional source
    pub fn new(kind: StoreErrorKind, source: Option<BoxError>) -> Self {
        Self {
            kind,
            source,
            help: None,
            context: None,
        }
    }

    /// Add a help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add context information to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Create a not found error
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::new(StoreErrorKind::NotFound, None)
            .with_context(format!("{} not found: {}", resource, id))
    }

    /// Create an already exists error
    pub fn conflict(resource: &str, id: impl fmt::Display) -> Self {
        Self::new(StoreErrorKind::Conflict, None)
            .with_context(format!("{} already exists: {}", resource, id))
    }

    /// Create an unavailable error
    pub fn unavailable(source: impl Error + Send + Sync + 'static) -> Self {
        Self::new(StoreErrorKind::Unavailable, Some(Box::new(source)))
            .with_help("check that the backing store is reachable")
    }

    /// Create a generic error from a message
    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, Some(msg.into().into()))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;

        if let Some(ctx) = &self.context {
            write!(f, ": {}", ctx)?;
        }

        if let Some(src) = &self.source {
            write!(f, ": {}", src)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_includes_context() {
        let err = StoreError::not_found("link", "42");
        assert_eq!(err.kind(), StoreErrorKind::NotFound);
        assert_eq!(err.to_string(), "NotFound: link not found: 42");
    }

    #[test]
    fn forbidden_names_both_roles() {
        let err = LinksError::Forbidden {
            email: SmolStr::new_static("bob@example.com"),
            role: Role::User,
        };
        assert_eq!(
            err.to_string(),
            "bob@example.com has role USER, creating links requires ADMIN"
        );
    }

    #[test]
    fn store_errors_convert() {
        let err: LinksError = StoreError::other("disk on fire").into();
        assert!(matches!(err, LinksError::Store(ref e) if e.kind() == StoreErrorKind::Other));
        assert_eq!(err.to_string(), "store error: Other: disk on fire");
    }
}
