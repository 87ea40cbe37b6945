//! Caller identity extraction
//!
//! Authentication happens upstream (a gateway, a session layer). By the time a
//! request reaches this service the authenticator has put the caller's email in
//! a trusted header, `x-user-email` unless configured otherwise. A request
//! without the header is anonymous, which is fine for reads; the mutation
//! guard decides what anonymous callers may do.
//!
//! # Example
//!
//! ```no_run
//! use axum::{Router, routing::get};
//! use linkshelf_axum::identity::{ExtractIdentity, IdentityConfig};
//!
//! async fn whoami(ExtractIdentity(identity): ExtractIdentity) -> String {
//!     match identity {
//!         Some(identity) => format!("signed in as {}", identity.email()),
//!         None => "anonymous".to_string(),
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .route("/whoami", get(whoami))
//!         .with_state(IdentityConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
//!         .await
//!         .unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderName, HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use linkshelf_core::Identity;
use serde_json::json;
use thiserror::Error;

/// Header read when nothing else is configured
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-email";

/// Trait for state types that know where the caller identity lives.
///
/// Lets the app state carry identity configuration without the extractor
/// requiring `IdentityConfig` as the state type itself.
pub trait ResolveIdentity {
    /// Identity extraction settings
    fn identity_config(&self) -> &IdentityConfig;
}

/// Where to find the caller identity on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    header: HeaderName,
}

impl IdentityConfig {
    /// Read the identity from `header`
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// Parse a header name, as it appears in config files
    pub fn from_header_name(name: &str) -> Result<Self, InvalidHeaderName> {
        let header =
            HeaderName::try_from(name).map_err(|_| InvalidHeaderName(name.to_string()))?;
        Ok(Self { header })
    }

    /// The header carrying the caller's email
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
        }
    }
}

impl ResolveIdentity for IdentityConfig {
    fn identity_config(&self) -> &IdentityConfig {
        self
    }
}

/// Axum extractor for the optional caller identity.
///
/// Yields `None` when the identity header is absent. A header that is present
/// but unusable is rejected instead of being treated as anonymous.
pub struct ExtractIdentity(pub Option<Identity>);

/// Errors that can occur while reading the caller identity.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum IdentityError {
    /// Header value is not visible ASCII
    #[error("identity header {0} is not valid text")]
    InvalidHeader(HeaderName),

    /// Header is present but blank
    #[error("identity header {0} is empty")]
    EmptyHeader(HeaderName),
}

/// Configured identity header name is not a legal header name
#[derive(Debug, Error, miette::Diagnostic)]
#[error("invalid identity header name: {0}")]
#[diagnostic(help("header names are lowercase ASCII tokens such as x-user-email"))]
pub struct InvalidHeaderName(pub String);

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        tracing::warn!("Identity extraction failed: {}", message);

        (
            StatusCode::UNAUTHORIZED,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            Json(json!({
                "error": "InvalidIdentity",
                "message": message,
            })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for ExtractIdentity
where
    S: ResolveIdentity + Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let name = state.identity_config().header();

        let Some(value) = parts.headers.get(name) else {
            return Ok(ExtractIdentity(None));
        };

        let email = value
            .to_str()
            .map_err(|_| IdentityError::InvalidHeader(name.clone()))?
            .trim();

        if email.is_empty() {
            return Err(IdentityError::EmptyHeader(name.clone()));
        }

        Ok(ExtractIdentity(Some(Identity::new(email))))
    }
}
