//! HTTP surface for the link collection
//!
//! | Method | Path                | Body / query                      | Response        |
//! |--------|---------------------|-----------------------------------|-----------------|
//! | GET    | `/links`            | `?first=N&after=CURSOR`           | `Connection`    |
//! | POST   | `/links`            | `NewLink` JSON, identity required | `Link`          |
//! | GET    | `/links/{id}`       |                                   | `Link`          |
//! | GET    | `/links/{id}/users` |                                   | `[User]`        |
//!
//! Errors come back as `{ "error": "<Code>", "message": "<text>" }`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::request::Parts,
    routing::get,
};
use linkshelf_core::{
    Connection, Link, LinkId, LinkStore, NewLink, PageRequest, User, create_link, fetch_page,
    find_link, link_users,
};
use serde::de::DeserializeOwned;

pub mod config;
pub mod error;
pub mod identity;

pub use error::{ApiError, RequestError};
use identity::{ExtractIdentity, IdentityConfig, ResolveIdentity};

/// Shared handler state: the store handle plus identity settings
#[derive(Debug)]
pub struct AppState<S> {
    store: S,
    identity: IdentityConfig,
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            identity: self.identity.clone(),
        }
    }
}

impl<S: LinkStore> AppState<S> {
    pub fn new(store: S, identity: IdentityConfig) -> Self {
        Self { store, identity }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> ResolveIdentity for AppState<S> {
    fn identity_config(&self) -> &IdentityConfig {
        &self.identity
    }
}

/// Query-string extractor decoded with `serde_html_form`.
///
/// A missing query string decodes like an empty one, so all-optional
/// parameter structs come out as their defaults.
pub struct ExtractQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ExtractQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value = serde_html_form::from_str(query)
            .map_err(|e| RequestError::QueryDecodeError(e.to_string()))?;
        Ok(ExtractQuery(value))
    }
}

/// JSON body extractor that rejects with the service's error shape
pub struct ExtractJson<T>(pub T);

impl<S, T> FromRequest<S> for ExtractJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(RequestError::Body)?;
        let value = serde_json::from_slice(&body).map_err(RequestError::JsonDecodeError)?;
        Ok(ExtractJson(value))
    }
}

/// Build the application router over `store`
pub fn router<S>(state: AppState<S>) -> Router
where
    S: LinkStore + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(|| async { "linkshelf" }))
        .route("/links", get(list_links::<S>).post(post_link::<S>))
        .route("/links/{id}", get(get_link::<S>))
        .route("/links/{id}/users", get(get_link_users::<S>))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_links<S>(
    State(state): State<AppState<S>>,
    ExtractQuery(request): ExtractQuery<PageRequest>,
) -> Result<Json<Connection>, ApiError>
where
    S: LinkStore + Send + Sync,
{
    let page = fetch_page(state.store(), &request).await?;
    Ok(Json(page.into()))
}

async fn post_link<S>(
    State(state): State<AppState<S>>,
    ExtractIdentity(identity): ExtractIdentity,
    ExtractJson(payload): ExtractJson<NewLink>,
) -> Result<Json<Link>, ApiError>
where
    S: LinkStore + Send + Sync,
{
    let link = create_link(state.store(), payload, identity.as_ref()).await?;
    Ok(Json(link))
}

async fn get_link<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Link>, ApiError>
where
    S: LinkStore + Send + Sync,
{
    let link = find_link(state.store(), &LinkId::from(id)).await?;
    Ok(Json(link))
}

async fn get_link_users<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, ApiError>
where
    S: LinkStore + Send + Sync,
{
    let users = link_users(state.store(), &LinkId::from(id)).await?;
    Ok(Json(users))
}
