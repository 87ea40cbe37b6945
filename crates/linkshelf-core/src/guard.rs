use crate::error::{LinksError, Result};
use crate::store::LinkStore;
use crate::types::{Identity, Link, NewLink, Role};

/// Create a link on behalf of `identity`.
///
/// The caller must be authenticated, must resolve to a known user, and that
/// user must hold [`Role::Admin`]. The payload is handed to the store as is
/// and the store's record is returned unmodified.
///
/// The role check and the insert are two separate store calls. A failed
/// insert after a passed check surfaces as [`LinksError::Store`].
pub async fn create_link<S: LinkStore>(
    store: &S,
    payload: NewLink,
    identity: Option<&Identity>,
) -> Result<Link> {
    let identity = identity.ok_or(LinksError::Unauthenticated)?;

    let Some(user) = store.find_user_by_email(identity.email()).await? else {
        tracing::warn!(email = identity.email(), "identity does not match any user");
        return Err(LinksError::Unauthenticated);
    };

    if user.role != Role::Admin {
        tracing::info!(email = %user.email, role = %user.role, "create link denied");
        return Err(LinksError::Forbidden {
            email: user.email,
            role: user.role,
        });
    }

    let link = store.create_link(payload).await?;
    tracing::info!(id = %link.id, email = %user.email, "created link");
    Ok(link)
}
