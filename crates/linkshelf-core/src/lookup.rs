use crate::error::{LinksError, Result};
use crate::store::LinkStore;
use crate::types::{Link, LinkId, User};

/// Fetch a single link by id
pub async fn find_link<S: LinkStore>(store: &S, id: &LinkId) -> Result<Link> {
    store
        .find_link(id)
        .await?
        .ok_or_else(|| LinksError::LinkNotFound(id.clone()))
}

/// Users who bookmarked the link
pub async fn link_users<S: LinkStore>(store: &S, id: &LinkId) -> Result<Vec<User>> {
    store
        .link_users(id)
        .await?
        .ok_or_else(|| LinksError::LinkNotFound(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{NewLink, Role};

    #[tokio::test]
    async fn missing_link_is_not_found() {
        let store = MemoryStore::new();
        let id = LinkId::new_static("9");

        assert!(matches!(
            find_link(&store, &id).await,
            Err(LinksError::LinkNotFound(_))
        ));
        assert!(matches!(
            link_users(&store, &id).await,
            Err(LinksError::LinkNotFound(_))
        ));
    }

    #[tokio::test]
    async fn resolves_bookmarking_users() {
        let store = MemoryStore::new();
        let link = store
            .create_link(
                NewLink::new()
                    .title("serde")
                    .url("https://serde.rs")
                    .description("")
                    .image_url("")
                    .category("crates")
                    .build(),
            )
            .await
            .unwrap();
        store.insert_user(User::new("a@example.com", Role::User)).await;
        store.insert_user(User::new("b@example.com", Role::Admin)).await;
        store.bookmark("b@example.com", &link.id).await.unwrap();

        assert_eq!(find_link(&store, &link.id).await.unwrap(), link);
        assert_eq!(
            link_users(&store, &link.id).await.unwrap(),
            vec![User::new("b@example.com", Role::Admin)]
        );
    }
}
