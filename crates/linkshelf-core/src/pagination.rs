//! Forward cursor pagination over a [`LinkStore`].
//!
//! A page is computed with at most two bounded range queries:
//!
//! 1. the page itself, starting at the beginning of the collection or strictly
//!    after the cursor;
//! 2. a look-ahead of the same size strictly after the page's last record,
//!    which decides `has_next_page`.
//!
//! There is no total count and no offset. The cost of a page is independent
//! of how large the collection is or how deep into it the cursor points.
//! The look-ahead needs the first query's last id, so the two run in order.
//!
//! Consistency is whatever the store gives between the two reads. A link
//! inserted while a client is walking the collection may be seen or missed.

use crate::error::{LinksError, Result, StoreErrorKind};
use crate::store::{FindMany, LinkStore};
use crate::types::{Link, LinkId};
use serde::{Deserialize, Serialize};

/// Page request parameters, as a caller sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page size. Absent means no limit; zero yields an empty page.
    #[serde(default)]
    pub first: Option<u32>,
    /// Resume strictly after the link with this id
    #[serde(default)]
    pub after: Option<LinkId>,
}

impl PageRequest {
    /// The first `n` links of the collection
    pub fn first(n: u32) -> Self {
        Self {
            first: Some(n),
            after: None,
        }
    }

    /// Continue after `cursor`
    pub fn after(mut self, cursor: impl Into<LinkId>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    fn take(&self) -> Option<usize> {
        self.first.map(|n| n as usize)
    }
}

/// One page of results plus the metadata needed to fetch the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records in ascending collection order
    pub items: Vec<T>,
    /// Id of the last item, `None` when the page is empty
    pub end_cursor: Option<LinkId>,
    /// Whether at least one record follows the last item
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// The page returned for an empty collection or a cursor past the end
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            end_cursor: None,
            has_next_page: false,
        }
    }

    /// Number of items on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Page<Link> {
    /// Each item wrapped with its own id as cursor
    pub fn edges(&self) -> impl Iterator<Item = Edge<&Link>> + '_ {
        self.items.iter().map(|link| Edge {
            cursor: link.id.clone(),
            node: link,
        })
    }
}

/// An item paired with the cursor that resumes right after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The node's own id
    pub cursor: LinkId,
    /// The item
    pub node: T,
}

/// Pagination metadata in the caller-facing shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Pass as `after` to fetch the next page
    pub end_cursor: Option<LinkId>,
    /// Whether another page exists
    pub has_next_page: bool,
}

/// Caller-facing projection of a [`Page`]: `{ pageInfo, edges }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Cursor and has-next flag
    pub page_info: PageInfo,
    /// The page's links, each with its cursor
    pub edges: Vec<Edge<Link>>,
}

impl From<Page<Link>> for Connection {
    fn from(page: Page<Link>) -> Self {
        Self {
            page_info: PageInfo {
                end_cursor: page.end_cursor,
                has_next_page: page.has_next_page,
            },
            edges: page
                .items
                .into_iter()
                .map(|link| Edge {
                    cursor: link.id.clone(),
                    node: link,
                })
                .collect(),
        }
    }
}

/// Fetch one page of links.
///
/// An unknown cursor produces an empty page when the store answers it with no
/// rows, and [`LinksError::InvalidCursor`] when the store reports it as
/// [`StoreErrorKind::NotFound`]. Other store failures propagate unchanged.
pub async fn fetch_page<S: LinkStore>(store: &S, request: &PageRequest) -> Result<Page<Link>> {
    let take = request.take();

    let query = match &request.after {
        None => FindMany::first(take),
        Some(cursor) => FindMany::after(cursor.clone(), take),
    };
    let items = range(store, query).await?;

    let Some(last) = items.last() else {
        tracing::debug!(after = ?request.after, first = ?request.first, "empty page");
        return Ok(Page::empty());
    };
    let end_cursor = last.id.clone();

    let look_ahead = range(store, FindMany::after(end_cursor.clone(), take)).await?;
    let has_next_page = !look_ahead.is_empty();

    tracing::debug!(
        after = ?request.after,
        first = ?request.first,
        count = items.len(),
        end_cursor = %end_cursor,
        has_next_page,
        "fetched page"
    );

    Ok(Page {
        items,
        end_cursor: Some(end_cursor),
        has_next_page,
    })
}

async fn range<S: LinkStore>(store: &S, query: FindMany) -> Result<Vec<Link>> {
    let cursor = query.cursor.clone();
    store.find_many(query).await.map_err(|e| match cursor {
        Some(cursor) if e.kind() == StoreErrorKind::NotFound => LinksError::InvalidCursor(cursor),
        _ => LinksError::Store(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use crate::types::{NewLink, User};
    use std::sync::{Arc, Mutex};

    fn link(id: &str) -> Link {
        Link::from_new(
            LinkId::new(id),
            NewLink::new()
                .title(format!("link {id}"))
                .url(format!("https://example.com/{id}"))
                .description("")
                .image_url("")
                .category("test")
                .build(),
        )
    }

    async fn store_with(n: usize) -> MemoryStore {
        MemoryStore::with_links((1..=n).map(|i| link(&i.to_string())))
            .await
            .unwrap()
    }

    fn ids(page: &Page<Link>) -> Vec<&str> {
        page.items.iter().map(|l| l.id.as_str()).collect()
    }

    #[tokio::test]
    async fn first_page_is_bounded_and_ordered() {
        let store = store_with(10).await;
        let page = fetch_page(&store, &PageRequest::first(3)).await.unwrap();

        assert_eq!(ids(&page), ["1", "2", "3"]);
        assert_eq!(page.end_cursor, Some(LinkId::new_static("3")));
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn exact_fit_has_no_next_page() {
        let store = store_with(4).await;
        let page = fetch_page(&store, &PageRequest::first(4)).await.unwrap();

        assert_eq!(page.len(), 4);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn partial_look_ahead_still_means_more() {
        let store = store_with(5).await;
        let page = fetch_page(&store, &PageRequest::first(2).after("2"))
            .await
            .unwrap();

        assert_eq!(ids(&page), ["3", "4"]);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn empty_collection_gives_empty_page() {
        let store = MemoryStore::new();
        let page = fetch_page(&store, &PageRequest::first(5)).await.unwrap();
        assert_eq!(page, Page::empty());
    }

    #[tokio::test]
    async fn cursor_at_end_gives_empty_page() {
        let store = store_with(3).await;
        let page = fetch_page(&store, &PageRequest::first(5).after("3"))
            .await
            .unwrap();
        assert_eq!(page, Page::empty());
    }

    #[tokio::test]
    async fn unknown_cursor_gives_empty_page() {
        let store = store_with(3).await;
        let page = fetch_page(&store, &PageRequest::first(2).after("missing"))
            .await
            .unwrap();
        assert_eq!(page, Page::empty());
    }

    #[tokio::test]
    async fn unbounded_request_returns_everything() {
        let store = store_with(7).await;
        let page = fetch_page(&store, &PageRequest::default()).await.unwrap();

        assert_eq!(page.len(), 7);
        assert_eq!(page.end_cursor, Some(LinkId::new_static("7")));
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn zero_page_size_gives_empty_page() {
        let store = store_with(3).await;
        let page = fetch_page(&store, &PageRequest::first(0)).await.unwrap();
        assert_eq!(page, Page::empty());
    }

    #[tokio::test]
    async fn connection_mirrors_page() {
        let store = store_with(3).await;
        let page = fetch_page(&store, &PageRequest::first(2)).await.unwrap();
        let edge_cursors: Vec<_> = page.edges().map(|e| e.cursor).collect();
        let conn = Connection::from(page);

        assert_eq!(conn.page_info.end_cursor, Some(LinkId::new_static("2")));
        assert!(conn.page_info.has_next_page);
        assert_eq!(
            conn.edges.iter().map(|e| e.cursor.clone()).collect::<Vec<_>>(),
            edge_cursors
        );
        assert!(conn.edges.iter().all(|e| e.cursor == e.node.id));

        let json = serde_json::to_value(&conn).unwrap();
        assert_eq!(json["pageInfo"]["endCursor"], "2");
        assert_eq!(json["pageInfo"]["hasNextPage"], true);
        assert_eq!(json["edges"][1]["node"]["id"], "2");
    }

    /// Store that records every query and rejects unknown cursors.
    #[derive(Clone)]
    struct StrictStore {
        inner: MemoryStore,
        queries: Arc<Mutex<Vec<FindMany>>>,
    }

    impl LinkStore for StrictStore {
        async fn find_many(&self, query: FindMany) -> std::result::Result<Vec<Link>, StoreError> {
            self.queries.lock().unwrap().push(query.clone());
            if let Some(cursor) = &query.cursor {
                if self.inner.find_link(cursor).await?.is_none() {
                    return Err(StoreError::not_found("cursor", cursor));
                }
            }
            self.inner.find_many(query).await
        }

        async fn find_link(&self, id: &LinkId) -> std::result::Result<Option<Link>, StoreError> {
            self.inner.find_link(id).await
        }

        async fn find_user_by_email(
            &self,
            email: &str,
        ) -> std::result::Result<Option<User>, StoreError> {
            self.inner.find_user_by_email(email).await
        }

        async fn create_link(&self, data: NewLink) -> std::result::Result<Link, StoreError> {
            self.inner.create_link(data).await
        }

        async fn link_users(
            &self,
            id: &LinkId,
        ) -> std::result::Result<Option<Vec<User>>, StoreError> {
            self.inner.link_users(id).await
        }
    }

    async fn strict_store(n: usize) -> StrictStore {
        StrictStore {
            inner: store_with(n).await,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[tokio::test]
    async fn not_found_cursor_is_invalid_cursor() {
        let store = strict_store(3).await;
        let err = fetch_page(&store, &PageRequest::first(2).after("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, LinksError::InvalidCursor(ref c) if c.as_str() == "missing"));
    }

    #[tokio::test]
    async fn look_ahead_uses_same_size_after_last_item() {
        let store = strict_store(5).await;
        fetch_page(&store, &PageRequest::first(2).after("1"))
            .await
            .unwrap();

        let queries = store.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![
                FindMany::after(LinkId::new_static("1"), Some(2)),
                FindMany::after(LinkId::new_static("3"), Some(2)),
            ]
        );
    }

    #[tokio::test]
    async fn empty_first_batch_skips_look_ahead() {
        let store = strict_store(2).await;
        fetch_page(&store, &PageRequest::first(2).after("2"))
            .await
            .unwrap();
        assert_eq!(store.queries.lock().unwrap().len(), 1);
    }
}
