//! In-memory link storage implementation

use crate::error::StoreError;
use crate::store::{FindMany, LinkStore};
use crate::types::{Link, LinkId, NewLink, User};
use smol_str::SmolStr;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory link storage
///
/// Useful for:
/// - Testing
/// - Demo servers seeded from config
///
/// Links are ordered by insertion. Each link gets a sequence number on insert
/// and `find_many` walks a `BTreeMap` keyed by it, so positioning at a cursor
/// costs one hash lookup plus a range seek regardless of collection size.
///
/// Generated ids are the decimal sequence number (`"1"`, `"2"`, ...), skipping
/// any id already taken by a seeded link.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collection>>,
}

#[derive(Debug, Default)]
struct Collection {
    links: BTreeMap<u64, Link>,
    positions: HashMap<LinkId, u64>,
    users: BTreeMap<SmolStr, User>,
    bookmarks: HashMap<LinkId, BTreeSet<SmolStr>>,
    next_seq: u64,
}

impl Collection {
    fn push(&mut self, link: Link) -> Result<Link, StoreError> {
        if self.positions.contains_key(&link.id) {
            return Err(StoreError::conflict("link", &link.id));
        }
        self.next_seq += 1;
        self.positions.insert(link.id.clone(), self.next_seq);
        self.links.insert(self.next_seq, link.clone());
        Ok(link)
    }

    fn fresh_id(&self) -> LinkId {
        let mut n = self.next_seq + 1;
        loop {
            let id = LinkId::from(n.to_string());
            if !self.positions.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }
}

impl MemoryStore {
    /// Create new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `links` in the given order
    pub async fn with_links(links: impl IntoIterator<Item = Link>) -> Result<Self, StoreError> {
        let store = Self::new();
        for link in links {
            store.insert_link(link).await?;
        }
        Ok(store)
    }

    /// Insert a link with a caller-chosen id, appending it to the order
    pub async fn insert_link(&self, link: Link) -> Result<Link, StoreError> {
        self.inner.write().await.push(link)
    }

    /// Insert or replace a user
    pub async fn insert_user(&self, user: User) {
        self.inner
            .write()
            .await
            .users
            .insert(user.email.clone(), user);
    }

    /// Associate an existing user with an existing link
    pub async fn bookmark(&self, email: &str, link: &LinkId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.positions.contains_key(link) {
            return Err(StoreError::not_found("link", link));
        }
        if !inner.users.contains_key(email) {
            return Err(StoreError::not_found("user", email));
        }
        inner
            .bookmarks
            .entry(link.clone())
            .or_default()
            .insert(SmolStr::new(email));
        Ok(())
    }

    /// Get number of links stored
    pub async fn len(&self) -> usize {
        self.inner.read().await.links.len()
    }

    /// Check if the store holds no links
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.links.is_empty()
    }
}

impl LinkStore for MemoryStore {
    async fn find_many(&self, query: FindMany) -> Result<Vec<Link>, StoreError> {
        let inner = self.inner.read().await;
        let start = match &query.cursor {
            None => Bound::Unbounded,
            Some(cursor) => match inner.positions.get(cursor) {
                Some(seq) => Bound::Included(*seq),
                None => return Ok(Vec::new()),
            },
        };
        Ok(inner
            .links
            .range((start, Bound::Unbounded))
            .skip(query.skip)
            .take(query.take.unwrap_or(usize::MAX))
            .map(|(_, link)| link.clone())
            .collect())
    }

    async fn find_link(&self, id: &LinkId) -> Result<Option<Link>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .positions
            .get(id)
            .and_then(|seq| inner.links.get(seq))
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn create_link(&self, data: NewLink) -> Result<Link, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.fresh_id();
        inner.push(Link::from_new(id, data))
    }

    async fn link_users(&self, id: &LinkId) -> Result<Option<Vec<User>>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.positions.contains_key(id) {
            return Ok(None);
        }
        let users = inner
            .bookmarks
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|email| inner.users.get(email).cloned())
            .collect();
        Ok(Some(users))
    }
}
