//! Link storage abstraction

use crate::error::StoreError;
use crate::types::{Link, LinkId, NewLink, User};

/// Ordered range query against the link collection.
///
/// Mirrors the usual ORM shape: start at `cursor` (inclusive) or at the
/// beginning of the collection, drop `skip` records, then return at most
/// `take` records in ascending order. `take: None` means no limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindMany {
    /// Maximum number of records to return
    pub take: Option<usize>,
    /// Number of records to drop from the start position
    pub skip: usize,
    /// Inclusive start position
    pub cursor: Option<LinkId>,
}

impl FindMany {
    /// First `take` records of the collection
    pub fn first(take: Option<usize>) -> Self {
        Self {
            take,
            ..Default::default()
        }
    }

    /// Up to `take` records strictly after `cursor`
    pub fn after(cursor: LinkId, take: Option<usize>) -> Self {
        Self {
            take,
            skip: 1,
            cursor: Some(cursor),
        }
    }
}

/// Async link storage trait
///
/// The collection has a total, stable ascending order that every
/// `find_many` call observes. Implementations might use:
/// - In-memory maps ([`MemoryStore`])
/// - SQL or key-value databases (user-provided)
///
/// Clone is required so handlers can hold their own handle to the store.
///
/// # Example
///
/// ```rust,ignore
/// use linkshelf_core::{FindMany, LinkStore, MemoryStore, NewLink};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let link = store
///     .create_link(NewLink::new().title("t").url("u").description("d").image_url("i").category("c").build())
///     .await?;
///
/// let page = store.find_many(FindMany::first(Some(10))).await?;
/// assert_eq!(page[0].id, link.id);
/// # Ok(())
/// # }
/// ```
#[trait_variant::make(Send)]
pub trait LinkStore: Clone {
    /// Ordered range fetch.
    ///
    /// A cursor that names no record yields an empty result, unless the
    /// implementation reports it as a [`StoreErrorKind::NotFound`](crate::StoreErrorKind::NotFound) error.
    async fn find_many(&self, query: FindMany) -> Result<Vec<Link>, StoreError>;

    /// Look a link up by id
    async fn find_link(&self, id: &LinkId) -> Result<Option<Link>, StoreError>;

    /// Look a user up by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a link built from exactly the supplied fields, assigning its id
    async fn create_link(&self, data: NewLink) -> Result<Link, StoreError>;

    /// Users associated with a link.
    ///
    /// Returns `None` when the link itself does not exist.
    async fn link_users(&self, id: &LinkId) -> Result<Option<Vec<User>>, StoreError>;
}

pub mod memory;

pub use memory::MemoryStore;
