//! Link collection primitives
//!
//! This crate holds everything the link service needs that is independent of
//! transport:
//!
//! - **Types**: [`Link`], [`NewLink`], [`User`], [`Role`] and the caller [`Identity`]
//! - **Storage**: the async [`LinkStore`] trait plus an in-memory [`MemoryStore`]
//! - **Pagination**: forward cursor pagination with a bounded look-ahead ([`fetch_page`])
//! - **Guarded writes**: role-checked link creation ([`create_link`])
//!
//! Every operation takes the store (and, for writes, the caller identity) as an
//! explicit argument. Nothing is read from ambient request state.
//!
//! # Example
//!
//! ```rust,ignore
//! use linkshelf_core::{MemoryStore, PageRequest, fetch_page};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//!
//! let first = fetch_page(&store, &PageRequest::first(10)).await?;
//! if let Some(cursor) = first.end_cursor.clone() {
//!     let next = fetch_page(&store, &PageRequest::first(10).after(cursor)).await?;
//!     println!("{} more links", next.items.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
/// Role-checked mutations
pub mod guard;
/// Single-link lookups and the bookmark relation
pub mod lookup;
/// Cursor pagination engine and page types
pub mod pagination;
/// Link storage abstraction
pub mod store;
pub mod types;

pub use error::{LinksError, Result, StoreError, StoreErrorKind};
pub use guard::create_link;
pub use lookup::{find_link, link_users};
pub use pagination::{Connection, Edge, Page, PageInfo, PageRequest, fetch_page};
pub use store::{FindMany, LinkStore, MemoryStore};
pub use types::{Identity, Link, LinkId, NewLink, Role, User};
