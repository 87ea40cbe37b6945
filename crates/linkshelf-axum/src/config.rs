//! KDL server configuration
//!
//! ```kdl
//! server {
//!     bind "127.0.0.1:3000"
//! }
//! identity {
//!     header "x-user-email"
//! }
//! user "ada@example.com" role="ADMIN"
//! user "bob@example.com"
//! link id="1" title="Rust" url="https://rust-lang.org" image-url="https://rust-lang.org/logo.svg" category="lang" description="A language"
//! bookmark "bob@example.com" link="1"
//! ```
//!
//! Every block is optional. `user`, `link` and `bookmark` nodes seed the
//! in-memory store at startup: users first, then links in file order, then
//! bookmarks, so a bookmark may name a user or link declared after it.

use crate::identity::IdentityConfig;
use linkshelf_core::{Link, LinkId, LinkStore, MemoryStore, NewLink, Role, StoreError, User};
use miette::{Result, miette};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Address used when the config does not name one
pub const DEFAULT_BIND: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    pub users: Vec<User>,
    pub links: Vec<SeedLink>,
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

/// A link to preload. Without an id the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedLink {
    pub id: Option<LinkId>,
    pub data: NewLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub email: String,
    pub link: LinkId,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: DEFAULT_BIND }
    }
}

impl Config {
    pub fn from_kdl(text: &str) -> Result<Self> {
        let doc = text
            .parse::<kdl::KdlDocument>()
            .map_err(|e| miette!("Failed to parse KDL: {}", e))?;

        let mut server: Option<ServerConfig> = None;
        let mut identity: Option<IdentityConfig> = None;
        let mut config = Config::default();

        for node in doc.nodes() {
            match node.name().value() {
                "server" => {
                    if server.is_some() {
                        return Err(miette!("Multiple server blocks found"));
                    }
                    server = Some(parse_server(node)?);
                }
                "identity" => {
                    if identity.is_some() {
                        return Err(miette!("Multiple identity blocks found"));
                    }
                    identity = Some(parse_identity(node)?);
                }
                "user" => config.users.push(parse_user(node)?),
                "link" => config.links.push(parse_link(node)?),
                "bookmark" => config.bookmarks.push(parse_bookmark(node)?),
                other => {
                    return Err(miette!("Unknown config node: {}", other));
                }
            }
        }

        if let Some(server) = server {
            config.server = server;
        }
        if let Some(identity) = identity {
            config.identity = identity;
        }
        Ok(config)
    }

    /// Load users, links and bookmarks into `store`
    pub async fn seed(&self, store: &MemoryStore) -> std::result::Result<(), StoreError> {
        for user in &self.users {
            store.insert_user(user.clone()).await;
        }
        for link in &self.links {
            match &link.id {
                Some(id) => {
                    store
                        .insert_link(Link::from_new(id.clone(), link.data.clone()))
                        .await?;
                }
                None => {
                    store.create_link(link.data.clone()).await?;
                }
            }
        }
        for bookmark in &self.bookmarks {
            store.bookmark(&bookmark.email, &bookmark.link).await?;
        }
        tracing::info!(
            users = self.users.len(),
            links = self.links.len(),
            bookmarks = self.bookmarks.len(),
            "seeded store"
        );
        Ok(())
    }
}

fn first_string<'a>(node: &'a kdl::KdlNode, what: &str) -> Result<&'a str> {
    node.entries()
        .get(0)
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| miette!("{} expects a string value", what))
}

fn parse_server(node: &kdl::KdlNode) -> Result<ServerConfig> {
    let children = node
        .children()
        .ok_or_else(|| miette!("server block has no children"))?;

    let mut bind: Option<SocketAddr> = None;

    for child in children.nodes() {
        match child.name().value() {
            "bind" => {
                let val = first_string(child, "bind")?;
                bind = Some(
                    val.parse()
                        .map_err(|e| miette!("Invalid bind address {}: {}", val, e))?,
                );
            }
            other => {
                return Err(miette!("Unknown server field: {}", other));
            }
        }
    }

    Ok(ServerConfig {
        bind: bind.ok_or_else(|| miette!("Missing bind address"))?,
    })
}

fn parse_identity(node: &kdl::KdlNode) -> Result<IdentityConfig> {
    let children = node
        .children()
        .ok_or_else(|| miette!("identity block has no children"))?;

    let mut identity = IdentityConfig::default();

    for child in children.nodes() {
        match child.name().value() {
            "header" => {
                let val = first_string(child, "header")?;
                identity = IdentityConfig::from_header_name(val)?;
            }
            other => {
                return Err(miette!("Unknown identity field: {}", other));
            }
        }
    }

    Ok(identity)
}

fn parse_user(node: &kdl::KdlNode) -> Result<User> {
    let email = first_string(node, "user")?;

    let role = match node.get("role").and_then(|v| v.as_string()) {
        Some(role) => role.parse::<Role>()?,
        None => Role::default(),
    };

    Ok(User::new(email, role))
}

fn parse_link(node: &kdl::KdlNode) -> Result<SeedLink> {
    let field = |key: &str| -> Result<String> {
        node.get(key)
            .and_then(|v| v.as_string())
            .map(str::to_string)
            .ok_or_else(|| miette!("link missing {} attribute", key))
    };

    let id = node
        .get("id")
        .and_then(|v| v.as_string())
        .map(LinkId::new);

    Ok(SeedLink {
        id,
        data: NewLink::new()
            .title(field("title")?)
            .url(field("url")?)
            .description(field("description")?)
            .image_url(field("image-url")?)
            .category(field("category")?)
            .build(),
    })
}

fn parse_bookmark(node: &kdl::KdlNode) -> Result<Bookmark> {
    let email = first_string(node, "bookmark")?;
    let link = node
        .get("link")
        .and_then(|v| v.as_string())
        .ok_or_else(|| miette!("bookmark for {} missing link attribute", email))?;

    Ok(Bookmark {
        email: email.to_string(),
        link: LinkId::new(link),
    })
}
