//! Domain types shared by the store, the engine and the transport

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

/// Link identifier.
///
/// Opaque to callers. Doubles as the pagination cursor: a cursor equal to an
/// id means "resume strictly after that link".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(SmolStr);

impl LinkId {
    /// Create an id from any string-like value
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    /// Create an id from a static string without allocating
    pub const fn new_static(id: &'static str) -> Self {
        Self(SmolStr::new_static(id))
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LinkId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for LinkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LinkId {
    fn from(id: String) -> Self {
        Self(SmolStr::from(id))
    }
}

/// A stored link record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Store-assigned id, also the link's cursor
    pub id: LinkId,
    /// Display title
    pub title: String,
    /// Target URL
    pub url: String,
    /// Free-form description
    pub description: String,
    /// Preview image URL
    pub image_url: String,
    /// Category label
    pub category: String,
}

impl Link {
    /// Attach an id to a payload
    pub fn from_new(id: LinkId, data: NewLink) -> Self {
        let NewLink {
            title,
            url,
            description,
            image_url,
            category,
        } = data;
        Self {
            id,
            title,
            url,
            description,
            image_url,
            category,
        }
    }

    /// The payload fields of this link, without its id
    pub fn fields(&self) -> NewLink {
        NewLink {
            title: self.title.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            category: self.category.clone(),
        }
    }
}

/// Payload for creating a link. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct NewLink {
    /// Display title
    #[builder(into)]
    pub title: String,
    /// Target URL
    #[builder(into)]
    pub url: String,
    /// Free-form description
    #[builder(into)]
    pub description: String,
    /// Preview image URL
    #[builder(into)]
    pub image_url: String,
    /// Category label
    #[builder(into)]
    pub category: String,
}

/// Authorization level of a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account, read-only as far as links go
    #[default]
    User,
    /// Elevated role, may create links
    Admin,
}

impl Role {
    /// Wire name of the role
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
#[error("unknown role: {0}")]
#[diagnostic(help("expected USER or ADMIN"))]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique email, the lookup key for identities
    pub email: SmolStr,
    /// Authorization level
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Create a user record
    pub fn new(email: impl AsRef<str>, role: Role) -> Self {
        Self {
            email: SmolStr::new(email),
            role,
        }
    }
}

/// The identity a caller presents with a request.
///
/// Produced by whatever authenticates the request upstream; the core only
/// needs the email to look the user up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    email: SmolStr,
}

impl Identity {
    /// Create an identity for the given email
    pub fn new(email: impl AsRef<str>) -> Self {
        Self {
            email: SmolStr::new(email),
        }
    }

    /// The email this identity was issued for
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_serializes_camel_case() {
        let link = Link::from_new(
            LinkId::new_static("1"),
            NewLink::new()
                .title("Rust")
                .url("https://rust-lang.org")
                .description("A language")
                .image_url("https://rust-lang.org/logo.svg")
                .category("lang")
                .build(),
        );
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["imageUrl"], "https://rust-lang.org/logo.svg");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "USER");
        assert!("admin".parse::<Role>().is_err());
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");
    }

    #[test]
    fn new_link_requires_every_field() {
        let missing = serde_json::from_str::<NewLink>(
            r#"{"title":"t","url":"u","description":"d","category":"c"}"#,
        );
        assert!(missing.is_err());
    }
}
