//! Entities exchanged with the server and held in state
//!
//! Field names follow the server's camelCase JSON. Timestamps are optional so
//! that partial payloads (fresh drafts, trimmed listings) still decode.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAccessError;

/// A registered user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role_id: i64,
    /// Only present on login responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Reference data gating document access
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub title: String,
}

/// A document; `content` is rich text kept as an opaque HTML string
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub access: Access,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Who may view a document.
///
/// On the wire this is a single integer: `0` private, `-1` public, anything
/// else the id of the role whose members may view it. Form inputs submit the
/// same values as strings, so decoding accepts both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Access {
    #[default]
    Private,
    Public,
    Role(i64),
}

impl Access {
    pub const PRIVATE: i64 = 0;
    pub const PUBLIC: i64 = -1;

    pub fn from_raw(raw: i64) -> Self {
        match raw {
            Self::PRIVATE => Access::Private,
            Self::PUBLIC => Access::Public,
            role => Access::Role(role),
        }
    }

    pub fn raw(self) -> i64 {
        match self {
            Access::Private => Self::PRIVATE,
            Access::Public => Self::PUBLIC,
            Access::Role(role) => role,
        }
    }

    /// Whether `viewer` may read a document owned by `owner_id`
    pub fn permits(self, owner_id: i64, viewer: Option<&User>) -> bool {
        match (self, viewer) {
            (Access::Public, _) => true,
            (_, None) => false,
            (Access::Private, Some(user)) => user.id == owner_id,
            (Access::Role(role), Some(user)) => user.id == owner_id || user.role_id == role,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Private => write!(f, "private"),
            Access::Public => write!(f, "public"),
            Access::Role(role) => write!(f, "role:{}", role),
        }
    }
}

/// Accepts `private`, `public`, `role:<id>` or a raw wire integer
impl FromStr for Access {
    type Err = ParseAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "private" => return Ok(Access::Private),
            "public" => return Ok(Access::Public),
            _ => {}
        }
        let raw = s.strip_prefix("role:").unwrap_or(s);
        raw.trim()
            .parse::<i64>()
            .map(Access::from_raw)
            .map_err(|_| ParseAccessError(s.to_string()))
    }
}

impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.raw())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccessRepr {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Access {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match AccessRepr::deserialize(deserializer)? {
            AccessRepr::Int(raw) => raw,
            AccessRepr::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid access level `{}`", text)))?,
        };
        Ok(Access::from_raw(raw))
    }
}

/// Paging window of the last list fetch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    #[serde(default)]
    pub total_count: u32,
}

/// The `all.search` field holds whichever search ran last
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "results", rename_all = "lowercase")]
pub enum SearchResults {
    #[default]
    Empty,
    Users(Vec<User>),
    Documents(Vec<Document>),
}

/// Id carried by delete actions, as the view supplied it.
///
/// Views pass ids from route params and form fields, so they may arrive as
/// text. Matching parses them the way a browser's `parseInt` does; text that
/// does not start with a number matches nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Int(i64),
    Text(String),
}

impl IdRef {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            IdRef::Int(id) => Some(*id),
            IdRef::Text(text) => parse_int(text),
        }
    }

    pub fn matches(&self, id: i64) -> bool {
        self.as_int() == Some(id)
    }
}

impl From<i64> for IdRef {
    fn from(id: i64) -> Self {
        IdRef::Int(id)
    }
}

impl From<&str> for IdRef {
    fn from(text: &str) -> Self {
        IdRef::Text(text.to_string())
    }
}

impl From<String> for IdRef {
    fn from(text: String) -> Self {
        IdRef::Text(text)
    }
}

impl fmt::Display for IdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRef::Int(id) => write!(f, "{}", id),
            IdRef::Text(text) => write!(f, "{}", urlencoding::encode(text.trim())),
        }
    }
}

/// Leading whitespace, optional sign, then as many decimal digits as present.
fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Login form
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signup form
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignupDetails {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupDetails {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for SignupDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDetails")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// New document form
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
    pub access: Access,
}

/// Edit form; only the fields present are sent
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DocumentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

impl DocumentChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.access.is_none()
    }
}

/// Profile edit form
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for ProfileChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileChanges")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: i64, role_id: i64) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
            role_id,
            token: None,
        }
    }

    #[test]
    fn test_access_wire_values() {
        assert_eq!(Access::from_raw(0), Access::Private);
        assert_eq!(Access::from_raw(-1), Access::Public);
        assert_eq!(Access::from_raw(3), Access::Role(3));
        assert_eq!(serde_json::to_value(Access::Public).unwrap(), json!(-1));
        assert_eq!(serde_json::to_value(Access::Role(2)).unwrap(), json!(2));
    }

    #[test]
    fn test_access_decodes_numeric_strings() {
        let access: Access = serde_json::from_value(json!("-1")).unwrap();
        assert_eq!(access, Access::Public);
        let access: Access = serde_json::from_value(json!(" 4")).unwrap();
        assert_eq!(access, Access::Role(4));
        assert!(serde_json::from_value::<Access>(json!("everyone")).is_err());
    }

    #[test]
    fn test_access_from_str() {
        assert_eq!("private".parse::<Access>().unwrap(), Access::Private);
        assert_eq!("PUBLIC".parse::<Access>().unwrap(), Access::Public);
        assert_eq!("role:7".parse::<Access>().unwrap(), Access::Role(7));
        assert_eq!("0".parse::<Access>().unwrap(), Access::Private);
        assert!("role:x".parse::<Access>().is_err());
    }

    #[test]
    fn test_access_permits() {
        let owner = user(1, 2);
        let same_role = user(5, 3);
        let other = user(6, 2);

        assert!(Access::Public.permits(1, None));
        assert!(!Access::Private.permits(1, None));
        assert!(Access::Private.permits(1, Some(&owner)));
        assert!(!Access::Private.permits(1, Some(&other)));
        assert!(Access::Role(3).permits(1, Some(&same_role)));
        assert!(Access::Role(3).permits(1, Some(&owner)));
        assert!(!Access::Role(3).permits(1, Some(&other)));
    }

    #[test]
    fn test_id_ref_parses_like_parse_int() {
        assert_eq!(IdRef::from("2").as_int(), Some(2));
        assert_eq!(IdRef::from("  42abc").as_int(), Some(42));
        assert_eq!(IdRef::from("-3").as_int(), Some(-3));
        assert_eq!(IdRef::from("abc").as_int(), None);
        assert_eq!(IdRef::from("").as_int(), None);
        assert_eq!(IdRef::from("-").as_int(), None);
        assert!(IdRef::from(7).matches(7));
        assert!(!IdRef::from("x7").matches(7));
    }

    #[test]
    fn test_document_decodes_server_shape() {
        let doc: Document = serde_json::from_value(json!({
            "id": 9,
            "userId": 1,
            "title": "Notes",
            "content": "<p>hello</p>",
            "access": "-1",
            "createdAt": "2017-03-01T10:00:00Z",
            "updatedAt": "2017-03-02T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(doc.access, Access::Public);
        assert_eq!(doc.user_id, 1);
        assert!(doc.created_at.is_some());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: "a@b.c".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", credentials).contains("hunter2"));
    }
}
