//! Polymorphic identifiers.
//!
//! Telegram addresses things by number (chats, users, messages) and by string
//! (callback queries, inline messages, `@channel` usernames). [`Identifier`]
//! carries either form behind one type so dispatch sources can expose a uniform
//! surface.
//!
//! # Example
//!
//! ```rust
//! use tgcmd_core::Identifier;
//!
//! let chat = Identifier::numeric(-100123);
//! assert_eq!(chat.as_numeric(), Ok(-100123));
//! assert!(chat.as_text().is_err());
//!
//! let query = Identifier::text("4382bfdwdsb323b2d9");
//! assert_eq!(query.as_text(), Ok("4382bfdwdsb323b2d9"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IdentifierError, IdentifierResult};

/// The representation an [`Identifier`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// A 64-bit integer identity.
    Numeric,
    /// A textual identity.
    Text,
}

impl IdentifierKind {
    /// Returns the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity that is either numeric or textual.
///
/// Equality and hashing compare the tag and the value, so `Numeric(1)` and
/// `Text("1")` are distinct. Serializes untagged: a JSON number or a JSON
/// string, which is the shape the Bot API accepts for `chat_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// A numeric identity such as a chat, user or message id.
    Numeric(i64),
    /// A textual identity such as a callback query id.
    Text(String),
}

impl Identifier {
    /// Creates a numeric identifier.
    pub fn numeric(id: i64) -> Self {
        Self::Numeric(id)
    }

    /// Creates a textual identifier.
    pub fn text(id: impl Into<String>) -> Self {
        Self::Text(id.into())
    }

    /// Creates a textual identifier from a value that may be absent.
    ///
    /// Fails with [`IdentifierError::Missing`] when `id` is `None`.
    pub fn try_text<S: Into<String>>(id: Option<S>) -> IdentifierResult<Self> {
        id.map(Self::text)
            .ok_or(IdentifierError::Missing(IdentifierKind::Text))
    }

    /// Best-effort construction from an untyped JSON value.
    ///
    /// Integral numbers map to [`Identifier::Numeric`] and strings to
    /// [`Identifier::Text`]. Everything else (floats, integers outside the
    /// `i64` range, null, booleans, arrays, objects) yields `None`, which
    /// stands for an unknown identity rather than an error.
    pub fn from_untyped(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Numeric),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Returns which representation this identifier holds.
    pub fn kind(&self) -> IdentifierKind {
        match self {
            Self::Numeric(_) => IdentifierKind::Numeric,
            Self::Text(_) => IdentifierKind::Text,
        }
    }

    /// Returns `true` if this is a numeric identifier.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    /// Returns `true` if this is a textual identifier.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the numeric value.
    ///
    /// Fails with [`IdentifierError::RepresentationMismatch`] on a textual
    /// identifier; no default value is ever substituted.
    pub fn as_numeric(&self) -> IdentifierResult<i64> {
        match self {
            Self::Numeric(id) => Ok(*id),
            Self::Text(_) => Err(self.mismatch(IdentifierKind::Numeric)),
        }
    }

    /// Returns the textual value.
    ///
    /// Fails with [`IdentifierError::RepresentationMismatch`] on a numeric
    /// identifier.
    pub fn as_text(&self) -> IdentifierResult<&str> {
        match self {
            Self::Text(id) => Ok(id),
            Self::Numeric(_) => Err(self.mismatch(IdentifierKind::Text)),
        }
    }

    /// Returns the value in the generic form used by the transport layer.
    pub fn as_generic(&self) -> Value {
        match self {
            Self::Numeric(id) => Value::from(*id),
            Self::Text(id) => Value::from(id.as_str()),
        }
    }

    fn mismatch(&self, requested: IdentifierKind) -> IdentifierError {
        IdentifierError::RepresentationMismatch {
            requested,
            actual: self.kind(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<i32> for Identifier {
    fn from(id: i32) -> Self {
        Self::Numeric(id.into())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_accessors() {
        for n in [0, 1, -1, 42, i64::MIN, i64::MAX, -1001234567890] {
            let id = Identifier::numeric(n);
            assert_eq!(id.as_numeric(), Ok(n));
            assert!(id.is_numeric());
            assert!(!id.is_text());
            assert_eq!(id.kind(), IdentifierKind::Numeric);
        }
    }

    #[test]
    fn test_text_accessors() {
        for s in ["", "abc", "4382bfdwdsb323b2d9", "@channel"] {
            let id = Identifier::text(s);
            assert_eq!(id.as_text(), Ok(s));
            assert!(id.is_text());
            assert!(!id.is_numeric());
        }
    }

    #[test]
    fn test_wrong_accessor_fails() {
        let numeric = Identifier::numeric(7);
        assert_eq!(
            numeric.as_text(),
            Err(IdentifierError::RepresentationMismatch {
                requested: IdentifierKind::Text,
                actual: IdentifierKind::Numeric,
            })
        );

        let text = Identifier::text("7");
        assert_eq!(
            text.as_numeric(),
            Err(IdentifierError::RepresentationMismatch {
                requested: IdentifierKind::Numeric,
                actual: IdentifierKind::Text,
            })
        );
    }

    #[test]
    fn test_try_text_requires_value() {
        assert_eq!(
            Identifier::try_text(Some("cb")),
            Ok(Identifier::text("cb"))
        );
        assert_eq!(
            Identifier::try_text(None::<String>),
            Err(IdentifierError::Missing(IdentifierKind::Text))
        );
    }

    #[test]
    fn test_from_untyped() {
        assert_eq!(
            Identifier::from_untyped(&json!(12)),
            Some(Identifier::numeric(12))
        );
        assert_eq!(
            Identifier::from_untyped(&json!(-5)),
            Some(Identifier::numeric(-5))
        );
        assert_eq!(
            Identifier::from_untyped(&json!("abc")),
            Some(Identifier::text("abc"))
        );
        assert_eq!(Identifier::from_untyped(&json!(1.5)), None);
        assert_eq!(Identifier::from_untyped(&json!(u64::MAX)), None);
        assert_eq!(Identifier::from_untyped(&json!(null)), None);
        assert_eq!(Identifier::from_untyped(&json!(true)), None);
        assert_eq!(Identifier::from_untyped(&json!([1])), None);
        assert_eq!(Identifier::from_untyped(&json!({"id": 1})), None);
    }

    #[test]
    fn test_generic_and_serialized_forms() {
        assert_eq!(Identifier::numeric(10).as_generic(), json!(10));
        assert_eq!(Identifier::text("x").as_generic(), json!("x"));

        let numeric = serde_json::to_value(Identifier::numeric(10)).unwrap();
        assert_eq!(numeric, json!(10));
        let parsed: Identifier = serde_json::from_value(json!("x")).unwrap();
        assert_eq!(parsed, Identifier::text("x"));
    }

    #[test]
    fn test_equality_compares_tag_and_value() {
        assert_eq!(Identifier::numeric(1), Identifier::from(1i64));
        assert_ne!(Identifier::numeric(1), Identifier::text("1"));
        assert_eq!(Identifier::numeric(1).to_string(), Identifier::text("1").to_string());
    }
}
