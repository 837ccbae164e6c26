//! Delta operation data model
//!
//! A delta document is an ordered list of insert operations. Each op
//! carries either literal text or an embed payload (a single-key object
//! naming a mention/field type), plus optional formatting attributes.
//! Op order is document order; sequences are produced and consumed whole.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Formatting attributes attached to an op, keyed by attribute name.
///
/// Recognized keys: `bold`, `italic`, `strike`, `code`, `link` (URL),
/// `header` (1-3), `blockquote`, `code-block`, `list`
/// ("bullet" | "ordered"), `indent` (>= 1, absent means 0). Unknown keys
/// are carried through untouched and ignored by the converters.
pub type Attributes = IndexMap<String, AttrValue>;

/// The payload object of an embed insert, e.g. the value under `"mention"`.
pub type EmbedPayload = IndexMap<String, AttrValue>;

/// A scalar attribute or embed-payload value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttrValue {
    /// Truthiness in the sense the attribute checks use: `false`, `0`,
    /// and `""` disable an attribute even when the key is present.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Int(i) => *i != 0,
            AttrValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

/// The content of an insert op: literal text or an embed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    Embed(IndexMap<String, EmbedPayload>),
}

impl Insert {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Insert::Text(t) => Some(t),
            Insert::Embed(_) => None,
        }
    }
}

/// A single insert operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaOp {
    pub insert: Insert,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl DeltaOp {
    /// A plain text op with no attributes.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes: None,
        }
    }

    /// A text op carrying attributes; `None` is stored when the map is empty.
    pub fn attributed(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes: if attributes.is_empty() {
                None
            } else {
                Some(attributes)
            },
        }
    }

    /// An embed op with a single payload keyed by `kind`.
    pub fn embed(kind: impl Into<String>, payload: EmbedPayload) -> Self {
        let mut map = IndexMap::new();
        map.insert(kind.into(), payload);
        Self {
            insert: Insert::Embed(map),
            attributes: None,
        }
    }

    /// True when the named attribute is present and truthy.
    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes
            .as_ref()
            .and_then(|a| a.get(key))
            .is_some_and(AttrValue::is_truthy)
    }
}
