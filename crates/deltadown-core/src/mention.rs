//! Mention descriptor tables
//!
//! Mentions are typed inline placeholders (user references, field
//! references) resolved through caller-supplied lookup tables rather
//! than rendered literally. The two directions use symmetric shapes:
//! [`DeltaMention`] turns an embed payload into markdown text, and
//! [`StringMention`] turns matched markdown text back into a structured
//! mention.

use serde::{Deserialize, Serialize};

use crate::node::MentionOptions;
use crate::ops::EmbedPayload;

/// Forward descriptor: renders a delta embed payload as markdown text.
///
/// A payload is matched by which descriptor's `key` appears in the embed
/// object and rendered as `prefix + payload[value_key] + postfix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaMention {
    pub key: String,
    pub prefix: String,
    pub postfix: String,
    pub value_key: String,
}

/// One label/value pair of a reverse descriptor's lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionValue {
    pub label: String,
    pub value: String,
}

/// Reverse descriptor: recognizes mention text in markdown.
///
/// `pattern` is a regex with one capture group; the captured text is
/// looked up in `values` by `value`.
#[derive(Debug, Clone)]
pub struct StringMention {
    pub mention_type: String,
    pub pattern: String,
    pub denotation_char: String,
    pub values: Vec<MentionValue>,
}

impl StringMention {
    /// Resolve a captured value into mention options. An unknown capture
    /// produces a degraded fallback (empty label, the capture as id)
    /// rather than an error.
    pub fn resolve(&self, captured: &str) -> MentionOptions {
        match self.values.iter().find(|v| v.value == captured) {
            Some(found) => MentionOptions {
                index: "0".to_string(),
                denotation_char: self.denotation_char.clone(),
                value: found.label.clone(),
                id: found.value.clone(),
                mention_type: self.mention_type.clone(),
            },
            None => MentionOptions {
                index: "0".to_string(),
                denotation_char: self.denotation_char.clone(),
                value: String::new(),
                id: captured.to_string(),
                mention_type: self.mention_type.clone(),
            },
        }
    }
}

/// Render an embed payload through the forward descriptor table.
///
/// Returns the empty string when no descriptor matches or the matched
/// payload lacks the descriptor's value key; a missing table entry is a
/// degraded rendering, not an error.
pub fn resolve_embed(
    payload: &indexmap::IndexMap<String, EmbedPayload>,
    mentions: &[DeltaMention],
) -> String {
    for mention in mentions {
        if let Some(fields) = payload.get(&mention.key) {
            return match fields.get(&mention.value_key) {
                Some(value) => format!("{}{}{}", mention.prefix, value, mention.postfix),
                None => String::new(),
            };
        }
    }
    String::new()
}
