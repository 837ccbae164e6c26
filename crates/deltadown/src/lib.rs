//! # deltadown
//!
//! Convert between Quill-style delta op lists, Markdown, and HTML.
//!
//! ## Design
//!
//! All three directions share one intermediate structure, the node chain:
//! a forward list of nodes, each optionally owning a small child tree for
//! nested inline styling.
//!
//! ```text
//! Delta ops ──builder──▶ ┌────────────┐ ──▶ Markdown string
//!                        │ Node chain │
//! Markdown ──tokenizer─▶ │            │ ──▶ HTML string
//!                        └────────────┘ ──▶ Delta ops
//! ```
//!
//! Each entry point is a pure function: it builds a fresh chain and fresh
//! renderer state, performs one pass, and returns. Malformed markdown
//! degrades into the closest literal rendering instead of erroring;
//! only caller contract violations (a header level outside 1-3, an
//! uncompilable mention pattern) fail fast.
//!
//! ## Example
//!
//! ```rust
//! use deltadown::{delta_to_markdown, markdown_to_delta, DeltaOp};
//!
//! let ops = markdown_to_delta("**Bold** text", None).unwrap();
//! assert_eq!(ops.first().and_then(|op| op.insert.as_text()), Some("Bold"));
//!
//! let markdown = delta_to_markdown(&ops, None).unwrap();
//! assert_eq!(markdown, "**Bold** text");
//! ```

mod builder;
mod delta;
mod html;
mod lists;
mod markdown;
mod tokenizer;

pub use deltadown_core::{
    AttrValue, Attributes, DeltaMention, DeltaOp, EmbedPayload, Insert, ListKind, MentionOptions,
    MentionValue, Node, NodeArena, NodeId, NodeKind, NodeOptions, StringMention,
};

use deltadown_core::NodeArena as Arena;

/// Error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A `header` attribute carried a level outside the supported 1-3 range.
    #[error("header level {0} is out of range (expected 1-3)")]
    HeaderLevel(i64),

    /// A reverse mention descriptor's pattern failed to compile.
    #[error("invalid mention pattern `{pattern}`")]
    MentionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Render a delta op list as Markdown.
///
/// `mentions` maps embed payloads to their markdown text form; embeds
/// with no matching descriptor render as empty text.
pub fn delta_to_markdown(ops: &[DeltaOp], mentions: Option<&[DeltaMention]>) -> Result<String> {
    let mut arena = Arena::new();
    builder::build_chain(&mut arena, ops, mentions.unwrap_or_default());
    markdown::render(&arena)
}

/// Parse Markdown into a normalized delta op list.
///
/// `mentions` configures the reverse mention patterns matched before any
/// other tokenizer rule.
pub fn markdown_to_delta(
    markdown: &str,
    mentions: Option<&[StringMention]>,
) -> Result<Vec<DeltaOp>> {
    let mut arena = Arena::new();
    tokenizer::build_chain(&mut arena, markdown, mentions.unwrap_or_default())?;
    delta::insert_block_terminators(&mut arena);
    Ok(delta::normalize(delta::render(&arena)))
}

/// Render Markdown as HTML.
pub fn markdown_to_html(markdown: &str, mentions: Option<&[StringMention]>) -> Result<String> {
    let mut arena = Arena::new();
    tokenizer::build_chain(&mut arena, markdown, mentions.unwrap_or_default())?;
    html::render(&arena)
}
