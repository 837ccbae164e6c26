//! deltadown-core - delta op and node chain data model
//!
//! This crate provides the core data structures shared by all conversion
//! directions in `deltadown`: the delta operation list (the JSON-shaped
//! rich-text format produced by Quill-style editors), the intermediate
//! node chain, and the mention descriptor tables.
//!
//! # Architecture
//!
//! ```text
//! Delta ops ──builder──▶ ┌────────────┐ ──▶ Markdown string
//!                        │ Node chain │
//! Markdown ──tokenizer─▶ │  (arena)   │ ──▶ HTML string
//!                        └────────────┘ ──▶ Delta ops
//! ```
//!
//! The node chain is a forward list whose elements may own small child
//! trees for nested inline styling. It is stored in a [`NodeArena`]
//! (a growable vector addressed by [`NodeId`]) so that nodes can hold
//! back-references to their predecessors without ownership cycles.

mod mention;
mod node;
mod ops;

pub use mention::{resolve_embed, DeltaMention, MentionValue, StringMention};
pub use node::{ListKind, MentionOptions, Node, NodeArena, NodeId, NodeKind, NodeOptions};
pub use ops::{AttrValue, Attributes, DeltaOp, EmbedPayload, Insert};
