//! Delta op list to node chain.
//!
//! Each text op is split on newlines into leaf nodes; inline attribute
//! combinations become a nested single-child chain ordered by attribute
//! precedence. When a block terminator op (`"\n"` with a block attribute)
//! arrives, the preceding inline nodes are merged under it as children so
//! the block renders as one unit.

use deltadown_core::{
    resolve_embed, Attributes, DeltaMention, DeltaOp, Insert, ListKind, Node, NodeArena, NodeId,
    NodeKind, NodeOptions,
};

/// Attribute precedence: outermost kind first when several apply to the
/// same run.
const ATTR_ORDER: [(&str, NodeKind); 9] = [
    ("bold", NodeKind::Bold),
    ("italic", NodeKind::Italic),
    ("strike", NodeKind::Strike),
    ("link", NodeKind::Link),
    ("header", NodeKind::Header),
    ("blockquote", NodeKind::Blockquote),
    ("code", NodeKind::Code),
    ("code-block", NodeKind::CodeBlock),
    ("list", NodeKind::List),
];

pub(crate) fn build_chain(arena: &mut NodeArena, ops: &[DeltaOp], mentions: &[DeltaMention]) {
    let mut tail = arena.head();
    for op in ops {
        let kinds = kinds_from_attributes(op.attributes.as_ref());
        let options = options_from_attributes(op.attributes.as_ref());
        tail = append_op(arena, tail, op, &kinds, options, mentions);
        if arena[tail].kind.is_some_and(NodeKind::is_block) {
            tail = merge_block(arena, tail);
        }
    }
}

fn kinds_from_attributes(attributes: Option<&Attributes>) -> Vec<NodeKind> {
    let Some(attrs) = attributes else {
        return Vec::new();
    };
    ATTR_ORDER
        .iter()
        .filter(|(key, _)| attrs.get(*key).is_some_and(|v| v.is_truthy()))
        .map(|(_, kind)| *kind)
        .collect()
}

fn options_from_attributes(attributes: Option<&Attributes>) -> NodeOptions {
    let Some(attrs) = attributes else {
        return NodeOptions::default();
    };
    NodeOptions {
        link: attrs
            .get("link")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        header: attrs.get("header").and_then(|v| v.as_i64()),
        list: attrs
            .get("list")
            .and_then(|v| v.as_str())
            .and_then(ListKind::parse),
        indent: attrs
            .get("indent")
            .and_then(|v| v.as_i64())
            .filter(|i| *i > 0)
            .unwrap_or(0) as usize,
        mention: None,
    }
}

/// Append the nodes for one op and return the new tail. A bare `"\n"`
/// text op appends a single terminator node carrying the op's first kind;
/// anything else is split on newlines into leaf runs separated by plain
/// `"\n"` nodes.
fn append_op(
    arena: &mut NodeArena,
    tail: NodeId,
    op: &DeltaOp,
    kinds: &[NodeKind],
    options: NodeOptions,
    mentions: &[DeltaMention],
) -> NodeId {
    let content = match &op.insert {
        Insert::Text(text) => text.clone(),
        Insert::Embed(payload) => resolve_embed(payload, mentions),
    };

    let is_terminator = matches!(&op.insert, Insert::Text(t) if t == "\n");
    if !is_terminator {
        let mut tail = tail;
        let pieces: Vec<&str> = content.split('\n').collect();
        if pieces.iter().all(|p| p.is_empty()) {
            // Newline-only content stays one run; splitting it would lose
            // the newlines entirely.
            if !content.is_empty() {
                tail = append_leaf(arena, tail, &content, kinds, &options);
            }
            return tail;
        }
        for (i, piece) in pieces.iter().enumerate() {
            if !piece.is_empty() {
                tail = append_leaf(arena, tail, piece, kinds, &options);
            }
            if i + 1 < pieces.len() {
                let id = arena.alloc(Node::text("\n"));
                tail = arena.append(tail, id);
            }
        }
        return tail;
    }

    let node = Node {
        kind: kinds.first().copied(),
        text: content,
        options,
        ..Default::default()
    };
    let id = arena.alloc(node);
    arena.append(tail, id)
}

/// One text run with its attribute kinds nested outermost-first.
fn append_leaf(
    arena: &mut NodeArena,
    tail: NodeId,
    text: &str,
    kinds: &[NodeKind],
    options: &NodeOptions,
) -> NodeId {
    let node = Node {
        kind: kinds.first().copied(),
        text: text.to_string(),
        options: options.clone(),
        ..Default::default()
    };
    let id = arena.alloc(node);
    let tail = arena.append(tail, id);

    let mut current = id;
    for kind in kinds.iter().skip(1) {
        arena[current].text.clear();
        let child = arena.alloc(Node::new(*kind, text, options.clone()));
        arena[current].children.push(child);
        current = child;
    }
    tail
}

/// Pull the inline nodes preceding a block terminator under it as
/// children, stopping at the sentinel, at a previous terminator's plain
/// `"\n"` closer, or at an unmerged `"\n"` separator. Returns the new
/// tail (a plain closer when anything merged).
fn merge_block(arena: &mut NodeArena, block: NodeId) -> NodeId {
    let mut collected = Vec::new();
    loop {
        let Some(prev) = arena[block].prev else {
            break;
        };
        if arena.is_head(prev) || arena[prev].text == "\n" {
            break;
        }
        // Detach prev from the chain.
        let before = arena[prev].prev;
        arena[block].prev = before;
        if let Some(b) = before {
            arena[b].next = Some(block);
        }
        arena[prev].prev = None;
        arena[prev].next = None;
        collected.push(prev);
    }

    if collected.is_empty() {
        return block;
    }
    collected.reverse();
    for id in collected {
        arena[block].children.push(id);
    }
    let closer = arena.alloc(Node::text("\n"));
    arena.insert_after(block, closer);
    closer
}

#[cfg(test)]
mod tests {
    use super::*;
    use deltadown_core::AttrValue;

    fn attrs(pairs: &[(&str, AttrValue)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_kinds_follow_precedence_order() {
        let attrs = attrs(&[
            ("italic", AttrValue::Bool(true)),
            ("bold", AttrValue::Bool(true)),
        ]);
        let kinds = kinds_from_attributes(Some(&attrs));
        assert_eq!(kinds, vec![NodeKind::Bold, NodeKind::Italic]);
    }

    #[test]
    fn test_falsy_attributes_are_skipped() {
        let attrs = attrs(&[
            ("bold", AttrValue::Bool(false)),
            ("header", AttrValue::Int(0)),
            ("list", AttrValue::Str(String::new())),
        ]);
        assert!(kinds_from_attributes(Some(&attrs)).is_empty());
    }

    #[test]
    fn test_nested_kinds_share_text() {
        let mut arena = NodeArena::new();
        let ops = vec![DeltaOp::attributed(
            "both",
            attrs(&[
                ("bold", AttrValue::Bool(true)),
                ("italic", AttrValue::Bool(true)),
            ]),
        )];
        build_chain(&mut arena, &ops, &[]);

        let first = arena.iter_chain().next().unwrap();
        assert_eq!(arena[first].kind, Some(NodeKind::Bold));
        assert_eq!(arena[first].text, "");
        let child = arena[first].children[0];
        assert_eq!(arena[child].kind, Some(NodeKind::Italic));
        assert_eq!(arena[child].text, "both");
    }

    #[test]
    fn test_block_terminator_merges_preceding_runs() {
        let mut arena = NodeArena::new();
        let ops = vec![
            DeltaOp::text("Head 1"),
            DeltaOp::attributed("\n", attrs(&[("header", AttrValue::Int(1))])),
        ];
        build_chain(&mut arena, &ops, &[]);

        let chain: Vec<NodeId> = arena.iter_chain().collect();
        assert_eq!(chain.len(), 2);
        assert_eq!(arena[chain[0]].kind, Some(NodeKind::Header));
        assert_eq!(arena[chain[0]].options.header, Some(1));
        let child = arena[chain[0]].children[0];
        assert_eq!(arena[child].text, "Head 1");
        assert_eq!(arena[chain[1]].text, "\n");
        assert_eq!(arena[chain[1]].kind, None);
    }

    #[test]
    fn test_merge_stops_at_previous_closer() {
        let mut arena = NodeArena::new();
        let ops = vec![
            DeltaOp::text("Quote 1"),
            DeltaOp::attributed("\n", attrs(&[("blockquote", AttrValue::Bool(true))])),
            DeltaOp::text("Quote 2"),
            DeltaOp::attributed("\n", attrs(&[("blockquote", AttrValue::Bool(true))])),
        ];
        build_chain(&mut arena, &ops, &[]);

        let chain: Vec<NodeId> = arena.iter_chain().collect();
        assert_eq!(chain.len(), 4);
        assert_eq!(arena[chain[0]].kind, Some(NodeKind::Blockquote));
        assert_eq!(arena[chain[0]].children.len(), 1);
        assert_eq!(arena[chain[2]].kind, Some(NodeKind::Blockquote));
        assert_eq!(arena[chain[2]].children.len(), 1);
    }

    #[test]
    fn test_multiline_text_splits_into_runs() {
        let mut arena = NodeArena::new();
        build_chain(&mut arena, &[DeltaOp::text("Line 1\nLine 2")], &[]);

        let texts: Vec<String> = arena
            .iter_chain()
            .map(|id| arena[id].text.clone())
            .collect();
        assert_eq!(texts, vec!["Line 1", "\n", "Line 2"]);
    }

    #[test]
    fn test_unresolved_embed_appends_nothing() {
        let mut arena = NodeArena::new();
        let mut payload = deltadown_core::EmbedPayload::new();
        payload.insert("id".to_string(), AttrValue::Str("1".to_string()));
        build_chain(&mut arena, &[DeltaOp::embed("mention", payload)], &[]);
        assert_eq!(arena.iter_chain().count(), 0);
    }
}
