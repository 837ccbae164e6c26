//! Node chain to normalized delta ops.
//!
//! Emission walks the chain twice. A terminator pass first splices a
//! kind-carrying `"\n"` marker after every block node, since delta block
//! attributes live on such markers rather than on the content run. The
//! render pass then flattens each top-level node (with its child tree)
//! into ops, and [`normalize`] folds the separator artifacts the
//! tokenizer leaves between blocks.

use deltadown_core::{
    AttrValue, Attributes, DeltaOp, EmbedPayload, Insert, MentionOptions, Node, NodeArena, NodeId,
    NodeKind,
};

const BLOCK_ATTRS: [&str; 4] = ["header", "blockquote", "code-block", "list"];

/// Insert a kind-carrying `"\n"` terminator after every block node whose
/// own text is not already one.
pub(crate) fn insert_block_terminators(arena: &mut NodeArena) {
    let ids: Vec<NodeId> = arena.iter_chain().collect();
    for id in ids {
        let (kind, options) = {
            let node = &arena[id];
            match node.kind {
                Some(kind) if kind.is_block() && node.text != "\n" => {
                    (kind, node.options.clone())
                }
                _ => continue,
            }
        };
        let closer = arena.alloc(Node::new(kind, "\n", options));
        arena.insert_after(id, closer);
    }
}

pub(crate) fn render(arena: &NodeArena) -> Vec<DeltaOp> {
    let mut ops = Vec::new();
    for id in arena.iter_chain() {
        let node = &arena[id];
        if node.kind == Some(NodeKind::Mention) {
            if let Some(mention) = &node.options.mention {
                ops.push(mention_op(mention));
            }
            continue;
        }
        if node.kind == Some(NodeKind::List) && !node.children.is_empty() {
            // List items never combine into one op; each child run gets
            // its own op while the list attribute rides the terminator.
            for &child in &node.children {
                push_op(&mut ops, arena, child);
            }
        } else {
            push_op(&mut ops, arena, id);
        }
    }
    ops
}

fn push_op(ops: &mut Vec<DeltaOp>, arena: &NodeArena, id: NodeId) {
    let text = subtree_text(arena, id);
    let mut attrs = Attributes::new();
    collect_attrs(arena, id, &mut attrs);
    ops.push(DeltaOp::attributed(text, attrs));
}

fn subtree_text(arena: &NodeArena, id: NodeId) -> String {
    let mut out = arena[id].text.clone();
    for &child in &arena[id].children {
        out.push_str(&subtree_text(arena, child));
    }
    out
}

fn collect_attrs(arena: &NodeArena, id: NodeId, attrs: &mut Attributes) {
    let node = &arena[id];
    let terminator = node.text == "\n";
    match node.kind {
        Some(NodeKind::Bold) => {
            attrs.insert("bold".to_string(), true.into());
        }
        Some(NodeKind::Italic) => {
            attrs.insert("italic".to_string(), true.into());
        }
        Some(NodeKind::Strike) => {
            attrs.insert("strike".to_string(), true.into());
        }
        Some(NodeKind::Code) => {
            attrs.insert("code".to_string(), true.into());
        }
        Some(NodeKind::Link) => {
            let url = node.options.link.clone().unwrap_or_default();
            attrs.insert("link".to_string(), AttrValue::Str(url));
        }
        Some(NodeKind::Header) if terminator => {
            attrs.insert(
                "header".to_string(),
                AttrValue::Int(node.options.header.unwrap_or(0)),
            );
        }
        Some(NodeKind::Blockquote) if terminator => {
            attrs.insert("blockquote".to_string(), true.into());
        }
        Some(NodeKind::CodeBlock) if terminator => {
            attrs.insert("code-block".to_string(), true.into());
        }
        Some(NodeKind::List) if terminator => {
            if let Some(list) = node.options.list {
                attrs.insert("list".to_string(), list.as_str().into());
            }
            if node.options.indent > 0 {
                attrs.insert(
                    "indent".to_string(),
                    AttrValue::Int(node.options.indent as i64),
                );
            }
        }
        _ => {}
    }
    for &child in &node.children {
        collect_attrs(arena, child, attrs);
    }
}

fn mention_op(mention: &MentionOptions) -> DeltaOp {
    let mut payload = EmbedPayload::new();
    payload.insert("index".to_string(), mention.index.as_str().into());
    payload.insert(
        "denotationChar".to_string(),
        mention.denotation_char.as_str().into(),
    );
    payload.insert("value".to_string(), mention.value.as_str().into());
    payload.insert("id".to_string(), mention.id.as_str().into());
    DeltaOp::embed(mention.mention_type.clone(), payload)
}

/// Fold the raw op stream into the canonical delta shape: empty runs
/// disappear, gaps between equally-formatted blocks fold into the earlier
/// terminator, redundant separators after block terminators drop, double
/// newlines collapse, and the document gains a final bare `"\n"` unless
/// it already ends with one.
pub(crate) fn normalize(raw: Vec<DeltaOp>) -> Vec<DeltaOp> {
    let mut ops: Vec<DeltaOp> = Vec::with_capacity(raw.len());
    for (i, op) in raw.iter().enumerate() {
        let Insert::Text(text) = &op.insert else {
            ops.push(op.clone());
            continue;
        };
        if text.is_empty() {
            continue;
        }

        if op.attributes.is_none() && (text == "\n" || text == "\n\n") {
            let folds = i.checked_sub(1).and_then(|p| raw.get(p)).is_some_and(|prev| {
                matches!(&prev.insert, Insert::Text(t) if t == "\n")
                    && BLOCK_ATTRS.iter().any(|key| prev.has_attr(key))
                    && !prev.has_attr("list")
                    && raw
                        .get(i + 2)
                        .is_some_and(|next| next.attributes == prev.attributes)
            });
            if folds {
                if let Some(Insert::Text(last)) = ops.last_mut().map(|o| &mut o.insert) {
                    last.push('\n');
                    continue;
                }
            }
            if text == "\n" && last_has_block_attr(&ops) {
                continue;
            }
        }

        let text = text.replace("\n\n", "\n");
        let text = if text.starts_with('\n')
            && text.len() > 1
            && ops.last().is_some_and(|o| o.has_attr("list"))
        {
            text[1..].to_string()
        } else {
            text
        };
        ops.push(DeltaOp {
            insert: Insert::Text(text),
            attributes: op.attributes.clone(),
        });
    }

    let clean_ending = ops.last().is_some_and(|op| {
        op.attributes.is_none() && matches!(&op.insert, Insert::Text(t) if t.ends_with('\n'))
    });
    if !clean_ending {
        ops.push(DeltaOp::text("\n"));
    }
    ops
}

fn last_has_block_attr(ops: &[DeltaOp]) -> bool {
    ops.last()
        .is_some_and(|op| BLOCK_ATTRS.iter().any(|key| op.has_attr(key)))
}
