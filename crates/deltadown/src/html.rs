//! Node chain to HTML.
//!
//! Rendering happens in two passes: the chain walk emits raw fragments
//! with list state tracked in [`ListLevels`], then [`clean`] rewrites the
//! artifacts the walk cannot see locally (stray newlines, headings
//! followed by breaks, nested list openings).

use deltadown_core::{ListKind, NodeArena, NodeId, NodeKind};

use crate::lists::ListLevels;
use crate::markdown::trailing_newlines;
use crate::{ConvertError, Result};

pub(crate) fn render(arena: &NodeArena) -> Result<String> {
    let mut renderer = HtmlRenderer::default();
    let mut out = String::new();
    for id in arena.iter_chain() {
        out.push_str(&renderer.node_html(arena, id, false)?);
    }
    Ok(clean(out.trim_end()))
}

fn clean(html: &str) -> String {
    let mut html = html.replace('\n', "<br>");
    for tag in ["h1", "h2", "h3"] {
        html = html.replace(&format!("</{tag}><br>"), &format!("</{tag}>"));
    }
    // A sublist opening directly after an item belongs inside that item.
    html = html.replace("</li><li><ul>", "<ul>");
    html = html.replace("</li><li><ol>", "<ol>");
    match html.strip_suffix("<br>") {
        Some(stripped) => stripped.to_string(),
        None => html,
    }
}

#[derive(Default)]
struct HtmlRenderer {
    levels: ListLevels,
}

impl HtmlRenderer {
    fn node_html(&mut self, arena: &NodeArena, id: NodeId, in_list_item: bool) -> Result<String> {
        let node = &arena[id];
        if node.kind.is_some() && node.kind != Some(NodeKind::List) && !in_list_item {
            self.levels.reset();
        }
        match node.kind {
            Some(NodeKind::Bold) => Ok(format!("<b>{}</b>", self.content(arena, id)?)),
            Some(NodeKind::Italic) => Ok(format!("<i>{}</i>", self.content(arena, id)?)),
            Some(NodeKind::Strike) => Ok(format!("<s>{}</s>", self.content(arena, id)?)),
            Some(NodeKind::Code) => Ok(format!("<code>{}</code>", self.content(arena, id)?)),
            Some(NodeKind::Link) => {
                let url = node.options.link.as_deref().unwrap_or("");
                Ok(format!(
                    "<a href=\"{}\" target=\"_blank\">{}</a>",
                    url,
                    self.content(arena, id)?
                ))
            }
            Some(NodeKind::Header) => {
                let level = node.options.header.unwrap_or(0);
                if !(1..=3).contains(&level) {
                    return Err(ConvertError::HeaderLevel(level));
                }
                let content = self.children_content(arena, id)?;
                Ok(format!("<h{level}>{content}</h{level}>"))
            }
            Some(NodeKind::Blockquote) => Ok(format!(
                "<blockquote>{}{}</blockquote>",
                self.children_content(arena, id)?,
                trailing_newlines(&node.text)
            )),
            Some(NodeKind::CodeBlock) => Ok(format!(
                "<pre>{}{}</pre>",
                self.children_content(arena, id)?,
                trailing_newlines(&node.text)
            )),
            Some(NodeKind::List) => self.list_html(arena, id),
            Some(NodeKind::Mention) => {
                let mention = node.options.mention.clone().unwrap_or_default();
                let denotation = if mention.mention_type == "mention" {
                    mention.denotation_char.as_str()
                } else {
                    ""
                };
                Ok(format!(
                    "<span class=\"mention-item {}-type\">{}{}</span>",
                    mention.mention_type, denotation, mention.value
                ))
            }
            None => {
                if node.text == "\n" {
                    // The gap separating a blockquote from the next block
                    // carries no visible content.
                    let after_quote = node
                        .prev
                        .is_some_and(|p| arena[p].kind == Some(NodeKind::Blockquote));
                    let before_typed = node.next.is_some_and(|n| arena[n].kind.is_some());
                    if after_quote && before_typed {
                        return Ok(String::new());
                    }
                }
                Ok(node.text.replace("\n\n", "<br>"))
            }
        }
    }

    fn list_html(&mut self, arena: &NodeArena, id: NodeId) -> Result<String> {
        let node = &arena[id];
        let list = node.options.list.unwrap_or(ListKind::Bullet);
        let indent = node.options.indent;
        let tag = match list {
            ListKind::Bullet => "ul",
            ListKind::Ordered => "ol",
        };

        let mut out = String::new();
        // A deeper level left open by the previous item closes here.
        if self.levels.contains(ListKind::Ordered, indent + 1) {
            out.push_str("</ol></li>");
            self.levels.remove(ListKind::Ordered, indent + 1);
        } else if self.levels.contains(ListKind::Bullet, indent + 1) {
            out.push_str("</ul></li>");
            self.levels.remove(ListKind::Bullet, indent + 1);
        }
        if !self.levels.contains(list, indent) {
            if indent > 0 {
                out.push_str("<li>");
            }
            out.push('<');
            out.push_str(tag);
            out.push('>');
            self.levels.open(list, indent);
        }
        out.push_str("<li>");
        self.levels.bump(list, indent);
        out.push_str(&self.children_content(arena, id)?);
        out.push_str("</li>");

        let next_is_list = node
            .next
            .is_some_and(|n| arena[n].kind == Some(NodeKind::List));
        if !next_is_list {
            out.push_str(&format!("</{tag}>"));
            for _ in 1..self.levels.depth(ListKind::Bullet) {
                out.push_str("</li></ul>");
            }
            self.levels.clear(ListKind::Bullet);
            for _ in 1..self.levels.depth(ListKind::Ordered) {
                out.push_str("</li></ol>");
            }
            self.levels.clear(ListKind::Ordered);
        }
        Ok(out)
    }

    /// Children's rendering, or the node's own text when it has none.
    fn content(&mut self, arena: &NodeArena, id: NodeId) -> Result<String> {
        let sub = self.children_content(arena, id)?;
        if sub.is_empty() {
            Ok(arena[id].text.clone())
        } else {
            Ok(sub)
        }
    }

    fn children_content(&mut self, arena: &NodeArena, id: NodeId) -> Result<String> {
        let mut out = String::new();
        for &child in &arena[id].children {
            out.push_str(&self.node_html(arena, child, true)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_turns_newlines_into_breaks() {
        assert_eq!(clean("a\nb"), "a<br>b");
    }

    #[test]
    fn test_clean_drops_break_after_heading() {
        assert_eq!(clean("<h1>x</h1>\ny"), "<h1>x</h1>y");
        assert_eq!(clean("<h3>x</h3>\ny"), "<h3>x</h3>y");
    }

    #[test]
    fn test_clean_moves_sublist_inside_item() {
        assert_eq!(
            clean("<ul><li>a</li><li><ul><li>b</li></ul></li></ul>"),
            "<ul><li>a<ul><li>b</li></ul></li></ul>"
        );
    }

    #[test]
    fn test_clean_strips_one_trailing_break() {
        assert_eq!(clean("a\n"), "a");
        assert_eq!(clean("a\n\n"), "a<br>");
    }
}
