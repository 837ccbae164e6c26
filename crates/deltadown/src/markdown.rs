//! Node chain to Markdown.

use deltadown_core::{ListKind, NodeArena, NodeId, NodeKind};

use crate::lists::ListLevels;
use crate::{ConvertError, Result};

pub(crate) fn render(arena: &NodeArena) -> Result<String> {
    let mut renderer = MarkdownRenderer::default();
    let mut out = String::new();
    for id in arena.iter_chain() {
        out.push_str(&renderer.node_text(arena, id, false)?);
    }
    Ok(out.trim_end().to_string())
}

#[derive(Default)]
struct MarkdownRenderer {
    levels: ListLevels,
}

impl MarkdownRenderer {
    fn node_text(&mut self, arena: &NodeArena, id: NodeId, in_list_item: bool) -> Result<String> {
        let node = &arena[id];
        if node.kind.is_some() && node.kind != Some(NodeKind::List) && !in_list_item {
            self.levels.reset();
        }
        match node.kind {
            Some(NodeKind::Bold) => Ok(wrap_emphasis(&self.content(arena, id)?, "**")),
            Some(NodeKind::Italic) => Ok(wrap_emphasis(&self.content(arena, id)?, "_")),
            Some(NodeKind::Strike) => Ok(wrap_emphasis(&self.content(arena, id)?, "~~")),
            Some(NodeKind::Code) => Ok(format!("`{}`", self.content(arena, id)?)),
            Some(NodeKind::Link) => {
                let url = node.options.link.as_deref().unwrap_or("");
                Ok(format!("[{}]({})", node.text, url))
            }
            Some(NodeKind::Header) => {
                let level = node.options.header.unwrap_or(0);
                let content = self.children_content(arena, id)?;
                header_text(level, &content)
            }
            Some(NodeKind::Blockquote) => {
                let content = self.children_content(arena, id)?;
                Ok(format!("> {}{}", content, trailing_newlines(&node.text)))
            }
            Some(NodeKind::CodeBlock) => {
                let content = self.children_content(arena, id)?;
                Ok(format!("    {}{}", content, trailing_newlines(&node.text)))
            }
            Some(NodeKind::List) => {
                let list = node.options.list.unwrap_or(ListKind::Bullet);
                let indent = node.options.indent;
                let ordinal = self.levels.bump(list, indent);
                self.levels.clear_deeper(list, indent);
                self.levels.clear_other_up_to(list, indent);
                let content = self.children_content(arena, id)?;
                let marker = match list {
                    ListKind::Bullet => "*".to_string(),
                    ListKind::Ordered => format!("{ordinal}."),
                };
                Ok(format!("{}{} {}", "    ".repeat(indent), marker, content))
            }
            Some(NodeKind::Mention) | None => {
                if node.text == "\n" {
                    Ok("\n\n".to_string())
                } else {
                    Ok(node.text.clone())
                }
            }
        }
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
            out.push_str(&self.node_text(arena, child, true)?);
        }
        Ok(out)
    }
}

/// Emphasis markers hug the text: boundary whitespace moves outside the
/// markers, and whitespace-only content is returned unwrapped.
fn wrap_emphasis(content: &str, marker: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_string();
    }
    let lead = &content[..content.len() - content.trim_start().len()];
    let trail = &content[content.trim_end().len()..];
    format!("{lead}{marker}{trimmed}{marker}{trail}")
}

fn header_text(level: i64, content: &str) -> Result<String> {
    match level {
        1 => Ok(format!("{}\n{}", content, "=".repeat(content.chars().count()))),
        2 => Ok(format!("{}\n{}", content, "-".repeat(content.chars().count()))),
        3 => Ok(format!("### {content}")),
        other => Err(ConvertError::HeaderLevel(other)),
    }
}

/// Newlines a block's own text carries beyond its terminating one; they
/// reproduce the blank lines that followed the block in the source.
pub(crate) fn trailing_newlines(text: &str) -> String {
    "\n".repeat(text.split('\n').count().saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_emphasis_moves_boundary_spaces_out() {
        assert_eq!(wrap_emphasis("text", "**"), "**text**");
        assert_eq!(wrap_emphasis(" text ", "_"), " _text_ ");
        assert_eq!(wrap_emphasis("  ", "~~"), "  ");
    }

    #[test]
    fn test_header_underline_matches_content_length() {
        assert_eq!(header_text(1, "Head 1").unwrap(), "Head 1\n======");
        assert_eq!(header_text(2, "Head 2").unwrap(), "Head 2\n------");
        assert_eq!(header_text(3, "Head 3").unwrap(), "### Head 3");
    }

    #[test]
    fn test_header_level_out_of_range() {
        assert!(matches!(
            header_text(4, "x"),
            Err(ConvertError::HeaderLevel(4))
        ));
        assert!(matches!(
            header_text(0, "x"),
            Err(ConvertError::HeaderLevel(0))
        ));
    }

    #[test]
    fn test_trailing_newlines_counts_extra_lines() {
        assert_eq!(trailing_newlines("\n"), "");
        assert_eq!(trailing_newlines("\n\n"), "\n");
        assert_eq!(trailing_newlines("\n\n\n"), "\n\n");
    }
}
