//! Markdown tokenizer and chain assembly.
//!
//! The tokenizer splits the source into segments: unclaimed text and
//! claimed tokens. Each rule scans only the unclaimed segments left by
//! earlier rules, claiming its matches in place. Once every rule has run,
//! claimed tokens (except links and mentions, whose text is final)
//! recursively tokenize their inner text, and the resulting token trees
//! become the node chain.

use deltadown_core::{
    ListKind, Node, NodeArena, NodeId, NodeKind, NodeOptions, StringMention,
};
use regex::{Captures, Regex};

use crate::{ConvertError, Result};

mod rules;

use rules::{rule_table, RuleKind};

pub(crate) fn build_chain(
    arena: &mut NodeArena,
    markdown: &str,
    mentions: &[StringMention],
) -> Result<()> {
    let tokenizer = Tokenizer::new(mentions)?;
    // A trailing newline lets line-anchored rules claim the last line.
    let mut text = markdown.to_string();
    text.push('\n');
    let tokens = tokenizer.tokenize(&text);
    let mut tail = arena.head();
    append_tokens(arena, &mut tail, &tokens);
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct Token {
    kind: Option<NodeKind>,
    text: String,
    options: NodeOptions,
    children: Vec<Token>,
}

impl Token {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn tagged(kind: NodeKind, text: String, options: NodeOptions) -> Self {
        Self {
            kind: Some(kind),
            text,
            options,
            children: Vec::new(),
        }
    }
}

enum Segment {
    Open(String),
    Claimed(Token),
}

struct Tokenizer<'a> {
    mentions: Vec<(&'a StringMention, Regex)>,
}

impl<'a> Tokenizer<'a> {
    fn new(mentions: &'a [StringMention]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(mentions.len());
        for mention in mentions {
            let re = Regex::new(&mention.pattern).map_err(|source| {
                ConvertError::MentionPattern {
                    pattern: mention.pattern.clone(),
                    source,
                }
            })?;
            compiled.push((mention, re));
        }
        Ok(Self {
            mentions: compiled,
        })
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut segments = vec![Segment::Open(text.to_string())];
        for (mention, re) in &self.mentions {
            apply_rule(&mut segments, re, |caps| {
                let captured = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let options = NodeOptions {
                    mention: Some(mention.resolve(captured)),
                    ..Default::default()
                };
                vec![Segment::Claimed(Token::tagged(
                    NodeKind::Mention,
                    caps[0].to_string(),
                    options,
                ))]
            });
        }
        for (kind, re) in rule_table() {
            apply_rule(&mut segments, re, |caps| rule_outcome(*kind, caps));
        }

        let mut tokens: Vec<Token> = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Open(text) => Token::text(text),
                Segment::Claimed(token) => token,
            })
            .collect();
        for token in &mut tokens {
            if let Some(kind) = token.kind {
                if !matches!(kind, NodeKind::Link | NodeKind::Mention) {
                    token.children = self.tokenize(&token.text);
                }
            }
        }
        tokens
    }
}

/// Run one rule over every unclaimed segment, replacing matches with the
/// claimed segments the rule produces and keeping unmatched text open for
/// later rules. Empty leftovers disappear.
fn apply_rule<F>(segments: &mut Vec<Segment>, re: &Regex, mut outcome: F)
where
    F: FnMut(&Captures) -> Vec<Segment>,
{
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments.drain(..) {
        let text = match segment {
            Segment::Claimed(_) => {
                result.push(segment);
                continue;
            }
            Segment::Open(text) => text,
        };
        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let matched = caps.get(0).expect("whole match always present");
            if matched.start() > last {
                result.push(Segment::Open(text[last..matched.start()].to_string()));
            }
            result.extend(outcome(&caps));
            last = matched.end();
        }
        if last < text.len() {
            result.push(Segment::Open(text[last..].to_string()));
        }
    }
    *segments = result;
}

fn rule_outcome(kind: RuleKind, caps: &Captures) -> Vec<Segment> {
    let token = match kind {
        RuleKind::ListBullet | RuleKind::ListOrdered => {
            let list = match kind {
                RuleKind::ListBullet => ListKind::Bullet,
                _ => ListKind::Ordered,
            };
            let options = NodeOptions {
                list: Some(list),
                indent: caps[2].len() / 4,
                ..Default::default()
            };
            Token::tagged(NodeKind::List, caps[3].to_string(), options)
        }
        RuleKind::MarkdownLink => {
            let options = NodeOptions {
                link: Some(caps[2].to_string()),
                ..Default::default()
            };
            Token::tagged(NodeKind::Link, caps[1].to_string(), options)
        }
        RuleKind::Bold => Token::tagged(
            NodeKind::Bold,
            caps[1].to_string(),
            NodeOptions::default(),
        ),
        RuleKind::Italic => {
            // Boundary characters around the markers stay literal text;
            // they are claimed so no later rule reinterprets them.
            let before = caps[1].replace('_', "");
            let after = caps[3].replace('_', "");
            let mut out = Vec::new();
            if !before.is_empty() {
                out.push(Segment::Claimed(Token::text(before)));
            }
            out.push(Segment::Claimed(Token::tagged(
                NodeKind::Italic,
                caps[2].to_string(),
                NodeOptions::default(),
            )));
            if !after.is_empty() {
                out.push(Segment::Claimed(Token::text(after)));
            }
            return out;
        }
        RuleKind::Strike => Token::tagged(
            NodeKind::Strike,
            caps[1].to_string(),
            NodeOptions::default(),
        ),
        RuleKind::Header1 => header_token(1, caps[1].to_string()),
        RuleKind::Header2 => header_token(2, caps[1].to_string()),
        RuleKind::Header3 => header_token(3, caps[2].to_string()),
        RuleKind::Quote => Token::tagged(
            NodeKind::Blockquote,
            caps[2].to_string(),
            NodeOptions::default(),
        ),
        RuleKind::Code => Token::tagged(
            NodeKind::Code,
            caps[1].to_string(),
            NodeOptions::default(),
        ),
        RuleKind::CodeBlock => Token::tagged(
            NodeKind::CodeBlock,
            caps[2].to_string(),
            NodeOptions::default(),
        ),
        RuleKind::AutoLink => {
            let options = NodeOptions {
                link: Some(caps[1].to_string()),
                ..Default::default()
            };
            Token::tagged(NodeKind::Link, caps[1].to_string(), options)
        }
    };
    vec![Segment::Claimed(token)]
}

fn header_token(level: i64, text: String) -> Token {
    let options = NodeOptions {
        header: Some(level),
        ..Default::default()
    };
    Token::tagged(NodeKind::Header, text, options)
}

/// Turn top-level tokens into chain nodes. Consecutive bare `"\n"` runs
/// collapse into one separator node.
fn append_tokens(arena: &mut NodeArena, tail: &mut NodeId, tokens: &[Token]) {
    for token in tokens {
        match token.kind {
            None => {
                if token.text == "\n" && arena[*tail].text == "\n" {
                    continue;
                }
                let id = arena.alloc(Node::text(token.text.clone()));
                *tail = arena.append(*tail, id);
            }
            Some(kind)
                if matches!(kind, NodeKind::Link | NodeKind::Mention)
                    || token.children.is_empty() =>
            {
                let id = arena.alloc(Node::new(kind, token.text.clone(), token.options.clone()));
                *tail = arena.append(*tail, id);
            }
            Some(kind) => {
                let id = arena.alloc(Node {
                    kind: Some(kind),
                    options: token.options.clone(),
                    ..Default::default()
                });
                *tail = arena.append(*tail, id);
                append_child_tokens(arena, id, &token.children);
            }
        }
    }
}

fn append_child_tokens(arena: &mut NodeArena, parent: NodeId, tokens: &[Token]) {
    for token in tokens {
        match token.kind {
            None => {
                let id = arena.alloc(Node::text(token.text.clone()));
                arena[parent].children.push(id);
            }
            Some(kind)
                if matches!(kind, NodeKind::Link | NodeKind::Mention)
                    || token.children.is_empty() =>
            {
                let id = arena.alloc(Node::new(kind, token.text.clone(), token.options.clone()));
                arena[parent].children.push(id);
            }
            Some(kind) => {
                let id = arena.alloc(Node {
                    kind: Some(kind),
                    options: token.options.clone(),
                    ..Default::default()
                });
                arena[parent].children.push(id);
                append_child_tokens(arena, id, &token.children);
            }
        }
    }
}
