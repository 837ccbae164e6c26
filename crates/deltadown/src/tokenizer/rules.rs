//! Tokenizer rule table.
//!
//! Rule order is normative: earlier rules claim text before later ones
//! see it, so list markers win over emphasis, setext headings win over
//! quotes, and the autolink rule only sees what no other rule claimed.
//! `[\n$]` classes accept a literal `$` as an end-of-block marker in
//! addition to a newline; rules run per unclaimed segment, so `^` and `$`
//! anchor at segment boundaries.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RuleKind {
    ListBullet,
    ListOrdered,
    MarkdownLink,
    Bold,
    Italic,
    Strike,
    Header1,
    Header2,
    Header3,
    Quote,
    Code,
    CodeBlock,
    AutoLink,
}

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hardcoded rule pattern")
}

pub(super) fn rule_table() -> &'static [(RuleKind, Regex)] {
    static TABLE: Lazy<Vec<(RuleKind, Regex)>> = Lazy::new(|| {
        vec![
            (RuleKind::ListBullet, rule(r"(^|\n)( *)\* (.*)[\n$]")),
            (RuleKind::ListOrdered, rule(r"(^|\n)( *)[0-9]+\. (.*)[\n$]")),
            (
                RuleKind::MarkdownLink,
                rule(r"\[(.*?)\]\(([-a-zA-Z0-9@:%_+.~!,#?&/()=]*)\)"),
            ),
            (RuleKind::Bold, rule(r"\*\*([^*]*)\*\*")),
            (
                RuleKind::Italic,
                rule(r"((?:(?:^|[\s*~])_)|(?:_[\s*~]))([^_]*)((?:[\s*~]_)|(?:_(?:[\s*~]|$)))"),
            ),
            (RuleKind::Strike, rule(r"~~((?:[^~]~?)*)~~")),
            (RuleKind::Header1, rule(r"(.*)\n=+\n[\n$]?")),
            (RuleKind::Header2, rule(r"(.*)\n-+\n[\n$]?")),
            (RuleKind::Header3, rule(r"(^|\n)#+\s(.*)\n[\n$]?")),
            (RuleKind::Quote, rule(r"(^|\n)>\s(.*)[\n$]")),
            (RuleKind::Code, rule(r"`([^`]*)`")),
            (RuleKind::CodeBlock, rule(r"(^|\n)    (.*)[\n$]")),
            (
                RuleKind::AutoLink,
                rule(
                    r"(?:^|\n)((?:http(s)?://.)?(?:[\w]+\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-z]{1,63}\b(?:[-a-zA-Z0-9@:%_+.~#!?&/=,]*))[\n$]",
                ),
            ),
        ]
    });
    &TABLE
}
