//! Plain/markdown text to HTML for chat replies.
//!
//! Covers what the assistant actually emits: paragraphs, line breaks,
//! `-`/`*` and numbered lists, `**bold**` and `*italic*`. Everything is
//! HTML-escaped first, so model output cannot inject markup.

use std::sync::LazyLock;

use regex::Regex;

static RE_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").unwrap());
static RE_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+?)\*").unwrap());
static RE_ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+(.*)$").unwrap());

enum Block {
    Paragraph(Vec<String>),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
}

impl Block {
    fn to_html(&self) -> String {
        match self {
            Block::Paragraph(lines) => format!("<p>{}</p>", lines.join("<br>")),
            Block::Bullets(items) => format!("<ul>{}</ul>", list_items(items)),
            Block::Numbered(items) => format!("<ol>{}</ol>", list_items(items)),
        }
    }
}

fn list_items(items: &[String]) -> String {
    items.iter().map(|i| format!("<li>{i}</li>")).collect()
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline(text: &str) -> String {
    let bolded = RE_BOLD.replace_all(text, "<strong>$1</strong>");
    RE_ITALIC.replace_all(&bolded, "<em>$1</em>").into_owned()
}

/// Render `text` as an HTML fragment.
pub fn to_html(text: &str) -> String {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            blocks.extend(current.take());
            continue;
        }
        let escaped = escape_html(line);

        if let Some(item) = escaped
            .strip_prefix("- ")
            .or_else(|| escaped.strip_prefix("* "))
        {
            let item = inline(item.trim());
            match current.as_mut() {
                Some(Block::Bullets(items)) => items.push(item),
                _ => {
                    blocks.extend(current.take());
                    current = Some(Block::Bullets(vec![item]));
                }
            }
        } else if let Some(caps) = RE_ORDERED.captures(&escaped) {
            let item = inline(caps[1].trim());
            match current.as_mut() {
                Some(Block::Numbered(items)) => items.push(item),
                _ => {
                    blocks.extend(current.take());
                    current = Some(Block::Numbered(vec![item]));
                }
            }
        } else {
            let line = inline(&escaped);
            match current.as_mut() {
                Some(Block::Paragraph(lines)) => lines.push(line),
                _ => {
                    blocks.extend(current.take());
                    current = Some(Block::Paragraph(vec![line]));
                }
            }
        }
    }
    blocks.extend(current);

    blocks.iter().map(Block::to_html).collect::<Vec<_>>().join("\n")
}
