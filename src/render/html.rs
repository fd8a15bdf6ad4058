use std::fmt::Write as _;

use super::nodes::{DisplayNode, RecommendationLink};
use crate::constants::INVALID_LINK_PLACEHOLDER;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Write nodes as an HTML fragment. All text is escaped; only validated
/// http(s) URLs become anchors.
pub fn to_html<I>(nodes: I) -> String
where
    I: IntoIterator<Item = DisplayNode>,
{
    let mut out = String::new();
    for node in nodes {
        match node {
            DisplayNode::Heading { level, text } => {
                let _ = writeln!(out, "<h{level}>{}</h{level}>", escape_html(&text));
            }
            DisplayNode::Paragraph { text } => {
                let _ = writeln!(out, "<p>{}</p>", escape_html(&text));
            }
            DisplayNode::LineBreak => out.push_str("<br>\n"),
            DisplayNode::Recommendation { title, link } => {
                let title = escape_html(&title);
                match link {
                    RecommendationLink::Valid(href) => {
                        let _ = writeln!(
                            out,
                            "<p class=\"recommendation\"><strong>{title}</strong> — <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></p>",
                            escape_html(&href),
                            escape_html(&href),
                        );
                    }
                    RecommendationLink::Invalid => {
                        let _ = writeln!(
                            out,
                            "<p class=\"recommendation\"><strong>{title}</strong> — {INVALID_LINK_PLACEHOLDER}</p>"
                        );
                    }
                }
            }
        }
    }
    out
}
