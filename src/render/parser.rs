//! Line grammar for model answers.
//!
//! Flat and line-oriented; nothing spans lines:
//! - blank line                      -> line break
//! - `#`, `##` or `###` + whitespace -> heading of that level
//! - `- **Title** — URL`             -> recommendation item
//! - anything else                   -> paragraph, verbatim

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::Lines;
use url::Url;

use super::nodes::{DisplayNode, RecommendationLink};

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,3})\s+(.*)$").expect("heading pattern is valid"));

static RECOMMENDATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^- \*\*(.+?)\*\* — (\S+)\s*$").expect("recommendation pattern is valid")
});

/// Lazily parse `text` into display nodes.
/// The iterator is `Clone`, so a copy taken before consumption replays from the start.
pub fn render(text: &str) -> Nodes<'_> {
    Nodes {
        lines: text.lines(),
    }
}

/// Iterator over the nodes of one answer
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    lines: Lines<'a>,
}

impl Iterator for Nodes<'_> {
    type Item = DisplayNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(parse_line)
    }
}

/// Classify a single line
pub fn parse_line(line: &str) -> DisplayNode {
    if line.trim().is_empty() {
        return DisplayNode::LineBreak;
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        return DisplayNode::Heading {
            level: caps[1].len() as u8,
            text: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = RECOMMENDATION_RE.captures(line) {
        return DisplayNode::Recommendation {
            title: caps[1].trim().to_string(),
            link: validate_link(&caps[2]),
        };
    }

    DisplayNode::Paragraph {
        text: line.to_string(),
    }
}

/// Accept only URLs that parse and use the `http` or `https` scheme
pub fn validate_link(raw: &str) -> RecommendationLink {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            RecommendationLink::Valid(url.to_string())
        }
        _ => RecommendationLink::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recommendation_links_validated() {
        let text = "- **Aula X** — https://example.com/a\n- **Aula Y** — javascript:alert(1)";
        let nodes: Vec<DisplayNode> = render(text).collect();
        assert_eq!(
            nodes,
            vec![
                DisplayNode::Recommendation {
                    title: "Aula X".to_string(),
                    link: RecommendationLink::Valid("https://example.com/a".to_string()),
                },
                DisplayNode::Recommendation {
                    title: "Aula Y".to_string(),
                    link: RecommendationLink::Invalid,
                },
            ]
        );
    }

    #[test]
    fn test_other_schemes_and_garbage_rejected() {
        for raw in [
            "data:text/html,<script>alert(1)</script>",
            "ftp://example.com/file",
            "file:///etc/passwd",
            "//example.com/relative",
            "nota-url",
            "HTTPS://",
        ] {
            assert_eq!(validate_link(raw), RecommendationLink::Invalid, "{raw}");
        }
        assert_eq!(
            validate_link("HTTP://Example.com/aula?t=90"),
            RecommendationLink::Valid("http://example.com/aula?t=90".to_string())
        );
    }

    #[test]
    fn test_headings_levels_one_to_three() {
        assert_eq!(
            parse_line("# Título"),
            DisplayNode::Heading { level: 1, text: "Título".to_string() }
        );
        assert_eq!(
            parse_line("###   Margem  "),
            DisplayNode::Heading { level: 3, text: "Margem".to_string() }
        );
        assert_eq!(
            parse_line("#### Quatro"),
            DisplayNode::Paragraph { text: "#### Quatro".to_string() }
        );
        assert_eq!(
            parse_line("#hashtag"),
            DisplayNode::Paragraph { text: "#hashtag".to_string() }
        );
    }

    #[test]
    fn test_blank_and_plain_lines() {
        let nodes: Vec<DisplayNode> = render("Texto <b>cru</b>\n   \n- item comum").collect();
        assert_eq!(
            nodes,
            vec![
                DisplayNode::Paragraph { text: "Texto <b>cru</b>".to_string() },
                DisplayNode::LineBreak,
                DisplayNode::Paragraph { text: "- item comum".to_string() },
            ]
        );
    }

    #[test]
    fn test_near_miss_bullets_are_paragraphs() {
        for line in [
            "- **Aula** - https://example.com",
            "* **Aula** — https://example.com",
            "- **Aula** — https://example.com extra",
            "- Aula — https://example.com",
        ] {
            assert!(
                matches!(parse_line(line), DisplayNode::Paragraph { .. }),
                "{line}"
            );
        }
    }

    #[test]
    fn test_crlf_lines() {
        let nodes: Vec<DisplayNode> = render("## Resumo\r\ntexto\r\n").collect();
        assert_eq!(
            nodes,
            vec![
                DisplayNode::Heading { level: 2, text: "Resumo".to_string() },
                DisplayNode::Paragraph { text: "texto".to_string() },
            ]
        );
    }

    #[test]
    fn test_iterator_is_restartable() {
        let nodes = render("# A\n\ntexto");
        let first: Vec<DisplayNode> = nodes.clone().collect();
        let second: Vec<DisplayNode> = nodes.collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }
}
