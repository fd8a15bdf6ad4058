use colored::Colorize;

use super::nodes::{DisplayNode, RecommendationLink};
use crate::constants::INVALID_LINK_PLACEHOLDER;

/// Render nodes as styled terminal lines
pub fn to_terminal<I>(nodes: I) -> String
where
    I: IntoIterator<Item = DisplayNode>,
{
    let mut lines = Vec::new();
    for node in nodes {
        let line = match node {
            DisplayNode::Heading { level, text } => {
                let prefix = "#".repeat(level as usize);
                let styled = format!("{prefix} {text}");
                match level {
                    1 => styled.cyan().bold().to_string(),
                    2 => styled.blue().bold().to_string(),
                    _ => styled.green().bold().to_string(),
                }
            }
            DisplayNode::Paragraph { text } => text,
            DisplayNode::LineBreak => String::new(),
            DisplayNode::Recommendation { title, link } => {
                let target = match link {
                    RecommendationLink::Valid(href) => href.underline().blue().to_string(),
                    RecommendationLink::Invalid => INVALID_LINK_PLACEHOLDER.dimmed().to_string(),
                };
                format!("{} {} — {}", "•".yellow(), title.bold(), target)
            }
        };
        lines.push(line);
    }
    lines.join("\n")
}
