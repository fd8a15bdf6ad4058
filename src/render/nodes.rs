use serde::Serialize;

/// Target of a recommendation bullet after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "href", rename_all = "lowercase")]
pub enum RecommendationLink {
    /// Parsed `http`/`https` URL, normalized by the URL parser
    Valid(String),
    /// Anything else; shown as a placeholder, never as a link
    Invalid,
}

/// One display unit of the model's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayNode {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    LineBreak,
    Recommendation { title: String, link: RecommendationLink },
}
