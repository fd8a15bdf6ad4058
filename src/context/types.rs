use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the reference text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextSource {
    /// The primary reference document
    Primary,
    /// Chart-of-accounts outline and transcript corpus merged together
    FallbackMerged,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextSource::Primary => "primary",
            ContextSource::FallbackMerged => "fallback-merged",
        }
    }
}

impl fmt::Display for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded reference text ready to be embedded in a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDocument {
    pub content: String,
    pub source: ContextSource,
    /// True when the raw text exceeded the ceiling and was compacted
    pub truncated: bool,
}
