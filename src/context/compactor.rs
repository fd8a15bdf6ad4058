use super::sections::{find_section, sections_containing};
use crate::constants::{CHART_OF_ACCOUNTS_TITLE, QUICK_LINKS_TITLE, TRANSCRIPT_HEADING_MARKER};
use crate::utils::{char_len, truncate_chars};

pub const COMPACTED_HEADER: &str = "# Contexto de referência (compactado)";
pub const LINKS_HEADER: &str = "## Links rápidos";
pub const CHART_HEADER: &str = "## Plano de contas";
pub const TRANSCRIPTS_HEADER: &str = "## Resumo das transcrições";

const LINKS_MISSING: &str = "Nenhum link rápido encontrado no material de referência.";
const CHART_MISSING: &str = "Plano de contas não encontrado no material de referência.";
const TRANSCRIPTS_MISSING: &str = "Nenhuma transcrição de aula encontrada no material de referência.";

/// Reduces an oversized reference document to a bounded composite
#[derive(Debug, Clone)]
pub struct Compactor {
    max_chars: usize,
    transcript_block_chars: usize,
}

impl Compactor {
    pub fn new(max_chars: usize, transcript_block_chars: usize) -> Self {
        Self {
            max_chars,
            transcript_block_chars,
        }
    }

    /// True when `text` must be compacted before use
    pub fn exceeds_ceiling(&self, text: &str) -> bool {
        char_len(text) > self.max_chars
    }

    /// Rebuild `raw` as links, chart of accounts, then transcript summary,
    /// and cut the result at the ceiling.
    pub fn compact(&self, raw: &str) -> String {
        let links = find_section(raw, QUICK_LINKS_TITLE)
            .map(|s| s.body)
            .unwrap_or(LINKS_MISSING);

        let chart = find_section(raw, CHART_OF_ACCOUNTS_TITLE)
            .map(|s| s.body)
            .unwrap_or(CHART_MISSING);

        let transcript_blocks: Vec<String> = sections_containing(raw, TRANSCRIPT_HEADING_MARKER)
            .into_iter()
            .filter(|s| !s.body.is_empty())
            .map(|s| {
                format!(
                    "### {}\n{}",
                    s.title,
                    truncate_chars(s.body, self.transcript_block_chars)
                )
            })
            .collect();
        let transcripts = if transcript_blocks.is_empty() {
            TRANSCRIPTS_MISSING.to_string()
        } else {
            transcript_blocks.join("\n\n")
        };

        let composite = format!(
            "{COMPACTED_HEADER}\n\n{LINKS_HEADER}\n{links}\n\n{CHART_HEADER}\n{chart}\n\n{TRANSCRIPTS_HEADER}\n{transcripts}\n"
        );

        truncate_chars(&composite, self.max_chars).to_string()
    }
}
