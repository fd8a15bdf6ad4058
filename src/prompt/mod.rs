// Gateway module for prompt construction - follows the Train Station Pattern

mod builder;
mod format;
mod types;

pub use builder::{PromptBuilder, REQUIRED_SECTIONS};
pub use format::{format_brl, format_date, format_pct, parse_entry_date};
pub use types::{
    AnalysisRequest, DreInput, EntryKind, FinancialEntry, PromptPayload, StatementMeta, Summary,
};
