use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a financial line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "receita", alias = "revenue")]
    Revenue,
    #[serde(rename = "despesa", alias = "expense")]
    Expense,
}

impl EntryKind {
    /// Marker shown in the entry table
    pub fn marker(&self) -> &'static str {
        match self {
            EntryKind::Revenue => "▲ Receita",
            EntryKind::Expense => "▼ Despesa",
        }
    }
}

/// One user-entered line of the income statement
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialEntry {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub classification: String,
    pub group: String,
}

/// Aggregate figures computed from the entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_expense: f64,
    pub result: f64,
    /// Net margin in percent; 0.0 when there is no revenue
    pub margin_pct: f64,
}

impl Summary {
    pub fn from_entries(entries: &[FinancialEntry]) -> Self {
        let (total_revenue, total_expense) =
            entries.iter().fold((0.0, 0.0), |(rev, exp), entry| match entry.kind {
                EntryKind::Revenue => (rev + entry.amount, exp),
                EntryKind::Expense => (rev, exp + entry.amount),
            });

        let result = total_revenue - total_expense;
        let margin_pct = if total_revenue > 0.0 {
            result / total_revenue * 100.0
        } else {
            0.0
        };

        Self {
            total_revenue,
            total_expense,
            result,
            margin_pct,
        }
    }
}

/// Optional metadata the dashboard sends with the structured payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementMeta {
    /// Where the rows came from, e.g. "lancamentos"
    pub origin: Option<String>,
    /// Row count as reported by the client
    pub declared_count: Option<usize>,
}

/// What the caller wants analysed
#[derive(Debug, Clone, PartialEq)]
pub enum DreInput {
    /// Statement pasted as free text
    Text(String),
    /// Individual entries from the dashboard
    Entries {
        entries: Vec<FinancialEntry>,
        meta: StatementMeta,
    },
}

/// System and user messages sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
}

/// Everything needed for one completion call. Built per request and dropped after;
/// borrows the caller's entries.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub entries: &'a [FinancialEntry],
    pub summary: Option<Summary>,
    pub context: String,
    pub model: String,
    pub payload: PromptPayload,
}
