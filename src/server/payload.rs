//! Request bodies accepted by the HTTP surface.
//!
//! The analysis endpoint takes either the raw statement text under `dre`
//! or the dashboard's structured payload, optionally wrapped in `dre`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::prompt::{parse_entry_date, DreInput, EntryKind, FinancialEntry, StatementMeta};
use crate::utils::DreError;

/// Parsed body of `POST /api/analise-dre`
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub input: DreInput,
    /// Optional model chosen by the caller
    pub model: Option<String>,
}

/// Dashboard payload: `{ origem, total_lancamentos, resumo, itens }`.
/// `resumo` is recomputed from the entries and ignored here.
#[derive(Debug, Deserialize)]
struct StructuredPayload {
    #[serde(default)]
    origem: Option<String>,
    #[serde(default)]
    total_lancamentos: Option<usize>,
    #[serde(default)]
    itens: Option<Vec<EntryPayload>>,
}

#[derive(Debug, Deserialize)]
struct EntryPayload {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    descricao: String,
    valor: Amount,
    tipo: EntryKind,
    #[serde(default)]
    classificacao: Option<String>,
    #[serde(default)]
    grupo: Option<String>,
}

/// `valor` arrives as a number or as a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(raw) => parse_amount(raw),
        }
    }
}

/// Dots used only as pt-BR thousands separators: "1.234", "-12.345.678"
static DOT_GROUPED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,3}(\.\d{3})+$").expect("grouping pattern is valid")
});

/// Parse an amount written the pt-BR way ("1.234,56", "R$ 1.234,56", "1.234")
/// or with a dot decimal ("1234.56").
///
/// A comma is always the decimal separator. Without a comma, a dot followed by
/// exactly three-digit groups is a thousands separator; any other dot is a
/// decimal point.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches("R$").trim();
    let normalized = if cleaned.contains(',') || DOT_GROUPED_RE.is_match(cleaned) {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Body of `POST /api/sugerir-classificacao`
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub descricao: String,
    #[serde(default)]
    pub tipo: Option<EntryKind>,
    #[serde(default)]
    pub opcoes: Vec<String>,
}

/// Deserialize a JSON body, mapping any failure to `InvalidInput`
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DreError> {
    serde_json::from_slice(body).map_err(|e| DreError::InvalidInput(format!("JSON inválido: {e}")))
}

/// Interpret the analysis body
pub fn parse_analyze_request(body: &[u8]) -> Result<AnalyzeRequest, DreError> {
    let value: Value = parse_json(body)?;
    let Value::Object(mut root) = value else {
        return Err(DreError::InvalidInput(
            "o corpo deve ser um objeto JSON".to_string(),
        ));
    };

    let model = match root.remove("modelo") {
        Some(Value::String(m)) if !m.trim().is_empty() => Some(m.trim().to_string()),
        _ => None,
    };

    let input = match root.remove("dre") {
        Some(Value::String(text)) => DreInput::Text(text),
        Some(nested @ Value::Object(_)) => structured_input(nested)?,
        Some(_) => {
            return Err(DreError::InvalidInput(
                "o campo 'dre' deve ser texto ou objeto".to_string(),
            ))
        }
        None if root.contains_key("itens") => structured_input(Value::Object(root))?,
        None => {
            return Err(DreError::InvalidInput(
                "informe 'dre' ou 'itens'".to_string(),
            ))
        }
    };

    Ok(AnalyzeRequest { input, model })
}

fn structured_input(value: Value) -> Result<DreInput, DreError> {
    let payload: StructuredPayload = serde_json::from_value(value)
        .map_err(|e| DreError::InvalidInput(format!("payload da DRE inválido: {e}")))?;

    let items = payload
        .itens
        .ok_or_else(|| DreError::InvalidInput("informe 'dre' ou 'itens'".to_string()))?;

    let entries = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| into_entry(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DreInput::Entries {
        entries,
        meta: StatementMeta {
            origin: payload.origem.filter(|o| !o.trim().is_empty()),
            declared_count: payload.total_lancamentos,
        },
    })
}

fn into_entry(index: usize, item: EntryPayload) -> Result<FinancialEntry, DreError> {
    let amount = item.valor.to_f64().ok_or_else(|| {
        DreError::InvalidInput(format!("valor inválido no lançamento {}", index + 1))
    })?;

    Ok(FinancialEntry {
        date: item.data.as_deref().and_then(parse_entry_date),
        description: item.descricao.trim().to_string(),
        amount,
        kind: item.tipo,
        classification: item.classificacao.unwrap_or_default().trim().to_string(),
        group: item.grupo.unwrap_or_default().trim().to_string(),
    })
}
