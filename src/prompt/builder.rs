use std::fmt::Write as _;
use tracing::warn;

use super::format::{format_brl, format_date, format_pct};
use super::types::{FinancialEntry, PromptPayload, StatementMeta, Summary};

/// Markdown sections the model must produce, in this order
pub const REQUIRED_SECTIONS: [&str; 6] = [
    "## Resumo executivo",
    "## Análise das receitas",
    "## Análise das despesas",
    "## Indicadores e margem",
    "## Pontos de atenção",
    "## Aulas recomendadas",
];

const ROLE: &str = "Você é um analista financeiro que orienta donos de pequenas empresas \
brasileiras a interpretar a DRE (Demonstração do Resultado do Exercício) do negócio.";

/// Turns financial entries and reference context into the model instruction.
/// Pure: the same inputs always produce the same payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the payload for a structured statement.
    /// Callers reject an empty `entries` slice before getting here.
    pub fn build(
        &self,
        entries: &[FinancialEntry],
        meta: &StatementMeta,
        context: &str,
    ) -> (PromptPayload, Summary) {
        let summary = Summary::from_entries(entries);

        if let Some(declared) = meta.declared_count {
            if declared != entries.len() {
                warn!(
                    declared,
                    received = entries.len(),
                    "Declared entry count differs from entries received"
                );
            }
        }

        let mut user = String::new();
        push_context(&mut user, context);

        user.push_str("# DRE do usuário\n\n");
        if let Some(origin) = meta.origin.as_deref().filter(|o| !o.trim().is_empty()) {
            let _ = writeln!(user, "Origem dos dados: {}", origin.trim());
        }
        let _ = writeln!(user, "Total de lançamentos: {}\n", entries.len());

        user.push_str(&render_summary(&summary));
        user.push('\n');
        user.push_str(&render_table(entries));

        (
            PromptPayload {
                system: system_message(),
                user,
            },
            summary,
        )
    }

    /// Build the payload for a statement supplied as free text
    pub fn build_from_text(&self, statement: &str, context: &str) -> PromptPayload {
        let mut user = String::new();
        push_context(&mut user, context);
        user.push_str("# DRE do usuário (texto livre)\n\n");
        user.push_str(statement.trim());
        user.push('\n');

        PromptPayload {
            system: system_message(),
            user,
        }
    }
}

fn push_context(out: &mut String, context: &str) {
    out.push_str("# Material de referência\n\n");
    out.push_str("<<<CONTEXTO\n");
    out.push_str(context);
    if !context.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("CONTEXTO>>>\n\n");
}

fn render_summary(summary: &Summary) -> String {
    let mut out = String::from("## Resumo calculado\n\n");
    let _ = writeln!(out, "- Receita total: {}", format_brl(summary.total_revenue));
    let _ = writeln!(out, "- Despesa total: {}", format_brl(summary.total_expense));
    let _ = writeln!(out, "- Resultado líquido: {}", format_brl(summary.result));
    let _ = writeln!(out, "- Margem líquida: {}", format_pct(summary.margin_pct));
    out
}

fn render_table(entries: &[FinancialEntry]) -> String {
    let mut out = String::from("## Lançamentos\n\n");
    out.push_str("| Data | Descrição | Tipo | Classificação | Grupo | Valor |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for entry in entries {
        let description = if entry.description.trim().is_empty() {
            entry.classification.trim()
        } else {
            entry.description.trim()
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            format_date(entry.date),
            cell(description),
            entry.kind.marker(),
            cell(entry.classification.trim()),
            cell(entry.group.trim()),
            format_brl(entry.amount),
        );
    }
    out
}

/// Keep user text from breaking the table layout
fn cell(text: &str) -> String {
    if text.is_empty() {
        super::format::MISSING.to_string()
    } else {
        text.replace('|', "/").replace(['\n', '\r'], " ")
    }
}

fn system_message() -> String {
    let mut out = String::from(ROLE);
    out.push_str("\n\nRegras obrigatórias:\n");
    out.push_str("1. Responda somente em português do Brasil.\n");
    out.push_str("2. Use exatamente estes títulos Markdown, nesta ordem, sem acrescentar outros:\n");
    for section in REQUIRED_SECTIONS {
        let _ = writeln!(out, "   {section}");
    }
    out.push_str(
        "3. Cite apenas URLs e timestamps que aparecem no material de referência. \
Nunca invente links, aulas ou horários.\n",
    );
    out.push_str(
        "4. Não invente dados. Se uma informação não estiver nos lançamentos, escreva \
\"dado não informado\".\n",
    );
    out.push_str(
        "5. Em \"## Aulas recomendadas\", cada aula deve seguir exatamente o formato:\n\
   - **Título da aula** — URL\n\
   Opcionalmente, na linha seguinte: Motivo (mm:ss): explicação curta citando o timestamp.\n",
    );
    out.push_str("6. Use os valores do resumo calculado; não recalcule totais de outra forma.\n");
    out
}
