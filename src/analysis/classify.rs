use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, warn};

use super::analyzer::DreAnalyzer;
use crate::prompt::{EntryKind, PromptPayload};
use crate::utils::DreError;

const CLASSIFY_SYSTEM: &str = "Você classifica lançamentos financeiros de pequenas empresas \
brasileiras. Responda somente com o rótulo escolhido, copiado exatamente de uma das opções, \
sem explicações, aspas ou pontuação extra.";

/// Label picked for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationSuggestion {
    #[serde(rename = "classificacao")]
    pub label: String,
    /// False when the model answered something outside the options and the
    /// first option was used instead
    pub matched: bool,
}

impl DreAnalyzer {
    /// Ask the model to choose one label from `options` for an entry
    pub async fn suggest_classification(
        &self,
        description: &str,
        kind: Option<EntryKind>,
        options: &[String],
    ) -> Result<ClassificationSuggestion, DreError> {
        if options.is_empty() {
            return Err(DreError::InvalidInput(
                "nenhuma opção de classificação informada".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(DreError::InvalidInput(
                "a descrição do lançamento está vazia".to_string(),
            ));
        }

        let payload = classification_prompt(description, kind, options);
        let completion = self.gateway.invoke(&payload, self.primary_model()).await?;
        let suggestion = pick_option(&completion.content, options)?;

        if suggestion.matched {
            debug!(label = %suggestion.label, "Classification suggested");
        } else {
            warn!(
                answer = %completion.content.trim(),
                fallback = %suggestion.label,
                "Model answer is not one of the options, using the first option"
            );
        }
        Ok(suggestion)
    }
}

pub(crate) fn classification_prompt(
    description: &str,
    kind: Option<EntryKind>,
    options: &[String],
) -> PromptPayload {
    let mut user = String::new();
    let _ = writeln!(user, "Lançamento: {}", description.trim());
    if let Some(kind) = kind {
        let _ = writeln!(user, "Tipo: {}", kind.marker());
    }
    user.push_str("\nOpções:\n");
    for option in options {
        let _ = writeln!(user, "- {option}");
    }
    user.push_str("\nQual opção classifica melhor este lançamento?");

    PromptPayload {
        system: CLASSIFY_SYSTEM.to_string(),
        user,
    }
}

/// Match the trimmed answer exactly against the options
pub fn pick_option(answer: &str, options: &[String]) -> Result<ClassificationSuggestion, DreError> {
    let answer = answer.trim();
    if let Some(found) = options.iter().find(|o| o.as_str() == answer) {
        return Ok(ClassificationSuggestion {
            label: found.clone(),
            matched: true,
        });
    }
    let first = options.first().ok_or_else(|| {
        DreError::InvalidInput("nenhuma opção de classificação informada".to_string())
    })?;
    Ok(ClassificationSuggestion {
        label: first.clone(),
        matched: false,
    })
}
