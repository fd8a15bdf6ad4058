use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::context::{ContextLoader, ContextSource};
use crate::models::CompletionGateway;
use crate::prompt::{AnalysisRequest, DreInput, PromptBuilder};
use crate::render::{render, to_html, DisplayNode};
use crate::utils::DreError;

/// Outcome of one successful analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Markdown returned by the model
    pub analysis: String,
    pub context_source: ContextSource,
    pub context_truncated: bool,
    /// Model that produced the answer (the default model after a fallback)
    pub model: String,
    pub nodes: Vec<DisplayNode>,
    /// Escaped HTML fragment of `nodes`, ready to embed in the dashboard
    pub html: String,
}

/// Runs the whole pipeline: context, prompt, completion, rendering
pub struct DreAnalyzer {
    pub(super) loader: Arc<ContextLoader>,
    pub(super) gateway: Arc<dyn CompletionGateway>,
    pub(super) builder: PromptBuilder,
    primary_model: Option<String>,
}

impl DreAnalyzer {
    pub fn new(
        loader: Arc<ContextLoader>,
        gateway: Arc<dyn CompletionGateway>,
        primary_model: Option<String>,
    ) -> Self {
        Self {
            loader,
            gateway,
            builder: PromptBuilder::new(),
            primary_model,
        }
    }

    pub fn loader(&self) -> &ContextLoader {
        &self.loader
    }

    pub fn gateway(&self) -> &dyn CompletionGateway {
        self.gateway.as_ref()
    }

    /// Model tried first when the caller does not pick one
    pub fn primary_model(&self) -> &str {
        self.primary_model
            .as_deref()
            .unwrap_or_else(|| self.gateway.default_model())
    }

    /// Reject input that cannot be analysed, before any I/O
    pub fn validate(input: &DreInput) -> Result<(), DreError> {
        match input {
            DreInput::Text(text) if text.trim().is_empty() => Err(DreError::InvalidInput(
                "o texto da DRE está vazio".to_string(),
            )),
            DreInput::Entries { entries, .. } if entries.is_empty() => Err(
                DreError::InvalidInput("nenhum lançamento informado".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Assemble the per-request data handed to the gateway
    pub fn prepare<'a>(
        &self,
        input: &'a DreInput,
        context: String,
        model: String,
    ) -> AnalysisRequest<'a> {
        match input {
            DreInput::Text(text) => AnalysisRequest {
                entries: &[],
                summary: None,
                payload: self.builder.build_from_text(text, &context),
                context,
                model,
            },
            DreInput::Entries { entries, meta } => {
                let (payload, summary) = self.builder.build(entries, meta, &context);
                AnalysisRequest {
                    entries: entries.as_slice(),
                    summary: Some(summary),
                    payload,
                    context,
                    model,
                }
            }
        }
    }

    pub async fn analyze(
        &self,
        input: &DreInput,
        model_override: Option<&str>,
    ) -> Result<AnalysisResult, DreError> {
        Self::validate(input)?;
        let started = Instant::now();

        let context = self.loader.load().await?;
        let model = model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.primary_model())
            .to_string();

        let request = self.prepare(input, context.content, model);
        let completion = self.gateway.invoke(&request.payload, &request.model).await?;
        let nodes: Vec<DisplayNode> = render(&completion.content).collect();
        let html = to_html(nodes.iter().cloned());

        info!(
            model = %completion.model,
            entries = request.entries.len(),
            context_source = %context.source,
            context_truncated = context.truncated,
            duration_ms = started.elapsed().as_millis() as u64,
            "DRE analysis completed"
        );

        Ok(AnalysisResult {
            analysis: completion.content,
            context_source: context.source,
            context_truncated: context.truncated,
            model: completion.model,
            nodes,
            html,
        })
    }
}
