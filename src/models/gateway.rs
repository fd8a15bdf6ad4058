use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

use super::fallback::{should_fallback, upstream_excerpt};
use super::traits::CompletionGateway;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Completion, ModelsResponse,
};
use crate::app::LlmConfig;
use crate::prompt::PromptPayload;
use crate::utils::DreError;

/// Gateway to an OpenAI-compatible chat-completions API
pub struct HttpGateway {
    client: Client,
    base_url: String,
    default_model: String,
    api_key: Option<String>,
    temperature: f32,
    timeout: Duration,
}

/// Outcome of a single HTTP attempt
enum Attempt {
    /// The endpoint answered with a non-success status
    Rejected { status: u16, body: String },
    Failed(DreError),
}

impl From<Attempt> for DreError {
    fn from(attempt: Attempt) -> Self {
        match attempt {
            Attempt::Rejected { status, body } => DreError::UpstreamError {
                status: Some(status),
                excerpt: upstream_excerpt(&body),
            },
            Attempt::Failed(e) => e,
        }
    }
}

impl HttpGateway {
    /// Build from configuration. The base URL and default model are required;
    /// the credential is checked on each call so a misconfigured deployment
    /// still starts and reports the problem per request.
    pub fn from_config(llm: &LlmConfig) -> Result<Self, DreError> {
        let base_url = llm.base_url()?.trim_end_matches('/').to_string();
        let default_model = llm.default_model()?.to_string();
        let timeout = llm.timeout();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DreError::ConfigError(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            default_model,
            api_key: llm.resolve_api_key(),
            temperature: llm.temperature,
            timeout,
        })
    }

    fn credential(&self) -> Result<&str, DreError> {
        self.api_key.as_deref().ok_or(DreError::CredentialMissing)
    }

    fn transport_error(&self, e: reqwest::Error) -> DreError {
        if e.is_timeout() {
            DreError::GatewayTimeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            DreError::UpstreamError {
                status: e.status().map(|s| s.as_u16()),
                excerpt: upstream_excerpt(&e.to_string()),
            }
        }
    }

    async fn send_once(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<Completion, Attempt> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatCompletionRequest {
            model,
            temperature: self.temperature,
            messages,
        };

        debug!(model, "Sending completion request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Attempt::Failed(self.transport_error(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| Attempt::Failed(self.transport_error(e)))?;
            return Err(Attempt::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Failed(self.transport_error(e)))?;

        parsed
            .first_content()
            .map(|content| Completion {
                content,
                model: model.to_string(),
            })
            .ok_or(Attempt::Failed(DreError::EmptyCompletion))
    }
}

#[async_trait]
impl CompletionGateway for HttpGateway {
    async fn invoke(
        &self,
        payload: &PromptPayload,
        primary_model: &str,
    ) -> Result<Completion, DreError> {
        let api_key = self.credential()?;
        let messages: Vec<ChatMessage> = payload.into();

        match self.send_once(api_key, &messages, primary_model).await {
            Ok(completion) => Ok(completion),
            Err(Attempt::Rejected { status, body })
                if should_fallback(primary_model, &self.default_model, &body) =>
            {
                warn!(
                    status,
                    model = primary_model,
                    fallback = %self.default_model,
                    "Model rejected by provider, retrying with default model"
                );
                self.send_once(api_key, &messages, &self.default_model)
                    .await
                    .map_err(DreError::from)
            }
            Err(attempt) => Err(attempt.into()),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, DreError> {
        let api_key = self.credential()?;
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| self.transport_error(e))?;
            return Err(Attempt::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let models: ModelsResponse = response.json().await.map_err(|e| self.transport_error(e))?;
        let ids: BTreeSet<String> = models
            .data
            .into_iter()
            .filter(|m| m.active)
            .map(|m| m.id)
            .collect();

        Ok(ids.into_iter().collect())
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
