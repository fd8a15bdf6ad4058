use async_trait::async_trait;

use super::types::Completion;
use crate::prompt::PromptPayload;
use crate::utils::DreError;

/// Core trait for hosted completion backends
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the prompt to `primary_model`, retrying once on the default model
    /// when the provider rejects the model itself
    async fn invoke(&self, payload: &PromptPayload, primary_model: &str)
        -> Result<Completion, DreError>;

    /// Sorted, deduplicated identifiers of the provider's active models
    async fn list_models(&self) -> Result<Vec<String>, DreError>;

    /// Known-good model used as the fallback target
    fn default_model(&self) -> &str;
}
