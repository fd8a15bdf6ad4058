use std::sync::Arc;

use crate::analysis::DreAnalyzer;
use crate::app::Config;
use crate::context::{ContextLoader, LoaderConfig};
use crate::models::{CompletionGateway, HttpGateway};
use crate::utils::DreError;

/// Shared application state, cloned into every request handler
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Config>,
    /// Analysis pipeline (owns the context cache and the gateway)
    pub analyzer: Arc<DreAnalyzer>,
}

impl AppState {
    /// Wire the pipeline from configuration. Fails when the base URL or the
    /// default model is missing.
    pub fn from_config(config: Config) -> Result<Self, DreError> {
        let gateway: Arc<dyn CompletionGateway> = Arc::new(HttpGateway::from_config(&config.llm)?);
        let primary_model = config.llm.primary_model()?.to_string();
        let loader = Arc::new(ContextLoader::new(LoaderConfig::from(&config.context)));

        let analyzer = DreAnalyzer::new(loader, gateway, Some(primary_model));
        Ok(Self::new(config, analyzer))
    }

    /// Create app state around an existing analyzer
    pub fn new(config: Config, analyzer: DreAnalyzer) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }
}
