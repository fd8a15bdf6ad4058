use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::compactor::Compactor;
use super::source::{DocumentSource, FsSource};
use super::types::{ContextSource, ReferenceDocument};
use crate::app::ContextConfig;
use crate::cache::{CacheStats, Clock, ExpiringSlot, SystemClock};
use crate::utils::{char_len, DreError};

/// Configuration for the context loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub primary_path: PathBuf,
    pub chart_of_accounts_path: PathBuf,
    pub transcripts_path: PathBuf,
    pub max_chars: usize,
    pub transcript_block_chars: usize,
    pub cache_ttl: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::from(&ContextConfig::default())
    }
}

impl From<&ContextConfig> for LoaderConfig {
    fn from(config: &ContextConfig) -> Self {
        Self {
            primary_path: config.primary_path.clone(),
            chart_of_accounts_path: config.chart_of_accounts_path.clone(),
            transcripts_path: config.transcripts_path.clone(),
            max_chars: config.max_chars,
            transcript_block_chars: config.transcript_block_chars,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
        }
    }
}

/// Produces the bounded reference text sent along with every analysis
pub struct ContextLoader {
    config: LoaderConfig,
    source: Arc<dyn DocumentSource>,
    compactor: Compactor,
    cache: ExpiringSlot<ReferenceDocument>,
}

impl ContextLoader {
    /// Create a loader reading from the filesystem with the wall clock
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_parts(config, Arc::new(FsSource), Arc::new(SystemClock))
    }

    /// Create with an explicit storage and clock
    pub fn with_parts(
        config: LoaderConfig,
        source: Arc<dyn DocumentSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let compactor = Compactor::new(config.max_chars, config.transcript_block_chars);
        let cache = ExpiringSlot::new(config.cache_ttl, clock);
        Self {
            config,
            source,
            compactor,
            cache,
        }
    }

    /// Load the reference document, served from cache within the TTL
    pub async fn load(&self) -> Result<ReferenceDocument, DreError> {
        if let Some(doc) = self.cache.get() {
            debug!(source = %doc.source, "Reference context served from cache");
            return Ok(doc);
        }

        let doc = self.load_uncached().await?;
        info!(
            source = %doc.source,
            truncated = doc.truncated,
            chars = char_len(&doc.content),
            "Reference context loaded"
        );
        self.cache.put(doc.clone());
        Ok(doc)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn load_uncached(&self) -> Result<ReferenceDocument, DreError> {
        match self.source.read_to_string(&self.config.primary_path).await {
            Ok(raw) => Ok(self.bound(raw, ContextSource::Primary)),
            Err(e) => {
                warn!(
                    path = %self.config.primary_path.display(),
                    error = %e,
                    "Primary reference document unavailable, merging fallback documents"
                );
                let merged = self.read_fallback().await?;
                Ok(self.bound(merged, ContextSource::FallbackMerged))
            }
        }
    }

    /// Read the chart-of-accounts outline and the transcript corpus concurrently
    async fn read_fallback(&self) -> Result<String, DreError> {
        let chart_path = &self.config.chart_of_accounts_path;
        let transcripts_path = &self.config.transcripts_path;

        let (chart, transcripts) = futures::future::try_join(
            self.source.read_to_string(chart_path),
            self.source.read_to_string(transcripts_path),
        )
        .await
        .map_err(|e| {
            DreError::ContextUnavailable(format!(
                "fallback documents {} / {}: {}",
                chart_path.display(),
                transcripts_path.display(),
                e
            ))
        })?;

        Ok(merge_fallback(&chart, &transcripts))
    }

    fn bound(&self, raw: String, source: ContextSource) -> ReferenceDocument {
        if self.compactor.exceeds_ceiling(&raw) {
            ReferenceDocument {
                content: self.compactor.compact(&raw),
                source,
                truncated: true,
            }
        } else {
            ReferenceDocument {
                content: raw,
                source,
                truncated: false,
            }
        }
    }
}

/// Concatenate the fallback documents under synthetic headers
fn merge_fallback(chart: &str, transcripts: &str) -> String {
    format!(
        "# Plano de contas\n\n{}\n\n# Transcrições das aulas\n\n{}\n",
        chart.trim(),
        transcripts.trim()
    )
}
