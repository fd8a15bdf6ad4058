pub mod analysis;
pub mod app;
pub mod cache;
pub mod cli;
pub mod constants;
pub mod context;
pub mod models;
pub mod prompt;
pub mod render;
pub mod server;
pub mod utils;

pub use analysis::{AnalysisResult, DreAnalyzer};
pub use app::{load_config, AppState, Config};
pub use context::{ContextLoader, LoaderConfig};
pub use models::{CompletionGateway, HttpGateway};
pub use utils::DreError;
