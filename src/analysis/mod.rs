// Gateway module for the analysis service - follows the Train Station Pattern

mod analyzer;
mod classify;

pub use analyzer::{AnalysisResult, DreAnalyzer};
pub use classify::{pick_option, ClassificationSuggestion};
