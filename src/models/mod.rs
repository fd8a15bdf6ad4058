// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod fallback;
mod gateway;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use fallback::{looks_like_model_selection_error, should_fallback, upstream_excerpt};
pub use gateway::HttpGateway;
pub use traits::CompletionGateway;
pub use types::{ChatMessage, Completion, MessageRole};
