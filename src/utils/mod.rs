// Gateway module for utils - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod logger;
mod text;

// Public re-exports - the ONLY way to access utils functionality
pub use errors::DreError;
pub use logger::init_logger;
pub use text::{char_len, truncate_chars};
