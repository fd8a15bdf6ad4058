// Gateway module for context - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod compactor;
mod loader;
mod sections;
mod source;
mod types;

// Public re-exports - the ONLY way to access context functionality
pub use compactor::{Compactor, CHART_HEADER, LINKS_HEADER, TRANSCRIPTS_HEADER};
pub use loader::{ContextLoader, LoaderConfig};
pub use sections::{find_section, parse_heading, sections_containing, split_sections, Section};
pub use source::{DocumentSource, FsSource};
pub use types::{ContextSource, ReferenceDocument};
