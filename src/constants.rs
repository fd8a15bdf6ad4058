/// Constants module to avoid magic numbers in the codebase

// Reference context
pub const CONTEXT_MAX_CHARS: usize = 50_000;
pub const CONTEXT_CACHE_TTL_SECS: u64 = 300;
pub const TRANSCRIPT_BLOCK_MAX_CHARS: usize = 2_500;

pub const DEFAULT_PRIMARY_CONTEXT_PATH: &str = "data/contexto-dre.md";
pub const DEFAULT_CHART_OF_ACCOUNTS_PATH: &str = "data/plano-de-contas.md";
pub const DEFAULT_TRANSCRIPTS_PATH: &str = "data/transcricoes.md";

// Section titles used by compaction
pub const QUICK_LINKS_TITLE: &str = "Links rápidos";
pub const CHART_OF_ACCOUNTS_TITLE: &str = "Plano de contas";
pub const TRANSCRIPT_HEADING_MARKER: &str = "transcri";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Model defaults
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_API_KEY_ENV: &str = "DRE_API_KEY";
pub const UPSTREAM_EXCERPT_MAX_CHARS: usize = 200;

// Server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

// Renderer
pub const INVALID_LINK_PLACEHOLDER: &str = "(invalid link)";
