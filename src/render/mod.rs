// Gateway module for response rendering - follows the Train Station Pattern

mod html;
mod nodes;
mod parser;
mod terminal;

pub use html::{escape_html, to_html};
pub use nodes::{DisplayNode, RecommendationLink};
pub use parser::{parse_line, render, validate_link, Nodes};
pub use terminal::to_terminal;
