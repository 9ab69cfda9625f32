//! Rendering module for converting extracted elements to output formats.

mod json;
mod markdown;
mod options;
mod text;

pub use json::{to_json, write_json_lines, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
pub use text::{element_text, to_text};
