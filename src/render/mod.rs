//! Rendering of processed documents to output formats.

mod json;
mod markdown;
mod options;

pub use json::{to_json, JsonFormat};
pub use markdown::{segment_markdown, to_markdown, to_markdown_with_options, MarkdownRenderer};
pub use options::RenderOptions;
