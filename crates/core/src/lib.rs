#![deny(missing_docs)]
//! Learn Git core: markdown parsing, the syntax-tree pipeline, frontmatter, and TOC extraction.

/// Core error types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Element/text syntax tree and its conversion from markdown.
pub mod hast;
/// File-extension to devicon lookup.
pub mod icons;
/// Markdown parsing options.
pub mod parse;
/// Tree passes run between parsing and rendering.
pub mod passes;
/// The ordered compilation pipeline.
pub mod pipeline;
/// Slug generation utilities.
pub mod slug;
/// Regex-based table of contents extraction.
pub mod toc;

pub use error::{MarkflowError, SourceLocation};
pub use frontmatter::{
    FrontmatterError, FrontmatterExtraction, extract_frontmatter, parse_frontmatter,
};
pub use hast::{Element, Node, NodeId, Properties, PropertyValue, Tree, from_mdast};
pub use icons::IconTable;
pub use parse::{ParseOptions, parse_mdast};
pub use passes::highlight::{HighlightedLine, Highlighter, SyntectHighlighter, Token};
pub use passes::raw::{RawCaptures, attach_raw, capture_raw};
pub use pipeline::{CompiledTree, Heading, Pipeline, PipelineOptions};
pub use slug::{Slugger, sluggify};
pub use toc::{TocEntry, extract_toc};
