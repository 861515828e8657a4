//! Markdown parsing options and the markdown-rs adapter.

use crate::{MarkflowError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Enable MDX JSX constructs (`<Note>`, `<Tabs>`, ...).
    pub mdx: bool,
    /// Enable GitHub Flavored Markdown constructs (tables, task lists, ...).
    pub gfm: bool,
    /// Recognise a leading YAML frontmatter block.
    pub frontmatter: bool,
}

impl ParseOptions {
    /// MDX content files: GFM plus JSX, ESM and expressions.
    pub const fn mdx() -> Self {
        Self {
            mdx: true,
            gfm: true,
            frontmatter: true,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.mdx {
            // JSX replaces raw HTML and `<`-autolinks; indented code clashes with nested JSX.
            constructs.code_indented = false;
            constructs.html_flow = false;
            constructs.html_text = false;
            constructs.autolink = false;
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::mdx()
    }
}

/// Parse markdown into an MDAST tree.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, MarkflowError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        MarkflowError::MarkdownAdapter {
            message: err.to_string(),
            location: message_location(&err),
        }
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gfm_tables_are_parsed() {
        let root = parse_mdast("| a | b |\n|---|---|\n| 1 | 2 |\n", &ParseOptions::mdx()).unwrap();
        let children = root.children().expect("root has children");
        assert!(matches!(children[0], Node::Table(_)));
    }

    #[test]
    fn jsx_components_are_parsed_in_mdx_mode() {
        let root = parse_mdast("<Note title=\"Heads up\">\nBody\n</Note>\n", &ParseOptions::mdx())
            .unwrap();
        let children = root.children().unwrap();
        assert!(matches!(children[0], Node::MdxJsxFlowElement(_)));
    }

    #[test]
    fn unclosed_jsx_reports_location() {
        let err = parse_mdast("<Note>\n\ntext\n", &ParseOptions::mdx()).unwrap_err();
        match err {
            MarkflowError::MarkdownAdapter { location, .. } => assert!(location.line >= 1),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
