//! The ordered compilation pipeline: parse, convert, run the passes.

use crate::hast::{Tree, from_mdast};
use crate::passes::code_title::extract_code_titles;
use crate::passes::headings::{autolink_headings, slug_headings};
use crate::passes::highlight::{Highlighter, highlight_code_blocks};
use crate::passes::raw::{attach_raw, capture_raw};
use crate::passes::title_icons::decorate_code_titles;
use crate::{IconTable, MarkflowError, ParseOptions, parse_mdast};
use std::sync::Arc;

pub use crate::passes::headings::Heading;

/// Switches for the optional passes.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Markdown parser options.
    pub parse: ParseOptions,
    /// Extract `lang:title` code titles and decorate them with icons.
    pub code_titles: bool,
    /// Prepend self-links to headings.
    pub heading_anchors: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::mdx(),
            code_titles: true,
            heading_anchors: true,
        }
    }
}

/// Output of [`Pipeline::compile`].
#[derive(Debug, Clone)]
pub struct CompiledTree {
    /// The fully transformed tree.
    pub tree: Tree,
    /// Headings with their final ids, in document order.
    pub headings: Vec<Heading>,
}

/// Markdown to tree compiler with the pass list fixed.
///
/// The icon table and highlighter are shared read-only, so one pipeline can
/// compile many documents from several threads.
#[derive(Clone)]
pub struct Pipeline {
    options: PipelineOptions,
    icons: IconTable,
    highlighter: Option<Arc<dyn Highlighter>>,
}

impl Pipeline {
    /// A pipeline with default options and no highlighter.
    pub fn new(icons: IconTable) -> Self {
        Self {
            options: PipelineOptions::default(),
            icons,
            highlighter: None,
        }
    }

    /// Enables syntax highlighting.
    pub fn with_highlighter(mut self, highlighter: Arc<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Compiles a markdown body (frontmatter already removed) into a tree.
    ///
    /// Raw code text is captured before any pass touches the code and is
    /// attached as `pre[raw]` after the last one, so highlighting never
    /// changes what `raw` holds.
    pub fn compile(&self, body: &str) -> Result<CompiledTree, MarkflowError> {
        let mdast = parse_mdast(body, &self.options.parse)?;
        let mut tree = from_mdast(&mdast);

        let captures = capture_raw(&tree);
        if self.options.code_titles {
            extract_code_titles(&mut tree);
            decorate_code_titles(&mut tree, &self.icons);
        }
        if let Some(highlighter) = &self.highlighter {
            highlight_code_blocks(&mut tree, highlighter.as_ref());
        }
        let headings = slug_headings(&mut tree);
        if self.options.heading_anchors {
            autolink_headings(&mut tree);
        }
        attach_raw(&mut tree, captures);

        Ok(CompiledTree { tree, headings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::PropertyValue;
    use crate::passes::CODE_TITLE_CLASS;
    use crate::passes::highlight::{HighlightedLine, Token};

    // Marks every line as a single `string` token.
    struct WholeLine;

    impl Highlighter for WholeLine {
        fn highlight(&self, code: &str, _language: &str) -> Option<Vec<HighlightedLine>> {
            Some(
                code.lines()
                    .map(|line| HighlightedLine {
                        tokens: vec![Token::new(line, Some("string"))],
                    })
                    .collect(),
            )
        }
    }

    const PAGE: &str = "## Intro\n\n```ts:src/app.TS\nconst a = 1 < 2;\n```\n\n## Intro\n";

    #[test]
    fn full_pass_order() {
        let pipeline = Pipeline::new(IconTable::default()).with_highlighter(Arc::new(WholeLine));
        let CompiledTree { tree, headings } = pipeline.compile(PAGE).unwrap();

        let slugs: Vec<_> = headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["intro", "intro-1"]);

        let title = tree
            .elements_by_tag("div")
            .into_iter()
            .find(|id| tree.element(*id).unwrap().properties.has_class(CODE_TITLE_CLASS))
            .unwrap();
        assert_eq!(tree.text_content(title), "src/app.TS");
        let icon = tree.element(tree.children(title)[0]).unwrap();
        assert!(icon.properties.has_class("devicon-typescript-plain text-[17px]"));

        let pre = tree.elements_by_tag("pre")[0];
        let props = &tree.element(pre).unwrap().properties;
        assert_eq!(props.get("raw"), Some(&PropertyValue::from("const a = 1 < 2;\n")));
        assert!(props.has_class("language-ts"));
        assert_eq!(tree.elements_by_tag("span").len(), 2 + 2);
    }

    #[test]
    fn optional_passes_can_be_disabled() {
        let pipeline = Pipeline::new(IconTable::default()).with_options(PipelineOptions {
            code_titles: false,
            heading_anchors: false,
            ..PipelineOptions::default()
        });
        let compiled = pipeline.compile(PAGE).unwrap();
        let tree = &compiled.tree;

        assert!(tree.elements_by_tag("a").is_empty());
        assert!(tree.elements_by_tag("div").is_empty());
        let code = tree.children(tree.elements_by_tag("pre")[0])[0];
        assert!(
            tree.element(code)
                .unwrap()
                .properties
                .has_class("language-ts:src/app.TS")
        );
        assert_eq!(compiled.headings.len(), 2);
    }

    #[test]
    fn heading_ids_stay_unique() {
        let pipeline = Pipeline::new(IconTable::default());
        let compiled = pipeline
            .compile("## Intro\n\n## Intro\n\n## Intro 1\n\n##\n")
            .unwrap();

        let slugs: Vec<_> = compiled.headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["intro", "intro-1", "intro-1-1", "heading"]);
    }

    #[test]
    fn parse_errors_propagate() {
        let pipeline = Pipeline::new(IconTable::default());
        let err = pipeline.compile("<Note>\n\nnever closed\n").unwrap_err();
        assert!(matches!(err, MarkflowError::MarkdownAdapter { .. }));
    }
}
