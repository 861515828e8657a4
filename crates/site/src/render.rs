//! Tree to HTML rendering through the component table.

use crate::components::{ComponentTable, Substitution, is_component_name};
use crate::content::{ChildPage, DocFrontmatter};
use html_escape::{encode_double_quoted_attribute, encode_text};
use learngit_core::{Element, Node, NodeId, PropertyValue, Tree};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "source", "wbr"];

/// Renders a compiled tree as an HTML fragment.
///
/// Tags with a [`Substitution`] are emitted as its element, with its class in
/// front of the source classes and a `data-component` marker. Other lowercase
/// tags pass through; unknown PascalCase components become
/// `div[data-component]`. `pre[raw]` is written as `data-raw`, and absolute
/// `http(s)` links open in a new tab.
#[derive(Debug, Clone, Copy)]
pub struct HtmlRenderer<'a> {
    components: &'a ComponentTable,
    children: &'a [ChildPage<DocFrontmatter>],
}

impl<'a> HtmlRenderer<'a> {
    /// A renderer with no child pages for `Outlet`.
    pub fn new(components: &'a ComponentTable) -> Self {
        Self {
            components,
            children: &[],
        }
    }

    /// Child pages listed by `<Outlet />`.
    pub fn with_children(mut self, children: &'a [ChildPage<DocFrontmatter>]) -> Self {
        self.children = children;
        self
    }

    /// Renders the whole tree; top-level nodes are separated by newlines.
    pub fn render(&self, tree: &Tree) -> String {
        let mut out = String::new();
        for (i, &child) in tree.children(tree.root()).iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.node(tree, child, &mut out);
        }
        out
    }

    fn node(&self, tree: &Tree, id: NodeId, out: &mut String) {
        match tree.node(id) {
            Node::Root { children } => {
                for &child in children {
                    self.node(tree, child, out);
                }
            }
            Node::Text(value) => out.push_str(&encode_text(value)),
            Node::Element(el) => self.element(tree, el, out),
        }
    }

    fn element(&self, tree: &Tree, el: &Element, out: &mut String) {
        let substitution = self.components.get(&el.tag);
        let (tag, marker) = match substitution {
            Some(sub) => (sub.element.as_str(), sub.component.as_deref()),
            None if is_component_name(&el.tag) => {
                log::warn!("no substitution for component <{}>, rendering a div", el.tag);
                ("div", Some(el.tag.as_str()))
            }
            None => (el.tag.as_str(), None),
        };

        out.push('<');
        out.push_str(tag);
        for (name, value) in attributes(el, substitution, marker) {
            out.push(' ');
            out.push_str(&name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&encode_double_quoted_attribute(&value));
                out.push('"');
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag) {
            return;
        }
        if el.tag == "Outlet" {
            self.outlet(out);
        } else {
            for &child in &el.children {
                self.node(tree, child, out);
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn outlet(&self, out: &mut String) {
        for child in self.children {
            out.push_str("<a class=\"outlet-card\" href=\"");
            out.push_str(&encode_double_quoted_attribute(&child.href));
            out.push_str("\"><h4>");
            out.push_str(&encode_text(&child.frontmatter.title));
            out.push_str("</h4>");
            if !child.frontmatter.description.is_empty() {
                out.push_str("<p>");
                out.push_str(&encode_text(&child.frontmatter.description));
                out.push_str("</p>");
            }
            out.push_str("</a>");
        }
    }
}

/// Attributes in output order; `None` values are bare boolean attributes.
fn attributes(
    el: &Element,
    substitution: Option<&Substitution>,
    marker: Option<&str>,
) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();

    let classes: Vec<&str> = substitution
        .and_then(|sub| sub.class.as_deref())
        .into_iter()
        .chain(el.properties.classes().iter().map(String::as_str))
        .collect();
    if !classes.is_empty() {
        attrs.push(("class".to_string(), Some(classes.join(" "))));
    }

    for (key, value) in el.properties.iter() {
        let name = match key {
            "className" => continue,
            "raw" => "data-raw",
            "metastring" => "data-meta",
            other => other,
        };
        let value = match value {
            PropertyValue::String(s) => Some(s.clone()),
            PropertyValue::Bool(true) => None,
            PropertyValue::Bool(false) => continue,
            PropertyValue::ClassList(list) => Some(list.join(" ")),
        };
        attrs.push((name.to_string(), value));
    }

    if let Some(marker) = marker {
        attrs.push(("data-component".to_string(), Some(marker.to_string())));
    }

    let external = el.tag == "a"
        && el
            .properties
            .get("href")
            .and_then(PropertyValue::as_str)
            .is_some_and(is_external);
    if external && !el.properties.contains("target") {
        attrs.push(("target".to_string(), Some("_blank".to_string())));
        attrs.push(("rel".to_string(), Some("noopener noreferrer".to_string())));
    }

    attrs
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}
