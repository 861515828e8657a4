//! MDAST → element tree conversion.

use super::{NodeId, Properties, PropertyValue, Tree, class_list};
use markdown::mdast::{self, AlignKind, AttributeContent, AttributeValue, Node as Md};
use std::collections::HashMap;

/// Converts a markdown-rs tree into an element tree.
///
/// Fenced code becomes `pre > code.language-<lang> > text`, with the text
/// terminated by a newline the way hast converters do. An empty fence yields
/// a `code` element with no children.
pub fn from_mdast(root: &Md) -> Tree {
    let mut converter = Converter {
        tree: Tree::new(),
        definitions: HashMap::new(),
    };
    converter.collect_definitions(root);
    let parent = converter.tree.root();
    converter.convert(root, parent, false);
    converter.tree
}

#[derive(Clone)]
struct Definition {
    url: String,
    title: Option<String>,
}

struct Converter {
    tree: Tree,
    definitions: HashMap<String, Definition>,
}

impl Converter {
    fn collect_definitions(&mut self, node: &Md) {
        if let Md::Definition(def) = node {
            // First definition wins, as in CommonMark.
            self.definitions
                .entry(def.identifier.to_lowercase())
                .or_insert_with(|| Definition {
                    url: def.url.clone(),
                    title: def.title.clone(),
                });
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    fn resolve(&self, identifier: &str) -> Option<Definition> {
        self.definitions.get(&identifier.to_lowercase()).cloned()
    }

    fn children(&mut self, children: &[Md], parent: NodeId, tight: bool) {
        for child in children {
            self.convert(child, parent, tight);
        }
    }

    fn element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        properties: Properties,
        children: &[Md],
    ) -> NodeId {
        let id = self.tree.append_element(parent, tag, properties);
        self.children(children, id, false);
        id
    }

    /// `tight` unwraps paragraphs directly inside items of a tight list.
    fn convert(&mut self, node: &Md, parent: NodeId, tight: bool) {
        match node {
            Md::Root(root) => self.children(&root.children, parent, false),
            Md::Paragraph(p) if tight => self.children(&p.children, parent, false),
            Md::Paragraph(p) => {
                self.element(parent, "p", Properties::new(), &p.children);
            }
            Md::Heading(h) => {
                self.element(parent, format!("h{}", h.depth), Properties::new(), &h.children);
            }
            Md::Text(text) => {
                self.tree.append_text(parent, text.value.clone());
            }
            Md::Emphasis(em) => {
                self.element(parent, "em", Properties::new(), &em.children);
            }
            Md::Strong(strong) => {
                self.element(parent, "strong", Properties::new(), &strong.children);
            }
            Md::Delete(del) => {
                self.element(parent, "del", Properties::new(), &del.children);
            }
            Md::InlineCode(code) => {
                let el = self.tree.append_element(parent, "code", Properties::new());
                self.tree.append_text(el, code.value.clone());
            }
            Md::Break(_) => {
                self.tree.append_element(parent, "br", Properties::new());
                self.tree.append_text(parent, "\n");
            }
            Md::ThematicBreak(_) => {
                self.tree.append_element(parent, "hr", Properties::new());
            }
            Md::Blockquote(quote) => {
                self.element(parent, "blockquote", Properties::new(), &quote.children);
            }
            Md::List(list) => self.list(list, parent),
            Md::ListItem(item) => self.list_item(item, parent, tight),
            Md::Code(code) => self.code(code, parent),
            Md::Link(link) => {
                let props = link_properties(&link.url, link.title.as_deref());
                self.element(parent, "a", props, &link.children);
            }
            Md::Image(image) => {
                let props = image_properties(&image.url, &image.alt, image.title.as_deref());
                self.tree.append_element(parent, "img", props);
            }
            Md::LinkReference(reference) => match self.resolve(&reference.identifier) {
                Some(def) => {
                    let props = link_properties(&def.url, def.title.as_deref());
                    self.element(parent, "a", props, &reference.children);
                }
                None => self.children(&reference.children, parent, false),
            },
            Md::ImageReference(reference) => match self.resolve(&reference.identifier) {
                Some(def) => {
                    let props = image_properties(&def.url, &reference.alt, def.title.as_deref());
                    self.tree.append_element(parent, "img", props);
                }
                None => {
                    self.tree.append_text(parent, reference.alt.clone());
                }
            },
            Md::Table(table) => self.table(table, parent),
            Md::Html(html) => {
                log::debug!("Raw HTML is kept as text: {}", html.value);
                self.tree.append_text(parent, html.value.clone());
            }
            Md::MdxJsxFlowElement(el) => {
                self.jsx(el.name.as_deref(), &el.attributes, &el.children, parent);
            }
            Md::MdxJsxTextElement(el) => {
                self.jsx(el.name.as_deref(), &el.attributes, &el.children, parent);
            }
            Md::FootnoteReference(reference) => {
                let id = reference.identifier.to_lowercase();
                let sup = self.tree.append_element(parent, "sup", Properties::new());
                let props: Properties = [
                    ("href", format!("#user-content-fn-{id}")),
                    ("id", format!("user-content-fnref-{id}")),
                ]
                .into_iter()
                .collect();
                let a = self.tree.append_element(sup, "a", props);
                let label = reference.label.clone().unwrap_or(id);
                self.tree.append_text(a, label);
            }
            Md::FootnoteDefinition(def) => {
                let mut props = class_list(["footnote-definition"]);
                props.insert("id", format!("user-content-fn-{}", def.identifier.to_lowercase()));
                self.element(parent, "div", props, &def.children);
            }
            Md::Definition(_)
            | Md::Yaml(_)
            | Md::Toml(_)
            | Md::MdxjsEsm(_)
            | Md::MdxFlowExpression(_)
            | Md::MdxTextExpression(_) => {
                log::debug!("Skipping non-rendered markdown node");
            }
            _ => {
                log::warn!("Unhandled markdown node type: {:?}", node);
            }
        }
    }

    fn list(&mut self, list: &mdast::List, parent: NodeId) {
        let is_task_list = list
            .children
            .iter()
            .any(|c| matches!(c, Md::ListItem(item) if item.checked.is_some()));
        let mut props = if is_task_list {
            class_list(["contains-task-list"])
        } else {
            Properties::new()
        };
        if list.ordered
            && let Some(start) = list.start
            && start != 1
        {
            props.insert("start", start.to_string());
        }

        let tag = if list.ordered { "ol" } else { "ul" };
        let el = self.tree.append_element(parent, tag, props);
        let tight = !list.spread
            && list
                .children
                .iter()
                .all(|c| !matches!(c, Md::ListItem(item) if item.spread));
        self.children(&list.children, el, tight);
    }

    fn list_item(&mut self, item: &mdast::ListItem, parent: NodeId, tight: bool) {
        let props = if item.checked.is_some() {
            class_list(["task-list-item"])
        } else {
            Properties::new()
        };
        let li = self.tree.append_element(parent, "li", props);

        if let Some(checked) = item.checked {
            let input: Properties = [
                ("type", PropertyValue::from("checkbox")),
                ("checked", PropertyValue::Bool(checked)),
                ("disabled", PropertyValue::Bool(true)),
            ]
            .into_iter()
            .collect();
            self.tree.append_element(li, "input", input);
            self.tree.append_text(li, " ");
        }

        self.children(&item.children, li, tight);
    }

    fn code(&mut self, code: &mdast::Code, parent: NodeId) {
        let pre = self.tree.append_element(parent, "pre", Properties::new());
        let mut props = match &code.lang {
            Some(lang) => class_list([format!("language-{lang}")]),
            None => Properties::new(),
        };
        if let Some(meta) = &code.meta {
            props.insert("metastring", meta.clone());
        }
        let el = self.tree.append_element(pre, "code", props);
        if !code.value.is_empty() {
            self.tree.append_text(el, format!("{}\n", code.value));
        }
    }

    fn table(&mut self, table: &mdast::Table, parent: NodeId) {
        let el = self.tree.append_element(parent, "table", Properties::new());
        let mut rows = table.children.iter();

        if let Some(head) = rows.next() {
            let thead = self.tree.append_element(el, "thead", Properties::new());
            self.table_row(head, thead, "th", &table.align);
        }

        let body: Vec<&Md> = rows.collect();
        if !body.is_empty() {
            let tbody = self.tree.append_element(el, "tbody", Properties::new());
            for row in body {
                self.table_row(row, tbody, "td", &table.align);
            }
        }
    }

    fn table_row(&mut self, row: &Md, parent: NodeId, cell_tag: &str, align: &[AlignKind]) {
        let Md::TableRow(row) = row else {
            return;
        };
        let tr = self.tree.append_element(parent, "tr", Properties::new());
        for (i, cell) in row.children.iter().enumerate() {
            let Md::TableCell(cell) = cell else {
                continue;
            };
            let mut props = Properties::new();
            if let Some(value) = align.get(i).and_then(align_value) {
                props.insert("align", value);
            }
            self.element(tr, cell_tag, props, &cell.children);
        }
    }

    fn jsx(
        &mut self,
        name: Option<&str>,
        attributes: &[AttributeContent],
        children: &[Md],
        parent: NodeId,
    ) {
        // Fragments (`<>...</>`) have no element of their own.
        let Some(name) = name else {
            self.children(children, parent, false);
            return;
        };

        let mut props = Properties::new();
        for attr in attributes {
            match attr {
                AttributeContent::Property(prop)
                    if matches!(prop.name.as_str(), "class" | "className") =>
                {
                    match &prop.value {
                        Some(AttributeValue::Literal(s)) => {
                            let mut classes = props.classes().to_vec();
                            classes.extend(s.split_whitespace().map(str::to_string));
                            props.set_classes(classes);
                        }
                        _ => log::debug!("Dropping non-literal {} on <{name}>", prop.name),
                    }
                }
                AttributeContent::Property(prop) => {
                    let value = match &prop.value {
                        Some(AttributeValue::Literal(s)) => PropertyValue::String(s.clone()),
                        Some(AttributeValue::Expression(expr)) => {
                            PropertyValue::String(expr.value.clone())
                        }
                        None => PropertyValue::Bool(true),
                    };
                    props.insert(prop.name.clone(), value);
                }
                AttributeContent::Expression(expr) => {
                    log::debug!("Dropping spread attribute on <{name}>: {{{}}}", expr.value);
                }
            }
        }

        self.element(parent, name, props, children);
    }
}

fn link_properties(url: &str, title: Option<&str>) -> Properties {
    let mut props = Properties::new();
    props.insert("href", url);
    if let Some(title) = title {
        props.insert("title", title);
    }
    props
}

fn image_properties(url: &str, alt: &str, title: Option<&str>) -> Properties {
    let mut props = Properties::new();
    props.insert("src", url);
    props.insert("alt", alt);
    if let Some(title) = title {
        props.insert("title", title);
    }
    props
}

fn align_value(align: &AlignKind) -> Option<&'static str> {
    match align {
        AlignKind::Left => Some("left"),
        AlignKind::Right => Some("right"),
        AlignKind::Center => Some("center"),
        AlignKind::None => None,
    }
}
