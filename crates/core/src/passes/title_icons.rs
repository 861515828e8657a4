use super::CODE_TITLE_CLASS;
use crate::IconTable;
use crate::hast::{Node, Tree, class_list};

/// Prepends an `i.code-icon` devicon marker to code titles with a known extension.
///
/// Titles without a text child, or whose extension is not in `icons`, keep
/// their children exactly as they were.
pub fn decorate_code_titles(tree: &mut Tree, icons: &IconTable) {
    for id in tree.descendants() {
        let is_title = tree
            .element(id)
            .is_some_and(|el| el.tag == "div" && el.properties.has_class(CODE_TITLE_CLASS));
        if !is_title {
            continue;
        }

        let title = tree
            .children(id)
            .iter()
            .find_map(|child| match tree.node(*child) {
                Node::Text(value) => Some(value.as_str()),
                _ => None,
            });
        let Some(icon_class) = title.and_then(|title| icons.icon_class(title)) else {
            continue;
        };

        let icon = tree.create_element("i", class_list([icon_class, "code-icon".to_string()]));
        tree.insert_child(id, 0, icon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::{NodeId, Properties};

    fn title(tree: &mut Tree, text: Option<&str>) -> NodeId {
        let root = tree.root();
        let div = tree.append_element(root, "div", class_list([CODE_TITLE_CLASS]));
        if let Some(text) = text {
            tree.append_text(div, text);
        }
        div
    }

    #[test]
    fn supported_extension_gets_icon_first() {
        let mut tree = Tree::new();
        let div = title(&mut tree, Some("src/app.TS"));
        let text = tree.children(div)[0];

        decorate_code_titles(&mut tree, &IconTable::default());

        let children = tree.children(div);
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], text);
        let icon = tree.element(children[0]).unwrap();
        assert_eq!(icon.tag, "i");
        assert_eq!(
            icon.properties.classes(),
            ["devicon-typescript-plain text-[17px]", "code-icon"]
        );
        assert!(icon.children.is_empty());
    }

    #[test]
    fn unsupported_extension_leaves_children_unchanged() {
        let mut tree = Tree::new();
        let div = title(&mut tree, Some("notes.txt"));
        let before = tree.children(div).to_vec();
        decorate_code_titles(&mut tree, &IconTable::default());
        assert_eq!(tree.children(div), before.as_slice());
    }

    #[test]
    fn title_without_text_is_skipped() {
        let mut tree = Tree::new();
        let div = title(&mut tree, None);
        tree.append_element(div, "span", Properties::new());
        decorate_code_titles(&mut tree, &IconTable::default());
        assert_eq!(tree.children(div).len(), 1);
    }

    #[test]
    fn only_marked_divs_are_decorated() {
        let mut tree = Tree::new();
        let root = tree.root();
        let plain = tree.append_element(root, "div", Properties::new());
        tree.append_text(plain, "main.rs");
        decorate_code_titles(&mut tree, &IconTable::default());
        assert_eq!(tree.children(plain).len(), 1);
    }
}
