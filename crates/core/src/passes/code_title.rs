use super::CODE_TITLE_CLASS;
use crate::hast::{NodeId, Tree, class_list};

const LANGUAGE_PREFIX: &str = "language-";
const TITLE_SEPARATOR: char = ':';

/// Splits ```` ```lang:title ```` fences into a language class and a title element.
///
/// The code's `language-lang:title` class becomes `language-lang`, and a
/// `div.rehype-code-title` holding the title text is inserted as the
/// previous sibling of the `pre`. Blocks without a title are left alone.
pub fn extract_code_titles(tree: &mut Tree) {
    for parent in tree.descendants() {
        let children = tree.children(parent).to_vec();
        let titled: Vec<(usize, String)> = children
            .into_iter()
            .enumerate()
            .filter_map(|(index, child)| split_title(tree, child).map(|title| (index, title)))
            .collect();

        // Insert back to front so earlier indices stay valid.
        for (index, title) in titled.into_iter().rev() {
            let div = tree.create_element("div", class_list([CODE_TITLE_CLASS]));
            tree.append_text(div, title);
            tree.insert_child(parent, index, div);
        }
    }
}

/// Rewrites the code class of a titled `pre` and returns the title.
fn split_title(tree: &mut Tree, pre: NodeId) -> Option<String> {
    if !tree.is_element(pre, "pre") {
        return None;
    }
    let code = *tree.children(pre).first()?;
    let el = tree.element_mut(code).filter(|el| el.tag == "code")?;

    let mut classes = el.properties.classes().to_vec();
    let (slot, lang, title) = classes.iter().enumerate().find_map(|(i, class)| {
        let fence = class.strip_prefix(LANGUAGE_PREFIX)?;
        let (lang, title) = fence.split_once(TITLE_SEPARATOR)?;
        Some((i, lang.to_string(), title.to_string()))
    })?;
    if title.is_empty() {
        return None;
    }

    if lang.is_empty() {
        classes.remove(slot);
    } else {
        classes[slot] = format!("{LANGUAGE_PREFIX}{lang}");
    }
    el.properties.set_classes(classes);
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::{Properties, PropertyValue};

    fn fenced(tree: &mut Tree, class: &str, source: &str) -> NodeId {
        let root = tree.root();
        let pre = tree.append_element(root, "pre", Properties::new());
        let code = tree.append_element(pre, "code", class_list([class]));
        tree.append_text(code, source);
        pre
    }

    #[test]
    fn title_becomes_previous_sibling() {
        let mut tree = Tree::new();
        let pre = fenced(&mut tree, "language-js:app.js", "run();\n");

        extract_code_titles(&mut tree);

        let root = tree.children(tree.root()).to_vec();
        assert_eq!(root.len(), 2);
        assert_eq!(root[1], pre);
        let title = tree.element(root[0]).unwrap();
        assert!(title.properties.has_class(CODE_TITLE_CLASS));
        assert_eq!(tree.text_content(root[0]), "app.js");

        let code = tree.element(tree.children(pre)[0]).unwrap();
        assert_eq!(
            code.properties.get("className"),
            Some(&PropertyValue::ClassList(vec!["language-js".into()]))
        );
    }

    #[test]
    fn untitled_blocks_are_untouched() {
        let mut tree = Tree::new();
        fenced(&mut tree, "language-bash", "git status\n");
        extract_code_titles(&mut tree);
        assert_eq!(tree.children(tree.root()).len(), 1);
        assert!(tree.elements_by_tag("div").is_empty());
    }

    #[test]
    fn multiple_titles_keep_their_blocks() {
        let mut tree = Tree::new();
        let a = fenced(&mut tree, "language-yml:ci.yml", "on: push\n");
        let b = fenced(&mut tree, "language-sh:hook.sh", "exit 0\n");

        extract_code_titles(&mut tree);

        let root = tree.children(tree.root()).to_vec();
        assert_eq!(root.len(), 4);
        assert_eq!(tree.text_content(root[0]), "ci.yml");
        assert_eq!(root[1], a);
        assert_eq!(tree.text_content(root[2]), "hook.sh");
        assert_eq!(root[3], b);
    }

    #[test]
    fn title_without_language_drops_the_class() {
        let mut tree = Tree::new();
        let pre = fenced(&mut tree, "language-:.gitignore", "target/\n");
        extract_code_titles(&mut tree);
        let code = tree.element(tree.children(pre)[0]).unwrap();
        assert!(code.properties.classes().is_empty());
        assert_eq!(tree.text_content(tree.children(tree.root())[0]), ".gitignore");
    }
}
