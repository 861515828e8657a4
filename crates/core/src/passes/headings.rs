use crate::hast::{NodeId, Properties, PropertyValue, Tree, class_list};
use crate::slug::Slugger;
use serde::Serialize;

/// A heading found in the compiled tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level, 1 to 6.
    pub depth: u8,
    /// The element's `id`.
    pub slug: String,
    /// Plain text of the heading.
    pub text: String,
}

fn heading_depth(tree: &Tree, id: NodeId) -> Option<u8> {
    let tag = &tree.element(id)?.tag;
    let depth = tag.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&depth).then_some(depth)
}

fn existing_id(tree: &Tree, id: NodeId) -> Option<String> {
    tree.element(id)?
        .properties
        .get("id")
        .and_then(PropertyValue::as_str)
        .map(str::to_string)
}

/// Gives every `h1`–`h6` a unique `id` and returns them in document order.
///
/// Ids already present in the tree are kept and reserved first, so generated
/// slugs never collide with them.
pub fn slug_headings(tree: &mut Tree) -> Vec<Heading> {
    let mut slugger = Slugger::new();
    let ids = tree.descendants();
    for &id in &ids {
        if let Some(existing) = existing_id(tree, id) {
            slugger.reserve(&existing);
        }
    }

    let mut headings = Vec::new();
    for id in ids {
        let Some(depth) = heading_depth(tree, id) else {
            continue;
        };
        let text = tree.text_content(id);
        let slug = match existing_id(tree, id) {
            Some(slug) => slug,
            None => {
                let slug = slugger.next_slug(&text);
                if let Some(el) = tree.element_mut(id) {
                    el.properties.insert("id", slug.clone());
                }
                slug
            }
        };
        headings.push(Heading { depth, slug, text });
    }
    headings
}

/// Prepends a self-link to every heading that has an `id`.
///
/// The link is `a[aria-hidden="true"][tabindex="-1"][href="#id"]` wrapping an
/// empty `span.icon.icon-link`.
pub fn autolink_headings(tree: &mut Tree) {
    for id in tree.descendants() {
        if heading_depth(tree, id).is_none() {
            continue;
        }
        let Some(slug) = existing_id(tree, id) else {
            continue;
        };

        let props: Properties = [
            ("aria-hidden", PropertyValue::from("true")),
            ("tabindex", PropertyValue::from("-1")),
            ("href", PropertyValue::from(format!("#{slug}"))),
        ]
        .into_iter()
        .collect();
        let anchor = tree.create_element("a", props);
        tree.append_element(anchor, "span", class_list(["icon", "icon-link"]));
        tree.insert_child(id, 0, anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(tree: &mut Tree, tag: &str, text: &str) -> NodeId {
        let root = tree.root();
        let h = tree.append_element(root, tag, Properties::new());
        tree.append_text(h, text);
        h
    }

    #[test]
    fn repeated_headings_get_suffixes() {
        let mut tree = Tree::new();
        heading(&mut tree, "h2", "Intro");
        heading(&mut tree, "h3", "Intro");
        heading(&mut tree, "p", "Intro");

        let headings = slug_headings(&mut tree);
        let slugs: Vec<_> = headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["intro", "intro-1"]);
        assert_eq!(headings[1].depth, 3);
        assert_eq!(headings[1].text, "Intro");
    }

    #[test]
    fn authored_ids_are_kept_and_reserved() {
        let mut tree = Tree::new();
        let generated = heading(&mut tree, "h2", "Setup");
        let root = tree.root();
        let authored = tree.append_element(root, "h2", [("id", "setup")].into_iter().collect());
        tree.append_text(authored, "Install");

        let headings = slug_headings(&mut tree);

        assert_eq!(headings[0].slug, "setup-1");
        assert_eq!(headings[1].slug, "setup");
        let props = &tree.element(generated).unwrap().properties;
        assert_eq!(props.get("id").and_then(PropertyValue::as_str), Some("setup-1"));
    }

    #[test]
    fn anchors_are_prepended() {
        let mut tree = Tree::new();
        let h = heading(&mut tree, "h2", "Branching");
        slug_headings(&mut tree);
        autolink_headings(&mut tree);

        let children = tree.children(h).to_vec();
        assert_eq!(children.len(), 2);
        let anchor = tree.element(children[0]).unwrap();
        assert_eq!(anchor.tag, "a");
        assert_eq!(
            anchor.properties.get("href").and_then(PropertyValue::as_str),
            Some("#branching")
        );
        assert_eq!(
            anchor.properties.get("aria-hidden").and_then(PropertyValue::as_str),
            Some("true")
        );
        let icon = tree.element(anchor.children[0]).unwrap();
        assert_eq!(icon.properties.classes(), ["icon", "icon-link"]);
        assert_eq!(tree.text_content(h), "Branching");
    }

    #[test]
    fn headings_without_ids_get_no_anchor() {
        let mut tree = Tree::new();
        let h = heading(&mut tree, "h2", "Merging");
        autolink_headings(&mut tree);
        assert_eq!(tree.children(h).len(), 1);
    }
}
