use crate::hast::{NodeId, Tree};
use std::collections::HashMap;

/// Verbatim code text keyed by the `pre` element it was found under.
///
/// Produced by [`capture_raw`] before highlighting and consumed by
/// [`attach_raw`] afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawCaptures(HashMap<NodeId, String>);

impl RawCaptures {
    /// Captured text for a `pre` element.
    pub fn get(&self, pre: NodeId) -> Option<&str> {
        self.0.get(&pre).map(String::as_str)
    }

    /// Number of captured blocks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Records the source text of every `pre > code > text` block.
///
/// A `pre` whose first child is not `code`, or whose `code` does not start
/// with a text node, is skipped and gets no capture.
pub fn capture_raw(tree: &Tree) -> RawCaptures {
    let mut captures = HashMap::new();
    for pre in tree.elements_by_tag("pre") {
        let Some(&code) = tree.children(pre).first() else {
            continue;
        };
        if !tree.is_element(code, "code") {
            log::debug!("pre without a leading code element, no raw capture");
            continue;
        }
        let Some(text) = tree.children(code).first().and_then(|id| tree.text(*id)) else {
            continue;
        };
        captures.insert(pre, text.to_string());
    }
    RawCaptures(captures)
}

/// Copies each capture into its `pre` element's `raw` property.
///
/// Elements without a capture are left untouched; `raw` stays absent.
pub fn attach_raw(tree: &mut Tree, captures: RawCaptures) {
    for (pre, raw) in captures.0 {
        match tree.element_mut(pre) {
            Some(el) => el.properties.insert("raw", raw),
            None => log::debug!("raw capture for a node that is no longer an element"),
        }
    }
}
