//! Route tree, flattened page order, sibling navigation, and search.

pub mod defaults;

use serde::{Deserialize, Serialize};

/// One node of the hand-authored navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    /// Sidebar title.
    pub title: String,
    /// Path segment with a leading slash (`/branching`).
    pub href: String,
    /// Pure container: listed in the tree but never a page of its own.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_link: bool,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RouteEntry>,
}

impl RouteEntry {
    /// A leaf entry.
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            no_link: false,
            items: Vec::new(),
        }
    }

    /// Sets the nested entries.
    pub fn with_items(mut self, items: Vec<RouteEntry>) -> Self {
        self.items = items;
        self
    }

    /// Marks the entry as a pure container.
    pub fn container(mut self) -> Self {
        self.no_link = true;
        self
    }
}

/// A linkable entry with its full href (`/branching/merging`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Title from the route entry.
    pub title: String,
    /// Concatenated href of the entry and its ancestors.
    pub href: String,
}

/// Neighbours of a page in the flattened order. Either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrevNext<'a> {
    /// Page before the current one.
    pub prev: Option<&'a Page>,
    /// Page after the current one.
    pub next: Option<&'a Page>,
}

/// A container reached by walking a path through the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'a> {
    /// Hrefs of every matched entry, concatenated (`/branching`).
    pub href: String,
    /// Immediate children of the last matched entry.
    pub items: &'a [RouteEntry],
}

/// Immutable route tree plus its depth-first page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    entries: Vec<RouteEntry>,
    pages: Vec<Page>,
}

impl Default for Routes {
    fn default() -> Self {
        Self::new(defaults::default_learngit_routes())
    }
}

impl Routes {
    /// Builds the page order from a tree.
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        let mut pages = Vec::new();
        for entry in &entries {
            flatten(entry, "", &mut pages);
        }
        Self { entries, pages }
    }

    /// Top-level entries.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Linkable pages in depth-first order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Looks up `/<path>` in the page order and returns its neighbours.
    ///
    /// Leading and trailing slashes on `path` are ignored. An unknown path
    /// has neither neighbour.
    pub fn previous_next(&self, path: &str) -> PrevNext<'_> {
        let href = format!("/{}", path.trim_matches('/'));
        match self.pages.iter().position(|page| page.href == href) {
            Some(index) => PrevNext {
                prev: index.checked_sub(1).and_then(|i| self.pages.get(i)),
                next: self.pages.get(index + 1),
            },
            None => PrevNext {
                prev: None,
                next: None,
            },
        }
    }

    /// Walks `path` one segment at a time from the top level.
    ///
    /// Returns `None` when the path has no segments or any segment has no
    /// matching entry.
    pub fn container(&self, path: &str) -> Option<Container<'_>> {
        let mut items = self.entries.as_slice();
        let mut href = String::new();
        let mut matched = false;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let wanted = format!("/{segment}");
            let found = items.iter().find(|entry| entry.href == wanted)?;
            href.push_str(&found.href);
            items = &found.items;
            matched = true;
        }

        matched.then_some(Container { href, items })
    }

    /// Pages whose title or href contains `query`, ignoring case, in page order.
    pub fn search(&self, query: &str) -> Vec<&Page> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.pages
            .iter()
            .filter(|page| {
                page.title.to_lowercase().contains(&needle)
                    || page.href.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

fn flatten(entry: &RouteEntry, parent_href: &str, pages: &mut Vec<Page>) {
    let href = format!("{parent_href}{}", entry.href);
    if !entry.no_link {
        pages.push(Page {
            title: entry.title.clone(),
            href: href.clone(),
        });
    }
    for item in &entry.items {
        flatten(item, &href, pages);
    }
}
