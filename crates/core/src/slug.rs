use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

/// Turns heading text into the anchor used by the table of contents.
///
/// Lowercases, collapses whitespace runs into a single `-`, then drops every
/// character outside `[a-z0-9-]`. No uniqueness suffix is added.
///
/// ```
/// use learngit_core::sluggify;
///
/// assert_eq!(sluggify("Getting Started"), "getting-started");
/// assert_eq!(sluggify("What is `git rebase`?"), "what-is-git-rebase");
/// ```
pub fn sluggify(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lower, "-");
    NON_SLUG_CHAR.replace_all(&hyphenated, "").into_owned()
}

/// Github-slugger compatible id generator used for heading `id`s.
///
/// Repeated headings get `-1`, `-2`, ... suffixes.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique slug for the given heading text.
    ///
    /// Text with no sluggable characters falls back to `heading`.
    pub fn next_slug(&mut self, text: &str) -> String {
        let mut base = base_slug(text);
        if base.is_empty() {
            base.push_str("heading");
        }

        let mut slug = base.clone();
        while self.counts.contains_key(&slug) {
            let seen = self.counts.entry(base.clone()).or_insert(0);
            *seen += 1;
            slug = format!("{base}-{seen}");
        }
        self.counts.insert(slug.clone(), 0);
        slug
    }

    /// Reserves an author-supplied id so generated slugs won't collide with it.
    pub fn reserve(&mut self, slug: &str) {
        self.counts.entry(slug.to_string()).or_insert(0);
    }
}

// Lowercase, keep letters/digits/`-`/`_`/combining marks, spaces become `-`.
fn base_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        } else if !ch.is_ascii() && (ch.is_alphanumeric() || is_combining_mark(ch)) {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' {
            slug.push('-');
        }
    }
    slug
}

fn is_combining_mark(ch: char) -> bool {
    matches!(
        ch as u32,
        0x0300..=0x036F
            | 0x0591..=0x05C7
            | 0x0610..=0x061A
            | 0x064B..=0x065F
            | 0x0900..=0x0903
            | 0x093A..=0x094F
            | 0x0951..=0x0957
            | 0x0E31..=0x0E3A
            | 0x0E47..=0x0E4E
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x3099..=0x309A
            | 0xFE20..=0xFE2F
    )
}
