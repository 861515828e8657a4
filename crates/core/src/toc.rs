use crate::slug::sluggify;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TOC_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{2,4})\s(.+)$").expect("valid regex"));

/// One `##`–`####` heading found in raw markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Number of `#` characters, 2 to 4.
    pub level: u8,
    /// Trimmed heading text.
    pub text: String,
    /// `#` followed by [`sluggify`] of the text.
    pub href: String,
}

/// Scans markdown source for level 2–4 ATX headings, in order.
///
/// This is a line scan, not a parse: a `## ...` line inside a fenced code
/// block is reported too, and repeated headings share the same `href`.
pub fn extract_toc(markdown: &str) -> Vec<TocEntry> {
    TOC_HEADING
        .captures_iter(markdown)
        .map(|caps| {
            let text = caps[2].trim().to_string();
            TocEntry {
                level: caps[1].len() as u8,
                href: format!("#{}", sluggify(&text)),
                text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_two_to_four_only() {
        let toc = extract_toc("# Title\n## Getting Started\n### Install git \n#### Deep\n##### Too deep\n");
        assert_eq!(
            toc,
            vec![
                TocEntry {
                    level: 2,
                    text: "Getting Started".into(),
                    href: "#getting-started".into(),
                },
                TocEntry {
                    level: 3,
                    text: "Install git".into(),
                    href: "#install-git".into(),
                },
                TocEntry {
                    level: 4,
                    text: "Deep".into(),
                    href: "#deep".into(),
                },
            ]
        );
    }

    #[test]
    fn duplicates_are_not_deduplicated() {
        let toc = extract_toc("## Setup\n\ntext\n\n## Setup\n");
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].href, toc[1].href);
    }

    #[test]
    fn requires_space_after_hashes() {
        assert!(extract_toc("##NoSpace\nplain ## text\n").is_empty());
    }

    #[test]
    fn headings_inside_fences_are_matched() {
        let toc = extract_toc("```md\n## Inside fence\n```\n");
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].href, "#inside-fence");
    }

    #[test]
    fn punctuation_is_stripped_from_href() {
        let toc = extract_toc("## What's `HEAD`?\n");
        assert_eq!(toc[0].href, "#whats-head");
        assert_eq!(toc[0].text, "What's `HEAD`?");
    }
}
