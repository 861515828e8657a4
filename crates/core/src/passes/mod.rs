//! Tree passes, in the order [`crate::Pipeline`] runs them:
//!
//! 1. [`raw::capture_raw`] records the verbatim code text of each `pre`.
//! 2. [`code_title::extract_code_titles`] turns `lang:title` into a title element.
//! 3. [`title_icons::decorate_code_titles`] prepends devicon markers to titles.
//! 4. [`highlight::highlight_code_blocks`] rewrites code into token spans.
//! 5. [`headings::slug_headings`] and [`headings::autolink_headings`].
//! 6. [`raw::attach_raw`] copies the captured text to `pre[raw]`.

/// Code-block title extraction.
pub mod code_title;
/// Heading ids and self-links.
pub mod headings;
/// Syntax highlighting.
pub mod highlight;
/// Raw code capture and re-attachment.
pub mod raw;
/// Devicon decoration of code titles.
pub mod title_icons;

/// Class marking the element produced for a code-block title.
pub const CODE_TITLE_CLASS: &str = "rehype-code-title";
