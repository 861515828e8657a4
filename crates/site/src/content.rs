//! Content files on disk: docs, blog posts, child listings, and their frontmatter.
//!
//! Docs live at `<root>/docs/<slug>/index.mdx`, blog posts at
//! `<root>/blogs/<slug>.mdx`. Loaders return a [`ContentError`] that keeps
//! "missing" and "broken" apart; the `find_*` wrappers log and return `None`.

use crate::routes::Routes;
use learngit_core::{
    FrontmatterError, Heading, MarkflowError, Pipeline, TocEntry, Tree, extract_toc,
    parse_frontmatter,
};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const DOCS_DIR: &str = "docs";
const BLOGS_DIR: &str = "blogs";
const DOC_FILE: &str = "index.mdx";
const CONTENT_EXT: &str = "mdx";

/// Errors from loading or compiling a content file.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No file at the resolved path, or the slug tried to leave the content root.
    #[error("content not found: {}", path.display())]
    NotFound {
        /// Resolved path.
        path: PathBuf,
    },
    /// The file exists but could not be read as UTF-8 text.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        /// Resolved path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The frontmatter block is broken or does not fit the schema.
    #[error("malformed frontmatter in {}: {source}", path.display())]
    Malformed {
        /// Resolved path.
        path: PathBuf,
        /// Frontmatter error.
        source: FrontmatterError,
    },
    /// The markdown body failed to parse.
    #[error("cannot compile {}: {source}", path.display())]
    Compile {
        /// Resolved path.
        path: PathBuf,
        /// Parser error.
        source: MarkflowError,
    },
}

impl ContentError {
    /// Path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Unreadable { path, .. }
            | Self::Malformed { path, .. }
            | Self::Compile { path, .. } => path,
        }
    }

    /// Whether the file was simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A loaded content file: typed frontmatter plus the markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<F> {
    /// Decoded frontmatter.
    pub frontmatter: F,
    /// Markdown after the frontmatter block.
    pub body: String,
}

/// Frontmatter of a documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFrontmatter {
    /// Page title.
    pub title: String,
    /// Short summary shown in listings.
    #[serde(default)]
    pub description: String,
}

/// A blog post author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Social handle.
    pub handle: String,
    /// Display name.
    pub username: String,
    /// Link behind the handle.
    pub handle_url: String,
}

/// Frontmatter of a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogFrontmatter {
    /// Post title.
    pub title: String,
    /// Short summary.
    #[serde(default)]
    pub description: String,
    /// Publication date, `YYYY-MM-DD` or `DD-MM-YYYY`.
    pub date: String,
    /// Authors in byline order.
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Cover image URL.
    #[serde(default)]
    pub cover: String,
}

/// A child entry of a route container with its public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildPage<F> {
    /// The child's frontmatter.
    #[serde(flatten)]
    pub frontmatter: F,
    /// Public URL (`/docs/branching/merging`).
    pub href: String,
}

/// A blog post listed by [`ContentStore::all_blogs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    /// The post's frontmatter.
    #[serde(flatten)]
    pub frontmatter: BlogFrontmatter,
    /// File stem used in the URL.
    pub slug: String,
}

/// A content file run through the whole pipeline.
#[derive(Debug, Clone)]
pub struct CompiledPage<F> {
    /// Decoded frontmatter.
    pub frontmatter: F,
    /// Transformed tree, ready to render.
    pub tree: Tree,
    /// Headings with their final ids.
    pub headings: Vec<Heading>,
}

/// Read-only view of a content directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    docs_base: String,
}

impl ContentStore {
    /// A store rooted at `root`, with docs published under `/docs`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            docs_base: "/docs".to_string(),
        }
    }

    /// Changes the URL prefix used for child-page hrefs.
    pub fn with_docs_base(mut self, docs_base: impl Into<String>) -> Self {
        self.docs_base = docs_base.into();
        self
    }

    /// The content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/docs/<slug>/index.mdx`.
    pub fn doc_path(&self, slug: &str) -> Result<PathBuf, ContentError> {
        let dir = self.root.join(DOCS_DIR);
        let slug = checked_slug(&dir, slug)?;
        Ok(dir.join(slug).join(DOC_FILE))
    }

    /// `<root>/blogs/<slug>.mdx`.
    pub fn blog_path(&self, slug: &str) -> Result<PathBuf, ContentError> {
        let dir = self.root.join(BLOGS_DIR);
        let slug = checked_slug(&dir, slug)?;
        Ok(dir.join(format!("{slug}.{CONTENT_EXT}")))
    }

    /// Loads a documentation page.
    pub fn load_doc<F: DeserializeOwned>(&self, slug: &str) -> Result<Document<F>, ContentError> {
        load_document(&self.doc_path(slug)?)
    }

    /// Loads a blog post.
    pub fn load_blog<F: DeserializeOwned>(&self, slug: &str) -> Result<Document<F>, ContentError> {
        load_document(&self.blog_path(slug)?)
    }

    /// [`Self::load_doc`], logging and discarding the error.
    pub fn find_doc<F: DeserializeOwned>(&self, slug: &str) -> Option<Document<F>> {
        self.load_doc(slug)
            .map_err(|err| log::warn!("doc `{slug}` unavailable: {err}"))
            .ok()
    }

    /// [`Self::load_blog`], logging and discarding the error.
    pub fn find_blog<F: DeserializeOwned>(&self, slug: &str) -> Option<Document<F>> {
        self.load_blog(slug)
            .map_err(|err| log::warn!("blog `{slug}` unavailable: {err}"))
            .ok()
    }

    /// Table of contents of a doc, scanned from its raw source.
    pub fn doc_toc(&self, slug: &str) -> Result<Vec<TocEntry>, ContentError> {
        let path = self.doc_path(slug)?;
        Ok(extract_toc(&read_content(&path)?))
    }

    /// Loads and compiles a doc.
    pub fn compile_doc(
        &self,
        pipeline: &Pipeline,
        slug: &str,
    ) -> Result<CompiledPage<DocFrontmatter>, ContentError> {
        compile_document(pipeline, &self.doc_path(slug)?)
    }

    /// Loads and compiles a blog post.
    pub fn compile_blog(
        &self,
        pipeline: &Pipeline,
        slug: &str,
    ) -> Result<CompiledPage<BlogFrontmatter>, ContentError> {
        compile_document(pipeline, &self.blog_path(slug)?)
    }

    /// Frontmatter of the immediate children of the route container at `path`.
    ///
    /// Children are loaded in parallel and returned in route order. A child
    /// whose file is missing or malformed is skipped with a warning. A path
    /// that does not fully match the route tree lists nothing.
    pub fn child_pages<F>(&self, routes: &Routes, path: &str) -> Vec<ChildPage<F>>
    where
        F: DeserializeOwned + Send,
    {
        let Some(container) = routes.container(path) else {
            log::debug!("no route container at `{path}`");
            return Vec::new();
        };

        container
            .items
            .par_iter()
            .filter_map(|child| {
                let href = format!("{}{}", container.href, child.href);
                let file = self.root.join(DOCS_DIR).join(href.trim_start_matches('/')).join(DOC_FILE);
                match load_document::<F>(&file) {
                    Ok(doc) => Some(ChildPage {
                        frontmatter: doc.frontmatter,
                        href: format!("{}{href}", self.docs_base),
                    }),
                    Err(err) => {
                        log::warn!("skipping child `{}`: {err}", child.title);
                        None
                    }
                }
            })
            .collect()
    }

    /// Slugs of the `.mdx` posts in the blog directory, sorted.
    ///
    /// The slug is the file name without its final extension, so `my.post.mdx`
    /// is `my.post`. Other files in the directory are ignored.
    pub fn post_slugs(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .post_files()?
            .iter()
            .filter_map(|path| post_slug(path))
            .collect())
    }

    /// Every `.mdx` post with valid frontmatter, newest first, then by slug.
    ///
    /// Unreadable or malformed posts are skipped with a warning.
    pub fn all_blogs(&self) -> Result<Vec<BlogPost>, ContentError> {
        let files = self.post_files()?;

        let mut posts: Vec<BlogPost> = files
            .par_iter()
            .filter_map(|path| {
                let slug = post_slug(path)?;
                match load_document::<BlogFrontmatter>(path) {
                    Ok(doc) => Some(BlogPost {
                        frontmatter: doc.frontmatter,
                        slug,
                    }),
                    Err(err) => {
                        log::warn!("skipping blog post: {err}");
                        None
                    }
                }
            })
            .collect();

        posts.sort_by(|a, b| {
            let key = |post: &BlogPost| Reverse(date_key(&post.frontmatter.date));
            key(a).cmp(&key(b)).then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(posts)
    }

    fn post_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        Ok(self
            .blog_files()?
            .into_iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == CONTENT_EXT))
            .collect())
    }

    fn blog_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        let dir = self.root.join(BLOGS_DIR);
        let entries = std::fs::read_dir(&dir).map_err(|source| io_error(&dir, source))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| io_error(&dir, source))?;
            if entry.file_type().is_ok_and(|ty| ty.is_file()) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Rejects slugs that would resolve outside `dir`.
fn post_slug(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    (!stem.is_empty()).then(|| stem.to_string())
}

fn checked_slug<'a>(dir: &Path, slug: &'a str) -> Result<&'a str, ContentError> {
    let slug = slug.trim_matches('/');
    let escapes = Path::new(slug)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ContentError::NotFound {
            path: dir.join(slug),
        });
    }
    Ok(slug)
}

fn io_error(path: &Path, source: io::Error) -> ContentError {
    if source.kind() == io::ErrorKind::NotFound {
        ContentError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        ContentError::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn read_content(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn load_document<F: DeserializeOwned>(path: &Path) -> Result<Document<F>, ContentError> {
    let text = read_content(path)?;
    let (frontmatter, body) =
        parse_frontmatter::<F>(&text).map_err(|source| ContentError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Document {
        frontmatter,
        body: body.to_string(),
    })
}

fn compile_document<F: DeserializeOwned>(
    pipeline: &Pipeline,
    path: &Path,
) -> Result<CompiledPage<F>, ContentError> {
    let Document { frontmatter, body } = load_document::<F>(path)?;
    let compiled = pipeline
        .compile(&body)
        .map_err(|source| ContentError::Compile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(CompiledPage {
        frontmatter,
        tree: compiled.tree,
        headings: compiled.headings,
    })
}

/// `(year, month, day)` from `YYYY-MM-DD` or `DD-MM-YYYY`; `None` sorts last.
fn date_key(date: &str) -> Option<(u32, u32, u32)> {
    let parts: Vec<u32> = date
        .trim()
        .split(['-', '/', '.'])
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [y, m, d] if *y > 31 => Some((*y, *m, *d)),
        [d, m, y] if *y > 31 => Some((*y, *m, *d)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteEntry;
    use learngit_core::IconTable;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn doc(title: &str) -> String {
        format!("---\ntitle: {title}\ndescription: About {title}\n---\n\n## Overview\n\nBody.\n")
    }

    fn store() -> (TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path());
        (dir, store)
    }

    fn branching_routes() -> Routes {
        Routes::new(vec![RouteEntry::new("Branching", "/branching").with_items(vec![
            RouteEntry::new("Creating", "/creating"),
            RouteEntry::new("Merging", "/merging"),
            RouteEntry::new("Rebasing", "/rebasing"),
        ])])
    }

    #[test]
    fn load_doc_splits_frontmatter_and_body() {
        let (dir, store) = store();
        write(dir.path(), "docs/basics/staging/index.mdx", &doc("Staging"));

        let loaded: Document<DocFrontmatter> = store.load_doc("basics/staging").unwrap();
        assert_eq!(loaded.frontmatter.title, "Staging");
        assert_eq!(loaded.frontmatter.description, "About Staging");
        assert!(loaded.body.starts_with("\n## Overview"));
    }

    #[test]
    fn missing_doc_is_not_found() {
        let (_dir, store) = store();
        let err = store.load_doc::<DocFrontmatter>("nope").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.path().ends_with("docs/nope/index.mdx"));
        assert!(store.find_doc::<DocFrontmatter>("nope").is_none());
    }

    #[test]
    fn schema_mismatch_is_malformed() {
        let (dir, store) = store();
        write(dir.path(), "docs/broken/index.mdx", "---\ndescription: no title\n---\n");
        let err = store.load_doc::<DocFrontmatter>("broken").unwrap_err();
        assert!(matches!(
            err,
            ContentError::Malformed {
                source: FrontmatterError::Schema(_),
                ..
            }
        ));
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let (dir, store) = store();
        let path = dir.path().join("blogs/binary.mdx");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = store.load_blog::<BlogFrontmatter>("binary").unwrap_err();
        assert!(matches!(err, ContentError::Unreadable { .. }));
    }

    #[test]
    fn parent_components_never_leave_the_root() {
        let (dir, store) = store();
        write(dir.path(), "secret/index.mdx", &doc("Secret"));
        let err = store.load_doc::<DocFrontmatter>("../secret").unwrap_err();
        assert!(err.is_not_found());
        assert!(store.blog_path("a/../../b").is_err());
    }

    #[test]
    fn child_pages_skip_missing_and_malformed() {
        let (dir, store) = store();
        write(dir.path(), "docs/branching/creating/index.mdx", &doc("Creating"));
        write(dir.path(), "docs/branching/merging/index.mdx", "---\ntitle: [unclosed\n---\n");
        write(dir.path(), "docs/branching/rebasing/index.mdx", &doc("Rebasing"));

        let children: Vec<ChildPage<DocFrontmatter>> =
            store.child_pages(&branching_routes(), "/branching/");
        let listed: Vec<_> = children
            .iter()
            .map(|c| (c.frontmatter.title.as_str(), c.href.as_str()))
            .collect();
        assert_eq!(
            listed,
            [
                ("Creating", "/docs/branching/creating"),
                ("Rebasing", "/docs/branching/rebasing"),
            ]
        );
    }

    #[test]
    fn child_pages_of_unknown_path_are_empty() {
        let (dir, store) = store();
        write(dir.path(), "docs/branching/creating/index.mdx", &doc("Creating"));
        let routes = branching_routes();
        assert!(store.child_pages::<DocFrontmatter>(&routes, "").is_empty());
        assert!(store.child_pages::<DocFrontmatter>(&routes, "remotes").is_empty());
        assert!(
            store
                .child_pages::<DocFrontmatter>(&routes, "branching/unknown")
                .is_empty()
        );
    }

    #[test]
    fn child_hrefs_follow_docs_base() {
        let (dir, store) = store();
        let store = store.with_docs_base("/learn");
        write(dir.path(), "docs/branching/merging/index.mdx", &doc("Merging"));
        let children = store.child_pages::<serde_json::Value>(&branching_routes(), "branching");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].href, "/learn/branching/merging");
        assert_eq!(children[0].frontmatter["title"], "Merging");
    }

    #[test]
    fn blogs_are_listed_newest_first() {
        let (dir, store) = store();
        let post = |title: &str, date: &str| {
            format!("---\ntitle: {title}\ndate: {date}\nauthors:\n  - handle: dev\n    username: Dev\n    handleUrl: https://example.com\n---\nText\n")
        };
        write(dir.path(), "blogs/old.mdx", &post("Old", "2023-01-05"));
        write(dir.path(), "blogs/new.mdx", &post("New", "10-03-2024"));
        write(dir.path(), "blogs/broken.mdx", "---\ntitle: Broken\n---\n");
        write(dir.path(), "blogs/notes.txt", "not a post");

        let posts = store.all_blogs().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "old"]);
        assert_eq!(posts[0].frontmatter.authors[0].handle_url, "https://example.com");

        assert_eq!(store.post_slugs().unwrap(), ["broken", "new", "old"]);
    }

    #[test]
    fn dotted_post_names_keep_their_full_stem() {
        let (dir, store) = store();
        write(dir.path(), "blogs/git.2.45.mdx", "---
title: Git 2.45
date: 2024-05-01
---
");
        write(dir.path(), "blogs/cover.png", "png");

        assert_eq!(store.post_slugs().unwrap(), ["git.2.45"]);
        let posts = store.all_blogs().unwrap();
        assert_eq!(posts[0].slug, "git.2.45");
        assert_eq!(
            store.load_blog::<BlogFrontmatter>("git.2.45").unwrap().frontmatter.title,
            "Git 2.45"
        );
    }

    #[test]
    fn missing_blog_dir_is_not_found() {
        let (_dir, store) = store();
        assert!(store.post_slugs().unwrap_err().is_not_found());
    }

    #[test]
    fn toc_reads_raw_source() {
        let (dir, store) = store();
        write(dir.path(), "docs/intro/index.mdx", &doc("Intro"));
        let toc = store.doc_toc("intro").unwrap();
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].href, "#overview");
    }

    #[test]
    fn compile_doc_runs_the_pipeline() {
        let (dir, store) = store();
        write(
            dir.path(),
            "docs/intro/index.mdx",
            "---\ntitle: Intro\n---\n\n## Setup\n\n```sh:install.sh\nbrew install git\n```\n",
        );
        let page = store
            .compile_doc(&Pipeline::new(IconTable::default()), "intro")
            .unwrap();
        assert_eq!(page.frontmatter.title, "Intro");
        assert_eq!(page.headings[0].slug, "setup");
        let pre = page.tree.elements_by_tag("pre")[0];
        assert!(page.tree.element(pre).unwrap().properties.contains("raw"));
    }

    #[test]
    fn date_formats() {
        assert_eq!(date_key("2024-03-10"), Some((2024, 3, 10)));
        assert_eq!(date_key("10-03-2024"), Some((2024, 3, 10)));
        assert_eq!(date_key("soon"), None);
    }
}
