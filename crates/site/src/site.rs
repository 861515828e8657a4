//! The assembled site: render single pages or build every page to disk.

use crate::components::ComponentTable;
use crate::config::SiteConfig;
use crate::content::{BlogPost, ContentError, ContentStore, DocFrontmatter};
use crate::render::HtmlRenderer;
use crate::routes::{Page, Routes};
use html_escape::{encode_double_quoted_attribute, encode_text};
use learngit_core::{Heading, Pipeline, TocEntry};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use thiserror::Error;

const SITE_NAME: &str = "Learn Git";

/// A page rendered to an HTML fragment, with its navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    /// Page title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Body HTML.
    pub html: String,
    /// Table of contents.
    pub toc: Vec<TocEntry>,
    /// Headings with their ids.
    pub headings: Vec<Heading>,
    /// Previous page, href already under the docs prefix.
    pub prev: Option<Page>,
    /// Next page, href already under the docs prefix.
    pub next: Option<Page>,
}

impl RenderedPage {
    /// Wraps the fragment in a standalone HTML document.
    pub fn to_document(&self) -> String {
        let mut out = String::new();
        let title = encode_text(&self.title);
        let _ = write!(
            out,
            "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title} | {SITE_NAME}</title>\n\
             <meta name=\"description\" content=\"{}\">\n</head>\n<body>\n<main>\n<article>\n\
             <h1>{title}</h1>\n",
            encode_double_quoted_attribute(&self.description),
        );
        if !self.description.is_empty() {
            let _ = writeln!(out, "<p class=\"description\">{}</p>", encode_text(&self.description));
        }
        out.push_str(&self.html);
        out.push_str("\n</article>\n");

        if !self.toc.is_empty() {
            out.push_str("<nav class=\"toc\"><h2>On this page</h2><ul>");
            for entry in &self.toc {
                let _ = write!(
                    out,
                    "<li class=\"toc-level-{}\"><a href=\"{}\">{}</a></li>",
                    entry.level,
                    encode_double_quoted_attribute(&entry.href),
                    encode_text(&entry.text),
                );
            }
            out.push_str("</ul></nav>\n");
        }

        if self.prev.is_some() || self.next.is_some() {
            out.push_str("<nav class=\"pagination\">");
            for (class, page) in [("prev", &self.prev), ("next", &self.next)] {
                if let Some(page) = page {
                    let _ = write!(
                        out,
                        "<a class=\"{class}\" href=\"{}\">{}</a>",
                        encode_double_quoted_attribute(&page.href),
                        encode_text(&page.title),
                    );
                }
            }
            out.push_str("</nav>\n");
        }

        out.push_str("</main>\n</body>\n</html>\n");
        out
    }
}

/// Options for [`Site::build`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<usize>,
    /// Skip blog posts and the blog index.
    pub skip_blogs: bool,
}

/// Outcome for a single page of a build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    /// Page identifier (`docs/branching/merging`, `blog/hello`).
    pub id: String,
    /// File written (present on success).
    pub output: Option<PathBuf>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for a build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildStats {
    /// Total number of pages attempted.
    pub total: u32,
    /// Pages written.
    pub succeeded: u32,
    /// Pages that failed.
    pub failed: u32,
    /// Wall time in milliseconds.
    pub processing_time_ms: f64,
}

/// Per-page results and totals of a build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// One result per page, docs in route order then blog posts.
    pub results: Vec<BuildResult>,
    /// Totals.
    pub stats: BuildStats,
}

/// Errors that stop a build before any page is rendered.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The output directory could not be created.
    #[error("cannot create output directory {}: {source}", path.display())]
    Output {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The worker pool could not be started.
    #[error("cannot start build threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

enum BuildJob {
    Doc(String),
    Blog(String),
    BlogIndex,
}

/// Configuration, routes, content, pipeline, and components bound together.
pub struct Site {
    config: SiteConfig,
    routes: Routes,
    store: ContentStore,
    pipeline: Pipeline,
    components: ComponentTable,
}

impl Site {
    /// Assembles a site from its configuration.
    pub fn new(config: SiteConfig) -> Self {
        let store =
            ContentStore::new(config.content_root.clone()).with_docs_base(config.docs_base.clone());
        Self {
            routes: config.routes(),
            pipeline: config.pipeline(),
            components: config.component_table(),
            store,
            config,
        }
    }

    /// The configuration the site was built from.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Route tree and page order.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Content files.
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Compilation pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Previous and next pages of `slug`, with hrefs under the docs prefix.
    pub fn neighbours(&self, slug: &str) -> (Option<Page>, Option<Page>) {
        let nav = self.routes.previous_next(slug);
        let public = |page: &Page| Page {
            title: page.title.clone(),
            href: format!("{}{}", self.config.docs_base, page.href),
        };
        (nav.prev.map(public), nav.next.map(public))
    }

    /// Compiles and renders a documentation page.
    ///
    /// `<Outlet />` in the page lists the page's route children.
    pub fn render_doc(&self, slug: &str) -> Result<RenderedPage, ContentError> {
        let page = self.store.compile_doc(&self.pipeline, slug)?;
        let children = self.store.child_pages::<DocFrontmatter>(&self.routes, slug);
        let html = HtmlRenderer::new(&self.components)
            .with_children(&children)
            .render(&page.tree);
        let toc = self.store.doc_toc(slug)?;
        let (prev, next) = self.neighbours(slug);

        Ok(RenderedPage {
            title: page.frontmatter.title,
            description: page.frontmatter.description,
            html,
            toc,
            headings: page.headings,
            prev,
            next,
        })
    }

    /// Compiles and renders a blog post. Its TOC comes from the compiled headings.
    pub fn render_blog(&self, slug: &str) -> Result<RenderedPage, ContentError> {
        let page = self.store.compile_blog(&self.pipeline, slug)?;
        let html = HtmlRenderer::new(&self.components).render(&page.tree);
        let toc = page
            .headings
            .iter()
            .filter(|h| (2..=4).contains(&h.depth))
            .map(|h| TocEntry {
                level: h.depth,
                text: h.text.clone(),
                href: format!("#{}", h.slug),
            })
            .collect();

        Ok(RenderedPage {
            title: page.frontmatter.title,
            description: page.frontmatter.description,
            html,
            toc,
            headings: page.headings,
            prev: None,
            next: None,
        })
    }

    /// Renders the blog listing, newest post first.
    pub fn render_blog_index(&self) -> Result<RenderedPage, ContentError> {
        let posts = self.store.all_blogs()?;
        let mut html = String::from("<ul class=\"blog-list\">");
        for BlogPost { frontmatter, slug } in &posts {
            let _ = write!(
                html,
                "<li><a href=\"{}/{}\">{}</a><time>{}</time><p>{}</p></li>",
                encode_double_quoted_attribute(&self.config.blog_base),
                encode_double_quoted_attribute(slug),
                encode_text(&frontmatter.title),
                encode_text(&frontmatter.date),
                encode_text(&frontmatter.description),
            );
        }
        html.push_str("</ul>");

        Ok(RenderedPage {
            title: "Blog".to_string(),
            description: String::new(),
            html,
            toc: Vec::new(),
            headings: Vec::new(),
            prev: None,
            next: None,
        })
    }

    /// Renders every route page (and blog post) into `out` as `<url>/index.html`.
    ///
    /// Pages render in parallel and fail independently: a broken page is
    /// reported in the result list and the rest are still written.
    pub fn build(&self, out: &Path, options: &BuildOptions) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        std::fs::create_dir_all(out).map_err(|source| BuildError::Output {
            path: out.to_path_buf(),
            source,
        })?;

        let jobs = self.build_jobs(options);
        let total = jobs.len() as u32;
        let succeeded = AtomicU32::new(0);
        let failed = AtomicU32::new(0);

        let process_job = |job: BuildJob| -> BuildResult {
            let (id, rendered) = match job {
                BuildJob::Doc(slug) => (
                    public_path(&self.config.docs_base, &slug),
                    self.render_doc(&slug).map_err(|e| e.to_string()),
                ),
                BuildJob::Blog(slug) => (
                    public_path(&self.config.blog_base, &slug),
                    self.render_blog(&slug).map_err(|e| e.to_string()),
                ),
                BuildJob::BlogIndex => (
                    public_path(&self.config.blog_base, ""),
                    self.render_blog_index().map_err(|e| e.to_string()),
                ),
            };
            let written = rendered.and_then(|page| {
                let path = out.join(&id).join("index.html");
                write_page(&path, &page.to_document()).map(|()| path)
            });
            match written {
                Ok(path) => {
                    succeeded.fetch_add(1, Ordering::Relaxed);
                    log::debug!("wrote {}", path.display());
                    BuildResult {
                        id,
                        output: Some(path),
                        error: None,
                    }
                }
                Err(error) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    log::warn!("failed to build {id}: {error}");
                    BuildResult {
                        id,
                        output: None,
                        error: Some(error),
                    }
                }
            }
        };

        let results: Vec<BuildResult> = match options.max_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| jobs.into_par_iter().map(process_job).collect()),
            None => jobs.into_par_iter().map(process_job).collect(),
        };

        Ok(BuildReport {
            results,
            stats: BuildStats {
                total,
                succeeded: succeeded.load(Ordering::Relaxed),
                failed: failed.load(Ordering::Relaxed),
                processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            },
        })
    }

    fn build_jobs(&self, options: &BuildOptions) -> Vec<BuildJob> {
        let mut jobs: Vec<BuildJob> = self
            .routes
            .pages()
            .iter()
            .map(|page| BuildJob::Doc(page.href.trim_start_matches('/').to_string()))
            .collect();
        if options.skip_blogs {
            return jobs;
        }
        match self.store.post_slugs() {
            Ok(slugs) => {
                jobs.push(BuildJob::BlogIndex);
                jobs.extend(slugs.into_iter().map(BuildJob::Blog));
            }
            Err(err) if err.is_not_found() => log::debug!("no blog directory, skipping blogs"),
            Err(err) => log::warn!("cannot list blog posts: {err}"),
        }
        jobs
    }
}

/// `docs/branching/merging` from `/docs` and `branching/merging`.
fn public_path(base: &str, slug: &str) -> String {
    [base.trim_matches('/'), slug.trim_matches('/')]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_page(path: &Path, html: &str) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("{}: {e}", dir.display()))?;
    }
    std::fs::write(path, html).map_err(|e| format!("{}: {e}", path.display()))
}
