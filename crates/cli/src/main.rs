//! learngit - Learn Git documentation engine
//!
//! Renders the MDX content of the Learn Git site to HTML, inspects its
//! navigation, and builds the whole site into static files.

#![deny(unsafe_code)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use learngit_site::{BuildOptions, DocFrontmatter, SiteConfig, Site};
use serde::Serialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "learngit.yaml";

/// Main entry point for the learngit CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.content)?;
    let site = Site::new(config);
    let json = cli.json;

    match cli.command {
        Commands::Render {
            slug,
            blog,
            fragment,
        } => handle_render_command(&site, &slug, blog, fragment, json),
        Commands::Toc { slug } => handle_toc_command(&site, &slug, json),
        Commands::Nav { path } => handle_nav_command(&site, &path, json),
        Commands::Children { path } => handle_children_command(&site, &path, json),
        Commands::Search { query } => handle_search_command(&site, &query, json),
        Commands::Blogs => handle_blogs_command(&site, json),
        Commands::Build {
            out,
            threads,
            no_blogs,
        } => handle_build_command(&site, &out, threads, no_blogs, json),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from warn.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Explicit `--config`, else `./learngit.yaml` when present, else defaults.
fn load_config(path: Option<&Path>, content: Option<PathBuf>) -> Result<SiteConfig> {
    let mut config = match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).is_file() => SiteConfig::load(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to load {DEFAULT_CONFIG}"))?,
        None => SiteConfig::default(),
    };
    if let Some(content) = content {
        config.content_root = content;
    }
    log::debug!("content root: {}", config.content_root.display());
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle the render command
fn handle_render_command(
    site: &Site,
    slug: &str,
    blog: bool,
    fragment: bool,
    json: bool,
) -> Result<()> {
    let page = if blog {
        site.render_blog(slug)
            .with_context(|| format!("Failed to render blog post '{slug}'"))?
    } else {
        site.render_doc(slug)
            .with_context(|| format!("Failed to render doc '{slug}'"))?
    };

    if json {
        print_json(&page)
    } else if fragment {
        println!("{}", page.html);
        Ok(())
    } else {
        print!("{}", page.to_document());
        Ok(())
    }
}

/// Handle the toc command
fn handle_toc_command(site: &Site, slug: &str, json: bool) -> Result<()> {
    let toc = site
        .store()
        .doc_toc(slug)
        .with_context(|| format!("Failed to read doc '{slug}'"))?;
    if json {
        return print_json(&toc);
    }
    for entry in &toc {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(2)));
        println!("{indent}{} ({})", entry.text, entry.href);
    }
    Ok(())
}

/// Handle the nav command
fn handle_nav_command(site: &Site, path: &str, json: bool) -> Result<()> {
    let (prev, next) = site.neighbours(path);
    if json {
        #[derive(Serialize)]
        struct Nav {
            prev: Option<learngit_site::Page>,
            next: Option<learngit_site::Page>,
        }
        return print_json(&Nav { prev, next });
    }
    match &prev {
        Some(page) => println!("prev: {} ({})", page.title, page.href),
        None => println!("prev: -"),
    }
    match &next {
        Some(page) => println!("next: {} ({})", page.title, page.href),
        None => println!("next: -"),
    }
    Ok(())
}

/// Handle the children command
fn handle_children_command(site: &Site, path: &str, json: bool) -> Result<()> {
    let children = site
        .store()
        .child_pages::<DocFrontmatter>(site.routes(), path);
    if json {
        return print_json(&children);
    }
    if children.is_empty() {
        println!("No child pages under '{path}'");
    }
    for child in &children {
        println!("{}  {}", child.href, child.frontmatter.title);
        if !child.frontmatter.description.is_empty() {
            println!("    {}", child.frontmatter.description);
        }
    }
    Ok(())
}

/// Handle the search command
fn handle_search_command(site: &Site, query: &str, json: bool) -> Result<()> {
    let docs_base = &site.config().docs_base;
    let hits: Vec<learngit_site::Page> = site
        .routes()
        .search(query)
        .into_iter()
        .map(|page| learngit_site::Page {
            title: page.title.clone(),
            href: format!("{docs_base}{}", page.href),
        })
        .collect();
    if json {
        return print_json(&hits);
    }
    if hits.is_empty() {
        println!("No pages match '{query}'");
    }
    for hit in &hits {
        println!("{}  {}", hit.href, hit.title);
    }
    Ok(())
}

/// Handle the blogs command
fn handle_blogs_command(site: &Site, json: bool) -> Result<()> {
    let posts = site
        .store()
        .all_blogs()
        .context("Failed to list blog posts")?;
    if json {
        return print_json(&posts);
    }
    for post in &posts {
        println!("{}  {}  {}", post.frontmatter.date, post.slug, post.frontmatter.title);
    }
    Ok(())
}

/// Handle the build command
fn handle_build_command(
    site: &Site,
    out: &Path,
    threads: Option<usize>,
    no_blogs: bool,
    json: bool,
) -> Result<()> {
    let options = BuildOptions {
        max_threads: threads,
        skip_blogs: no_blogs,
    };
    let report = site
        .build(out, &options)
        .with_context(|| format!("Failed to build into {}", out.display()))?;

    if json {
        print_json(&report)?;
    } else {
        for result in report.results.iter().filter(|r| r.error.is_some()) {
            println!(
                "✗ {}: {}",
                result.id,
                result.error.as_deref().unwrap_or_default()
            );
        }
        println!(
            "✓ Built {}/{} pages into {} in {:.1} ms",
            report.stats.succeeded,
            report.stats.total,
            out.display(),
            report.stats.processing_time_ms
        );
    }

    if report.stats.failed > 0 {
        bail!("{} page(s) failed to build", report.stats.failed);
    }
    Ok(())
}
