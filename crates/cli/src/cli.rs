//! Command-line interface definitions for learngit

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the learngit application
#[derive(Parser, Debug)]
#[command(name = "learngit")]
#[command(version)]
#[command(about = "Render and build the Learn Git documentation site", long_about = None)]
pub struct Cli {
    /// Site configuration file (YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Content directory holding docs/ and blogs/ (overrides the config)
    #[arg(long, global = true, value_name = "DIR")]
    pub content: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for learngit
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one page to HTML on stdout
    Render {
        /// Doc slug (`branching/merging`) or blog slug with --blog
        slug: String,

        /// Treat the slug as a blog post
        #[arg(short, long)]
        blog: bool,

        /// Print only the body fragment instead of a full document
        #[arg(long)]
        fragment: bool,
    },

    /// Print the table of contents of a doc
    Toc {
        /// Doc slug
        slug: String,
    },

    /// Show the previous and next pages of a route path
    Nav {
        /// Route path (`branching/merging`)
        path: String,
    },

    /// List the child pages of a route container
    Children {
        /// Route path (`branching`)
        path: String,
    },

    /// Search page titles and paths
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// List blog posts, newest first
    Blogs,

    /// Render every page into a directory of static HTML
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: PathBuf,

        /// Worker threads (defaults to the number of CPU cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Skip blog posts
        #[arg(long)]
        no_blogs: bool,
    },
}
