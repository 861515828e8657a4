#![deny(missing_docs)]
//! Learn Git site layer: content loading, navigation, component substitution, and HTML rendering.

/// Component substitution table.
pub mod components;
/// Site configuration.
pub mod config;
/// Content files and their frontmatter.
pub mod content;
/// HTML rendering of compiled trees.
pub mod render;
/// Route tree and navigation.
pub mod routes;
/// Page rendering and whole-site builds.
pub mod site;

pub use components::{ComponentTable, Substitution};
pub use config::{ConfigError, SiteConfig};
pub use content::{
    Author, BlogFrontmatter, BlogPost, ChildPage, CompiledPage, ContentError, ContentStore,
    DocFrontmatter, Document,
};
pub use render::HtmlRenderer;
pub use routes::{Page, PrevNext, RouteEntry, Routes};
pub use site::{BuildError, BuildOptions, BuildReport, BuildResult, BuildStats, RenderedPage, Site};
