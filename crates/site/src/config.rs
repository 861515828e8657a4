//! Site configuration loaded from `learngit.yaml`.

use crate::components::{ComponentTable, Substitution, defaults::default_learngit_components};
use crate::routes::{RouteEntry, Routes, defaults::default_learngit_routes};
use learngit_core::{IconTable, Pipeline, PipelineOptions, SyntectHighlighter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors while reading the site configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        /// Config path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid YAML for [`SiteConfig`].
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Config path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
}

/// Everything a site needs besides its content files.
///
/// Every field has a default, so an empty file (or no file) gives the stock
/// Learn Git site rooted at `contents/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding `docs/` and `blogs/`.
    pub content_root: PathBuf,
    /// URL prefix of documentation pages.
    pub docs_base: String,
    /// URL prefix of blog posts.
    pub blog_base: String,
    /// Navigation tree.
    pub routes: Vec<RouteEntry>,
    /// Extra or overriding extension to devicon entries.
    pub icons: BTreeMap<String, String>,
    /// Substitutions that take precedence over the built-in component table.
    pub components: Vec<Substitution>,
    /// Run the syntax highlighter over code blocks.
    pub highlight: bool,
    /// Extract `lang:title` code titles.
    pub code_titles: bool,
    /// Prepend self-links to headings.
    pub heading_anchors: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("contents"),
            docs_base: "/docs".to_string(),
            blog_base: "/blog".to_string(),
            routes: default_learngit_routes(),
            icons: BTreeMap::new(),
            components: Vec::new(),
            highlight: true,
            code_titles: true,
            heading_anchors: true,
        }
    }
}

impl SiteConfig {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Reads and parses a config file.
    ///
    /// A relative `content_root` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.content_root.is_relative()
            && let Some(dir) = path.parent()
        {
            config.content_root = dir.join(&config.content_root);
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The route tree with its page order.
    pub fn routes(&self) -> Routes {
        Routes::new(self.routes.clone())
    }

    /// Built-in icons plus the configured entries.
    pub fn icon_table(&self) -> IconTable {
        IconTable::default().with_entries(self.icons.iter().map(|(k, v)| (k, v.clone())))
    }

    /// Built-in substitutions with the configured ones in front.
    pub fn component_table(&self) -> ComponentTable {
        default_learngit_components().with_overrides(self.components.iter().cloned())
    }

    /// A compilation pipeline matching the configured switches.
    pub fn pipeline(&self) -> Pipeline {
        let options = PipelineOptions {
            code_titles: self.code_titles,
            heading_anchors: self.heading_anchors,
            ..PipelineOptions::default()
        };
        let pipeline = Pipeline::new(self.icon_table()).with_options(options);
        if self.highlight {
            pipeline.with_highlighter(Arc::new(SyntectHighlighter::default()))
        } else {
            pipeline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_the_default_site() {
        let config = SiteConfig::from_yaml("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.docs_base, "/docs");
        assert!(!config.routes.is_empty());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = SiteConfig::from_yaml(
            "highlight: false\nicons:\n  gitignore: git\nroutes:\n  - title: Only\n    href: /only\n",
        )
        .unwrap();
        assert!(!config.highlight);
        assert!(config.heading_anchors);
        assert_eq!(config.routes().pages().len(), 1);
        assert_eq!(config.icon_table().icon_name("GITIGNORE"), Some("git"));
        assert_eq!(config.icon_table().icon_name("rs"), Some("rust"));
    }

    #[test]
    fn component_overrides_win() {
        let config = SiteConfig::from_yaml(
            "components:\n  - name: Note\n    element: div\n    class: callout\n",
        )
        .unwrap();
        let table = config.component_table();
        assert_eq!(table.get("Note").map(|s| s.element.as_str()), Some("div"));
        assert!(table.contains("Stepper"));
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(SiteConfig::from_yaml("highlight: [1, 2]\n").is_err());
    }

    #[test]
    fn load_resolves_content_root_next_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learngit.yaml");
        std::fs::write(&path, "content_root: site-content\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.content_root, dir.path().join("site-content"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SiteConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
