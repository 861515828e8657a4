//! File-extension to devicon lookup used to decorate code-block titles.

use std::collections::BTreeMap;

const BUILTIN: &[(&str, &str)] = &[
    ("bash", "bash"),
    ("c", "c"),
    ("cpp", "cplusplus"),
    ("cs", "csharp"),
    ("css", "css3"),
    ("dart", "dart"),
    ("go", "go"),
    ("html", "html5"),
    ("java", "java"),
    ("js", "javascript"),
    ("json", "json"),
    ("jsx", "react"),
    ("kt", "kotlin"),
    ("md", "markdown"),
    ("mdx", "markdown"),
    ("php", "php"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sass", "sass"),
    ("scss", "sass"),
    ("sh", "bash"),
    ("sql", "azuresqldatabase"),
    ("swift", "swift"),
    ("ts", "typescript"),
    ("tsx", "react"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("zsh", "bash"),
];

/// Read-only mapping from lowercase file extension to devicon name.
///
/// Lookups fold the extension to lowercase first, so `ts` and `TS` resolve
/// to the same icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTable {
    names: BTreeMap<String, String>,
}

impl Default for IconTable {
    fn default() -> Self {
        Self {
            names: BUILTIN
                .iter()
                .map(|(ext, name)| (ext.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl IconTable {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self {
            names: BTreeMap::new(),
        }
    }

    /// Adds or overrides entries; extensions are lowercased.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (ext, name) in entries {
            self.names.insert(ext.as_ref().to_lowercase(), name.into());
        }
        self
    }

    /// Devicon name for an extension.
    pub fn icon_name(&self, extension: &str) -> Option<&str> {
        self.names
            .get(&extension.to_lowercase())
            .map(String::as_str)
    }

    /// Extension after the last `.` of `title` when the table knows it.
    pub fn supported_extension<'a>(&self, title: &'a str) -> Option<&'a str> {
        let (_, ext) = title.rsplit_once('.')?;
        self.icon_name(ext).map(|_| ext)
    }

    /// Whether `title` ends in a known `.<ext>`.
    pub fn has_supported_extension(&self, title: &str) -> bool {
        self.supported_extension(title).is_some()
    }

    /// Class applied to the inserted `<i>` marker.
    pub fn icon_class(&self, title: &str) -> Option<String> {
        let ext = self.supported_extension(title)?;
        let name = self.icon_name(ext)?;
        Some(format!("devicon-{name}-plain text-[17px]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let icons = IconTable::default();
        assert_eq!(icons.icon_name("ts"), Some("typescript"));
        assert_eq!(icons.icon_name("TS"), icons.icon_name("ts"));
    }

    #[test]
    fn extension_is_taken_after_last_dot() {
        let icons = IconTable::default();
        assert_eq!(icons.supported_extension("vite.config.ts"), Some("ts"));
        assert_eq!(icons.supported_extension("Main.RS"), Some("RS"));
        assert!(!icons.has_supported_extension("Makefile"));
        assert!(!icons.has_supported_extension("notes.txt"));
        assert!(!icons.has_supported_extension("trailing."));
    }

    #[test]
    fn icon_class_uses_devicon_plain() {
        let icons = IconTable::default();
        assert_eq!(
            icons.icon_class("hooks/pre-commit.sh").as_deref(),
            Some("devicon-bash-plain text-[17px]")
        );
        assert_eq!(icons.icon_class("README"), None);
    }

    #[test]
    fn entries_can_be_extended() {
        let icons = IconTable::empty().with_entries([("GITIGNORE", "git")]);
        assert_eq!(icons.icon_name("gitignore"), Some("git"));
        assert_eq!(icons.icon_name("ts"), None);
    }
}
