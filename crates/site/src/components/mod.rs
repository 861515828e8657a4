//! Component table: which HTML element each source tag or MDX component renders as.

pub mod defaults;

use serde::{Deserialize, Serialize};

/// How one source tag is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    /// Source tag or MDX component name (`table`, `Note`).
    pub name: String,
    /// Emitted HTML element.
    pub element: String,
    /// Class placed before any classes the source element carries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Value of the `data-component` marker, when one is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl Substitution {
    /// A substitution with no class and no marker.
    pub fn new(name: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: element.into(),
            class: None,
            component: None,
        }
    }

    /// Sets the class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the `data-component` marker.
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

/// Lookup table from source names to [`Substitution`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTable {
    /// Substitutions; the first entry for a name wins.
    pub substitutions: Vec<Substitution>,
}

impl ComponentTable {
    /// Substitution for a tag or component name.
    pub fn get(&self, name: &str) -> Option<&Substitution> {
        self.substitutions.iter().find(|s| s.name == name)
    }

    /// Whether `name` has a substitution.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds entries in front of the existing ones so they take precedence.
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = Substitution>) -> Self {
        let mut substitutions: Vec<_> = overrides.into_iter().collect();
        substitutions.append(&mut self.substitutions);
        self.substitutions = substitutions;
        self
    }
}

/// MDX component names start with an uppercase ASCII letter.
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
