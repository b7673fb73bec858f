use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT_NAME: &str = "R";
pub const DEFAULT_BUNDLE_EXPRESSION: &str = "R.hostingBundle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Strings,
    Nibs,
    Storyboards,
    Images,
    Colors,
    Data,
    Fonts,
    Files,
    ReuseIdentifiers,
    PropertyLists,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strings => "strings",
            Self::Nibs => "nibs",
            Self::Storyboards => "storyboards",
            Self::Images => "images",
            Self::Colors => "colors",
            Self::Data => "data",
            Self::Fonts => "fonts",
            Self::Files => "files",
            Self::ReuseIdentifiers => "reuseIdentifiers",
            Self::PropertyLists => "propertyLists",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub root_name: String,
    pub development_locale: Option<String>,
    pub bundle_expression: String,
    pub excluded_kinds: BTreeSet<ResourceKind>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            development_locale: None,
            bundle_expression: DEFAULT_BUNDLE_EXPRESSION.to_string(),
            excluded_kinds: BTreeSet::new(),
        }
    }
}

impl GeneratorOptions {
    pub fn is_enabled(&self, kind: ResourceKind) -> bool {
        !self.excluded_kinds.contains(&kind)
    }
}
