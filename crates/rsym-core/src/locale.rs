use std::fmt;

use serde::{Deserialize, Serialize};

const BASE_LOCALE: &str = "Base";

/// Locale a resource variant belongs to. Orders unspecified, then base, then named languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum LocaleTag {
    #[default]
    None,
    Base,
    Language(String),
}

impl LocaleTag {
    pub fn is_base(&self) -> bool {
        matches!(self, Self::Base)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Language(language) => Some(language.as_str()),
            _ => None,
        }
    }
}

impl From<Option<String>> for LocaleTag {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Self::None,
            Some(value) if value == BASE_LOCALE => Self::Base,
            Some(value) => Self::Language(value),
        }
    }
}

impl From<LocaleTag> for Option<String> {
    fn from(value: LocaleTag) -> Self {
        match value {
            LocaleTag::None => None,
            LocaleTag::Base => Some(BASE_LOCALE.to_string()),
            LocaleTag::Language(language) => Some(language),
        }
    }
}

impl From<&str> for LocaleTag {
    fn from(value: &str) -> Self {
        Self::from(Some(value.to_string()))
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("unspecified"),
            Self::Base => f.write_str(BASE_LOCALE),
            Self::Language(language) => f.write_str(language),
        }
    }
}

#[cfg(test)]
mod locale_tests {
    use super::*;

    #[test]
    fn base_sorts_before_named_languages() {
        let mut tags = vec![
            LocaleTag::from("fr"),
            LocaleTag::Base,
            LocaleTag::from("de"),
            LocaleTag::None,
        ];
        tags.sort();
        assert_eq!(
            tags,
            vec![
                LocaleTag::None,
                LocaleTag::Base,
                LocaleTag::from("de"),
                LocaleTag::from("fr"),
            ]
        );
    }

    #[test]
    fn serde_maps_optional_strings() {
        let tags: Vec<LocaleTag> =
            serde_json::from_str(r#"[null, "Base", "nl"]"#).expect("locale tags");
        assert_eq!(
            tags,
            vec![LocaleTag::None, LocaleTag::Base, LocaleTag::from("nl")]
        );
        assert_eq!(
            serde_json::to_string(&LocaleTag::Base).expect("json"),
            "\"Base\""
        );
        assert_eq!(LocaleTag::from("nl").language(), Some("nl"));
        assert_eq!(LocaleTag::None.to_string(), "unspecified");
    }
}
