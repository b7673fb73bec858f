use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locale::LocaleTag;

pub const PLURAL_RULE_TYPE: &str = "NSStringPluralRuleType";

fn default_plural_spec_type() -> String {
    PLURAL_RULE_TYPE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringTableRecord {
    pub table: String,
    #[serde(default)]
    pub locale: LocaleTag,
    #[serde(default)]
    pub entries: BTreeMap<String, StringEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringEntry {
    pub value: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub plural_rules: Option<BTreeMap<String, PluralRule>>,
}

impl StringEntry {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: None,
            plural_rules: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluralRule {
    #[serde(default = "default_plural_spec_type")]
    pub spec_type: String,
    pub value_type: String,
    #[serde(default)]
    pub cases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
    Nib,
    Storyboard,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nib => "nib",
            Self::Storyboard => "storyboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedIdentifier {
    pub identifier: String,
    pub type_name: String,
}

impl TypedIdentifier {
    pub fn new(identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTarget {
    pub platform: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub kind: TemplateKind,
    pub name: String,
    #[serde(default)]
    pub locale: LocaleTag,
    #[serde(default)]
    pub root_types: Vec<String>,
    #[serde(default)]
    pub nested_elements: Vec<TypedIdentifier>,
    #[serde(default)]
    pub reuse_tokens: Vec<TypedIdentifier>,
    #[serde(default)]
    pub used_images: Vec<String>,
    #[serde(default)]
    pub used_colors: Vec<String>,
    #[serde(default)]
    pub deployment_target: Option<DeploymentTarget>,
}

impl TemplateRecord {
    pub fn new(kind: TemplateKind, name: impl Into<String>, locale: LocaleTag) -> Self {
        Self {
            kind,
            name: name.into(),
            locale,
            root_types: Vec::new(),
            nested_elements: Vec::new(),
            reuse_tokens: Vec::new(),
            used_images: Vec::new(),
            used_colors: Vec::new(),
            deployment_target: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Image,
    Color,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAssetRecord {
    pub kind: AssetKind,
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub namespace: Vec<String>,
    pub name: String,
}

impl MediaAssetRecord {
    pub fn new(kind: AssetKind, namespace: &[&str], name: impl Into<String>) -> Self {
        Self {
            kind,
            catalog: String::new(),
            namespace: namespace.iter().map(|entry| (*entry).to_string()).collect(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        let mut parts = self.namespace.clone();
        parts.push(self.name.clone());
        parts.join("/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFileRecord {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRecord {
    pub file_name: String,
    pub postscript_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
}

impl FileRecord {
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlistValue {
    Bool(bool),
    String(String),
    Array(Vec<PlistValue>),
    Dictionary(BTreeMap<String, PlistValue>),
}

impl PlistValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dictionary(_) => "dictionary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListRecord {
    pub name: String,
    #[serde(default)]
    pub configuration: String,
    #[serde(default)]
    pub root: BTreeMap<String, PlistValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceInput {
    pub strings: Vec<StringTableRecord>,
    pub templates: Vec<TemplateRecord>,
    pub assets: Vec<MediaAssetRecord>,
    pub image_files: Vec<ImageFileRecord>,
    pub fonts: Vec<FontRecord>,
    pub files: Vec<FileRecord>,
    pub property_lists: Vec<PropertyListRecord>,
}

impl ResourceInput {
    pub fn extend(&mut self, other: ResourceInput) {
        self.strings.extend(other.strings);
        self.templates.extend(other.templates);
        self.assets.extend(other.assets);
        self.image_files.extend(other.image_files);
        self.fonts.extend(other.fonts);
        self.files.extend(other.files);
        self.property_lists.extend(other.property_lists);
    }
}

#[cfg(test)]
mod records_tests {
    use super::*;

    #[test]
    fn resource_input_deserializes_from_sparse_json() {
        let input: ResourceInput = serde_json::from_str(
            r#"{
  "strings": [{
    "table": "Localizable",
    "locale": "Base",
    "entries": {
      "files": {
        "value": "%#@count@",
        "pluralRules": { "count": { "valueType": "d", "cases": { "one": "%d file" } } }
      }
    }
  }],
  "propertyLists": [{
    "name": "info",
    "root": { "CFBundleName": "Demo", "UIRequiresFullScreen": true, "Tags": ["a"] }
  }]
}"#,
        )
        .expect("resource input");

        let table = &input.strings[0];
        assert_eq!(table.locale, LocaleTag::Base);
        let rule = &table.entries["files"]
            .plural_rules
            .as_ref()
            .expect("rules")["count"];
        assert_eq!(rule.spec_type, PLURAL_RULE_TYPE);
        assert_eq!(
            input.property_lists[0].root.get("UIRequiresFullScreen"),
            Some(&PlistValue::Bool(true))
        );
        assert!(input.templates.is_empty());
    }

    #[test]
    fn media_and_file_helpers_derive_lookup_names() {
        let asset = MediaAssetRecord::new(AssetKind::Image, &["icons", "tab"], "home");
        assert_eq!(asset.full_name(), "icons/tab/home");
        let file = FileRecord {
            path: "Resources/seed/data.json".to_string(),
        };
        assert_eq!(file.file_name(), "data.json");
    }
}
