use std::collections::{BTreeMap, BTreeSet};

use rsym_core::{Diagnostics, PlistValue, PropertyListRecord, SymbolLeaf, SymbolNode};
use tracing::debug;

use crate::builders::{quote, quote_list, BuildContext, SymbolBuilder};

const PRIMARY_KEYS: &[(&str, &str)] = &[
    ("UIApplicationShortcutItems", "UIApplicationShortcutItemType"),
    ("UIWindowSceneSessionRoleApplication", "UISceneConfigurationName"),
    ("UIWindowSceneSessionRoleExternalDisplay", "UISceneConfigurationName"),
    ("CFBundleDocumentTypes", "CFBundleTypeName"),
    ("CFBundleURLTypes", "CFBundleURLName"),
];

type PlistDictionary = BTreeMap<String, PlistValue>;

pub struct PropertyListBuilder<'a> {
    name: &'a str,
    records: Vec<&'a PropertyListRecord>,
}

impl<'a> PropertyListBuilder<'a> {
    pub fn new(name: &'a str, records: Vec<&'a PropertyListRecord>) -> Self {
        Self { name, records }
    }

    fn consensus(&self, diagnostics: &mut Diagnostics) -> PlistDictionary {
        let mut records = self.records.clone();
        records.sort_by(|left, right| left.configuration.cmp(&right.configuration));
        let configurations = records
            .iter()
            .map(|record| record.configuration.as_str())
            .collect::<Vec<_>>();
        let roots = records.iter().map(|record| &record.root).collect::<Vec<_>>();
        match roots.as_slice() {
            [] => PlistDictionary::new(),
            [root] => (*root).clone(),
            _ => intersect(self.name, &[], &roots, &configurations, diagnostics),
        }
    }

    fn build_dictionary(
        &self,
        node_name: &str,
        path: &[String],
        dictionary: &PlistDictionary,
        context: &BuildContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> SymbolNode {
        let mut node = SymbolNode::new(node_name);
        let scope = scope_label(self.name, path);

        let items = dictionary
            .iter()
            .filter(|(key, value)| is_exposable(key, value))
            .collect::<Vec<_>>();
        let grouped = context.sanitizer.group(items, |(key, _)| (*key).clone());
        grouped.report("property list keys", &scope, diagnostics);

        for unique in grouped.uniques {
            let (key, value) = unique.item;
            match value {
                PlistValue::Bool(flag) => node.leaves.push(SymbolLeaf::constant(
                    &unique.identifier,
                    "Bool",
                    format!(
                        "{}.propertyListBool(list: {}, path: {}, key: {}) ?? {}",
                        context.bundle(),
                        quote(self.name),
                        quote_list(path.iter().map(String::as_str)),
                        quote(key),
                        flag
                    ),
                )),
                PlistValue::String(text) => node.leaves.push(SymbolLeaf::constant(
                    &unique.identifier,
                    "String",
                    format!(
                        "{}.propertyListString(list: {}, path: {}, key: {}) ?? {}",
                        context.bundle(),
                        quote(self.name),
                        quote_list(path.iter().map(String::as_str)),
                        quote(key),
                        quote(text)
                    ),
                )),
                PlistValue::Array(elements) => {
                    if let Some(strings) = string_elements(elements) {
                        node.leaves.push(SymbolLeaf::constant(
                            &unique.identifier,
                            "[String]",
                            format!(
                                "{}.propertyListStringArray(list: {}, path: {}, key: {}) ?? {}",
                                context.bundle(),
                                quote(self.name),
                                quote_list(path.iter().map(String::as_str)),
                                quote(key),
                                quote_list(strings)
                            ),
                        ));
                    } else {
                        node.children.push(self.build_keyed_array(
                            &unique.identifier,
                            &child_path(path, key),
                            key,
                            elements,
                            context,
                            diagnostics,
                        ));
                    }
                }
                PlistValue::Dictionary(nested) => {
                    node.children.push(self.build_dictionary(
                        &unique.identifier,
                        &child_path(path, key),
                        nested,
                        context,
                        diagnostics,
                    ));
                }
            }
        }
        node
    }

    fn build_keyed_array(
        &self,
        node_name: &str,
        path: &[String],
        key: &str,
        elements: &[PlistValue],
        context: &BuildContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> SymbolNode {
        let mut node = SymbolNode::new(node_name);
        let Some(primary_key) = primary_key_for(key) else {
            return node;
        };

        let mut keyed = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            let PlistValue::Dictionary(entry) = element else {
                continue;
            };
            match entry.get(primary_key).and_then(PlistValue::as_str) {
                Some(name) => keyed.push((name, entry)),
                None => diagnostics.warn(
                    "PLIST_PRIMARY_KEY_MISSING",
                    format!(
                        "Skipping element {} of '{}' in {} because it has no string '{}'",
                        index,
                        key,
                        scope_label(self.name, path),
                        primary_key
                    ),
                ),
            }
        }

        let grouped = context
            .sanitizer
            .group(keyed, |(name, _)| (*name).to_string());
        grouped.report("array elements", &scope_label(self.name, path), diagnostics);
        for unique in grouped.uniques {
            let (name, entry) = unique.item;
            node.children.push(self.build_dictionary(
                &unique.identifier,
                &child_path(path, name),
                entry,
                context,
                diagnostics,
            ));
        }
        node
    }
}

impl SymbolBuilder for PropertyListBuilder<'_> {
    fn namespace(&self) -> &str {
        self.name
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let root = self.consensus(diagnostics);
        self.build_dictionary(self.name, &[], &root, context, diagnostics)
    }
}

fn primary_key_for(key: &str) -> Option<&'static str> {
    PRIMARY_KEYS
        .iter()
        .find(|(array_key, _)| *array_key == key)
        .map(|(_, primary)| *primary)
}

fn string_elements(elements: &[PlistValue]) -> Option<Vec<&str>> {
    elements.iter().map(PlistValue::as_str).collect()
}

fn is_exposable(key: &str, value: &PlistValue) -> bool {
    let PlistValue::Array(elements) = value else {
        return true;
    };
    if string_elements(elements).is_some() || primary_key_for(key).is_some() {
        return true;
    }
    debug!(%key, "skipping property list array without a primary key");
    false
}

fn child_path(path: &[String], segment: &str) -> Vec<String> {
    let mut out = path.to_vec();
    out.push(segment.to_string());
    out
}

fn scope_label(list: &str, path: &[String]) -> String {
    if path.is_empty() {
        format!("property list '{}'", list)
    } else {
        format!("property list '{}' at {}", list, path.join("."))
    }
}

fn intersect(
    list: &str,
    path: &[String],
    dictionaries: &[&PlistDictionary],
    configurations: &[&str],
    diagnostics: &mut Diagnostics,
) -> PlistDictionary {
    let keys = dictionaries
        .iter()
        .flat_map(|dictionary| dictionary.keys())
        .collect::<BTreeSet<_>>();

    let mut out = PlistDictionary::new();
    for key in keys {
        let values = dictionaries
            .iter()
            .map(|dictionary| dictionary.get(key))
            .collect::<Option<Vec<_>>>();
        let Some(values) = values else {
            report_mismatch(list, path, key, "is missing in some", configurations, diagnostics);
            continue;
        };
        if values.windows(2).all(|pair| pair[0] == pair[1]) {
            out.insert(key.clone(), values[0].clone());
            continue;
        }
        let nested = values
            .iter()
            .map(|value| match value {
                PlistValue::Dictionary(nested) => Some(nested),
                _ => None,
            })
            .collect::<Option<Vec<_>>>();
        match nested {
            Some(nested) => {
                let merged = intersect(
                    list,
                    &child_path(path, key),
                    &nested,
                    configurations,
                    diagnostics,
                );
                out.insert(key.clone(), PlistValue::Dictionary(merged));
            }
            None => report_mismatch(list, path, key, "differs between", configurations, diagnostics),
        }
    }
    out
}

fn report_mismatch(
    list: &str,
    path: &[String],
    key: &str,
    problem: &str,
    configurations: &[&str],
    diagnostics: &mut Diagnostics,
) {
    let location = child_path(path, key).join(".");
    diagnostics.warn(
        "PLIST_CONFIGURATION_MISMATCH",
        format!(
            "Skipping '{}' in property list '{}' because its value {} configurations: {}",
            location,
            list,
            problem,
            configurations.join(", ")
        ),
    );
}
