use std::collections::{BTreeMap, BTreeSet};

use rsym_core::{
    Diagnostics, LeafParam, LocaleTag, StringEntry, StringTableRecord, SymbolLeaf, SymbolNode,
};
use tracing::debug;

use crate::builders::{quote, quote_list, BuildContext, SymbolBuilder};
use crate::format::{parse_string_params, unify_params, StringParam};

pub struct StringsBuilder<'a> {
    records: &'a [StringTableRecord],
}

impl<'a> StringsBuilder<'a> {
    pub fn new(records: &'a [StringTableRecord]) -> Self {
        Self { records }
    }
}

impl SymbolBuilder for StringsBuilder<'_> {
    fn namespace(&self) -> &str {
        "string"
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let mut namespace = SymbolNode::new(self.namespace());
        let tables = collect_tables(self.records, diagnostics);

        let grouped = context.sanitizer.group(tables, |table| table.name.clone());
        grouped.report("string tables", "string", diagnostics);

        for unique in grouped.uniques {
            let node = build_table(&unique.identifier, &unique.item, context, diagnostics);
            debug!(table = %unique.raw_key, leaves = node.leaves.len(), "built string table");
            namespace.children.push(node);
        }
        namespace
    }
}

#[derive(Debug, Clone)]
struct LocalizedTable {
    name: String,
    // first-encountered order
    locales: Vec<(LocaleTag, BTreeMap<String, StringEntry>)>,
}

impl LocalizedTable {
    fn entries_mut(&mut self, locale: &LocaleTag) -> &mut BTreeMap<String, StringEntry> {
        let index = match self.locales.iter().position(|(tag, _)| tag == locale) {
            Some(index) => index,
            None => {
                self.locales.push((locale.clone(), BTreeMap::new()));
                self.locales.len() - 1
            }
        };
        &mut self.locales[index].1
    }

    fn primary_index(&self, development_locale: Option<&str>) -> usize {
        self.locales
            .iter()
            .position(|(tag, _)| tag.is_base())
            .or_else(|| {
                development_locale.and_then(|development| {
                    self.locales
                        .iter()
                        .position(|(tag, _)| tag.language() == Some(development))
                })
            })
            .unwrap_or(0)
    }
}

fn collect_tables(records: &[StringTableRecord], diagnostics: &mut Diagnostics) -> Vec<LocalizedTable> {
    let mut tables: Vec<LocalizedTable> = Vec::new();

    for record in records {
        let index = match tables.iter().position(|table| table.name == record.table) {
            Some(index) => index,
            None => {
                tables.push(LocalizedTable {
                    name: record.table.clone(),
                    locales: Vec::new(),
                });
                tables.len() - 1
            }
        };
        let entries = tables[index].entries_mut(&record.locale);

        for (key, entry) in &record.entries {
            let Some(current) = entries.get(key) else {
                entries.insert(key.clone(), entry.clone());
                continue;
            };
            if current == entry || current.plural_rules.is_some() {
                continue;
            }
            if entry.plural_rules.is_some() {
                entries.insert(key.clone(), entry.clone());
                continue;
            }
            diagnostics.warn(
                "STRINGS_KEY_REDEFINED",
                format!(
                    "String '{}' is defined more than once in table '{}' ({}), keeping the first definition",
                    key, record.table, record.locale
                ),
            );
        }
    }
    tables
}

fn build_table(
    identifier: &str,
    table: &LocalizedTable,
    context: &BuildContext<'_>,
    diagnostics: &mut Diagnostics,
) -> SymbolNode {
    let mut node = SymbolNode::new(identifier);
    let primary_index = table.primary_index(context.options.development_locale.as_deref());
    report_translation_gaps(table, primary_index, diagnostics);

    let all_keys = table
        .locales
        .iter()
        .flat_map(|(_, entries)| entries.keys().cloned())
        .collect::<BTreeSet<_>>();
    let grouped = context.sanitizer.group(all_keys, |key| key.clone());
    grouped.report("strings", &format!("table '{}'", table.name), diagnostics);

    let mut sorted_locales = table.locales.iter().collect::<Vec<_>>();
    sorted_locales.sort_by(|left, right| left.0.cmp(&right.0));
    let locale_names = sorted_locales
        .iter()
        .filter(|(tag, _)| !tag.is_none())
        .map(|(tag, _)| tag.to_string())
        .collect::<Vec<_>>();

    for unique in grouped.uniques {
        let key = unique.raw_key.as_str();
        let variants = sorted_locales
            .iter()
            .filter_map(|(tag, entries)| entries.get(key).map(|entry| (tag, entry)))
            .collect::<Vec<_>>();

        let Some(params) = unified_params(key, &table.name, &variants, diagnostics) else {
            continue;
        };

        let (primary_tag, primary_entries) = &table.locales[primary_index];
        let fallback = primary_entries.get(key).or_else(|| {
            table
                .locales
                .iter()
                .find_map(|(_, entries)| entries.get(key))
        });
        let Some(fallback) = fallback else {
            continue;
        };

        let binding = format!(
            "StringResource(key: {}, tableName: {}, bundle: {}, locales: {}, developmentValue: {})",
            quote(key),
            quote(&table.name),
            context.bundle(),
            quote_list(locale_names.iter().map(String::as_str)),
            quote(&fallback.value)
        );
        let mut constant = SymbolLeaf::constant(&unique.identifier, "StringResource", binding)
            .with_doc(format!("Value: {}", fallback.value));
        if !locale_names.is_empty() {
            constant = constant.with_doc(format!("Locales: {}", locale_names.join(", ")));
        }
        if let Some(comment) = &fallback.comment {
            constant = constant.with_doc(format!("Comment: {}", comment));
        }
        node.leaves.push(constant);

        if params.is_empty() {
            continue;
        }
        let leaf_params = leaf_params(&params, context);
        let arguments = leaf_params
            .iter()
            .map(|param| param.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let binding = format!(
            "String(format: NSLocalizedString({}, tableName: {}, bundle: {}, value: {}, comment: \"\"), {})",
            quote(key),
            quote(&table.name),
            context.bundle(),
            quote(&fallback.value),
            arguments
        );
        node.leaves.push(
            SymbolLeaf::function(&unique.identifier, leaf_params, "String", binding)
                .with_doc(format!("Value: {}", fallback.value))
                .with_doc(format!("Primary locale: {}", primary_tag)),
        );
    }
    node
}

fn unified_params(
    key: &str,
    table: &str,
    variants: &[(&LocaleTag, &StringEntry)],
    diagnostics: &mut Diagnostics,
) -> Option<Vec<StringParam>> {
    let mut unified: Option<Vec<StringParam>> = None;
    let mut agreeing: Vec<String> = Vec::new();

    for (locale, entry) in variants {
        let params = match parse_string_params(&entry.value, entry.plural_rules.as_ref()) {
            Ok(params) => params,
            Err(error) => {
                diagnostics.warn(
                    error.code,
                    format!(
                        "Skipping string '{}' in table '{}' ({}): {}",
                        key, table, locale, error.message
                    ),
                );
                return None;
            }
        };
        let next = match &unified {
            None => Some(params),
            Some(current) => unify_params(current, &params),
        };
        let Some(next) = next else {
            diagnostics.warn(
                "STRINGS_FORMAT_MISMATCH",
                format!(
                    "Skipping string '{}' in table '{}': format specifiers of {} don't match those of {}",
                    key,
                    table,
                    locale,
                    agreeing.join(", ")
                ),
            );
            return None;
        };
        unified = Some(next);
        agreeing.push(locale.to_string());
    }

    let params = unified?;
    if let Some(position) = params.iter().position(StringParam::is_unresolved) {
        diagnostics.warn(
            "STRINGS_FORMAT_INCOMPLETE",
            format!(
                "Skipping string '{}' in table '{}': argument {} is never used by any locale",
                key,
                table,
                position + 1
            ),
        );
        return None;
    }
    Some(params)
}

fn leaf_params(params: &[StringParam], context: &BuildContext<'_>) -> Vec<LeafParam> {
    let mut used = BTreeSet::new();
    params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let named = param
                .name
                .as_deref()
                .map(|name| context.sanitizer.sanitize(name))
                .filter(|name| !name.is_empty() && !used.contains(name));
            let name = named.unwrap_or_else(|| format!("value{}", index + 1));
            used.insert(name.clone());
            LeafParam::unlabeled(name, param.spec.type_name())
        })
        .collect()
}

fn report_translation_gaps(table: &LocalizedTable, primary_index: usize, diagnostics: &mut Diagnostics) {
    let (primary_tag, primary_entries) = &table.locales[primary_index];
    let primary_keys = primary_entries.keys().collect::<BTreeSet<_>>();

    let mut others = table
        .locales
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != primary_index)
        .map(|(_, locale)| locale)
        .collect::<Vec<_>>();
    others.sort_by(|left, right| left.0.cmp(&right.0));

    for (tag, entries) in others {
        let keys = entries.keys().collect::<BTreeSet<_>>();
        let missing = primary_keys
            .difference(&keys)
            .map(|key| key.as_str())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            diagnostics.warn(
                "STRINGS_MISSING_TRANSLATION",
                format!(
                    "Table '{}' in locale '{}' is missing translations for keys: {}",
                    table.name,
                    tag,
                    missing.join(", ")
                ),
            );
        }
        let extra = keys
            .difference(&primary_keys)
            .map(|key| key.as_str())
            .collect::<Vec<_>>();
        if !extra.is_empty() {
            diagnostics.warn(
                "STRINGS_EXTRA_TRANSLATION",
                format!(
                    "Table '{}' in locale '{}' has translations for keys not present in primary locale '{}': {}",
                    table.name,
                    tag,
                    primary_tag,
                    extra.join(", ")
                ),
            );
        }
    }
}
