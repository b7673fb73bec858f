use std::collections::BTreeMap;

use rsym_core::Diagnostics;

const RESERVED_KEYWORDS: &[&str] = &[
    "Any", "Protocol", "Self", "Type", "as", "associatedtype", "break", "case", "catch",
    "class", "continue", "default", "defer", "deinit", "do", "else", "enum", "extension",
    "fallthrough", "false", "fileprivate", "for", "func", "guard", "if", "import", "in",
    "init", "inout", "internal", "is", "let", "nil", "open", "operator", "private",
    "precedencegroup", "protocol", "public", "repeat", "rethrows", "return", "self", "some",
    "static", "struct", "subscript", "super", "switch", "throw", "throws", "true", "try",
    "typealias", "var", "where", "while",
];

pub fn sanitize_identifier(raw: &str) -> String {
    Sanitizer::default().sanitize(raw)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sanitizer;

impl Sanitizer {
    pub fn sanitize(&self, raw: &str) -> String {
        let mut out = String::new();
        for (index, component) in raw
            .split(|ch: char| !is_identifier_char(ch))
            .filter(|component| !component.is_empty())
            .enumerate()
        {
            if index == 0 {
                out.push_str(component);
            } else {
                out.push_str(&uppercase_first(component));
            }
        }

        if out.is_empty() {
            return out;
        }
        out = lowercase_leading_run(&out);
        if out.starts_with(|ch: char| ch.is_numeric()) {
            out.insert(0, '_');
        }
        if RESERVED_KEYWORDS.contains(&out.as_str()) {
            out.push('_');
        }
        out
    }

    /// Buckets `items` by the sanitized form of `key_fn(item)`.
    ///
    /// Buckets holding more than one item are reported as duplicates and none of
    /// their items survive. Uniques come out ordered by identifier.
    pub fn group<T, I, F>(&self, items: I, key_fn: F) -> GroupingResult<T>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        let mut buckets: BTreeMap<String, Vec<(String, T)>> = BTreeMap::new();
        let mut empties = Vec::new();

        for item in items {
            let raw_key = key_fn(&item);
            let identifier = self.sanitize(&raw_key);
            if identifier.is_empty() {
                empties.push(raw_key);
                continue;
            }
            buckets.entry(identifier).or_default().push((raw_key, item));
        }

        let mut uniques = Vec::new();
        let mut duplicates = BTreeMap::new();
        for (identifier, mut entries) in buckets {
            if entries.len() == 1 {
                if let Some((raw_key, item)) = entries.pop() {
                    uniques.push(Unique {
                        identifier,
                        raw_key,
                        item,
                    });
                }
                continue;
            }
            let mut raw_keys = entries
                .into_iter()
                .map(|(raw_key, _)| raw_key)
                .collect::<Vec<_>>();
            raw_keys.sort();
            duplicates.insert(identifier, raw_keys);
        }

        GroupingResult {
            uniques,
            duplicates,
            empties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique<T> {
    pub identifier: String,
    pub raw_key: String,
    pub item: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingResult<T> {
    pub uniques: Vec<Unique<T>>,
    pub duplicates: BTreeMap<String, Vec<String>>,
    pub empties: Vec<String>,
}

impl<T> GroupingResult<T> {
    pub fn report(&self, what: &str, scope: &str, diagnostics: &mut Diagnostics) {
        for (identifier, raw_keys) in &self.duplicates {
            let quoted = raw_keys
                .iter()
                .map(|key| format!("'{}'", key))
                .collect::<Vec<_>>()
                .join(", ");
            diagnostics.warn(
                "IDENTIFIER_COLLISION",
                format!(
                    "Skipping {} {} in {} because symbol '{}' would be generated for all of these: {}",
                    raw_keys.len(),
                    what,
                    scope,
                    identifier,
                    quoted
                ),
            );
        }
        for raw_key in &self.empties {
            diagnostics.warn(
                "IDENTIFIER_EMPTY",
                format!(
                    "Skipping {} '{}' in {} because no valid identifier can be derived from it",
                    what, raw_key, scope
                ),
            );
        }
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn uppercase_first(component: &str) -> String {
    let mut chars = component.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// "Hello" -> "hello", "URLString" -> "urlString", "ABC" -> "abc".
fn lowercase_leading_run(value: &str) -> String {
    let chars = value.chars().collect::<Vec<_>>();
    let run = chars.iter().take_while(|ch| ch.is_uppercase()).count();
    let lowered = match run {
        0 => 0,
        1 => 1,
        _ if run == chars.len() => run,
        _ if chars[run].is_lowercase() => run - 1,
        _ => run,
    };

    let mut out = String::with_capacity(value.len());
    for ch in &chars[..lowered] {
        out.extend(ch.to_lowercase());
    }
    out.extend(&chars[lowered..]);
    out
}

#[cfg(test)]
mod sanitize_tests {
    use super::*;

    #[test]
    fn sanitize_joins_components_in_camel_case() {
        assert_eq!(sanitize_identifier("my-image"), "myImage");
        assert_eq!(sanitize_identifier("my image"), "myImage");
        assert_eq!(sanitize_identifier("data.json"), "dataJson");
        assert_eq!(sanitize_identifier("snake_case_name"), "snake_case_name");
        assert_eq!(sanitize_identifier("  padded  "), "padded");
    }

    #[test]
    fn sanitize_lowercases_leading_uppercase_run() {
        assert_eq!(sanitize_identifier("Hello"), "hello");
        assert_eq!(sanitize_identifier("URLString"), "urlString");
        assert_eq!(sanitize_identifier("ABC"), "abc");
        assert_eq!(sanitize_identifier("ABC2"), "abc2");
        assert_eq!(sanitize_identifier("CFBundleName"), "cfBundleName");
        assert_eq!(sanitize_identifier("Main-View"), "mainView");
    }

    #[test]
    fn sanitize_guards_digits_keywords_and_empties() {
        assert_eq!(sanitize_identifier("2x"), "_2x");
        assert_eq!(sanitize_identifier("default"), "default_");
        assert_eq!(sanitize_identifier("Self"), "self_");
        assert_eq!(sanitize_identifier("-.-"), "");
        assert_eq!(sanitize_identifier(""), "");
        assert_eq!(sanitize_identifier("café"), "café");
    }

    #[test]
    fn group_drops_every_member_of_a_colliding_bucket() {
        let sanitizer = Sanitizer::default();
        let grouped = sanitizer.group(
            vec!["my-image", "icon", "my image", "%%", "Banner"],
            |name| (*name).to_string(),
        );

        let identifiers = grouped
            .uniques
            .iter()
            .map(|unique| unique.identifier.as_str())
            .collect::<Vec<_>>();
        assert_eq!(identifiers, vec!["banner", "icon"]);
        assert_eq!(
            grouped.duplicates.get("myImage"),
            Some(&vec!["my image".to_string(), "my-image".to_string()])
        );
        assert_eq!(grouped.empties, vec!["%%".to_string()]);
        assert!(grouped
            .uniques
            .iter()
            .all(|unique| unique.raw_key != "my-image" && unique.raw_key != "my image"));

        let mut diagnostics = Diagnostics::new();
        grouped.report("images", "image", &mut diagnostics);
        assert_eq!(
            diagnostics.codes(),
            vec!["IDENTIFIER_COLLISION", "IDENTIFIER_EMPTY"]
        );
        let first = diagnostics.iter().next().expect("collision").to_string();
        assert!(first.contains("'my image', 'my-image'"));
        assert!(first.contains("'myImage'"));
    }

    #[test]
    fn group_orders_uniques_by_identifier() {
        let grouped = Sanitizer::default().group(vec!["b", "A", "c"], |name| (*name).to_string());
        let raw_keys = grouped
            .uniques
            .iter()
            .map(|unique| unique.raw_key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(raw_keys, vec!["A", "b", "c"]);
    }
}
