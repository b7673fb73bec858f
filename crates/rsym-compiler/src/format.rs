use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use rsym_core::{PluralRule, ResourceError, PLURAL_RULE_TYPE};

pub type PluralDictionary = BTreeMap<String, PluralRule>;

// Explicit `N$` positions beyond this are rejected instead of laid out.
const MAX_ARGUMENT_POSITION: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatSpecifier {
    Object,
    Double,
    Int,
    UInt,
    Character,
    CStringPointer,
    VoidPointer,
    TopType,
}

impl FormatSpecifier {
    pub fn from_conversion(code: char) -> Option<Self> {
        let specifier = match code {
            '@' => Self::Object,
            'a' | 'A' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G' => Self::Double,
            'd' | 'D' | 'i' => Self::Int,
            'o' | 'O' | 'u' | 'U' | 'x' | 'X' => Self::UInt,
            'c' | 'C' => Self::Character,
            's' | 'S' => Self::CStringPointer,
            'p' => Self::VoidPointer,
            _ => return None,
        };
        Some(specifier)
    }

    pub fn unify(self, other: Self) -> Option<Self> {
        match (self, other) {
            (left, right) if left == right => Some(left),
            (Self::TopType, right) => Some(right),
            (left, Self::TopType) => Some(left),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object => "String",
            Self::Double => "Double",
            Self::Int => "Int",
            Self::UInt => "UInt",
            Self::Character => "Character",
            Self::CStringPointer => "UnsafePointer<CChar>",
            Self::VoidPointer => "UnsafeRawPointer",
            Self::TopType => "Any",
        }
    }
}

impl fmt::Display for FormatSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringParam {
    pub name: Option<String>,
    pub spec: FormatSpecifier,
}

impl StringParam {
    pub fn new(spec: FormatSpecifier) -> Self {
        Self { name: None, spec }
    }

    pub fn named(name: impl Into<String>, spec: FormatSpecifier) -> Self {
        Self {
            name: Some(name.into()),
            spec,
        }
    }

    pub fn unresolved() -> Self {
        Self::new(FormatSpecifier::TopType)
    }

    pub fn unify(&self, other: &StringParam) -> Option<StringParam> {
        let spec = self.spec.unify(other.spec)?;
        let name = match (&self.name, &other.name) {
            (Some(left), Some(right)) if left != right => return None,
            (Some(left), _) => Some(left.clone()),
            (None, right) => right.clone(),
        };
        Some(StringParam { name, spec })
    }

    pub fn is_unresolved(&self) -> bool {
        self.spec == FormatSpecifier::TopType
    }
}

/// Position-wise unification; a missing entry takes the other side's value.
pub fn unify_params(left: &[StringParam], right: &[StringParam]) -> Option<Vec<StringParam>> {
    let mut out = Vec::with_capacity(left.len().max(right.len()));
    for index in 0..left.len().max(right.len()) {
        let unified = match (left.get(index), right.get(index)) {
            (Some(left), Some(right)) => left.unify(right)?,
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => break,
        };
        out.push(unified);
    }
    Some(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPart {
    Spec {
        position: Option<usize>,
        spec: FormatSpecifier,
    },
    Reference {
        position: Option<usize>,
        name: String,
    },
}

pub fn parse_format_string(source: &str) -> Vec<FormatPart> {
    let mut parts = Vec::new();
    for caps in placeholder_regex().captures_iter(source) {
        if let Some(reference) = caps.get(2) {
            parts.push(FormatPart::Reference {
                position: parse_position(caps.get(1)),
                name: reference.as_str().to_string(),
            });
            continue;
        }
        let Some(spec) = caps
            .get(4)
            .and_then(|code| code.as_str().chars().next())
            .and_then(FormatSpecifier::from_conversion)
        else {
            // escaped "%%"
            continue;
        };
        parts.push(FormatPart::Spec {
            position: parse_position(caps.get(3)),
            spec,
        });
    }
    parts
}

// Digits too large for `usize` saturate so layout rejects them.
fn parse_position(capture: Option<regex::Match<'_>>) -> Option<usize> {
    capture.map(|position| position.as_str().parse::<usize>().unwrap_or(usize::MAX))
}

pub fn parse_string_params(
    value: &str,
    plurals: Option<&PluralDictionary>,
) -> Result<Vec<StringParam>, ResourceError> {
    layout_params(&parse_format_string(value), None, plurals, &[])
}

pub fn resolve_reference(
    name: &str,
    plurals: &PluralDictionary,
    visited: &[String],
) -> Result<Vec<StringParam>, ResourceError> {
    if visited.iter().any(|entry| entry == name) {
        let mut chain = visited.to_vec();
        chain.push(name.to_string());
        return Err(ResourceError::new(
            "STRINGS_REFERENCE_CYCLIC",
            format!("Cyclic plural reference: {}", chain.join(" -> ")),
        ));
    }
    let Some(rule) = plurals.get(name) else {
        return Err(ResourceError::new(
            "STRINGS_REFERENCE_MISSING",
            format!("Plural reference \"{}\" is not defined.", name),
        ));
    };
    if rule.spec_type != PLURAL_RULE_TYPE {
        return Err(ResourceError::new(
            "STRINGS_REFERENCE_UNSUPPORTED",
            format!(
                "Plural reference \"{}\" has unsupported spec type \"{}\".",
                name, rule.spec_type
            ),
        ));
    }

    let value_spec = match parse_format_string(&format!("%{}", rule.value_type)).as_slice() {
        [FormatPart::Spec { spec, .. }] => *spec,
        _ => {
            return Err(ResourceError::new(
                "STRINGS_REFERENCE_VALUE_TYPE",
                format!(
                    "Plural reference \"{}\" has invalid value type \"{}\".",
                    name, rule.value_type
                ),
            ))
        }
    };

    let mut nested_visited = visited.to_vec();
    nested_visited.push(name.to_string());

    let mut params = vec![StringParam::named(name, value_spec)];
    for (category, case_value) in &rule.cases {
        let alternative = layout_params(
            &parse_format_string(case_value),
            Some(name),
            Some(plurals),
            &nested_visited,
        )?;
        params = unify_params(&params, &alternative).ok_or_else(|| {
            ResourceError::new(
                "STRINGS_REFERENCE_AMBIGUOUS",
                format!(
                    "Plural case \"{}\" of \"{}\" uses format specifiers that conflict with the other cases.",
                    category, name
                ),
            )
        })?;
    }
    Ok(params)
}

// Lays parts out by position; unreferenced lower slots stay unresolved.
fn layout_params(
    parts: &[FormatPart],
    owner: Option<&str>,
    plurals: Option<&PluralDictionary>,
    visited: &[String],
) -> Result<Vec<StringParam>, ResourceError> {
    let mut slots: Vec<Option<StringParam>> = Vec::new();
    let mut next_slot = 0usize;

    for part in parts {
        match part {
            FormatPart::Spec {
                position: Some(position),
                spec,
            } => {
                let param = StringParam {
                    name: owner.map(str::to_string),
                    spec: *spec,
                };
                place_param(&mut slots, slot_for_position(*position)?, param)?;
            }
            FormatPart::Spec {
                position: None,
                spec,
            } => {
                let param = StringParam {
                    name: owner.map(str::to_string),
                    spec: *spec,
                };
                place_param(&mut slots, next_slot, param)?;
                next_slot += 1;
            }
            FormatPart::Reference { position, name } => {
                let Some(plurals) = plurals else {
                    return Err(ResourceError::new(
                        "STRINGS_REFERENCE_MISSING",
                        format!(
                            "Plural reference \"{}\" used without a plural dictionary.",
                            name
                        ),
                    ));
                };
                let params = resolve_reference(name, plurals, visited)?;
                let start = match position {
                    Some(position) => slot_for_position(*position)?,
                    None => {
                        let start = next_slot;
                        next_slot += params.len();
                        start
                    }
                };
                for (offset, param) in params.into_iter().enumerate() {
                    place_param(&mut slots, start + offset, param)?;
                }
            }
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(StringParam::unresolved))
        .collect())
}

fn slot_for_position(position: usize) -> Result<usize, ResourceError> {
    if position == 0 || position > MAX_ARGUMENT_POSITION {
        return Err(ResourceError::new(
            "STRINGS_FORMAT_POSITION",
            format!(
                "Argument position {} is outside 1...{}.",
                if position == usize::MAX {
                    "(overflow)".to_string()
                } else {
                    position.to_string()
                },
                MAX_ARGUMENT_POSITION
            ),
        ));
    }
    Ok(position - 1)
}

fn place_param(
    slots: &mut Vec<Option<StringParam>>,
    index: usize,
    param: StringParam,
) -> Result<(), ResourceError> {
    if slots.len() <= index {
        slots.resize(index + 1, None);
    }
    let merged = match slots[index].take() {
        None => param,
        Some(existing) => existing.unify(&param).ok_or_else(|| {
            ResourceError::new(
                "STRINGS_FORMAT_CONFLICT",
                format!(
                    "Argument {} is used as both {} and {}.",
                    index + 1,
                    existing.spec,
                    param.spec
                ),
            )
        })?,
    };
    slots[index] = Some(merged);
    Ok(())
}

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"%%|%(?:([1-9][0-9]*)\$)?#@([^@]+)@|%(?:([1-9][0-9]*)\$)?[-+ #0']*(?:[0-9]+|\*)?(?:\.(?:[0-9]+|\*))?(?:hh|h|ll|l|q|z|t|j|L)?([@aAeEfFgGdDiIoOuUxXcCsSp])",
        )
        .expect("placeholder regex must compile")
    })
}

#[cfg(test)]
mod format_tests {
    use super::*;
    use FormatSpecifier::*;

    fn specs(value: &str) -> Vec<FormatSpecifier> {
        parse_string_params(value, None)
            .expect("params")
            .into_iter()
            .map(|param| param.spec)
            .collect()
    }

    fn plain(specs: &[FormatSpecifier]) -> Vec<StringParam> {
        specs.iter().copied().map(StringParam::new).collect()
    }

    fn rule(value_type: &str, cases: &[(&str, &str)]) -> PluralRule {
        PluralRule {
            spec_type: PLURAL_RULE_TYPE.to_string(),
            value_type: value_type.to_string(),
            cases: cases
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        }
    }

    #[test]
    fn parse_sequential_and_positional_placeholders() {
        assert_eq!(specs("Hello %@, you have %d items"), vec![Object, Int]);
        assert_eq!(specs("%2$@ before %1$d"), vec![Int, Object]);
        assert_eq!(specs("%3$@"), vec![TopType, TopType, Object]);
        assert_eq!(specs("%.2f%% done, %5lu left"), vec![Double, UInt]);
        assert_eq!(specs("%c %s %p %x %i %e"), vec![Character, CStringPointer, VoidPointer, UInt, Int, Double]);
        assert!(specs("100%% sure").is_empty());
        assert!(specs("no placeholders").is_empty());
    }

    #[test]
    fn parse_keeps_references_as_parts() {
        assert_eq!(
            parse_format_string("%#@files@ in %@"),
            vec![
                FormatPart::Reference {
                    position: None,
                    name: "files".to_string()
                },
                FormatPart::Spec {
                    position: None,
                    spec: Object
                },
            ]
        );
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let huge = parse_string_params("%1000000000000000000$@", None).expect_err("huge");
        assert_eq!(huge.code, "STRINGS_FORMAT_POSITION");

        let overflow =
            parse_string_params("%99999999999999999999999999$d", None).expect_err("overflow");
        assert_eq!(overflow.code, "STRINGS_FORMAT_POSITION");
        assert!(overflow.message.contains("(overflow)"));

        assert_eq!(specs("%256$@").len(), 256);
        let past_limit = parse_string_params("%257$@", None).expect_err("past limit");
        assert_eq!(past_limit.code, "STRINGS_FORMAT_POSITION");
    }

    #[test]
    fn positional_references_start_at_their_slot() {
        assert_eq!(
            parse_format_string("%1$#@files@"),
            vec![FormatPart::Reference {
                position: Some(1),
                name: "files".to_string()
            }]
        );

        let plurals = PluralDictionary::from([(
            "files".to_string(),
            rule("d", &[("one", "%d file"), ("other", "%d files")]),
        )]);
        assert_eq!(
            parse_string_params("%1$#@files@", Some(&plurals)).expect("params"),
            vec![StringParam::named("files", Int)]
        );
        assert_eq!(
            parse_string_params("%2$#@files@ in %1$@", Some(&plurals)).expect("params"),
            vec![StringParam::new(Object), StringParam::named("files", Int)]
        );
    }

    #[test]
    fn repeated_positions_unify_or_conflict() {
        assert_eq!(specs("%1$@ and again %1$@"), vec![Object]);
        let error = parse_string_params("%1$@ vs %1$d", None).expect_err("conflict");
        assert_eq!(error.code, "STRINGS_FORMAT_CONFLICT");
    }

    #[test]
    fn specifier_unification_rules() {
        assert_eq!(Object.unify(Object), Some(Object));
        assert_eq!(TopType.unify(Int), Some(Int));
        assert_eq!(Double.unify(TopType), Some(Double));
        assert_eq!(Int.unify(UInt), None);
    }

    #[test]
    fn param_unification_respects_names_and_padding() {
        let named = StringParam::named("count", Int);
        assert_eq!(named.unify(&StringParam::new(Int)), Some(named.clone()));
        assert_eq!(named.unify(&StringParam::named("other", Int)), None);

        let unified = unify_params(&plain(&[Object]), &plain(&[TopType, Int])).expect("unify");
        assert_eq!(unified, plain(&[Object, Int]));
        assert_eq!(unify_params(&plain(&[Object]), &plain(&[Int])), None);
    }

    #[test]
    fn unify_params_is_associative_when_pairs_succeed() {
        let x = plain(&[Object, TopType]);
        let y = plain(&[TopType, Int]);
        let z = plain(&[Object, TopType, Double]);

        let left = unify_params(&unify_params(&x, &y).expect("xy"), &z).expect("left");
        let right = unify_params(&x, &unify_params(&y, &z).expect("yz")).expect("right");
        assert_eq!(left, right);
        assert_eq!(left, plain(&[Object, Int, Double]));
    }

    #[test]
    fn resolve_reference_unifies_every_case() {
        let plurals = PluralDictionary::from([(
            "files".to_string(),
            rule("d", &[("one", "One file"), ("other", "%d files")]),
        )]);
        let params = parse_string_params("%#@files@ in %@", Some(&plurals)).expect("params");
        assert_eq!(
            params,
            vec![StringParam::named("files", Int), StringParam::new(Object)]
        );
    }

    #[test]
    fn resolve_reference_follows_nested_references() {
        let plurals = PluralDictionary::from([
            (
                "apples".to_string(),
                rule("d", &[("other", "%d apples and %#@pears@")]),
            ),
            ("pears".to_string(), rule("u", &[("other", "%u pears")])),
        ]);
        let params = resolve_reference("apples", &plurals, &[]).expect("params");
        assert_eq!(
            params,
            vec![
                StringParam::named("apples", Int),
                StringParam::named("pears", UInt)
            ]
        );
    }

    #[test]
    fn resolve_reference_reports_cycles_and_missing_entries() {
        let cyclic = PluralDictionary::from([
            ("a".to_string(), rule("d", &[("other", "%#@b@")])),
            ("b".to_string(), rule("d", &[("other", "%#@a@")])),
        ]);
        let error = resolve_reference("a", &cyclic, &[]).expect_err("cycle");
        assert_eq!(error.code, "STRINGS_REFERENCE_CYCLIC");
        assert!(error.message.contains("a -> b -> a"));

        let missing = resolve_reference("nope", &cyclic, &[]).expect_err("missing");
        assert_eq!(missing.code, "STRINGS_REFERENCE_MISSING");

        let no_dictionary = parse_string_params("%#@count@", None).expect_err("no dict");
        assert_eq!(no_dictionary.code, "STRINGS_REFERENCE_MISSING");
    }

    #[test]
    fn resolve_reference_rejects_bad_rules() {
        let mut unsupported = rule("d", &[]);
        unsupported.spec_type = "NSStringVariableWidthRuleType".to_string();
        let plurals = PluralDictionary::from([
            ("width".to_string(), unsupported),
            ("bad".to_string(), rule("zz", &[])),
            ("mixed".to_string(), rule("d", &[("one", "%@"), ("other", "%d")])),
        ]);
        assert_eq!(
            resolve_reference("width", &plurals, &[]).expect_err("unsupported").code,
            "STRINGS_REFERENCE_UNSUPPORTED"
        );
        assert_eq!(
            resolve_reference("bad", &plurals, &[]).expect_err("value type").code,
            "STRINGS_REFERENCE_VALUE_TYPE"
        );
        assert_eq!(
            resolve_reference("mixed", &plurals, &[]).expect_err("ambiguous").code,
            "STRINGS_REFERENCE_AMBIGUOUS"
        );
    }
}
