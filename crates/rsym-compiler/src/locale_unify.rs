use std::collections::{BTreeMap, BTreeSet};

use rsym_core::{LocaleTag, TemplateKind, TemplateRecord, TypedIdentifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifyResult {
    pub merged: TemplateRecord,
    pub locales: Vec<LocaleTag>,
    pub root_types_differ: bool,
    pub divergent_reuse_tokens: BTreeSet<String>,
    pub divergent_nested_elements: BTreeSet<String>,
    pub deployment_differs: bool,
}

impl UnifyResult {
    fn from_first(first: &TemplateRecord) -> Self {
        let mut merged = first.clone();
        merged.locale = LocaleTag::None;
        merged.used_images = sorted_unique(&first.used_images);
        merged.used_colors = sorted_unique(&first.used_colors);
        Self {
            merged,
            locales: vec![first.locale.clone()],
            root_types_differ: false,
            divergent_reuse_tokens: BTreeSet::new(),
            divergent_nested_elements: BTreeSet::new(),
            deployment_differs: false,
        }
    }

    pub fn is_divergent(&self) -> bool {
        self.root_types_differ
            || self.deployment_differs
            || !self.divergent_reuse_tokens.is_empty()
            || !self.divergent_nested_elements.is_empty()
    }

    pub fn stable_nested_elements(&self) -> impl Iterator<Item = &TypedIdentifier> {
        self.merged
            .nested_elements
            .iter()
            .filter(|element| !self.divergent_nested_elements.contains(&element.identifier))
    }

    fn absorb(mut self, other: &TemplateRecord) -> Self {
        self.locales.push(other.locale.clone());

        self.merged.used_images = union(&self.merged.used_images, &other.used_images);
        self.merged.used_colors = union(&self.merged.used_colors, &other.used_colors);

        let (kept, dropped) = intersect_tokens(&self.merged.reuse_tokens, &other.reuse_tokens);
        self.merged.reuse_tokens = kept;
        self.divergent_reuse_tokens.extend(dropped);

        self.divergent_nested_elements.extend(diverging_identifiers(
            &self.merged.nested_elements,
            &other.nested_elements,
        ));

        if self.merged.root_types != other.root_types {
            self.root_types_differ = true;
        }
        if self.merged.deployment_target != other.deployment_target {
            self.deployment_differs = true;
        }
        self
    }
}

pub fn unify_variants(variants: &[TemplateRecord]) -> Option<UnifyResult> {
    let (first, rest) = variants.split_first()?;
    Some(
        rest.iter()
            .fold(UnifyResult::from_first(first), UnifyResult::absorb),
    )
}

pub fn unify_templates(records: &[TemplateRecord]) -> Vec<UnifyResult> {
    let mut variants: BTreeMap<(TemplateKind, &str), Vec<TemplateRecord>> = BTreeMap::new();
    for record in records {
        variants
            .entry((record.kind, record.name.as_str()))
            .or_default()
            .push(record.clone());
    }

    variants
        .into_values()
        .filter_map(|mut group| {
            group.sort_by(|left, right| left.locale.cmp(&right.locale));
            unify_variants(&group)
        })
        .collect()
}

fn sorted_unique(values: &[String]) -> Vec<String> {
    values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn union(left: &[String], right: &[String]) -> Vec<String> {
    left.iter()
        .chain(right.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn intersect_tokens(
    current: &[TypedIdentifier],
    other: &[TypedIdentifier],
) -> (Vec<TypedIdentifier>, BTreeSet<String>) {
    let mut kept = Vec::new();
    let mut dropped = BTreeSet::new();
    for token in current {
        if other.contains(token) {
            kept.push(token.clone());
        } else {
            dropped.insert(token.identifier.clone());
        }
    }
    for token in other {
        if !current.contains(token) {
            dropped.insert(token.identifier.clone());
        }
    }
    (kept, dropped)
}

fn diverging_identifiers(first: &[TypedIdentifier], other: &[TypedIdentifier]) -> BTreeSet<String> {
    first
        .iter()
        .filter(|element| !other.contains(element))
        .chain(other.iter().filter(|element| !first.contains(element)))
        .map(|element| element.identifier.clone())
        .collect()
}
