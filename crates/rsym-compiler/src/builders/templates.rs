use rsym_core::{Diagnostics, LeafParam, SymbolLeaf, SymbolNode, TemplateKind, TemplateRecord};
use tracing::debug;

use crate::builders::{quote, BuildContext, SymbolBuilder};
use crate::locale_unify::UnifyResult;

const ORDINALS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
    "tenth",
];

const STORYBOARD_RESERVED_LEAVES: &[&str] = &["name", "initialViewController"];

pub struct NibBuilder<'a> {
    templates: &'a [UnifyResult],
}

impl<'a> NibBuilder<'a> {
    pub fn new(templates: &'a [UnifyResult]) -> Self {
        Self { templates }
    }
}

impl SymbolBuilder for NibBuilder<'_> {
    fn namespace(&self) -> &str {
        "nib"
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let mut namespace = SymbolNode::new(self.namespace());
        let nibs = self
            .templates
            .iter()
            .filter(|template| template.merged.kind == TemplateKind::Nib);
        let grouped = context.sanitizer.group(nibs, |nib| nib.merged.name.clone());
        grouped.report("nibs", "nib", diagnostics);

        for unique in grouped.uniques {
            let node = build_nib(&unique.identifier, unique.item, context, diagnostics);
            debug!(nib = %unique.raw_key, validatable = node.validatable, "built nib");
            namespace.children.push(node);
        }
        namespace
    }
}

pub struct StoryboardBuilder<'a> {
    templates: &'a [UnifyResult],
}

impl<'a> StoryboardBuilder<'a> {
    pub fn new(templates: &'a [UnifyResult]) -> Self {
        Self { templates }
    }
}

impl SymbolBuilder for StoryboardBuilder<'_> {
    fn namespace(&self) -> &str {
        "storyboard"
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let mut namespace = SymbolNode::new(self.namespace());
        let storyboards = self
            .templates
            .iter()
            .filter(|template| template.merged.kind == TemplateKind::Storyboard);
        let grouped = context
            .sanitizer
            .group(storyboards, |storyboard| storyboard.merged.name.clone());
        grouped.report("storyboards", "storyboard", diagnostics);

        for unique in grouped.uniques {
            let node = build_storyboard(&unique.identifier, unique.item, context, diagnostics);
            debug!(storyboard = %unique.raw_key, validatable = node.validatable, "built storyboard");
            namespace.children.push(node);
        }
        namespace
    }
}

fn build_nib(
    identifier: &str,
    template: &UnifyResult,
    context: &BuildContext<'_>,
    diagnostics: &mut Diagnostics,
) -> SymbolNode {
    let nib = &template.merged;
    let mut node = SymbolNode::new(identifier);
    report_divergence(template, diagnostics);

    node.leaves
        .push(SymbolLeaf::constant("name", "String", quote(&nib.name)));
    node.leaves.push(SymbolLeaf::function(
        "instantiate",
        vec![LeafParam::labeled("owner", "Any?")],
        "[Any]",
        format!(
            "UINib(nibName: {}, bundle: {}).instantiate(withOwner: owner, options: nil)",
            quote(&nib.name),
            context.bundle()
        ),
    ));

    if !template.root_types_differ {
        for (index, root_type) in nib.root_types.iter().enumerate() {
            let accessor = match ORDINALS.get(index) {
                Some(ordinal) => format!("{}View", ordinal),
                None => format!("view{}", index + 1),
            };
            node.leaves.push(SymbolLeaf::function(
                accessor,
                vec![LeafParam::labeled("owner", "Any?")],
                format!("{}?", root_type),
                format!(
                    "UINib(nibName: {}, bundle: {}).instantiate(withOwner: owner, options: nil)[{}] as? {}",
                    quote(&nib.name),
                    context.bundle(),
                    index,
                    root_type
                ),
            ));
        }
    }

    if let Some(token) = nib.reuse_tokens.first() {
        node.leaves.push(SymbolLeaf::constant(
            "identifier",
            format!("ReuseIdentifier<{}>", token.type_name),
            format!(
                "ReuseIdentifier<{}>(identifier: {})",
                token.type_name,
                quote(&token.identifier)
            ),
        ));
    }

    node.set_checks(usage_checks(nib, "nib", context));
    node
}

fn build_storyboard(
    identifier: &str,
    template: &UnifyResult,
    context: &BuildContext<'_>,
    diagnostics: &mut Diagnostics,
) -> SymbolNode {
    let storyboard = &template.merged;
    let mut node = SymbolNode::new(identifier);
    report_divergence(template, diagnostics);

    let instance = format!(
        "UIStoryboard(name: {}, bundle: {})",
        quote(&storyboard.name),
        context.bundle()
    );
    node.leaves
        .push(SymbolLeaf::constant("name", "String", quote(&storyboard.name)));

    if !template.root_types_differ {
        if let Some(initial) = storyboard.root_types.first() {
            node.leaves.push(SymbolLeaf::function(
                "initialViewController",
                Vec::new(),
                format!("{}?", initial),
                format!("{}.instantiateInitialViewController() as? {}", instance, initial),
            ));
        }
    }

    let grouped = context
        .sanitizer
        .group(template.stable_nested_elements(), |element| {
            element.identifier.clone()
        });
    grouped.report(
        "view controllers",
        &format!("storyboard '{}'", storyboard.name),
        diagnostics,
    );

    let mut checks = usage_checks(storyboard, "storyboard", context);
    for unique in grouped.uniques {
        let element = unique.item;
        if STORYBOARD_RESERVED_LEAVES.contains(&unique.identifier.as_str()) {
            diagnostics.warn(
                "STORYBOARD_IDENTIFIER_RESERVED",
                format!(
                    "Skipping view controller '{}' in storyboard '{}' because '{}' is already a generated member",
                    element.identifier, storyboard.name, unique.identifier
                ),
            );
            continue;
        }
        let accessor = format!(
            "{}.instantiateViewController(withIdentifier: {}) as? {}",
            instance,
            quote(&element.identifier),
            element.type_name
        );
        checks.push(format!(
            "if {} == nil {{ throw ResourceValidationError(description: {}) }}",
            accessor,
            quote(&format!(
                "View controller with identifier '{}' could not be loaded from storyboard '{}' as '{}'.",
                element.identifier, storyboard.name, element.type_name
            ))
        ));
        node.leaves.push(SymbolLeaf::function(
            &unique.identifier,
            Vec::new(),
            format!("{}?", element.type_name),
            accessor,
        ));
    }

    node.set_checks(checks);
    node
}

fn usage_checks(template: &TemplateRecord, kind: &str, context: &BuildContext<'_>) -> Vec<String> {
    let images = template.used_images.iter().map(|image| {
        format!(
            "if UIImage(named: {}, in: {}, compatibleWith: nil) == nil {{ throw ResourceValidationError(description: {}) }}",
            quote(image),
            context.bundle(),
            quote(&format!(
                "Image named '{}' is used in {} '{}', but couldn't be loaded.",
                image, kind, template.name
            ))
        )
    });
    let colors = template.used_colors.iter().map(|color| {
        format!(
            "if UIColor(named: {}, in: {}, compatibleWith: nil) == nil {{ throw ResourceValidationError(description: {}) }}",
            quote(color),
            context.bundle(),
            quote(&format!(
                "Color named '{}' is used in {} '{}', but couldn't be loaded.",
                color, kind, template.name
            ))
        )
    });
    images.chain(colors).collect()
}

fn report_divergence(template: &UnifyResult, diagnostics: &mut Diagnostics) {
    if !template.is_divergent() {
        return;
    }
    let merged = &template.merged;
    let kind = merged.kind.as_str();
    let element = match merged.kind {
        TemplateKind::Nib => "element",
        TemplateKind::Storyboard => "view controller",
    };
    if template.root_types_differ {
        diagnostics.warn(
            "TEMPLATE_ROOT_DIVERGENT",
            format!(
                "Skipping root accessors of {} '{}' because its root types differ between locales",
                kind, merged.name
            ),
        );
    }
    for identifier in &template.divergent_nested_elements {
        diagnostics.warn(
            "TEMPLATE_ELEMENT_DIVERGENT",
            format!(
                "Skipping {} '{}' of {} '{}' because its identifier or type differs between locales",
                element, identifier, kind, merged.name
            ),
        );
    }
    for identifier in &template.divergent_reuse_tokens {
        diagnostics.warn(
            "TEMPLATE_REUSE_DIVERGENT",
            format!(
                "Skipping reuse identifier '{}' of {} '{}' because it is not present in every locale",
                identifier, kind, merged.name
            ),
        );
    }
    if template.deployment_differs {
        diagnostics.warn(
            "TEMPLATE_DEPLOYMENT_DIVERGENT",
            format!(
                "{} '{}' declares different deployment targets per locale, using the one of locale '{}'",
                kind,
                merged.name,
                template
                    .locales
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            ),
        );
    }
}
