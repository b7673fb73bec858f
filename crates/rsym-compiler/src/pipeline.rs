use std::collections::BTreeMap;

use rsym_core::{
    Diagnostic, Diagnostics, GeneratorOptions, PropertyListRecord, ResourceInput, ResourceKind,
    SymbolNode,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::aggregate::{aggregate, propagate_validation};
use crate::builders::{
    BuildContext, FileBuilder, FontBuilder, MediaBuilder, NibBuilder, PropertyListBuilder,
    ReuseIdentifierBuilder, StoryboardBuilder, StringsBuilder, SymbolBuilder,
};
use crate::locale_unify::unify_templates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileOutput {
    pub root: SymbolNode,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn compile_resources(input: &ResourceInput, options: &GeneratorOptions) -> CompileOutput {
    let mut diagnostics = Vec::new();
    let root = compile_resources_with_sink(input, options, |diagnostic| {
        diagnostics.push(diagnostic.clone())
    });
    CompileOutput { root, diagnostics }
}

/// Compiles `input` and hands every diagnostic to `sink` in deterministic order:
/// builder diagnostics in builder order, then aggregation diagnostics.
#[instrument(skip_all, fields(root = %options.root_name))]
pub fn compile_resources_with_sink<F>(
    input: &ResourceInput,
    options: &GeneratorOptions,
    mut sink: F,
) -> SymbolNode
where
    F: FnMut(&Diagnostic),
{
    let context = BuildContext::new(options);
    let templates = unify_templates(&input.templates);
    let mut property_lists: BTreeMap<&str, Vec<&PropertyListRecord>> = BTreeMap::new();
    for record in &input.property_lists {
        property_lists
            .entry(record.name.as_str())
            .or_default()
            .push(record);
    }

    let mut candidates: Vec<(ResourceKind, Box<dyn SymbolBuilder + '_>)> = Vec::new();
    candidates.push((ResourceKind::Strings, Box::new(StringsBuilder::new(&input.strings))));
    candidates.push((ResourceKind::Nibs, Box::new(NibBuilder::new(&templates))));
    candidates.push((ResourceKind::Storyboards, Box::new(StoryboardBuilder::new(&templates))));
    candidates.push((
        ResourceKind::Images,
        Box::new(MediaBuilder::images(&input.assets, &input.image_files)),
    ));
    candidates.push((ResourceKind::Colors, Box::new(MediaBuilder::colors(&input.assets))));
    candidates.push((ResourceKind::Data, Box::new(MediaBuilder::data(&input.assets))));
    candidates.push((ResourceKind::Fonts, Box::new(FontBuilder::new(&input.fonts))));
    candidates.push((ResourceKind::Files, Box::new(FileBuilder::new(&input.files))));
    candidates.push((
        ResourceKind::ReuseIdentifiers,
        Box::new(ReuseIdentifierBuilder::new(&templates)),
    ));
    for (name, records) in property_lists {
        candidates.push((
            ResourceKind::PropertyLists,
            Box::new(PropertyListBuilder::new(name, records)),
        ));
    }

    let builders = candidates
        .into_iter()
        .filter_map(|(kind, builder)| {
            if options.is_enabled(kind) {
                Some(builder)
            } else {
                debug!(kind = %kind, namespace = builder.namespace(), "resource kind excluded");
                None
            }
        })
        .collect::<Vec<_>>();

    let mut diagnostics = Diagnostics::new();
    let mut subtrees = Vec::with_capacity(builders.len());
    for builder in &builders {
        let mut local = Diagnostics::new();
        let node = builder.build(&context, &mut local);
        debug!(
            namespace = builder.namespace(),
            leaves = node.leaf_count(),
            diagnostics = local.len(),
            "namespace built"
        );
        subtrees.push(node);
        diagnostics.append(local);
    }

    let root = propagate_validation(aggregate(&options.root_name, subtrees, &mut diagnostics));
    for diagnostic in diagnostics.into_vec() {
        sink(&diagnostic);
    }
    root
}
