use std::collections::{BTreeMap, BTreeSet};

use rsym_core::{Diagnostics, SymbolLeaf, SymbolNode, TypedIdentifier};

use crate::builders::{quote, BuildContext, SymbolBuilder};
use crate::locale_unify::UnifyResult;

pub struct ReuseIdentifierBuilder<'a> {
    templates: &'a [UnifyResult],
}

impl<'a> ReuseIdentifierBuilder<'a> {
    pub fn new(templates: &'a [UnifyResult]) -> Self {
        Self { templates }
    }

    fn distinct_tokens(&self, diagnostics: &mut Diagnostics) -> Vec<TypedIdentifier> {
        let mut by_identifier: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for template in self.templates {
            for token in &template.merged.reuse_tokens {
                by_identifier
                    .entry(token.identifier.as_str())
                    .or_default()
                    .insert(token.type_name.as_str());
            }
        }

        let mut tokens = Vec::new();
        for (identifier, types) in by_identifier {
            if types.len() > 1 {
                diagnostics.warn(
                    "REUSE_IDENTIFIER_CONFLICT",
                    format!(
                        "Skipping reuse identifier '{}' because it is used with different types: {}",
                        identifier,
                        types.into_iter().collect::<Vec<_>>().join(", ")
                    ),
                );
                continue;
            }
            if let Some(type_name) = types.into_iter().next() {
                tokens.push(TypedIdentifier::new(identifier, type_name));
            }
        }
        tokens
    }
}

impl SymbolBuilder for ReuseIdentifierBuilder<'_> {
    fn namespace(&self) -> &str {
        "reuseIdentifier"
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let mut node = SymbolNode::new(self.namespace());
        let tokens = self.distinct_tokens(diagnostics);
        let grouped = context
            .sanitizer
            .group(tokens, |token| token.identifier.clone());
        grouped.report("reuse identifiers", "reuseIdentifier", diagnostics);

        for unique in grouped.uniques {
            let token = unique.item;
            let type_name = format!("ReuseIdentifier<{}>", token.type_name);
            node.leaves.push(SymbolLeaf::constant(
                &unique.identifier,
                type_name.clone(),
                format!("{}(identifier: {})", type_name, quote(&token.identifier)),
            ));
        }
        node
    }
}
