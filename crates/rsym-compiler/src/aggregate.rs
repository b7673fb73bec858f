use rsym_core::{Diagnostics, SymbolNode, ValidationLeaf, ValidationStep};

use crate::sanitize::Sanitizer;

pub fn aggregate(
    root_name: &str,
    subtrees: Vec<SymbolNode>,
    diagnostics: &mut Diagnostics,
) -> SymbolNode {
    let mut root = SymbolNode::new(root_name);
    let grouped = Sanitizer::default().group(subtrees, |node| node.name.clone());
    grouped.report("namespaces", root_name, diagnostics);
    for unique in grouped.uniques {
        let mut node = unique.item;
        node.name = unique.identifier;
        root.children.push(node);
    }
    root
}

/// Post-order fold marking every node with a validatable descendant.
///
/// A node with its own checks keeps them and appends calls into its
/// validatable children; a node validatable only through children gets a
/// synthesized leaf of those calls in child order.
pub fn propagate_validation(node: SymbolNode) -> SymbolNode {
    fold_validation(node).0
}

fn fold_validation(node: SymbolNode) -> (SymbolNode, bool) {
    let SymbolNode {
        name,
        leaves,
        children,
        validation,
        validatable,
    } = node;

    let mut folded = Vec::with_capacity(children.len());
    let mut invoked = Vec::new();
    for child in children {
        let (child, child_validatable) = fold_validation(child);
        if child_validatable {
            invoked.push(ValidationStep::InvokeChild {
                child: child.name.clone(),
            });
        }
        folded.push(child);
    }

    let validation = match (validation, invoked.is_empty()) {
        (validation, true) => validation,
        (Some(mut own_leaf), false) => {
            for step in invoked {
                if !own_leaf.steps.contains(&step) {
                    own_leaf.steps.push(step);
                }
            }
            Some(own_leaf)
        }
        (None, false) => Some(ValidationLeaf { steps: invoked }),
    };
    let validatable = validatable || validation.is_some();

    (
        SymbolNode {
            name,
            leaves,
            children: folded,
            validation,
            validatable,
        },
        validatable,
    )
}
