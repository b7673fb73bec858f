use rsym_core::{SymbolLeaf, SymbolNode};

pub(crate) fn render_outline(root: &SymbolNode) -> String {
    let mut out = String::new();
    write_node(root, 0, &mut out);
    out
}

fn write_node(node: &SymbolNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str(&node.name);
    if node.validatable {
        out.push_str(" [validatable]");
    }
    out.push('\n');

    for leaf in &node.leaves {
        out.push_str(&indent);
        out.push_str("  ");
        out.push_str(&render_leaf(leaf));
        out.push('\n');
    }
    if let Some(validation) = &node.validation {
        let children = validation.invoked_children().collect::<Vec<_>>();
        out.push_str(&format!(
            "{}  validate() checks: {}",
            indent,
            validation.checks().count()
        ));
        if !children.is_empty() {
            out.push_str(&format!(", children: {}", children.join(", ")));
        }
        out.push('\n');
    }
    for child in &node.children {
        write_node(child, depth + 1, out);
    }
}

fn render_leaf(leaf: &SymbolLeaf) -> String {
    if !leaf.is_function() {
        return format!("{}: {}", leaf.name, leaf.type_name);
    }
    let params = leaf
        .params()
        .iter()
        .map(|param| match &param.label {
            Some(label) if *label == param.name => format!("{}: {}", param.name, param.type_name),
            Some(label) => format!("{} {}: {}", label, param.name, param.type_name),
            None => format!("_ {}: {}", param.name, param.type_name),
        })
        .collect::<Vec<_>>();
    format!("{}({}) -> {}", leaf.name, params.join(", "), leaf.type_name)
}
