use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafParam {
    pub label: Option<String>,
    pub name: String,
    pub type_name: String,
}

impl LeafParam {
    pub fn unlabeled(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            label: None,
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn labeled(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: Some(name.clone()),
            name,
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LeafShape {
    Constant,
    Function { params: Vec<LeafParam> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolLeaf {
    pub name: String,
    pub shape: LeafShape,
    pub type_name: String,
    pub binding: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
}

impl SymbolLeaf {
    pub fn constant(
        name: impl Into<String>,
        type_name: impl Into<String>,
        binding: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shape: LeafShape::Constant,
            type_name: type_name.into(),
            binding: binding.into(),
            doc: Vec::new(),
        }
    }

    pub fn function(
        name: impl Into<String>,
        params: Vec<LeafParam>,
        type_name: impl Into<String>,
        binding: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shape: LeafShape::Function { params },
            type_name: type_name.into(),
            binding: binding.into(),
            doc: Vec::new(),
        }
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    pub fn is_function(&self) -> bool {
        matches!(self.shape, LeafShape::Function { .. })
    }

    pub fn params(&self) -> &[LeafParam] {
        match &self.shape {
            LeafShape::Constant => &[],
            LeafShape::Function { params } => params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationStep {
    Check { expression: String },
    InvokeChild { child: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLeaf {
    pub steps: Vec<ValidationStep>,
}

impl ValidationLeaf {
    pub fn from_checks(checks: Vec<String>) -> Self {
        Self {
            steps: checks
                .into_iter()
                .map(|expression| ValidationStep::Check { expression })
                .collect(),
        }
    }

    pub fn checks(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            ValidationStep::Check { expression } => Some(expression.as_str()),
            ValidationStep::InvokeChild { .. } => None,
        })
    }

    pub fn invoked_children(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            ValidationStep::InvokeChild { child } => Some(child.as_str()),
            ValidationStep::Check { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaves: Vec<SymbolLeaf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SymbolNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationLeaf>,
    #[serde(default)]
    pub validatable: bool,
}

impl SymbolNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            leaves: Vec::new(),
            children: Vec::new(),
            validation: None,
            validatable: false,
        }
    }

    pub fn set_checks(&mut self, checks: Vec<String>) {
        if checks.is_empty() {
            return;
        }
        self.validation = Some(ValidationLeaf::from_checks(checks));
        self.validatable = true;
    }

    pub fn child(&self, name: &str) -> Option<&SymbolNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn leaf(&self, name: &str) -> Option<&SymbolLeaf> {
        self.leaves.iter().find(|leaf| leaf.name == name)
    }

    pub fn leaves_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SymbolLeaf> + 'a {
        self.leaves.iter().filter(move |leaf| leaf.name == name)
    }

    pub fn descendant(&self, path: &str) -> Option<&SymbolNode> {
        path.split('.')
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.children.is_empty() && self.validation.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
            + self
                .children
                .iter()
                .map(SymbolNode::leaf_count)
                .sum::<usize>()
    }
}
