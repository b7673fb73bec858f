use rsym_core::{Diagnostics, FontRecord, LeafParam, SymbolLeaf, SymbolNode};

use crate::builders::{quote, BuildContext, SymbolBuilder};

pub struct FontBuilder<'a> {
    fonts: &'a [FontRecord],
}

impl<'a> FontBuilder<'a> {
    pub fn new(fonts: &'a [FontRecord]) -> Self {
        Self { fonts }
    }
}

impl SymbolBuilder for FontBuilder<'_> {
    fn namespace(&self) -> &str {
        "font"
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let mut node = SymbolNode::new(self.namespace());
        let grouped = context
            .sanitizer
            .group(self.fonts, |font| font.postscript_name.clone());
        grouped.report("fonts", "font", diagnostics);

        let mut checks = Vec::new();
        for unique in grouped.uniques {
            let font_name = quote(&unique.item.postscript_name);
            node.leaves.push(
                SymbolLeaf::constant(
                    &unique.identifier,
                    "FontResource",
                    format!("FontResource(fontName: {})", font_name),
                )
                .with_doc(format!("Font file: {}", unique.item.file_name)),
            );
            node.leaves.push(SymbolLeaf::function(
                &unique.identifier,
                vec![LeafParam::labeled("size", "CGFloat")],
                "UIFont?",
                format!("UIFont(name: {}, size: size)", font_name),
            ));
            checks.push(format!(
                "if UIFont(name: {}, size: 42) == nil {{ throw ResourceValidationError(description: {}) }}",
                font_name,
                quote(&format!(
                    "Font '{}' could not be loaded, is '{}' listed under UIAppFonts in Info.plist?",
                    unique.item.postscript_name, unique.item.file_name
                ))
            ));
        }
        node.set_checks(checks);
        node
    }
}

#[cfg(test)]
mod fonts_tests {
    use super::*;
    use rsym_core::GeneratorOptions;

    fn font(file_name: &str, postscript_name: &str) -> FontRecord {
        FontRecord {
            file_name: file_name.to_string(),
            postscript_name: postscript_name.to_string(),
        }
    }

    #[test]
    fn each_font_yields_resource_function_and_check() {
        let fonts = vec![
            font("Inter-Bold.ttf", "Inter-Bold"),
            font("Inter-Regular.ttf", "Inter-Regular"),
        ];
        let options = GeneratorOptions::default();
        let mut diagnostics = Diagnostics::new();
        let node = FontBuilder::new(&fonts).build(&BuildContext::new(&options), &mut diagnostics);

        assert!(diagnostics.is_empty());
        let leaves = node.leaves_named("interBold").collect::<Vec<_>>();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].binding, "FontResource(fontName: \"Inter-Bold\")");
        assert!(leaves[1].is_function());
        assert_eq!(leaves[1].params()[0].name, "size");
        assert!(node.validatable);
        let validation = node.validation.as_ref().expect("validation");
        assert_eq!(validation.checks().count(), 2);
    }

    #[test]
    fn no_fonts_means_nothing_to_validate() {
        let options = GeneratorOptions::default();
        let mut diagnostics = Diagnostics::new();
        let node = FontBuilder::new(&[]).build(&BuildContext::new(&options), &mut diagnostics);
        assert!(node.is_empty());
        assert!(!node.validatable);
        assert!(node.validation.is_none());
    }
}
