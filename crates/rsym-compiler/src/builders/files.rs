use rsym_core::{Diagnostics, FileRecord, SymbolLeaf, SymbolNode};

use crate::builders::{quote, BuildContext, SymbolBuilder};

pub struct FileBuilder<'a> {
    files: &'a [FileRecord],
}

impl<'a> FileBuilder<'a> {
    pub fn new(files: &'a [FileRecord]) -> Self {
        Self { files }
    }
}

impl SymbolBuilder for FileBuilder<'_> {
    fn namespace(&self) -> &str {
        "file"
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let mut node = SymbolNode::new(self.namespace());
        let grouped = context
            .sanitizer
            .group(self.files, |file| file.file_name().to_string());
        grouped.report("files", "file", diagnostics);

        for unique in grouped.uniques {
            let (stem, extension) = split_extension(unique.item.file_name());
            node.leaves.push(
                SymbolLeaf::constant(
                    &unique.identifier,
                    "FileResource",
                    format!(
                        "FileResource(bundle: {}, name: {}, pathExtension: {})",
                        context.bundle(),
                        quote(stem),
                        quote(extension)
                    ),
                )
                .with_doc(format!("Path: {}", unique.item.path)),
            );
            node.leaves.push(SymbolLeaf::function(
                &unique.identifier,
                Vec::new(),
                "URL?",
                format!(
                    "{}.url(forResource: {}, withExtension: {})",
                    context.bundle(),
                    quote(stem),
                    quote(extension)
                ),
            ));
        }
        node
    }
}

/// Splits at the last dot; dotfiles such as `.env` keep their whole name as the stem.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) if index > 0 => (&file_name[..index], &file_name[index + 1..]),
        _ => (file_name, ""),
    }
}
