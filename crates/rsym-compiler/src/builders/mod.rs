use rsym_core::{Diagnostics, GeneratorOptions, SymbolNode};

use crate::sanitize::Sanitizer;

mod files;
mod fonts;
mod media;
mod plist;
mod reuse;
mod strings;
mod templates;

pub use files::FileBuilder;
pub use fonts::FontBuilder;
pub use media::MediaBuilder;
pub use plist::PropertyListBuilder;
pub use reuse::ReuseIdentifierBuilder;
pub use strings::StringsBuilder;
pub use templates::{NibBuilder, StoryboardBuilder};

#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub options: &'a GeneratorOptions,
    pub sanitizer: Sanitizer,
}

impl<'a> BuildContext<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self {
            options,
            sanitizer: Sanitizer::default(),
        }
    }

    pub fn bundle(&self) -> &str {
        &self.options.bundle_expression
    }
}

pub trait SymbolBuilder {
    fn namespace(&self) -> &str;

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode;
}

pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

pub(crate) fn quote_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let quoted = values.into_iter().map(quote).collect::<Vec<_>>();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod builders_tests {
    use super::*;

    #[test]
    fn quote_escapes_control_characters() {
        assert_eq!(quote("Hi \"you\"\n"), "\"Hi \\\"you\\\"\\n\"");
        assert_eq!(quote("C:\\tmp"), "\"C:\\\\tmp\"");
        assert_eq!(quote_list(["a", "b"]), "[\"a\", \"b\"]");
        assert_eq!(quote_list(Vec::<&str>::new()), "[]");
    }
}
