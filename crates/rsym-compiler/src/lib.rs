pub mod aggregate;
pub mod builders;
pub mod format;
pub mod locale_unify;
pub mod pipeline;
pub mod sanitize;

pub use aggregate::{aggregate, propagate_validation};
pub use builders::{BuildContext, SymbolBuilder};
pub use format::{parse_string_params, FormatSpecifier, StringParam};
pub use locale_unify::{unify_templates, unify_variants, UnifyResult};
pub use pipeline::{compile_resources, compile_resources_with_sink, CompileOutput};
pub use sanitize::{sanitize_identifier, GroupingResult, Sanitizer, Unique};
