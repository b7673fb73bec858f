pub mod diagnostic;
pub mod error;
pub mod locale;
pub mod options;
pub mod records;
pub mod symbol;

pub use diagnostic::{Diagnostic, Diagnostics};
pub use error::ResourceError;
pub use locale::LocaleTag;
pub use options::{GeneratorOptions, ResourceKind};
pub use records::*;
pub use symbol::*;
