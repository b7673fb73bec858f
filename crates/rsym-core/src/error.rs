use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ResourceError {
    pub code: String,
    pub message: String,
}

impl ResourceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_joins_code_and_message() {
        let error = ResourceError::new("STRINGS_REFERENCE_MISSING", "Reference \"count\" missing.");
        assert_eq!(
            error.to_string(),
            "STRINGS_REFERENCE_MISSING: Reference \"count\" missing."
        );
    }
}
