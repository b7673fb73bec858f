use rsym_core::ResourceError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> ResourceError {
    ResourceError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: ResourceError) -> i32 {
    eprintln!("error[{}]: {}", error.code, error.message);
    1
}

pub(crate) fn map_cli_resources_path(error: std::io::Error) -> ResourceError {
    map_error("CLI_RESOURCES_NOT_FOUND", error)
}

pub(crate) fn map_cli_resources_read(error: impl Display) -> ResourceError {
    map_error("CLI_RESOURCES_READ", error)
}

pub(crate) fn map_cli_resources_invalid(error: serde_json::Error) -> ResourceError {
    map_error("CLI_RESOURCES_INVALID", error)
}

pub(crate) fn map_cli_config_read(error: std::io::Error) -> ResourceError {
    map_error("CLI_CONFIG_READ", error)
}

pub(crate) fn map_cli_config_invalid(error: serde_json::Error) -> ResourceError {
    map_error("CLI_CONFIG_INVALID", error)
}

pub(crate) fn map_cli_output_write(error: impl Display) -> ResourceError {
    map_error("CLI_OUTPUT_WRITE", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(ResourceError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_resources_path(std::io::Error::other("path")).code,
            "CLI_RESOURCES_NOT_FOUND"
        );
        assert_eq!(
            map_cli_resources_read(std::io::Error::other("read")).code,
            "CLI_RESOURCES_READ"
        );
        assert_eq!(
            map_cli_config_read(std::io::Error::other("read")).code,
            "CLI_CONFIG_READ"
        );
        assert_eq!(
            map_cli_output_write(std::io::Error::other("write")).code,
            "CLI_OUTPUT_WRITE"
        );

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_resources_invalid(invalid).code, "CLI_RESOURCES_INVALID");
        let invalid = serde_json::from_str::<serde_json::Value>("[").expect_err("invalid json");
        assert_eq!(map_cli_config_invalid(invalid).code, "CLI_CONFIG_INVALID");
    }
}
