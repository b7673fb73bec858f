use std::fs;

use rsym_core::{GeneratorOptions, ResourceError};

use crate::{map_cli_config_invalid, map_cli_config_read};

pub(crate) fn load_options(config: Option<&str>) -> Result<GeneratorOptions, ResourceError> {
    let Some(path) = config else {
        return Ok(GeneratorOptions::default());
    };
    let raw = fs::read_to_string(path).map_err(map_cli_config_read)?;
    serde_json::from_str(&raw).map_err(map_cli_config_invalid)
}
