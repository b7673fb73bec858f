use std::fs;
use std::path::{Path, PathBuf};

use rsym_core::{ResourceError, ResourceInput};
use tracing::debug;
use walkdir::WalkDir;

use crate::{map_cli_resources_invalid, map_cli_resources_path, map_cli_resources_read};

pub(crate) fn load_resource_bundle(resources_dir: &str) -> Result<ResourceInput, ResourceError> {
    let resources_root = resolve_resources_dir(resources_dir)?;
    read_resource_bundle(&resources_root)
}

pub(crate) fn resolve_resources_dir(resources_dir: &str) -> Result<PathBuf, ResourceError> {
    let path = PathBuf::from(resources_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_resources_path)?
            .join(path)
    };

    if !absolute.is_dir() {
        return Err(ResourceError::new(
            "CLI_RESOURCES_NOT_FOUND",
            format!("resources directory does not exist: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn read_resource_bundle(resources_dir: &Path) -> Result<ResourceInput, ResourceError> {
    let mut input = ResourceInput::default();
    let mut bundles = 0usize;

    for entry in WalkDir::new(resources_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(map_cli_resources_read)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|extension| extension.to_str()) != Some("json") {
            continue;
        }

        let relative = path
            .strip_prefix(resources_dir)
            .map_err(map_cli_resources_read)?
            .to_string_lossy()
            .replace('\\', "/");
        let raw = fs::read_to_string(path).map_err(map_cli_resources_read)?;
        let bundle = serde_json::from_str::<ResourceInput>(&raw).map_err(|error| {
            let mut error = map_cli_resources_invalid(error);
            error.message = format!("{}: {}", relative, error.message);
            error
        })?;
        debug!(bundle = %relative, "loaded resource bundle");
        input.extend(bundle);
        bundles += 1;
    }

    if bundles == 0 {
        return Err(ResourceError::new(
            "CLI_RESOURCES_NOT_FOUND",
            format!("No .json resource bundles under {}", resources_dir.display()),
        ));
    }

    Ok(input)
}
