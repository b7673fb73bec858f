use std::fs;
use std::path::PathBuf;

use rsym_core::ResourceInput;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures")
}

pub fn fixture_dir(name: &str) -> PathBuf {
    fixtures_root().join(name)
}

pub fn resources_dir(name: &str) -> PathBuf {
    fixture_dir(name).join("resources")
}

pub fn config_path(name: &str) -> PathBuf {
    fixture_dir(name).join("config.json")
}

pub fn load_resources(name: &str) -> ResourceInput {
    let mut paths = fs::read_dir(resources_dir(name))
        .expect("fixture resources directory must exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "json"))
        .collect::<Vec<_>>();
    paths.sort();

    let mut input = ResourceInput::default();
    for path in paths {
        let raw = fs::read_to_string(&path).expect("fixture bundle must be readable");
        let bundle = serde_json::from_str::<ResourceInput>(&raw)
            .unwrap_or_else(|error| panic!("fixture bundle {} is invalid: {}", path.display(), error));
        input.extend(bundle);
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn fixtures_root_points_to_fixtures_directory() {
        assert!(fixtures_root().is_dir());
    }

    #[test]
    fn fixture_paths_join_default_names() {
        assert!(resources_dir("app").is_dir());
        assert!(config_path("app").ends_with("config.json"));
    }

    #[test]
    fn load_resources_merges_every_bundle() {
        let input = load_resources("app");
        assert!(!input.strings.is_empty());
        assert!(!input.fonts.is_empty());
    }
}
