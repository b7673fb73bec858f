use super::*;

use rsym_core::SymbolNode;
use rsym_testkit::{config_path, load_resources, resources_dir};

fn temp_output(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("rsym-cli-{}-{}", std::process::id(), name))
}

#[test]
fn generate_writes_json_tree_for_app_fixture() {
    let out = temp_output("app.json");
    let code = run_cli_from_args([
        "rsym",
        "generate",
        "--resources",
        resources_dir("app").to_str().expect("utf8 path"),
        "--config",
        config_path("app").to_str().expect("utf8 path"),
        "--out",
        out.to_str().expect("utf8 path"),
    ]);
    assert_eq!(code, 0);

    let raw = fs::read_to_string(&out).expect("output should exist");
    let root: SymbolNode = serde_json::from_str(&raw).expect("output should be a symbol tree");
    assert_eq!(root.name, "R");
    assert!(root.descendant("string.localizable").is_some());
    assert!(root.validatable);
    let _ = fs::remove_file(out);
}

#[test]
fn generate_renders_outline() {
    let out = temp_output("app.txt");
    let code = run_cli_from_args([
        "rsym",
        "generate",
        "--resources",
        resources_dir("app").to_str().expect("utf8 path"),
        "--format",
        "outline",
        "--out",
        out.to_str().expect("utf8 path"),
    ]);
    assert_eq!(code, 0);

    let outline = fs::read_to_string(&out).expect("output should exist");
    assert!(outline.starts_with("R"));
    assert!(outline.contains("\n  string\n"));
    let _ = fs::remove_file(out);
}

#[test]
fn missing_resources_directory_is_an_error() {
    let error = resolve_resources_dir("/definitely/not/here").expect_err("missing dir");
    assert_eq!(error.code, "CLI_RESOURCES_NOT_FOUND");
    let code = run_cli_from_args(["rsym", "generate", "--resources", "/definitely/not/here"]);
    assert_eq!(code, 1);
}

#[test]
fn invalid_bundle_reports_relative_path() {
    let error = read_resource_bundle(&resources_dir("broken")).expect_err("invalid json");
    assert_eq!(error.code, "CLI_RESOURCES_INVALID");
    assert!(error.message.starts_with("bad.json: "), "{}", error.message);
}

#[test]
fn bundles_are_merged_in_file_name_order() {
    let input = read_resource_bundle(&resources_dir("app")).expect("app fixture");
    assert!(!input.strings.is_empty());
    assert!(!input.templates.is_empty());
    assert!(!input.assets.is_empty());
    assert_eq!(input.property_lists.len(), 2);
    assert_eq!(input, load_resources("app"));
}

#[test]
fn missing_config_file_is_an_error() {
    let error = load_options(Some("/definitely/not/here.json")).expect_err("missing config");
    assert_eq!(error.code, "CLI_CONFIG_READ");
    let options = load_options(Some(config_path("app").to_str().expect("utf8 path")))
        .expect("app config");
    assert_eq!(options.development_locale.as_deref(), Some("en"));
}

#[test]
fn unknown_arguments_use_clap_exit_code() {
    let code = run_cli_from_args(["rsym", "generate", "--bogus"]);
    assert_eq!(code, 2);
}
