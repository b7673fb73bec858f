use std::process::Command;

use rsym_core::SymbolNode;
use rsym_testkit::{config_path, resources_dir};

#[test]
fn generate_app_fixture_prints_tree_and_warnings() {
    let bin = env!("CARGO_BIN_EXE_rsym");
    let output = Command::new(bin)
        .arg("generate")
        .arg("--resources")
        .arg(resources_dir("app"))
        .arg("--config")
        .arg(config_path("app"))
        .output()
        .expect("cli should execute");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "generate failed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );

    let root: SymbolNode = serde_json::from_str(&stdout).expect("stdout should be a symbol tree");
    assert_eq!(root.name, "R");
    assert!(root.child("data").is_none(), "data is excluded by config");

    let table = root
        .descendant("string.localizable")
        .expect("localizable table");
    assert_eq!(table.leaves_named("greeting").count(), 2);
    assert_eq!(table.leaves_named("itemsCount").count(), 2);
    assert_eq!(table.leaves_named("settingsTitle").count(), 0);

    let cell = root.descendant("nib.profileCell").expect("profile cell");
    assert!(cell.validatable);
    assert!(root.descendant("image.icons").is_some());
    assert!(root
        .descendant("info.uiApplicationShortcutItems.comDemoSearch")
        .is_some());
    assert!(root.validatable);

    let warnings = stderr
        .lines()
        .filter(|line| line.starts_with("warning: "))
        .collect::<Vec<_>>();
    assert!(
        warnings.iter().any(|line| line.contains("'settingsTitle'")),
        "{}",
        stderr
    );
    assert!(
        warnings.iter().any(|line| line.contains("API_HOST")),
        "{}",
        stderr
    );
}

#[test]
fn generate_is_deterministic() {
    let bin = env!("CARGO_BIN_EXE_rsym");
    let run = || {
        Command::new(bin)
            .arg("generate")
            .arg("--resources")
            .arg(resources_dir("app"))
            .arg("--format")
            .arg("outline")
            .output()
            .expect("cli should execute")
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.stderr, second.stderr);
}

#[test]
fn broken_bundle_exits_with_error_code() {
    let bin = env!("CARGO_BIN_EXE_rsym");
    let output = Command::new(bin)
        .arg("generate")
        .arg("--resources")
        .arg(resources_dir("broken"))
        .output()
        .expect("cli should execute");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[CLI_RESOURCES_INVALID]: bad.json"), "{}", stderr);
}
