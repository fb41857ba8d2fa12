use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stray"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "stray init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".stray.toml");
    assert!(config_path.exists(), ".stray.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[audit]"));
    assert!(content.contains("[history]"));

    // Verify it's valid TOML that stray-core can parse
    let config: stray_core::StrayConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.audit.manifest, "CODEOWNERS");
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".stray.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stray"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
