use assert_cmd::Command;
use tempfile::TempDir;

fn wander(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("palette-wander").unwrap();
    cmd.env("WANDER_STORE_PATH", store.path().join("store.json"))
        .arg("--config")
        .arg(store.path().join("missing.yaml"))
        .arg("--log-level")
        .arg("warn");
    cmd
}

#[test]
fn palettes_lists_the_catalog_as_json() {
    let store = TempDir::new().unwrap();
    let output = wander(&store)
        .args(["--output", "json", "palettes"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0]["name"], "Tropical");
}

#[test]
fn css_renders_the_named_palette() {
    let store = TempDir::new().unwrap();
    let output = wander(&store).args(["css", "Neon"]).output().unwrap();
    assert!(output.status.success());
    let css = String::from_utf8(output.stdout).unwrap();
    assert!(css.contains("!important"));
}

#[test]
fn css_rejects_unknown_palettes() {
    let store = TempDir::new().unwrap();
    wander(&store).args(["css", "Plaid"]).assert().failure();
}

#[test]
fn settings_round_trip_through_the_store() {
    let store = TempDir::new().unwrap();
    wander(&store)
        .args(["settings", "set-palette", "4"])
        .assert()
        .success();
    wander(&store)
        .args(["settings", "apply-to-page", "true"])
        .assert()
        .success();

    let output = wander(&store)
        .args(["--output", "json", "settings", "show"])
        .output()
        .unwrap();
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["colorWidgetState"]["index"], 4);
    assert_eq!(view["colorWidgetState"]["applyToPage"], true);
    assert_eq!(view["palette"], "Ocean");

    wander(&store).args(["settings", "set-palette", "42"]).assert().failure();
}

#[test]
fn ledger_starts_empty_and_clears() {
    let store = TempDir::new().unwrap();
    let output = wander(&store)
        .args(["--output", "json", "ledger", "list"])
        .output()
        .unwrap();
    let sites: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(sites.is_empty());

    wander(&store).args(["ledger", "clear"]).assert().success();
}
