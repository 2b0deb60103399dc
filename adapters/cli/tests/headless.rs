use std::{path::PathBuf, process::Command};

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn tile_defence() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tile-defence"))
}

#[test]
fn scripted_session_runs_to_frame_limit() {
    let dir = manifest_dir();
    let status = tile_defence()
        .arg("--config")
        .arg(dir.join("config/default.toml"))
        .arg("--level")
        .arg(dir.join("levels/level_01.toml"))
        .arg("--script")
        .arg(dir.join("scripts/opening.toml"))
        .args(["--frames", "600", "--unthrottled"])
        .status()
        .expect("failed to launch tile-defence binary");

    assert!(status.success(), "headless run should exit cleanly");
}

#[test]
fn missing_config_is_a_startup_error() {
    let output = tile_defence()
        .arg("--config")
        .arg(manifest_dir().join("config/does_not_exist.toml"))
        .args(["--frames", "1", "--unthrottled"])
        .output()
        .expect("failed to launch tile-defence binary");

    assert!(!output.status.success(), "unreadable config must fail startup");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does_not_exist.toml"),
        "error names the config path: {stderr}"
    );
}
