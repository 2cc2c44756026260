use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn fontfav(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fontfav"))
        .current_dir(dir)
        .env_remove("FONTFAV_CONFIG")
        .env("USER", "ada")
        .env("HOSTNAME", "studio")
        .args(args)
        .output()
        .expect("run fontfav")
}

fn write_catalog(dir: &Path, names: &[&str]) {
    fs::write(dir.join("fonts.txt"), names.join("\n")).expect("write catalog");
}

#[test]
fn add_persists_sorted_favorites() {
    let tmp = tempdir().expect("tempdir");
    write_catalog(tmp.path(), &["Verdana", "Arial", "Calibri"]);

    let output = fontfav(
        tmp.path(),
        &["add", "--catalog-file", "fonts.txt", "Verdana", "Arial"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config = fs::read_to_string(tmp.path().join("config.ini")).expect("config written");
    assert!(config.contains("[Favorites]\nfonts = Arial,Verdana\n"));
    assert!(config.contains("window_size = 800,600\n"));
}

#[test]
fn adding_an_uninstalled_font_fails_but_keeps_the_rest() {
    let tmp = tempdir().expect("tempdir");
    write_catalog(tmp.path(), &["Arial"]);

    let output = fontfav(
        tmp.path(),
        &["add", "--catalog-file", "fonts.txt", "Arial", "Papyrus"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Papyrus is not installed"), "stderr: {stderr}");

    let config = fs::read_to_string(tmp.path().join("config.ini")).expect("config written");
    assert!(config.contains("fonts = Arial\n"));
}

#[test]
fn favorites_drop_stale_entries_with_a_warning() {
    let tmp = tempdir().expect("tempdir");
    write_catalog(tmp.path(), &["Arial", "Calibri", "Verdana"]);
    fs::write(
        tmp.path().join("config.ini"),
        "[Favorites]\nfonts = Arial,Calibri,GoneFont\n",
    )
    .expect("write config");

    let output = fontfav(tmp.path(), &["favorites", "--catalog-file", "fonts.txt"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Arial\nCalibri\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GoneFont no longer installed"), "stderr: {stderr}");

    // showing favorites does not rewrite the settings
    let config = fs::read_to_string(tmp.path().join("config.ini")).expect("config");
    assert!(config.contains("GoneFont"));
}

#[test]
fn reconcile_rewrites_settings() {
    let tmp = tempdir().expect("tempdir");
    write_catalog(tmp.path(), &["Arial"]);
    fs::write(
        tmp.path().join("config.ini"),
        "[Settings]\nwindow_size = 1024,768\nwindow_position = 5,5\n\n[Favorites]\nfonts = Arial,GoneFont\n",
    )
    .expect("write config");

    let output = fontfav(tmp.path(), &["reconcile", "--catalog-file", "fonts.txt"]);
    assert!(output.status.success());

    let config = fs::read_to_string(tmp.path().join("config.ini")).expect("config");
    assert_eq!(
        config,
        "[Settings]\nwindow_size = 1024,768\nwindow_position = 5,5\n\n[Favorites]\nfonts = Arial\n\n"
    );
}

#[test]
fn export_favorites_writes_header_and_sorted_names() {
    let tmp = tempdir().expect("tempdir");
    write_catalog(tmp.path(), &["Verdana", "Arial", "Calibri"]);
    fs::write(
        tmp.path().join("config.ini"),
        "[Favorites]\nfonts = Verdana,Calibri\n",
    )
    .expect("write config");

    let output = fontfav(
        tmp.path(),
        &["export", "favorites", "--catalog-file", "fonts.txt"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let text = fs::read_to_string(tmp.path().join("favorites_list.txt")).expect("export");
    assert_eq!(text, "Favorite Fonts of ada on studio:\nCalibri\nVerdana");
}

#[test]
fn list_json_reports_catalog_order() {
    let tmp = tempdir().expect("tempdir");
    write_catalog(tmp.path(), &["Verdana", "Arial"]);

    let output = fontfav(tmp.path(), &["list", "--catalog-file", "fonts.txt", "--json"]);
    assert!(output.status.success());

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json");
    let names: Vec<&str> = parsed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Verdana", "Arial"]);
}

#[test]
fn geometry_is_clamped_to_screen() {
    let tmp = tempdir().expect("tempdir");

    let output = fontfav(
        tmp.path(),
        &["geometry", "--set", "2000x1500+1900+10", "--screen", "1920x1080"],
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1920x1080+0+0\n");

    let config = fs::read_to_string(tmp.path().join("config.ini")).expect("config");
    assert!(config.contains("window_size = 2000,1500\n"));
    assert!(config.contains("window_position = 1900,10\n"));
}

#[test]
fn missing_catalog_file_is_an_error() {
    let tmp = tempdir().expect("tempdir");
    let output = fontfav(tmp.path(), &["list", "--catalog-file", "absent.txt"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
}
