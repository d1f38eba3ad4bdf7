// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(path: &str, model: &str) -> FolderConfigEntry {
    FolderConfigEntry { path: PathBuf::from(path), model: model.to_string() }
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = TomlFileConfiguration::new(dir.path().join("config.toml"));
    assert_eq!(cfg.load_folders().unwrap(), Vec::new());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = TomlFileConfiguration::new(dir.path().join("config.toml"));
    let folders = vec![entry("/home/u/docs", "cpu:xenova-multilingual-e5-small")];
    cfg.save_folders(&folders).unwrap();
    assert_eq!(cfg.load_folders().unwrap(), folders);
}

#[test]
fn save_preserves_defaults_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults]\nmodel = \"cpu:default\"\n").unwrap();
    let cfg = TomlFileConfiguration::new(path);
    cfg.save_folders(&[entry("/a", "cpu:m")]).unwrap();
    assert_eq!(cfg.default_model(), Some("cpu:default".to_string()));
}

#[test]
fn memory_configuration_round_trips_without_filesystem() {
    let cfg = MemoryConfiguration::with_folders(
        vec![entry("/a", "cpu:m")],
        Some("cpu:m".to_string()),
    );
    assert_eq!(cfg.load_folders().unwrap().len(), 1);
    cfg.save_folders(&[]).unwrap();
    assert_eq!(cfg.load_folders().unwrap(), Vec::new());
    assert_eq!(cfg.default_model(), Some("cpu:m".to_string()));
}
