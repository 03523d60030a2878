use std::path::PathBuf;

use quill::config::{Config, DEFAULT_LISTEN_ADDR, DEFAULT_WORKERS};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(cfg.listen_addr, "0.0.0.0:4221");
    assert_eq!(cfg.directory, PathBuf::from("."));
    assert_eq!(cfg.workers, DEFAULT_WORKERS);
}

#[test]
fn test_config_directory_flag() {
    let cfg = Config::from_args(["--directory", "/tmp/files"]).unwrap();
    assert_eq!(cfg.directory, PathBuf::from("/tmp/files"));
}

#[test]
fn test_config_workers_flag() {
    let cfg = Config::from_args(["--workers", "3"]).unwrap();
    assert_eq!(cfg.workers, 3);
}

#[test]
fn test_config_missing_flag_value_is_error() {
    assert!(Config::from_args(["--directory"]).is_err());
}

#[test]
fn test_config_invalid_workers_is_error() {
    assert!(Config::from_args(["--workers", "lots"]).is_err());
    assert!(Config::from_args(["--workers", "0"]).is_err());
}

#[test]
fn test_config_unknown_flags_are_ignored() {
    let cfg = Config::from_args(["--verbose", "--directory", "srv"]).unwrap();
    assert_eq!(cfg.directory, PathBuf::from("srv"));
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str("listen_addr: 127.0.0.1:9000\nworkers: 2\n").unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    assert_eq!(cfg.workers, 2);
    assert_eq!(cfg.directory, PathBuf::from("."));
}

#[test]
fn test_config_flags_override_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("quill.yaml");
    std::fs::write(&file, "directory: /from/yaml\nworkers: 5\n").unwrap();

    let cfg = Config::from_args([
        "--config",
        file.to_str().unwrap(),
        "--directory",
        "/from/flag",
    ])
    .unwrap();

    assert_eq!(cfg.directory, PathBuf::from("/from/flag"));
    assert_eq!(cfg.workers, 5);
}

#[test]
fn test_config_missing_yaml_file_is_error() {
    assert!(Config::from_args(["--config", "/definitely/not/here.yaml"]).is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::from_args(["--directory", "a"]).unwrap();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.directory, cfg2.directory);
}
