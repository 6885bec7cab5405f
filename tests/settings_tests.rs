mod common;

use common::write_settings;
use serde_json::json;
use stagerun::{Error, Settings};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_missing_start_json_is_config_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let err = Settings::load(&tmp.path().join("settings")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_malformed_start_json_is_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("settings");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("start.json"), "{ \"modules\": [ ").unwrap();
    assert!(matches!(
        Settings::load(&dir).unwrap_err(),
        Error::ConfigParse { .. }
    ));
}

#[test]
fn test_defaults_for_missing_keys() {
    let tmp = tempfile::tempdir().unwrap();
    write_settings(tmp.path(), &json!({}), None);
    let s = Settings::load(&tmp.path().join("settings")).unwrap();
    assert_eq!(s.output_format(), "png");
    assert_eq!(s.folder().folder_name.as_deref(), Some("image"));
    assert_eq!(s.folder().folder_path, None);
    assert_eq!(s.folder().entrance_path, None);
    assert!(!s.enter_confirmation());
    assert!(s.logger().logging_enabled);
    assert!(s.logger().console_output);
    assert!(!s.logger().logger_folder);
    assert!(s.module_list().is_empty());
    assert!(s.folder_mapping().is_empty());
    assert!(s.notes().iter().any(|n| n.contains("folders.json")));
}

#[test]
fn test_full_configuration() {
    let tmp = tempfile::tempdir().unwrap();
    write_settings(
        tmp.path(),
        &json!({
            "folder": { "foldername": "batch", "folderpath": "out", "entrancepath": "in" },
            "settings": { "output_format": ".WEBP", "enter_confirmation": true },
            "logger": { "logger_folder": true, "console_output": false },
            "modules": [
                { "name": "Convert", "enabled": true },
                { "name": "Enhancement", "enabled": false, "folders": ["Collation2"] },
                { "enabled": true },
                { "name": "Scal", "enabled": true, "folders": [] }
            ]
        }),
        Some(&json!({ "Collation1": "CleanUp", "Collation2": "Enhancement" })),
    );
    let s = Settings::load(&tmp.path().join("settings")).unwrap();
    assert_eq!(s.output_format(), "webp");
    assert!(s.enter_confirmation());
    assert!(s.logger().logger_folder);
    assert!(!s.logger().console_output);
    assert!(s.logger().logging_enabled);

    let names: Vec<&str> = s.module_list().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Convert", "Enhancement", "Scal"]);
    assert_eq!(s.module_list()[0].target_folder_keys, None);
    assert_eq!(
        s.module_list()[1].target_folder_keys,
        Some(vec!["Collation2".to_string()])
    );
    assert_eq!(s.module_list()[2].target_folder_keys, Some(vec![]));
    assert!(s.notes().iter().any(|n| n.contains("no name")));

    assert!(s.is_module_enabled("Convert"));
    assert!(!s.is_module_enabled("Enhancement"));
    assert!(!s.is_module_enabled("Unknown"));

    assert_eq!(
        s.folder_mapping().get("Collation2").map(String::as_str),
        Some("Enhancement")
    );
    let base = PathBuf::from("/work");
    assert_eq!(s.run_root(&base), PathBuf::from("/work/out/batch"));
    assert_eq!(s.entrance_path(&base), Some(PathBuf::from("/work/in")));
}

#[test]
fn test_null_folder_name_uses_root_directly() {
    let tmp = tempfile::tempdir().unwrap();
    write_settings(
        tmp.path(),
        &json!({ "folder": { "foldername": null, "folderpath": "None" } }),
        None,
    );
    let s = Settings::load(&tmp.path().join("settings")).unwrap();
    assert_eq!(s.folder().folder_name, None);
    assert_eq!(s.folder().folder_path, None);
    assert_eq!(s.run_root(&PathBuf::from("/work")), PathBuf::from("/work"));
}

#[test]
fn test_enabled_defaults_to_false() {
    let tmp = tempfile::tempdir().unwrap();
    write_settings(tmp.path(), &json!({ "modules": [ { "name": "Foo" } ] }), None);
    let s = Settings::load(&tmp.path().join("settings")).unwrap();
    assert!(!s.module_list()[0].enabled);
}

#[test]
fn test_malformed_mapping_is_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_settings(tmp.path(), &json!({}), Some(&json!({ "K1": 3 })));
    assert!(matches!(
        Settings::load(&tmp.path().join("settings")).unwrap_err(),
        Error::ConfigParse { .. }
    ));
}
