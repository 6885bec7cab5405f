use clap::Parser;
use stagerun::engine::{Cli, handle_run};
use std::fs;

#[test]
fn test_malformed_stagerun_toml_stops_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join(".stagerun.toml"),
        "[settings]\nstrict = \"yes-please\"\n",
    )
    .unwrap();
    let cli = Cli::try_parse_from(["stagerun", tmp.path().to_str().unwrap()]).unwrap();

    let err = handle_run(&cli).unwrap_err();

    assert!(format!("{err:#}").contains(".stagerun.toml"));
    assert!(!tmp.path().join("image").exists());
}
