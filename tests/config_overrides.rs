use locator_forge::config::{ENV_BATCH_WORKERS, ENV_CACHE_CAPACITY};
use locator_forge::{apply_env_overrides, load_config, Config};
use serial_test::serial;
use std::env;
use std::fs;

fn clear_env() {
    env::remove_var(ENV_CACHE_CAPACITY);
    env::remove_var(ENV_BATCH_WORKERS);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "engine:\n  cache_capacity: 10\n  batch_workers: 2\n").unwrap();

    let mut config = tokio_test::block_on(load_config(Some(path.as_path()))).unwrap();
    assert_eq!(config.engine.cache_capacity, 10);

    env::set_var(ENV_CACHE_CAPACITY, "250");
    apply_env_overrides(&mut config).unwrap();
    clear_env();

    assert_eq!(config.engine.cache_capacity, 250);
    assert_eq!(config.engine.batch_workers, 2);
}

#[test]
#[serial]
fn invalid_env_value_is_an_error() {
    clear_env();
    env::set_var(ENV_BATCH_WORKERS, "many");
    let mut config = Config::default();
    let err = apply_env_overrides(&mut config).unwrap_err();
    clear_env();

    assert!(err.to_string().contains(ENV_BATCH_WORKERS));
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn blank_env_value_is_ignored() {
    clear_env();
    env::set_var(ENV_CACHE_CAPACITY, "  ");
    let mut config = Config::default();
    apply_env_overrides(&mut config).unwrap();
    clear_env();

    assert_eq!(config, Config::default());
}

#[tokio::test]
#[serial]
async fn malformed_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "engine: [not, a, map]\n").unwrap();
    assert!(load_config(Some(path.as_path())).await.is_err());
}
