use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    insta::assert_snapshot!(res, @r###"
    # Time to wait in milliseconds before giving up on the startup health check.
    health-check-timeout = 1000

    # Time to wait in milliseconds for the assistant to answer a message.
    request-timeout = 30000

    # Base URL of the Clompanion assistant service.
    service-url = "http://localhost:5000"
    "###);
}

#[test]
fn it_names_keys_in_kebab_case() {
    assert_eq!(ConfigKey::ServiceURL.to_string(), "service-url");
    assert_eq!(ConfigKey::RequestTimeout.to_string(), "request-timeout");
    assert_eq!(
        ConfigKey::HealthCheckTimeout.to_string(),
        "health-check-timeout"
    );
    assert_eq!(ConfigKey::ConfigFile.to_string(), "config-file");
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["clompanion", "-c", "./config.example.toml"])?;
    let config = Config::load(vec![&matches]).await?;

    assert_eq!(config.service_url, "http://localhost:5000");
    assert_eq!(config.request_timeout, Duration::from_millis(15000));
    assert_eq!(config.health_check_timeout, Duration::from_millis(1000));

    return Ok(());
}

#[tokio::test]
async fn it_prefers_arguments_over_the_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "clompanion",
        "chat",
        "-c",
        "./config.example.toml",
        "--service-url",
        "http://assistant.internal:8080",
    ])?;
    let subcmd_matches = matches.subcommand_matches("chat").unwrap();
    let config = Config::load(vec![&matches, subcmd_matches]).await?;

    assert_eq!(config.service_url, "http://assistant.internal:8080");
    assert_eq!(config.request_timeout, Duration::from_millis(15000));

    return Ok(());
}

#[tokio::test]
async fn it_falls_back_to_defaults_without_a_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["clompanion", "-c", "./test/missing.toml"])?;
    let config = Config::load(vec![&matches]).await?;

    assert_eq!(config, Config::default());

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["clompanion", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}

#[test]
fn it_rejects_invalid_timeouts() {
    let mut values = HashMap::new();
    values.insert(ConfigKey::RequestTimeout, "0".to_string());
    assert!(Config::from_values(&values).is_err());

    values.insert(ConfigKey::RequestTimeout, "-5".to_string());
    assert!(Config::from_values(&values).is_err());

    values.insert(ConfigKey::RequestTimeout, "250".to_string());
    let config = Config::from_values(&values).unwrap();
    assert_eq!(config.request_timeout, Duration::from_millis(250));
}

#[test]
fn it_rejects_an_empty_service_url() {
    let mut values = HashMap::new();
    values.insert(ConfigKey::ServiceURL, "   ".to_string());
    assert!(Config::from_values(&values).is_err());
}
