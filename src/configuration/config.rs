#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::env;
use std::path;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_HEALTH_CHECK_TIMEOUT_MS: u64 = 1_000;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    HealthCheckTimeout,
    RequestTimeout,
    ServiceURL,
}

impl ConfigKey {
    pub fn default_value(&self) -> String {
        match self {
            ConfigKey::ConfigFile => {
                return dirs::config_dir()
                    .unwrap_or_else(env::temp_dir)
                    .join("clompanion/config.toml")
                    .to_string_lossy()
                    .to_string();
            }
            ConfigKey::HealthCheckTimeout => return DEFAULT_HEALTH_CHECK_TIMEOUT_MS.to_string(),
            ConfigKey::RequestTimeout => return DEFAULT_REQUEST_TIMEOUT_MS.to_string(),
            ConfigKey::ServiceURL => return DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

fn parse_millis(key: ConfigKey, val: &str) -> Result<Duration> {
    let millis = val
        .trim()
        .parse::<u64>()
        .map_err(|_| return anyhow!("Invalid value for '{key}': {val} is not a number of milliseconds"))?;

    if millis == 0 {
        bail!("Invalid value for '{key}': must be greater than zero");
    }

    return Ok(Duration::from_millis(millis));
}

/// Settings resolved once at startup and handed to whatever needs them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub service_url: String,
    pub request_timeout: Duration,
    pub health_check_timeout: Duration,
}

impl Default for Config {
    fn default() -> Config {
        return Config {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            health_check_timeout: Duration::from_millis(DEFAULT_HEALTH_CHECK_TIMEOUT_MS),
        };
    }
}

impl Config {
    /// Resolves every key from defaults, then the TOML config file, then clap
    /// arguments (which include environment variables).
    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<Config> {
        let mut values = ConfigKey::iter()
            .map(|key| return (key, key.default_value()))
            .collect::<HashMap<ConfigKey, String>>();

        let mut config_file = ConfigKey::ConfigFile.default_value();
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }
                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        values.insert(key, val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        values.insert(key, val_str.to_string());
                    } else {
                        bail!(format!(
                            "{config_file} has an invalid value for key '{key}'"
                        ));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    values.insert(key, val.to_string());
                }
            }
        }

        let config = Config::from_values(&values)?;

        tracing::debug!(
            config_file = config_file.as_str(),
            service_url = config.service_url.as_str(),
            request_timeout_ms = config.request_timeout.as_millis() as u64,
            health_check_timeout_ms = config.health_check_timeout.as_millis() as u64,
            "config"
        );

        return Ok(config);
    }

    pub fn from_values(values: &HashMap<ConfigKey, String>) -> Result<Config> {
        let get = |key: ConfigKey| {
            return values
                .get(&key)
                .cloned()
                .unwrap_or_else(|| return key.default_value());
        };

        let service_url = get(ConfigKey::ServiceURL).trim().to_string();
        if service_url.is_empty() {
            bail!("'{}' must not be empty", ConfigKey::ServiceURL);
        }

        return Ok(Config {
            service_url,
            request_timeout: parse_millis(
                ConfigKey::RequestTimeout,
                &get(ConfigKey::RequestTimeout),
            )?,
            health_check_timeout: parse_millis(
                ConfigKey::HealthCheckTimeout,
                &get(ConfigKey::HealthCheckTimeout),
            )?,
        });
    }

    /// Where JSON debug logs are written when `RUST_LOG` targets clompanion.
    pub fn log_dir() -> path::PathBuf {
        if let Ok(dir) = env::var("CLOMPANION_LOG_DIR") {
            return path::PathBuf::from(dir);
        }

        return dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("clompanion");
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = key.default_value();
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<u64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
