use std::env;

use anyhow::{Context, Result};

use super::model::Config;

/// Overrides applied on top of the config file, typically from CLI flags.
#[derive(Debug, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub agent_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Load the run configuration from a YAML file and apply overrides.
/// The file is located by the `--config` flag if given, falling back to the
/// `CONFIG_FILE` environment variable and then `config.yml`. A missing file
/// is not an error; the built-in defaults are used instead, so the binary
/// works when invoked with no arguments and no configuration at all.
pub fn load_config(path: Option<&str>, overrides: Overrides) -> Result<Config> {
    let config_file_location = path
        .map(str::to_string)
        .or_else(|| env::var("CONFIG_FILE").ok())
        .unwrap_or_else(|| "config.yml".to_string());

    let mut config = match std::fs::read_to_string(&config_file_location) {
        Ok(raw) => serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid config file {config_file_location}"))?,
        Err(_) => {
            tracing::debug!("no config file at {config_file_location}, using defaults");
            Config::default()
        }
    };

    if let Some(url) = overrides.backend_url {
        config.backend_url = url;
    }
    if let Some(url) = overrides.agent_url {
        config.agent_url = url;
    }
    if let Some(seconds) = overrides.timeout_seconds {
        config.timeout_seconds = seconds;
    }

    tracing::debug!(
        "probing backend {} and agent {} with a {}s timeout",
        config.backend_url,
        config.agent_url,
        config.timeout_seconds
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some("/nonexistent/smokebox.yml"), Overrides::default())
            .expect("defaults should load");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let overrides = Overrides {
            backend_url: Some("http://localhost:9001".to_string()),
            agent_url: None,
            timeout_seconds: Some(3),
        };
        let config =
            load_config(Some("/nonexistent/smokebox.yml"), overrides).expect("defaults should load");
        assert_eq!(config.backend_url, "http://localhost:9001");
        assert_eq!(config.agent_url, "https://vps.coengine.ai");
        assert_eq!(config.timeout_seconds, 3);
    }
}
