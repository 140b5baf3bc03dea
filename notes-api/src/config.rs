use std::sync::OnceLock;

use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] envy::Error);

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // logging
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub tokio_console: bool,

    // build
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4000
}

fn default_local() -> String {
    "local".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_json: false,
            tokio_console: false,
            source: default_local(),
            git_commit: default_local(),
            pipeline_id: default_local(),
            version: default_local(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env::<Self>()?)
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Reads the environment once. Must run before the first [`config`] call to take effect.
pub fn init() -> Result<&'static Config, ConfigError> {
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

#[cfg(test)]
pub fn config_override<F>(override_config: F) -> &'static Config
where
    F: FnOnce(Config) -> Config,
{
    CONFIG.get_or_init(|| override_config(Config::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_env() {
        let config = envy::from_iter::<_, Config>(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert!(!config.log_json);
        assert_eq!(config.version, "local");
    }

    #[test]
    fn reads_values() {
        let config = envy::from_iter::<_, Config>(vec![
            ("PORT".to_string(), "8080".to_string()),
            ("LOG_JSON".to_string(), "true".to_string()),
            ("GIT_COMMIT".to_string(), "abc123".to_string()),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.log_json);
        assert_eq!(config.git_commit, "abc123");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = envy::from_iter::<_, Config>(vec![("PORT".to_string(), "nope".to_string())]);

        assert!(result.map_err(ConfigError::from).is_err());
    }
}
