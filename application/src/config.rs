//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::graphql;
use smart_default::SmartDefault;

use crate::Error;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Registry gateway configuration.
    #[serde(default)]
    pub gateway: Gateway,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the `CONF_`-prefixed environment variables (if any),
    ///   where `__` separates nested keys (like `CONF_GATEWAY__ENDPOINT`);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CONF")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Registry gateway configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Gateway {
    /// URL of the GraphQL endpoint of the registry.
    #[default("http://localhost:3000/graphql".to_owned())]
    pub endpoint: String,

    /// Timeout of a single request to the registry.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl TryFrom<Gateway> for graphql::Config {
    type Error = Error;

    fn try_from(value: Gateway) -> Result<Self, Self::Error> {
        let Gateway { endpoint, timeout } = value;

        let endpoint = graphql::Url::parse(&endpoint).map_err(|e| Error {
            code: "INVALID_CONFIG",
            message: format!("`{endpoint}` is not a valid endpoint URL: {e}"),
            backtrace: None,
        })?;
        Ok(Self { endpoint, timeout })
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use service::infra::graphql;

    use super::{Config, Gateway};

    #[test]
    fn defaults_to_local_registry() {
        let conf = Config::new("does-not-exist.toml").unwrap();

        assert_eq!(conf.gateway.endpoint, "http://localhost:3000/graphql");
        assert_eq!(conf.gateway.timeout, Duration::from_secs(30));
        assert_eq!(tracing::Level::from(conf.log.level), tracing::Level::INFO);
    }

    #[test]
    fn converts_into_client_config() {
        let conf = graphql::Config::try_from(Gateway {
            endpoint: "https://registry.example.com/graphql".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(conf.endpoint.host_str(), Some("registry.example.com"));
        assert_eq!(conf.timeout, Duration::from_secs(5));

        let err = graphql::Config::try_from(Gateway {
            endpoint: "not a url".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap_err();
        assert_eq!(err.code, "INVALID_CONFIG");
    }
}
