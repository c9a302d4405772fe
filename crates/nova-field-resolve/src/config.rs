use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Fail with `CyclicHierarchy` when a superclass chain revisits a class.
    ///
    /// Real class hierarchies are acyclic; disabling this skips the bookkeeping but makes
    /// malformed metadata walk forever.
    #[serde(default = "ResolverConfig::default_detect_cycles")]
    pub detect_cycles: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ResolverConfig {
    fn default_detect_cycles() -> bool {
        true
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.logging.validate()?;
        Ok(config)
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ResolverConfig)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            detect_cycles: Self::default_detect_cycles(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, either a simple level (`info`, `debug`, ...) or an `EnvFilter` directive.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// `level` as filter directives: bare level names are canonicalized, anything else passes
    /// through unchanged.
    pub(crate) fn directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        if level.eq_ignore_ascii_case("warning") {
            return LevelFilter::WARN.to_string();
        }
        level
            .parse::<LevelFilter>()
            .map(|filter| filter.to_string())
            .unwrap_or_else(|_| level.to_owned())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(self.directives())
            .map(|_| ())
            .map_err(|_| ConfigError::InvalidLogLevel(self.level.clone()))
    }

    /// The effective filter: the configured level with `RUST_LOG` layered on top.
    pub fn env_filter(&self) -> EnvFilter {
        self.env_filter_with(std::env::var("RUST_LOG").ok().as_deref())
    }

    /// Like [`LoggingConfig::env_filter`] with explicit `RUST_LOG` directives.
    ///
    /// Directives that do not parse are dropped in favor of the configured level.
    pub fn env_filter_with(&self, rust_log: Option<&str>) -> EnvFilter {
        let configured = self.directives();
        rust_log
            .map(str::trim)
            .filter(|extra| !extra.is_empty())
            .and_then(|extra| EnvFilter::try_new(format!("{configured},{extra}")).ok())
            .or_else(|| EnvFilter::try_new(&configured).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ResolverConfig::load_from_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert!(config.detect_cycles);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_toml() {
        let config = ResolverConfig::load_from_str(
            r#"
detect_cycles = false

[logging]
level = "nova.field_resolve=trace"
"#,
        )
        .unwrap();
        assert!(!config.detect_cycles);
        assert_eq!(config.logging.level, "nova.field_resolve=trace");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ResolverConfig::load_from_str("detect_cycle = true").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    }

    #[test]
    fn unknown_logging_keys_are_rejected() {
        let err = ResolverConfig::load_from_str("[logging]\nlevle = \"debug\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = ResolverConfig::load_from_str("[logging]\nlevel = \"nova=verbose\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)), "{err}");
    }

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_owned(),
        }
    }

    #[test]
    fn level_synonyms_are_normalized() {
        assert_eq!(logging(" WARNING ").directives(), "warn");
        assert_eq!(logging("Debug").directives(), "debug");
        assert_eq!(logging("").directives(), "info");
        assert_eq!(logging("nova=debug").directives(), "nova=debug");
    }

    #[test]
    fn rust_log_is_layered_over_configured_level() {
        let filter = logging("warn")
            .env_filter_with(Some(" nova.field_resolve=trace "))
            .to_string();
        assert!(filter.contains("warn"), "{filter}");
        assert!(filter.contains("nova.field_resolve=trace"), "{filter}");
    }

    #[test]
    fn unparsable_rust_log_falls_back_to_configured_level() {
        let filter = logging("debug")
            .env_filter_with(Some("nova=verbose"))
            .to_string();
        assert!(filter.contains("debug"), "{filter}");
        assert!(!filter.contains("nova"), "{filter}");

        let filter = logging("debug").env_filter_with(Some("  ")).to_string();
        assert_eq!(filter, logging("debug").env_filter_with(None).to_string());
    }

    #[test]
    fn schema_lists_options() {
        let schema = serde_json::to_value(ResolverConfig::json_schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("detect_cycles").is_some(), "{schema}");
        assert!(properties.get("logging").is_some(), "{schema}");
    }
}
