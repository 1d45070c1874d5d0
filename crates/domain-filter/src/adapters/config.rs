use crate::domain::{Domain, FilterConfig};
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - In-process config for embedding and tests
// ============================================================================

/// Static configuration provider with values fixed at construction.
///
/// For file-based settings, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: FilterConfig,
}

impl StaticConfigProvider {
    /// Create with the empty domain and the default log interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<Domain>) -> Self {
        self.config.domain = domain.into();
        self
    }

    #[must_use]
    pub fn with_log_interval(mut self, log_interval: u32) -> Self {
        self.config.log_interval = log_interval;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn filter_config(&self) -> FilterConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - File-based config (requires "config" feature)
// ============================================================================

#[cfg(feature = "config")]
mod toml_config {
    use super::*;
    use crate::domain::{ConfigError, DEFAULT_LOG_INTERVAL};
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;

    /// Configuration file structure.
    #[derive(Debug, Deserialize)]
    struct ConfigFile {
        #[serde(default)]
        domain_filter: DomainFilterSection,
    }

    #[derive(Debug, Deserialize, Default)]
    struct DomainFilterSection {
        domain: Option<DomainValue>,
        log_interval: Option<u32>,
    }

    /// A domain written either as text (`"{1,2,3}"`, `"east"`) or as an
    /// integer array (`[1, 2, 3]`).
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    enum DomainValue {
        Text(String),
        Bytes(Vec<u8>),
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [domain_filter]
    /// domain = "{1,2,3}"
    /// log_interval = 100
    /// ```
    ///
    /// Missing keys fall back to the empty domain and an interval of 100.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: FilterConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let section = file.domain_filter;
            let domain = match section.domain {
                Some(DomainValue::Text(text)) => Domain::parse(&text)?,
                Some(DomainValue::Bytes(bytes)) => Domain::new(bytes),
                None => Domain::empty(),
            };
            let config = FilterConfig::new(domain)
                .with_log_interval(section.log_interval.unwrap_or(DEFAULT_LOG_INTERVAL));
            config.validate()?;

            Ok(Self { config })
        }

        pub fn config(&self) -> &FilterConfig {
            &self.config
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn filter_config(&self) -> FilterConfig {
            self.config.clone()
        }
    }
}

#[cfg(feature = "config")]
pub use toml_config::TomlConfigProvider;
