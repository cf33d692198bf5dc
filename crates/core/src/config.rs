//! Ingest configuration.
//!
//! Configuration can be created programmatically or loaded from environment
//! variables. Front ends apply their own overrides on top.

/// Configuration for the ingest pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestConfig {
    /// Sort attribute rows by name before ids are assigned.
    ///
    /// Filesystem metadata order is platform dependent; sorting gives
    /// deterministic listings.
    pub sort_attributes: bool,
}

impl IngestConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether attribute rows are sorted by name.
    pub fn with_sorted_attributes(mut self, sorted: bool) -> Self {
        self.sort_attributes = sorted;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `XPLORE_SORT_ATTRIBUTES`: `1`/`true`/`yes` or `0`/`false`/`no` (default: false)
    ///
    /// # Errors
    /// Returns an error if a variable contains an unrecognised value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("XPLORE_SORT_ATTRIBUTES") {
            config.sort_attributes = parse_flag("XPLORE_SORT_ATTRIBUTES", &val)?;
        }

        Ok(config)
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}

/// Parses a boolean switch the way environment overrides spell it.
pub fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_mapping_order() {
        assert!(!IngestConfig::default().sort_attributes);
    }

    #[test]
    fn test_builder() {
        let config = IngestConfig::new().with_sorted_attributes(true);
        assert!(config.sort_attributes);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("X", "TRUE"), Ok(true));
        assert_eq!(parse_flag("X", "0"), Ok(false));
        assert_eq!(parse_flag("X", "maybe"), Err(ConfigError::InvalidValue("X".to_owned())));
    }
}
