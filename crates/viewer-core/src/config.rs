//! Token session configuration.

use doc_model::{Language, TagScheme, TokenUnit};

/// Initial tokenization settings for a viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub token_unit: TokenUnit,
    pub scheme: TagScheme,
    /// Used when the page language cannot be detected.
    pub fallback_language: Language,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_unit(mut self, unit: TokenUnit) -> Self {
        self.token_unit = unit;
        self
    }

    pub fn with_scheme(mut self, scheme: TagScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_fallback_language(mut self, language: Language) -> Self {
        self.fallback_language = language;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `XPLORE_TOKEN_UNIT`: `word`, `sentence` or `paragraph` (default: word)
    /// - `XPLORE_TAG_SCHEME`: scheme name, e.g. `lexical-class` (default: TokenType)
    /// - `XPLORE_LANGUAGE`: ISO 639-3 fallback language (default: eng)
    ///
    /// # Errors
    /// Returns an error if a variable contains an unrecognised value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("XPLORE_TOKEN_UNIT") {
            config.token_unit =
                val.parse().map_err(|_| ConfigError::InvalidValue("XPLORE_TOKEN_UNIT".into()))?;
        }

        if let Ok(val) = std::env::var("XPLORE_TAG_SCHEME") {
            config.scheme =
                val.parse().map_err(|_| ConfigError::InvalidValue("XPLORE_TAG_SCHEME".into()))?;
        }

        if let Ok(val) = std::env::var("XPLORE_LANGUAGE") {
            config.fallback_language = parse_language(&val)?;
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

fn parse_language(value: &str) -> Result<Language, ConfigError> {
    let code = value.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(Language::new(code))
    } else {
        Err(ConfigError::InvalidValue("XPLORE_LANGUAGE".into()))
    }
}
