//! Environment-based configuration.
//!
//! `main` loads `.env` via dotenvy before calling [`Config::from_env`].
//! Credential validation is explicit: [`Config::require_api_key`] returns a
//! typed error so a missing key disables the completion path only, instead
//! of surfacing as an ad hoc message deep in the presentation layer.

use std::path::PathBuf;

use thiserror::Error;

/// Default knowledge base file, resolved relative to the working directory.
pub const DEFAULT_TRAINING_FILE: &str = "training.txt";

/// Configuration errors surfaced at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No API credential is available; knowledge-base answers and document
    /// extraction keep working, only the completion path is disabled.
    #[error("OPENAI_API_KEY is not set; completion service disabled")]
    MissingApiKey,
}

/// Runtime configuration gathered from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    api_key: Option<String>,
    training_file: PathBuf,
}

impl Config {
    /// Gathers configuration from environment variables.
    ///
    /// `OPENAI_API_KEY` is optional here; callers that need the completion
    /// path validate it with [`require_api_key`](Self::require_api_key).
    /// The knowledge base path comes from `HOIDAP_TRAINING_FILE`, defaulting
    /// to [`DEFAULT_TRAINING_FILE`].
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let training_file = std::env::var("HOIDAP_TRAINING_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TRAINING_FILE));

        Self {
            api_key,
            training_file,
        }
    }

    /// Validates that an API credential is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when no key was found in the
    /// environment.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Returns the knowledge base file path.
    pub fn training_file(&self) -> &PathBuf {
        &self.training_file
    }

    /// Overrides the knowledge base file path (CLI flag over environment).
    pub fn with_training_file(mut self, path: PathBuf) -> Self {
        self.training_file = path;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_without_key_fails_validation_only() {
        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
            std::env::remove_var("HOIDAP_TRAINING_FILE");
        }

        let config = Config::from_env();
        assert_eq!(config.require_api_key(), Err(ConfigError::MissingApiKey));
        assert_eq!(
            config.training_file(),
            &PathBuf::from(DEFAULT_TRAINING_FILE)
        );
    }

    #[test]
    #[serial]
    fn from_env_reads_key_and_training_file() {
        unsafe {
            std::env::set_var("OPENAI_API_KEY", "sk-test");
            std::env::set_var("HOIDAP_TRAINING_FILE", "/tmp/kb.txt");
        }

        let config = Config::from_env();
        assert_eq!(config.require_api_key(), Ok("sk-test"));
        assert_eq!(config.training_file(), &PathBuf::from("/tmp/kb.txt"));

        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
            std::env::remove_var("HOIDAP_TRAINING_FILE");
        }
    }

    #[test]
    #[serial]
    fn blank_api_key_counts_as_missing() {
        unsafe {
            std::env::set_var("OPENAI_API_KEY", "   ");
        }

        let config = Config::from_env();
        assert_eq!(config.require_api_key(), Err(ConfigError::MissingApiKey));

        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn with_training_file_overrides_environment() {
        unsafe {
            std::env::set_var("HOIDAP_TRAINING_FILE", "/tmp/env.txt");
        }

        let config = Config::from_env().with_training_file(PathBuf::from("/tmp/flag.txt"));
        assert_eq!(config.training_file(), &PathBuf::from("/tmp/flag.txt"));

        unsafe {
            std::env::remove_var("HOIDAP_TRAINING_FILE");
        }
    }
}
