use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use mycoin::connector::DEFAULT_API_URL;
use mycoin::quiz::DEFAULT_QUIZ_SIZE;
use mycoin::staging::DEFAULT_STAGING_TTL;
use mycoin::{PhraseLength, QuizConfig, Vocabulary};
use serde::{Deserialize, Serialize};

pub const ENV_PHRASE_LENGTH: &str = "MYCOIN_CLI_PHRASE_LENGTH";
pub const ENV_QUIZ_SIZE: &str = "MYCOIN_CLI_QUIZ_SIZE";
pub const ENV_STAGING_TTL_SECS: &str = "MYCOIN_CLI_STAGING_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub phrase_length: PhraseLength,
    pub quiz_size: usize,
    pub staging_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            phrase_length: PhraseLength::default(),
            quiz_size: DEFAULT_QUIZ_SIZE,
            staging_ttl_secs: DEFAULT_STAGING_TTL.as_secs(),
        }
    }
}

impl Settings {
    /// Load `config.toml` from the work dir on top of the defaults
    ///
    /// A missing or unreadable file falls back to the defaults.
    #[must_use]
    pub fn new(work_dir: &Path) -> Self {
        let default_settings = Self::default();
        let config_file = work_dir.join("config.toml");

        if !config_file.exists() {
            return default_settings;
        }

        match Self::new_from_default(&default_settings, config_file) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Error reading config file, falling back to defaults. Error: {e}");
                default_settings
            }
        }
    }

    fn new_from_default(default: &Settings, config_file: PathBuf) -> Result<Self, ConfigError> {
        let config: Config = Config::builder()
            // use defaults
            .add_source(Config::try_from(default)?)
            // override with file contents
            .add_source(File::from(config_file))
            .build()?;

        config.try_deserialize()
    }

    /// Override settings from `MYCOIN_CLI_*` environment variables
    ///
    /// The API URL is read by the command line parser.
    pub fn from_env(mut self) -> Self {
        if let Ok(length) = env::var(ENV_PHRASE_LENGTH) {
            match length.parse() {
                Ok(length) => self.phrase_length = length,
                Err(err) => tracing::warn!("Ignoring {}: {}", ENV_PHRASE_LENGTH, err),
            }
        }

        if let Ok(size) = env::var(ENV_QUIZ_SIZE) {
            if let Ok(size) = size.parse() {
                self.quiz_size = size;
            }
        }

        if let Ok(ttl) = env::var(ENV_STAGING_TTL_SECS) {
            if let Ok(ttl) = ttl.parse() {
                self.staging_ttl_secs = ttl;
            }
        }

        self
    }

    /// Quiz settings for the create and verify commands
    pub fn quiz_config(&self) -> Result<QuizConfig, mycoin::Error> {
        QuizConfig::new(self.quiz_size, Vocabulary::bip39_english())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();

        let settings = Settings::new(dir.path());

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.quiz_size, 4);
        assert_eq!(settings.staging_ttl_secs, 1800);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "api_url = \"http://127.0.0.1:5000/api\"\nphrase_length = 24\n",
        )
        .unwrap();

        let settings = Settings::new(dir.path());

        assert_eq!(settings.api_url, "http://127.0.0.1:5000/api");
        assert_eq!(settings.phrase_length, PhraseLength::TwentyFour);
        assert_eq!(settings.quiz_size, DEFAULT_QUIZ_SIZE);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "phrase_length = 13\n").unwrap();

        assert_eq!(Settings::new(dir.path()), Settings::default());
    }

    #[test]
    fn test_zero_quiz_size_loads_but_quiz_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "quiz_size = 0\n").unwrap();

        let settings = Settings::new(dir.path());

        assert_eq!(settings.quiz_size, 0);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert!(matches!(
            settings.quiz_config(),
            Err(mycoin::Error::InvalidQuizSize(0))
        ));
        assert_eq!(Settings::default().quiz_config().unwrap().size, DEFAULT_QUIZ_SIZE);
    }
}
