use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a journal directory.
///
/// Controls which generative model is used, where its API key comes from,
/// and how strictly the journal file is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Name of the generative model used for reflections.
    model: String,

    /// Base URL of the generative API.
    api_base: String,

    /// Environment variable holding the API key.
    api_key_env: String,

    /// Title used when no title can be generated for an entry.
    fallback_title: String,

    /// Whether to skip stored entries that cannot be read, rather than
    /// failing to open the journal.
    pub allow_invalid_entries: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            fallback_title: default_fallback_title(),
            allow_invalid_entries: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration, falling back to the default if the file is
    /// missing or unreadable.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The generative model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Base URL of the generative API, without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// Name of the environment variable holding the API key.
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    /// Title used when title generation fails.
    #[must_use]
    pub fn fallback_title(&self) -> &str {
        &self.fallback_title
    }

    /// Sets the generative model name.
    pub fn set_model(&mut self, model: String) {
        self.model = model;
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_fallback_title() -> String {
    "Reflexão do dia".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_model")]
        model: String,

        #[serde(default = "default_api_base")]
        api_base: String,

        #[serde(default = "default_api_key_env")]
        api_key_env: String,

        #[serde(default = "default_fallback_title")]
        fallback_title: String,

        #[serde(default)]
        allow_invalid_entries: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                model,
                api_base,
                api_key_env,
                fallback_title,
                allow_invalid_entries,
            } => Self {
                model,
                api_base,
                api_key_env,
                fallback_title,
                allow_invalid_entries,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            model: config.model,
            api_base: config.api_base,
            api_key_env: config.api_key_env,
            fallback_title: config.fallback_title,
            allow_invalid_entries: config.allow_invalid_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmodel = \"gemini-2.5-pro\"\napi_key_env = \"MY_KEY\"\nallow_invalid_entries = true\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.model(), "gemini-2.5-pro");
        assert_eq!(config.api_key_env(), "MY_KEY");
        assert_eq!(config.fallback_title(), "Reflexão do dia");
        assert!(config.allow_invalid_entries);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
        assert_eq!(Config::load_or_default(&missing), Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nallow_invalid_entries = \"yes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = Config::default();
        config.set_model("gemini-2.5-pro".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_base() {
        let config: Config = toml::from_str(
            "_version = \"1\"\napi_base = \"http://localhost:8080/v1beta/\"\n",
        )
        .unwrap();
        assert_eq!(config.api_base(), "http://localhost:8080/v1beta");
    }
}
