use serde::Deserialize;
use std::path::PathBuf;

use crate::prompt::Prompt;
use crate::server::{Completion, Server};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: Server,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Server::default(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl Config {
    /// Loads the user's configuration from the location given by
    /// [`get_config_path`], falling back to the defaults if there is no
    /// configuration file.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configuration file exists
    /// but cannot be read or contains a parse error.
    pub fn load() -> Result<Self, String> {
        let Some(path) = get_config_path() else {
            log::debug!("home directory cannot be determined");
            return Ok(Self::default());
        };

        if !path.exists() {
            log::debug!("{path:?} not found, using defaults");
            return Ok(Self::default());
        }

        log::info!("loading configuration from {path:?}");

        Self::parse(
            &std::fs::read_to_string(&path)
                .map_err(|error| format!("{path:?}: {error}"))?,
        )
        .map_err(|error| format!("{path:?}: {error}"))
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|error| error.message().to_string())
    }

    /// Makes the value of the credential environment variable, if set
    /// and not blank, take precedence over the configured API key.
    pub fn apply_api_key(&mut self, from_env: Option<String>) {
        if let Some(key) = from_env.filter(|x| !x.trim().is_empty()) {
            self.server.api_key = Some(key);
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.server
            .api_key
            .as_deref()
            .is_some_and(|x| !x.trim().is_empty())
    }
}

impl Completion for Config {
    fn complete(&self, prompt: &Prompt) -> Result<String, String> {
        log::info!(
            "querying model {:?} at temperature {}",
            self.model,
            self.temperature
        );

        self.server.send(prompt, &self.model, self.temperature)
    }
}

/// Constructs the path to the user's configuration file
/// (`$HOME/.config/senmon/config.toml`).
///
/// Returns `None` if the user's home directory cannot be determined.
fn get_config_path() -> Option<PathBuf> {
    let mut path = std::env::home_dir()?;

    path.push(".config");
    path.push("senmon");
    path.push("config.toml");

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fills_in_defaults() {
        assert_eq!(Config::parse(""), Ok(Config::default()));

        let config = Config::parse("model = \"gpt-4o\"").unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.server, Server::default());
    }

    #[test]
    fn parse_reads_all_fields() {
        let config = Config::parse(
            r#"
            model = "local-model"
            temperature = 0.2

            [server]
            base-url = "http://localhost:8080/v1"
            api-key = "sk-test"
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                server: Server {
                    base_url: "http://localhost:8080/v1".to_string(),
                    api_key: Some("sk-test".to_string()),
                },
                model: "local-model".to_string(),
                temperature: 0.2,
            }
        );
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(Config::parse("temperature = \"hot\"").is_err());
    }

    #[test]
    fn apply_api_key_handles_all_scenarios() {
        #[rustfmt::skip]
        let table = &[
            // Fields:
            //
            // 1. expected key
            // 2. key from the configuration file
            // 3. key from the environment
            //
            (None,          None,          None),
            (None,          None,          Some("")),
            (Some("env"),   None,          Some("env")),
            (Some("file"),  Some("file"),  None),
            (Some("file"),  Some("file"),  Some("  ")),
            (Some("env"),   Some("file"),  Some("env")),
        ];

        for (expected, file, env) in table.iter() {
            dbg!((expected, file, env));

            let mut config = Config::default();
            config.server.api_key = file.map(str::to_string);
            config.apply_api_key(env.map(str::to_string));

            assert_eq!(config.server.api_key.as_deref(), *expected);
        }
    }

    #[test]
    fn has_api_key_ignores_blank_keys() {
        let mut config = Config::default();

        assert!(!config.has_api_key());

        config.server.api_key = Some(" ".to_string());
        assert!(!config.has_api_key());

        config.server.api_key = Some("sk-test".to_string());
        assert!(config.has_api_key());
    }
}
