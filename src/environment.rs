//! Selects which `config/<environment>.yaml` file the application loads.
//!
//! The environment comes from the `--environment` flag when given, otherwise
//! from `ONTOGRAPH_ENV`, otherwise it is `development`.

use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{config::Config, Result};

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const ENV_VAR: &str = "ONTOGRAPH_ENV";

#[must_use]
pub fn resolve_from_env() -> String {
    std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "production")]
    Production,
    #[serde(rename = "development")]
    Development,
    #[serde(rename = "test")]
    Test,
    Any(String),
}

impl Environment {
    /// Loads `config/<environment>.yaml` from the working directory.
    ///
    /// # Errors
    /// Fails when the file is missing or invalid.
    pub fn load(&self) -> Result<Config> {
        Config::new(self)
    }

    /// Loads `<path>/<environment>.yaml`.
    ///
    /// # Errors
    /// Fails when the file is missing or invalid.
    pub fn load_from_folder(&self, path: &Path) -> Result<Config> {
        Config::from_folder(self, path)
    }
}

impl From<String> for Environment {
    fn from(env: String) -> Self {
        Self::from_str(&env).unwrap_or(Self::Any(env))
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "production" => Self::Production,
            "development" => Self::Development,
            "test" => Self::Test,
            other => Self::Any(other.to_string()),
        })
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
            Self::Test => f.write_str("test"),
            Self::Any(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("production", Environment::Production)]
    #[case("development", Environment::Development)]
    #[case("test", Environment::Test)]
    #[case("staging", Environment::Any("staging".to_string()))]
    fn parses_and_displays(#[case] name: &str, #[case] expected: Environment) {
        let env = Environment::from(name.to_string());
        assert_eq!(env, expected);
        assert_eq!(env.to_string(), name);
    }
}
