//! # Configuration
//!
//! Settings live in `config/<environment>.yaml`. Each file is rendered as a
//! `tera` template before parsing, so values can be pulled from the process
//! environment:
//!
//! ```yaml
//! server:
//!   port: {{ get_env(name="PORT", default="5150") }}
//! ontology:
//!   document: {{ get_env(name="ONTOLOGY_DOCUMENT", default="data/psi-ms-zh.owl") }}
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    environment::Environment,
    logger,
    ontology::{document::DEFAULT_MAX_DOCUMENT_BYTES, VocabularySettings},
    Error, Result,
};

pub const DEFAULT_FOLDER: &str = "config";
pub const DEFAULT_EXPORT_DIR: &str = "exports";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub server: Server,
    pub ontology: OntologySettings,
}

/// Logger configuration.
///
/// Example (development):
/// ```yaml
/// logger:
///   enable: true
///   level: debug
///   format: compact
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logger {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default)]
    pub level: logger::LogLevel,
    #[serde(default)]
    pub format: logger::Format,
    /// Raw `EnvFilter` directive replacing the one derived from `level`.
    pub override_filter: Option<String>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: logger::LogLevel::default(),
            format: logger::Format::default(),
            override_filter: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default = "default_binding")]
    pub binding: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Allowed CORS origins, `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_allow_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            binding: default_binding(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            cors_allow_origins: default_cors_origins(),
        }
    }
}

/// Where the ontology comes from and how long a compiled graph stays cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologySettings {
    /// RDF/XML document (`.owl`, `.rdf` or `.xml`).
    pub document: PathBuf,
    #[serde(default = "default_true")]
    pub clean_markup: bool,
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
    /// Snapshot lifetime in seconds. `0` rebuilds on every operation.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Build the first snapshot while booting instead of on first request.
    #[serde(default)]
    pub preload: bool,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub vocabulary: VocabularySettings,
}

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            document: PathBuf::from("ontology.owl"),
            clean_markup: true,
            max_document_bytes: default_max_document_bytes(),
            cache_ttl_secs: default_cache_ttl_secs(),
            preload: false,
            export_dir: default_export_dir(),
            vocabulary: VocabularySettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_binding() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5150
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_document_bytes() -> u64 {
    DEFAULT_MAX_DOCUMENT_BYTES
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

impl Config {
    /// Loads the configuration of `env` from the `config` folder.
    ///
    /// # Errors
    /// Fails when the file is missing, cannot be rendered or is invalid YAML.
    pub fn new(env: &Environment) -> Result<Self> {
        Self::from_folder(env, Path::new(DEFAULT_FOLDER))
    }

    /// Loads `<path>/<env>.yaml`.
    ///
    /// # Errors
    /// Fails when the file is missing, cannot be rendered or is invalid YAML.
    pub fn from_folder(env: &Environment, path: &Path) -> Result<Self> {
        let file = path.join(format!("{env}.yaml"));
        if !file.exists() {
            return Err(Error::Message(format!(
                "no configuration file found at `{}`",
                file.display()
            )));
        }
        let content = fs::read_to_string(&file)?;
        let config = Self::parse(&content)?;
        tracing::debug!(file = %file.display(), "config_loaded");
        Ok(config)
    }

    /// Renders `content` as a template and parses the result.
    ///
    /// # Errors
    /// Fails on template or YAML errors.
    pub fn parse(content: &str) -> Result<Self> {
        let rendered = tera::Tera::one_off(content, &tera::Context::new(), false)?;
        Ok(serde_yaml::from_str(&rendered)?)
    }
}
