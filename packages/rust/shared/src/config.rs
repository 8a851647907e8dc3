//! Application configuration for Semagent.
//!
//! User config lives at `~/.semagent/semagent.toml`. The file only holds
//! non-secret settings and the *names* of the environment variables that
//! carry endpoints and credentials — secrets never land on disk.
//! Env values override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SemagentError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "semagent.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".semagent";

// ---------------------------------------------------------------------------
// Config structs (matching semagent.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Concept taxonomy settings.
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,

    /// Document-search service settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Completion service settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[taxonomy]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Path to the Turtle taxonomy file.
    #[serde(default = "default_taxonomy_path")]
    pub path: String,

    /// Env var that overrides `path` when set.
    #[serde(default = "default_taxonomy_path_env")]
    pub path_env: String,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            path: default_taxonomy_path(),
            path_env: default_taxonomy_path_env(),
        }
    }
}

fn default_taxonomy_path() -> String {
    "data/knowledge_graph.ttl".into()
}
fn default_taxonomy_path_env() -> String {
    "SEMAGENT_TAXONOMY".into()
}

impl TaxonomyConfig {
    /// Resolve the taxonomy file path, honoring the env override.
    pub fn resolve_path(&self) -> PathBuf {
        match std::env::var(&self.path_env) {
            Ok(val) if !val.is_empty() => PathBuf::from(val),
            _ => PathBuf::from(&self.path),
        }
    }
}

/// `[search]` section.
///
/// The endpoint and key are read from the environment; the config file
/// only names the variables (never stores the values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name of the env var holding the search service endpoint URL.
    #[serde(default = "default_search_endpoint_env")]
    pub endpoint_env: String,

    /// Name of the env var holding the search API key.
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the index name.
    #[serde(default = "default_search_index_env")]
    pub index_env: String,

    /// Index name used when the env var is unset.
    #[serde(default = "default_search_index")]
    pub default_index: String,

    /// REST API version sent on every request.
    #[serde(default = "default_search_api_version")]
    pub api_version: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint_env: default_search_endpoint_env(),
            api_key_env: default_search_key_env(),
            index_env: default_search_index_env(),
            default_index: default_search_index(),
            api_version: default_search_api_version(),
        }
    }
}

fn default_search_endpoint_env() -> String {
    "AZURE_SEARCH_ENDPOINT".into()
}
fn default_search_key_env() -> String {
    "AZURE_SEARCH_KEY".into()
}
fn default_search_index_env() -> String {
    "AZURE_SEARCH_INDEX".into()
}
fn default_search_index() -> String {
    "pdf-index".into()
}
fn default_search_api_version() -> String {
    "2023-11-01".into()
}

/// `[completion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Name of the env var holding the completion service endpoint URL.
    #[serde(default = "default_completion_endpoint_env")]
    pub endpoint_env: String,

    /// Name of the env var holding the completion API key.
    #[serde(default = "default_completion_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the model deployment name.
    #[serde(default = "default_deployment_env")]
    pub deployment_env: String,

    /// REST API version sent on every request.
    #[serde(default = "default_completion_api_version")]
    pub api_version: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint_env: default_completion_endpoint_env(),
            api_key_env: default_completion_key_env(),
            deployment_env: default_deployment_env(),
            api_version: default_completion_api_version(),
        }
    }
}

fn default_completion_endpoint_env() -> String {
    "AZURE_OPENAI_ENDPOINT".into()
}
fn default_completion_key_env() -> String {
    "AZURE_OPENAI_KEY".into()
}
fn default_deployment_env() -> String {
    "AZURE_OPENAI_DEPLOYMENT_NAME".into()
}
fn default_completion_api_version() -> String {
    "2024-02-15-preview".into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".into()
}

// ---------------------------------------------------------------------------
// Resolved settings (runtime, merged from config + environment)
// ---------------------------------------------------------------------------

/// Resolved search service settings with the credential pulled from env.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: String,
    pub index: String,
    pub api_version: String,
}

/// Resolved completion service settings with the credential pulled from env.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

/// Read a required env var, failing fast with the variable name in the
/// message rather than silently proceeding with an empty value.
fn require_env(var_name: &str, what: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(SemagentError::config(format!(
            "{what} not found. Set the {var_name} environment variable."
        ))),
    }
}

impl SearchConfig {
    /// Resolve endpoint/key/index from the environment. Fails fast when
    /// the endpoint or key is missing; the index falls back to
    /// `default_index`.
    pub fn resolve(&self) -> Result<SearchSettings> {
        let endpoint = require_env(&self.endpoint_env, "search endpoint")?;
        let api_key = require_env(&self.api_key_env, "search API key")?;
        let index = match std::env::var(&self.index_env) {
            Ok(val) if !val.is_empty() => val,
            _ => self.default_index.clone(),
        };

        Ok(SearchSettings {
            endpoint,
            api_key,
            index,
            api_version: self.api_version.clone(),
        })
    }
}

impl CompletionConfig {
    /// Resolve endpoint/key/deployment from the environment. All three
    /// are required; absence fails fast.
    pub fn resolve(&self) -> Result<CompletionSettings> {
        Ok(CompletionSettings {
            endpoint: require_env(&self.endpoint_env, "completion endpoint")?,
            api_key: require_env(&self.api_key_env, "completion API key")?,
            deployment: require_env(&self.deployment_env, "model deployment name")?,
            api_version: self.api_version.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.semagent/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SemagentError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.semagent/semagent.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SemagentError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SemagentError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SemagentError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SemagentError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SemagentError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("AZURE_SEARCH_ENDPOINT"));
        assert!(toml_str.contains("AZURE_OPENAI_ENDPOINT"));
        assert!(toml_str.contains("knowledge_graph.ttl"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.default_index, "pdf-index");
        assert_eq!(parsed.completion.api_version, "2024-02-15-preview");
        assert_eq!(parsed.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[taxonomy]
path = "/srv/taxonomies/vendas.ttl"

[server]
bind = "127.0.0.1:9000"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.taxonomy.path, "/srv/taxonomies/vendas.ttl");
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        // Untouched sections keep their defaults
        assert_eq!(config.search.api_key_env, "AZURE_SEARCH_KEY");
    }

    #[test]
    fn search_resolve_fails_fast_without_endpoint() {
        // Unique env var names so the test cannot pick up real credentials
        let config = SearchConfig {
            endpoint_env: "SEMAGENT_TEST_NO_SUCH_ENDPOINT".into(),
            api_key_env: "SEMAGENT_TEST_NO_SUCH_KEY".into(),
            ..Default::default()
        };
        let result = config.resolve();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("SEMAGENT_TEST_NO_SUCH_ENDPOINT")
        );
    }

    #[test]
    fn completion_resolve_fails_fast_without_key() {
        let config = CompletionConfig {
            endpoint_env: "SEMAGENT_TEST_CPL_ENDPOINT_UNSET".into(),
            api_key_env: "SEMAGENT_TEST_CPL_KEY_UNSET".into(),
            deployment_env: "SEMAGENT_TEST_CPL_DEPLOY_UNSET".into(),
            ..Default::default()
        };
        assert!(config.resolve().is_err());
    }

    #[test]
    fn taxonomy_path_env_override() {
        let config = TaxonomyConfig {
            path: "data/knowledge_graph.ttl".into(),
            path_env: "SEMAGENT_TEST_TAXONOMY_OVERRIDE".into(),
        };
        // Env var unset: config path wins
        assert_eq!(
            config.resolve_path(),
            PathBuf::from("data/knowledge_graph.ttl")
        );

        // SAFETY: single-threaded test process section; var name is unique
        // to this test.
        unsafe { std::env::set_var("SEMAGENT_TEST_TAXONOMY_OVERRIDE", "/tmp/other.ttl") };
        assert_eq!(config.resolve_path(), PathBuf::from("/tmp/other.ttl"));
        unsafe { std::env::remove_var("SEMAGENT_TEST_TAXONOMY_OVERRIDE") };
    }
}
