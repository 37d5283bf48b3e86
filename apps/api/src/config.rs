use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_REMOTE_COMPILE_URL: &str = "https://latexonline.cc/compile";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Application configuration loaded from environment variables.
/// Fails at startup if a provided value cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Optional key that pre-seeds the session credential. Usually set later via `/set-api-key`.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub templates_dir: PathBuf,
    pub remote_compile_url: String,
    pub enable_remote_compile: bool,
    pub local_compile_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: optional_env("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            templates_dir: optional_env("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_templates_dir),
            remote_compile_url: optional_env("REMOTE_COMPILE_URL")
                .unwrap_or_else(|| DEFAULT_REMOTE_COMPILE_URL.to_string()),
            enable_remote_compile: optional_env("ENABLE_REMOTE_COMPILE")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("ENABLE_REMOTE_COMPILE must be true or false")?
                .unwrap_or(true),
            local_compile_timeout_secs: optional_env("LOCAL_COMPILE_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LOCAL_COMPILE_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }

    /// Configuration used by tests and local tooling: bundled templates, no remote compile.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            templates_dir: default_templates_dir(),
            remote_compile_url: DEFAULT_REMOTE_COMPILE_URL.to_string(),
            enable_remote_compile: false,
            local_compile_timeout_secs: 5,
        }
    }
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

/// Reads an env var, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}
