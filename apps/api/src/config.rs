use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// The model credential is optional at startup: a missing key is reported
/// per call as a configuration error so the UI can still be served.
#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub demo_mode: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let deepseek_api_key = lookup("DEEPSEEK_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a positive integer")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        if max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }

        let demo_mode = match lookup("ADVISOR_DEMO_MODE") {
            Some(v) => parse_bool(&v)
                .with_context(|| format!("ADVISOR_DEMO_MODE must be a boolean, got '{v}'"))?,
            None => false,
        };

        Ok(Config {
            deepseek_api_key,
            demo_mode,
            max_upload_bytes,
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.deepseek_api_key.is_some()
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}
