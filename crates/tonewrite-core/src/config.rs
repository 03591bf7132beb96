//! Configuration module
//!
//! Process-wide settings are read once at startup from the environment (a `.env`
//! file is honoured through `dotenvy`). Nothing here is mutated after startup, so
//! request handlers share the same `Config` read-only.

use std::env;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DOCX_CONTENT_TYPE, MIN_UPLOAD_SIZE_BYTES};

// Common constants
const SERVER_PORT: u16 = 8080;
const OUTPUT_DIR: &str = "output";
const MAX_UPLOAD_SIZE_MB: usize = 20;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_MAX_TOKENS: u32 = 4096;
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

/// How the generation backend is invoked and what the caller gets back.
///
/// Resolved once from `PROCESSING_MODE` and passed explicitly to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Blocking backend call; the caller receives the full result.
    #[default]
    Synchronous,
    /// Non-blocking backend call; the caller receives an acknowledgement.
    Asynchronous,
}

impl ProcessingMode {
    /// Parse a configuration value. Anything other than `asynchronous` is synchronous.
    pub fn from_setting(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asynchronous") {
            ProcessingMode::Asynchronous
        } else {
            ProcessingMode::Synchronous
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Synchronous => "synchronous",
            ProcessingMode::Asynchronous => "asynchronous",
        }
    }
}

impl FromStr for ProcessingMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProcessingMode::from_setting(s))
    }
}

impl Display for ProcessingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Text-generation backend settings.
#[derive(Clone)]
pub struct GenerationConfig {
    pub backend: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub anthropic_api_base: String,
    /// Deadline forwarded to the backend; `None` leaves latency unbounded.
    pub timeout: Option<Duration>,
}

// Hand-written so the API key never reaches a log line.
impl Debug for GenerationConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GenerationConfig")
            .field("backend", &self.backend)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_max_tokens", &self.anthropic_max_tokens)
            .field("anthropic_api_base", &self.anthropic_api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: "anthropic".to_string(),
            anthropic_api_key: None,
            anthropic_model: ANTHROPIC_MODEL.to_string(),
            anthropic_max_tokens: ANTHROPIC_MAX_TOKENS,
            anthropic_api_base: ANTHROPIC_API_BASE.to_string(),
            timeout: None,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub processing_mode: ProcessingMode,
    /// Root directory for generated output documents.
    pub output_dir: PathBuf,
    /// Accepted upload media types, lowercased. Empty accepts any type.
    pub allowed_upload_content_types: Vec<String>,
    pub max_upload_size_bytes: usize,
    /// Requests served at once across the whole server.
    pub http_concurrency_limit: usize,
    pub log_format: String,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            processing_mode: ProcessingMode::default(),
            output_dir: PathBuf::from(OUTPUT_DIR),
            allowed_upload_content_types: vec![DOCX_CONTENT_TYPE.to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: "compact".to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a valid port number: {}", e))?;

        let processing_mode = env::var("PROCESSING_MODE")
            .map(|v| ProcessingMode::from_setting(&v))
            .unwrap_or_default();

        let output_dir = env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(OUTPUT_DIR));

        // Unset falls back to the docx type; set-but-empty means "accept anything".
        let allowed_upload_content_types = match env::var("ALLOWED_UPLOAD_CONTENT_TYPES") {
            Ok(raw) => parse_content_type_list(&raw),
            Err(_) => vec![DOCX_CONTENT_TYPE.to_string()],
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = upload_limit_bytes(max_upload_size_mb)?;

        let http_concurrency_limit = env::var("HTTP_CONCURRENCY_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(HTTP_CONCURRENCY_LIMIT)
            .max(1);

        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

        let timeout = env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let generation = GenerationConfig {
            backend: env::var("GENERATION_BACKEND")
                .map(|b| b.trim().to_lowercase())
                .unwrap_or_else(|_| "anthropic".to_string()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| ANTHROPIC_MODEL.to_string()),
            anthropic_max_tokens: env::var("ANTHROPIC_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(ANTHROPIC_MAX_TOKENS),
            anthropic_api_base: env::var("ANTHROPIC_API_BASE")
                .unwrap_or_else(|_| ANTHROPIC_API_BASE.to_string()),
            timeout,
        };

        Ok(Config {
            server_port,
            environment,
            processing_mode,
            output_dir,
            allowed_upload_content_types,
            max_upload_size_bytes,
            http_concurrency_limit,
            log_format,
            generation,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("OUTPUT_DIR must not be empty"));
        }

        if (self.max_upload_size_bytes as u64) < MIN_UPLOAD_SIZE_BYTES {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_MB must allow at least {} bytes",
                MIN_UPLOAD_SIZE_BYTES
            ));
        }

        match self.generation.backend.as_str() {
            "anthropic" => {
                if self.generation.anthropic_api_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "ANTHROPIC_API_KEY is required when GENERATION_BACKEND=anthropic"
                    ));
                }
            }
            other => {
                return Err(anyhow::anyhow!("Unsupported GENERATION_BACKEND: {}", other));
            }
        }

        Ok(())
    }

    pub fn processing_mode(&self) -> ProcessingMode {
        self.processing_mode
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn allowed_upload_content_types(&self) -> &[String] {
        &self.allowed_upload_content_types
    }
}

/// `MAX_UPLOAD_SIZE_MB` in bytes; a value that does not fit is a configuration error.
pub fn upload_limit_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", megabytes))
}

/// Split a comma separated media type list, normalising case and dropping blanks.
pub fn parse_content_type_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
