use std::env;
use std::fs::File;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::prompt::DEFAULT_MAX_TOKENS;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub model_path: PathBuf,
    pub n_threads: u32,
    pub context_size: u32,
    pub max_tokens: u32,
    pub no_mmap: bool,
    pub llama_server_bin: String,
    pub llama_server_port: u16,
    /// Attach to an already running runtime instead of spawning one.
    pub llama_server_url: Option<String>,
    pub inference_timeout: Duration,
    pub startup_timeout: Duration,
    /// Remote addresses allowed to call the service; `None` allows all.
    pub allowed_addrs: Option<Vec<IpAddr>>,
    /// Requests per client per minute; `None` disables limiting.
    pub rate_limit_per_minute: Option<u32>,
    pub log_file: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = lookup("MODEL_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AppError::StartupError("MODEL_PATH is not set".to_string()))?;
        check_model_file(&model_path)?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::StartupError(format!("Invalid host address: {}", e)))?;
        let port = parse_or(&lookup, "PORT", 8080u16)?;

        let llama_server_url = lookup("LLAMA_SERVER_URL").filter(|u| !u.trim().is_empty());

        let allowed_addrs = match lookup("ALLOWED_ADDRS").filter(|s| !s.trim().is_empty()) {
            Some(list) => Some(parse_addr_list(&list)?),
            None => None,
        };

        let rate_limit = parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 0u32)?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            model_path,
            n_threads: parse_or(&lookup, "N_THREADS", 8)?,
            context_size: parse_or(&lookup, "CONTEXT_SIZE", 2048)?,
            max_tokens: parse_or(&lookup, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            no_mmap: parse_flag(lookup("MODEL_NO_MMAP")),
            llama_server_bin: lookup("LLAMA_SERVER_BIN").unwrap_or_else(|| "llama-server".to_string()),
            llama_server_port: parse_or(&lookup, "LLAMA_SERVER_PORT", 8081)?,
            llama_server_url,
            inference_timeout: Duration::from_secs(parse_or(&lookup, "INFERENCE_TIMEOUT_SECS", 120)?),
            startup_timeout: Duration::from_secs(parse_or(&lookup, "STARTUP_TIMEOUT_SECS", 300)?),
            allowed_addrs,
            rate_limit_per_minute: (rate_limit > 0).then_some(rate_limit),
            log_file: lookup("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("summarizer.log")),
        })
    }

    /// Base URL of the runtime, either configured or the spawned one.
    pub fn runtime_url(&self) -> String {
        match &self.llama_server_url {
            Some(url) => url.clone(),
            None => format!("http://127.0.0.1:{}", self.llama_server_port),
        }
    }
}

fn check_model_file(path: &Path) -> Result<()> {
    let metadata = path.metadata().map_err(|e| {
        AppError::StartupError(format!("Model file {} is not accessible: {}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(AppError::StartupError(format!(
            "Model path {} is not a file",
            path.display()
        )));
    }
    File::open(path).map_err(|e| {
        AppError::StartupError(format!("Model file {} is not readable: {}", path.display(), e))
    })?;
    Ok(())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::StartupError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn parse_addr_list(list: &str) -> Result<Vec<IpAddr>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            IpAddr::from_str(s)
                .map_err(|e| AppError::StartupError(format!("Invalid address '{}' in ALLOWED_ADDRS: {}", s, e)))
        })
        .collect()
}
