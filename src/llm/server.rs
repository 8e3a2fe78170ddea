use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm::LlamaServerClient;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A `llama-server` child process owned by this service. The child is
/// killed when this value is dropped.
pub struct LlamaServerProcess {
    child: Child,
}

impl LlamaServerProcess {
    pub fn spawn(config: &Config) -> Result<Self> {
        let args = runtime_args(config);
        info!("Spawning {} {}", config.llama_server_bin, args.join(" "));

        let child = Command::new(&config.llama_server_bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::StartupError(format!(
                    "Failed to start {}: {}",
                    config.llama_server_bin, e
                ))
            })?;

        Ok(LlamaServerProcess { child })
    }

    fn check_alive(&mut self) -> Result<()> {
        match self.child.try_wait()? {
            Some(status) => Err(AppError::StartupError(format!(
                "Model runtime exited during startup ({})",
                status
            ))),
            None => Ok(()),
        }
    }
}

/// Command-line arguments for a spawned runtime.
pub fn runtime_args(config: &Config) -> Vec<String> {
    let mut args = vec![
        "-m".to_string(),
        config.model_path.display().to_string(),
        "-c".to_string(),
        config.context_size.to_string(),
        "-t".to_string(),
        config.n_threads.to_string(),
        "--host".to_string(),
        "127.0.0.1".to_string(),
        "--port".to_string(),
        config.llama_server_port.to_string(),
    ];
    if config.no_mmap {
        args.push("--no-mmap".to_string());
    }
    args
}

/// Polls the runtime's health endpoint until the model is loaded.
pub async fn wait_until_ready(
    client: &LlamaServerClient,
    mut process: Option<&mut LlamaServerProcess>,
    deadline: Duration,
) -> Result<()> {
    let started = Instant::now();
    loop {
        if client.is_healthy().await {
            info!("Model runtime ready at {} after {:?}", client.base_url(), started.elapsed());
            return Ok(());
        }
        if let Some(process) = process.as_deref_mut() {
            process.check_alive()?;
        }
        if started.elapsed() >= deadline {
            warn!("Model runtime not ready after {:?}", deadline);
            return Err(AppError::StartupError(format!(
                "Model runtime at {} did not become ready within {:?}",
                client.base_url(),
                deadline
            )));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
