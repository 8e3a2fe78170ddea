use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use scrape_summarizer::{
    config::Config,
    api::routes::create_router,
    llm::{server::wait_until_ready, LlamaServerClient, LlamaServerProcess},
    logging::setup_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    setup_logging(&config.log_file)?;
    info!("Using model {}", config.model_path.display());

    // Bring up the model runtime before accepting requests
    let client = LlamaServerClient::new(&config.runtime_url(), config.inference_timeout)?;
    let mut runtime = match config.llama_server_url {
        Some(_) => None,
        None => Some(LlamaServerProcess::spawn(&config)?),
    };
    wait_until_ready(&client, runtime.as_mut(), config.startup_timeout).await?;

    // Create application state
    let app_state = AppState::from_config(&config, Arc::new(client));

    // Build the router with routes
    let app = create_router(app_state)?;

    // Create the listener
    let listener = TcpListener::bind(config.server_addr).await?;

    // Start the server
    info!("Listening on {}", config.server_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    drop(runtime);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
