//! # Robot API
//!
//! Entry point for the robot's local control-plane endpoint.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration from environment
//! 3. Load or create the API token (fatal on failure)
//! 4. Bind the listener
//! 5. Serve until Ctrl-C or SIGTERM

use anyhow::{Context, Result};
use robot_api::{load_or_create, ApiConfig, ApiService, VERSION};
use robot_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("failed to initialize logging")?;

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let token = load_or_create(&config.token_path).with_context(|| {
        format!(
            "cannot load or create API token at {}",
            config.token_path.display()
        )
    })?;

    let service = ApiService::from_config(config, token);
    let listener = service.bind().await.context("failed to bind listener")?;

    let config = service.config();
    info!(
        version = VERSION,
        addr = %config.bind_addr(),
        token_path = %config.token_path.display(),
        wifi_conf_path = %config.wifi_conf_path.display(),
        switch_command = %config.switch_command.program,
        cors_enabled = !config.allowed_origins.is_empty(),
        cors_origins = config.allowed_origins.len(),
        "Robot API starting"
    );

    service
        .serve(listener, shutdown_signal())
        .await
        .context("server error")?;

    info!("Robot API stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
