use clap::Parser;
use pdf_gateway::{
    setup_logging, ChromiumEngine, Cli, Config, GatewayServer, IdleTimer, Metrics, RenderEngine,
    RenderService, ShutdownController, ShutdownReason,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    setup_logging(args.verbose)?;

    info!("Starting pdf-gateway v{}", env!("CARGO_PKG_VERSION"));

    // Missing or invalid configuration is fatal before any listener starts.
    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Launch the single shared browser engine; a launch failure is fatal.
    let engine: Arc<dyn RenderEngine> = match ChromiumEngine::launch(&config).await {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let shutdown = ShutdownController::new();
    let idle = IdleTimer::new(config.idle_timeout);
    let _idle_watcher = idle.clone().watch(shutdown.clone());
    let _signal_handler = setup_shutdown_handler(shutdown.clone());

    let renderer = RenderService::new(engine.clone());
    let metrics = Arc::new(Metrics::new());
    let server = GatewayServer::new(config.clone(), renderer, idle, shutdown.clone(), metrics);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    server.serve(addr).await?;

    // serve() returns only after in-flight renders have completed.
    info!("Exiting");
    engine.close().await;

    Ok(())
}

async fn load_config(args: &Cli) -> Result<Config, pdf_gateway::GatewayError> {
    let mut config = if let Some(config_path) = &args.config {
        let config_content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str(&config_content)?
    } else {
        Config::from_env()?
    };

    if let Some(port) = args.port {
        config.port = port;
    }

    if let Some(hostname) = &args.hostname {
        config.target_host = hostname.clone();
    }

    if let Some(format) = &args.format {
        config.page_format = format.parse()?;
    }

    if let Some(timeout) = args.timeout {
        config.idle_timeout = std::time::Duration::from_secs(timeout * 60);
    }

    if let Some(chrome_path) = &args.chrome_path {
        config.chrome_path = Some(chrome_path.clone());
    }

    validate_config(&config)?;

    info!("Origin host: {}", config.target_host);
    info!("Page format: {:?}", config.page_format);
    info!("JavaScript enabled: {}", config.javascript_enabled);
    info!("Idle timeout: {:?}", config.idle_timeout);

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), pdf_gateway::GatewayError> {
    if config.target_host.is_empty() {
        return Err(pdf_gateway::GatewayError::ConfigurationError(
            "HOSTNAME is required".to_string(),
        ));
    }

    if config.idle_timeout.as_secs() == 0 {
        return Err(pdf_gateway::GatewayError::ConfigurationError(
            "Idle timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn setup_shutdown_handler(shutdown: Arc<ShutdownController>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to create SIGINT handler");
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to create SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
        }

        shutdown.request(ShutdownReason::Signal);
    })
}
