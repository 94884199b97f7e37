use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-gateway")]
#[command(about = "PDF appliance - offload generating PDFs on demand for your application")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[arg(long, help = "Configuration file path (JSON, replaces environment loading)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Listen port (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Origin hostname pages are fetched from (overrides HOSTNAME)")]
    pub hostname: Option<String>,

    #[arg(long, help = "PDF paper format, e.g. letter or a4 (overrides FORMAT)")]
    pub format: Option<String>,

    #[arg(long, help = "Idle timeout in minutes (overrides TIMEOUT)")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Chrome executable path")]
    pub chrome_path: Option<String>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

pub fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
