use clap::Parser;
use segment_builder::adapters::metrics_handler::MetricsCollector;
use segment_builder::adapters::relay_handler::WebhookRelay;
use segment_builder::cli::Cli;
use segment_builder::config::{watcher::ConfigWatcher, Settings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Segment Builder on {}:{}", host, port);
    if !settings.relay_configured() {
        warn!("No webhook URL configured; saved segments will be reported as failed");
    }

    // Wrap settings in Arc<RwLock> for live reload
    let settings = Arc::new(RwLock::new(settings));

    let settings_for_watcher = settings.clone();
    let cli_for_watcher = cli.clone();
    let _watcher = ConfigWatcher::new(vec![cli.config.clone()], move || {
        match Settings::new_with_cli(&cli_for_watcher) {
            Ok(new_settings) => {
                let mut w = settings_for_watcher.blocking_write();
                *w = new_settings;
                info!("Configuration reloaded successfully");
            }
            Err(e) => error!("Failed to reload configuration: {}", e),
        }
    })?;

    let metrics = Arc::new(MetricsCollector::new()?);
    let relay = Arc::new(WebhookRelay::new(settings.clone()));

    let app = segment_builder::create_app(settings, relay, metrics).await;

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
