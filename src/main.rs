mod config;
mod database;
mod decoder;
mod envelope;
mod handler;
mod models;
mod registry;
mod thingspeak;
mod utils;

use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use config::AppConfig;
use database::PostgresStore;
use envelope::UplinkEnvelope;
use handler::handle_uplink;
use registry::StaticRegistry;
use thingspeak::ThingSpeakClient;

/// Consume uplink envelopes from stdin, one JSON document per line, as the
/// broker bridge delivers them. Runs until the stream closes.
async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting beehive uplink recorder");

    let registry = StaticRegistry::from_file(&config.devices_file)?;
    info!(
        "Loaded {} devices from {}",
        registry.len(),
        config.devices_file
    );
    if registry.is_empty() {
        warn!("Device table is empty; readings will be recorded but never forwarded");
    }

    let store = PostgresStore::new(&config.database_url);
    let sink = ThingSpeakClient::new(&config.thingspeak_url)?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let uplink: UplinkEnvelope = match serde_json::from_str(line) {
            Ok(uplink) => uplink,
            Err(e) => {
                warn!("Skipping malformed envelope: {}", e);
                continue;
            }
        };

        if let Err(e) = handle_uplink(&uplink, &registry, &store, &sink).await {
            error!(
                "Failed to process uplink from {}: {}",
                uplink.end_device_ids.device_id, e
            );
        }
    }

    info!("Uplink stream closed");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match AppConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Run the ingest loop or wait for shutdown signal
    tokio::select! {
        result = run(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
