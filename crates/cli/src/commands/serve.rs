//! `slugline serve` — Start the HTTP API gateway.

use slugline_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Slugline Gateway");
    println!(
        "   Listening: {}:{}",
        config.gateway.host, config.gateway.port
    );

    slugline_gateway::start(config).await?;

    Ok(())
}
