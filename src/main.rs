//! Airwatch Server
//!
//! Run with: cargo run
//!
//! Required environment variables:
//! - AIRWATCH_WEBHOOK_URL: Chat webhook receiving notifications
//! - AIRWATCH_FEED_TOKEN: WAQI API token
//!
//! Optional:
//! - AIRWATCH_LOCATION: Feed location (default: el-paso)
//! - AIRWATCH_FEED_HOST: Feed base URL (default: https://api.waqi.info)
//! - AIRWATCH_HOST / AIRWATCH_PORT: Liveness bind address (default: 0.0.0.0:8080)
//! - AIRWATCH_SCHEDULE: Comma-separated HH:MM check times (default: 08:30,10:30,12:00,14:00,16:00,18:00)
//! - AIRWATCH_UTC_OFFSET_HOURS: Offset for check times and timestamps (default: -6)
//! - AIRWATCH_REQUEST_TIMEOUT_SECS: Feed/webhook request timeout (default: 30)
//! - AIRWATCH_RUN_ON_START: Check once immediately at startup (default: true)
//! - RUST_LOG: Log level (default: info)
//!
//! A `.env` file in the working directory is loaded first if present.

use airwatch::api::run_server;
use airwatch::ServiceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airwatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!("Airwatch configuration:");
    tracing::info!("  Liveness: {}", config.bind_addr());
    tracing::info!("  Location: {}", config.location);
    tracing::info!("  Feed host: {}", config.feed_host);
    tracing::info!("  UTC offset: {}", config.utc_offset);
    tracing::info!(
        "  Check times: {}",
        config
            .schedule
            .times()
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "  Request timeout: {} seconds",
        config.request_timeout.as_secs()
    );
    tracing::info!("  Check on start: {}", config.run_on_start);

    println!(
        r#"
        _                    _       _
   __ _(_)_ ____      ____ _| |_ ___| |__
  / _` | | '__\ \ /\ / / _` | __/ __| '_ \
 | (_| | | |   \ V  V / (_| | || (__| | | |
  \__,_|_|_|    \_/\_/ \__,_|\__\___|_| |_|

 Scheduled Air-Quality Alerts
 Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );

    run_server(config).await
}
