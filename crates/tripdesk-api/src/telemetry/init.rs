use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Used when `RUST_LOG` is unset. The `audit` target must stay enabled: media
/// deletions are only recorded through it.
const DEFAULT_FILTER: &str = "tripdesk=debug,tripdesk_api=debug,tripdesk_db=debug,\
                              tripdesk_storage=debug,tower_http=debug,audit=info";

fn default_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter())
}

/// Initialize tracing.
///
/// Production emits one JSON object per event so the `audit` target can be
/// shipped as is; other environments get the compact console format.
pub fn init_telemetry(environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let production = matches!(environment.to_lowercase().as_str(), "production" | "prod");

    if production {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?;
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(env_filter())
            .with(console_fmt)
            .try_init()?;
    }

    tracing::info!(environment, "Tracing initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
