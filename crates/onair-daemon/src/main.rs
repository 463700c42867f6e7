mod config;
mod http;
mod poll;
mod state;
mod timer;

use config::Config;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // File logging under the data dir
    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("onair-daemon.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,onair_daemon=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    let state = state::StateManager::new();
    let client = reqwest::Client::new();

    // First CMS load; failures are non-fatal, the refresh loop retries.
    poll::initial_load(&client, &config.cms, &state).await;

    let _cms_handle = poll::start_cms_refresh(client.clone(), config.cms.clone(), state.clone());
    let _live_handle = poll::start_live_poll(client.clone(), config.live.clone(), state.clone());
    let _timer = timer::RefreshTimer::start(state.clone());

    if config.http.enabled {
        let _http_handle =
            http::start_server(config.http.bind_address.clone(), config.http.port, state.clone());
    }

    info!("onair-daemon running; ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}
