mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use dash_model::config::Config;
use dash_model::{ChartCatalog, Seed, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = dash_model::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = dash_model::platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Config is read before logging starts so its filter can apply; a broken
    // file is reported once the subscriber is up.
    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Allow RUST_LOG override of the configured filter.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter.clone());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("dashboard log: {}", log_path.display());

    tracing::info!("dashboard starting…");
    if let Some(e) = config_err {
        tracing::warn!("config unreadable, using defaults: {:#}", e);
    }

    // ── Seed the board ───────────────────────────────────────────────────────
    let board = Seed::load_or_builtin(config.seed.path.as_deref())?.into_board()?;
    tracing::info!("loaded {} categories", board.len());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(Session::new(board), ChartCatalog::builtin(), &config.ui);
    app.run().await?;

    Ok(())
}
