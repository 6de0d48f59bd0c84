pub mod types;
pub mod config;
pub mod roster;
pub mod seeding;
pub mod bracket;
pub mod ledger;
pub mod progression;
pub mod tournament;
pub mod commands;
pub mod overlay;

use config::*;
use types::*;
use tournament::Tournament;

use std::{
    fs,
    io,
    sync::{Arc, Mutex},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── Entry point ────────────────────────────────────────────────────────

pub fn run() {
    load_env_file();

    let (config, config_error) = match load_config_inner() {
        Ok(config) => (config, None),
        Err(e) => (apply_env_defaults(AppConfig::default()), Some(e)),
    };

    // Initialize tracing with file output; stdout belongs to the console
    let log_dir = logs_dir(&config);
    fs::create_dir_all(&log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&log_dir, "drift-bracket.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    info!("Drift bracket starting");
    if let Some(e) = config_error {
        error!("{e}; falling back to defaults");
        eprintln!("warning: {e}; falling back to defaults");
    }
    log_config_summary(&config);

    let overlay_addr = config.overlay_addr.trim().to_string();
    let overlay_dir = Some(config.overlay_dir.trim())
        .filter(|dir| !dir.is_empty())
        .map(resolve_repo_path);
    let shared: SharedTournament = Arc::new(Mutex::new(Tournament::new(config)));

    // Keep the runtime alive for the whole console session.
    let _runtime = if overlay_addr.is_empty() {
        None
    } else {
        match tokio::runtime::Runtime::new() {
            Ok(runtime) => {
                runtime.spawn(overlay::start_overlay_server(shared.clone(), overlay_dir, overlay_addr));
                Some(runtime)
            }
            Err(e) => {
                error!("failed to start overlay runtime: {e}");
                None
            }
        }
    };

    let stdin = io::stdin();
    if let Err(e) = commands::run_console(&shared, stdin.lock(), io::stdout()) {
        error!("console stopped: {e}");
        eprintln!("error: {e}");
    }
    info!("Drift bracket exiting");
}
