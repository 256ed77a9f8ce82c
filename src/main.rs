//! Absensi Editor - desktop editor for attendance records.

use std::path::PathBuf;
use std::sync::Arc;

use absensi_editor as app;
use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::auth::TOKEN_KEY;
use app::client::AbsensiClient;
use app::config::{AppConfig, ConfigLoadResult, LoggingConfig};
use app::routes::Route;
use app::ui::App;

/// Desktop editor for attendance (absensi) records.
#[derive(Parser)]
#[command(name = "absensi-editor")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Open the edit screen for this record id
    #[arg(long)]
    id: Option<String>,

    /// Persist this bearer token before starting
    #[arg(long, value_name = "TOKEN")]
    set_token: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let loaded = AppConfig::try_load(&config_path);

    // Initialize logging
    let logging = match &loaded {
        ConfigLoadResult::Loaded(config) => config.logging.clone(),
        _ => LoggingConfig::default(),
    };
    let _log_guard = app::logging::init(&logging);

    tracing::info!("Absensi Editor starting...");
    if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
    }
    tracing::info!("Config path: {:?}", config_path);

    let config = match loaded {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            match config.save(&config_path) {
                Ok(()) => tracing::info!("Config missing, wrote defaults"),
                Err(e) => tracing::warn!("Config missing, defaults not written: {}", e),
            }
            config
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::error!("Config invalid: {}", e);
            anyhow::bail!("invalid config {}: {}", config_path.display(), e);
        }
    };

    let store = config.token_store();
    tracing::info!("Storage path: {:?}", store.path());
    if let Some(token) = cli.set_token.as_deref() {
        store.set(TOKEN_KEY, token).context("Failed to persist token")?;
        tracing::info!("Token saved");
    }

    let client = AbsensiClient::new(&config.api.base_url, config.api.timeout(), Arc::new(store.clone()))
        .context("Failed to create API client")?;

    let start = cli.id.map(Route::EditAbsen).unwrap_or_else(|| config.start_route());

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Absensi Editor")
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Absensi Editor",
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(App::new(rt, client, store, config, config_path, start)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
