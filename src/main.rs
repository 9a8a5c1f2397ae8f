//! Clinic front desk dashboard: live queue, doctors and appointments.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::Parser;
use eframe::egui;
use frontdesk as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use app::api::ApiClient;
use app::config::{AppConfig, ConfigLoadResult, LoggingConfig};
use app::session::{Session, TokenStore};
use app::ui::App;

/// Clinic front desk dashboard.
#[derive(Parser)]
#[command(name = "frontdesk")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Override the API base URL from the config file
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

/// How the config file was found at startup.
enum ConfigStatus {
    Loaded,
    Missing,
    Invalid(String),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let (mut config, status) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, ConfigStatus::Loaded),
        ConfigLoadResult::Missing => (AppConfig::default(), ConfigStatus::Missing),
        ConfigLoadResult::Invalid(e) => (AppConfig::default(), ConfigStatus::Invalid(e.to_string())),
    };

    let data_dir = AppConfig::data_dir(&config_path, cli.dev);
    let _log_guard = init_logging(&config.logging, &data_dir);

    tracing::info!("Front desk starting...");
    tracing::info!("Config path: {:?}", config_path);

    let initial_error = match status {
        ConfigStatus::Loaded => {
            tracing::info!("Config loaded successfully");
            None
        }
        ConfigStatus::Missing => {
            tracing::info!("Config missing, writing defaults");
            if let Err(e) = config.save(&config_path) {
                tracing::warn!("Failed to write default config: {}", e);
            }
            None
        }
        ConfigStatus::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            Some(format!("Configuration error: {}. Default settings are in use.", e))
        }
    };

    if let Some(url) = cli.api_url {
        tracing::info!("API URL overridden from command line: {}", url);
        config.api.base_url = url;
        config.validate().context("Invalid --api-url")?;
    }

    let session = Session::persistent(TokenStore::in_dir(&data_dir));
    let api = ApiClient::new(&config.api, session).context("Failed to build HTTP client")?;
    tracing::info!("API server: {}", api.base_url());

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clinic Front Desk")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Clinic Front Desk",
        options,
        Box::new(move |cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(api, config, config_path, rt, initial_error)))
        }),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}

/// Register the icon font next to the default fonts.
fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Set up stdout logging plus an optional daily log file under `data_dir/logs`.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer and must live until exit.
fn init_logging(config: &LoggingConfig, data_dir: &Path) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("warn,frontdesk={}", config.level)));

    let mut file_error = None;
    let (file_layer, guard) = if config.file_logging {
        match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("frontdesk")
            .filename_suffix("log")
            .build(data_dir.join("logs"))
        {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                file_error = Some(e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("File logging disabled: {}", e);
    }

    guard
}
