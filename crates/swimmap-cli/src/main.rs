use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use swimmap_core::{AppConfig, FacilityFilter, ViewConfig};
use tracing_subscriber::EnvFilter;

mod status;
mod view;

#[derive(Debug, Parser)]
#[command(name = "swimmap-cli")]
#[command(about = "Swimming facility map toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show open/closed status and today's price for every facility
    Status {
        /// Facilities JSON file (defaults to SWIMMAP_FACILITIES_PATH)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Evaluate at this local time instead of now ("YYYY-MM-DD HH:MM")
        #[arg(long)]
        at: Option<String>,
        /// Restrict to public or private operators
        #[arg(long, default_value = "all")]
        filter: FacilityFilter,
        /// Also print amenities, navigation links and the free-swim timetable
        #[arg(long)]
        details: bool,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compute the map pan that keeps a popup inside the viewport
    Shift {
        /// Map container as LEFT,TOP,WIDTH,HEIGHT
        #[arg(long, value_parser = view::parse_rect, allow_hyphen_values = true)]
        viewport: swimmap_viewport::ScreenRect,
        /// Popup bounds as LEFT,TOP,WIDTH,HEIGHT
        #[arg(long, value_parser = view::parse_rect, allow_hyphen_values = true)]
        popup: swimmap_viewport::ScreenRect,
        /// Inset from every viewport edge (defaults to the view settings)
        #[arg(long)]
        margin: Option<f64>,
        /// Horizontal shift limit (defaults to 40% of the width, at most 250)
        #[arg(long)]
        max_x: Option<f64>,
        /// Vertical shift limit (defaults to 40% of the height, at most 220)
        #[arg(long)]
        max_y: Option<f64>,
    },
    /// Compute the map center that puts a point on the focus anchor
    Focus {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Target zoom (defaults to the minimum selection zoom)
        #[arg(long)]
        zoom: Option<f64>,
        #[arg(long)]
        anchor_x: Option<f64>,
        #[arg(long)]
        anchor_y: Option<f64>,
        #[arg(long, default_value = "1280")]
        width: f64,
        #[arg(long, default_value = "800")]
        height: f64,
    },
    /// Print the effective view settings
    Settings,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = swimmap_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config)?;

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("swimmap-cli ready; see --help for commands");
        return Ok(());
    };

    let view = load_view_config(&config)?;
    match command {
        Commands::Status {
            file,
            at,
            filter,
            details,
            json,
        } => {
            let path = file.unwrap_or_else(|| config.facilities_path.clone());
            let now = status::parse_at(at.as_deref())?;
            status::run_status(&path, now, filter, details, json)
        }
        Commands::Shift {
            viewport,
            popup,
            margin,
            max_x,
            max_y,
        } => {
            view::run_shift(&view, viewport, popup, margin, max_x, max_y);
            Ok(())
        }
        Commands::Focus {
            lat,
            lng,
            zoom,
            anchor_x,
            anchor_y,
            width,
            height,
        } => view::run_focus(
            view,
            view::FocusArgs {
                lat,
                lng,
                zoom,
                anchor_x,
                anchor_y,
                width,
                height,
            },
        ),
        Commands::Settings => {
            view::run_settings(&config, &view);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise `SWIMMAP_LOG_LEVEL`.
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

/// A missing settings file means defaults; a broken one is an error.
fn load_view_config(config: &AppConfig) -> anyhow::Result<ViewConfig> {
    let path = &config.view_config_path;
    let settings = if path.exists() {
        swimmap_core::load_view_settings(path)
            .with_context(|| format!("failed to load view settings from {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "no view settings file; using defaults");
        swimmap_core::ViewSettingsFile::default()
    };
    Ok(ViewConfig::from_settings(&settings).with_app_config(config))
}
