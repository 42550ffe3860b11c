//! Recicla Contigo CLI - report environmental problems and manage rewards.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in
//! recicla register -n "Ana Torres" -e ana@mail.pe -p secreto123
//!
//! # Report a problem with a photo taken at a fixed position
//! recicla report -d "Basura acumulada en la esquina" --photo foto.jpg --lat -11.87 --lon -77.13
//!
//! # Redeem an incentive
//! recicla redeem 1
//! ```
//!
//! # Environment Variables
//!
//! - `RECICLA_API_URL` - Backend base URL (required)
//! - `RECICLA_DATA_DIR` - Where the session and settings are kept
//! - `SENTRY_DSN` - Enables error reporting when set

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use recicla_client::media::CaptureOptions;
use recicla_core::filter::CategoryFilter;
use secrecy::SecretString;

mod commands;
mod console;
mod context;
mod telemetry;

use context::Context;

#[derive(Parser)]
#[command(name = "recicla")]
#[command(author, version, about = "Ventanilla Recicla Contigo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long, env = "RECICLA_PASSWORD", hide_env_values = true)]
        password: SecretString,

        /// Password confirmation; defaults to the password
        #[arg(long, hide_env_values = true)]
        confirm: Option<SecretString>,

        /// Home latitude
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Home longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Sign in with an existing account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "RECICLA_PASSWORD", hide_env_values = true)]
        password: SecretString,
    },
    /// Sign out and forget the cached profile
    Logout,
    /// Show the profile, recent reports and notifications
    Whoami,
    /// Replace the profile photo
    Photo {
        /// Image file
        path: std::path::PathBuf,
    },
    /// Submit an environmental report
    Report {
        /// What is wrong
        #[arg(short, long)]
        description: String,

        /// Photo of the problem
        #[arg(long)]
        photo: std::path::PathBuf,

        /// Treat the photo as picked from the gallery instead of the camera
        #[arg(long)]
        gallery: bool,

        /// Latitude of the problem
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the problem
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// JPEG quality of the uploaded photo
        #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Longest side of the uploaded photo, in pixels
        #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(64..))]
        max_size: u32,
    },
    /// Latest community news
    News,
    /// Educational content
    Education {
        /// Category to show ("Todos" for all)
        #[arg(short, long, default_value = "Todos")]
        category: String,

        /// Text to search in titles and content
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Incentives available for points
    Incentives {
        /// Category to show ("Todos" for all)
        #[arg(short, long, default_value = "Todos")]
        category: String,
    },
    /// Exchange points for an incentive
    Redeem {
        /// Incentive ID
        id: String,
    },
    /// Reports on the community map
    Map,
    /// Community leaderboard
    Ranking,
    /// Notifications for the signed-in user
    Notifications {
        /// Delete a notification by ID
        #[arg(long)]
        dismiss: Option<i64>,
    },
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Switch between light and dark
    ToggleTheme,
    /// Turn the animated background on or off
    ToggleAnimation,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let _sentry_guard = match telemetry::SentryConfig::from_env() {
        Ok(config) => config.as_ref().map(telemetry::init_sentry),
        Err(e) => {
            telemetry::init_tracing();
            tracing::error!("Invalid telemetry configuration: {e}");
            std::process::exit(1);
        }
    };
    telemetry::init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open().await?;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            confirm,
            lat,
            lon,
        } => {
            let confirmation = confirm.unwrap_or_else(|| password.clone());
            let home = lat.zip(lon);
            commands::account::register(&ctx, name, email, &password, &confirmation, home).await?;
        }
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, &password).await?;
        }
        Commands::Logout => commands::account::logout(&ctx).await?,
        Commands::Whoami => commands::profile::whoami(&ctx).await?,
        Commands::Photo { path } => commands::profile::photo(&ctx, &path).await?,
        Commands::Report {
            description,
            photo,
            gallery,
            lat,
            lon,
            quality,
            max_size,
        } => {
            let capture = CaptureOptions {
                quality,
                max_dimension: max_size,
                ..CaptureOptions::default()
            };
            commands::report::submit(&ctx, description, photo, gallery, lat.zip(lon), capture)
                .await?;
        }
        Commands::News => commands::browse::news(&ctx).await?,
        Commands::Education { category, search } => {
            commands::browse::education(&ctx, CategoryFilter::parse(&category), search).await?;
        }
        Commands::Incentives { category } => {
            commands::browse::incentives(&ctx, CategoryFilter::parse(&category)).await?;
        }
        Commands::Redeem { id } => commands::browse::redeem(&ctx, &id).await?,
        Commands::Map => commands::browse::map(&ctx).await?,
        Commands::Ranking => commands::browse::ranking(&ctx).await?,
        Commands::Notifications { dismiss } => {
            commands::profile::notifications(&ctx, dismiss).await?;
        }
        Commands::Settings { action } => match action {
            None => commands::settings::show(&ctx).await?,
            Some(SettingsAction::ToggleTheme) => commands::settings::toggle_theme(&ctx).await?,
            Some(SettingsAction::ToggleAnimation) => {
                commands::settings::toggle_animation(&ctx).await?;
            }
        },
    }
    Ok(())
}
