mod commands;
mod position;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gigmatch_core::DistanceUnit;
use gigmatch_geo::TravelMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gigmatch")]
#[command(about = "Location-aware job matching tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Great-circle distance between two points
    Distance {
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        from_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lng: f64,
        /// `miles` or `km`
        #[arg(long, default_value = "miles")]
        unit: DistanceUnit,
    },
    /// Resolve a free-text address to coordinates
    Geocode { address: String },
    /// Estimated travel distance and duration between two points
    Travel {
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        from_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lng: f64,
        #[arg(long, default_value = "driving")]
        mode: TravelMode,
    },
    /// Filter a JSON array of jobs to those near a point, nearest first
    Match {
        /// Path to a JSON file containing an array of job records
        #[arg(long)]
        jobs: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Radius in miles; falls back to `GIGMATCH_DEFAULT_RADIUS_MILES`
        #[arg(long)]
        radius: Option<f64>,
        /// Geocode jobs that carry an address but no coordinates first
        #[arg(long, default_value_t = false)]
        geocode: bool,
    },
    /// Open turn-by-turn directions in the system maps handler
    Directions {
        /// Street address or "lat,lng"
        destination: String,
        /// Print the URL instead of opening it
        #[arg(long, default_value_t = false)]
        print: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = gigmatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Distance {
            from_lat,
            from_lng,
            to_lat,
            to_lng,
            unit,
        } => {
            commands::run_distance(
                commands::coordinate(from_lat, from_lng)?,
                commands::coordinate(to_lat, to_lng)?,
                unit,
            );
            Ok(())
        }
        Commands::Geocode { address } => commands::run_geocode(&config, &address).await,
        Commands::Travel {
            from_lat,
            from_lng,
            to_lat,
            to_lng,
            mode,
        } => {
            commands::run_travel(
                &config,
                commands::coordinate(from_lat, from_lng)?,
                commands::coordinate(to_lat, to_lng)?,
                mode,
            )
            .await
        }
        Commands::Match {
            jobs,
            lat,
            lng,
            radius,
            geocode,
        } => {
            let radius = radius.or(config.default_radius_miles);
            commands::run_match(
                &config,
                &jobs,
                commands::coordinate(lat, lng)?,
                radius,
                geocode,
            )
            .await
        }
        Commands::Directions { destination, print } => {
            commands::run_directions(&destination, print).await;
            Ok(())
        }
    }
}
