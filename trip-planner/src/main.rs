use std::process::ExitCode;

use clap::{Parser, Subcommand};
use trip_planner::cache::{CacheConfig, CachedTripPlanner};
use trip_planner::domain::{Journey, StopEvent, SydneyTime, upcoming};
use trip_planner::tfnsw::{DEFAULT_MAX_RESULTS, TripPlanner, TripPlannerConfig, TripPlannerError};

/// Query the Transport for NSW trip planner
#[derive(Parser)]
#[command(name = "trip-planner", version, about, long_about = None)]
#[command(after_help = "Set TFNSW_API_KEY to your Open Data API key. RUST_LOG controls logging.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search stops, places and addresses by name
    Stop {
        /// Search text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
        limit: usize,
    },

    /// Upcoming departures from a stop
    Departures {
        /// Stop id
        stop_id: String,

        /// Restrict to one platform of the stop
        platform_id: Option<String>,
    },

    /// Plan a trip between two stops
    Trip {
        /// Origin stop id
        origin: String,

        /// Destination stop id
        destination: String,

        /// Only use wheelchair-accessible services
        #[arg(long)]
        wheelchair: bool,
    },

    /// Service alerts, optionally for one stop
    Alerts {
        /// Stop id
        stop_id: Option<String>,

        /// Include alerts that are no longer current
        #[arg(long)]
        all: bool,
    },

    /// Places near a coordinate
    Nearby {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Search radius in metres
        #[arg(default_value_t = 500)]
        radius_m: u32,

        /// Location type to search for (e.g. BUS_POINT)
        #[arg(long = "type")]
        type_filter: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(TripPlannerError::InvalidRequest(msg)) => {
            eprintln!("Invalid request: {msg}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), TripPlannerError> {
    let config = TripPlannerConfig::from_env()?;
    let planner = CachedTripPlanner::new(TripPlanner::new(config)?, &CacheConfig::default());

    match command {
        Command::Stop { query, limit } => {
            let query = query.join(" ");
            let locations = planner.find_stop(&query, None, limit).await?;
            if locations.is_empty() {
                println!("No matches for {query:?}");
            }
            for location in locations.iter() {
                println!("{:>12}  {:<12} {}", location.id, location.kind.as_api_str(), location.name);
            }
        }
        Command::Departures { stop_id, platform_id } => {
            let events = planner
                .planner()
                .get_departures(&stop_id, platform_id.as_deref(), None)
                .await?;
            for event in upcoming(events) {
                println!("{}", departure_line(&event));
            }
        }
        Command::Trip { origin, destination, wheelchair } => {
            let journeys = planner
                .planner()
                .plan_trip(&origin, &destination, None, false, wheelchair)
                .await?;
            if journeys.is_empty() {
                println!("No journeys found");
            }
            for journey in &journeys {
                println!("{}", journey_line(journey));
            }
        }
        Command::Alerts { stop_id, all } => {
            let alerts = planner
                .planner()
                .get_alerts_with(stop_id.as_deref(), None, !all)
                .await?;
            for alert in &alerts {
                let priority = alert.priority.as_deref().unwrap_or("normal");
                println!("[{priority}] {}", alert.subtitle);
            }
        }
        Command::Nearby { latitude, longitude, radius_m, type_filter } => {
            let locations = planner
                .planner()
                .find_nearby(latitude, longitude, radius_m, type_filter.as_deref())
                .await?;
            for location in &locations {
                let distance = location
                    .distance_m
                    .map(|d| format!("{d} m"))
                    .unwrap_or_default();
                println!("{distance:>7}  {}", location.name);
            }
        }
    }

    Ok(())
}

fn departure_line(event: &StopEvent) -> String {
    let minutes = event
        .minutes_until_departure
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| "--".to_string());
    let destination = event.transport.destination_name.as_deref().unwrap_or("");
    let realtime = if event.is_realtime { "" } else { " (scheduled)" };
    format!(
        "{minutes:>7}  {:<6} {destination}{realtime}",
        event.transport.label()
    )
}

fn journey_line(journey: &Journey) -> String {
    let fare = journey
        .fare_summary()
        .map(|f| format!("  {f}"))
        .unwrap_or_default();
    format!(
        "{} → {}  {} min  {}{fare}",
        clock_time(journey.departure_time()),
        clock_time(journey.arrival_time()),
        journey.total_duration().num_minutes(),
        journey.summary()
    )
}

fn clock_time(t: Option<SydneyTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
