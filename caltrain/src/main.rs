use std::process::ExitCode;

use chrono::{Local, NaiveDate, NaiveTime};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use caltrain::cache::ScheduleCache;
use caltrain::config::AppConfig;
use caltrain::domain::{Coordinates, Location, StationRegistry};
use caltrain::geocode::{GeocodeCache, GeocodeError, GoogleGeocoder, Resolver};
use caltrain::planner::{PlannerError, RoutePlanner, load_schedules};
use caltrain::timetable::{TimetableClient, TimetableError};

/// Caltrain station and route information.
///
/// Unless the fastest route is requested, prints the nearest station with
/// the departure that reaches the destination soonest. With a destination
/// and no starting point, prints the destination's schedule.
#[derive(Parser)]
#[command(name = "caltrain")]
struct Args {
    /// Return fastest route and duration
    #[arg(short = 'f')]
    fastest: bool,

    /// Return all routes (only for fastest)
    #[arg(short = 'a')]
    all: bool,

    /// Display all valid station names
    #[arg(short = 'n')]
    names: bool,

    /// Display all schedules (stations and times)
    #[arg(short = 's')]
    schedules: bool,

    /// Display output in JSON
    #[arg(short = 'j')]
    json: bool,

    /// Rebuild cache files
    #[arg(short = 'z')]
    rebuild: bool,

    /// Route from given date (uses current otherwise)
    #[arg(short = 'd', value_name = "mm-dd-yyyy")]
    date: Option<String>,

    /// Route from given time (uses current otherwise)
    #[arg(short = 't', value_name = "HH:MM")]
    time: Option<String>,

    /// Route from coordinates
    #[arg(short = 'c', value_name = "lat,lon", allow_hyphen_values = true)]
    coordinates: Option<String>,

    /// Route from geocoded text (address, city, etc)
    #[arg(short = 'g', value_name = "address")]
    address: Option<String>,

    /// Destination station name (use -n for valid names)
    destination: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Use date format mm-dd-yyyy")]
    Date,

    #[error("Use 24-hour time format HH:MM")]
    Time,

    #[error("Invalid coordinates. Check format.")]
    Coordinates,

    #[error("Missing destination station name")]
    MissingDestination,

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error("can't create timetable client: {0}")]
    Timetable(#[from] TimetableError),

    #[error("can't encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GeocodeError> for CliError {
    fn from(e: GeocodeError) -> Self {
        Self::Planner(e.into())
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(text.trim(), "%m-%d-%Y").map_err(|_| CliError::Date)
}

fn parse_time(text: &str) -> Result<NaiveTime, CliError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|_| CliError::Time)
}

fn parse_coordinates(text: &str) -> Result<Location, CliError> {
    let (lat, lon) = text.split_once(',').ok_or(CliError::Coordinates)?;
    let lat: f64 = lat.trim().parse().map_err(|_| CliError::Coordinates)?;
    let lon: f64 = lon.trim().parse().map_err(|_| CliError::Coordinates)?;
    if !Coordinates::new(lat, lon).is_valid() {
        return Err(CliError::Coordinates);
    }
    Ok(Location::from_coordinates(lat, lon))
}

/// The rider's starting point, preferring coordinates over an address.
fn starting_point(args: &Args) -> Result<Option<Location>, CliError> {
    if let Some(coordinates) = &args.coordinates {
        return parse_coordinates(coordinates).map(Some);
    }
    Ok(args
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| Location::from_address(a).non_cacheable()))
}

async fn run(args: Args) -> Result<(), CliError> {
    let now = Local::now().naive_local();
    let date = match args.date.as_deref() {
        Some(text) => parse_date(text)?,
        None => now.date(),
    };
    let time = match args.time.as_deref() {
        Some(text) => parse_time(text)?,
        None => now.time(),
    };
    let start = starting_point(&args)?;

    let config = AppConfig::from_env();
    let source = TimetableClient::new(config.timetable.clone())?;
    let cache = ScheduleCache::new(config.schedule_cache.clone());
    let mut registry = StationRegistry::new();
    let schedules = load_schedules(&source, &cache, &mut registry, args.rebuild).await?;
    let geocodes = GeocodeCache::load(&config.geocode_cache.path);

    if args.names {
        let planner = RoutePlanner::new(schedules, geocodes);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&planner.list_stations())?);
        } else {
            for name in planner.list_stations() {
                println!("{name}");
            }
        }
        return Ok(());
    }
    if args.schedules {
        let planner = RoutePlanner::new(schedules, geocodes);
        print!("{}", planner.details(None));
        return Ok(());
    }

    let destination = args.destination.ok_or(CliError::MissingDestination)?;
    if !schedules.serves(&destination) {
        return Err(PlannerError::UnknownStation {
            name: destination.trim().to_string(),
        }
        .into());
    }

    let Some(mut start) = start else {
        let planner = RoutePlanner::new(schedules, geocodes);
        print!("{}", planner.details(Some(&destination)));
        return Ok(());
    };

    let geocoder = GoogleGeocoder::new(config.geocoder.clone())?;
    let mut resolver = Resolver::new(geocoder, geocodes);
    resolver
        .resolve_stations_and_save(&registry, &config.geocode_cache.path)
        .await?;
    resolver.resolve(&mut start).await?;

    let planner = RoutePlanner::new(schedules, resolver.into_cache());
    let when = date.and_time(time);

    if args.fastest {
        let (origin, groups) = planner
            .get_fastest(when, &start, &destination, args.all)?
            .into_result()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&(origin, groups))?);
        } else {
            println!("{origin}");
            for group in groups {
                println!("\t{group}");
            }
        }
    } else {
        let (origin, departure) = planner
            .get_earliest(when, &start, &destination)?
            .into_result()?;
        if args.json {
            let output = (origin, departure.to_string());
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{origin}: {departure}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("for help use --help");
            ExitCode::from(2)
        }
    }
}
