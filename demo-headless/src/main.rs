use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wui_fire_core::arrival_time::bin;
use wui_fire_core::{
    ArrivalMap, ArrivalTime, Environment, Footprint, ForestGrid, ForestState, HouseMaterial,
    Meters, Minutes, Simulation, SimulationConfig, Snapshot, Structure, StructureIgnition,
    StructureRegistry, UrbanState, WeatherType, ARRIVAL_BIN_EDGES,
};

/// Grid size of the reference scenario (cells per side)
const GRID_SIZE: usize = 80;
/// Row of the firebreak; its last column is left open
const FIREBREAK_ROW: usize = 25;

/// Symbols for the arrival-time classes, earliest first
const BIN_SYMBOLS: [char; 15] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e',
];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WeatherArg {
    Advantage,
    Neutral,
    Disadvantage,
}

impl From<WeatherArg> for WeatherType {
    fn from(arg: WeatherArg) -> Self {
        match arg {
            WeatherArg::Advantage => WeatherType::Advantage,
            WeatherArg::Neutral => WeatherType::Neutral,
            WeatherArg::Disadvantage => WeatherType::Disadvantage,
        }
    }
}

/// Wildland-urban fire demo on the reference 80x80 scenario
#[derive(Parser, Debug)]
#[command(name = "wui-fire-demo")]
#[command(about = "Wildland-urban interface fire simulation demo", long_about = None)]
struct Args {
    /// Simulated time in minutes
    #[arg(short, long, default_value_t = 600.0)]
    duration: f64,

    /// Temperature in °C
    #[arg(short, long, default_value_t = 30.0, value_parser = parse_temperature)]
    temperature: f64,

    /// Relative humidity in %
    #[arg(long, default_value_t = 20.0, value_parser = parse_humidity)]
    humidity: f64,

    /// Wind speed in m/s
    #[arg(short, long, default_value_t = 15.0, value_parser = parse_wind_speed)]
    wind_speed: f64,

    /// Bearing the wind blows toward in degrees (0=North/up, 90=East/right)
    #[arg(long, default_value_t = 30.0, value_parser = parse_bearing)]
    wind_direction: f64,

    /// Weather category for structure ignition
    #[arg(long, value_enum, default_value_t = WeatherArg::Neutral)]
    weather: WeatherArg,

    /// Cell side length in metres
    #[arg(long, default_value_t = 10.0, value_parser = parse_cell_length)]
    cell_length: f64,

    /// Row of the forest ignition point
    #[arg(long, default_value_t = 2)]
    ignite_row: usize,

    /// Column of the forest ignition point
    #[arg(long, default_value_t = 4)]
    ignite_col: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Ignited structures start at SU1 instead of SU3
    #[arg(long)]
    progressive: bool,

    /// Report interval in minutes
    #[arg(short, long, default_value_t = 30.0)]
    report_interval: f64,

    /// Skip printing the time-to-fire map
    #[arg(long)]
    no_map: bool,

    /// Write the arrival map and final structure states as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    environment: &'a Environment,
    config: &'a SimulationConfig,
    elapsed: Minutes,
    ignition: (usize, usize),
    structures: &'a [Structure],
    arrival: &'a ArrivalMap,
}

/// Parse a finite float within `[min, max]`
fn parse_bounded(s: &str, min: f64, max: f64) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if !value.is_finite() || value < min || value > max {
        return Err(format!("{value} is outside [{min}, {max}]"));
    }
    Ok(value)
}

fn parse_temperature(s: &str) -> Result<f64, String> {
    parse_bounded(s, -273.15, f64::MAX)
}

fn parse_humidity(s: &str) -> Result<f64, String> {
    parse_bounded(s, 0.0, 100.0)
}

fn parse_wind_speed(s: &str) -> Result<f64, String> {
    parse_bounded(s, 0.0, f64::MAX)
}

fn parse_bearing(s: &str) -> Result<f64, String> {
    parse_bounded(s, f64::MIN, f64::MAX)
}

fn parse_cell_length(s: &str) -> Result<f64, String> {
    let value = parse_bounded(s, 0.0, f64::MAX)?;
    if value <= 0.0 {
        return Err("cell length must be positive".to_string());
    }
    Ok(value)
}

/// Forest masks and structures of the reference scenario
fn build_scenario(cell_length: f64) -> Result<(ForestGrid, StructureRegistry), Box<dyn Error>> {
    let forest_mask = vec![true; GRID_SIZE * GRID_SIZE];
    let mut incombustible = vec![false; GRID_SIZE * GRID_SIZE];
    for x in 0..GRID_SIZE - 1 {
        incombustible[FIREBREAK_ROW * GRID_SIZE + x] = true;
    }

    let forest = ForestGrid::new(
        GRID_SIZE,
        GRID_SIZE,
        Meters::new(cell_length),
        &forest_mask,
        &incombustible,
    )?;
    let house = Structure::new(Footprint::new(5, 5, 9, 9), HouseMaterial::Wood);
    let registry = StructureRegistry::new(GRID_SIZE, GRID_SIZE, vec![house])?;
    Ok((forest, registry))
}

fn print_progress(snapshots: &[Snapshot], interval: f64) {
    println!("Time(min) | Active | Pre-ign | Burned | Houses burning");
    println!("----------|--------|---------|--------|---------------");

    let mut next_report = interval.max(f64::MIN_POSITIVE);
    for (i, snapshot) in snapshots.iter().enumerate() {
        let last = i + 1 == snapshots.len();
        if *snapshot.time < next_report && !last {
            continue;
        }
        while next_report <= *snapshot.time {
            next_report += interval.max(f64::MIN_POSITIVE);
        }

        let burned =
            snapshot.count(ForestState::Consumed) + snapshot.count(ForestState::Extinguished);
        let houses = snapshot
            .structures
            .iter()
            .filter(|s| s.state.is_burning() && s.state != UrbanState::SU5)
            .count();
        println!(
            "{:9.1} | {:6} | {:7} | {:6} | {:14}",
            *snapshot.time,
            snapshot.count(ForestState::Active),
            snapshot.count(ForestState::PreIgnition),
            burned,
            houses
        );
    }
}

fn print_map(arrival: &ArrivalMap, forest: &ForestGrid, ignition: (usize, usize)) {
    println!("\nTime to fire (X = ignition, H = house, # = firebreak, . = unreached)");
    for y in 0..arrival.height {
        let row: String = (0..arrival.width)
            .map(|x| {
                if (y, x) == ignition {
                    return 'X';
                }
                match arrival.get(y, x) {
                    ArrivalTime::Structure => 'H',
                    ArrivalTime::Unreached if !forest.is_burnable(y, x) => '#',
                    ArrivalTime::Unreached => '.',
                    ArrivalTime::Reached(t) => bin(t).map_or('+', |b| BIN_SYMBOLS[b]),
                }
            })
            .collect();
        println!("{row}");
    }

    print!("\nLegend (minutes):");
    for (b, symbol) in BIN_SYMBOLS.iter().enumerate() {
        let lo = ARRIVAL_BIN_EDGES[b];
        let hi = ARRIVAL_BIN_EDGES[b + 1];
        print!(" {symbol}=[{lo},{hi})");
    }
    println!(" +=later");
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Wildland-Urban Fire Simulation Demo ===\n");

    let environment = Environment::new(
        args.temperature,
        args.wind_speed,
        args.humidity,
        args.wind_direction,
        args.weather.into(),
    );
    let config = SimulationConfig {
        structure_ignition: if args.progressive {
            StructureIgnition::Progressive
        } else {
            StructureIgnition::Transmitting
        },
        ..SimulationConfig::with_seed(args.seed)
    };

    let (forest, registry) = build_scenario(args.cell_length)?;
    let mut sim = Simulation::new(forest, registry, environment, config)?;

    println!(
        "Weather: {}, wind {} toward {}, RH {}, {:?}",
        environment.temperature,
        environment.wind_speed,
        environment.wind_direction,
        environment.relative_humidity,
        environment.weather
    );
    let rates = sim.spread_rates();
    println!(
        "Spread: R0 = {:.3}, dt = {:.3}, ignition latency = {:.3}, regime = {:?}\n",
        *rates.base,
        *rates.timestep,
        *rates.ignition_latency,
        sim.regime()
    );

    let ignition = (args.ignite_row, args.ignite_col);
    sim.ignite_forest(ignition.0, ignition.1)?;

    let snapshots = sim.run(Minutes::new(args.duration));
    info!("Recorded {} snapshots", snapshots.len());
    print_progress(&snapshots, args.report_interval);

    let arrival = ArrivalMap::from_snapshots(GRID_SIZE, GRID_SIZE, &snapshots);
    if !args.no_map {
        print_map(&arrival, sim.forest(), ignition);
    }

    println!("\n=== Simulation Complete ===");
    println!("Simulated time: {}", sim.elapsed());
    println!("Steps: {}", sim.steps());
    println!(
        "Cells reached by fire: {} of {}",
        arrival.reached_count(),
        sim.forest().len() - sim.forest().count(ForestState::Unburnable)
    );
    if let Some(latest) = arrival.latest() {
        println!("Last arrival: {latest}");
    }
    for (id, structure) in sim.structures().iter().enumerate() {
        println!(
            "House {} ({:?}, {} cells): {:?}",
            id,
            structure.material,
            structure.footprint.area(),
            structure.state
        );
    }

    if let Some(path) = &args.json {
        let report = Report {
            environment: sim.environment(),
            config: sim.config(),
            elapsed: sim.elapsed(),
            ignition,
            structures: sim.structures(),
            arrival: &arrival,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
        println!("Wrote report to {}", path.display());
    }

    Ok(())
}
