use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, Level};

use campus_compass::config::AppConfig;
use campus_compass::geo::{self, Coordinate, Landmark, KPU_SURREY_LIBRARY};
use campus_compass::location::{ip, PositionFix, PositionProvider};
use campus_compass::server;

/// Campus Compass — how far are you from the KPU Surrey Library?
///
/// Prints the great-circle distance from a position to the library, or
/// serves a map view centered on you with the distance in a popup.
///
/// Examples:
///   compass
///   compass --lat 49.2827 --lng -123.1207
///   compass --offline
///   compass serve --port 8080
#[derive(Parser)]
#[command(name = "compass", version, about, long_about = None)]
struct Cli {
    /// Latitude (-90 to 90). Requires --lng.
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    lat: Option<f64>,

    /// Longitude (-180 to 180). Requires --lat.
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lng: Option<f64>,

    /// Skip IP geolocation and stay on the configured default position.
    #[arg(long)]
    offline: bool,

    /// Debug logging (shows swallowed lookup failures).
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the map view over HTTP.
    Serve {
        /// Bind address. Overrides server.host from the config.
        #[arg(long)]
        host: Option<String>,

        /// Port. Overrides server.port from the config.
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match cli.command {
        Some(Command::Serve { host, port }) => run_serve(cli.offline, config, host, port),
        None => run_distance(&cli, &config),
    }
}

// ─── One-shot distance report ────────────────────────────────────

#[derive(Serialize)]
struct DistanceReport {
    position: PositionFix,
    landmark: Landmark,
    distance_km: f64,
}

fn run_distance(cli: &Cli, config: &AppConfig) {
    let position = resolve_position(cli, config);
    let distance_km = KPU_SURREY_LIBRARY.distance_from(position.coordinate);

    // Banner to stderr, JSON to stdout.
    eprintln!(
        "  \u{1F4CD} {} ({})",
        geo::format_coords(position.coordinate),
        position.source
    );
    eprintln!(
        "  \u{1F4D0} {:.2} km to {}",
        distance_km, KPU_SURREY_LIBRARY.name
    );

    let report = DistanceReport {
        position,
        landmark: KPU_SURREY_LIBRARY,
        distance_km,
    };
    println!("{}", serde_json::to_string_pretty(&report).unwrap());
}

fn resolve_position(cli: &Cli, config: &AppConfig) -> PositionFix {
    // Priority: --lat/--lng > --offline > IP lookup > default

    if let (Some(lat), Some(lng)) = (cli.lat, cli.lng) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            eprintln!("Error: Invalid coordinates. Lat: -90..90, Lng: -180..180");
            std::process::exit(1);
        }
        return PositionFix::manual(Coordinate::new(lat, lng));
    }

    let default = config.locator.default_position();
    if cli.offline {
        return PositionFix::default_at(default);
    }

    match ip::locate(&config.locator.endpoint) {
        Ok(fix) => fix,
        Err(e) => {
            debug!(error = %e, "IP lookup failed; using the default position");
            PositionFix::default_at(default)
        }
    }
}

// ─── Serve ───────────────────────────────────────────────────────

fn run_serve(offline: bool, mut config: AppConfig, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let default = config.locator.default_position();
    let provider = if offline {
        PositionProvider::offline(default)
    } else {
        PositionProvider::start(default, &config.locator.endpoint)
    };

    eprintln!("  Press Ctrl+C to stop.");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    if let Err(e) = runtime.block_on(server::start(&config, provider)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
