use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trip_planner::cache::CacheConfig;
use trip_planner::fares::{FareTable, load_fares, write_template_file};
use trip_planner::planner::{
    Planner, ScenarioFilter, TripConfig, best_per_scenario, top_across_scenarios,
};
use trip_planner::report::{render_itineraries, render_summary_table};
use trip_planner::web::{AppState, SearchItinerariesResponse, SummaryResponse, create_router};

#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(about = "Find the cheapest multi-city itinerary from a CSV of nonstop fares", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a fare CSV template and exit
    Template {
        /// Where to write the template
        path: PathBuf,
    },

    /// Search for itineraries and print them
    Search(SearchArgs),

    /// Serve the web interface
    Serve(ServeArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Path to the fares CSV
    #[arg(long)]
    csv: PathBuf,

    /// Path to a JSON trip configuration (defaults to the built-in trip)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Show top N results (default from config)
    #[arg(long)]
    top: Option<usize>,

    /// Only start in this departure window
    #[arg(long)]
    window: Option<String>,

    /// Only itineraries that include the optional city
    #[arg(long, conflicts_with = "exclude_extra")]
    include_extra: bool,

    /// Only itineraries that leave out the optional city
    #[arg(long)]
    exclude_extra: bool,

    /// Print the cheapest itinerary per window, with and without the optional city
    #[arg(long)]
    summary_table: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn scenario(&self) -> ScenarioFilter {
        match (self.include_extra, self.exclude_extra) {
            (true, _) => ScenarioFilter::IncludeOnly,
            (false, true) => ScenarioFilter::ExcludeOnly,
            (false, false) => ScenarioFilter::Both,
        }
    }
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Template { path } => {
            write_template_file(&path)
                .with_context(|| format!("failed to write template to {}", path.display()))?;
            println!("Wrote CSV template to {}", path.display());
            Ok(())
        }
        Commands::Search(args) => search(&args),
        Commands::Serve(args) => serve(args).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<TripConfig> {
    match path {
        Some(path) => TripConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(TripConfig::default()),
    }
}

fn load(source: &SourceArgs) -> Result<(FareTable, TripConfig)> {
    let config = load_config(source.config.as_deref())?;
    let fares = load_fares(&source.csv)
        .with_context(|| format!("failed to load fares from {}", source.csv.display()))?;
    let table = FareTable::build(fares);
    info!(
        fares = table.len(),
        routes = table.route_count(),
        "loaded fare table"
    );
    Ok((table, config))
}

fn search(args: &SearchArgs) -> Result<()> {
    let (table, config) = load(&args.source)?;
    let windows = config.select_windows(args.window.as_deref())?;
    let planner = Planner::new(&table, &config);

    if args.summary_table {
        let matrix = best_per_scenario(&planner, &config, &windows)?;
        if args.json {
            let optional_city = config.optional_city.map(|s| s.city.to_string());
            let response = SummaryResponse::from_matrix(&matrix, optional_city);
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", render_summary_table(&matrix, &config.optional_label()));
            let selected: Vec<_> = matrix.selected().into_iter().cloned().collect();
            print!("{}", render_itineraries(&selected, config.home));
        }
        return Ok(());
    }

    let top = args.top.unwrap_or(config.max_results);
    let found = top_across_scenarios(&planner, &config, args.scenario(), &windows, top)?;
    if args.json {
        let response = SearchItinerariesResponse::from_itineraries(&found);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_itineraries(&found, config.home));
    }
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let (table, config) = load(&args.source)?;
    let state = AppState::new(table, config, &CacheConfig::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(addr = %args.addr, "trip planner listening");
    info!("  GET  /health               - Health check");
    info!("  GET  /                     - Web interface");
    info!("  POST /itineraries/search   - Search itineraries");
    info!("  GET  /itineraries/summary  - Best per window and scenario");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
