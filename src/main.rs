use clap::Parser;
use emptrack::config::{self, Config};
use emptrack::core::db::{seed_sample_data, Gateway};
use emptrack::core::Result;
use emptrack::menu;
use emptrack::prompt::Console;
use emptrack::results_grid::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Interactive tracker for departments, roles and employees
#[derive(Parser, Debug)]
#[command(name = "emptrack", version, about)]
struct Args {
    /// SQLite database file, or ":memory:" for a throwaway session
    database: Option<String>,

    /// Configuration file (defaults to <config dir>/emptrack/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Insert a sample organization when the database is empty
    #[arg(long)]
    seed: bool,

    /// Print tables as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match config::resolve_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging.level);

    info!("Starting emptrack...");
    match run(args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, config: Config) -> Result<()> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        config.ui.output_format()?
    };
    let db_path = args.database.unwrap_or(config.database.path);

    let mut gateway = Gateway::open(&db_path)?;
    if args.seed || config.database.seed_sample_data {
        seed_sample_data(gateway.connection()?)?;
    }

    let mut console = Console::stdio(format);
    console.say(&format!("Welcome to emptrack! Database: {}", db_path))?;

    let outcome = menu::run(&mut gateway, &mut console);
    // No-op after Quit; releases the connection when the menu failed.
    let closed = gateway.close();
    outcome?;
    closed.map(|_| ())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
