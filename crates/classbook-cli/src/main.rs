//! Classbook CLI
//!
//! Interactive roster of students, tutors and lessons backed by a JSON file

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use classbook_core::logging_facility;
use classbook_core::Session;
use classbook_store::JsonFileStorage;

mod config;
mod parser;
mod repl;

use config::{Config, Overrides};

#[derive(Debug, Parser)]
#[command(name = "classbook")]
#[command(about = "Classbook - students, tutors and the lessons that join them", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Data file to load from and save to
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Logging profile (development or production)
    #[arg(long, value_name = "PROFILE")]
    log_profile: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = Overrides {
        data_file: cli.data_file,
        log_profile: cli.log_profile,
    };
    let config = Config::load(cli.config.as_deref(), &overrides)?;
    logging_facility::init(config.log_profile);

    let storage = JsonFileStorage::new(&config.data_file);
    let store = storage
        .load()
        .with_context(|| format!("Could not load {}", config.data_file.display()))?
        .unwrap_or_default();
    tracing::info!(
        data_file = %config.data_file.display(),
        persons = store.persons().len() as u64,
        lessons = store.lessons().len() as u64,
        "classbook started"
    );

    let mut session = Session::new(store, Box::new(storage));
    let stdin = io::stdin();
    let stdout = io::stdout();
    repl::run(&mut session, stdin.lock(), &mut stdout.lock())
}
