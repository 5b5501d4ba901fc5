use std::path::PathBuf;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use scry::catalog::Catalog;
use scry::config::{CliConfig, Config};
use scry::dispatch::{self, Settings};
use scry::driver::{DriverError, PostgresDriver, RowSource, SchemaIntrospector};

/// scry - an interactive, dotted-path query language over a relational database.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run one query non-interactively and exit
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Driver-specific connection string
    #[arg(short = 'd', long = "database")]
    database: String,

    /// Default row limit (0 disables)
    #[arg(short = 'l', long = "limit", default_value_t = 100)]
    limit: u32,

    /// Default schema
    #[arg(short = 's', long = "schema", default_value = "scry")]
    schema: String,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        CliConfig {
            database: cli.database,
            schema: cli.schema,
            limit: cli.limit,
            complete_style: "column".to_string(),
            command: cli.command,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cli_config: CliConfig = cli.into();
    let config = match Config::from_cli(cli_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let mut driver = match PostgresDriver::connect(&config.database) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let catalog = match build_catalog(&mut driver) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    log::debug!(
        "catalog built: {} schemas, {} tables",
        catalog.schemas.len(),
        catalog.table_columns.len()
    );

    let mut settings = Settings::default();
    settings.config.insert("limit".to_string(), config.limit.to_string());
    settings.config.insert("search_path".to_string(), config.schema.clone());
    settings.config.insert("complete_style".to_string(), config.complete_style.clone());

    if let Some(command) = &config.command {
        run_line(command, &catalog, &mut settings, &mut driver);
        return;
    }

    run_repl(&catalog, &mut settings, &mut driver);
}

fn build_catalog(driver: &mut PostgresDriver) -> Result<Catalog, DriverError> {
    let columns = driver.all_columns()?;
    let constraints = driver.unique_constraints()?;
    let foreign_keys = driver.foreign_keys()?;
    Ok(Catalog::builder()
        .add_columns(columns)
        .add_constraints(constraints)
        .add_foreign_keys(foreign_keys)
        .build())
}

fn run_line(line: &str, catalog: &Catalog, settings: &mut Settings, driver: &mut dyn RowSource) {
    match dispatch::dispatch(line, catalog, settings, driver) {
        Ok(output) => println!("{output}"),
        Err(e) => eprintln!("{e}"),
    }
}

/// Thin interactive loop (C12): `rustyline` line editing plus an
/// append-only history file, and `scryrc` fed through the dispatcher
/// one line at a time before the first prompt (spec.md §6). History
/// and completion richness beyond this are explicitly out of scope
/// (spec.md §1) - this only satisfies the file contract.
fn run_repl(catalog: &Catalog, settings: &mut Settings, driver: &mut dyn RowSource) {
    let home = home_dir();
    let history_path = home.join(".scry").join("history");
    let scryrc_path = home.join(".scry").join("scryrc");

    if let Ok(contents) = std::fs::read_to_string(&scryrc_path) {
        for line in contents.lines() {
            let line = line.trim();
            if !line.is_empty() {
                run_line(line, catalog, settings, driver);
            }
        }
    }

    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("scry> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                run_line(line, catalog, settings, driver);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = editor.save_history(&history_path);
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
