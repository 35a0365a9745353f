use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use estate::logging;
use estate::manager::PropertyManager;
use estate::models::{Property, PropertyDetails, SearchCriteria, SortKey, SortOrder};
use estate::storage::{
    Config, ConfigStorage, CsvPropertyStore, TextReport, TomlConfigStorage, config_dir, data_dir,
};
use estate::ui::{ColorMode, Menu, StatusPainter, table};

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Real-estate property manager", long_about = None)]
struct Cli {
    /// Property CSV file (overrides the config file)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Configuration file (default: $XDG_CONFIG_HOME/estate/estate.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// When to color the status column
    #[arg(long, value_enum, global = true)]
    color: Option<ColorMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all properties
    List,

    /// Add a property
    Add {
        #[arg(short, long)]
        location: String,
        #[arg(short, long)]
        price: f64,
        #[arg(short, long)]
        bedrooms: u32,
        #[arg(short, long, default_value = "Available")]
        status: String,
    },

    /// Replace location, price, bedrooms and status of a property
    Update {
        id: String,
        #[arg(short, long)]
        location: String,
        #[arg(short, long)]
        price: f64,
        #[arg(short, long)]
        bedrooms: u32,
        #[arg(short, long)]
        status: String,
    },

    /// Delete a property
    Delete { id: String },

    /// Search properties
    Search {
        #[command(subcommand)]
        by: SearchBy,
    },

    /// Show properties sorted by price or bedrooms
    Sort {
        /// price or bedrooms
        key: String,
        #[arg(short, long)]
        descending: bool,
    },

    /// Write the fixed-width report
    Export {
        /// Report file (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SearchBy {
    /// Case-insensitive substring of the location
    Location { keyword: String },
    /// Inclusive price range
    Price { min: f64, max: f64 },
    /// Exact status, ignoring case
    Status { status: String },
    /// Inclusive bedroom range
    Bedrooms { min: u32, max: u32 },
}

impl From<SearchBy> for SearchCriteria {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Location { keyword } => SearchCriteria::location(&keyword),
            SearchBy::Price { min, max } => SearchCriteria::Price { min, max },
            SearchBy::Status { status } => SearchCriteria::status(&status),
            SearchBy::Bedrooms { min, max } => SearchCriteria::Bedrooms {
                min: min.into(),
                max: max.into(),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => config_dir()?.join("estate.toml"),
    };
    let config = TomlConfigStorage::new(config_path).load()?;

    logging::init(&config.logging)?;

    let data_file = match cli.file.clone() {
        Some(path) => path,
        None => config.general.data_file(data_dir)?,
    };
    let report_file = match &cli.command {
        Some(Commands::Export {
            output: Some(output),
        }) => output.clone(),
        _ => config.general.report_file(&data_file),
    };
    log::debug!("Data file: {:?}, report file: {:?}", data_file, report_file);

    let manager = PropertyManager::new(
        CsvPropertyStore::new(data_file, config.general.backup),
        TextReport::new(report_file),
    );
    let painter = build_painter(&config, cli.color)?;

    match cli.command {
        None => cmd_menu(&manager, &painter),
        Some(Commands::List) => cmd_list(&manager, &painter),
        Some(Commands::Add {
            location,
            price,
            bedrooms,
            status,
        }) => cmd_add(&manager, PropertyDetails::new(location, price, bedrooms, status)),
        Some(Commands::Update {
            id,
            location,
            price,
            bedrooms,
            status,
        }) => cmd_update(
            &manager,
            &id,
            PropertyDetails::new(location, price, bedrooms, status),
        ),
        Some(Commands::Delete { id }) => cmd_delete(&manager, &id),
        Some(Commands::Search { by }) => cmd_search(&manager, &painter, by.into()),
        Some(Commands::Sort { key, descending }) => cmd_sort(&manager, &painter, &key, descending),
        Some(Commands::Export { .. }) => cmd_export(&manager),
    }
}

/// Choose plain or colored output from flags, config and the terminal
fn build_painter(config: &Config, color: Option<ColorMode>) -> Result<StatusPainter> {
    let mode = color.unwrap_or(config.display.color);
    StatusPainter::detect(&config.display, mode, io::stdout().is_terminal())
        .context("Failed to set up status colors")
}

/// Print a table of properties
fn print_properties(properties: &[Property], painter: &StatusPainter) {
    println!("{}", table::header());
    println!("{}", table::separator());
    for property in properties {
        println!("{}", table::row(property, painter.paint(&property.status)));
    }
}

/// Run the interactive menu on stdin/stdout
fn cmd_menu(manager: &PropertyManager<CsvPropertyStore>, painter: &StatusPainter) -> Result<()> {
    log::info!("Starting interactive menu on {:?}", manager.store_path());
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(manager, painter, stdin.lock(), stdout.lock())
        .run()
        .context("Interactive session failed")
}

fn cmd_list(manager: &PropertyManager<CsvPropertyStore>, painter: &StatusPainter) -> Result<()> {
    let catalog = manager.list()?;
    if catalog.is_empty() {
        println!("No properties found.");
    } else {
        print_properties(catalog.properties(), painter);
    }
    Ok(())
}

fn cmd_add(manager: &PropertyManager<CsvPropertyStore>, details: PropertyDetails) -> Result<()> {
    if !details.price.is_finite() {
        bail!("Price must be a finite number");
    }
    let added = manager.add(details)?;
    println!("Property added! (ID {})", added.id);
    Ok(())
}

fn cmd_update(
    manager: &PropertyManager<CsvPropertyStore>,
    id: &str,
    details: PropertyDetails,
) -> Result<()> {
    if !details.price.is_finite() {
        bail!("Price must be a finite number");
    }
    if !manager.update(id, details)? {
        bail!("Property {} not found", id);
    }
    println!("Property updated.");
    Ok(())
}

fn cmd_delete(manager: &PropertyManager<CsvPropertyStore>, id: &str) -> Result<()> {
    if !manager.delete(id)? {
        bail!("Property {} not found", id);
    }
    println!("Property deleted.");
    Ok(())
}

fn cmd_search(
    manager: &PropertyManager<CsvPropertyStore>,
    painter: &StatusPainter,
    criteria: SearchCriteria,
) -> Result<()> {
    let found = manager.search(&criteria)?;
    if found.is_empty() {
        println!("No matching properties found.");
    } else {
        print_properties(&found, painter);
    }
    Ok(())
}

fn cmd_sort(
    manager: &PropertyManager<CsvPropertyStore>,
    painter: &StatusPainter,
    key: &str,
    descending: bool,
) -> Result<()> {
    let key: SortKey = key.parse()?;
    let sorted = manager.sort(key, SortOrder::from_descending(descending))?;
    print_properties(&sorted, painter);
    Ok(())
}

fn cmd_export(manager: &PropertyManager<CsvPropertyStore>) -> Result<()> {
    let rows = manager.export()?;
    println!(
        "Report with {} properties saved to {}",
        rows,
        manager.report_path().display()
    );
    Ok(())
}
