mod boot;
mod list;
mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "annoscan",
    version,
    about = "Generate route and event registrations from docblock annotations",
    long_about = "Annoscan reads annotated PHP classes, resolves their route and event \
                  annotations and writes loadable registration files into the storage directory."
)]
pub struct Cli {
    /// Configuration file. Defaults to ./annoscan.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan annotated classes and write the routes file
    RouteScan {
        /// Application directory to scan instead of the configured `app_path`
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// Scan annotated classes and write the events file
    EventScan {
        /// Application directory to scan instead of the configured `app_path`
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// Print the resolved routes without writing anything
    RouteList {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run one boot pass: rescan if needed, then load the generated files
    Boot,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = annoscan_runtime::init_logging("cli", false);

    let config_path = cli
        .config
        .unwrap_or_else(annoscan_runtime::default_config_path);

    match cli.command {
        Commands::RouteScan { path } => {
            let orchestrator = annoscan_runtime::build_orchestrator(&config_path, path)?;
            scan::routes(&orchestrator)
        }
        Commands::EventScan { path } => {
            let orchestrator = annoscan_runtime::build_orchestrator(&config_path, path)?;
            scan::events(&orchestrator)
        }
        Commands::RouteList { json } => {
            let orchestrator = annoscan_runtime::build_orchestrator(&config_path, None)?;
            list::run(&orchestrator, json)
        }
        Commands::Boot => {
            let orchestrator = annoscan_runtime::build_orchestrator(&config_path, None)?;
            boot::run(&orchestrator)
        }
    }
}
