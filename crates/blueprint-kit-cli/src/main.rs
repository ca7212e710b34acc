use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blueprint_kit_cli::commands::catalog::{handle_export_catalog, handle_export_command};
use blueprint_kit_cli::commands::codec::{handle_decode, handle_encode};
use blueprint_kit_cli::commands::generate::{handle_generate, GenerateArgs};
use blueprint_kit_cli::commands::recipes::{handle_recipes, RecipesArgs};
use blueprint_kit_cli::commands::signals::{handle_signals, SignalsArgs};
use blueprint_kit_cli::input::{load_catalog, load_settings, read_input, write_output};

#[derive(Parser, Debug)]
#[command(author, version, about = "Factorio blueprint generator and build-cost signal tools")]
struct Cli {
    /// Catalog export file (defaults to $BLUEPRINT_KIT_CATALOG, then the built-in vanilla catalog).
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Settings JSON file (defaults to $BLUEPRINT_KIT_SETTINGS, then built-in defaults).
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a "make everything" blueprint for the selected recipes.
    Generate(GenerateArgs),
    /// Convert a blueprint into constant combinators holding its build cost.
    Signals(SignalsArgs),
    /// Decode a blueprint string into pretty-printed JSON.
    Decode {
        /// File holding the blueprint string (defaults to stdin).
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Encode blueprint JSON into a blueprint string.
    Encode {
        /// File holding the JSON (defaults to stdin).
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// List catalog recipes.
    Recipes(RecipesArgs),
    /// Write the active catalog in import-file format.
    ExportCatalog {
        /// Destination file (defaults to stdout).
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the in-game console command that produces an import file.
    ExportCommand,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let output = match &cli.command {
        Command::Generate(args) => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let settings = load_settings(cli.settings.as_deref())?;
            handle_generate(catalog, settings, args)?
        }
        Command::Signals(args) => {
            let plan_string = read_input(args.input.as_deref())?;
            handle_signals(&plan_string, args)?
        }
        Command::Decode { input } => handle_decode(&read_input(input.as_deref())?)?,
        Command::Encode { input } => handle_encode(&read_input(input.as_deref())?)?,
        Command::Recipes(args) => handle_recipes(&*load_catalog(cli.catalog.as_deref())?, args)?,
        Command::ExportCatalog { output } => {
            let text = handle_export_catalog(&*load_catalog(cli.catalog.as_deref())?)?;
            return write_output(output.as_deref(), &text);
        }
        Command::ExportCommand => handle_export_command().to_string(),
    };

    write_output(None, &output)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
