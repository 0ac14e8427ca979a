pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "supplybot",
    about = "Supplybot operator CLI",
    long_about = "Inspect configuration, prepare the supply chain store, and query it without the text-generation model.",
    after_help = "Examples:\n  supplybot doctor --json\n  supplybot seed\n  supplybot ask \"What is the stock of ProductX?\"\n  supplybot lookup order 456"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the sample supply chain rows if the table is empty")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and sample data presence")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Route a chat query and print the unphrased data string")]
    Ask {
        #[arg(required = true, num_args = 1.., help = "Query text, e.g. \"stock of ProductX\"")]
        query: Vec<String>,
    },
    #[command(about = "Run a single store lookup")]
    Lookup {
        #[command(subcommand)]
        target: LookupTarget,
    },
}

#[derive(Debug, Subcommand)]
enum LookupTarget {
    #[command(about = "Stock level for a product")]
    Stock { product: String },
    #[command(about = "Status of an order")]
    Order { order_id: i64 },
    #[command(about = "Current and previous price for a product")]
    Price { product: String },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Ask { query } => commands::ask::run(&query.join(" ")),
        Command::Lookup { target } => commands::lookup::run(match target {
            LookupTarget::Stock { product } => commands::lookup::Lookup::Stock(product),
            LookupTarget::Order { order_id } => commands::lookup::Lookup::Order(order_id),
            LookupTarget::Price { product } => commands::lookup::Lookup::Price(product),
        }),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
