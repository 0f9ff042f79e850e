use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use txn_insights::{
    expenses, income, load_csv, refunds, send_message, summarize, AppConfig, ExpenseQuery,
    SourceArgs, Transaction,
};

/// Inspect the transaction CSV from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every record
    List,

    /// Print debits with their category
    Expenses {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Only this category label
        #[arg(long)]
        category: Option<String>,

        /// Substring of the description or category
        #[arg(long)]
        search: Option<String>,
    },

    /// Print non-payroll credits
    Refunds,

    /// Print payroll credits
    Income,

    /// Print totals by category and month
    Summary,

    /// Classify a single description
    Classify { description: String },

    /// Append a message to the mock sender's log
    Send { message: String },
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = AppConfig::from_args(&cli.source).context("Failed to load configuration")?;

    match cli.command {
        Command::List => {
            let records = load(&config)?;
            print_json(&records)?;
        }
        Command::Expenses {
            month,
            category,
            search,
        } => {
            let records = load(&config)?;
            let query = ExpenseQuery {
                month,
                category,
                search,
            };
            let found = query.apply(expenses(&records, &config.rules))?;
            print_json(&found)?;
        }
        Command::Refunds => {
            let records = load(&config)?;
            print_json(&refunds(&records))?;
        }
        Command::Income => {
            let records = load(&config)?;
            print_json(&income(&records))?;
        }
        Command::Summary => {
            let records = load(&config)?;
            print_json(&summarize(&records, &config.rules))?;
        }
        Command::Classify { description } => {
            println!("{}", config.rules.classify(&description));
        }
        Command::Send { message } => {
            let status = send_message(&config.messenger, config.secrets.as_ref(), &message)
                .context("Failed to send message")?;
            println!("{status}");
        }
    }

    Ok(())
}

fn load(config: &AppConfig) -> Result<Vec<Transaction>> {
    load_csv(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Logs go to stderr so stdout stays clean JSON. `RUST_LOG` overrides the default level.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", env!("CARGO_CRATE_NAME"))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
