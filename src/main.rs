//! `stockrecon` CLI - intake inventory reports, assign counts, reconcile stock

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockrecon")]
#[command(about = "Inventory report intake, count assignment and stock reconciliation")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/stockrecon/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding location data (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read an inventory report and replace the location's product list
    Intake {
        /// Fragment JSON file, or a PDF when built with the `pdf` feature
        file: PathBuf,

        /// Location key
        #[arg(short, long)]
        location: String,
    },

    /// Split the product list across a worker roster
    Assign {
        #[arg(short, long)]
        location: String,

        /// Roster JSON file
        #[arg(short, long)]
        roster: PathBuf,

        /// Correlative index the first worker starts at
        #[arg(short, long, default_value = "1")]
        start: usize,

        /// Only assign workers with this role
        #[arg(long)]
        role: Option<String>,

        /// Print ranges as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a physical count for a product
    #[command(group(
        ArgGroup::new("adjustment")
            .required(true)
            .args(["set", "add", "sub", "partials", "add_partial"])
    ))]
    Count {
        #[arg(short, long)]
        location: String,

        /// Product code
        #[arg(short, long)]
        code: String,

        /// Worker code stamped on the review
        #[arg(short, long)]
        worker: String,

        /// Set the counted quantity
        #[arg(long)]
        set: Option<u32>,

        /// Add to the counted quantity
        #[arg(long)]
        add: Option<u32>,

        /// Subtract from the counted quantity
        #[arg(long)]
        sub: Option<u32>,

        /// Partial counts to sum (comma-separated)
        #[arg(long, value_delimiter = ',')]
        partials: Option<Vec<u32>>,

        /// Append one partial count
        #[arg(long)]
        add_partial: Option<u32>,
    },

    /// Reset a product to uncounted
    Clear {
        #[arg(short, long)]
        location: String,

        #[arg(short, long)]
        code: String,
    },

    /// Set counted quantity to the system quantity without a recount
    #[command(group(ArgGroup::new("target").required(true).args(["code", "all"])))]
    Resolve {
        #[arg(short, long)]
        location: String,

        #[arg(short, long)]
        code: Option<String>,

        /// Resolve every product with a difference
        #[arg(long)]
        all: bool,
    },

    /// Show the product list and reconciliation totals
    Show {
        #[arg(short, long)]
        location: String,

        /// Roster JSON file, to show assignment ranges and progress
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "stockrecon=debug" } else { "stockrecon=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let app = cmd::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Commands::Intake { file, location } => {
            cmd::intake::cmd_intake(&app, &file, &location).await?;
        }
        Commands::Assign {
            location,
            roster,
            start,
            role,
            json,
        } => {
            cmd::assign::cmd_assign(&app, &location, &roster, start, role.as_deref(), json).await?;
        }
        Commands::Count {
            location,
            code,
            worker,
            set,
            add,
            sub,
            partials,
            add_partial,
        } => {
            let adjustment = cmd::review::adjustment(set, add, sub, partials, add_partial)?;
            cmd::review::cmd_count(&app, &location, &code, &worker, adjustment).await?;
        }
        Commands::Clear { location, code } => {
            cmd::review::cmd_clear(&app, &location, &code).await?;
        }
        Commands::Resolve {
            location,
            code,
            all,
        } => {
            cmd::review::cmd_resolve(&app, &location, code.as_deref(), all).await?;
        }
        Commands::Show {
            location,
            roster,
            json,
        } => {
            cmd::show::cmd_show(&app, &location, roster.as_deref(), json).await?;
        }
    }

    Ok(())
}
