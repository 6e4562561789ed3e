//! fieldops-match - address matching for jobs, submissions and customers
//!
//! CHANGELOG:
//! - 10/16/2026 - Added import and job-creation commands
//! - 10/16/2026 - Initial CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fieldops_match::commands;
use fieldops_match::config::{self, MatchConfig, MatchMode};
use fieldops_match::db::{connection::open_db, helpers};
use fieldops_match::matching::MatchOptions;
use fieldops_match::output::{self, OutputControls};

/// Address matching for field-service jobs, submissions and customers.
#[derive(Parser, Debug)]
#[command(name = "fieldops-match")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Comma-separated field allowlist for JSON output
    #[arg(long, global = true)]
    fields: Option<String>,

    /// SQLite store path (default: $FIELDOPS_DB_PATH or the data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    // =========================================================================
    // SETUP
    // =========================================================================
    /// Create the store schema
    Init,

    // =========================================================================
    // ADDRESS TOOLS
    // =========================================================================
    /// Print the normalized form of an address
    Normalize {
        address: String,
    },

    /// Compare two addresses after normalization
    Similarity {
        a: String,
        b: String,
    },

    // =========================================================================
    // JOB MATCHING
    // =========================================================================
    /// Best existing job for an address
    MatchJob {
        address: String,

        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,

        /// Only accept normalized-equal addresses
        #[arg(long)]
        exact_only: bool,
    },

    /// Ranked jobs for manual review
    JobMatches {
        address: String,

        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,
    },

    /// Import field submissions from a JSON file and link them to jobs
    Import {
        /// JSON array, or {"submissions": [...]}
        file: PathBuf,

        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,
    },

    // =========================================================================
    // CUSTOMER MATCHING
    // =========================================================================
    /// Best existing customer for an address
    MatchCustomer {
        address: String,

        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,

        /// Only accept normalized-equal addresses
        #[arg(long)]
        exact_only: bool,
    },

    /// Ranked customers for manual review
    CustomerMatches {
        address: String,

        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,
    },

    /// Link every job without a customer to its best customer match
    LinkCustomers {
        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,
    },

    /// Manually link a job to a customer
    LinkJob {
        job_id: String,
        customer_id: String,
    },

    // =========================================================================
    // RECORDS
    // =========================================================================
    /// Add a customer
    AddCustomer {
        name: String,
        address: Option<String>,
    },

    /// Add a job and link it to a matching customer
    AddJob {
        title: String,
        address: Option<String>,

        /// Create this customer when no existing one matches
        #[arg(short, long)]
        customer_name: Option<String>,

        /// Minimum similarity (0-1)
        #[arg(long, value_parser = parse_score)]
        min_score: Option<f64>,
    },

    /// List customers
    Customers,

    /// List jobs
    Jobs,
}

fn parse_score(s: &str) -> Result<f64, String> {
    let score: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(format!("{} is outside 0..=1", score))
    }
}

fn with_overrides(base: MatchOptions, min_score: Option<f64>, exact_only: bool) -> MatchOptions {
    let mut options = base;
    if let Some(score) = min_score {
        options.min_score = score;
    }
    options.exact_only(exact_only || base.exact_match_only)
}

/// Open the store, creating the schema on first use.
fn open_store(path: &Path) -> Result<Connection> {
    let conn = open_db(path).with_context(|| format!("Failed to open store {:?}", path))?;
    helpers::init_schema(&conn)?;
    Ok(conn)
}

fn run(cli: Cli, output: &OutputControls) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(config::default_db_path);
    let match_config = MatchConfig::load_default()?;
    let job_best = match_config.job_options(MatchMode::Best);
    let job_review = match_config.job_options(MatchMode::Review);
    let customer_best = match_config.customer_options(MatchMode::Best);
    let customer_review = match_config.customer_options(MatchMode::Review);

    match cli.command {
        Command::Init => {
            let conn = open_db(&db_path)
                .with_context(|| format!("Failed to open store {:?}", db_path))?;
            commands::setup::init(&conn, &db_path, output)
        }

        // Address tools
        Command::Normalize { address } => commands::matching::normalize(&address, output),
        Command::Similarity { a, b } => commands::matching::similarity(&a, &b, output),

        // Job matching
        Command::MatchJob { address, min_score, exact_only } => commands::matching::match_job(
            &open_store(&db_path)?,
            &address,
            with_overrides(job_best, min_score, exact_only),
            output,
        ),
        Command::JobMatches { address, min_score } => commands::matching::job_matches(
            &open_store(&db_path)?,
            &address,
            with_overrides(job_review, min_score, false),
            output,
        ),
        Command::Import { file, min_score } => commands::import::run(
            &open_store(&db_path)?,
            &file,
            with_overrides(job_best, min_score, false),
            output,
        ),

        // Customer matching
        Command::MatchCustomer { address, min_score, exact_only } => {
            commands::customers::match_customer(
                &open_store(&db_path)?,
                &address,
                with_overrides(customer_best, min_score, exact_only),
                output,
            )
        }
        Command::CustomerMatches { address, min_score } => commands::customers::customer_matches(
            &open_store(&db_path)?,
            &address,
            with_overrides(customer_review, min_score, false),
            output,
        ),
        Command::LinkCustomers { min_score } => commands::customers::link_customers(
            &open_store(&db_path)?,
            with_overrides(customer_best, min_score, false),
            output,
        ),
        Command::LinkJob { job_id, customer_id } => {
            commands::customers::link_job(&open_store(&db_path)?, &job_id, &customer_id, output)
        }

        // Records
        Command::AddCustomer { name, address } => {
            commands::customers::add(&open_store(&db_path)?, &name, address.as_deref(), output)
        }
        Command::AddJob { title, address, customer_name, min_score } => commands::jobs::add(
            &open_store(&db_path)?,
            &title,
            address.as_deref(),
            customer_name.as_deref(),
            with_overrides(customer_best, min_score, false),
            output,
        ),
        Command::Customers => commands::customers::list(&open_store(&db_path)?, output),
        Command::Jobs => commands::jobs::list(&open_store(&db_path)?, output),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
        fields: cli.fields.clone(),
    };

    match run(cli, &output_controls) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if output_controls.json {
                println!("{}", output::format_error(&format!("{:#}", e)));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
