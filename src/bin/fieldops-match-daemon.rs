//! fieldops-match-daemon - resident match service with a hot store connection.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use fieldops_match::config::{self, MatchConfig};
use fieldops_match::daemon::{server::DaemonServer, service::MatchService};

#[derive(Parser)]
#[command(name = "fieldops-match-daemon")]
#[command(about = "Resident match service for fieldops-match")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Socket path
        #[arg(long, default_value = config::DEFAULT_SOCKET)]
        socket: String,

        /// SQLite store path (default: $FIELDOPS_DB_PATH or the data dir)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Run in foreground (don't daemonize)
        #[arg(long)]
        foreground: bool,
    },

    /// Stop the daemon
    Stop {
        #[arg(long, default_value = config::DEFAULT_SOCKET)]
        socket: String,
    },

    /// Check daemon status
    Status {
        #[arg(long, default_value = config::DEFAULT_SOCKET)]
        socket: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { socket, db, foreground } => cmd_start(socket, db, foreground),
        Commands::Stop { socket } => cmd_stop(socket),
        Commands::Status { socket } => cmd_status(socket),
    }
}

fn build_server(socket_path: &str, db: Option<PathBuf>) -> Result<DaemonServer> {
    let db_path = db.unwrap_or_else(config::default_db_path);
    let match_config = MatchConfig::load_default()?;
    let service = MatchService::open(&db_path, match_config)
        .with_context(|| format!("Failed to open store {:?}", db_path))?;
    Ok(DaemonServer::new(socket_path, service))
}

fn cmd_start(socket: String, db: Option<PathBuf>, foreground: bool) -> Result<()> {
    let socket_path = config::expand_socket_path(&socket);

    if let Some(parent) = Path::new(&socket_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    if foreground {
        tracing::info!("starting in foreground");
        build_server(&socket_path, db)?.serve()?;
        return Ok(());
    }

    use daemonize::Daemonize;

    let pid_file = format!("{}.pid", socket_path);
    let daemonize = Daemonize::new().pid_file(&pid_file).working_directory("/tmp");

    match daemonize.start() {
        Ok(_) => build_server(&socket_path, db)?.serve(),
        Err(e) => {
            tracing::error!(error = %e, "failed to daemonize");
            std::process::exit(1);
        }
    }
}

fn cmd_stop(socket: String) -> Result<()> {
    let socket_path = config::expand_socket_path(&socket);
    let pid_file = format!("{}.pid", socket_path);

    let pid_str = std::fs::read_to_string(&pid_file)
        .with_context(|| format!("No pid file at {}", pid_file))?;
    let pid: i32 = pid_str.trim().parse().context("Malformed pid file")?;

    // SAFETY: kill(2) with a pid read from our own pid file; no memory is shared.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc != 0 {
        tracing::warn!(pid, "SIGTERM failed, daemon may already be gone");
    }

    let _ = std::fs::remove_file(&pid_file);
    let _ = std::fs::remove_file(&socket_path);

    println!("Daemon stopped (pid {})", pid);
    Ok(())
}

fn cmd_status(socket: String) -> Result<()> {
    let socket_path = config::expand_socket_path(&socket);

    match std::os::unix::net::UnixStream::connect(&socket_path) {
        Ok(_) => {
            println!("Daemon running at {}", socket_path);
            Ok(())
        }
        Err(_) => {
            println!("Daemon not running");
            std::process::exit(1);
        }
    }
}
