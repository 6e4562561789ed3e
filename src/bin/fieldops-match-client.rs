//! fieldops-match-client - thin client for the match daemon.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use std::process::ExitCode;

use fieldops_match::config;
use fieldops_match::daemon::client::DaemonClient;
use fieldops_match::daemon::protocol::Request;

#[derive(Parser)]
#[command(name = "fieldops-match-client")]
#[command(about = "Thin client for fieldops-match-daemon")]
struct Cli {
    /// Method to call (health, match_job, customer_matches, ...)
    method: String,

    /// Socket path
    #[arg(long, default_value = config::DEFAULT_SOCKET)]
    socket: String,

    /// JSON parameters, e.g. '{"address": "123 Main St"}'
    #[arg(long)]
    params: Option<String>,

    /// Request timeout (seconds)
    #[arg(long, default_value = "5.0")]
    timeout: f64,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let params: HashMap<String, serde_json::Value> = match cli.params {
        Some(p) => serde_json::from_str(&p)?,
        None => HashMap::new(),
    };

    let client = DaemonClient::new(config::expand_socket_path(&cli.socket), cli.timeout);
    let response = match client.call(&Request::new(cli.method, params)) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            return Ok(ExitCode::from(1));
        }
    };

    if response.ok {
        let result = response.result.unwrap_or(serde_json::Value::Null);
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(ExitCode::from(0))
    } else {
        let (code, message) = response
            .error
            .map(|e| (e.code, e.message))
            .unwrap_or_else(|| ("ERROR".to_string(), "unknown".to_string()));
        eprintln!("Error [{}]: {}", code, message);
        Ok(ExitCode::from(1))
    }
}
