//! UNIX socket server for daemon mode.
//!
//! Accepts connections sequentially; each connection carries one NDJSON
//! request and gets one NDJSON response.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::time::Instant;

use crate::daemon::{protocol, service::MatchService};

pub struct DaemonServer {
    service: MatchService,
    socket_path: String,
}

impl DaemonServer {
    pub fn new(socket_path: impl AsRef<Path>, service: MatchService) -> Self {
        Self {
            service,
            socket_path: socket_path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Serve requests until the process is stopped.
    pub fn serve(&self) -> Result<()> {
        // Stale socket from a previous run
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)
            .with_context(|| format!("Failed to bind {}", self.socket_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(socket = %self.socket_path, "daemon listening");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        tracing::warn!(error = %e, "connection error");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept error");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(&stream);

        let mut line = String::new();
        reader.read_line(&mut line)?;

        if line.trim().is_empty() {
            return Ok(());
        }

        let response = self.handle_line(&line);
        writer.write_all(response.to_ndjson_line()?.as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    /// Turn one request line into a response. Unparseable requests get a
    /// `BAD_REQUEST` response with an empty id.
    pub fn handle_line(&self, line: &str) -> protocol::Response {
        let start = Instant::now();
        let elapsed_ms = |start: Instant| start.elapsed().as_secs_f64() * 1000.0;

        let request = match protocol::Request::from_ndjson_line(line) {
            Ok(request) => request,
            Err(e) => {
                return protocol::Response::error(
                    String::new(),
                    "BAD_REQUEST",
                    format!("{:#}", e),
                    elapsed_ms(start),
                );
            }
        };

        tracing::debug!(id = %request.id, method = %request.method, "request");

        match self.service.dispatch(&request.method, request.params) {
            Ok(result) => protocol::Response::success(request.id, result, elapsed_ms(start)),
            Err(e) => {
                protocol::Response::error(request.id, e.code(), e.to_string(), elapsed_ms(start))
            }
        }
    }
}
