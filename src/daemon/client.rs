//! Unix socket client for the match daemon.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::daemon::protocol::{Request, Response};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Socket not found: {0}")]
    SocketNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializeError(#[source] serde_json::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[source] serde_json::Error),

    #[error("Empty response from daemon")]
    EmptyResponse,
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::SocketNotFound(_) => "DAEMON_NOT_RUNNING",
            ClientError::ConnectionFailed(_) => "CONNECT_FAILED",
            ClientError::SerializeError(_) => "SERIALIZE_ERROR",
            ClientError::ParseError(_) => "PARSE_ERROR",
            ClientError::EmptyResponse => "EMPTY_RESPONSE",
        }
    }
}

pub struct DaemonClient {
    socket_path: String,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<String>, timeout_secs: f64) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: Duration::from_secs_f64(timeout_secs),
        }
    }

    /// Send one request and read one response.
    pub fn call(&self, request: &Request) -> Result<Response, ClientError> {
        let path = Path::new(&self.socket_path);
        if !path.exists() {
            return Err(ClientError::SocketNotFound(self.socket_path.clone()));
        }

        let stream = UnixStream::connect(path)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let mut writer = &stream;
        let json = serde_json::to_string(request).map_err(ClientError::SerializeError)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        let mut reader = BufReader::new(&stream);
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(ClientError::EmptyResponse);
        }

        serde_json::from_str(&line).map_err(ClientError::ParseError)
    }
}
