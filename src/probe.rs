use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Why a single connect attempt produced no latency.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// DNS failure, refused, unreachable.
    #[error("ConnectError: {0}")]
    Connect(#[from] std::io::Error),

    #[error("TimeoutError: no connection to {target} within {timeout:?}")]
    Timeout { target: String, timeout: Duration },
}

/// Time one TCP handshake to `host:port`, in fractional milliseconds.
///
/// The clock starts right before the connect and stops as soon as it
/// resolves. Nothing is written to the socket; it is closed on return.
/// The `timeout` bounds name resolution and the handshake together.
pub async fn measure(host: &str, port: u16, connect_timeout: Duration) -> Result<f64, ProbeError> {
    let start = Instant::now();
    let stream = match timeout(connect_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(ProbeError::Connect(e)),
        Err(_) => {
            return Err(ProbeError::Timeout {
                target: format!("{host}:{port}"),
                timeout: connect_timeout,
            })
        }
    };
    let elapsed = start.elapsed();
    drop(stream);

    Ok(elapsed.as_secs_f64() * 1000.0)
}
