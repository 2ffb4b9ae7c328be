//! TCP resolve and connect.

use tokio::net::{TcpStream, lookup_host};

use crate::TransportError;

/// Resolves `host:port` and connects to the first address that accepts.
///
/// Addresses are tried in resolver order. If none accepts, the error
/// from the last attempt is returned.
pub async fn connect(host: &str, port: &str) -> Result<TcpStream, TransportError> {
    let addr = format!("{host}:{port}");
    let candidates = lookup_host(addr.as_str())
        .await
        .map_err(|source| TransportError::Resolve {
            addr: addr.clone(),
            source,
        })?;

    let mut last_err = None;
    for candidate in candidates {
        match TcpStream::connect(candidate).await {
            Ok(stream) => {
                tracing::debug!(%addr, peer = %candidate, "tcp connected");
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(peer = %candidate, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(source) => TransportError::ConnectFailed { addr, source },
        None => TransportError::Resolve {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses found",
            ),
            addr,
        },
    })
}
