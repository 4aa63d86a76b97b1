//! Listener setup and the serve loop.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

/// Errors that stop the proxy from serving.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Another process already owns the port.
    #[error("Port {0} is already in use; stop the other service or set WARDROBE_PROXY_PORT")]
    AddrInUse(u16),

    /// Binding failed for any other reason.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The accept loop failed.
    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

/// Bind the listening socket.
///
/// # Errors
///
/// Returns `ServeError::AddrInUse` when the port is taken, `ServeError::Bind`
/// for any other bind failure.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr).await.map_err(|source| {
        if source.kind() == io::ErrorKind::AddrInUse {
            ServeError::AddrInUse(addr.port())
        } else {
            ServeError::Bind { addr, source }
        }
    })
}

/// Serve the application until `shutdown` resolves.
///
/// # Errors
///
/// Returns `ServeError::Serve` if the server stops with an I/O error.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
