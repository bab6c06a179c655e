use thiserror::Error;

/// Errors that can occur in the proxy outside the per-message dispatch loop.
///
/// Per-message outcomes are a separate, narrower type
/// ([`crate::protocol::dispatch::DispatchError`]) because they are control
/// flow for the direction I/O loop, not failures of the proxy process.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("protocol parse error: {0}")]
    Protocol(#[from] crate::protocol::dispatch::DispatchError),
}

pub type Result<T> = std::result::Result<T, ProxyError>;
