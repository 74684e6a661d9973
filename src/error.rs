//! Error types for the IRC client engine.
//!
//! Errors fall into three families that never mix:
//! framing faults raised by the line codec, configuration faults raised
//! synchronously while building a [`ConnectionConfig`](crate::ConnectionConfig),
//! and runtime connection faults that are surfaced as
//! [`Event::Error`](crate::event::Event::Error) before the connection closes.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Line framing errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line grew past the maximum allowed length without a terminator.
    #[error("message too long: {0} bytes")]
    MessageTooLong(usize),
}

/// Errors raised while building a connection configuration.
///
/// These are reported before any socket activity takes place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A mandatory field was absent or empty.
    #[error("missing mandatory option: {0}")]
    MissingField(&'static str),

    /// The configured character encoding label is not recognised.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

/// Runtime errors on an established or establishing connection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    /// Socket-level failure (refused, reset, unreachable...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The TLS handshake or certificate validation failed.
    #[error("tls authorization failed: {0}")]
    Tls(#[source] std::io::Error),

    /// The host name cannot be used as a TLS server name.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// The line codec rejected incoming data.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
