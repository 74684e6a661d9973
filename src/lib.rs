//! # slirc-client
//!
//! A client-side IRC protocol engine: it frames and parses lines, drives
//! registration, negotiates IRCv3 capabilities and SASL, and keeps the
//! connection alive.
//!
//! ## Features
//!
//! - Infallible RFC 1459 / IRCv3 message parsing with tags and prefixes
//! - A sans-IO [`Session`] state machine, usable with any runtime
//! - `CAP LS`/`REQ`/`ACK` negotiation with SASL `PLAIN`
//! - Idle `PING` probes, server bounces and automatic nick retry
//! - A typed event bus with per-command subscriptions
//! - Optional Tokio driver with plain TCP or TLS (`tokio` feature, on by default)

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing IRC Messages
//!
//! ```rust
//! use slirc_client::Message;
//!
//! let msg = Message::parse("@time=2023-01-01T12:00:00Z :nick!user@host PRIVMSG #channel :Hello!");
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.prefix.nick(), Some("nick"));
//! assert_eq!(msg.param(1), Some("Hello!"));
//! ```
//!
//! ### Formatting lines
//!
//! ```rust
//! use slirc_client::format_line;
//!
//! assert_eq!(format_line("PRIVMSG", &["#rust", "hi there"]), "PRIVMSG #rust :hi there\r\n");
//! ```
//!
//! ### Running a client
//!
//! See [`Client`] for the Tokio driver and [`Session`] for the sans-IO core.
//!
//! ## Acknowledgments
//!
//! This project was inspired by the architectural patterns established by
//! [Aaron Weiss (aatxe)](https://github.com/aatxe) in the
//! [irc](https://github.com/aatxe/irc) crate.

pub mod caps;
pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod keepalive;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod response;
pub mod sasl;
pub mod state;

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod client;
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod line;
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod transport;

pub use self::caps::{CapNegotiator, CapabilitySet};
pub use self::commands::Commands;
pub use self::config::{Auth, ConnectionConfig, ConnectionOptions, Endpoint};
pub use self::error::{ConfigError, ConnectionError, ProtocolError};
pub use self::event::{Context, Dispatcher, Event, EventKind};
pub use self::message::{format_line, Message, TagValue};
pub use self::mode::{ModeChange, UserModeSet};
pub use self::prefix::Prefix;
pub use self::response::{event_name, reply_code, reply_name};
pub use self::sasl::{SaslMechanism, SaslState};
pub use self::state::{Action, ConnectionInfo, ConnectionState, Outbox, Session};

#[cfg(feature = "tokio")]
pub use self::client::{Client, ClientHandle};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, MAX_IRC_LINE_LEN};
#[cfg(feature = "tokio")]
pub use self::transport::Transport;
