//! Keepalive, bounce and nick-collision handling.
//!
//! None of this closes a connection on its own. An idle link is probed
//! with `PING`, a bounce asks the driver to reconnect elsewhere, and a
//! taken nick is retried with a numeric suffix.

use chrono::Utc;

use crate::message::{format_line, Message};

/// Per-connection retry bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Supervisor {
    nick_tries: u32,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting afresh for a new connection attempt.
    pub fn reset(&mut self) {
        self.nick_tries = 0;
    }

    /// Number of alternative nicks tried on this connection.
    pub fn nick_tries(&self) -> u32 {
        self.nick_tries
    }

    /// Next alternative for a taken nick: `wanted1`, `wanted2`, ...
    pub fn next_nick(&mut self, wanted: &str) -> String {
        self.nick_tries += 1;
        format!("{}{}", wanted, self.nick_tries)
    }
}

/// The `PING` line sent after the idle timeout, carrying the current
/// unix timestamp as its token.
pub fn ping_line() -> String {
    format_line("PING", &[Utc::now().timestamp().to_string()])
}

/// Extract a redirect target from a bounce reply.
///
/// Two forms are understood:
/// - `010 <nick> <host> <port> :<info>`
/// - any reply whose text reads `Try server <host>, port <port>`
///   (matched case-insensitively), as in RFC 2812's `RPL_BOUNCE`.
pub fn parse_bounce(msg: &Message) -> Option<(String, u16)> {
    if msg.command == "010" {
        if let (Some(host), Some(port)) = (msg.param(1), msg.param(2)) {
            if let Ok(port) = port.parse() {
                return Some((host.to_owned(), port));
            }
        }
    }
    msg.params
        .last()
        .map(String::as_str)
        .and_then(parse_try_server)
}

fn parse_try_server(text: &str) -> Option<(String, u16)> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let start = lower.find("try server ")? + "try server ".len();
    let comma = lower[start..].find(", port ")? + start;
    let host = text[start..comma].trim();

    let digits: &str = {
        let rest = &text[comma + ", port ".len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if host.is_empty() {
        return None;
    }
    let port = digits.parse().ok()?;
    Some((host.to_owned(), port))
}
