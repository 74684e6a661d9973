//! SASL PLAIN helpers.
//!
//! Only the PLAIN mechanism is spoken. The exchange is:
//!
//! ```text
//! C: CAP REQ :sasl
//! S: CAP * ACK :sasl
//! C: AUTHENTICATE PLAIN
//! S: AUTHENTICATE +
//! C: AUTHENTICATE <base64(authzid NUL authcid NUL password)>
//! S: 903 nick :SASL authentication successful
//! ```
//!
//! # Reference
//! - IRCv3 SASL: <https://ircv3.net/specs/extensions/sasl-3.2>
//! - RFC 4616 (PLAIN): <https://tools.ietf.org/html/rfc4616>
//!
//! # Example
//!
//! ```
//! use slirc_client::sasl::{authenticate_lines, encode_plain};
//!
//! let payload = encode_plain("jilles", "jilles", "sesame");
//! assert_eq!(payload, "amlsbGVzAGppbGxlcwBzZXNhbWU=");
//! assert_eq!(authenticate_lines(&payload), vec!["AUTHENTICATE amlsbGVzAGppbGxlcwBzZXNhbWU=\r\n"]);
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::message::format_line;

/// Maximum length of a single AUTHENTICATE payload chunk.
pub const SASL_CHUNK_SIZE: usize = 400;

/// SASL mechanisms as named on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SaslMechanism {
    /// PLAIN (RFC 4616).
    Plain,
    /// Anything else; never selected.
    Unknown(String),
}

impl SaslMechanism {
    /// Parse a mechanism name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("PLAIN") {
            Self::Plain
        } else {
            Self::Unknown(name.to_owned())
        }
    }

    /// Canonical wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain => "PLAIN",
            Self::Unknown(s) => s,
        }
    }
}

impl std::fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a comma-separated mechanism list, as found in a `sasl=` CAP value
/// or an `RPL_SASLMECHS` reply.
pub fn parse_mechanisms(list: &str) -> Vec<SaslMechanism> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SaslMechanism::parse)
        .collect()
}

/// Whether an advertised `sasl` capability value permits PLAIN.
///
/// A bare `sasl` (no value) says nothing about mechanisms and is accepted.
pub fn allows_plain(cap_value: Option<&str>) -> bool {
    match cap_value {
        None | Some("") => true,
        Some(list) => parse_mechanisms(list).contains(&SaslMechanism::Plain),
    }
}

/// Encode PLAIN credentials: `authzid NUL authcid NUL password`, base64.
pub fn encode_plain(authzid: &str, authcid: &str, password: &str) -> String {
    let payload = format!("{}\0{}\0{}", authzid, authcid, password);
    BASE64.encode(payload.as_bytes())
}

/// Split an encoded response into [`SASL_CHUNK_SIZE`] pieces.
///
/// A response whose length is an exact multiple of the chunk size gets a
/// trailing `"+"` so the server knows it has ended; an empty response is
/// just `"+"`.
pub fn chunk_response(encoded: &str) -> Vec<&str> {
    if encoded.is_empty() {
        return vec!["+"];
    }
    // base64 output is ASCII, so byte offsets are char boundaries.
    let mut chunks: Vec<&str> = (0..encoded.len())
        .step_by(SASL_CHUNK_SIZE)
        .map(|start| &encoded[start..(start + SASL_CHUNK_SIZE).min(encoded.len())])
        .collect();
    if encoded.len() % SASL_CHUNK_SIZE == 0 {
        chunks.push("+");
    }
    chunks
}

/// Wire lines carrying `encoded` as one or more AUTHENTICATE commands.
pub fn authenticate_lines(encoded: &str) -> Vec<String> {
    chunk_response(encoded)
        .into_iter()
        .map(|chunk| format_line("AUTHENTICATE", &[chunk]))
        .collect()
}

/// Progress of one SASL exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SaslState {
    /// Not started.
    #[default]
    Initial,
    /// `AUTHENTICATE <mechanism>` sent, waiting for `AUTHENTICATE +`.
    MechanismSent(SaslMechanism),
    /// Credentials sent, waiting for a numeric verdict.
    CredentialsSent,
    /// `RPL_SASLSUCCESS` received.
    Success,
    /// A failure numeric was received; carries its command.
    Failed(String),
}

impl SaslState {
    /// Whether the exchange has reached a verdict.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Success | Self::Failed(_))
    }

    /// Whether the exchange succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
