//! IRCv3 capability negotiation, client side.
//!
//! [`CapNegotiator`] drives the `CAP LS` / `REQ` / `ACK` / `NAK` / `END`
//! exchange that runs between connecting and `RPL_WELCOME`, plus the SASL
//! PLAIN exchange when `sasl` is acknowledged. The session feeds it every
//! `CAP`, `AUTHENTICATE` and SASL numeric while in the connected state.
//!
//! ```text
//! C: CAP LS
//! S: CAP * LS :multi-prefix sasl=PLAIN,EXTERNAL
//! C: CAP REQ :multi-prefix sasl
//! S: CAP * ACK :multi-prefix sasl
//! C: AUTHENTICATE PLAIN        (activation routine for `sasl`)
//! ...
//! S: 903 nick :SASL authentication successful
//! C: CAP END
//! ```
//!
//! # Reference
//! - IRCv3 Capability Negotiation: <https://ircv3.net/specs/extensions/capability-negotiation>

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::message::{format_line, Message};
use crate::sasl::{self, SaslMechanism, SaslState};
use crate::state::Outbox;

/// Capabilities currently active on the connection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilitySet {
    caps: HashSet<String>,
}

impl CapabilitySet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `cap` is active.
    pub fn contains(&self, cap: &str) -> bool {
        self.caps.contains(cap)
    }

    /// Active capabilities, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.caps.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }

    pub(crate) fn insert(&mut self, cap: &str) -> bool {
        self.caps.insert(cap.to_owned())
    }

    pub(crate) fn remove(&mut self, cap: &str) -> bool {
        self.caps.remove(cap)
    }

    pub(crate) fn clear(&mut self) {
        self.caps.clear();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SaslCredentials {
    authzid: String,
    authcid: String,
    password: String,
}

/// Split `name=value` as advertised in `CAP LS`.
fn split_value(cap: &str) -> (&str, Option<&str>) {
    match cap.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (cap, None),
    }
}

/// The capability list of a `CAP <target> <sub> [*] :<list>` reply and
/// whether more lines follow.
fn cap_list(msg: &Message) -> (bool, &str) {
    match (msg.param(2), msg.param(3)) {
        (Some("*"), Some(list)) => (true, list),
        (Some(list), _) => (false, list),
        (None, _) => (false, ""),
    }
}

/// Per-connection negotiation state.
#[derive(Clone, Debug)]
pub struct CapNegotiator {
    wanted: Vec<String>,
    credentials: Option<SaslCredentials>,
    /// Server capabilities with their advertised values.
    advertised: HashMap<String, Option<String>>,
    ls_complete: bool,
    /// Activation routines still running, keyed by capability.
    pending: HashSet<String>,
    sasl: SaslState,
    ended: bool,
}

impl CapNegotiator {
    /// Negotiator wanting `wanted`, with optional SASL PLAIN credentials.
    pub fn new(wanted: Vec<String>, credentials: Option<(&str, &str, &str)>) -> Self {
        Self {
            wanted,
            credentials: credentials.map(|(authzid, authcid, password)| SaslCredentials {
                authzid: authzid.to_owned(),
                authcid: authcid.to_owned(),
                password: password.to_owned(),
            }),
            advertised: HashMap::new(),
            ls_complete: false,
            pending: HashSet::new(),
            sasl: SaslState::Initial,
            ended: false,
        }
    }

    /// Negotiator for a connection configuration.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::new(
            config.capabilities().to_vec(),
            config.auth().sasl_credentials(),
        )
    }

    /// Forget everything learned on a previous connection.
    pub fn reset(&mut self) {
        self.advertised.clear();
        self.ls_complete = false;
        self.pending.clear();
        self.sasl = SaslState::Initial;
        self.ended = false;
    }

    /// Queue the opening `CAP LS`.
    pub fn start(&mut self, out: &mut Outbox) {
        out.push_line(format_line("CAP", &["LS"]));
    }

    /// Whether `CAP END` has been sent.
    pub fn is_finished(&self) -> bool {
        self.ended
    }

    /// Progress of the SASL exchange.
    pub fn sasl_state(&self) -> &SaslState {
        &self.sasl
    }

    /// Capabilities the server advertised, values stripped.
    pub fn advertised(&self) -> impl Iterator<Item = &str> {
        self.advertised.keys().map(String::as_str)
    }

    /// Feed a message received while registering.
    ///
    /// Returns `true` when the message belonged to the negotiation.
    pub fn handle(&mut self, msg: &Message, caps: &mut CapabilitySet, out: &mut Outbox) -> bool {
        match msg.command.to_ascii_uppercase().as_str() {
            "CAP" => {
                self.handle_cap(msg, caps, out);
                true
            }
            "AUTHENTICATE" => {
                self.handle_authenticate(msg, out);
                true
            }
            "903" => {
                debug!("SASL authentication succeeded");
                self.sasl = SaslState::Success;
                self.activation_done("sasl", out);
                true
            }
            cmd @ ("902" | "904" | "905" | "906" | "907") => {
                if self.pending.contains("sasl") {
                    warn!(reply = cmd, "SASL authentication failed");
                    self.sasl = SaslState::Failed(cmd.to_owned());
                    self.activation_done("sasl", out);
                }
                true
            }
            _ => false,
        }
    }

    /// Apply a `CAP DEL`, which servers may send at any time.
    pub fn handle_del(&mut self, msg: &Message, caps: &mut CapabilitySet) {
        let (_, list) = cap_list(msg);
        for cap in list.split_whitespace() {
            let (name, _) = split_value(cap);
            if caps.remove(name) {
                debug!(cap = name, "capability removed by server");
            }
            self.advertised.remove(name);
        }
    }

    fn handle_cap(&mut self, msg: &Message, caps: &mut CapabilitySet, out: &mut Outbox) {
        let sub = msg.param(1).unwrap_or("").to_ascii_uppercase();
        match sub.as_str() {
            "LS" => self.handle_ls(msg, out),
            "ACK" => self.handle_ack(msg, caps, out),
            "NAK" => {
                debug!(caps = msg.param(2).unwrap_or(""), "capability request rejected");
                self.finish(out);
            }
            "DEL" => self.handle_del(msg, caps),
            _ => {}
        }
    }

    fn handle_ls(&mut self, msg: &Message, out: &mut Outbox) {
        let (more, list) = cap_list(msg);
        for cap in list.split_whitespace() {
            let (name, value) = split_value(cap);
            self.advertised
                .insert(name.to_owned(), value.map(str::to_owned));
        }
        if more || self.ls_complete {
            return;
        }
        self.ls_complete = true;

        let request: Vec<&str> = self
            .wanted
            .iter()
            .map(String::as_str)
            .filter(|cap| self.advertised.contains_key(*cap))
            .filter(|cap| *cap != "sasl" || self.sasl_usable())
            .collect();

        if request.is_empty() {
            debug!("no wanted capability offered");
            self.finish(out);
        } else {
            let request = request.join(" ");
            debug!(caps = %request, "requesting capabilities");
            out.push_line(format_line("CAP", &["REQ", request.as_str()]));
        }
    }

    fn sasl_usable(&self) -> bool {
        let advertised = self.advertised.get("sasl").and_then(|v| v.as_deref());
        self.credentials.is_some() && sasl::allows_plain(advertised)
    }

    fn handle_ack(&mut self, msg: &Message, caps: &mut CapabilitySet, out: &mut Outbox) {
        let (more, list) = cap_list(msg);
        for cap in list.split_whitespace() {
            if let Some(name) = cap.strip_prefix('-') {
                caps.remove(name);
                continue;
            }
            let name = cap.trim_start_matches(['~', '=']);
            if caps.insert(name) {
                debug!(cap = name, "capability enabled");
                self.activate(name, out);
            }
        }
        if !more {
            self.finish(out);
        }
    }

    /// Run the activation routine of a freshly acknowledged capability.
    fn activate(&mut self, cap: &str, out: &mut Outbox) {
        if cap == "sasl" && self.credentials.is_some() && self.sasl == SaslState::Initial {
            self.pending.insert(cap.to_owned());
            self.sasl = SaslState::MechanismSent(SaslMechanism::Plain);
            out.push_line(format_line("AUTHENTICATE", &[SaslMechanism::Plain.as_str()]));
        }
    }

    fn handle_authenticate(&mut self, msg: &Message, out: &mut Outbox) {
        if msg.param(0) != Some("+") || self.sasl != SaslState::MechanismSent(SaslMechanism::Plain)
        {
            return;
        }
        let Some(creds) = &self.credentials else {
            return;
        };
        let payload = sasl::encode_plain(&creds.authzid, &creds.authcid, &creds.password);
        for line in sasl::authenticate_lines(&payload) {
            out.push_line(line);
        }
        self.sasl = SaslState::CredentialsSent;
    }

    fn activation_done(&mut self, cap: &str, out: &mut Outbox) {
        if self.pending.remove(cap) {
            self.finish(out);
        }
    }

    /// Send `CAP END` once nothing is pending.
    fn finish(&mut self, out: &mut Outbox) {
        if self.ended || !self.pending.is_empty() {
            return;
        }
        self.ended = true;
        debug!("capability negotiation finished");
        out.push_line(format_line("CAP", &["END"]));
    }
}
