//! Sans-IO connection state machine.
//!
//! [`Session`] owns everything that describes one IRC connection and
//! performs no I/O. A driver feeds it inputs and executes the [`Action`]s
//! it queues:
//!
//! | input | meaning |
//! |-------|---------|
//! | [`Session::open`] | about to dial; returns the endpoint |
//! | [`Session::connected`] | socket (and TLS) is up |
//! | [`Session::receive_line`] | one line arrived |
//! | [`Session::idle_timeout`] | nothing arrived for the idle period |
//! | [`Session::closed`] | socket is gone, with or without an error |
//!
//! ```text
//! Closed --open--> Connecting --connected--> Connected --001--> Registered
//!    ^                                                               |
//!    +------------------------- closed (any state) ------------------+
//! ```
//!
//! # Example
//!
//! ```
//! use slirc_client::config::ConnectionOptions;
//! use slirc_client::state::{Action, ConnectionState, Session};
//!
//! let config = ConnectionOptions::new()
//!     .host("irc.example.net")
//!     .nick("ferris")
//!     .user("crab")
//!     .real_name("Ferris")
//!     .capabilities(Vec::<String>::new())
//!     .build()
//!     .unwrap();
//!
//! let mut session = Session::new(config);
//! session.open();
//! session.connected();
//! assert_eq!(
//!     session.take_actions(),
//!     vec![
//!         Action::Send("CAP LS\r\n".into()),
//!         Action::Send("NICK ferris\r\n".into()),
//!         Action::Send("USER crab 8 * Ferris\r\n".into()),
//!     ]
//! );
//!
//! session.receive_line(":irc.example.net 001 ferris :Welcome");
//! assert_eq!(session.state(), ConnectionState::Registered);
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::caps::{CapNegotiator, CapabilitySet};
use crate::commands::Commands;
use crate::config::{Auth, ConnectionConfig, Endpoint};
use crate::error::ConnectionError;
use crate::event::{Dispatcher, Event, EventKind};
use crate::keepalive::{self, Supervisor};
use crate::message::{format_line, Message};
use crate::mode::{umodes, UserModeSet};
use crate::response;

/// Lifecycle of a connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No socket.
    #[default]
    Closed,
    /// Dialing.
    Connecting,
    /// Socket up, registration and capability negotiation in progress.
    Connected,
    /// `RPL_WELCOME` received.
    Registered,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Registered => "registered",
        })
    }
}

/// Something the driver must do on the session's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Write this line to the socket.
    Send(String),
    /// Close the socket.
    Close,
    /// Close the socket and dial [`Session::endpoint`] again.
    Reconnect,
}

/// Queue of pending [`Action`]s.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    actions: VecDeque<Action>,
}

impl Outbox {
    /// Queue a wire line.
    pub fn push_line(&mut self, line: String) {
        self.actions.push_back(Action::Send(line));
    }

    /// Queue a close request.
    pub fn close(&mut self) {
        self.actions.push_back(Action::Close);
    }

    /// Queue a reconnect request.
    pub fn reconnect(&mut self) {
        self.actions.push_back(Action::Reconnect);
    }

    /// Remove and return everything queued, oldest first.
    pub fn take(&mut self) -> Vec<Action> {
        self.actions.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.actions.clear();
    }
}

/// Read-only snapshot of a connection, as seen by event handlers.
#[derive(Clone, Debug, Default)]
pub struct ConnectionInfo {
    state: ConnectionState,
    nick: String,
    caps: CapabilitySet,
    modes: UserModeSet,
    server_name: Option<String>,
    ircd: Option<String>,
    channel_modes: Option<String>,
}

impl ConnectionInfo {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Our nick: the wanted one until the server confirms or changes it.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Active capabilities.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.caps
    }

    /// Our user modes.
    pub fn modes(&self) -> &UserModeSet {
        &self.modes
    }

    /// Server name from `RPL_MYINFO`.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Server software version from `RPL_MYINFO`.
    pub fn ircd(&self) -> Option<&str> {
        self.ircd.as_deref()
    }

    /// Channel mode letters from `RPL_MYINFO`.
    pub fn channel_modes(&self) -> Option<&str> {
        self.channel_modes.as_deref()
    }

    /// Name of a user mode letter on this server's software.
    pub fn user_mode_name(&self, mode: char) -> Option<&'static str> {
        umodes::user_mode_name(self.ircd(), mode)
    }

    fn reset(&mut self, nick: &str) {
        *self = Self {
            nick: nick.to_owned(),
            ..Self::default()
        };
    }
}

/// One IRC connection's protocol state.
pub struct Session {
    config: ConnectionConfig,
    endpoint: Endpoint,
    info: ConnectionInfo,
    negotiator: CapNegotiator,
    supervisor: Supervisor,
    dispatcher: Dispatcher,
    outbox: Outbox,
    /// Lowercased nicks whose messages are dropped.
    ignores: HashSet<String>,
}

impl Session {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            endpoint: config.endpoint().clone(),
            negotiator: CapNegotiator::from_config(&config),
            ignores: config
                .ignores()
                .iter()
                .map(|n| n.to_ascii_lowercase())
                .collect(),
            info: ConnectionInfo::default(),
            supervisor: Supervisor::new(),
            dispatcher: Dispatcher::new(),
            outbox: Outbox::default(),
            config,
        }
    }

    /// Subscribe a handler. See [`Dispatcher::on`].
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event<'_>, &mut crate::event::Context<'_>) + Send + 'static,
    {
        self.dispatcher.on(kind, handler);
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Queue for outgoing lines; use it through [`Commands`].
    pub fn outbox(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Drain the queued actions.
    pub fn take_actions(&mut self) -> Vec<Action> {
        self.outbox.take()
    }

    /// Begin a connection attempt. Returns where to dial.
    pub fn open(&mut self) -> Endpoint {
        if self.info.state != ConnectionState::Closed {
            self.closed(None);
        }
        self.info.reset(self.config.nick());
        self.negotiator.reset();
        self.supervisor.reset();
        self.outbox.clear();
        self.info.state = ConnectionState::Connecting;
        debug!(endpoint = %self.endpoint, "connecting");
        self.endpoint.clone()
    }

    /// The socket is up: announce it and start registration.
    pub fn connected(&mut self) {
        if self.info.state != ConnectionState::Connecting {
            warn!(state = %self.info.state, "connected() outside of connecting state");
            return;
        }
        self.info.state = ConnectionState::Connected;
        info!(endpoint = %self.endpoint, "connected");
        self.dispatcher
            .emit(&Event::Connect, &self.info, &mut self.outbox);

        self.negotiator.start(&mut self.outbox);
        if let Auth::Simple { password } = self.config.auth() {
            self.outbox.pass(password);
        }
        self.outbox.nick(self.config.nick());
        self.outbox.user(
            self.config.user(),
            self.config.login_mode(),
            self.config.real_name(),
        );
    }

    /// Process one received line (without its terminator).
    pub fn receive_line(&mut self, line: &str) {
        if self.info.state == ConnectionState::Closed {
            trace!(line, "dropping line on closed session");
            return;
        }

        let msg = Message::parse(line);
        if let Some(nick) = msg.prefix.nick() {
            if self.is_ignored(nick) {
                trace!(nick, "ignoring message");
                return;
            }
        }

        self.dispatcher
            .emit(&Event::Line(line), &self.info, &mut self.outbox);

        if msg.command.is_empty() {
            trace!(line, "line without a command");
            return;
        }

        self.handle_internal(&msg);

        let name = response::event_name(&msg.command);
        self.dispatcher.emit(
            &Event::Message {
                name: &name,
                message: &msg,
            },
            &self.info,
            &mut self.outbox,
        );
    }

    /// Nothing was received for the idle period: probe the server.
    pub fn idle_timeout(&mut self) {
        match self.info.state {
            ConnectionState::Connected | ConnectionState::Registered => {
                trace!("idle timeout, sending PING");
                self.outbox.push_line(keepalive::ping_line());
            }
            _ => {}
        }
    }

    /// The socket is gone. Runs at most once per connection.
    pub fn closed(&mut self, error: Option<ConnectionError>) {
        if self.info.state == ConnectionState::Closed {
            return;
        }
        if let Some(err) = &error {
            warn!(error = %err, "connection error");
            self.dispatcher
                .emit(&Event::Error(err), &self.info, &mut self.outbox);
        }
        self.info.caps.clear();
        self.info.modes.clear();
        self.outbox.clear();
        self.info.state = ConnectionState::Closed;
        info!(endpoint = %self.endpoint, "connection closed");
        self.dispatcher
            .emit(&Event::Close, &self.info, &mut self.outbox);
    }

    /// Ask the driver to close the connection.
    pub fn request_close(&mut self) {
        self.outbox.close();
    }

    /// Drop further messages from `nick`.
    pub fn ignore(&mut self, nick: &str) {
        self.ignores.insert(nick.to_ascii_lowercase());
    }

    /// Undo [`ignore`](Self::ignore).
    pub fn unignore(&mut self, nick: &str) {
        self.ignores.remove(&nick.to_ascii_lowercase());
    }

    pub fn is_ignored(&self, nick: &str) -> bool {
        self.ignores.contains(&nick.to_ascii_lowercase())
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.info.state
    }

    pub fn nick(&self) -> &str {
        &self.info.nick
    }

    pub fn user(&self) -> &str {
        self.config.user()
    }

    pub fn real_name(&self) -> &str {
        self.config.real_name()
    }

    /// Current host; differs from the configured one after a bounce.
    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.info.caps
    }

    pub fn modes(&self) -> &UserModeSet {
        &self.info.modes
    }

    pub fn server_name(&self) -> Option<&str> {
        self.info.server_name()
    }

    pub fn ircd(&self) -> Option<&str> {
        self.info.ircd()
    }

    pub fn channel_modes(&self) -> Option<&str> {
        self.info.channel_modes()
    }

    pub fn encoding(&self) -> &'static encoding::Encoding {
        self.config.encoding()
    }

    /// Protocol chores that run before user handlers see a message.
    fn handle_internal(&mut self, msg: &Message) {
        let registering = self.info.state == ConnectionState::Connected;
        if registering
            && self
                .negotiator
                .handle(msg, &mut self.info.caps, &mut self.outbox)
        {
            return;
        }

        match msg.command.to_ascii_uppercase().as_str() {
            "PING" => self.outbox.push_line(format_line("PONG", &msg.params)),
            "NICK" => {
                let ours = msg
                    .prefix
                    .nick()
                    .is_some_and(|n| n.eq_ignore_ascii_case(&self.info.nick));
                if let (true, Some(new)) = (ours, msg.param(0)) {
                    debug!(old = %self.info.nick, new, "nick changed");
                    self.info.nick = new.to_owned();
                }
            }
            "MODE" => {
                if msg
                    .param(0)
                    .is_some_and(|t| t.eq_ignore_ascii_case(&self.info.nick))
                {
                    self.info.modes.apply(&msg.params[1..].join(" "));
                }
            }
            "CAP" => {
                if msg.param(1).is_some_and(|s| s.eq_ignore_ascii_case("DEL")) {
                    self.negotiator.handle_del(msg, &mut self.info.caps);
                }
            }
            "001" if registering => self.register(msg),
            "004" => self.record_myinfo(msg),
            "221" => {
                if let Some(modes) = msg.param(1) {
                    self.info.modes.replace(modes);
                }
            }
            "305" => self.info.modes.set('a', false),
            "306" => self.info.modes.set('a', true),
            "433" if registering && self.config.auto_nick_change() => {
                let nick = self.supervisor.next_nick(self.config.nick());
                debug!(nick = %nick, "nick in use, retrying");
                self.outbox.nick(&nick);
            }
            "005" | "010" => self.bounce(msg),
            _ => {}
        }
    }

    fn register(&mut self, msg: &Message) {
        let nick = msg.param(0).unwrap_or(&self.info.nick).to_owned();
        self.info.nick = nick;
        self.info.state = ConnectionState::Registered;
        info!(nick = %self.info.nick, "registered");

        if let Auth::NickServ { password } = self.config.auth() {
            let identify = format!("identify {}", password);
            self.outbox.privmsg("NickServ", &identify);
        }

        self.dispatcher.emit(
            &Event::Register {
                nick: &self.info.nick,
            },
            &self.info,
            &mut self.outbox,
        );
    }

    fn record_myinfo(&mut self, msg: &Message) {
        // 004 <nick> <servername> <version> <umodes> <chanmodes>
        self.info.server_name = msg.param(1).map(str::to_owned);
        self.info.ircd = msg.param(2).map(str::to_owned);
        if let Some(umodes) = msg.param(3) {
            self.info.modes.seed(umodes);
        }
        self.info.channel_modes = msg.param(4).map(str::to_owned);
    }

    fn bounce(&mut self, msg: &Message) {
        let Some((host, port)) = keepalive::parse_bounce(msg) else {
            return;
        };
        if !self.config.auto_bounce() {
            debug!(host = %host, port, "bounce ignored");
            return;
        }
        info!(host = %host, port, "bounced to another server");
        self.endpoint.host = host;
        self.endpoint.port = port;
        self.dispatcher.emit(
            &Event::Bounce {
                host: &self.endpoint.host,
                port,
            },
            &self.info,
            &mut self.outbox,
        );
        self.outbox.reconnect();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("info", &self.info)
            .field("dispatcher", &self.dispatcher)
            .field("pending", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::ConnectionOptions;

    fn options() -> ConnectionOptions {
        ConnectionOptions::new()
            .host("irc.example.net")
            .nick("ferris")
            .user("crab")
            .real_name("Ferris the Crab")
    }

    fn session(options: ConnectionOptions) -> Session {
        Session::new(options.build().unwrap())
    }

    fn sent(session: &mut Session) -> Vec<String> {
        session
            .take_actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Send(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    fn record(session: &mut Session, kinds: &[&str]) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for kind in kinds {
            let log = Arc::clone(&log);
            let kind = kind.to_string();
            session.on(EventKind::named(&kind), move |_, _| {
                log.lock().unwrap().push(kind.clone());
            });
        }
        log
    }

    #[test]
    fn test_connected_sends_registration() {
        let mut s = session(options().auth(Auth::Simple {
            password: "secret".into(),
        }));
        s.open();
        assert_eq!(s.state(), ConnectionState::Connecting);
        s.connected();
        assert_eq!(s.state(), ConnectionState::Connected);
        assert_eq!(
            sent(&mut s),
            vec![
                "CAP LS\r\n",
                "PASS secret\r\n",
                "NICK ferris\r\n",
                "USER crab 8 * :Ferris the Crab\r\n",
            ]
        );
    }

    #[test]
    fn test_welcome_registers_once() {
        let mut s = session(options());
        let log = record(&mut s, &["register", "rpl_welcome"]);
        s.open();
        s.connected();
        s.receive_line(":srv 001 ferris_ :Welcome");
        s.receive_line(":srv 001 ferris_ :Welcome again");
        assert_eq!(s.state(), ConnectionState::Registered);
        assert_eq!(s.nick(), "ferris_");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["register", "rpl_welcome", "rpl_welcome"]
        );
    }

    #[test]
    fn test_nickserv_identify_on_register() {
        let mut s = session(options().auth(Auth::NickServ {
            password: "hunter2".into(),
        }));
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":srv 001 ferris :Welcome");
        assert_eq!(sent(&mut s), vec!["PRIVMSG NickServ :identify hunter2\r\n"]);
    }

    #[test]
    fn test_ping_pong() {
        let mut s = session(options());
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line("PING :irc.example.net");
        assert_eq!(sent(&mut s), vec!["PONG irc.example.net\r\n"]);
    }

    #[test]
    fn test_nick_retry() {
        let mut s = session(options());
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":srv 433 * ferris :Nickname is already in use");
        s.receive_line(":srv 433 * ferris1 :Nickname is already in use");
        assert_eq!(sent(&mut s), vec!["NICK ferris1\r\n", "NICK ferris2\r\n"]);

        s.receive_line(":srv 001 ferris2 :Welcome");
        s.receive_line(":srv 433 ferris2 other :Nickname is already in use");
        assert!(sent(&mut s).is_empty());
    }

    #[test]
    fn test_nick_retry_disabled() {
        let mut s = session(options().auto_nick_change(false));
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":srv 433 * ferris :Nickname is already in use");
        assert!(sent(&mut s).is_empty());
    }

    #[test]
    fn test_nick_retry_counter_resets_per_attempt() {
        let mut s = session(options());
        s.open();
        s.connected();
        s.receive_line(":srv 433 * ferris :in use");
        s.closed(None);
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":srv 433 * ferris :in use");
        assert_eq!(sent(&mut s), vec!["NICK ferris1\r\n"]);
    }

    #[test]
    fn test_closed_runs_once() {
        let mut s = session(options());
        let log = record(&mut s, &["error", "close"]);
        s.open();
        s.connected();
        s.receive_line(":srv CAP * ACK :multi-prefix");
        assert!(s.capabilities().contains("multi-prefix"));

        let err = ConnectionError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));
        s.closed(Some(err));
        s.closed(None);
        assert_eq!(s.state(), ConnectionState::Closed);
        assert!(s.capabilities().is_empty());
        assert!(s.modes().is_empty());
        assert!(s.take_actions().is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["error", "close"]);
    }

    #[test]
    fn test_idle_timeout() {
        let mut s = session(options());
        s.idle_timeout();
        assert!(s.take_actions().is_empty());

        s.open();
        s.connected();
        s.take_actions();
        s.idle_timeout();
        let lines = sent(&mut s);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("PING "));
        assert_eq!(s.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_negotiation_only_while_connected() {
        let mut s = session(options().capabilities(["multi-prefix"]));
        s.open();
        s.connected();
        s.receive_line(":srv 001 ferris :Welcome");
        s.take_actions();
        s.receive_line(":srv CAP ferris LS :multi-prefix");
        s.receive_line(":srv CAP ferris ACK :multi-prefix");
        assert!(sent(&mut s).is_empty());
        assert!(s.capabilities().is_empty());

        s.receive_line(":srv CAP ferris DEL :multi-prefix");
        assert!(s.capabilities().is_empty());
    }

    #[test]
    fn test_user_modes() {
        let mut s = session(options());
        s.open();
        s.connected();
        s.receive_line(":srv 001 ferris :Welcome");
        s.receive_line(":srv 004 ferris irc.example.net Unreal3.2 iowghraAsORTVSxNCWqBzvdHtGp lvhopsmntikrRcaqOALQbSeIKVfMCuzNTGj");
        assert_eq!(s.server_name(), Some("irc.example.net"));
        assert_eq!(s.ircd(), Some("Unreal3.2"));
        assert_eq!(s.modes().get('i'), Some(false));
        assert!(s.channel_modes().is_some());

        s.receive_line(":ferris MODE ferris :+iw");
        assert!(s.modes().is_set('i'));
        assert!(s.modes().is_set('w'));
        s.receive_line(":ferris MODE someone :-i");
        assert!(s.modes().is_set('i'));
        s.receive_line(":srv 221 ferris +i");
        assert!(s.modes().is_set('i'));
        assert!(!s.modes().is_set('w'));
        s.receive_line(":srv 306 ferris :You have been marked as being away");
        assert!(s.modes().is_set('a'));
        s.receive_line(":srv 305 ferris :You are no longer marked as being away");
        assert!(!s.modes().is_set('a'));
        assert_eq!(s.info().user_mode_name('a'), Some("SERVICES_ADMIN"));
    }

    #[test]
    fn test_nick_tracking() {
        let mut s = session(options());
        s.open();
        s.connected();
        s.receive_line(":srv 001 ferris :Welcome");
        s.receive_line(":Ferris!crab@host NICK :crab");
        assert_eq!(s.nick(), "crab");
        s.receive_line(":other!u@h NICK :nobody");
        assert_eq!(s.nick(), "crab");
    }

    #[test]
    fn test_ignore_drops_before_line_event() {
        let mut s = session(options().ignores(["Troll"]));
        let log = record(&mut s, &["line", "message"]);
        s.open();
        s.connected();
        s.receive_line(":troll!t@h PRIVMSG #ch :spam");
        assert!(log.lock().unwrap().is_empty());

        s.unignore("TROLL");
        s.receive_line(":troll!t@h PRIVMSG #ch :hi");
        assert_eq!(*log.lock().unwrap(), vec!["line", "message"]);

        s.ignore("friend");
        assert!(s.is_ignored("Friend"));
    }

    #[test]
    fn test_bounce() {
        let mut s = session(options());
        let log = record(&mut s, &["bounce"]);
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":srv 010 ferris irc.other.net 6668 :Try elsewhere");
        assert_eq!(s.host(), "irc.other.net");
        assert_eq!(s.endpoint().port, 6668);
        assert_eq!(s.take_actions(), vec![Action::Reconnect]);
        assert_eq!(*log.lock().unwrap(), vec!["bounce"]);

        let endpoint = s.open();
        assert_eq!(endpoint.host, "irc.other.net");
    }

    #[test]
    fn test_bounce_disabled() {
        let mut s = session(options().auto_bounce(false));
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":srv 005 ferris :Try server irc.other.net, port 6668");
        assert_eq!(s.host(), "irc.example.net");
        assert!(s.take_actions().is_empty());
    }

    #[test]
    fn test_handler_close_request() {
        let mut s = session(options());
        s.on(EventKind::named("privmsg"), |_, ctx| ctx.close());
        s.open();
        s.connected();
        s.take_actions();
        s.receive_line(":a!b@c PRIVMSG ferris :bye");
        assert_eq!(s.take_actions(), vec![Action::Close]);
        assert_eq!(s.state(), ConnectionState::Connected);
    }
}
