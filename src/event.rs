//! Typed event bus.
//!
//! Every protocol message is dispatched twice: once as
//! [`EventKind::Message`] (a catch-all) and once under its own lowercase
//! name, e.g. `privmsg` or `rpl_welcome` for `001`. Lifecycle events
//! (`connect`, `register`, `close`, `error`, `bounce`) and the raw `line`
//! event have their own kinds.
//!
//! Handlers run inline, in registration order, and get a [`Context`]:
//! read access to the connection state plus a queue for outgoing lines.
//!
//! ```
//! use slirc_client::event::{Dispatcher, Event, EventKind};
//! use slirc_client::Commands;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.on(EventKind::named("privmsg"), |event, ctx| {
//!     if let Event::Message { message, .. } = event {
//!         if let (Some(from), Some(text)) = (message.prefix.nick(), message.param(1)) {
//!             ctx.privmsg(from, text);
//!         }
//!     }
//! });
//! assert_eq!(dispatcher.handler_count(&EventKind::Command("privmsg".into())), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::ConnectionError;
use crate::message::Message;
use crate::state::{ConnectionInfo, Outbox};

/// Something that happened on a connection.
#[derive(Debug)]
#[non_exhaustive]
pub enum Event<'a> {
    /// The socket (and TLS session, if any) is up.
    Connect,
    /// `RPL_WELCOME` arrived; carries the nick the server assigned.
    Register {
        /// Our nick as confirmed by the server.
        nick: &'a str,
    },
    /// The connection is gone.
    Close,
    /// A runtime fault; always followed by [`Event::Close`].
    Error(&'a ConnectionError),
    /// A raw line, before parsing.
    Line(&'a str),
    /// The server redirected us elsewhere.
    Bounce {
        /// New host.
        host: &'a str,
        /// New port.
        port: u16,
    },
    /// A parsed protocol message.
    Message {
        /// Lowercase event name (`privmsg`, `rpl_welcome`, ...).
        name: &'a str,
        /// The message itself.
        message: &'a Message,
    },
}

impl Event<'_> {
    /// The specific kind this event is dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Connect => EventKind::Connect,
            Event::Register { .. } => EventKind::Register,
            Event::Close => EventKind::Close,
            Event::Error(_) => EventKind::Error,
            Event::Line(_) => EventKind::Line,
            Event::Bounce { .. } => EventKind::Bounce,
            Event::Message { name, .. } => EventKind::Command((*name).to_owned()),
        }
    }
}

/// Subscription key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connect,
    Register,
    Close,
    Error,
    Line,
    Bounce,
    /// Every protocol message.
    Message,
    /// Protocol messages with this lowercase name.
    Command(String),
}

impl EventKind {
    /// Resolve an event name as a caller would write it.
    ///
    /// Reserved names map to lifecycle kinds; anything else is treated as a
    /// command or reply name and lowercased. The reserved names shadow the
    /// `ERROR` and `CONNECT` protocol commands: subscribe to those with
    /// [`EventKind::command`].
    pub fn named(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "connect" => Self::Connect,
            "register" => Self::Register,
            "close" => Self::Close,
            "error" => Self::Error,
            "line" => Self::Line,
            "bounce" => Self::Bounce,
            "message" => Self::Message,
            other => Self::Command(other.to_owned()),
        }
    }

    /// The kind for a protocol command or reply name, never a lifecycle kind.
    pub fn command(name: &str) -> Self {
        Self::Command(name.to_ascii_lowercase())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Register => "register",
            Self::Close => "close",
            Self::Error => "error",
            Self::Line => "line",
            Self::Bounce => "bounce",
            Self::Message => "message",
            Self::Command(name) => name,
        })
    }
}

/// What a handler may touch while it runs.
pub struct Context<'a> {
    info: &'a ConnectionInfo,
    outbox: &'a mut Outbox,
}

impl<'a> Context<'a> {
    pub(crate) fn new(info: &'a ConnectionInfo, outbox: &'a mut Outbox) -> Self {
        Self { info, outbox }
    }

    /// Read-only view of the connection.
    pub fn connection(&self) -> &ConnectionInfo {
        self.info
    }

    /// Ask the driver to close the connection once the handler returns.
    pub fn close(&mut self) {
        self.outbox.close();
    }

    pub(crate) fn outbox(&mut self) -> &mut Outbox {
        self.outbox
    }
}

/// A subscribed callback.
pub type Handler = Box<dyn FnMut(&Event<'_>, &mut Context<'_>) + Send>;

/// Subscription table.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event<'_>, &mut Context<'_>) + Send + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Drop every handler subscribed to `kind`.
    pub fn off(&mut self, kind: &EventKind) {
        self.handlers.remove(kind);
    }

    /// Number of handlers subscribed to `kind`.
    pub fn handler_count(&self, kind: &EventKind) -> usize {
        self.handlers.get(kind).map_or(0, Vec::len)
    }

    /// Deliver `event`. Protocol messages reach the catch-all
    /// [`EventKind::Message`] handlers first, then the named ones.
    pub fn emit(&mut self, event: &Event<'_>, info: &ConnectionInfo, outbox: &mut Outbox) {
        let mut ctx = Context::new(info, outbox);
        if let Event::Message { .. } = event {
            self.run(&EventKind::Message, event, &mut ctx);
        }
        self.run(&event.kind(), event, &mut ctx);
    }

    fn run(&mut self, kind: &EventKind, event: &Event<'_>, ctx: &mut Context<'_>) {
        if let Some(handlers) = self.handlers.get_mut(kind) {
            for handler in handlers.iter_mut() {
                handler(event, &mut *ctx);
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, handlers) in &self.handlers {
            map.entry(&kind.to_string(), &handlers.len());
        }
        map.finish()
    }
}
