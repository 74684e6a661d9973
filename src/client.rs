//! Tokio driver for a [`Session`].
//!
//! [`Client::run`] dials, feeds the session every line, executes the
//! actions it queues and keeps the idle timer. It returns once the
//! connection is closed for good; bounces reconnect inside the same call.
//!
//! ```no_run
//! use slirc_client::{Client, Commands, ConnectionOptions, Event, EventKind};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionOptions::new()
//!     .host("irc.libera.chat")
//!     .port(6697)
//!     .secure(true)
//!     .nick("ferris")
//!     .user("crab")
//!     .real_name("Ferris")
//!     .build()?;
//!
//! let mut client = Client::new(config);
//! client.on(EventKind::Register, |_, ctx| ctx.join("#rust"));
//! client.on(EventKind::named("privmsg"), |event, ctx| {
//!     if let Event::Message { message, .. } = event {
//!         if message.param(1) == Some("!quit") {
//!             ctx.quit(Some("bye"));
//!             ctx.close();
//!         }
//!     }
//! });
//! client.run().await;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace, warn};

use crate::commands::Commands;
use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, ProtocolError};
use crate::event::{Context, Event, EventKind};
use crate::line::LineCodec;
use crate::state::{Action, Session};
use crate::transport::Transport;

#[derive(Debug)]
enum ClientCommand {
    Send(String),
    Close,
}

/// What to do once a connection ends.
enum Step {
    Reconnect,
    Stop,
}

/// Owns a [`Session`] and runs it over a real socket.
#[derive(Debug)]
pub struct Client {
    session: Session,
    tx: mpsc::UnboundedSender<ClientCommand>,
    rx: mpsc::UnboundedReceiver<ClientCommand>,
}

impl Client {
    pub fn new(config: ConnectionConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(config),
            tx,
            rx,
        }
    }

    /// Subscribe a handler. See [`Dispatcher::on`](crate::event::Dispatcher::on).
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event<'_>, &mut Context<'_>) + Send + 'static,
    {
        self.session.on(kind, handler);
    }

    /// A cloneable sender usable from other tasks.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Connect and process the connection until it closes.
    ///
    /// Errors are reported through [`Event::Error`], never returned.
    pub async fn run(&mut self) {
        loop {
            let endpoint = self.session.open();
            let codec = LineCodec::new(self.session.encoding());
            let mut transport = match Transport::connect(&endpoint, codec).await {
                Ok(transport) => transport,
                Err(e) => {
                    self.session.closed(Some(e));
                    return;
                }
            };
            self.session.connected();

            match self.drive(&mut transport).await {
                Step::Reconnect => debug!("reconnecting"),
                Step::Stop => return,
            }
        }
    }

    async fn drive(&mut self, transport: &mut Transport) -> Step {
        let idle = self.session.config().idle_timeout();
        let timer = sleep_until(deadline(idle));
        tokio::pin!(timer);

        loop {
            if let Some(step) = self.flush(transport).await {
                return step;
            }

            tokio::select! {
                line = transport.read_line() => {
                    timer.as_mut().reset(deadline(idle));
                    match line {
                        Ok(Some(line)) => {
                            trace!(line = %line, "recv");
                            self.session.receive_line(&line);
                        }
                        Ok(None) => {
                            debug!("connection closed by peer");
                            self.session.closed(None);
                            return Step::Stop;
                        }
                        Err(e) => {
                            self.session.closed(Some(fault(e)));
                            return Step::Stop;
                        }
                    }
                }
                Some(command) = self.rx.recv() => match command {
                    ClientCommand::Send(line) => self.session.outbox().send_line(line),
                    ClientCommand::Close => self.session.request_close(),
                },
                () = &mut timer, if idle.is_some() => {
                    self.session.idle_timeout();
                    timer.as_mut().reset(deadline(idle));
                }
            }
        }
    }

    /// Execute queued actions. Returns a step once the connection ends.
    async fn flush(&mut self, transport: &mut Transport) -> Option<Step> {
        for action in self.session.take_actions() {
            match action {
                Action::Send(line) => {
                    trace!(line = %line.trim_end(), "send");
                    if let Err(e) = transport.write_line(line).await {
                        self.session.closed(Some(fault(e)));
                        return Some(Step::Stop);
                    }
                }
                Action::Close => {
                    shutdown(transport).await;
                    self.session.closed(None);
                    return Some(Step::Stop);
                }
                Action::Reconnect => {
                    shutdown(transport).await;
                    self.session.closed(None);
                    return Some(Step::Reconnect);
                }
            }
        }
        None
    }
}

async fn shutdown(transport: &mut Transport) {
    if let Err(e) = transport.shutdown().await {
        warn!(error = %e, "error while shutting down connection");
    }
}

/// When the idle timer fires next. Without an idle timeout, or when the
/// deadline does not fit in an `Instant`, it is pushed out of reach.
fn deadline(idle: Option<Duration>) -> Instant {
    let now = Instant::now();
    idle.and_then(|idle| now.checked_add(idle)).unwrap_or(now + FAR_FUTURE)
}

/// Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn fault(err: ProtocolError) -> ConnectionError {
    match err {
        ProtocolError::Io(e) => ConnectionError::Io(e),
        other => ConnectionError::Protocol(other),
    }
}

/// Sends lines to a running [`Client`] from anywhere.
///
/// Sending never blocks. Lines sent while the client is not running are
/// delivered once it is; lines sent after it is dropped are discarded.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    tx: mpsc::UnboundedSender<ClientCommand>,
}

impl ClientHandle {
    /// Ask the client to close the connection.
    pub fn close(&self) {
        if self.tx.send(ClientCommand::Close).is_err() {
            trace!("client gone, close request dropped");
        }
    }

    /// Whether the client this handle points to has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Commands for ClientHandle {
    fn send_line(&mut self, line: String) {
        if self.tx.send(ClientCommand::Send(line)).is_err() {
            trace!("client gone, line dropped");
        }
    }
}
