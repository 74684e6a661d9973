//! Minimal echo bot.
//!
//! Connects, joins a channel once registered, and repeats back anything
//! said to it that starts with `!echo`. `!quit` makes it leave.
//!
//! Usage:
//!   cargo run --example echo_bot -- irc.libera.chat 6697 echobot "#bots"
//!
//! Port 6697 enables TLS. Set `RUST_LOG=slirc_client=debug` to watch the
//! protocol exchange.

use anyhow::{Context as _, Result};
use slirc_client::{Client, Commands, ConnectionOptions, Event, EventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port: u16 = args
        .next()
        .map(|p| p.parse())
        .transpose()
        .context("port must be a number")?
        .unwrap_or(6667);
    let nick = args.next().unwrap_or_else(|| "echobot".to_string());
    let channel = args.next().unwrap_or_else(|| "#bots".to_string());

    let config = ConnectionOptions::new()
        .host(host)
        .port(port)
        .secure(port == 6697)
        .nick(nick.as_str())
        .user(nick.as_str())
        .real_name("slirc echo bot")
        .build()?;

    let mut client = Client::new(config);

    client.on(EventKind::Register, move |event, ctx| {
        if let Event::Register { nick } = event {
            info!(nick = %nick, channel = %channel, "registered, joining");
        }
        ctx.join(&channel);
    });

    client.on(EventKind::named("privmsg"), |event, ctx| {
        let Event::Message { message, .. } = event else {
            return;
        };
        let (Some(target), Some(text)) = (message.param(0), message.param(1)) else {
            return;
        };
        // Answer in the channel, or privately when addressed directly.
        let reply_to = if target.starts_with('#') {
            target
        } else {
            match message.prefix.nick() {
                Some(nick) => nick,
                None => return,
            }
        };

        if let Some(rest) = text.strip_prefix("!echo ") {
            ctx.privmsg(reply_to, rest);
        } else if text == "!quit" {
            ctx.quit(Some("asked to leave"));
            ctx.close();
        }
    });

    client.on(EventKind::Error, |event, _| {
        if let Event::Error(err) = event {
            warn!(error = %err, "connection failed");
        }
    });

    client.on(EventKind::Close, |_, _| info!("disconnected"));

    client.run().await;
    Ok(())
}
