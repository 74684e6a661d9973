//! Outgoing command helpers.
//!
//! One method per common client command, each a thin wrapper over
//! [`format_line`]. Anything that can queue a line implements
//! [`Commands::send_line`] and gets the rest for free.
//!
//! ```
//! use slirc_client::state::{Action, Outbox};
//! use slirc_client::Commands;
//!
//! let mut outbox = Outbox::default();
//! outbox.join("#rust");
//! outbox.privmsg("#rust", "hello there");
//! assert_eq!(
//!     outbox.take(),
//!     vec![
//!         Action::Send("JOIN #rust\r\n".into()),
//!         Action::Send("PRIVMSG #rust :hello there\r\n".into()),
//!     ]
//! );
//! ```

use crate::message::format_line;

/// Send helpers for IRC client commands.
///
/// Parameters are passed through unvalidated; only the last one is
/// `:`-prefixed when needed.
pub trait Commands {
    /// Queue one wire line. A missing `\r\n` is added by the line codec.
    fn send_line(&mut self, line: String);

    /// Queue an arbitrary command.
    fn raw<S: AsRef<str>>(&mut self, command: &str, params: &[S]) {
        self.send_line(format_line(command, params));
    }

    fn cap(&mut self, subcommand: &str, caps: Option<&str>) {
        match caps {
            Some(caps) => self.raw("CAP", &[subcommand, caps]),
            None => self.raw("CAP", &[subcommand]),
        }
    }

    fn pass(&mut self, password: &str) {
        self.raw("PASS", &[password]);
    }

    fn nick(&mut self, nick: &str) {
        self.raw("NICK", &[nick]);
    }

    /// `USER <user> <mode> * <real name>`.
    fn user(&mut self, user: &str, mode: &str, real_name: &str) {
        self.raw("USER", &[user, mode, "*", real_name]);
    }

    fn join(&mut self, channel: &str) {
        self.raw("JOIN", &[channel]);
    }

    fn join_with_key(&mut self, channel: &str, key: &str) {
        self.raw("JOIN", &[channel, key]);
    }

    fn part(&mut self, channel: &str, reason: Option<&str>) {
        match reason {
            Some(reason) => self.raw("PART", &[channel, reason]),
            None => self.raw("PART", &[channel]),
        }
    }

    fn privmsg(&mut self, target: &str, text: &str) {
        self.raw("PRIVMSG", &[target, text]);
    }

    fn notice(&mut self, target: &str, text: &str) {
        self.raw("NOTICE", &[target, text]);
    }

    /// `MODE <target> [<modes> [<args>...]]`.
    fn mode(&mut self, target: &str, modes: &[&str]) {
        let mut params = Vec::with_capacity(modes.len() + 1);
        params.push(target);
        params.extend_from_slice(modes);
        self.raw("MODE", &params);
    }

    /// Query the topic with `None`, set it with `Some`.
    fn topic(&mut self, channel: &str, topic: Option<&str>) {
        match topic {
            Some(topic) => self.raw("TOPIC", &[channel, topic]),
            None => self.raw("TOPIC", &[channel]),
        }
    }

    fn kick(&mut self, channel: &str, nick: &str, reason: Option<&str>) {
        match reason {
            Some(reason) => self.raw("KICK", &[channel, nick, reason]),
            None => self.raw("KICK", &[channel, nick]),
        }
    }

    fn invite(&mut self, nick: &str, channel: &str) {
        self.raw("INVITE", &[nick, channel]);
    }

    fn names(&mut self, channel: Option<&str>) {
        self.raw("NAMES", &channel.into_iter().collect::<Vec<_>>());
    }

    fn list(&mut self, channel: Option<&str>) {
        self.raw("LIST", &channel.into_iter().collect::<Vec<_>>());
    }

    fn who(&mut self, mask: &str) {
        self.raw("WHO", &[mask]);
    }

    fn whois(&mut self, nick: &str) {
        self.raw("WHOIS", &[nick]);
    }

    fn whowas(&mut self, nick: &str) {
        self.raw("WHOWAS", &[nick]);
    }

    /// Mark away with `Some(message)`, back with `None`.
    fn away(&mut self, message: Option<&str>) {
        self.raw("AWAY", &message.into_iter().collect::<Vec<_>>());
    }

    fn oper(&mut self, name: &str, password: &str) {
        self.raw("OPER", &[name, password]);
    }

    fn ping(&mut self, token: &str) {
        self.raw("PING", &[token]);
    }

    fn pong(&mut self, token: &str) {
        self.raw("PONG", &[token]);
    }

    fn quit(&mut self, reason: Option<&str>) {
        self.raw("QUIT", &reason.into_iter().collect::<Vec<_>>());
    }

    fn motd(&mut self) {
        self.raw::<&str>("MOTD", &[]);
    }

    fn version(&mut self) {
        self.raw::<&str>("VERSION", &[]);
    }

    fn time(&mut self) {
        self.raw::<&str>("TIME", &[]);
    }

    fn info(&mut self) {
        self.raw::<&str>("INFO", &[]);
    }

    fn ison(&mut self, nicks: &[&str]) {
        self.raw("ISON", nicks);
    }

    fn userhost(&mut self, nicks: &[&str]) {
        self.raw("USERHOST", nicks);
    }

    fn wallops(&mut self, text: &str) {
        self.raw("WALLOPS", &[text]);
    }
}

impl Commands for crate::state::Outbox {
    fn send_line(&mut self, line: String) {
        self.push_line(line);
    }
}

impl Commands for crate::event::Context<'_> {
    fn send_line(&mut self, line: String) {
        self.outbox().push_line(line);
    }
}
