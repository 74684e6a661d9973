//! Connection configuration.
//!
//! [`ConnectionOptions`] is the mutable, partially filled builder; with the
//! `serde` feature it can be deserialized straight from a config file.
//! [`ConnectionOptions::build`] validates it into an immutable
//! [`ConnectionConfig`], failing fast when a mandatory field is missing.
//!
//! # Example
//!
//! ```
//! use slirc_client::config::{Auth, ConnectionOptions};
//!
//! let config = ConnectionOptions::new()
//!     .host("irc.libera.chat")
//!     .secure(true)
//!     .nick("ferris")
//!     .user("ferris")
//!     .real_name("Ferris the Crab")
//!     .auth(Auth::sasl_plain("ferris", "ferris", "hunter2"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.port(), 6697);
//! assert!(config.capabilities().iter().any(|c| c == "sasl"));
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Plain-text IRC port.
pub const DEFAULT_PORT: u16 = 6667;
/// TLS IRC port.
pub const DEFAULT_TLS_PORT: u16 = 6697;
/// How long the connection may stay silent before a PING probe is sent.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// The mode parameter of the `USER` command (8 = invisible).
pub const DEFAULT_LOGIN_MODE: &str = "8";
/// Wire character encoding.
pub const DEFAULT_ENCODING: &str = "utf-8";
/// Capabilities requested when the caller does not choose any.
pub const DEFAULT_CAPABILITIES: &[&str] = &[
    "account-notify",
    "away-notify",
    "extended-join",
    "multi-prefix",
    "sasl",
];

/// How the client authenticates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Auth {
    /// No authentication.
    #[default]
    None,
    /// Server password sent with `PASS` before registration.
    Simple {
        /// Server password.
        password: String,
    },
    /// `PRIVMSG NickServ :identify <password>` once registered.
    NickServ {
        /// NickServ password.
        password: String,
    },
    /// SASL PLAIN during capability negotiation.
    SaslPlain {
        /// Authorization identity.
        auth_nick: String,
        /// Authentication identity.
        auth_user: String,
        /// Account password.
        password: String,
    },
}

impl Auth {
    /// Shorthand for [`Auth::SaslPlain`].
    pub fn sasl_plain(auth_nick: &str, auth_user: &str, password: &str) -> Self {
        Self::SaslPlain {
            auth_nick: auth_nick.to_owned(),
            auth_user: auth_user.to_owned(),
            password: password.to_owned(),
        }
    }

    /// SASL credentials as `(authzid, authcid, password)`, when SASL is in use.
    pub fn sasl_credentials(&self) -> Option<(&str, &str, &str)> {
        match self {
            Self::SaslPlain {
                auth_nick,
                auth_user,
                password,
            } => Some((auth_nick, auth_user, password)),
            _ => None,
        }
    }
}

/// Where to connect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Whether to wrap the socket in TLS.
    pub secure: bool,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)?;
        if self.secure {
            f.write_str(" (tls)")?;
        }
        Ok(())
    }
}

/// Builder for [`ConnectionConfig`].
///
/// Every field is optional here; defaults are filled in by [`build`](Self::build).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ConnectionOptions {
    /// Server host (mandatory).
    pub host: Option<String>,
    /// Server port; derived from `secure` when unset.
    pub port: Option<u16>,
    /// Use TLS. Defaults to `false`.
    pub secure: Option<bool>,
    /// Wanted nickname (mandatory).
    pub nick: Option<String>,
    /// Username/ident (mandatory).
    pub user: Option<String>,
    /// Real name (mandatory).
    pub real_name: Option<String>,
    /// Idle time before a PING probe. Zero disables the probe.
    pub idle_timeout: Option<Duration>,
    /// Authentication method.
    pub auth: Option<Auth>,
    /// Capabilities to request, in priority order.
    pub capabilities: Option<Vec<String>>,
    /// Follow `RPL_BOUNCE` redirects automatically.
    pub auto_bounce: Option<bool>,
    /// Retry with a numbered nick when the wanted one is taken.
    pub auto_nick_change: Option<bool>,
    /// The `USER` mode parameter.
    pub login_mode: Option<String>,
    /// Wire encoding label understood by `encoding_rs`.
    pub encoding: Option<String>,
    /// Nicks whose messages are dropped.
    pub ignores: Option<Vec<String>>,
}

impl ConnectionOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enable or disable TLS.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Set the wanted nickname.
    #[must_use]
    pub fn nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    /// Set the username.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the real name.
    #[must_use]
    pub fn real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = Some(real_name.into());
        self
    }

    /// Set the idle timeout. `Duration::ZERO` disables it.
    #[must_use]
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Set the authentication method.
    #[must_use]
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the capabilities to request.
    #[must_use]
    pub fn capabilities<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(caps.into_iter().map(Into::into).collect());
        self
    }

    /// Toggle automatic bounce handling.
    #[must_use]
    pub fn auto_bounce(mut self, on: bool) -> Self {
        self.auto_bounce = Some(on);
        self
    }

    /// Toggle automatic nick retry.
    #[must_use]
    pub fn auto_nick_change(mut self, on: bool) -> Self {
        self.auto_nick_change = Some(on);
        self
    }

    /// Set the `USER` mode parameter.
    #[must_use]
    pub fn login_mode(mut self, mode: impl Into<String>) -> Self {
        self.login_mode = Some(mode.into());
        self
    }

    /// Set the wire encoding.
    #[must_use]
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Set the initial ignore list.
    #[must_use]
    pub fn ignores<I, S>(mut self, nicks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignores = Some(nicks.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and freeze the options.
    pub fn build(self) -> Result<ConnectionConfig, ConfigError> {
        fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
            match value {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(ConfigError::MissingField(name)),
            }
        }

        let host = required(self.host, "host")?;
        let nick = required(self.nick, "nick")?;
        let user = required(self.user, "user")?;
        let real_name = required(self.real_name, "real_name")?;

        let encoding = self.encoding.unwrap_or_else(|| DEFAULT_ENCODING.to_owned());
        let encoding_impl = encoding::Encoding::for_label(encoding.as_bytes())
            .ok_or_else(|| ConfigError::UnknownEncoding(encoding.clone()))?;

        let secure = self.secure.unwrap_or(false);
        let port = self
            .port
            .unwrap_or(if secure { DEFAULT_TLS_PORT } else { DEFAULT_PORT });

        Ok(ConnectionConfig {
            endpoint: Endpoint { host, port, secure },
            nick,
            user,
            real_name,
            idle_timeout: match self.idle_timeout {
                Some(timeout) if timeout.is_zero() => None,
                timeout => Some(timeout.unwrap_or(DEFAULT_IDLE_TIMEOUT)),
            },
            auth: self.auth.unwrap_or_default(),
            capabilities: self.capabilities.unwrap_or_else(|| {
                DEFAULT_CAPABILITIES.iter().map(|c| (*c).to_owned()).collect()
            }),
            auto_bounce: self.auto_bounce.unwrap_or(true),
            auto_nick_change: self.auto_nick_change.unwrap_or(true),
            login_mode: self
                .login_mode
                .unwrap_or_else(|| DEFAULT_LOGIN_MODE.to_owned()),
            encoding: encoding_impl,
            ignores: self.ignores.unwrap_or_default(),
        })
    }
}

/// Validated, immutable connection settings.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    endpoint: Endpoint,
    nick: String,
    user: String,
    real_name: String,
    idle_timeout: Option<Duration>,
    auth: Auth,
    capabilities: Vec<String>,
    auto_bounce: bool,
    auto_nick_change: bool,
    login_mode: String,
    encoding: &'static encoding::Encoding,
    ignores: Vec<String>,
}

impl ConnectionConfig {
    /// Start building a configuration.
    pub fn builder() -> ConnectionOptions {
        ConnectionOptions::new()
    }

    /// Configured endpoint (before any bounce).
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    pub fn port(&self) -> u16 {
        self.endpoint.port
    }

    pub fn secure(&self) -> bool {
        self.endpoint.secure
    }

    /// The nick asked for at registration.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// Silence allowed before a PING probe; `None` when probing is off.
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Wanted capabilities in request order.
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn auto_bounce(&self) -> bool {
        self.auto_bounce
    }

    pub fn auto_nick_change(&self) -> bool {
        self.auto_nick_change
    }

    pub fn login_mode(&self) -> &str {
        &self.login_mode
    }

    pub fn encoding(&self) -> &'static encoding::Encoding {
        self.encoding
    }

    /// Initial ignore list.
    pub fn ignores(&self) -> &[String] {
        &self.ignores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ConnectionOptions {
        ConnectionOptions::new()
            .host("irc.example.net")
            .nick("ferris")
            .user("crab")
            .real_name("Ferris")
    }

    #[test]
    fn test_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.port(), DEFAULT_PORT);
        assert!(!config.secure());
        assert_eq!(config.idle_timeout(), Some(DEFAULT_IDLE_TIMEOUT));
        assert_eq!(config.auth(), &Auth::None);
        assert_eq!(config.capabilities().len(), DEFAULT_CAPABILITIES.len());
        assert!(config.auto_bounce());
        assert!(config.auto_nick_change());
        assert_eq!(config.login_mode(), "8");
        assert_eq!(config.encoding(), encoding::UTF_8);
        assert!(config.ignores().is_empty());
    }

    #[test]
    fn test_secure_port_default() {
        let config = minimal().secure(true).build().unwrap();
        assert_eq!(config.port(), DEFAULT_TLS_PORT);

        let config = minimal().secure(true).port(7000).build().unwrap();
        assert_eq!(config.port(), 7000);
    }

    #[test]
    fn test_zero_idle_timeout_disables_keepalive() {
        let config = minimal().idle_timeout(Duration::ZERO).build().unwrap();
        assert_eq!(config.idle_timeout(), None);

        let config = minimal().idle_timeout(Duration::MAX).build().unwrap();
        assert_eq!(config.idle_timeout(), Some(Duration::MAX));
    }

    #[test]
    fn test_missing_fields() {
        let err = ConnectionOptions::new()
            .nick("a")
            .user("b")
            .real_name("c")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("host"));

        let err = minimal().real_name("").build().unwrap_err();
        assert_eq!(err, ConfigError::MissingField("real_name"));

        let err = ConnectionOptions::new().host("h").build().unwrap_err();
        assert_eq!(err, ConfigError::MissingField("nick"));
    }

    #[test]
    fn test_unknown_encoding() {
        let err = minimal().encoding("klingon").build().unwrap_err();
        assert_eq!(err, ConfigError::UnknownEncoding("klingon".into()));

        let config = minimal().encoding("latin1").build().unwrap();
        assert_eq!(config.encoding(), encoding::WINDOWS_1252);
    }

    #[test]
    fn test_sasl_credentials() {
        let auth = Auth::sasl_plain("n", "u", "p");
        assert_eq!(auth.sasl_credentials(), Some(("n", "u", "p")));
        assert_eq!(
            Auth::Simple {
                password: "p".into()
            }
            .sasl_credentials(),
            None
        );
    }

    #[test]
    fn test_endpoint_display() {
        let config = minimal().secure(true).build().unwrap();
        assert_eq!(config.endpoint().to_string(), "irc.example.net:6697 (tls)");
    }
}
