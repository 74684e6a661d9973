//! IRC message prefix (sender) type.

use std::fmt;

/// The `nick!user@host` portion identifying who sent a message.
///
/// Every field is `None` when the line carried no prefix. A server
/// prefix such as `:irc.example.net` lands in `nick`, matching how the
/// wire format cannot tell the two apart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    /// Nickname or server name.
    pub nick: Option<String>,
    /// Username (ident), present after `!`.
    pub user: Option<String>,
    /// Hostname, present after `@`.
    pub host: Option<String>,
}

impl Prefix {
    /// Split a raw prefix (without the leading `:`) into its parts.
    ///
    /// The nick runs until `!` or `@`; the user, if introduced by `!`,
    /// runs until `@`; the host is whatever follows `@`.
    pub fn parse(raw: &str) -> Self {
        let (nick, rest) = match raw.find(['!', '@']) {
            Some(i) => (&raw[..i], &raw[i..]),
            None => (raw, ""),
        };

        let (user, host) = if let Some(after_bang) = rest.strip_prefix('!') {
            match after_bang.split_once('@') {
                Some((user, host)) => (Some(user), Some(host)),
                None => (Some(after_bang), None),
            }
        } else {
            (None, rest.strip_prefix('@'))
        };

        Self {
            nick: Some(nick.to_owned()),
            user: user.map(str::to_owned),
            host: host.map(str::to_owned),
        }
    }

    /// Whether no part of the prefix is set.
    pub fn is_empty(&self) -> bool {
        self.nick.is_none() && self.user.is_none() && self.host.is_none()
    }

    /// The nickname, if any.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(nick) = &self.nick {
            f.write_str(nick)?;
        }
        if let Some(user) = &self.user {
            write!(f, "!{}", user)?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{}", host)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_prefix() {
        let p = Prefix::parse("nick!user@host");
        assert_eq!(p.nick.as_deref(), Some("nick"));
        assert_eq!(p.user.as_deref(), Some("user"));
        assert_eq!(p.host.as_deref(), Some("host"));
        assert_eq!(p.to_string(), "nick!user@host");
    }

    #[test]
    fn test_nick_only() {
        let p = Prefix::parse("irc.example.net");
        assert_eq!(p.nick.as_deref(), Some("irc.example.net"));
        assert_eq!(p.user, None);
        assert_eq!(p.host, None);
    }

    #[test]
    fn test_nick_and_user() {
        let p = Prefix::parse("lorem!ipsum");
        assert_eq!(p.nick.as_deref(), Some("lorem"));
        assert_eq!(p.user.as_deref(), Some("ipsum"));
        assert_eq!(p.host, None);
    }

    #[test]
    fn test_nick_and_host() {
        let p = Prefix::parse("nick@host.example");
        assert_eq!(p.nick.as_deref(), Some("nick"));
        assert_eq!(p.user, None);
        assert_eq!(p.host.as_deref(), Some("host.example"));
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Prefix::default().is_empty());
        assert!(!Prefix::parse("x").is_empty());
    }
}
