//! Structured IRC messages.
//!
//! A [`Message`] is what one wire line turns into: optional IRCv3 tags,
//! an optional sender [`Prefix`], a command (alphabetic or a three-digit
//! numeric) and an ordered parameter list.

use std::collections::HashMap;
use std::fmt;

use crate::prefix::Prefix;

mod format;
mod parse;
pub mod tags;

pub use self::format::{format_line, needs_colon_prefix, write_line};

/// Value of a single IRCv3 message tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    /// Bare key with no `=` (boolean true).
    Flag,
    /// `key=value`, unescaped.
    Text(String),
}

impl TagValue {
    /// Text content, if the tag carried a value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Text(s) => Some(s),
        }
    }

    /// A present tag is always truthy.
    pub fn as_bool(&self) -> bool {
        true
    }
}

/// A parsed IRC message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// IRCv3 tags; empty when the line had no tag section.
    pub tags: HashMap<String, TagValue>,
    /// Sender description; all fields unset when the line had no prefix.
    pub prefix: Prefix,
    /// Command name or numeric code, exactly as received.
    pub command: String,
    /// Parameters, trailing one included.
    pub params: Vec<String>,
}

impl Message {
    /// Build an outgoing message from a command and its parameters.
    pub fn new<S: Into<String>>(command: &str, params: impl IntoIterator<Item = S>) -> Self {
        Self {
            tags: HashMap::new(),
            prefix: Prefix::default(),
            command: command.to_owned(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a tag, returning the modified message.
    #[must_use]
    pub fn with_tag(mut self, key: &str, value: Option<&str>) -> Self {
        let value = match value {
            Some(v) => TagValue::Text(v.to_owned()),
            None => TagValue::Flag,
        };
        self.tags.insert(key.to_owned(), value);
        self
    }

    /// Get a parameter by index.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Look up a tag by key.
    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Whether the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }

    /// Serialize to a wire line, CRLF included.
    pub fn to_line(&self) -> String {
        let mut line = self.to_string();
        line.push_str("\r\n");
        line
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            f.write_str("@")?;
            let mut keys: Vec<&String> = self.tags.keys().collect();
            keys.sort();
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(";")?;
                }
                f.write_str(key)?;
                if let Some(TagValue::Text(value)) = self.tags.get(key) {
                    f.write_str("=")?;
                    tags::escape_tag_value(f, value)?;
                }
            }
            f.write_str(" ")?;
        }

        if !self.prefix.is_empty() {
            write!(f, ":{} ", self.prefix)?;
        }

        write_line(f, &self.command, &self.params)
    }
}
