//! Nom-based IRC line parser.
//!
//! Parsing is a single left-to-right pass and never fails: a line that
//! does not look like IRC degrades to a message with an empty command
//! and no parameters.

use std::collections::HashMap;

use nom::{
    bytes::complete::{take_till, take_while},
    character::complete::char,
    combinator::opt,
    sequence::preceded,
    IResult,
};

use super::tags::unescape_tag_value;
use super::{Message, TagValue};
use crate::prefix::Prefix;

/// Raw tag section (after `@`, up to the first space).
fn tag_section(input: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(char('@'), take_till(|c: char| c == ' ')))(input)
}

/// Raw prefix (after `:`, up to the first space).
fn prefix_section(input: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(char(':'), take_till(|c: char| c == ' ')))(input)
}

fn spaces(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ')(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == ' ')(input)
}

struct RawParts<'a> {
    tags: Option<&'a str>,
    prefix: Option<&'a str>,
    command: &'a str,
    params: Vec<&'a str>,
}

fn raw_parts(input: &str) -> IResult<&str, RawParts<'_>> {
    let (input, tags) = tag_section(input)?;
    let (input, _) = spaces(input)?;
    let (input, prefix) = prefix_section(input)?;
    let (input, _) = spaces(input)?;
    let (mut rest, command) = token(input)?;

    let mut params = Vec::new();
    loop {
        let (after_spaces, _) = spaces(rest)?;
        if after_spaces.is_empty() {
            rest = after_spaces;
            break;
        }
        if let Some(trailing) = after_spaces.strip_prefix(':') {
            params.push(trailing);
            rest = "";
            break;
        }
        let (after_param, param) = token(after_spaces)?;
        params.push(param);
        rest = after_param;
    }

    Ok((rest, RawParts { tags, prefix, command, params }))
}

/// Split a raw tag section into a key/value map.
///
/// Empty segments (such as the one left by a trailing `;`) are skipped and
/// later duplicates overwrite earlier ones.
pub(crate) fn parse_tags(raw: &str) -> HashMap<String, TagValue> {
    let mut tags = HashMap::new();
    for segment in raw.split(';').filter(|s| !s.is_empty()) {
        let (key, value) = match segment.split_once('=') {
            Some((key, value)) => (key, TagValue::Text(unescape_tag_value(value))),
            None => (segment, TagValue::Flag),
        };
        tags.insert(key.to_owned(), value);
    }
    tags
}

impl Message {
    /// Parse one line into a message.
    ///
    /// The line should not contain a line terminator; a trailing `\r\n`
    /// is tolerated and ignored.
    pub fn parse(line: &str) -> Message {
        let line = line.trim_end_matches(['\r', '\n']);

        let parts = match raw_parts(line) {
            Ok((_, parts)) => parts,
            Err(_) => return Message::default(),
        };

        Message {
            tags: parts.tags.map(parse_tags).unwrap_or_default(),
            prefix: parts.prefix.map(Prefix::parse).unwrap_or_default(),
            command: parts.command.to_owned(),
            params: parts.params.into_iter().map(str::to_owned).collect(),
        }
    }
}

impl std::str::FromStr for Message {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Message::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag() -> TagValue {
        TagValue::Flag
    }

    fn text(s: &str) -> TagValue {
        TagValue::Text(s.to_owned())
    }

    #[test]
    fn test_parse_bare_command() {
        let msg = Message::parse("FOO");
        assert_eq!(msg.command, "FOO");
        assert!(msg.params.is_empty());
        assert!(msg.tags.is_empty());
        assert!(msg.prefix.is_empty());
    }

    #[test]
    fn test_parse_trailing_space() {
        let msg = Message::parse("FOO ");
        assert_eq!(msg.command, "FOO");
        assert!(msg.params.is_empty());

        let msg = Message::parse("FOO bar ");
        assert_eq!(msg.params, vec!["bar"]);
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(Message::parse("FOO bar").params, vec!["bar"]);
        assert_eq!(Message::parse("FOO bar baz").params, vec!["bar", "baz"]);
        assert_eq!(
            Message::parse("FOO bar baz qux").params,
            vec!["bar", "baz", "qux"]
        );
    }

    #[test]
    fn test_double_spaces_collapse() {
        assert_eq!(Message::parse("FOO  bar").params, vec!["bar"]);
        assert_eq!(Message::parse("FOO bar  baz").params, vec!["bar", "baz"]);
        assert_eq!(
            Message::parse("FOO bar   :baz  qux").params,
            vec!["bar", "baz  qux"]
        );
    }

    #[test]
    fn test_parse_trailing() {
        let msg = Message::parse("FOO bar :baz qux");
        assert_eq!(msg.params, vec!["bar", "baz qux"]);

        let msg = Message::parse("PRIVMSG #ch ::-) smile");
        assert_eq!(msg.params, vec!["#ch", ":-) smile"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        assert_eq!(Message::parse("FOO bar :").params, vec!["bar", ""]);
    }

    #[test]
    fn test_trailing_is_not_split() {
        let msg = Message::parse("FOO :a :b c");
        assert_eq!(msg.params, vec!["a :b c"]);
    }

    #[test]
    fn test_parse_prefix_variants() {
        let msg = Message::parse(":lorem FOO");
        assert_eq!(msg.prefix.nick.as_deref(), Some("lorem"));
        assert_eq!(msg.prefix.user, None);
        assert_eq!(msg.prefix.host, None);
        assert_eq!(msg.command, "FOO");
        assert!(msg.params.is_empty());

        let msg = Message::parse(":lorem!ipsum FOO");
        assert_eq!(msg.prefix.user.as_deref(), Some("ipsum"));
        assert_eq!(msg.prefix.host, None);

        let msg = Message::parse(":lorem!ipsum@dolor FOO");
        assert_eq!(msg.prefix.nick.as_deref(), Some("lorem"));
        assert_eq!(msg.prefix.user.as_deref(), Some("ipsum"));
        assert_eq!(msg.prefix.host.as_deref(), Some("dolor"));
    }

    #[test]
    fn test_parse_prefix_extra_spaces() {
        let msg = Message::parse(":lorem!ipsum@dolor   FOO  bar");
        assert_eq!(msg.prefix.host.as_deref(), Some("dolor"));
        assert_eq!(msg.command, "FOO");
        assert_eq!(msg.params, vec!["bar"]);
    }

    #[test]
    fn test_parse_tags() {
        let cases: &[(&str, &[(&str, TagValue)])] = &[
            ("@foo :lorem!ipsum@dolor FOO", &[("foo", flag())]),
            ("@foo; :lorem!ipsum@dolor FOO", &[("foo", flag())]),
            ("@foo=bar :lorem!ipsum@dolor FOO", &[("foo", text("bar"))]),
            ("@foo=bar; :lorem!ipsum@dolor FOO", &[("foo", text("bar"))]),
            ("@foo;bar :lorem!ipsum@dolor FOO", &[("foo", flag()), ("bar", flag())]),
            (
                "@foo;bar=baz; :lorem!ipsum@dolor FOO",
                &[("foo", flag()), ("bar", text("baz"))],
            ),
        ];

        for (line, expected) in cases {
            let msg = Message::parse(line);
            assert_eq!(msg.tags.len(), expected.len(), "tag count for {}", line);
            for (key, value) in expected.iter() {
                assert_eq!(msg.tags.get(*key), Some(value), "tag {} for {}", key, line);
            }
            assert_eq!(msg.prefix.nick.as_deref(), Some("lorem"));
            assert_eq!(msg.command, "FOO");
        }
    }

    #[test]
    fn test_parse_tags_without_prefix() {
        let msg = Message::parse("@a;b=c :nick FOO");
        assert_eq!(msg.tags.get("a"), Some(&TagValue::Flag));
        assert_eq!(msg.tags.get("b"), Some(&text("c")));

        let msg = Message::parse("@time=2023-01-01T00:00:00Z PING :x");
        assert_eq!(msg.tags.get("time"), Some(&text("2023-01-01T00:00:00Z")));
        assert!(msg.prefix.is_empty());
        assert_eq!(msg.command, "PING");
    }

    #[test]
    fn test_duplicate_tags_overwrite() {
        let msg = Message::parse("@a=1;a=2 FOO");
        assert_eq!(msg.tags.get("a"), Some(&text("2")));
    }

    #[test]
    fn test_tag_values_unescaped() {
        let msg = Message::parse("@note=a\\sb\\:c FOO");
        assert_eq!(msg.tags.get("note"), Some(&text("a b;c")));
    }

    #[test]
    fn test_parse_numeric() {
        let msg = Message::parse(":server 001 nick :Welcome to IRC");
        assert_eq!(msg.command, "001");
        assert_eq!(msg.params, vec!["nick", "Welcome to IRC"]);
    }

    #[test]
    fn test_parse_with_crlf() {
        let msg = Message::parse("PING :server\r\n");
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["server"]);
    }

    #[test]
    fn test_malformed_never_fails() {
        let msg = Message::parse("");
        assert_eq!(msg.command, "");
        assert!(msg.params.is_empty());

        let msg = Message::parse(":prefix-only");
        assert_eq!(msg.command, "");
        assert!(msg.params.is_empty());

        let msg = Message::parse("@tags-only");
        assert_eq!(msg.command, "");
        assert_eq!(msg.tags.get("tags-only"), Some(&TagValue::Flag));

        let msg = Message::parse("   ");
        assert_eq!(msg.command, "");
    }

    #[test]
    fn test_from_str() {
        let msg: Message = "JOIN #rust".parse().unwrap();
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.params, vec!["#rust"]);
    }
}
