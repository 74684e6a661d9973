//! Integration tests for message parsing and serialization
//!
//! These tests verify that messages can be parsed from strings and then
//! serialized back to equivalent strings, ensuring round-trip compatibility.

use slirc_client::{format_line, Message, Prefix, TagValue};

fn round_trip(original: &str) -> Message {
    let message = Message::parse(original);
    let reparsed = Message::parse(&message.to_string());
    assert_eq!(message, reparsed, "round trip changed {:?}", original);
    message
}

#[test]
fn test_message_round_trip_simple() {
    let message = round_trip("PING :irc.example.com");
    assert_eq!(message.command, "PING");
    assert_eq!(message.params, vec!["irc.example.com"]);
    assert_eq!(message.to_string(), "PING irc.example.com");
}

#[test]
fn test_message_round_trip_with_prefix() {
    let message = round_trip(":nick!user@host PRIVMSG #channel :Hello, world!");
    assert_eq!(
        message.prefix,
        Prefix {
            nick: Some("nick".into()),
            user: Some("user".into()),
            host: Some("host".into()),
        }
    );
    assert_eq!(message.param(1), Some("Hello, world!"));
}

#[test]
fn test_message_round_trip_with_tags() {
    let message = round_trip(
        "@time=2023-01-01T00:00:00.000Z;msgid=abc123 :nick!user@host PRIVMSG #channel :Tagged message",
    );
    assert_eq!(
        message.tag("msgid"),
        Some(&TagValue::Text("abc123".into()))
    );
    assert_eq!(message.tags.len(), 2);
}

#[test]
fn test_message_round_trip_numeric_response() {
    let message = round_trip(":server 001 nickname :Welcome to the IRC Network");
    assert!(message.is_numeric());
    assert_eq!(message.params.len(), 2);
}

#[test]
fn test_message_round_trip_complex_tags() {
    let message = round_trip(
        "@batch=abc123;msgid=def456;time=2023-01-01T12:00:00Z;+custom=value :nick BATCH +abc123 chathistory #channel",
    );
    assert_eq!(message.tag("+custom").and_then(TagValue::as_str), Some("value"));
    assert_eq!(message.params, vec!["+abc123", "chathistory", "#channel"]);
}

#[test]
fn test_message_round_trip_escaped_tag_values() {
    let message = round_trip(r"@note=a\sb\:c\\d\r\n;flag :srv NOTICE * :hi");
    assert_eq!(
        message.tag("note").and_then(TagValue::as_str),
        Some("a b;c\\d\r\n")
    );
    assert_eq!(message.tag("flag"), Some(&TagValue::Flag));
}

#[test]
fn test_trailing_edge_cases() {
    let message = round_trip("TOPIC #ch :");
    assert_eq!(message.params, vec!["#ch", ""]);

    let message = round_trip("PRIVMSG #ch ::-)");
    assert_eq!(message.param(1), Some(":-)"));

    let message = round_trip("PRIVMSG #ch :a :b c");
    assert_eq!(message.param(1), Some("a :b c"));
}

#[test]
fn test_constructed_message_matches_format_line() {
    let message = Message::new("PRIVMSG", ["#rust", "hello there"]);
    assert_eq!(message.to_line(), format_line("PRIVMSG", &["#rust", "hello there"]));
    assert_eq!(Message::parse(&message.to_line()), message);
}

#[test]
fn test_from_str_is_infallible() {
    let message: Message = "garbage without structure".parse().unwrap();
    assert_eq!(message.command, "garbage");
    let message: Message = "".parse().unwrap();
    assert!(message.command.is_empty());
}
