//! IRCv3 tag value escaping.
//!
//! | raw | escaped |
//! |-----|---------|
//! | `;` | `\:`    |
//! | ` ` | `\s`    |
//! | `\` | `\\`    |
//! | CR  | `\r`    |
//! | LF  | `\n`    |

use std::fmt::{Result as FmtResult, Write};

/// Write `value` to `f` with IRCv3 escaping applied.
pub fn escape_tag_value<W: Write + ?Sized>(f: &mut W, value: &str) -> FmtResult {
    for c in value.chars() {
        match c {
            ';' => f.write_str("\\:")?,
            ' ' => f.write_str("\\s")?,
            '\\' => f.write_str("\\\\")?,
            '\r' => f.write_str("\\r")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Reverse [`escape_tag_value`].
///
/// An unknown escape yields the escaped character itself and a lone
/// trailing backslash is dropped.
pub fn unescape_tag_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_owned();
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => break,
        }
    }
    out
}
