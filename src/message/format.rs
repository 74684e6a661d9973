//! Serialization of a command and its parameters into a wire line.

use std::fmt::{self, Write};

/// Check if a string needs colon-prefixing as a trailing IRC argument.
#[inline]
pub fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Write `command` and `params` to `w`, without the line terminator.
///
/// Only the last parameter is inspected: it gets a `:` prefix when it is
/// empty, starts with `:` or contains a space. Earlier parameters are
/// written as given.
pub fn write_line<W, S>(w: &mut W, command: &str, params: &[S]) -> fmt::Result
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    w.write_str(command)?;

    let Some((trailing, middle)) = params.split_last() else {
        return Ok(());
    };

    for param in middle {
        w.write_char(' ')?;
        w.write_str(param.as_ref())?;
    }

    let trailing = trailing.as_ref();
    w.write_char(' ')?;
    if needs_colon_prefix(trailing) {
        w.write_char(':')?;
    }
    w.write_str(trailing)
}

/// Format `command` and `params` as one CRLF-terminated wire line.
///
/// ```
/// use slirc_client::format_line;
///
/// assert_eq!(format_line("PRIVMSG", &["#rust", "hi there"]), "PRIVMSG #rust :hi there\r\n");
/// assert_eq!(format_line("NICK", &["ferris"]), "NICK ferris\r\n");
/// ```
pub fn format_line<S: AsRef<str>>(command: &str, params: &[S]) -> String {
    let len = command.len() + params.iter().map(|p| p.as_ref().len() + 2).sum::<usize>() + 2;
    let mut line = String::with_capacity(len);
    // Writing into a String cannot fail.
    let _ = write_line(&mut line, command, params);
    line.push_str("\r\n");
    line
}
