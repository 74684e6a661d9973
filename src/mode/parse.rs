//! User mode string parsing.

/// One `+x`/`-x` change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChange {
    /// The flag was turned on.
    Plus(char),
    /// The flag was turned off.
    Minus(char),
}

impl ModeChange {
    /// The mode letter.
    pub fn mode(&self) -> char {
        match *self {
            Self::Plus(c) | Self::Minus(c) => c,
        }
    }

    /// Whether the change sets the flag.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Plus(_))
    }
}

enum PlusMinus {
    Plus,
    Minus,
}

/// Parse a user mode string such as `+iw-x` into individual changes.
///
/// Letters before any sign count as additions. Spaces are skipped, so a
/// mode string spread over several parameters can be joined and passed in.
pub fn parse_user_modes(spec: &str) -> Vec<ModeChange> {
    use self::PlusMinus::*;

    let mut cur = Plus;
    let mut res = Vec::with_capacity(spec.len());
    for c in spec.chars() {
        match c {
            '+' => cur = Plus,
            '-' => cur = Minus,
            ' ' => {}
            c => res.push(match cur {
                Plus => ModeChange::Plus(c),
                Minus => ModeChange::Minus(c),
            }),
        }
    }
    res
}
