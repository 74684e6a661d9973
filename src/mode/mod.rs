//! User mode tracking.
//!
//! [`UserModeSet`] mirrors the modes the server has applied to our own
//! nick. It is only ever changed by the session in response to server
//! messages (`MODE`, `RPL_UMODEIS`, `RPL_MYINFO`, `RPL_NOWAWAY`,
//! `RPL_UNAWAY`) and is emptied when the connection closes.

use std::collections::HashMap;

mod parse;
pub mod umodes;

pub use self::parse::{parse_user_modes, ModeChange};
pub use self::umodes::user_mode_name;

/// Map of user mode letter to whether it is currently set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserModeSet {
    modes: HashMap<char, bool>,
}

impl UserModeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `mode` is currently set. Unknown letters are unset.
    pub fn is_set(&self, mode: char) -> bool {
        self.modes.get(&mode).copied().unwrap_or(false)
    }

    /// The recorded value for `mode`, or `None` if the letter was never seen.
    pub fn get(&self, mode: char) -> Option<bool> {
        self.modes.get(&mode).copied()
    }

    /// Letters currently set, sorted.
    pub fn active(&self) -> Vec<char> {
        let mut active: Vec<char> = self
            .modes
            .iter()
            .filter_map(|(&c, &on)| on.then_some(c))
            .collect();
        active.sort_unstable();
        active
    }

    /// Number of letters recorded, set or not.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether no letter has been recorded.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub(crate) fn set(&mut self, mode: char, on: bool) {
        self.modes.insert(mode, on);
    }

    /// Register every letter the server advertises as known and unset.
    pub(crate) fn seed(&mut self, letters: &str) {
        for c in letters.chars().filter(char::is_ascii_alphabetic) {
            self.modes.entry(c).or_insert(false);
        }
    }

    /// Apply a mode string such as `+iw-x`.
    pub(crate) fn apply(&mut self, spec: &str) -> Vec<ModeChange> {
        let changes = parse_user_modes(spec);
        for change in &changes {
            self.set(change.mode(), change.is_set());
        }
        changes
    }

    /// Replace the current modes with a complete mode string, as carried by
    /// `RPL_UMODEIS`. Known letters not listed become unset.
    pub(crate) fn replace(&mut self, spec: &str) -> Vec<ModeChange> {
        self.modes.values_mut().for_each(|on| *on = false);
        self.apply(spec)
    }

    pub(crate) fn clear(&mut self) {
        self.modes.clear();
    }
}
