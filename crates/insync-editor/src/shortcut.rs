//! Keyboard shortcut matching for the save action

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key
    pub ctrl: bool,
    /// Alt / Option key
    pub alt: bool,
    /// Shift key
    pub shift: bool,
    /// Meta / Command key
    pub meta: bool,
}

impl Modifiers {
    /// Only Ctrl held
    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };
}

/// A key press delivered by the host UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key value as reported by the host, e.g. `"s"`
    pub key: String,
    /// Modifiers held with the key
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl KeyEvent {
    /// Create event for `key` with `modifiers`
    #[must_use]
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            default_prevented: false,
        }
    }

    /// Suppress the host's default handling of this event
    #[inline]
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether default handling was suppressed
    #[inline]
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A modifier+key combination, written as e.g. `ctrl+s`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyChord {
    /// Modifiers that must be held, and no others
    pub modifiers: Modifiers,
    /// Lowercase key value
    pub key: String,
}

impl KeyChord {
    /// Ctrl+S
    #[must_use]
    pub fn ctrl_s() -> Self {
        Self {
            modifiers: Modifiers::CTRL,
            key: "s".to_string(),
        }
    }

    /// Whether `event` is exactly this chord
    ///
    /// Key comparison is exact on the lowercase key; an event carrying extra
    /// modifiers does not match.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.modifiers == self.modifiers && event.key == self.key
    }
}

impl Default for KeyChord {
    fn default() -> Self {
        Self::ctrl_s()
    }
}

impl FromStr for KeyChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                "" => return Err(format!("empty segment in shortcut '{s}'")),
                other if key.is_none() => key = Some(other.to_string()),
                _ => return Err(format!("shortcut '{s}' names more than one key")),
            }
        }

        let key = key.ok_or_else(|| format!("shortcut '{s}' names no key"))?;
        Ok(Self { modifiers, key })
    }
}

impl TryFrom<String> for KeyChord {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyChord> for String {
    fn from(chord: KeyChord) -> Self {
        chord.to_string()
    }
}

impl std::fmt::Display for KeyChord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = self.modifiers;
        for (held, name) in [(m.ctrl, "ctrl"), (m.alt, "alt"), (m.shift, "shift"), (m.meta, "meta")] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_s_matches_only_exact_chord() {
        let chord = KeyChord::ctrl_s();
        assert!(chord.matches(&KeyEvent::new("s", Modifiers::CTRL)));
        assert!(!chord.matches(&KeyEvent::new("s", Modifiers::default())));
        assert!(!chord.matches(&KeyEvent::new("d", Modifiers::CTRL)));

        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert!(!chord.matches(&KeyEvent::new("s", ctrl_shift)));
    }

    #[test]
    fn parse_and_display() {
        let chord: KeyChord = "Ctrl+Shift+S".parse().unwrap();
        assert!(chord.modifiers.ctrl && chord.modifiers.shift);
        assert_eq!(chord.key, "s");
        assert_eq!(chord.to_string(), "ctrl+shift+s");

        assert_eq!("cmd+s".parse::<KeyChord>().unwrap().to_string(), "meta+s");
    }

    #[test]
    fn parse_rejects_bad_chords() {
        assert!("ctrl".parse::<KeyChord>().is_err());
        assert!("ctrl+a+b".parse::<KeyChord>().is_err());
        assert!("ctrl++s".parse::<KeyChord>().is_err());
    }

    #[test]
    fn prevent_default_is_sticky() {
        let mut event = KeyEvent::new("s", Modifiers::CTRL);
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
