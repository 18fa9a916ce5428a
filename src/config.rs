//! Configuration loading for the hotkey binding.
//!
//! The config file is a plain text file (`config.ini` by default) with two
//! recognized line prefixes:
//!
//! ```text
//! MOD=3
//! KEY=71
//! ```
//!
//! `MOD` is a decimal bitmask (1=Alt, 2=Ctrl, 4=Shift, 8=Meta) and `KEY` is a
//! decimal Windows-style virtual key code (71 is 'G'). Any other line is
//! ignored. A missing file or a missing line leaves that field at its
//! default; the last valid matching line wins when a prefix appears more
//! than once, and a malformed integer suffix is skipped without disturbing
//! an earlier valid value.

use std::fmt;
use std::fs;
use std::path::Path;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GuidTyperError, Result};

/// Default name of the configuration file, resolved relative to the working
/// directory.
pub const CONFIG_FILE: &str = "config.ini";

/// Modifier mask bit for Alt.
pub const MOD_ALT: u32 = 1;
/// Modifier mask bit for Ctrl.
pub const MOD_CTRL: u32 = 2;
/// Modifier mask bit for Shift.
pub const MOD_SHIFT: u32 = 4;
/// Modifier mask bit for Meta (Win/Cmd/Super).
pub const MOD_META: u32 = 8;

/// Default modifier mask: Ctrl+Alt.
pub const DEFAULT_MODIFIERS: u32 = MOD_CTRL | MOD_ALT;
/// Default key code: 'G'.
pub const DEFAULT_KEY: u32 = 71;

/// The modifier+key combination that triggers identifier generation.
///
/// Exactly one binding is active at a time; reloads replace it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    /// Bitmask of modifier keys (1=Alt, 2=Ctrl, 4=Shift, 8=Meta).
    pub modifiers: u32,
    /// Decimal virtual key code (e.g. 65-90 for A-Z).
    pub key: u32,
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self {
            modifiers: DEFAULT_MODIFIERS,
            key: DEFAULT_KEY,
        }
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers & MOD_CTRL != 0 {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers & MOD_ALT != 0 {
            write!(f, "Alt+")?;
        }
        if self.modifiers & MOD_SHIFT != 0 {
            write!(f, "Shift+")?;
        }
        if self.modifiers & MOD_META != 0 {
            write!(f, "Meta+")?;
        }
        match key_name(self.key) {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "key({})", self.key),
        }
    }
}

impl HotkeyBinding {
    /// Convert this binding into a `global_hotkey` registration.
    ///
    /// Fails if the key code has no known mapping; callers treat that the
    /// same way as a registration conflict (non-fatal, hotkey disabled).
    pub fn to_hotkey(&self) -> Result<HotKey> {
        let code = key_code(self.key)?;
        let mods = modifier_flags(self.modifiers);
        if mods.is_empty() {
            Ok(HotKey::new(None, code))
        } else {
            Ok(HotKey::new(Some(mods), code))
        }
    }
}

/// Loaded configuration. Currently just the hotkey binding; read fresh on
/// every load, never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    pub binding: HotkeyBinding,
}

/// Outcome of scanning the file for one field's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParse {
    /// A well-formed `PREFIX=<decimal>` line was found; last one wins.
    Value(u32),
    /// No line with this prefix exists.
    Absent,
    /// Lines with this prefix exist but none had a numeric suffix.
    Malformed,
}

impl FieldParse {
    /// Resolve against a fallback value (the default or prior value).
    pub fn or_default(self, fallback: u32) -> u32 {
        match self {
            FieldParse::Value(v) => v,
            FieldParse::Absent | FieldParse::Malformed => fallback,
        }
    }
}

/// Scan `contents` for lines starting with `prefix` and parse the decimal
/// suffix of the last valid such line. Valid lines overwrite sequentially; a
/// malformed line is skipped, keeping whatever value stood before it.
pub fn parse_field(contents: &str, prefix: &str) -> FieldParse {
    let mut result = FieldParse::Absent;
    for line in contents.lines() {
        if let Some(suffix) = line.strip_prefix(prefix) {
            match suffix.trim().parse::<u32>() {
                Ok(value) => result = FieldParse::Value(value),
                Err(_) => {
                    warn!("ignoring malformed config line {line:?}");
                    if result == FieldParse::Absent {
                        result = FieldParse::Malformed;
                    }
                }
            }
        }
    }
    result
}

impl Config {
    /// Load configuration from the default `config.ini`.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file is unreadable or a field is absent/malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("config file {} not readable ({e}), using defaults", path.display());
                return Self::default();
            }
        };
        Self::parse(&contents)
    }

    /// Parse configuration text. Unrecognized lines are ignored; a malformed
    /// numeric suffix leaves the field at the last valid value, or its
    /// default when no line parsed at all.
    pub fn parse(contents: &str) -> Self {
        let defaults = HotkeyBinding::default();
        Self {
            binding: HotkeyBinding {
                modifiers: parse_field(contents, "MOD=").or_default(defaults.modifiers),
                key: parse_field(contents, "KEY=").or_default(defaults.key),
            },
        }
    }
}

/// Translate the decimal modifier mask into `global_hotkey` modifier flags.
pub fn modifier_flags(mask: u32) -> Modifiers {
    let mut flags = Modifiers::empty();
    if mask & MOD_ALT != 0 {
        flags |= Modifiers::ALT;
    }
    if mask & MOD_CTRL != 0 {
        flags |= Modifiers::CONTROL;
    }
    if mask & MOD_SHIFT != 0 {
        flags |= Modifiers::SHIFT;
    }
    if mask & MOD_META != 0 {
        flags |= Modifiers::SUPER;
    }
    flags
}

/// Translate a decimal Windows-style virtual key code into a physical key.
pub fn key_code(vk: u32) -> Result<Code> {
    let code = match vk {
        // Letters (A-Z)
        65 => Code::KeyA,
        66 => Code::KeyB,
        67 => Code::KeyC,
        68 => Code::KeyD,
        69 => Code::KeyE,
        70 => Code::KeyF,
        71 => Code::KeyG,
        72 => Code::KeyH,
        73 => Code::KeyI,
        74 => Code::KeyJ,
        75 => Code::KeyK,
        76 => Code::KeyL,
        77 => Code::KeyM,
        78 => Code::KeyN,
        79 => Code::KeyO,
        80 => Code::KeyP,
        81 => Code::KeyQ,
        82 => Code::KeyR,
        83 => Code::KeyS,
        84 => Code::KeyT,
        85 => Code::KeyU,
        86 => Code::KeyV,
        87 => Code::KeyW,
        88 => Code::KeyX,
        89 => Code::KeyY,
        90 => Code::KeyZ,

        // Digits (0-9)
        48 => Code::Digit0,
        49 => Code::Digit1,
        50 => Code::Digit2,
        51 => Code::Digit3,
        52 => Code::Digit4,
        53 => Code::Digit5,
        54 => Code::Digit6,
        55 => Code::Digit7,
        56 => Code::Digit8,
        57 => Code::Digit9,

        // Function keys
        112 => Code::F1,
        113 => Code::F2,
        114 => Code::F3,
        115 => Code::F4,
        116 => Code::F5,
        117 => Code::F6,
        118 => Code::F7,
        119 => Code::F8,
        120 => Code::F9,
        121 => Code::F10,
        122 => Code::F11,
        123 => Code::F12,

        // Special keys
        8 => Code::Backspace,
        9 => Code::Tab,
        13 => Code::Enter,
        27 => Code::Escape,
        32 => Code::Space,
        33 => Code::PageUp,
        34 => Code::PageDown,
        35 => Code::End,
        36 => Code::Home,
        45 => Code::Insert,
        46 => Code::Delete,

        // Arrow keys
        37 => Code::ArrowLeft,
        38 => Code::ArrowUp,
        39 => Code::ArrowRight,
        40 => Code::ArrowDown,

        _ => {
            return Err(GuidTyperError::invalid_key_code(
                vk,
                "no mapping for this virtual key code",
            ))
        }
    };

    Ok(code)
}

/// Human-readable name for a key code, for tooltips and logs.
fn key_name(vk: u32) -> Option<String> {
    match vk {
        65..=90 => Some(char::from(vk as u8).to_string()),
        48..=57 => Some(char::from(vk as u8).to_string()),
        112..=123 => Some(format!("F{}", vk - 111)),
        8 => Some("Backspace".into()),
        9 => Some("Tab".into()),
        13 => Some("Enter".into()),
        27 => Some("Escape".into()),
        32 => Some("Space".into()),
        33 => Some("PageUp".into()),
        34 => Some("PageDown".into()),
        35 => Some("End".into()),
        36 => Some("Home".into()),
        45 => Some("Insert".into()),
        46 => Some("Delete".into()),
        37 => Some("Left".into()),
        38 => Some("Up".into()),
        39 => Some("Right".into()),
        40 => Some("Down".into()),
        _ => None,
    }
}
