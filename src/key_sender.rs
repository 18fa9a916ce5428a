//! Synthetic keystroke injection.
//!
//! Text is encoded as a batch of per-character key-down/key-up events
//! carrying the character's code point rather than a virtual key code, so
//! arbitrary Unicode injects the same regardless of keyboard layout. The
//! batch is handed to an [`InputBackend`] in one call; delivery is
//! best-effort and failures are not surfaced, matching the OS input queue's
//! own semantics.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::debug;

use crate::error::{GuidTyperError, Result};

/// Whether a synthetic event presses or releases its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Press,
    Release,
}

/// One synthetic keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub ch: char,
    pub direction: KeyDirection,
}

/// Encode text into alternating press/release pairs, one pair per character,
/// in character order. The result always has length `2 * char_count`.
pub fn encode(text: &str) -> Vec<KeyEvent> {
    let mut events = Vec::with_capacity(text.chars().count() * 2);
    for ch in text.chars() {
        events.push(KeyEvent {
            ch,
            direction: KeyDirection::Press,
        });
        events.push(KeyEvent {
            ch,
            direction: KeyDirection::Release,
        });
    }
    events
}

/// Sink for a batch of synthetic key events. Fire-and-forget: there is no
/// focused-target check and no error surface.
pub trait InputBackend {
    fn submit(&mut self, events: &[KeyEvent]);
}

/// Production backend driving the OS input queue through `enigo`.
pub struct EnigoBackend {
    enigo: Enigo,
}

impl EnigoBackend {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| GuidTyperError::input_backend(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl InputBackend for EnigoBackend {
    fn submit(&mut self, events: &[KeyEvent]) {
        for event in events {
            let direction = match event.direction {
                KeyDirection::Press => Direction::Press,
                KeyDirection::Release => Direction::Release,
            };
            // Best-effort delivery; a vanished focus target is not an error.
            let _ = self.enigo.key(Key::Unicode(event.ch), direction);
        }
    }
}

/// Types text into whatever application has input focus.
pub struct KeySender<B: InputBackend> {
    backend: B,
}

impl KeySender<EnigoBackend> {
    pub fn new() -> Result<Self> {
        Ok(Self {
            backend: EnigoBackend::new()?,
        })
    }
}

impl<B: InputBackend> KeySender<B> {
    /// Build a sender over a custom backend (used by tests).
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Replay `text` as one batch of synthetic down/up events.
    pub fn type_text(&mut self, text: &str) {
        let events = encode(text);
        debug!("submitting {} synthetic key events", events.len());
        self.backend.submit(&events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[test]
    fn test_encode_length_and_order() {
        let text = "ab-1";
        let events = encode(text);
        assert_eq!(events.len(), 2 * text.chars().count());

        for (i, ch) in text.chars().enumerate() {
            assert_eq!(events[2 * i].ch, ch);
            assert_eq!(events[2 * i].direction, KeyDirection::Press);
            assert_eq!(events[2 * i + 1].ch, ch);
            assert_eq!(events[2 * i + 1].direction, KeyDirection::Release);
        }
    }

    #[test]
    fn test_encode_unicode() {
        let events = encode("äß→");
        assert_eq!(events.len(), 6);
        assert_eq!(events[4].ch, '→');
    }

    #[test]
    fn test_encode_empty() {
        assert!(encode("").is_empty());
    }

    #[test]
    fn test_type_text_submits_single_batch() {
        let backend = MockBackend::new();
        let mut sender = KeySender::with_backend(backend.clone());
        sender.type_text("guid");

        let batches = backend.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 8);
    }
}
