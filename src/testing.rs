//! Test doubles for the OS-facing seams.
//!
//! Mocks for the hotkey registrar, the input backend and the tray icon, with
//! handle-style shared state so a test can keep inspecting them after the
//! app has taken ownership. Used by the unit and integration tests; not part
//! of the runtime path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use global_hotkey::hotkey::HotKey;

use crate::app::TrayHandle;
use crate::error::{GuidTyperError, Result};
use crate::global_hotkey::Registrar;
use crate::key_sender::{InputBackend, KeyEvent};

/// Registrar that tracks live registrations instead of touching the OS.
///
/// Clones share state, so tests can hold one handle while the app owns
/// another.
#[derive(Clone, Default)]
pub struct MockRegistrar {
    live: Arc<Mutex<Vec<u32>>>,
    reject_all: Arc<AtomicBool>,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of currently registered hotkeys.
    pub fn live(&self) -> Vec<u32> {
        self.live.lock().expect("lock poisoned").clone()
    }

    /// When set, every register attempt fails as if the combination were
    /// owned by another process.
    pub fn set_reject_all(&self, reject: bool) {
        self.reject_all.store(reject, Ordering::SeqCst);
    }
}

impl Registrar for MockRegistrar {
    fn register(&mut self, hotkey: HotKey) -> Result<()> {
        if self.reject_all.load(Ordering::SeqCst) {
            return Err(GuidTyperError::hotkey("combination already in use"));
        }
        self.live.lock().expect("lock poisoned").push(hotkey.id());
        Ok(())
    }

    fn unregister(&mut self, hotkey: HotKey) -> Result<()> {
        self.live
            .lock()
            .expect("lock poisoned")
            .retain(|&id| id != hotkey.id());
        Ok(())
    }
}

/// Input backend that records submitted batches.
#[derive(Clone, Default)]
pub struct MockBackend {
    batches: Arc<Mutex<Vec<Vec<KeyEvent>>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches submitted so far, in order.
    pub fn batches(&self) -> Vec<Vec<KeyEvent>> {
        self.batches.lock().expect("lock poisoned").clone()
    }
}

impl InputBackend for MockBackend {
    fn submit(&mut self, events: &[KeyEvent]) {
        self.batches
            .lock()
            .expect("lock poisoned")
            .push(events.to_vec());
    }
}

#[derive(Default)]
struct TrayState {
    tooltip: String,
    removed: bool,
}

/// Tray icon stand-in that records tooltip updates and removal.
#[derive(Clone, Default)]
pub struct MockTray {
    state: Arc<Mutex<TrayState>>,
}

impl MockTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tooltip(&self) -> String {
        self.state.lock().expect("lock poisoned").tooltip.clone()
    }

    pub fn removed(&self) -> bool {
        self.state.lock().expect("lock poisoned").removed
    }
}

impl TrayHandle for MockTray {
    fn set_tooltip(&mut self, tooltip: &str) {
        self.state.lock().expect("lock poisoned").tooltip = tooltip.to_string();
    }

    fn remove(&mut self) {
        self.state.lock().expect("lock poisoned").removed = true;
    }
}
