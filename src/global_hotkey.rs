//! Global hotkey registration.
//!
//! Wraps the `global-hotkey` manager behind a [`Registrar`] trait so the
//! at-most-one-active-binding invariant is testable without OS registrations.
//! Reloads always release the previous binding before attempting the new
//! one; a failed attempt leaves the app running with no hotkey until the
//! next successful reload.

use global_hotkey::{hotkey::HotKey, GlobalHotKeyManager};
use tracing::{info, warn};

use crate::config::HotkeyBinding;
use crate::error::{GuidTyperError, Result};

/// System-wide hotkey registration service.
pub trait Registrar {
    fn register(&mut self, hotkey: HotKey) -> Result<()>;
    fn unregister(&mut self, hotkey: HotKey) -> Result<()>;
}

/// Production registrar backed by the OS hotkey service.
pub struct SystemRegistrar {
    manager: GlobalHotKeyManager,
}

impl SystemRegistrar {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| GuidTyperError::hotkey(format!("failed to create manager: {e}")))?;
        Ok(Self { manager })
    }
}

impl Registrar for SystemRegistrar {
    fn register(&mut self, hotkey: HotKey) -> Result<()> {
        self.manager
            .register(hotkey)
            .map_err(|e| GuidTyperError::hotkey(e.to_string()))
    }

    fn unregister(&mut self, hotkey: HotKey) -> Result<()> {
        self.manager
            .unregister(hotkey)
            .map_err(|e| GuidTyperError::hotkey(e.to_string()))
    }
}

/// Owns the single active registration and enforces
/// unregister-before-register sequencing.
pub struct HotkeyManager<R: Registrar> {
    registrar: R,
    active: Option<HotKey>,
}

impl<R: Registrar> HotkeyManager<R> {
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            active: None,
        }
    }

    /// Replace the active registration with `binding`.
    ///
    /// The previous registration is released first in all cases; on failure
    /// no binding remains active. Returns the hotkey id for event matching.
    pub fn rebind(&mut self, binding: &HotkeyBinding) -> Result<u32> {
        self.release();

        let hotkey = binding.to_hotkey()?;
        self.registrar.register(hotkey)?;
        self.active = Some(hotkey);
        info!("registered global hotkey {binding}");
        Ok(hotkey.id())
    }

    /// Release the active registration, if any. Idempotent.
    pub fn release(&mut self) {
        if let Some(hotkey) = self.active.take() {
            if let Err(e) = self.registrar.unregister(hotkey) {
                warn!("failed to unregister hotkey: {e}");
            }
        }
    }

    /// Id of the active registration, for matching incoming events.
    pub fn active_id(&self) -> Option<u32> {
        self.active.map(|hotkey| hotkey.id())
    }
}

impl<R: Registrar> Drop for HotkeyManager<R> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MOD_CTRL;
    use crate::testing::MockRegistrar;

    #[test]
    fn test_rebind_registers_once() {
        let registrar = MockRegistrar::new();
        let mut manager = HotkeyManager::new(registrar.clone());
        let id = manager.rebind(&HotkeyBinding::default()).unwrap();

        assert_eq!(registrar.live(), vec![id]);
        assert_eq!(manager.active_id(), Some(id));
    }

    #[test]
    fn test_rebind_never_leaves_two_registrations() {
        let registrar = MockRegistrar::new();
        let mut manager = HotkeyManager::new(registrar.clone());
        manager.rebind(&HotkeyBinding::default()).unwrap();
        manager
            .rebind(&HotkeyBinding {
                modifiers: MOD_CTRL,
                key: 66,
            })
            .unwrap();

        assert_eq!(registrar.live().len(), 1);
    }

    #[test]
    fn test_rebind_same_binding_is_idempotent() {
        let binding = HotkeyBinding::default();
        let registrar = MockRegistrar::new();
        let mut manager = HotkeyManager::new(registrar.clone());
        let first = manager.rebind(&binding).unwrap();
        let second = manager.rebind(&binding).unwrap();

        assert_eq!(first, second);
        assert_eq!(registrar.live().len(), 1);
    }

    #[test]
    fn test_failed_rebind_releases_previous_binding() {
        let registrar = MockRegistrar::new();
        let mut manager = HotkeyManager::new(registrar.clone());
        manager.rebind(&HotkeyBinding::default()).unwrap();

        registrar.set_reject_all(true);
        let result = manager.rebind(&HotkeyBinding {
            modifiers: MOD_CTRL,
            key: 66,
        });

        assert!(result.is_err());
        assert!(registrar.live().is_empty());
        assert_eq!(manager.active_id(), None);
    }

    #[test]
    fn test_rebind_unknown_key_code_fails_cleanly() {
        let mut manager = HotkeyManager::new(MockRegistrar::new());
        let result = manager.rebind(&HotkeyBinding {
            modifiers: MOD_CTRL,
            key: 999,
        });

        assert!(result.is_err());
        assert_eq!(manager.active_id(), None);
    }

    #[test]
    fn test_release_is_idempotent() {
        let registrar = MockRegistrar::new();
        let mut manager = HotkeyManager::new(registrar.clone());
        manager.rebind(&HotkeyBinding::default()).unwrap();
        manager.release();
        manager.release();

        assert!(registrar.live().is_empty());
        assert_eq!(manager.active_id(), None);
    }
}
