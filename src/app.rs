//! Tray shell coordinator.
//!
//! [`App`] is the single owned context: it holds the config path, the
//! active binding, the hotkey manager, the key sender, the identifier
//! source and the tray handle. All external triggers arrive as [`AppEvent`] values and are
//! dispatched by [`App::handle_event`] on one thread, each handled to
//! completion before the next.

use std::ops::ControlFlow;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{Config, HotkeyBinding};
use crate::generator::{generate_or_sentinel, IdentifierGenerator};
use crate::global_hotkey::{HotkeyManager, Registrar};
use crate::key_sender::{InputBackend, KeySender};

/// Tray menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Reload,
    Exit,
}

/// External triggers delivered by the OS event dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The global hotkey fired; carries the registration id.
    HotkeyFired(u32),
    /// A tray menu item was selected.
    Menu(MenuChoice),
    /// External close request (signal, session end).
    Shutdown,
}

/// Notification-area icon surface. The tooltip doubles as the user-visible
/// status line: active binding after a load, degraded text when the hotkey
/// could not be registered.
pub trait TrayHandle {
    fn set_tooltip(&mut self, tooltip: &str);
    fn remove(&mut self);
}

/// Owned application context; created at startup, torn down at shutdown.
pub struct App<R, B, G, T>
where
    R: Registrar,
    B: InputBackend,
    G: IdentifierGenerator,
    T: TrayHandle,
{
    config_path: PathBuf,
    binding: HotkeyBinding,
    hotkeys: HotkeyManager<R>,
    sender: KeySender<B>,
    generator: G,
    tray: T,
}

impl<R, B, G, T> App<R, B, G, T>
where
    R: Registrar,
    B: InputBackend,
    G: IdentifierGenerator,
    T: TrayHandle,
{
    /// Assemble the context and perform the initial configuration load and
    /// hotkey registration (Initializing -> Idle).
    pub fn start(
        config_path: impl Into<PathBuf>,
        registrar: R,
        sender: KeySender<B>,
        generator: G,
        tray: T,
    ) -> Self {
        let mut app = Self {
            config_path: config_path.into(),
            binding: HotkeyBinding::default(),
            hotkeys: HotkeyManager::new(registrar),
            sender,
            generator,
            tray,
        };
        app.load(false);
        app
    }

    /// The binding from the most recent load.
    pub fn binding(&self) -> HotkeyBinding {
        self.binding
    }

    /// Dispatch one external trigger. Returns `Break` once the app has shut
    /// down and the event loop should stop.
    pub fn handle_event(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::HotkeyFired(id) => {
                if self.hotkeys.active_id() == Some(id) {
                    self.type_identifier();
                } else {
                    // Stale id from a binding replaced mid-queue.
                    debug!("ignoring hotkey event with unknown id {id}");
                }
                ControlFlow::Continue(())
            }
            AppEvent::Menu(MenuChoice::Reload) => {
                self.reload();
                ControlFlow::Continue(())
            }
            AppEvent::Menu(MenuChoice::Exit) | AppEvent::Shutdown => {
                self.shutdown();
                ControlFlow::Break(())
            }
        }
    }

    /// Re-read the config file and replace the hotkey registration,
    /// acknowledging the reload in the tooltip.
    pub fn reload(&mut self) {
        self.load(true);
    }

    /// Load the config file and replace the hotkey registration.
    ///
    /// Registration failure is non-fatal: the app keeps running without a
    /// working hotkey and says so in the tooltip. A user-requested reload
    /// gets a distinguishable tooltip even when the binding is unchanged.
    fn load(&mut self, reloaded: bool) {
        let config = Config::load_from(&self.config_path);
        self.binding = config.binding;

        match self.hotkeys.rebind(&self.binding) {
            Ok(_) if reloaded => {
                info!("configuration reloaded, hotkey {}", self.binding);
                self.tray
                    .set_tooltip(&format!("GUID Typer ({}, config reloaded)", self.binding));
            }
            Ok(_) => {
                info!("configuration loaded, hotkey {}", self.binding);
                self.tray
                    .set_tooltip(&format!("GUID Typer ({})", self.binding));
            }
            Err(e) => {
                warn!("hotkey {} unavailable: {e}", self.binding);
                self.tray.set_tooltip(&format!(
                    "GUID Typer (hotkey {} unavailable, reload to retry)",
                    self.binding
                ));
            }
        }
    }

    /// Generate one identifier and inject it into the focused application.
    fn type_identifier(&mut self) {
        let id = generate_or_sentinel(&mut self.generator);
        debug!("typing identifier {id}");
        self.sender.type_text(&id);
    }

    /// Release the hotkey and remove the tray icon, in that order.
    fn shutdown(&mut self) {
        info!("shutting down");
        self.hotkeys.release();
        self.tray.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GuidTyperError, Result};
    use crate::key_sender::{KeyDirection, KeyEvent};
    use crate::testing::{MockBackend, MockRegistrar, MockTray};
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct FixedGenerator(&'static str);

    impl IdentifierGenerator for FixedGenerator {
        fn generate(&mut self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenGenerator;

    impl IdentifierGenerator for BrokenGenerator {
        fn generate(&mut self) -> Result<String> {
            Err(GuidTyperError::identifier_generation("source unavailable"))
        }
    }

    const FIXED_ID: &str = "0123abcd-0123-abcd-0123-0123456789ab";

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    struct Harness {
        registrar: MockRegistrar,
        backend: MockBackend,
        tray: MockTray,
        app: App<MockRegistrar, MockBackend, FixedGenerator, MockTray>,
        _file: NamedTempFile,
    }

    fn test_app(contents: &str) -> Harness {
        let file = config_file(contents);
        let registrar = MockRegistrar::new();
        let backend = MockBackend::new();
        let tray = MockTray::new();
        let app = App::start(
            file.path(),
            registrar.clone(),
            KeySender::with_backend(backend.clone()),
            FixedGenerator(FIXED_ID),
            tray.clone(),
        );
        Harness {
            registrar,
            backend,
            tray,
            app,
            _file: file,
        }
    }

    #[test]
    fn test_start_loads_config_and_registers() {
        let h = test_app("MOD=3\nKEY=71\n");
        assert_eq!(h.app.binding(), HotkeyBinding { modifiers: 3, key: 71 });
        assert_eq!(h.registrar.live().len(), 1);
        assert_eq!(h.tray.tooltip(), "GUID Typer (Ctrl+Alt+G)");
    }

    #[test]
    fn test_start_with_missing_file_uses_defaults() {
        let app = App::start(
            "definitely/not/a/config.ini",
            MockRegistrar::new(),
            KeySender::with_backend(MockBackend::new()),
            FixedGenerator(FIXED_ID),
            MockTray::new(),
        );
        assert_eq!(app.binding(), HotkeyBinding::default());
    }

    #[test]
    fn test_hotkey_fired_types_identifier() {
        let mut h = test_app("MOD=3\nKEY=71\n");
        let id = h.app.hotkeys.active_id().unwrap();

        let flow = h.app.handle_event(AppEvent::HotkeyFired(id));
        assert_eq!(flow, ControlFlow::Continue(()));

        let batches = h.backend.batches();
        assert_eq!(batches.len(), 1);
        // 36 chars -> 72 alternating events
        assert_eq!(batches[0].len(), 72);
        assert_eq!(batches[0][0].direction, KeyDirection::Press);
        assert_eq!(batches[0][1].direction, KeyDirection::Release);

        let typed: String = batches[0]
            .iter()
            .filter(|e| e.direction == KeyDirection::Press)
            .map(|e| e.ch)
            .collect();
        assert_eq!(typed, FIXED_ID);
    }

    #[test]
    fn test_foreign_hotkey_id_is_ignored() {
        let mut h = test_app("MOD=3\nKEY=71\n");
        let id = h.app.hotkeys.active_id().unwrap();

        h.app.handle_event(AppEvent::HotkeyFired(id.wrapping_add(1)));
        assert!(h.backend.batches().is_empty());
    }

    #[test]
    fn test_generation_failure_types_sentinel() {
        let file = config_file("MOD=3\nKEY=71\n");
        let backend = MockBackend::new();
        let mut app = App::start(
            file.path(),
            MockRegistrar::new(),
            KeySender::with_backend(backend.clone()),
            BrokenGenerator,
            MockTray::new(),
        );

        let id = app.hotkeys.active_id().unwrap();
        app.handle_event(AppEvent::HotkeyFired(id));

        let batches = backend.batches();
        let typed: String = batches[0]
            .iter()
            .filter(|e| e.direction == KeyDirection::Press)
            .map(|e| e.ch)
            .collect();
        assert_eq!(typed, crate::generator::GENERATION_FAILED);
    }

    #[test]
    fn test_reload_acknowledged_in_tooltip() {
        let mut h = test_app("MOD=3\nKEY=71\n");
        assert_eq!(h.tray.tooltip(), "GUID Typer (Ctrl+Alt+G)");

        // Same file contents, but the user asked for a reload and should
        // see that it happened.
        h.app.handle_event(AppEvent::Menu(MenuChoice::Reload));
        assert_eq!(h.tray.tooltip(), "GUID Typer (Ctrl+Alt+G, config reloaded)");
    }

    #[test]
    fn test_reload_keeps_single_registration() {
        let mut h = test_app("MOD=3\nKEY=71\n");
        h.app.handle_event(AppEvent::Menu(MenuChoice::Reload));
        h.app.handle_event(AppEvent::Menu(MenuChoice::Reload));

        assert_eq!(h.registrar.live().len(), 1);
    }

    #[test]
    fn test_registration_failure_is_nonfatal() {
        let file = config_file("MOD=3\nKEY=71\n");
        let registrar = MockRegistrar::new();
        let tray = MockTray::new();
        registrar.set_reject_all(true);

        let mut app = App::start(
            file.path(),
            registrar.clone(),
            KeySender::with_backend(MockBackend::new()),
            FixedGenerator(FIXED_ID),
            tray.clone(),
        );

        assert!(registrar.live().is_empty());
        assert!(tray.tooltip().contains("unavailable"));

        // Still reloadable afterwards.
        registrar.set_reject_all(false);
        app.handle_event(AppEvent::Menu(MenuChoice::Reload));
        assert_eq!(registrar.live().len(), 1);
    }

    #[test]
    fn test_exit_releases_hotkey_and_removes_icon() {
        let mut h = test_app("MOD=3\nKEY=71\n");
        let flow = h.app.handle_event(AppEvent::Menu(MenuChoice::Exit));

        assert_eq!(flow, ControlFlow::Break(()));
        assert!(h.registrar.live().is_empty());
        assert!(h.tray.removed());
    }

    #[test]
    fn test_external_shutdown_cleans_up() {
        let mut h = test_app("MOD=3\nKEY=71\n");
        let flow = h.app.handle_event(AppEvent::Shutdown);

        assert_eq!(flow, ControlFlow::Break(()));
        assert!(h.registrar.live().is_empty());
        assert!(h.tray.removed());
    }
}
