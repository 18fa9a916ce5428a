//! Notification-area icon and the OS event loop.
//!
//! The tray icon carries a two-entry context menu (Reload Config / Exit).
//! [`run`] is the single thread of control: it drains the hotkey and menu
//! event receivers with `try_recv`, handles each event to completion through
//! [`App::handle_event`], and sleeps briefly between passes. On Linux the
//! pass also pumps pending GTK iterations, which `tray-icon` needs for the
//! StatusNotifier item.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

use crate::app::{App, AppEvent, MenuChoice, TrayHandle};
use crate::error::{GuidTyperError, Result};
use crate::generator::IdentifierGenerator;
use crate::global_hotkey::Registrar;
use crate::key_sender::InputBackend;

const MENU_ID_RELOAD: &str = "reload";
const MENU_ID_EXIT: &str = "exit";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Initialize platform prerequisites for the tray. Must run on the thread
/// that will own the event loop.
pub fn init() -> Result<()> {
    #[cfg(target_os = "linux")]
    gtk::init().map_err(|e| GuidTyperError::tray(format!("failed to init GTK: {e}")))?;
    Ok(())
}

/// The real notification-area icon.
pub struct SystemTray {
    icon: Option<TrayIcon>,
}

impl SystemTray {
    /// Create the icon with its context menu. Lives until [`remove`] or drop.
    ///
    /// [`remove`]: TrayHandle::remove
    pub fn new() -> Result<Self> {
        let menu = Menu::new();
        let reload = MenuItem::with_id(MENU_ID_RELOAD, "Reload Config (config.ini)", true, None);
        let exit = MenuItem::with_id(MENU_ID_EXIT, "Exit", true, None);
        menu.append_items(&[&reload, &PredefinedMenuItem::separator(), &exit])
            .map_err(|e| GuidTyperError::tray(e.to_string()))?;

        let icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip("GUID Typer")
            .with_icon(default_icon()?)
            .build()
            .map_err(|e| GuidTyperError::tray(e.to_string()))?;

        Ok(Self { icon: Some(icon) })
    }
}

impl TrayHandle for SystemTray {
    fn set_tooltip(&mut self, tooltip: &str) {
        if let Some(icon) = &self.icon {
            if let Err(e) = icon.set_tooltip(Some(tooltip)) {
                tracing::warn!("failed to set tray tooltip: {e}");
            }
        }
    }

    fn remove(&mut self) {
        // Dropping the handle removes the icon from the shell.
        self.icon = None;
    }
}

/// Map a tray menu event onto a menu command; foreign ids are ignored.
fn menu_choice(event: &MenuEvent) -> Option<MenuChoice> {
    match event.id.as_ref() {
        MENU_ID_RELOAD => Some(MenuChoice::Reload),
        MENU_ID_EXIT => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Run the event loop until the app shuts down.
pub fn run<R, B, G, T>(mut app: App<R, B, G, T>) -> Result<()>
where
    R: Registrar,
    B: InputBackend,
    G: IdentifierGenerator,
    T: TrayHandle,
{
    let hotkey_events = GlobalHotKeyEvent::receiver();
    let menu_events = MenuEvent::receiver();

    #[cfg(unix)]
    let shutdown = {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;
        let flag = Arc::new(AtomicBool::new(false));
        for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&flag))
                .map_err(GuidTyperError::Io)?;
        }
        flag
    };

    loop {
        #[cfg(target_os = "linux")]
        while gtk::events_pending() {
            gtk::main_iteration_do(false);
        }

        #[cfg(unix)]
        if shutdown.load(std::sync::atomic::Ordering::Relaxed) {
            let _ = app.handle_event(AppEvent::Shutdown);
            return Ok(());
        }

        while let Ok(event) = hotkey_events.try_recv() {
            if event.state == HotKeyState::Pressed
                && app.handle_event(AppEvent::HotkeyFired(event.id)) == ControlFlow::Break(())
            {
                return Ok(());
            }
        }

        while let Ok(event) = menu_events.try_recv() {
            if let Some(choice) = menu_choice(&event) {
                if app.handle_event(AppEvent::Menu(choice)) == ControlFlow::Break(()) {
                    return Ok(());
                }
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Built-in 32x32 icon: a filled circle on a transparent square, so no asset
/// file is needed next to the binary.
fn default_icon() -> Result<Icon> {
    const SIZE: u32 = 32;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    let center = (SIZE as f32 - 1.0) / 2.0;
    let radius = SIZE as f32 / 2.0 - 1.0;

    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            if (dx * dx + dy * dy).sqrt() <= radius {
                rgba.extend_from_slice(&[0x2e, 0x7d, 0x32, 0xff]);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    Icon::from_rgba(rgba, SIZE, SIZE).map_err(|e| GuidTyperError::tray(e.to_string()))
}
