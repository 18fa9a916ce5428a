//! # Tray GUID
//!
//! A small background utility that sits in the system notification area and
//! types a fresh UUID into whatever application has input focus when a
//! global hotkey fires.
//!
//! ## Features
//!
//! - Global hotkey bound from a plain-text config file (`MOD=`/`KEY=` lines)
//! - Canonical lowercase 8-4-4-4-12 identifiers from the OS random source
//! - Layout-independent Unicode keystroke injection
//! - Tray context menu with Reload Config and Exit
//! - Cross-platform (Windows, macOS, Linux)
//!
//! ## Example
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use tray_guid::app::{App, AppEvent, MenuChoice};
//! use tray_guid::generator::UuidGenerator;
//! use tray_guid::key_sender::KeySender;
//! use tray_guid::testing::{MockBackend, MockRegistrar, MockTray};
//!
//! // Wire the coordinator against test doubles; the binary swaps in the
//! // real registrar, enigo backend and tray icon.
//! let mut app = App::start(
//!     "config.ini",
//!     MockRegistrar::new(),
//!     KeySender::with_backend(MockBackend::new()),
//!     UuidGenerator::new(),
//!     MockTray::new(),
//! );
//! assert_eq!(app.handle_event(AppEvent::Menu(MenuChoice::Exit)), ControlFlow::Break(()));
//! ```
//!
//! ## Configuration
//!
//! `config.ini` next to the binary, read on startup and on "Reload Config":
//!
//! ```text
//! MOD=3
//! KEY=71
//! ```
//!
//! `MOD` is a bitmask (1=Alt, 2=Ctrl, 4=Shift, 8=Meta), `KEY` a decimal
//! virtual key code. Missing or malformed fields fall back to Ctrl+Alt+G.

pub mod app;
pub mod config;
pub mod error;
pub mod generator;
pub mod global_hotkey;
pub mod key_sender;
pub mod testing;
pub mod tray;

pub use app::{App, AppEvent, MenuChoice};
pub use config::{Config, HotkeyBinding};
pub use error::{GuidTyperError, Result};
pub use generator::UuidGenerator;
pub use global_hotkey::{HotkeyManager, SystemRegistrar};
pub use key_sender::KeySender;
