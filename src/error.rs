//! Custom error types for tray-guid.
//!
//! This module provides structured error types using `thiserror` for better
//! error handling and more informative error messages.

use std::io;
use thiserror::Error;

/// Main error type for tray-guid operations.
#[derive(Error, Debug)]
pub enum GuidTyperError {
    /// Error registering, replacing or releasing the global hotkey.
    #[error("hotkey error: {0}")]
    Hotkey(String),

    /// The configured key code has no known mapping.
    #[error("unsupported key code {code}: {reason}")]
    InvalidKeyCode { code: u32, reason: String },

    /// Error creating or updating the tray icon.
    #[error("tray error: {0}")]
    Tray(String),

    /// The identifier source failed to produce a value.
    #[error("identifier generation failed: {0}")]
    IdentifierGeneration(String),

    /// Error initializing the synthetic input backend.
    #[error("input backend error: {0}")]
    InputBackend(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tray-guid operations.
pub type Result<T> = std::result::Result<T, GuidTyperError>;

impl GuidTyperError {
    /// Create a new Hotkey error.
    pub fn hotkey(message: impl Into<String>) -> Self {
        Self::Hotkey(message.into())
    }

    /// Create a new InvalidKeyCode error.
    pub fn invalid_key_code(code: u32, reason: impl Into<String>) -> Self {
        Self::InvalidKeyCode {
            code,
            reason: reason.into(),
        }
    }

    /// Create a new Tray error.
    pub fn tray(message: impl Into<String>) -> Self {
        Self::Tray(message.into())
    }

    /// Create a new IdentifierGeneration error.
    pub fn identifier_generation(message: impl Into<String>) -> Self {
        Self::IdentifierGeneration(message.into())
    }

    /// Create a new InputBackend error.
    pub fn input_backend(message: impl Into<String>) -> Self {
        Self::InputBackend(message.into())
    }
}
