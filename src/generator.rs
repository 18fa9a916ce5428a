//! Unique identifier generation.
//!
//! Production identifiers are version-4 UUIDs rendered in the canonical
//! lowercase 8-4-4-4-12 form with no enclosing braces. Generation failures
//! never crash the process: callers that want a plain string use
//! [`generate_or_sentinel`], which degrades to [`GENERATION_FAILED`].

use uuid::Uuid;

use crate::error::Result;

/// Sentinel typed in place of an identifier when generation fails.
pub const GENERATION_FAILED: &str = "ERROR-GUID-FAIL";

/// Source of unique identifier strings.
pub trait IdentifierGenerator {
    fn generate(&mut self) -> Result<String>;
}

/// Identifier source backed by the OS random number generator via `uuid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl UuidGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierGenerator for UuidGenerator {
    fn generate(&mut self) -> Result<String> {
        Ok(Uuid::new_v4().as_hyphenated().to_string())
    }
}

/// Generate an identifier, degrading to the sentinel on failure.
pub fn generate_or_sentinel(generator: &mut impl IdentifierGenerator) -> String {
    match generator.generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("identifier generation failed: {e}");
            GENERATION_FAILED.to_string()
        }
    }
}

/// Check the canonical grammar: 32 lowercase hex digits grouped 8-4-4-4-12,
/// hyphen-separated.
pub fn is_canonical_identifier(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    if groups.len() != 5 {
        return false;
    }
    let lengths = [8, 4, 4, 4, 12];
    groups.iter().zip(lengths).all(|(group, len)| {
        group.len() == len
            && group
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    })
}
