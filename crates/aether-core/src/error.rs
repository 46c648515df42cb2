//! Error types for Aether

use crate::EntityId;
use thiserror::Error;

/// The main error type for Aether operations
///
/// The kernel is purely in-process, so there are no I/O or network failure
/// modes here. Absent components and stale handles are signaled with
/// `Option` at the call site rather than an error variant.
#[derive(Debug, Error)]
pub enum AetherError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),
}

/// Result type alias for Aether operations
pub type Result<T> = std::result::Result<T, AetherError>;
