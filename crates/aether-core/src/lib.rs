//! Aether Core - Foundational types for the Aether engine
//!
//! This crate provides the types that all other Aether crates depend on:
//! - `EntityId` - Generation-checked entity handles
//! - Error types and Result alias

mod error;
mod handle;

pub use error::{AetherError, Result};
pub use handle::EntityId;
