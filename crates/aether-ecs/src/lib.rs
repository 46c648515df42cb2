//! Aether ECS - Pool-backed entity/component container
//!
//! This crate provides the simulation container at the heart of the engine:
//! - `Component` - polymorphic capability trait with lifecycle hooks
//! - `Entity` - transform plus an ordered, typed set of owned components
//! - `World` - entity pools, template registry, two-phase update, queries
//!
//! Entities are addressed through generation-checked `EntityId` handles, so
//! recycling a pool slot can never resurrect a stale reference.

mod component;
mod entity;
mod world;

pub use aether_core::EntityId;
pub use component::{AsAny, Component, ComponentFilter};
pub use entity::Entity;
pub use world::{EntityTemplate, World};
