//! Component trait and typed presence filters

use crate::{Entity, World};
use aether_core::EntityId;
use std::any::Any;

/// Upcast helper so a `Box<dyn Component>` can be downcast to its concrete
/// type. Blanket-implemented for every `'static` type; component authors
/// never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A capability attached to exactly one owning entity
///
/// Components are run by `World::update` in attachment order. The lifecycle
/// per attachment is: `on_create` once, on the first simulate phase after
/// attachment; `on_update` every simulate phase while the attachment is
/// enabled; `on_destroy` once, during the reap phase that processes the
/// owner's death. Disabling an attachment gates only `on_update` -
/// `on_create` and `on_destroy` always fire.
///
/// Hooks receive the world and the owner's handle. While a hook runs, the
/// component itself is temporarily detached from its owner, so the world
/// stays fully usable: hooks may create entities, schedule destruction, run
/// queries, and reach the owner (and its sibling components) through
/// `world.get_mut(owner)`. Hooks must not call `World::update` reentrantly.
pub trait Component: AsAny {
    /// Called once, before the first `on_update`
    fn on_create(&mut self, _world: &mut World, _owner: EntityId) {}

    /// Called every fixed step while enabled and the owner is alive
    fn on_update(&mut self, _world: &mut World, _owner: EntityId, _dt: f32) {}

    /// Called once when the owner is reaped, regardless of `enabled`
    fn on_destroy(&mut self, _world: &mut World, _owner: EntityId) {}
}

/// Presence test over one or more component types
///
/// Implemented for tuples of component types up to arity four, so queries
/// read `world.each::<(Position, Velocity)>(..)`. Single-type filters use
/// the one-element tuple form, `world.each::<(Camera,)>(..)`.
pub trait ComponentFilter {
    /// True if the entity carries every component type in the filter
    fn matches(entity: &Entity) -> bool;
}

macro_rules! impl_tuple_filter {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentFilter for ($($name,)+) {
            fn matches(entity: &Entity) -> bool {
                true $(&& entity.has::<$name>())+
            }
        }
    };
}

impl_tuple_filter!(A);
impl_tuple_filter!(A, B);
impl_tuple_filter!(A, B, C);
impl_tuple_filter!(A, B, C, D);
