//! Entities - transform plus an ordered, typed set of owned components

use crate::component::{Component, ComponentFilter};
use glam::{Mat4, Quat, Vec3};
use std::any::TypeId;

/// Per-attachment bookkeeping for one owned component.
///
/// The component box is `None` only while its hook is running (the world
/// detaches it for the duration of the call).
pub(crate) struct ComponentEntry {
    pub(crate) type_id: TypeId,
    pub(crate) enabled: bool,
    pub(crate) initialized: bool,
    pub(crate) component: Option<Box<dyn Component>>,
}

/// A simulated object: transform, life timer, and owned components
///
/// Entities are owned by a `World` and addressed through `EntityId`
/// handles. At most one component instance per concrete type is attached;
/// attachment order is the order hooks run in.
pub struct Entity {
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub rotation: Quat,
    /// Per-axis scale
    pub scale: Vec3,
    pub(crate) components: Vec<ComponentEntry>,
    pub(crate) life: f32,
    pub(crate) dead: bool,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    /// Create an entity with an identity transform, alive indefinitely
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            components: Vec::new(),
            life: -1.0,
            dead: false,
        }
    }

    /// Attach a component, keyed by its concrete type.
    ///
    /// If a component of the same type is already attached it is replaced
    /// in place: the attachment position is kept, the entry's `enabled` and
    /// initialization state reset, and the prior instance is dropped
    /// without its `on_destroy` hook firing.
    pub fn attach<T: Component>(&mut self, component: T) {
        let type_id = TypeId::of::<T>();
        let entry = ComponentEntry {
            type_id,
            enabled: true,
            initialized: false,
            component: Some(Box::new(component)),
        };

        match self.components.iter().position(|e| e.type_id == type_id) {
            Some(i) => self.components[i] = entry,
            None => self.components.push(entry),
        }
    }

    /// The attached component of type `T`, if present
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .find(|e| e.type_id == TypeId::of::<T>())
            .and_then(|e| e.component.as_ref())
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Mutable access to the attached component of type `T`, if present
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find(|e| e.type_id == TypeId::of::<T>())
            .and_then(|e| e.component.as_mut())
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Whether a component of type `T` is attached
    pub fn has<T: Component>(&self) -> bool {
        self.components
            .iter()
            .any(|e| e.type_id == TypeId::of::<T>())
    }

    /// Whether every component type in the filter tuple is attached
    pub fn has_all<S: ComponentFilter>(&self) -> bool {
        S::matches(self)
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Enable or disable the attachment of type `T`.
    ///
    /// Disabling gates only `on_update`; `on_create` and `on_destroy` still
    /// fire, and the component stays attached. No-op if `T` is not
    /// attached.
    pub fn set_enabled<T: Component>(&mut self, enabled: bool) {
        if let Some(entry) = self
            .components
            .iter_mut()
            .find(|e| e.type_id == TypeId::of::<T>())
        {
            entry.enabled = enabled;
        }
    }

    /// Whether the attachment of type `T` is enabled; `None` if absent
    pub fn is_enabled<T: Component>(&self) -> Option<bool> {
        self.components
            .iter()
            .find(|e| e.type_id == TypeId::of::<T>())
            .map(|e| e.enabled)
    }

    /// Remaining life in seconds; negative means alive indefinitely
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Whether this entity is queued for reaping
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Schedule destruction after `timeout` seconds of simulated time.
    ///
    /// A timeout of zero marks the entity dead on the very next
    /// `World::update`; destruction is never synchronous.
    pub fn destroy(&mut self, timeout: f32) {
        self.life = timeout.abs();
    }

    /// Model matrix: translation * rotation * scale
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(self.scale)
    }

    /// Camera-space matrix: inverse rotation * inverse translation
    pub fn view_transform(&self) -> Mat4 {
        Mat4::from_quat(self.rotation.conjugate()) * Mat4::from_translation(-self.position)
    }

    /// Reset to freshly-constructed state for slot reuse.
    ///
    /// Drops all components immediately, with no `on_destroy` hooks. Called
    /// by the world when this entity is recycled from the free pool.
    pub(crate) fn cleanup(&mut self) {
        self.position = Vec3::ZERO;
        self.rotation = Quat::IDENTITY;
        self.scale = Vec3::ONE;
        self.components.clear();
        self.life = -1.0;
        self.dead = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health {
        points: i32,
    }
    impl Component for Health {}

    struct Velocity {
        value: Vec3,
    }
    impl Component for Velocity {}

    struct Camera;
    impl Component for Camera {}

    #[test]
    fn test_attach_and_get() {
        let mut entity = Entity::new();
        entity.attach(Health { points: 10 });

        assert!(entity.has::<Health>());
        assert!(!entity.has::<Velocity>());
        assert_eq!(entity.get::<Health>().map(|h| h.points), Some(10));
        assert!(entity.get::<Velocity>().is_none());

        entity.get_mut::<Health>().unwrap().points = 25;
        assert_eq!(entity.get::<Health>().unwrap().points, 25);
    }

    #[test]
    fn test_attach_same_type_replaces_in_place() {
        let mut entity = Entity::new();
        entity.attach(Health { points: 10 });
        entity.attach(Velocity { value: Vec3::ONE });
        entity.set_enabled::<Health>(false);

        entity.attach(Health { points: 99 });

        assert_eq!(entity.component_count(), 2);
        assert_eq!(entity.get::<Health>().unwrap().points, 99);
        assert_eq!(entity.get::<Velocity>().unwrap().value, Vec3::ONE);
        // Attachment position is preserved, entry state is reset
        assert_eq!(entity.components[0].type_id, TypeId::of::<Health>());
        assert_eq!(entity.is_enabled::<Health>(), Some(true));
    }

    #[test]
    fn test_has_all_tuple_filters() {
        let mut entity = Entity::new();
        entity.attach(Health { points: 1 });
        entity.attach(Velocity { value: Vec3::ZERO });

        assert!(entity.has_all::<(Health,)>());
        assert!(entity.has_all::<(Health, Velocity)>());
        assert!(!entity.has_all::<(Health, Camera)>());
        assert!(!entity.has_all::<(Health, Velocity, Camera)>());
    }

    #[test]
    fn test_enable_disable() {
        let mut entity = Entity::new();
        assert_eq!(entity.is_enabled::<Health>(), None);

        entity.attach(Health { points: 1 });
        assert_eq!(entity.is_enabled::<Health>(), Some(true));

        entity.set_enabled::<Health>(false);
        assert_eq!(entity.is_enabled::<Health>(), Some(false));
        assert!(entity.has::<Health>());
    }

    #[test]
    fn test_destroy_takes_absolute_timeout() {
        let mut entity = Entity::new();
        assert!(entity.life() < 0.0);

        entity.destroy(-2.5);
        assert_eq!(entity.life(), 2.5);

        entity.destroy(0.0);
        assert_eq!(entity.life(), 0.0);
    }

    #[test]
    fn test_transform_composition() {
        let mut entity = Entity::new();
        assert_eq!(entity.transform(), Mat4::IDENTITY);

        entity.position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(entity.transform(), Mat4::from_translation(entity.position));

        entity.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        entity.scale = Vec3::splat(2.0);
        let expected = Mat4::from_translation(entity.position)
            * Mat4::from_quat(entity.rotation)
            * Mat4::from_scale(entity.scale);
        assert_eq!(entity.transform(), expected);
    }

    #[test]
    fn test_view_transform_inverts_camera_pose() {
        let mut entity = Entity::new();
        entity.position = Vec3::new(4.0, -1.0, 7.0);
        entity.rotation = Quat::from_rotation_y(0.8);

        // With unit scale, view * model cancels to identity
        let composed = entity.view_transform() * entity.transform();
        assert!(composed.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_cleanup_matches_fresh_entity() {
        let mut entity = Entity::new();
        entity.position = Vec3::new(5.0, 5.0, 5.0);
        entity.rotation = Quat::from_rotation_x(1.0);
        entity.scale = Vec3::splat(3.0);
        entity.attach(Health { points: 1 });
        entity.destroy(0.0);
        entity.dead = true;

        entity.cleanup();

        let fresh = Entity::new();
        assert_eq!(entity.position, fresh.position);
        assert_eq!(entity.rotation, fresh.rotation);
        assert_eq!(entity.scale, fresh.scale);
        assert_eq!(entity.component_count(), 0);
        assert_eq!(entity.life(), fresh.life());
        assert!(!entity.is_dead());
    }
}
