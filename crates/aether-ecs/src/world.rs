//! World - entity pools, template registry, and the simulation tick

use crate::component::{Component, ComponentFilter};
use crate::entity::Entity;
use aether_core::{AetherError, EntityId, Result};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// A named factory that configures a freshly created entity
pub type EntityTemplate = Rc<dyn Fn(&mut Entity)>;

/// One arena slot. The entity stays in its slot for the lifetime of the
/// world; only the slot index moves between the active and free lists.
struct Slot {
    generation: u32,
    entity: Entity,
}

/// The simulation container
///
/// Owns every entity in one of two pools: the active pool (simulated and
/// rendered, in insertion order) and the free pool (recycled slots awaiting
/// reuse). Entities are stored in a slot arena and addressed by
/// index+generation handles, so handles stay valid across pool churn and a
/// stale handle can never resolve to a recycled slot.
pub struct World {
    slots: Vec<Slot>,
    /// Active slot indices, in insertion order (the canonical iteration order)
    active: Vec<u32>,
    /// Free slot indices, recycled FIFO
    free: VecDeque<u32>,
    templates: HashMap<String, EntityTemplate>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            active: Vec::new(),
            free: VecDeque::new(),
            templates: HashMap::new(),
        }
    }

    /// Create an entity, recycling a free slot when one is available.
    ///
    /// Recycled entities are reset to freshly-constructed state before
    /// reuse. The returned handle stays valid for the entity's entire
    /// active lifetime.
    pub fn create(&mut self) -> EntityId {
        if let Some(slot_index) = self.free.pop_front() {
            let slot = &mut self.slots[slot_index as usize];
            slot.entity.cleanup();
            self.active.push(slot_index);
            tracing::trace!(index = slot_index, "recycled entity from free pool");
            EntityId::new(slot_index, slot.generation)
        } else {
            let slot_index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entity: Entity::new(),
            });
            self.active.push(slot_index);
            EntityId::new(slot_index, 0)
        }
    }

    /// Create an entity and configure it with a registered template.
    ///
    /// Returns `TemplateNotFound` on an unknown name, in which case nothing
    /// is allocated.
    pub fn create_from(&mut self, template: &str) -> Result<EntityId> {
        let factory = self
            .templates
            .get(template)
            .cloned()
            .ok_or_else(|| AetherError::TemplateNotFound(template.to_string()))?;

        let id = self.create();
        if let Some(entity) = self.get_mut(id) {
            factory(entity);
        }
        Ok(id)
    }

    /// Register a template factory under a name.
    ///
    /// Re-registering a name replaces the prior factory for all future
    /// `create_from` calls (last writer wins).
    pub fn register_template(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&mut Entity) + 'static,
    ) {
        self.templates.insert(name.into(), Rc::new(factory));
    }

    /// Resolve a handle, generation-checked
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        Some(&slot.entity)
    }

    /// Resolve a handle mutably, generation-checked
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        Some(&mut slot.entity)
    }

    /// Whether the handle resolves to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of active entities
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether the active pool is empty
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of recycled slots awaiting reuse
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Active entities in insertion order, for external consumers
    /// (typically the renderer reading transforms)
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.active.iter().map(move |&slot_index| {
            let slot = &self.slots[slot_index as usize];
            (EntityId::new(slot_index, slot.generation), &slot.entity)
        })
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Two strictly ordered phases:
    ///
    /// 1. **Simulate** - every active, non-dead entity ages its life timer
    ///    (negative life never ages; hitting zero marks the entity dead),
    ///    then runs its components in attachment order: `on_create` once
    ///    per attachment, then `on_update` for enabled attachments.
    /// 2. **Reap** - dead entities fire `on_destroy` on every attachment
    ///    (enabled or not) and move to the free pool. Their components stay
    ///    attached until the slot is recycled.
    ///
    /// The simulate phase iterates a snapshot of the active list, so
    /// entities spawned by hooks join the pool immediately but first
    /// simulate on the next update.
    pub fn update(&mut self, dt: f32) {
        let count = self.active.len();
        for i in 0..count {
            let slot_index = self.active[i];
            let owner = {
                let slot = &mut self.slots[slot_index as usize];
                let entity = &mut slot.entity;
                if entity.dead {
                    continue;
                }
                if entity.life > 0.0 {
                    // Clamp so a timer cannot skip past the death threshold
                    entity.life = (entity.life - dt).max(0.0);
                } else if entity.life == 0.0 {
                    entity.dead = true;
                    continue;
                }
                EntityId::new(slot_index, slot.generation)
            };
            self.run_simulate_hooks(owner, dt);
        }

        self.reap();
    }

    /// Run `on_create`/`on_update` for one entity's components in
    /// attachment order. Each component is detached for the duration of its
    /// hook so the hook gets full mutable access to the world.
    fn run_simulate_hooks(&mut self, owner: EntityId, dt: f32) {
        let slot_index = owner.index() as usize;
        let count = self.slots[slot_index].entity.components.len();

        // Components attached by hooks during this pass run next update
        for ci in 0..count {
            let taken = {
                let entry = &mut self.slots[slot_index].entity.components[ci];
                let run_create = !entry.initialized;
                entry.initialized = true;
                let enabled = entry.enabled;
                entry.component.take().map(|c| (run_create, enabled, c))
            };
            let Some((run_create, enabled, mut component)) = taken else {
                continue;
            };

            if run_create {
                component.on_create(self, owner);
            }
            if enabled {
                component.on_update(self, owner, dt);
            }

            self.reattach(slot_index, ci, component);
        }
    }

    /// Sweep the active pool in order, moving dead entities to the free
    /// pool after firing their destroy hooks. Bumps the slot generation so
    /// stale handles miss.
    fn reap(&mut self) {
        let mut i = 0;
        while i < self.active.len() {
            let slot_index = self.active[i];
            if !self.slots[slot_index as usize].entity.dead {
                i += 1;
                continue;
            }

            let owner = EntityId::new(slot_index, self.slots[slot_index as usize].generation);
            let count = self.slots[slot_index as usize].entity.components.len();

            // Destroy hooks fire regardless of the enabled flag
            for ci in 0..count {
                let taken = self.slots[slot_index as usize].entity.components[ci]
                    .component
                    .take();
                let Some(mut component) = taken else {
                    continue;
                };
                component.on_destroy(self, owner);
                self.reattach(slot_index as usize, ci, component);
            }

            self.active.remove(i);
            let slot = &mut self.slots[slot_index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push_back(slot_index);
            tracing::trace!(entity = %owner, "entity reaped");
        }
    }

    /// Put a detached component back, unless the hook replaced it
    fn reattach(&mut self, slot_index: usize, ci: usize, component: Box<dyn Component>) {
        if let Some(entry) = self.slots[slot_index].entity.components.get_mut(ci) {
            if entry.component.is_none() {
                entry.component = Some(component);
            }
        }
    }

    /// Visit every active entity carrying all component types in the
    /// filter, in insertion order.
    ///
    /// The callback receives the entity's handle and exclusive access to
    /// the entity itself; the exclusive borrow of the world means the
    /// callback cannot create or destroy entities mid-iteration.
    pub fn each<S: ComponentFilter>(&mut self, mut f: impl FnMut(EntityId, &mut Entity)) {
        for i in 0..self.active.len() {
            let slot_index = self.active[i];
            let slot = &mut self.slots[slot_index as usize];
            let id = EntityId::new(slot_index, slot.generation);
            if S::matches(&slot.entity) {
                f(id, &mut slot.entity);
            }
        }
    }

    /// First active entity carrying component `C`, in insertion order.
    ///
    /// Linear in the active pool size; callers needing repeated lookups
    /// should cache the handle.
    pub fn find<C: Component>(&self) -> Option<EntityId> {
        self.entities()
            .find(|(_, entity)| entity.has::<C>())
            .map(|(id, _)| id)
    }
}
