//! Generation-checked entity handles

use std::fmt;

/// A stable handle to an entity in a `World`.
///
/// The handle packs a slot index and a generation counter into a single
/// `u64`. The index addresses the entity's slot in the world's arena; the
/// generation detects slot reuse, so a handle to a reaped entity can never
/// resolve to whatever entity later recycles the same slot.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EntityId(u64);

impl EntityId {
    /// Handle that resolves to nothing
    pub const NULL: Self = Self(u64::MAX);

    /// Create a handle from a slot index and generation
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// The slot index portion of the handle
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// The generation portion of the handle
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Whether this is the null handle
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_roundtrip() {
        let id = EntityId::new(12345, 678);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 678);
        assert!(!id.is_null());
    }

    #[test]
    fn test_null() {
        let id = EntityId::NULL;
        assert!(id.is_null());
        assert_eq!(EntityId::default(), EntityId::NULL);
    }

    #[test]
    fn test_generation_distinguishes_reuse() {
        let old = EntityId::new(7, 0);
        let recycled = EntityId::new(7, 1);
        assert_ne!(old, recycled);
        assert_eq!(old.index(), recycled.index());
    }
}
