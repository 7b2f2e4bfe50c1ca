//! Registry of live spawned entities
//!
//! Replaces scene queries: the session enumerates this list to clear the play
//! area on a new game and to expire entities whose lifetime ran out.

use serde::{Deserialize, Serialize};

use super::spawn::SpawnCategory;

/// Identifier handed to the entity service for a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// A spawned entity the runtime still tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEntity {
    pub id: EntityId,
    pub category: SpawnCategory,
    /// Scaled time at spawn
    pub spawned_at: f64,
    /// Scaled seconds until automatic removal
    pub lifetime: f32,
    /// Already sliced (slices are accepted once)
    pub sliced: bool,
}

impl LiveEntity {
    pub fn expires_at(&self) -> f64 {
        self.spawned_at + self.lifetime as f64
    }
}

/// Live entities, kept sorted by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: Vec<LiveEntity>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Track a newly spawned entity and return its id
    pub fn insert(&mut self, category: SpawnCategory, spawned_at: f64, lifetime: f32) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0.wrapping_add(1);
        let at = self.entities.partition_point(|e| e.id < id);
        self.entities.insert(at, LiveEntity {
            id,
            category,
            spawned_at,
            lifetime,
            sliced: false,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&LiveEntity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entities[idx])
    }

    /// Mark an entity sliced; returns its category the first time only
    pub fn mark_sliced(&mut self, id: EntityId) -> Option<SpawnCategory> {
        let idx = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        let entity = &mut self.entities[idx];
        if entity.sliced {
            return None;
        }
        entity.sliced = true;
        Some(entity.category.clone())
    }

    /// Remove entities whose lifetime has run out at scaled time `now`
    pub fn expire(&mut self, now: f64) -> Vec<EntityId> {
        let mut expired = Vec::new();
        self.entities.retain(|e| {
            if now >= e.expires_at() {
                expired.push(e.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Remove every entity, returning their ids in order
    pub fn clear(&mut self) -> Vec<EntityId> {
        self.entities.drain(..).map(|e| e.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveEntity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> SpawnCategory {
        SpawnCategory::Fruit { index: 0, points: 1 }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut registry = EntityRegistry::new();
        let a = registry.insert(fruit(), 0.0, 5.0);
        let b = registry.insert(SpawnCategory::Bomb, 0.0, 5.0);
        assert!(a < b);
        assert_eq!(registry.get(b).map(|e| &e.category), Some(&SpawnCategory::Bomb));
    }

    #[test]
    fn test_id_counter_wraps_past_zero() {
        let mut registry = EntityRegistry::new();
        registry.next_id = u64::MAX;
        let last = registry.insert(fruit(), 0.0, 5.0);
        assert_eq!(last, EntityId(u64::MAX));
        let wrapped = registry.insert(SpawnCategory::Bomb, 0.0, 5.0);
        assert_eq!(wrapped, EntityId(1));
        // Still sorted, lookups keep working
        assert_eq!(registry.iter().next().map(|e| e.id), Some(wrapped));
        assert_eq!(registry.get(last).map(|e| e.id), Some(last));
        assert_eq!(registry.mark_sliced(last), Some(fruit()));
    }

    #[test]
    fn test_slice_only_once() {
        let mut registry = EntityRegistry::new();
        let id = registry.insert(fruit(), 0.0, 5.0);
        assert_eq!(registry.mark_sliced(id), Some(fruit()));
        assert_eq!(registry.mark_sliced(id), None);
        assert_eq!(registry.mark_sliced(EntityId(99)), None);
    }

    #[test]
    fn test_expire_by_lifetime() {
        let mut registry = EntityRegistry::new();
        let early = registry.insert(fruit(), 0.0, 1.0);
        let late = registry.insert(fruit(), 0.5, 1.0);
        assert!(registry.expire(0.9).is_empty());
        assert_eq!(registry.expire(1.0), vec![early]);
        assert_eq!(registry.expire(2.0), vec![late]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_returns_all() {
        let mut registry = EntityRegistry::new();
        let ids: Vec<_> = (0..3).map(|_| registry.insert(fruit(), 0.0, 5.0)).collect();
        assert_eq!(registry.clear(), ids);
        assert_eq!(registry.len(), 0);
        // Ids keep counting after a clear
        assert!(registry.insert(fruit(), 0.0, 5.0) > ids[2]);
    }
}
