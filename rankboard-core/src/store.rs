/// Data access for entities, the comparison log and the skip log.
///
/// The engine only talks to `RatingStore`; persistence format is the
/// implementor's business. `MemoryStore` is the in-process implementation
/// used by the CLI and tests.
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::RankError;
use crate::types::{Comparison, ComparisonId, Entity, EntityId, JudgeId, SkippedPair};

pub trait RatingStore: Send + Sync {
    fn entity(&self, id: EntityId) -> Option<Entity>;

    /// All entities, ordered by id.
    fn entities(&self) -> Vec<Entity>;

    /// Insert or replace an entity. A benchmark is stored at its pin.
    fn put_entity(&self, entity: Entity);

    fn remove_entity(&self, id: EntityId) -> Option<Entity>;

    /// Overwrite an entity's stored rating. A plain write: concurrent
    /// writers to the same entity are last-write-wins.
    fn set_rating(&self, id: EntityId, rating: f64) -> Result<(), RankError>;

    /// Append a comparison, assigning it a fresh id.
    fn append_comparison(
        &self,
        judge_id: JudgeId,
        winner_id: EntityId,
        loser_id: EntityId,
        created_at: DateTime<Utc>,
    ) -> Comparison;

    fn delete_comparison(&self, id: ComparisonId) -> Result<Comparison, RankError>;

    /// The full log ordered by `created_at`, then id.
    fn comparisons(&self) -> Vec<Comparison>;

    fn comparisons_by_judge(&self, judge_id: JudgeId) -> Vec<Comparison>;

    /// Number of logged comparisons the entity took part in.
    fn comparison_count(&self, id: EntityId) -> usize;

    fn append_skip(&self, skip: SkippedPair);

    fn skips_by_judge(&self, judge_id: JudgeId) -> Vec<SkippedPair>;
}

/// In-memory `RatingStore`.
#[derive(Debug)]
pub struct MemoryStore {
    entities: DashMap<EntityId, Entity>,
    comparisons: RwLock<Vec<Comparison>>,
    skips: RwLock<Vec<SkippedPair>>,
    next_comparison_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new(), Vec::new())
    }

    /// Seed a store with existing records. New comparison ids continue after
    /// the largest id present. Benchmarks are stored at their pin.
    pub fn with_records(entities: Vec<Entity>, comparisons: Vec<Comparison>, skips: Vec<SkippedPair>) -> Self {
        let next_id = comparisons.iter().map(|c| c.id).max().map_or(1, |max| max + 1);
        let store = MemoryStore {
            entities: DashMap::with_capacity(entities.len()),
            comparisons: RwLock::new(comparisons),
            skips: RwLock::new(skips),
            next_comparison_id: AtomicI64::new(next_id),
        };
        for entity in entities {
            store.entities.insert(entity.id, entity.with_pinned_rating());
        }
        store
    }

    fn read_comparisons(&self) -> std::sync::RwLockReadGuard<'_, Vec<Comparison>> {
        self.comparisons.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_comparisons(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Comparison>> {
        self.comparisons.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RatingStore for MemoryStore {
    fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).map(|entry| entry.value().clone())
    }

    fn entities(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.entities.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by_key(|e| e.id);
        all
    }

    fn put_entity(&self, entity: Entity) {
        self.entities.insert(entity.id, entity.with_pinned_rating());
    }

    fn remove_entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id).map(|(_, entity)| entity)
    }

    fn set_rating(&self, id: EntityId, rating: f64) -> Result<(), RankError> {
        let mut entry = self.entities.get_mut(&id).ok_or(RankError::UnknownEntity(id))?;
        entry.rating = Some(rating);
        Ok(())
    }

    fn append_comparison(
        &self,
        judge_id: JudgeId,
        winner_id: EntityId,
        loser_id: EntityId,
        created_at: DateTime<Utc>,
    ) -> Comparison {
        let comparison = Comparison {
            id: self.next_comparison_id.fetch_add(1, Ordering::Relaxed),
            judge_id,
            winner_id,
            loser_id,
            created_at,
        };
        self.write_comparisons().push(comparison.clone());
        comparison
    }

    fn delete_comparison(&self, id: ComparisonId) -> Result<Comparison, RankError> {
        let mut log = self.write_comparisons();
        let pos = log
            .iter()
            .position(|c| c.id == id)
            .ok_or(RankError::UnknownComparison(id))?;
        Ok(log.remove(pos))
    }

    fn comparisons(&self) -> Vec<Comparison> {
        let mut log = self.read_comparisons().clone();
        log.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        log
    }

    fn comparisons_by_judge(&self, judge_id: JudgeId) -> Vec<Comparison> {
        self.read_comparisons()
            .iter()
            .filter(|c| c.judge_id == judge_id)
            .cloned()
            .collect()
    }

    fn comparison_count(&self, id: EntityId) -> usize {
        self.read_comparisons().iter().filter(|c| c.involves(id)).count()
    }

    fn append_skip(&self, skip: SkippedPair) {
        self.skips.write().unwrap_or_else(PoisonError::into_inner).push(skip);
    }

    fn skips_by_judge(&self, judge_id: JudgeId) -> Vec<SkippedPair> {
        self.skips
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.judge_id == judge_id)
            .cloned()
            .collect()
    }
}
