/// Ranking engine orchestrator.
///
/// Validates caller input, reads from and writes to a `RatingStore`, and
/// hands immutable snapshots to the pure components. The components never
/// see an invalid pair or an unknown id.
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::benchmark::{RatingUpdate, resolve_update};
use crate::bradley_terry::compute_strengths;
use crate::config::RankingConfig;
use crate::error::RankError;
use crate::leaderboard::{Neighborhood, neighborhood, rank_users};
use crate::pairing::{JudgeContext, select_next_pair};
use crate::recalculation::{RecalculationReport, recalculate_all};
use crate::store::RatingStore;
use crate::types::{Comparison, ComparisonId, Entity, EntityId, JudgeId, Pair, SkippedPair, Standing, StrengthResult, UserId};

pub struct RankingEngine<S> {
    store: S,
    config: RankingConfig,
    /// Live submissions hold the shared side; a full recalculation holds
    /// the exclusive side so reset and replay never interleave with them.
    /// Submissions do not exclude each other: two racing updates to the same
    /// entity are last-write-wins until the next recalculation.
    gate: RwLock<()>,
}

impl<S: RatingStore> RankingEngine<S> {
    pub fn new(store: S, config: RankingConfig) -> Self {
        RankingEngine {
            store,
            config,
            gate: RwLock::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    fn load_pair(&self, winner_id: EntityId, loser_id: EntityId) -> Result<(Entity, Entity), RankError> {
        if winner_id == loser_id {
            return Err(RankError::SelfComparison(winner_id));
        }
        let winner = self.store.entity(winner_id).ok_or(RankError::UnknownEntity(winner_id))?;
        let loser = self.store.entity(loser_id).ok_or(RankError::UnknownEntity(loser_id))?;
        Ok((winner, loser))
    }

    fn apply_loaded(&self, winner: &Entity, loser: &Entity, winner_count: usize, loser_count: usize) -> Result<RatingUpdate, RankError> {
        let elo = &self.config.elo;
        let k = elo.adaptive.combined(winner_count, loser_count);
        let update = resolve_update(winner, loser, k, elo.default_rating);

        for (id, rating) in update.writes() {
            self.store.set_rating(id, rating)?;
        }

        debug!(
            winner = winner.id,
            loser = loser.id,
            k,
            winner_rating = update.winner.stored(),
            loser_rating = update.loser.stored(),
            "Applied comparison"
        );
        Ok(update)
    }

    /// Update ratings for one result with the adaptive K-factor.
    ///
    /// Each side's K comes from its comparison count as currently logged.
    /// Benchmark sides are read at their pinned rating and not written.
    pub fn apply_comparison(&self, winner_id: EntityId, loser_id: EntityId) -> Result<RatingUpdate, RankError> {
        let _live = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let (winner, loser) = self.load_pair(winner_id, loser_id)?;
        let winner_count = self.store.comparison_count(winner_id);
        let loser_count = self.store.comparison_count(loser_id);
        self.apply_loaded(&winner, &loser, winner_count, loser_count)
    }

    /// Apply a judge's decision and log it. K-factors are based on counts
    /// from before this comparison. Nothing is logged if the rating write
    /// fails.
    pub fn record_comparison(
        &self,
        judge_id: JudgeId,
        winner_id: EntityId,
        loser_id: EntityId,
        created_at: DateTime<Utc>,
    ) -> Result<(Comparison, RatingUpdate), RankError> {
        let _live = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let (winner, loser) = self.load_pair(winner_id, loser_id)?;
        let winner_count = self.store.comparison_count(winner_id);
        let loser_count = self.store.comparison_count(loser_id);

        let update = self.apply_loaded(&winner, &loser, winner_count, loser_count)?;
        let comparison = self.store.append_comparison(judge_id, winner_id, loser_id, created_at);
        Ok((comparison, update))
    }

    /// Remove a comparison from the log. Ratings keep the effect of the
    /// removed comparison until the next `recalculate_all`.
    pub fn undo_comparison(&self, id: ComparisonId) -> Result<Comparison, RankError> {
        let _live = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        self.store.delete_comparison(id)
    }

    /// Record that a judge declined to rank a pair.
    pub fn skip_pair(&self, judge_id: JudgeId, a: EntityId, b: EntityId, created_at: DateTime<Utc>) -> Result<SkippedPair, RankError> {
        self.load_pair(a, b)?;
        let skip = SkippedPair {
            judge_id,
            entity_a_id: a,
            entity_b_id: b,
            created_at,
        };
        self.store.append_skip(skip.clone());
        Ok(skip)
    }

    /// Pin an entity at `rating`, or unpin it with `None`. Pinning also sets
    /// the stored rating; unpinning keeps it.
    pub fn set_benchmark(&self, id: EntityId, rating: Option<f64>) -> Result<Entity, RankError> {
        if let Some(r) = rating {
            if !r.is_finite() {
                return Err(RankError::InvalidBenchmarkRating(r));
            }
        }

        let _live = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let mut entity = self.store.entity(id).ok_or(RankError::UnknownEntity(id))?;
        match rating {
            Some(r) => {
                entity.is_benchmark = true;
                entity.benchmark_rating = Some(r);
                entity.rating = Some(r);
            }
            None => {
                entity.is_benchmark = false;
                entity.benchmark_rating = None;
            }
        }
        self.store.put_entity(entity.clone());
        Ok(entity)
    }

    /// Bradley-Terry strengths over the entire comparison log.
    pub fn compute_strengths(&self) -> StrengthResult {
        let outcomes: Vec<Pair> = self.store.comparisons().iter().map(Comparison::outcome).collect();
        compute_strengths(&outcomes, &self.config.strength)
    }

    /// Next pair for a judge, drawn with the thread-local RNG.
    pub fn next_pair(&self, judge_id: JudgeId, adaptive_ratio: f64) -> Result<Option<Pair>, RankError> {
        self.next_pair_with_rng(judge_id, adaptive_ratio, &mut rand::rng())
    }

    /// Next pair for a judge with a caller-supplied RNG. `None` once the
    /// judge has judged or skipped every pair.
    pub fn next_pair_with_rng(&self, judge_id: JudgeId, adaptive_ratio: f64, rng: &mut impl Rng) -> Result<Option<Pair>, RankError> {
        if !(0.0..=1.0).contains(&adaptive_ratio) {
            return Err(RankError::InvalidAdaptiveRatio(adaptive_ratio));
        }

        let entities = self.store.entities();
        let comparisons = self.store.comparisons_by_judge(judge_id);
        let skipped = self.store.skips_by_judge(judge_id);

        let ctx = JudgeContext {
            judge_id,
            entities: &entities,
            comparisons: &comparisons,
            skipped: &skipped,
            adaptive_ratio,
            default_rating: self.config.elo.default_rating,
        };
        Ok(select_next_pair(&ctx, &self.config.selector, rng))
    }

    /// Reset every rating and replay the whole log with the flat K-factor.
    /// Blocks live submissions until done.
    pub fn recalculate_all(&self) -> RecalculationReport {
        let _exclusive = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        recalculate_all(&self.store, &self.config.elo)
    }

    /// Rank externally aggregated standings and return `user_id`'s slice.
    pub fn leaderboard_neighborhood(&self, standings: &[Standing], user_id: UserId) -> Neighborhood {
        let ranked = rank_users(standings);
        neighborhood(&ranked, user_id, &self.config.leaderboard)
    }
}
