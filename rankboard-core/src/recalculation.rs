/// Full rating rebuild: reset every entity, then replay the comparison log.
///
/// Elo is path dependent, so the replay walks the log oldest first. The
/// replay uses the flat default K, not the adaptive one live comparisons
/// use, so a rebuild does not reproduce live-accumulated ratings exactly.
use std::time::Instant;

use tracing::{debug, info};

use crate::benchmark::resolve_update;
use crate::config::EloConfig;
use crate::store::RatingStore;

/// Outcome of a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RecalculationReport {
    pub comparisons_processed: usize,
    /// Records referencing an entity that no longer exists.
    pub skipped: usize,
    pub duration_ms: u64,
}

/// Reset and replay. The caller must keep live submissions out for the
/// duration; `RankingEngine::recalculate_all` does so.
pub fn recalculate_all<S: RatingStore + ?Sized>(store: &S, config: &EloConfig) -> RecalculationReport {
    let start = Instant::now();

    for entity in store.entities() {
        let baseline = match (entity.is_benchmark, entity.benchmark_rating) {
            (true, Some(pinned)) => pinned,
            _ => config.default_rating,
        };
        // Entities come from the store itself; a concurrent removal just
        // means there is nothing left to reset.
        let _ = store.set_rating(entity.id, baseline);
    }

    let mut processed = 0;
    let mut skipped = 0;

    for comparison in store.comparisons() {
        let (Some(winner), Some(loser)) = (store.entity(comparison.winner_id), store.entity(comparison.loser_id)) else {
            debug!(comparison = comparison.id, "Skipping comparison with a deleted entity");
            skipped += 1;
            continue;
        };

        let update = resolve_update(&winner, &loser, config.default_k, config.default_rating);
        for (id, rating) in update.writes() {
            let _ = store.set_rating(id, rating);
        }
        processed += 1;
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        comparisons_processed = processed,
        skipped,
        elapsed_ms = duration_ms,
        "Recalculated ratings"
    );

    RecalculationReport {
        comparisons_processed: processed,
        skipped,
        duration_ms,
    }
}
