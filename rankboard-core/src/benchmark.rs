/// Benchmark policy: pinned entities take part in comparisons as opponents
/// but their stored rating never moves.
use crate::elo;
use crate::types::{Entity, EntityId};

/// The rating an entity plays at: its pinned rating if it is a benchmark,
/// otherwise its stored rating, otherwise `default_rating`.
pub fn effective_rating(entity: &Entity, default_rating: f64) -> f64 {
    if entity.is_benchmark {
        if let Some(pinned) = entity.benchmark_rating {
            return pinned;
        }
    }
    entity.rating.unwrap_or(default_rating)
}

/// Outcome for one side of an applied comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideUpdate {
    pub entity: EntityId,
    /// Effective rating going into the comparison.
    pub before: f64,
    /// Rating computed by the Elo step.
    pub computed: f64,
    /// Whether `computed` should be written back. False for benchmarks.
    pub persist: bool,
}

impl SideUpdate {
    /// Rating the entity holds after the update is persisted.
    pub fn stored(&self) -> f64 {
        if self.persist { self.computed } else { self.before }
    }
}

/// Both sides of an applied comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingUpdate {
    pub winner: SideUpdate,
    pub loser: SideUpdate,
    pub k: f64,
}

impl RatingUpdate {
    /// `(new_winner_rating, new_loser_rating)` as stored afterwards.
    pub fn new_ratings(&self) -> (f64, f64) {
        (self.winner.stored(), self.loser.stored())
    }

    /// Sides whose rating must be written, as `(id, rating)`.
    pub fn writes(&self) -> impl Iterator<Item = (EntityId, f64)> + '_ {
        [self.winner, self.loser]
            .into_iter()
            .filter(|side| side.persist)
            .map(|side| (side.entity, side.computed))
    }
}

/// Resolve both sides' effective ratings and run one Elo step.
///
/// Nothing is written here; the caller persists `RatingUpdate::writes`.
pub fn resolve_update(winner: &Entity, loser: &Entity, k: f64, default_rating: f64) -> RatingUpdate {
    let winner_before = effective_rating(winner, default_rating);
    let loser_before = effective_rating(loser, default_rating);
    let (winner_after, loser_after) = elo::update(winner_before, loser_before, k);

    RatingUpdate {
        winner: SideUpdate {
            entity: winner.id,
            before: winner_before,
            computed: winner_after,
            persist: !winner.is_benchmark,
        },
        loser: SideUpdate {
            entity: loser.id,
            before: loser_before,
            computed: loser_after,
            persist: !loser.is_benchmark,
        },
        k,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_rating_resolution() {
        assert_eq!(effective_rating(&Entity::new(1), 1500.0), 1500.0);
        assert_eq!(effective_rating(&Entity::with_rating(1, 1620.0), 1500.0), 1620.0);
        assert_eq!(effective_rating(&Entity::benchmark(1, 1800.0), 1500.0), 1800.0);

        // A drifted stored rating is ignored in favour of the pin.
        let mut drifted = Entity::benchmark(1, 1800.0);
        drifted.rating = Some(1234.0);
        assert_eq!(effective_rating(&drifted, 1500.0), 1800.0);
    }

    #[test]
    fn test_benchmark_side_is_not_persisted() {
        let benchmark = Entity::benchmark(1, 1500.0);
        let challenger = Entity::with_rating(2, 1500.0);

        let update = resolve_update(&challenger, &benchmark, 32.0, 1500.0);
        assert_eq!(update.winner.computed, 1516.0);
        assert_eq!(update.loser.computed, 1484.0);
        assert!(!update.loser.persist);
        assert_eq!(update.new_ratings(), (1516.0, 1500.0));
        assert_eq!(update.writes().collect::<Vec<_>>(), vec![(2, 1516.0)]);
    }

    #[test]
    fn test_benchmark_still_moves_its_opponent() {
        let strong_benchmark = Entity::benchmark(1, 1900.0);
        let challenger = Entity::with_rating(2, 1500.0);

        let vs_benchmark = resolve_update(&challenger, &strong_benchmark, 32.0, 1500.0);
        let vs_equal = resolve_update(&challenger, &Entity::with_rating(3, 1500.0), 32.0, 1500.0);
        assert!(vs_benchmark.winner.computed > vs_equal.winner.computed);
    }

    #[test]
    fn test_two_ordinary_entities_both_persist() {
        let update = resolve_update(&Entity::new(1), &Entity::new(2), 32.0, 1500.0);
        assert_eq!(update.writes().count(), 2);
    }
}
