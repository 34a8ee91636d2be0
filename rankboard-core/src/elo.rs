/// Incremental Elo rating updates.
///
/// Pure functions over plain numbers. Benchmark handling and persistence
/// live in `benchmark` and `engine`.
use crate::config::AdaptiveKFactor;

/// Probability that a side rated `rating` beats a side rated `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// New `(winner, loser)` ratings after `winner` beat `loser`.
///
/// Both results are rounded to whole points, so the exchange is zero-sum
/// up to one point of rounding.
pub fn update(winner_rating: f64, loser_rating: f64, k: f64) -> (f64, f64) {
    let expected_winner = expected_score(winner_rating, loser_rating);
    let expected_loser = 1.0 - expected_winner;

    let new_winner = (winner_rating + k * (1.0 - expected_winner)).round();
    let new_loser = (loser_rating - k * expected_loser).round();
    (new_winner, new_loser)
}

impl AdaptiveKFactor {
    /// K-factor for an entity with `comparison_count` prior comparisons.
    pub fn for_count(&self, comparison_count: usize) -> f64 {
        if comparison_count < self.provisional_below {
            self.provisional_k
        } else if comparison_count < self.established_from {
            self.standard_k
        } else {
            self.established_k
        }
    }

    /// K-factor for one comparison: the rounded mean of both sides' factors.
    pub fn combined(&self, winner_count: usize, loser_count: usize) -> f64 {
        ((self.for_count(winner_count) + self.for_count(loser_count)) / 2.0).round()
    }
}
