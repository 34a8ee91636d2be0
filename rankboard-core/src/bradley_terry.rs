/// Minorization-Maximization estimator for the Bradley-Terry model.
///
/// `P(i beats j) = θ_i / (θ_i + θ_j)`, fitted from hard win/loss outcomes.
/// The solver runs on pre-mapped `usize` indices; `compute_strengths` is the
/// id-level entry point.
use std::collections::BTreeMap;

use tracing::warn;

use crate::config::StrengthConfig;
use crate::types::{EntityId, IdMap, IndexedOutcome, Pair, StrengthResult};

pub(crate) struct BradleyTerry {
    /// Wins per item.
    wins: Vec<f64>,
    /// Sparse games table: games[i] maps opponent index -> number of games
    /// between i and that opponent, in either direction. Ordered so the
    /// denominator sums are reproducible bit for bit.
    games: Vec<BTreeMap<usize, f64>>,
    /// Current strengths.
    pub scores: Vec<f64>,
    floor: f64,
}

impl BradleyTerry {
    pub fn new(num_items: usize, results: &[IndexedOutcome], floor: f64) -> Self {
        let mut wins = vec![0.0; num_items];
        let mut games: Vec<BTreeMap<usize, f64>> = (0..num_items).map(|_| BTreeMap::new()).collect();

        for &(winner, loser) in results {
            assert!(winner < num_items, "winner index {} out of range (num_items = {})", winner, num_items);
            assert!(loser < num_items, "loser index {} out of range (num_items = {})", loser, num_items);

            wins[winner] += 1.0;
            *games[winner].entry(loser).or_insert(0.0) += 1.0;
            *games[loser].entry(winner).or_insert(0.0) += 1.0;
        }

        BradleyTerry {
            wins,
            games,
            scores: vec![1.0; num_items],
            floor,
        }
    }

    fn run_iteration(&mut self) {
        let mut new_scores = vec![0.0; self.scores.len()];

        for (i, new_score) in new_scores.iter_mut().enumerate() {
            if self.wins[i] == 0.0 {
                *new_score = self.floor;
                continue;
            }

            let score_i = self.scores[i];
            let denominator: f64 = self.games[i]
                .iter()
                .map(|(&j, &n_ij)| n_ij / (score_i + self.scores[j]))
                .sum();

            *new_score = self.wins[i] / denominator;
        }

        self.scores = new_scores;
    }

    /// Divide by the geometric mean so the product of all strengths is 1.
    fn normalize_scores(&mut self) {
        if self.scores.is_empty() {
            return;
        }

        let log_sum: f64 = self.scores.iter().map(|s| s.ln()).sum();
        let geo_mean = (log_sum / self.scores.len() as f64).exp();

        for score in &mut self.scores {
            *score /= geo_mean;
        }
    }

    /// Largest relative change over items that have won at least once.
    /// Items without wins sit at the floor and carry no information.
    fn max_relative_change(&self, old_scores: &[f64]) -> f64 {
        self.scores
            .iter()
            .zip(old_scores)
            .zip(&self.wins)
            .filter(|&(_, &w)| w > 0.0)
            .map(|((new, old), _)| (new - old).abs() / old)
            .fold(0.0_f64, f64::max)
    }

    /// Iterate to a fixed point. Returns `(iterations, converged)`.
    ///
    /// Each pass computes the whole new vector, renormalizes it, and only
    /// then measures the change: scale drift would otherwise never settle.
    pub fn calculate_scores(&mut self, max_iterations: usize, tolerance: f64) -> (usize, bool) {
        for iteration in 1..=max_iterations {
            let old_scores = self.scores.clone();
            self.run_iteration();
            self.normalize_scores();

            if self.max_relative_change(&old_scores) < tolerance {
                return (iteration, true);
            }
        }
        (max_iterations, false)
    }
}

/// Estimate a strength per entity from `(winner, loser)` outcomes.
///
/// Duplicates count as repeated games. Entities that appear in no outcome
/// are absent from the result. Self-pairs carry no information and are
/// ignored.
pub fn compute_strengths(outcomes: &[Pair], config: &StrengthConfig) -> StrengthResult {
    let mut id_map = IdMap::default();
    let indexed: Vec<IndexedOutcome> = outcomes
        .iter()
        .filter(|(winner, loser)| winner != loser)
        .map(|&(winner, loser)| (id_map.intern(winner), id_map.intern(loser)))
        .collect();

    if indexed.is_empty() {
        return StrengthResult {
            scores: BTreeMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let mut bt = BradleyTerry::new(id_map.len(), &indexed, config.floor);
    let (iterations, converged) = bt.calculate_scores(config.max_iterations, config.tolerance);

    if !converged {
        warn!(
            iterations,
            entities = id_map.len(),
            comparisons = indexed.len(),
            "Bradley-Terry estimate hit the iteration cap before converging"
        );
    }

    let scores: BTreeMap<EntityId, f64> = bt
        .scores
        .iter()
        .enumerate()
        .map(|(idx, &score)| (id_map.to_id(idx), score))
        .collect();

    StrengthResult {
        scores,
        iterations,
        converged,
    }
}
