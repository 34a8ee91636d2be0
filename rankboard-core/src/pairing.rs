/// Next-pair selection for a judge.
///
/// Every call gets the judge's full history and keeps nothing between calls.
/// Similar ratings make the most informative pairs, so most draws come from
/// the smallest-gap slice; the rest are uniform so no entity stays stuck
/// inside its rating band.
use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::benchmark::effective_rating;
use crate::config::SelectorConfig;
use crate::types::{Comparison, Entity, EntityId, JudgeId, Pair, PairKey, SkippedPair};

/// Everything the selector knows about one judge at one moment.
#[derive(Debug, Clone, Copy)]
pub struct JudgeContext<'a> {
    pub judge_id: JudgeId,
    /// The full entity list.
    pub entities: &'a [Entity],
    /// Comparisons; only those made by `judge_id` are considered.
    pub comparisons: &'a [Comparison],
    /// Skipped pairs; only those skipped by `judge_id` are considered.
    pub skipped: &'a [SkippedPair],
    /// Probability in [0, 1] of drawing from the similar-rating slice.
    pub adaptive_ratio: f64,
    /// Rating for entities that have none.
    pub default_rating: f64,
}

/// Candidate pair with the rating gap that orders it.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    a: EntityId,
    b: EntityId,
    gap: f64,
}

/// Pick the next pair for a judge, or `None` once every unordered pair of
/// entities has been judged or skipped by them.
///
/// The returned `(left, right)` order is randomized.
pub fn select_next_pair(ctx: &JudgeContext<'_>, config: &SelectorConfig, rng: &mut impl Rng) -> Option<Pair> {
    let judged: Vec<&Comparison> = ctx
        .comparisons
        .iter()
        .filter(|c| c.judge_id == ctx.judge_id)
        .collect();

    let mut seen: HashSet<PairKey> = judged.iter().map(|c| c.pair_key()).collect();
    seen.extend(
        ctx.skipped
            .iter()
            .filter(|s| s.judge_id == ctx.judge_id)
            .map(|s| s.pair_key()),
    );

    let pool = candidate_pool(ctx, &seen);
    if pool.is_empty() {
        return None;
    }

    let overrepresented = overrepresented_entities(&judged, config);
    let mut pool = apply_fairness_filter(pool, &overrepresented);

    pool.shuffle(rng);

    let draw: f64 = rng.random();
    let chosen = if draw >= ctx.adaptive_ratio || pool.len() < config.min_adaptive_pool {
        pool[rng.random_range(0..pool.len())]
    } else {
        // Stable sort keeps the shuffled order among equal gaps.
        pool.sort_by(|x, y| x.gap.total_cmp(&y.gap));
        let slice = config.similarity_slice.clamp(1, pool.len());
        pool[rng.random_range(0..slice)]
    };

    if rng.random::<f64>() < 0.5 {
        Some((chosen.a, chosen.b))
    } else {
        Some((chosen.b, chosen.a))
    }
}

/// All unordered pairs of distinct entities not yet in `seen`.
fn candidate_pool(ctx: &JudgeContext<'_>, seen: &HashSet<PairKey>) -> Vec<Candidate> {
    let mut unique_ids = HashSet::with_capacity(ctx.entities.len());
    let rated: Vec<(EntityId, f64)> = ctx
        .entities
        .iter()
        .filter(|e| unique_ids.insert(e.id))
        .map(|e| (e.id, effective_rating(e, ctx.default_rating)))
        .collect();

    let mut pool = Vec::new();
    for (i, &(a, rating_a)) in rated.iter().enumerate() {
        for &(b, rating_b) in &rated[i + 1..] {
            if seen.contains(&PairKey::new(a, b)) {
                continue;
            }
            pool.push(Candidate {
                a,
                b,
                gap: (rating_a - rating_b).abs(),
            });
        }
    }
    pool
}

/// Entities whose share of the judge's comparisons exceeds the configured
/// maximum. Empty while the judge has fewer comparisons than the minimum
/// sample.
pub fn overrepresented_entities(judged: &[&Comparison], config: &SelectorConfig) -> HashSet<EntityId> {
    let total = judged.len();
    if total == 0 || total < config.min_fairness_sample {
        return HashSet::new();
    }

    let mut appearances: HashMap<EntityId, usize> = HashMap::new();
    for c in judged {
        *appearances.entry(c.winner_id).or_insert(0) += 1;
        *appearances.entry(c.loser_id).or_insert(0) += 1;
    }

    appearances
        .into_iter()
        .filter(|&(_, count)| count as f64 / total as f64 > config.max_challenge_share)
        .map(|(id, _)| id)
        .collect()
}

/// Drop pairs touching an overrepresented entity, unless that leaves nothing.
fn apply_fairness_filter(pool: Vec<Candidate>, overrepresented: &HashSet<EntityId>) -> Vec<Candidate> {
    if overrepresented.is_empty() {
        return pool;
    }

    let filtered: Vec<Candidate> = pool
        .iter()
        .copied()
        .filter(|c| !overrepresented.contains(&c.a) && !overrepresented.contains(&c.b))
        .collect();

    if filtered.is_empty() {
        debug!(
            excluded = overrepresented.len(),
            pool = pool.len(),
            "Fairness filter would empty the pool; selecting without it"
        );
        pool
    } else {
        filtered
    }
}
