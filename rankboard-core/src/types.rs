use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

/// Caller-provided identifier of a ranked entity (a challenge).
pub type EntityId = i64;

/// Caller-provided identifier of a judge.
pub type JudgeId = i64;

/// Caller-provided identifier of a comparison record.
pub type ComparisonId = i64;

/// Caller-provided identifier of a leaderboard user.
pub type UserId = i64;

/// Two entity ids. Ordered where the position carries meaning:
/// `(winner, loser)` for outcomes, `(left, right)` for selected pairs.
pub type Pair = (EntityId, EntityId);

/// An item being ranked through pairwise judgments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Entity {
    pub id: EntityId,
    /// Stored Elo rating. `None` reads as the configured default rating.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_benchmark: bool,
    /// Pinned rating, meaningful only while `is_benchmark` is set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub benchmark_rating: Option<f64>,
}

impl Entity {
    /// An unrated, non-benchmark entity.
    pub fn new(id: EntityId) -> Self {
        Entity {
            id,
            rating: None,
            is_benchmark: false,
            benchmark_rating: None,
        }
    }

    pub fn with_rating(id: EntityId, rating: f64) -> Self {
        Entity {
            rating: Some(rating),
            ..Entity::new(id)
        }
    }

    /// A benchmark entity pinned at `rating`. Stored and pinned ratings agree.
    pub fn benchmark(id: EntityId, rating: f64) -> Self {
        Entity {
            id,
            rating: Some(rating),
            is_benchmark: true,
            benchmark_rating: Some(rating),
        }
    }

    /// Bring a benchmark's stored rating in line with its pin.
    pub(crate) fn with_pinned_rating(mut self) -> Self {
        if self.is_benchmark {
            if let Some(pinned) = self.benchmark_rating {
                self.rating = Some(pinned);
            }
        }
        self
    }
}

/// One judge decision: `winner_id` beat `loser_id`. Append-only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Comparison {
    pub id: ComparisonId,
    pub judge_id: JudgeId,
    pub winner_id: EntityId,
    pub loser_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Comparison {
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.winner_id, self.loser_id)
    }

    /// `(winner, loser)`.
    pub fn outcome(&self) -> Pair {
        (self.winner_id, self.loser_id)
    }

    pub fn involves(&self, entity: EntityId) -> bool {
        self.winner_id == entity || self.loser_id == entity
    }
}

/// A pair a judge declined to rank. Append-only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SkippedPair {
    pub judge_id: JudgeId,
    pub entity_a_id: EntityId,
    pub entity_b_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl SkippedPair {
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.entity_a_id, self.entity_b_id)
    }
}

/// Canonical unordered pair: the smaller id always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: EntityId,
    high: EntityId,
}

impl PairKey {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        PairKey {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn low(&self) -> EntityId {
        self.low
    }

    pub fn high(&self) -> EntityId {
        self.high
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.low == entity || self.high == entity
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.low, self.high)
    }
}

/// Batch Bradley-Terry output.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrengthResult {
    /// θ per entity that appeared in at least one comparison.
    /// Geometric mean over the whole map is 1.
    pub scores: BTreeMap<EntityId, f64>,
    /// MM iterations performed.
    pub iterations: usize,
    /// False when the iteration cap was hit before the tolerance was met.
    pub converged: bool,
}

/// One row of a strength ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedStrength {
    pub entity: EntityId,
    pub strength: f64,
    /// `ln(θ)`; differences between two rows are log-odds.
    pub log_strength: f64,
}

impl StrengthResult {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn strength(&self, entity: EntityId) -> Option<f64> {
        self.scores.get(&entity).copied()
    }

    /// `ln(θ_a) - ln(θ_b)`: the log-odds of `a` beating `b`.
    pub fn log_odds(&self, a: EntityId, b: EntityId) -> Option<f64> {
        Some(self.strength(a)?.ln() - self.strength(b)?.ln())
    }

    /// `P(a beats b) = θ_a / (θ_a + θ_b)`.
    pub fn win_probability(&self, a: EntityId, b: EntityId) -> Option<f64> {
        let theta_a = self.strength(a)?;
        let theta_b = self.strength(b)?;
        Some(theta_a / (theta_a + theta_b))
    }

    /// Entities sorted by strength, strongest first. Ties keep id order.
    pub fn ranked(&self) -> Vec<RankedStrength> {
        let mut rows: Vec<RankedStrength> = self
            .scores
            .iter()
            .map(|(&entity, &strength)| RankedStrength {
                entity,
                strength,
                log_strength: strength.ln(),
            })
            .collect();
        rows.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        rows
    }
}

/// Percentile band of a ranked user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum League {
    Gold,
    Silver,
    Bronze,
}

impl League {
    pub fn name(&self) -> &'static str {
        match self {
            League::Gold => "Gold",
            League::Silver => "Silver",
            League::Bronze => "Bronze",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Externally aggregated point total for one user.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Standing {
    pub user_id: UserId,
    pub total_points: i64,
}

/// A user placed on the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RankedUser {
    pub user_id: UserId,
    pub total_points: i64,
    /// 1-based. Equal points still get distinct ranks, in input order.
    pub rank: usize,
    pub league: League,
}

/// Internal `(winner, loser)` outcome (usize indices, not caller IDs).
pub(crate) type IndexedOutcome = (usize, usize);

/// Maps between caller-provided i64 IDs and internal 0..N indices.
///
/// Indices are handed out in order of first appearance.
#[derive(Debug, Default)]
pub(crate) struct IdMap {
    ids: Vec<EntityId>,
    id_to_idx: HashMap<EntityId, usize>,
}

impl IdMap {
    /// Index for `id`, registering it if unseen.
    pub fn intern(&mut self, id: EntityId) -> usize {
        if let Some(&idx) = self.id_to_idx.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.id_to_idx.insert(id, idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn to_id(&self, idx: usize) -> EntityId {
        self.ids[idx]
    }
}
