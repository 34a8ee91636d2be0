/// Tunable parameters for every component, grouped per component.
///
/// `Default` reproduces the values in `constants`. With the `serde` feature
/// every field is optional on input, so a config file only needs the values
/// it changes.
use crate::constants::{
    CONVERGENCE_THRESHOLD, DEFAULT_K_FACTOR, DEFAULT_RATING, ESTABLISHED_COMPARISONS,
    ESTABLISHED_K_FACTOR, MAX_CHALLENGE_SHARE, MAX_STRENGTH_ITERATIONS, MIN_ADAPTIVE_POOL,
    MIN_FAIRNESS_SAMPLE, NEIGHBORS_ABOVE, NEIGHBORS_BELOW, PROVISIONAL_COMPARISONS,
    PROVISIONAL_K_FACTOR, SIMILARITY_SLICE, STANDARD_K_FACTOR, STRENGTH_FLOOR,
};

/// Configuration for the whole engine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankingConfig {
    pub elo: EloConfig,
    pub strength: StrengthConfig,
    pub selector: SelectorConfig,
    pub leaderboard: LeaderboardConfig,
}

/// Incremental rating parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EloConfig {
    /// Rating of unrated entities and the reset baseline for replays.
    pub default_rating: f64,
    /// Flat K used by the recalculation replay.
    pub default_k: f64,
    /// Count-dependent K used for live comparisons.
    pub adaptive: AdaptiveKFactor,
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            default_rating: DEFAULT_RATING,
            default_k: DEFAULT_K_FACTOR,
            adaptive: AdaptiveKFactor::default(),
        }
    }
}

/// Step function from an entity's comparison count to its K-factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdaptiveKFactor {
    pub provisional_k: f64,
    /// Counts below this are provisional.
    pub provisional_below: usize,
    pub standard_k: f64,
    /// Counts at or above this are established.
    pub established_from: usize,
    pub established_k: f64,
}

impl Default for AdaptiveKFactor {
    fn default() -> Self {
        AdaptiveKFactor {
            provisional_k: PROVISIONAL_K_FACTOR,
            provisional_below: PROVISIONAL_COMPARISONS,
            standard_k: STANDARD_K_FACTOR,
            established_from: ESTABLISHED_COMPARISONS,
            established_k: ESTABLISHED_K_FACTOR,
        }
    }
}

/// Bradley-Terry MM solver parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrengthConfig {
    /// θ for entities without a single win.
    pub floor: f64,
    /// Max relative change that counts as converged.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        StrengthConfig {
            floor: STRENGTH_FLOOR,
            tolerance: CONVERGENCE_THRESHOLD,
            max_iterations: MAX_STRENGTH_ITERATIONS,
        }
    }
}

/// Pair selection parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectorConfig {
    /// Largest tolerated share of a judge's comparisons featuring one entity.
    pub max_challenge_share: f64,
    /// Judge comparison count from which the fairness filter applies.
    pub min_fairness_sample: usize,
    /// How many of the closest-rated pairs the adaptive draw picks from.
    pub similarity_slice: usize,
    /// Pools smaller than this are always drawn uniformly.
    pub min_adaptive_pool: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            max_challenge_share: MAX_CHALLENGE_SHARE,
            min_fairness_sample: MIN_FAIRNESS_SAMPLE,
            similarity_slice: SIMILARITY_SLICE,
            min_adaptive_pool: MIN_ADAPTIVE_POOL,
        }
    }
}

/// Leaderboard neighborhood window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LeaderboardConfig {
    pub neighbors_above: usize,
    pub neighbors_below: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        LeaderboardConfig {
            neighbors_above: NEIGHBORS_ABOVE,
            neighbors_below: NEIGHBORS_BELOW,
        }
    }
}
