/// rankboard-core: Pure-computation ranking engine for pairwise judgments.
///
/// Judges say "A beats B". From that stream the crate keeps incremental Elo
/// ratings, fits batch Bradley-Terry strengths, picks the next pair a judge
/// should see, and turns point totals into leaderboard ranks and leagues.
/// No HTTP, no database: storage sits behind the `RatingStore` trait.
///
/// Entities are identified by caller-provided `i64` IDs. The Bradley-Terry
/// solver maps them to array indices internally.
///
/// # Quick start
///
/// ```rust
/// use rankboard_core::{compute_strengths, update, StrengthConfig};
///
/// assert_eq!(update(1500.0, 1500.0, 32.0), (1516.0, 1484.0));
///
/// let outcomes = vec![(100, 200), (100, 300), (200, 300), (300, 100)];
/// let result = compute_strengths(&outcomes, &StrengthConfig::default());
///
/// for row in result.ranked() {
///     println!("Entity {}: θ = {:.4} (ln θ = {:.3})", row.entity, row.strength, row.log_strength);
/// }
/// ```

pub mod benchmark;
pub mod bradley_terry;
pub mod config;
pub mod constants;
pub mod elo;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod pairing;
pub mod recalculation;
pub mod store;
pub mod types;

// Re-export primary public API at crate root.
pub use benchmark::{RatingUpdate, SideUpdate, effective_rating, resolve_update};
pub use bradley_terry::compute_strengths;
pub use config::{AdaptiveKFactor, EloConfig, LeaderboardConfig, RankingConfig, SelectorConfig, StrengthConfig};
pub use elo::{expected_score, update};
pub use engine::RankingEngine;
pub use error::RankError;
pub use leaderboard::{LeagueBreakpoints, Neighborhood, neighborhood, rank_users};
pub use pairing::{JudgeContext, select_next_pair};
pub use recalculation::{RecalculationReport, recalculate_all};
pub use store::{MemoryStore, RatingStore};
pub use types::{
    Comparison, ComparisonId, Entity, EntityId, JudgeId, League, Pair, PairKey, RankedStrength, RankedUser,
    SkippedPair, Standing, StrengthResult, UserId,
};
