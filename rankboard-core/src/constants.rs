/// Rating given to an entity that has never been rated, and the baseline
/// every non-benchmark entity is reset to before a full replay.
pub const DEFAULT_RATING: f64 = 1500.0;

/// Flat Elo K-factor. Used directly by the recalculation replay.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// K-factor for entities with fewer than `PROVISIONAL_COMPARISONS` comparisons.
/// New entities should travel quickly towards their true level.
pub const PROVISIONAL_K_FACTOR: f64 = 40.0;

/// Comparison count at which an entity stops being provisional.
pub const PROVISIONAL_COMPARISONS: usize = 10;

/// K-factor between the provisional and established stages.
pub const STANDARD_K_FACTOR: f64 = 32.0;

/// Comparison count at which an entity counts as established.
pub const ESTABLISHED_COMPARISONS: usize = 30;

/// K-factor for established entities; resists noise from single upsets.
pub const ESTABLISHED_K_FACTOR: f64 = 24.0;

/// Strength assigned to entities that never won a comparison.
///
/// The MM update has a zero numerator for them; pinning at a tiny positive
/// value keeps `ln(θ)` finite for display.
pub const STRENGTH_FLOOR: f64 = 1e-8;

/// Maximum relative change between iterations at which the MM solver stops.
pub const CONVERGENCE_THRESHOLD: f64 = 1e-6;

/// Hard cap on MM iterations. The only thing that stops a non-converging run.
pub const MAX_STRENGTH_ITERATIONS: usize = 1000;

/// Largest share of a judge's comparisons a single entity may appear in
/// before the fairness filter starts excluding it.
pub const MAX_CHALLENGE_SHARE: f64 = 0.15;

/// Number of comparisons a judge must have made before the fairness filter
/// is enforced. Shares are meaningless on tiny samples.
pub const MIN_FAIRNESS_SAMPLE: usize = 20;

/// Number of smallest-gap pairs the adaptive selection draws from.
pub const SIMILARITY_SLICE: usize = 10;

/// Candidate pools smaller than this always use uniform random selection.
pub const MIN_ADAPTIVE_POOL: usize = 10;

/// Ranked users shown above the current user in a leaderboard neighborhood.
pub const NEIGHBORS_ABOVE: usize = 3;

/// Ranked users shown below the current user in a leaderboard neighborhood.
pub const NEIGHBORS_BELOW: usize = 2;
