use crate::types::{ComparisonId, EntityId};

/// Errors surfaced to callers of the ranking engine.
///
/// Pure components never fail; these come from validating caller input
/// before it reaches them, or from the store when an id does not exist.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    #[error("entity {0} cannot be compared against itself")]
    SelfComparison(EntityId),

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("unknown comparison {0}")]
    UnknownComparison(ComparisonId),

    #[error("adaptive ratio must be within [0, 1], got {0}")]
    InvalidAdaptiveRatio(f64),

    #[error("benchmark rating must be a finite number, got {0}")]
    InvalidBenchmarkRating(f64),
}
