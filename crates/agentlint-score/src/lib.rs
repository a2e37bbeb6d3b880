//! Progressive quality scoring and cross-validation history.
//!
//! The scorer turns a manifest into five weighted dimension scores, an
//! overall score, a letter grade, and a return-on-effort-ranked improvement
//! list. The context records scoring passes under a coarse fingerprint and
//! derives recurring patterns and previously successful fixes.

pub mod context;
pub mod scorer;

pub use context::{
    Fingerprint, ValidationContext, ValidationHistoryEntry, ValidationPattern, fingerprint,
};
pub use scorer::{
    DimensionScore, DimensionSet, Grade, ProgressiveScorer, RankedImprovement, ValidationScore,
};
