//! Scoring engine
//!
//! Pure computations over in-memory inspection records. Nothing here does
//! I/O; persistence lives in [`crate::core::store`].

pub mod aggregate;
pub mod engine;
pub mod evaluator;
pub mod grade;
pub mod tables;

pub use aggregate::{
    assess_sections, length_weighted_index, ProjectAssessment, ProjectSummary, SpanReport,
    TaggedAlert,
};
pub use engine::{compute_span, score_inspection, Alert, ScoreDetails, SpanResult};
pub use evaluator::{
    auxiliary_weight, evaluate_crack, grade_for_index, grade_to_score, mean_auxiliary_index,
    CrackEvaluation,
};
pub use grade::{DefectGrade, SafetyGrade, Severity};
pub use tables::{ConstructionType, CrackGroup};
