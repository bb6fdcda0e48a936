//! Quiz engine: option generation, grading and the per-run state machines.

pub mod challenge;
pub mod grading;
pub mod options;
pub mod review;

pub use challenge::{ChallengeRun, GradeOutcome, PenaltyRun};
pub use grading::{word_overlap_grade, LOCAL_GRADE_MAX};
pub use options::{build_options, pad_with_placeholders, parse_choice};
pub use review::ReviewRun;
