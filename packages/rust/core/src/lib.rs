//! Course Assembler for CourseGen.
//!
//! Drives the fixed generation sequence (research → planning → content →
//! assessment → resources → metadata) against pluggable generation and
//! search backends, then persists the assembled course through the
//! Content Store.

pub mod assembler;
pub mod stage;

pub use assembler::{
    CourseModel, CourseRequest, GenerateOutcome, PlannedModule, ProgressReporter, SilentProgress,
    WebSearch, generate_course,
};
pub use stage::Stage;
