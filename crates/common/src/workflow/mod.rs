//! Workflow rules for AcadFlow
//!
//! Pure domain logic, independent of storage:
//! - FYP stage machine (transition table, milestone mapping, upload advances)
//! - Clearance aggregation (per-department sub-statuses, derived overall)
//! - Role permission table

pub mod clearance;
pub mod permissions;
pub mod stage;

pub use clearance::{overall_status, ClearanceDepartment, ClearanceStatus};
pub use permissions::Role;
pub use stage::{advance_on_upload, next_document_version, DocumentType, FypStage, Milestone};
