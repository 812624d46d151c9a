//! FYP entity

use crate::workflow::{FypStage, Milestone};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fyps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique campus-wide, compared case-insensitively
    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub stage: String,

    pub student_id: Uuid,

    pub supervisor_id: Option<Uuid>,

    // Milestone timestamps, each set at most once on first entry
    pub idea_approved_at: Option<DateTimeWithTimeZone>,

    pub proposal_approved_at: Option<DateTimeWithTimeZone>,

    pub srs_approved_at: Option<DateTimeWithTimeZone>,

    pub internal_completed_at: Option<DateTimeWithTimeZone>,

    pub external_completed_at: Option<DateTimeWithTimeZone>,

    pub completed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the stage as an enum
    pub fn fyp_stage(&self) -> FypStage {
        FypStage::from(self.stage.clone())
    }

    /// Check if the FYP is in a stage with no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        self.fyp_stage().is_terminal()
    }

    /// The stored timestamp for a milestone, if already stamped
    pub fn milestone_at(&self, milestone: Milestone) -> Option<DateTimeWithTimeZone> {
        match milestone {
            Milestone::IdeaApproved => self.idea_approved_at,
            Milestone::ProposalApproved => self.proposal_approved_at,
            Milestone::SrsApproved => self.srs_approved_at,
            Milestone::InternalDone => self.internal_completed_at,
            Milestone::ExternalDone => self.external_completed_at,
            Milestone::Completed => self.completed_at,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SupervisorId",
        to = "super::user::Column::Id"
    )]
    Supervisor,

    #[sea_orm(has_many = "super::fyp_document::Entity")]
    Documents,

    #[sea_orm(has_many = "super::plagiarism_report::Entity")]
    PlagiarismReports,

    #[sea_orm(has_many = "super::evaluation::Entity")]
    Evaluations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::fyp_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::evaluation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn fyp(stage: &str) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            title: "Smart Attendance System".to_string(),
            description: None,
            stage: stage.to_string(),
            student_id: Uuid::new_v4(),
            supervisor_id: None,
            idea_approved_at: None,
            proposal_approved_at: None,
            srs_approved_at: None,
            internal_completed_at: None,
            external_completed_at: None,
            completed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_stage_accessor() {
        assert_eq!(fyp("PROPOSAL_PENDING").fyp_stage(), FypStage::ProposalPending);
        assert!(fyp("COMPLETED").is_terminal());
        assert!(!fyp("EXTERNAL_DONE").is_terminal());
    }

    #[test]
    fn test_milestone_at_reflects_stamps() {
        let mut row = fyp("IDEA_APPROVED");
        assert!(row.milestone_at(Milestone::IdeaApproved).is_none());

        let stamped = Utc::now().into();
        row.idea_approved_at = Some(stamped);
        // An already-stamped milestone reads back and must not be reset
        assert_eq!(row.milestone_at(Milestone::IdeaApproved), Some(stamped));
        assert!(row.milestone_at(Milestone::Completed).is_none());
    }
}
