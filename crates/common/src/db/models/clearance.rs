//! Degree clearance entity
//!
//! One row per student. The overall status is derived from the four
//! department sub-statuses and is never written directly by a caller.

use crate::workflow::{overall_status, ClearanceDepartment, ClearanceStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "degree_clearances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub student_id: Uuid,

    /// Derived overall status
    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "Text")]
    pub department_status: String,

    #[sea_orm(column_type = "Text")]
    pub academic_status: String,

    #[sea_orm(column_type = "Text")]
    pub affairs_status: String,

    #[sea_orm(column_type = "Text")]
    pub accounts_status: String,

    pub completed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the stored overall status as an enum
    pub fn overall_state(&self) -> ClearanceStatus {
        ClearanceStatus::from(self.status.clone())
    }

    /// Get one department's sub-status as an enum
    pub fn sub_status(&self, department: ClearanceDepartment) -> ClearanceStatus {
        let raw = match department {
            ClearanceDepartment::Department => &self.department_status,
            ClearanceDepartment::Academic => &self.academic_status,
            ClearanceDepartment::StudentAffairs => &self.affairs_status,
            ClearanceDepartment::Accounts => &self.accounts_status,
        };
        ClearanceStatus::from(raw.clone())
    }

    /// Re-derive the overall status from the stored sub-statuses
    pub fn recomputed_overall(&self) -> ClearanceStatus {
        overall_status(
            self.sub_status(ClearanceDepartment::Department),
            self.sub_status(ClearanceDepartment::Academic),
            self.sub_status(ClearanceDepartment::StudentAffairs),
            self.sub_status(ClearanceDepartment::Accounts),
        )
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

    #[sea_orm(has_many = "super::clearance_remark::Entity")]
    Remarks,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::clearance_remark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Remarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn clearance(dept: &str, academic: &str, affairs: &str, accounts: &str) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            status: "IN_REVIEW".to_string(),
            department_status: dept.to_string(),
            academic_status: academic.to_string(),
            affairs_status: affairs.to_string(),
            accounts_status: accounts.to_string(),
            completed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_recomputed_overall() {
        let row = clearance("APPROVED", "APPROVED", "IN_REVIEW", "PENDING");
        assert_eq!(row.recomputed_overall(), ClearanceStatus::InReview);

        let row = clearance("APPROVED", "APPROVED", "APPROVED", "APPROVED");
        assert_eq!(row.recomputed_overall(), ClearanceStatus::Approved);

        let row = clearance("APPROVED", "REJECTED", "APPROVED", "APPROVED");
        assert_eq!(row.recomputed_overall(), ClearanceStatus::Rejected);
    }

    #[test]
    fn test_sub_status_lookup() {
        let row = clearance("APPROVED", "PENDING", "IN_REVIEW", "REJECTED");
        assert_eq!(row.sub_status(ClearanceDepartment::Department), ClearanceStatus::Approved);
        assert_eq!(row.sub_status(ClearanceDepartment::Academic), ClearanceStatus::Pending);
        assert_eq!(row.sub_status(ClearanceDepartment::StudentAffairs), ClearanceStatus::InReview);
        assert_eq!(row.sub_status(ClearanceDepartment::Accounts), ClearanceStatus::Rejected);
    }
}
