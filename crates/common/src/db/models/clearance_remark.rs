//! Clearance remark entity, append-only

use crate::workflow::ClearanceDepartment;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clearance_remarks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub clearance_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub department: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub officer_id: Uuid,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the department as an enum
    pub fn clearance_department(&self) -> ClearanceDepartment {
        ClearanceDepartment::from(self.department.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clearance::Entity",
        from = "Column::ClearanceId",
        to = "super::clearance::Column::Id"
    )]
    Clearance,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OfficerId",
        to = "super::user::Column::Id"
    )]
    Officer,
}

impl Related<super::clearance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clearance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
