//! Plagiarism report entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plagiarism_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub fyp_id: Uuid,

    /// Similarity percentage, gated against the threshold at the boundary
    pub similarity: f64,

    #[sea_orm(column_type = "Text")]
    pub report_url: String,

    pub uploaded_by_id: Uuid,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fyp::Entity",
        from = "Column::FypId",
        to = "super::fyp::Column::Id"
    )]
    Fyp,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploadedById",
        to = "super::user::Column::Id"
    )]
    UploadedBy,
}

impl Related<super::fyp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fyp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
