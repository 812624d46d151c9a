//! Versioned FYP document entity

use crate::workflow::DocumentType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fyp_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub fyp_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub doc_type: String,

    #[sea_orm(column_type = "Text")]
    pub file_url: String,

    /// Versions of one (FYP, type) pair coexist; none is overwritten
    pub version: i32,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the document type as an enum
    pub fn document_type(&self) -> DocumentType {
        DocumentType::from(self.doc_type.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fyp::Entity",
        from = "Column::FypId",
        to = "super::fyp::Column::Id"
    )]
    Fyp,
}

impl Related<super::fyp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fyp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
