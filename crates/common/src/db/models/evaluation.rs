//! Evaluation entity
//!
//! One row per (FYP, evaluator, type); resubmission updates in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluation round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    Internal,
    External,
}

impl EvaluationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationType::Internal => "INTERNAL",
            EvaluationType::External => "EXTERNAL",
        }
    }
}

impl From<String> for EvaluationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "EXTERNAL" => EvaluationType::External,
            _ => EvaluationType::Internal,
        }
    }
}

impl From<EvaluationType> for String {
    fn from(eval_type: EvaluationType) -> Self {
        eval_type.as_str().to_string()
    }
}

impl fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub fyp_id: Uuid,

    pub evaluator_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub eval_type: String,

    pub marks: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,

    pub evaluated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the evaluation type as an enum
    pub fn evaluation_type(&self) -> EvaluationType {
        EvaluationType::from(self.eval_type.clone())
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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EvaluatorId",
        to = "super::user::Column::Id"
    )]
    Evaluator,
}

impl Related<super::fyp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fyp.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
