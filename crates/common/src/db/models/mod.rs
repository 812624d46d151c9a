//! SeaORM entity models
//!
//! Database entities for AcadFlow

mod clearance;
mod clearance_remark;
mod evaluation;
mod fyp;
mod fyp_document;
mod notification;
mod plagiarism_report;
mod user;

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
};

pub use fyp::{
    Entity as FypEntity,
    Model as Fyp,
    ActiveModel as FypActiveModel,
    Column as FypColumn,
};

pub use fyp_document::{
    Entity as FypDocumentEntity,
    Model as FypDocument,
    ActiveModel as FypDocumentActiveModel,
    Column as FypDocumentColumn,
};

pub use plagiarism_report::{
    Entity as PlagiarismReportEntity,
    Model as PlagiarismReport,
    ActiveModel as PlagiarismReportActiveModel,
    Column as PlagiarismReportColumn,
};

pub use evaluation::{
    Entity as EvaluationEntity,
    Model as Evaluation,
    ActiveModel as EvaluationActiveModel,
    Column as EvaluationColumn,
    EvaluationType,
};

pub use clearance::{
    Entity as ClearanceEntity,
    Model as DegreeClearance,
    ActiveModel as ClearanceActiveModel,
    Column as ClearanceColumn,
};

pub use clearance_remark::{
    Entity as ClearanceRemarkEntity,
    Model as ClearanceRemark,
    ActiveModel as ClearanceRemarkActiveModel,
    Column as ClearanceRemarkColumn,
};

pub use notification::{
    Entity as NotificationEntity,
    Model as Notification,
    ActiveModel as NotificationActiveModel,
    Column as NotificationColumn,
};
