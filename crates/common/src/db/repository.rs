//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling. Multi-step effects (stage update plus
//! notifications, sub-status update plus overall recompute) run as separate
//! statements with no wrapping transaction; a notification failure after a
//! committed primary mutation is logged and swallowed.

use crate::clock::{Clock, SystemClock};
use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::workflow::{
    ClearanceDepartment, ClearanceStatus, DocumentType, FypStage, Milestone, Role,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// Filters for FYP listings
#[derive(Debug, Default, Clone)]
pub struct FypFilter {
    pub stage: Option<FypStage>,
    pub student_id: Option<Uuid>,
    pub supervisor_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Repository for data access operations
// Derive omitted under `mock` because `DbPool` is not `Clone` there (see db/mod.rs).
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct Repository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Create a repository with an explicit clock (used by tests)
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user
    pub async fn create_user(
        &self,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        student_number: Option<String>,
        department: Option<String>,
        role: Role,
    ) -> Result<User> {
        if self.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict {
                message: format!("A user with email {} already exists", email),
            });
        }

        let now = self.clock.now();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password: Set(password_hash),
            first_name: Set(first_name),
            last_name: Set(last_name),
            student_number: Set(student_number),
            department: Set(department),
            role: Set(String::from(role)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        user.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List users with optional role filter and search, paginated
    pub async fn list_users(
        &self,
        role: Option<Role>,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64)> {
        let mut query = UserEntity::find();

        if let Some(role) = role {
            query = query.filter(UserColumn::Role.eq(role.as_str()));
        }

        if let Some(search) = search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(UserColumn::FirstName))).like(pattern.as_str()))
                    .add(Expr::expr(Func::lower(Expr::col(UserColumn::LastName))).like(pattern.as_str()))
                    .add(Expr::expr(Func::lower(Expr::col(UserColumn::Email))).like(pattern.as_str())),
            );
        }

        let paginator = query
            .order_by_desc(UserColumn::CreatedAt)
            .paginate(self.read_conn(), limit);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(offset / limit).await?;

        Ok((users, total))
    }

    /// List all users with a given role
    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>> {
        UserEntity::find()
            .filter(UserColumn::Role.eq(role.as_str()))
            .order_by_desc(UserColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count users, optionally restricted to one role
    pub async fn count_users(&self, role: Option<Role>) -> Result<u64> {
        let mut query = UserEntity::find();
        if let Some(role) = role {
            query = query.filter(UserColumn::Role.eq(role.as_str()));
        }
        query.count(self.read_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // FYP Operations
    // ========================================================================

    /// Check for an existing FYP title, case-insensitive exact match
    pub async fn fyp_title_exists(&self, title: &str) -> Result<bool> {
        let existing = FypEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(FypColumn::Title))).eq(title.to_lowercase()))
            .one(self.read_conn())
            .await?;
        Ok(existing.is_some())
    }

    /// Create a new FYP in the initial stage
    ///
    /// One idea per title, campus-wide: fails with Conflict when a
    /// case-insensitive match for the title already exists.
    pub async fn create_fyp(
        &self,
        student_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Result<Fyp> {
        if self.fyp_title_exists(&title).await? {
            return Err(AppError::Conflict {
                message: "An FYP with this title already exists".to_string(),
            });
        }

        let now = self.clock.now();

        let fyp = FypActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            stage: Set(String::from(FypStage::IdeaPending)),
            student_id: Set(student_id),
            supervisor_id: Set(None),
            idea_approved_at: Set(None),
            proposal_approved_at: Set(None),
            srs_approved_at: Set(None),
            internal_completed_at: Set(None),
            external_completed_at: Set(None),
            completed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        fyp.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find FYP by ID
    pub async fn find_fyp_by_id(&self, id: Uuid) -> Result<Option<Fyp>> {
        FypEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List FYPs with filters, paginated
    pub async fn list_fyps(
        &self,
        filter: FypFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Fyp>, u64)> {
        let mut query = FypEntity::find();

        if let Some(stage) = filter.stage {
            query = query.filter(FypColumn::Stage.eq(stage.as_str()));
        }

        if let Some(student_id) = filter.student_id {
            query = query.filter(FypColumn::StudentId.eq(student_id));
        }

        if let Some(supervisor_id) = filter.supervisor_id {
            query = query.filter(FypColumn::SupervisorId.eq(supervisor_id));
        }

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(FypColumn::Title))).like(pattern.as_str()))
                    .add(Expr::expr(Func::lower(Expr::col(FypColumn::Description))).like(pattern.as_str())),
            );
        }

        let paginator = query
            .order_by_desc(FypColumn::CreatedAt)
            .paginate(self.read_conn(), limit);

        let total = paginator.num_items().await?;
        let fyps = paginator.fetch_page(offset / limit).await?;

        Ok((fyps, total))
    }

    /// Find all FYPs owned by a student
    pub async fn find_fyps_by_student(&self, student_id: Uuid) -> Result<Vec<Fyp>> {
        FypEntity::find()
            .filter(FypColumn::StudentId.eq(student_id))
            .order_by_desc(FypColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find all FYPs assigned to a supervisor
    pub async fn find_fyps_by_supervisor(&self, supervisor_id: Uuid) -> Result<Vec<Fyp>> {
        FypEntity::find()
            .filter(FypColumn::SupervisorId.eq(supervisor_id))
            .order_by_desc(FypColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Set the supervisor and move the FYP to SUPERVISOR_ASSIGNED
    pub async fn assign_supervisor(&self, fyp_id: Uuid, supervisor_id: Uuid) -> Result<Fyp> {
        let fyp = self
            .find_fyp_by_id(fyp_id)
            .await?
            .ok_or_else(|| AppError::FypNotFound { id: fyp_id.to_string() })?;

        let now = self.clock.now();

        let mut active: FypActiveModel = fyp.into();
        active.supervisor_id = Set(Some(supervisor_id));
        active.stage = Set(String::from(FypStage::SupervisorAssigned));
        active.updated_at = Set(now.into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Apply a validated stage transition
    ///
    /// Checks the transition table, stamps the milestone timestamp on first
    /// entry, and notifies the student (and supervisor, if assigned). The
    /// notification writes are not transactional with the stage update.
    pub async fn transition_fyp_stage(
        &self,
        fyp_id: Uuid,
        target: FypStage,
        actor_id: Uuid,
    ) -> Result<Fyp> {
        let fyp = self
            .find_fyp_by_id(fyp_id)
            .await?
            .ok_or_else(|| AppError::FypNotFound { id: fyp_id.to_string() })?;

        let current = fyp.fyp_stage();
        if !current.can_transition_to(target) {
            metrics::record_stage_transition(current.as_str(), target.as_str(), false);
            return Err(AppError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        let now = self.clock.now();

        let mut active: FypActiveModel = fyp.clone().into();
        active.stage = Set(String::from(target));
        if let Some(milestone) = target.milestone() {
            // Stamped on first entry only, never overwritten
            if fyp.milestone_at(milestone).is_none() {
                set_milestone(&mut active, milestone, now.into());
            }
        }
        active.updated_at = Set(now.into());

        let updated = active.update(self.write_conn()).await?;

        metrics::record_stage_transition(current.as_str(), target.as_str(), true);
        tracing::info!(
            fyp_id = %fyp_id,
            actor_id = %actor_id,
            from = %current,
            to = %target,
            "FYP stage updated"
        );

        self.notify(
            fyp.student_id,
            "FYP Stage Updated",
            &format!(
                "Your FYP \"{}\" has moved from {} to {}",
                fyp.title, current, target
            ),
            Some(fyp_id),
        )
        .await;

        if let Some(supervisor_id) = fyp.supervisor_id {
            self.notify(
                supervisor_id,
                "FYP Stage Updated",
                &format!("FYP \"{}\" has moved from {} to {}", fyp.title, current, target),
                Some(fyp_id),
            )
            .await;
        }

        Ok(updated)
    }

    /// Count all FYPs
    pub async fn count_fyps(&self) -> Result<u64> {
        FypEntity::find()
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Per-stage FYP counts
    pub async fn fyp_stage_distribution(&self) -> Result<Vec<(FypStage, u64)>> {
        let mut distribution = Vec::with_capacity(FypStage::ALL.len());
        for &stage in FypStage::ALL {
            let count = FypEntity::find()
                .filter(FypColumn::Stage.eq(stage.as_str()))
                .count(self.read_conn())
                .await?;
            distribution.push((stage, count));
        }
        Ok(distribution)
    }

    // ========================================================================
    // Document Operations
    // ========================================================================

    /// Latest stored version for a (FYP, type) pair
    pub async fn latest_document_version(
        &self,
        fyp_id: Uuid,
        doc_type: DocumentType,
    ) -> Result<Option<i32>> {
        let latest = FypDocumentEntity::find()
            .filter(FypDocumentColumn::FypId.eq(fyp_id))
            .filter(FypDocumentColumn::DocType.eq(doc_type.as_str()))
            .order_by_desc(FypDocumentColumn::Version)
            .one(self.read_conn())
            .await?;
        Ok(latest.map(|doc| doc.version))
    }

    /// Create a new document version
    pub async fn create_document(
        &self,
        fyp_id: Uuid,
        doc_type: DocumentType,
        file_url: String,
        version: i32,
    ) -> Result<FypDocument> {
        let now = self.clock.now();

        let document = FypDocumentActiveModel {
            id: Set(Uuid::new_v4()),
            fyp_id: Set(fyp_id),
            doc_type: Set(String::from(doc_type)),
            file_url: Set(file_url),
            version: Set(version),
            created_at: Set(now.into()),
        };

        document.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// All documents attached to an FYP
    pub async fn find_documents_by_fyp(&self, fyp_id: Uuid) -> Result<Vec<FypDocument>> {
        FypDocumentEntity::find()
            .filter(FypDocumentColumn::FypId.eq(fyp_id))
            .order_by_desc(FypDocumentColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Plagiarism Report Operations
    // ========================================================================

    /// Persist a plagiarism report (threshold gating happens at the boundary)
    pub async fn create_plagiarism_report(
        &self,
        fyp_id: Uuid,
        similarity: f64,
        report_url: String,
        uploaded_by_id: Uuid,
    ) -> Result<PlagiarismReport> {
        let now = self.clock.now();

        let report = PlagiarismReportActiveModel {
            id: Set(Uuid::new_v4()),
            fyp_id: Set(fyp_id),
            similarity: Set(similarity),
            report_url: Set(report_url),
            uploaded_by_id: Set(uploaded_by_id),
            created_at: Set(now.into()),
        };

        report.insert(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Evaluation Operations
    // ========================================================================

    /// Create or update the evaluation for a (FYP, evaluator, type) triple
    ///
    /// Resubmission updates marks, feedback, and timestamp in place rather
    /// than creating a duplicate row.
    pub async fn upsert_evaluation(
        &self,
        fyp_id: Uuid,
        evaluator_id: Uuid,
        eval_type: EvaluationType,
        marks: i32,
        feedback: Option<String>,
    ) -> Result<Evaluation> {
        let existing = EvaluationEntity::find()
            .filter(EvaluationColumn::FypId.eq(fyp_id))
            .filter(EvaluationColumn::EvaluatorId.eq(evaluator_id))
            .filter(EvaluationColumn::EvalType.eq(eval_type.as_str()))
            .one(self.write_conn())
            .await?;

        let now = self.clock.now();

        match existing {
            Some(evaluation) => {
                let mut active: EvaluationActiveModel = evaluation.into();
                active.marks = Set(marks);
                active.feedback = Set(feedback);
                active.evaluated_at = Set(now.into());
                active.update(self.write_conn()).await.map_err(Into::into)
            }
            None => {
                let evaluation = EvaluationActiveModel {
                    id: Set(Uuid::new_v4()),
                    fyp_id: Set(fyp_id),
                    evaluator_id: Set(evaluator_id),
                    eval_type: Set(String::from(eval_type)),
                    marks: Set(marks),
                    feedback: Set(feedback),
                    evaluated_at: Set(now.into()),
                };
                evaluation.insert(self.write_conn()).await.map_err(Into::into)
            }
        }
    }

    /// All evaluations for an FYP
    pub async fn find_evaluations_by_fyp(&self, fyp_id: Uuid) -> Result<Vec<Evaluation>> {
        EvaluationEntity::find()
            .filter(EvaluationColumn::FypId.eq(fyp_id))
            .order_by_desc(EvaluationColumn::EvaluatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All evaluations submitted by an evaluator
    pub async fn find_evaluations_by_evaluator(&self, evaluator_id: Uuid) -> Result<Vec<Evaluation>> {
        EvaluationEntity::find()
            .filter(EvaluationColumn::EvaluatorId.eq(evaluator_id))
            .order_by_desc(EvaluationColumn::EvaluatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Clearance Operations
    // ========================================================================

    /// Create the one-per-student clearance row with every status PENDING
    pub async fn initiate_clearance(&self, student_id: Uuid) -> Result<DegreeClearance> {
        if self.find_clearance_by_student(student_id).await?.is_some() {
            return Err(AppError::Conflict {
                message: "Clearance already initiated".to_string(),
            });
        }

        let now = self.clock.now();

        let clearance = ClearanceActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            status: Set(String::from(ClearanceStatus::Pending)),
            department_status: Set(String::from(ClearanceStatus::Pending)),
            academic_status: Set(String::from(ClearanceStatus::Pending)),
            affairs_status: Set(String::from(ClearanceStatus::Pending)),
            accounts_status: Set(String::from(ClearanceStatus::Pending)),
            completed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = clearance.insert(self.write_conn()).await?;

        self.notify(
            student_id,
            "Degree Clearance Initiated",
            "Your degree clearance request has been initiated. Please wait for approvals.",
            None,
        )
        .await;

        Ok(created)
    }

    /// Find clearance by ID
    pub async fn find_clearance_by_id(&self, id: Uuid) -> Result<Option<DegreeClearance>> {
        ClearanceEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find the clearance for a student
    pub async fn find_clearance_by_student(&self, student_id: Uuid) -> Result<Option<DegreeClearance>> {
        ClearanceEntity::find()
            .filter(ClearanceColumn::StudentId.eq(student_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List clearances with optional overall-status filter, paginated
    pub async fn list_clearances(
        &self,
        status: Option<ClearanceStatus>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<DegreeClearance>, u64)> {
        let mut query = ClearanceEntity::find();

        if let Some(status) = status {
            query = query.filter(ClearanceColumn::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(ClearanceColumn::CreatedAt)
            .paginate(self.read_conn(), limit);

        let total = paginator.num_items().await?;
        let clearances = paginator.fetch_page(offset / limit).await?;

        Ok((clearances, total))
    }

    /// Approve one department track and recompute the overall status
    ///
    /// Sub-status write, remark, overall recompute, and notifications are
    /// separate statements; concurrent approvals on different tracks can
    /// interleave (last-write-wins on the recompute).
    pub async fn approve_clearance_department(
        &self,
        clearance_id: Uuid,
        department: ClearanceDepartment,
        officer_id: Uuid,
        message: Option<String>,
    ) -> Result<DegreeClearance> {
        let clearance = self
            .find_clearance_by_id(clearance_id)
            .await?
            .ok_or_else(|| AppError::ClearanceNotFound { id: clearance_id.to_string() })?;

        let now = self.clock.now();

        let mut active: ClearanceActiveModel = clearance.clone().into();
        set_sub_status(&mut active, department, ClearanceStatus::Approved);
        active.updated_at = Set(now.into());
        let updated = active.update(self.write_conn()).await?;

        if let Some(ref message) = message {
            self.create_remark(clearance_id, department, officer_id, message).await?;
        }

        // Overall is derived, never caller-set
        let overall = updated.recomputed_overall();
        let newly_approved =
            overall == ClearanceStatus::Approved && clearance.overall_state() != ClearanceStatus::Approved;

        let mut active: ClearanceActiveModel = updated.into();
        active.status = Set(String::from(overall));
        if newly_approved {
            active.completed_at = Set(Some(now.into()));
        }
        active.updated_at = Set(now.into());
        let finalized = active.update(self.write_conn()).await?;

        metrics::record_clearance_decision(department.as_str(), "approve");
        tracing::info!(
            clearance_id = %clearance_id,
            officer_id = %officer_id,
            department = %department,
            overall = %overall,
            "Clearance department approved"
        );

        self.notify(
            clearance.student_id,
            "Clearance Department Approved",
            &format!("{} has approved your clearance request.", department),
            None,
        )
        .await;

        if newly_approved {
            self.notify(
                clearance.student_id,
                "Degree Clearance Approved",
                "Congratulations! Your degree clearance has been fully approved.",
                None,
            )
            .await;
        }

        Ok(finalized)
    }

    /// Reject one department track
    ///
    /// A single rejection forces the overall status to REJECTED regardless of
    /// the other tracks; there is no transition out of REJECTED.
    pub async fn reject_clearance_department(
        &self,
        clearance_id: Uuid,
        department: ClearanceDepartment,
        officer_id: Uuid,
        message: String,
    ) -> Result<DegreeClearance> {
        let clearance = self
            .find_clearance_by_id(clearance_id)
            .await?
            .ok_or_else(|| AppError::ClearanceNotFound { id: clearance_id.to_string() })?;

        let now = self.clock.now();

        let mut active: ClearanceActiveModel = clearance.clone().into();
        set_sub_status(&mut active, department, ClearanceStatus::Rejected);
        active.status = Set(String::from(ClearanceStatus::Rejected));
        active.updated_at = Set(now.into());
        let updated = active.update(self.write_conn()).await?;

        self.create_remark(clearance_id, department, officer_id, &message).await?;

        metrics::record_clearance_decision(department.as_str(), "reject");
        tracing::info!(
            clearance_id = %clearance_id,
            officer_id = %officer_id,
            department = %department,
            "Clearance department rejected"
        );

        self.notify(
            clearance.student_id,
            "Clearance Department Rejected",
            &format!("{} has rejected your clearance request: {}", department, message),
            None,
        )
        .await;

        Ok(updated)
    }

    /// Append a remark to a clearance
    async fn create_remark(
        &self,
        clearance_id: Uuid,
        department: ClearanceDepartment,
        officer_id: Uuid,
        message: &str,
    ) -> Result<ClearanceRemark> {
        let now = self.clock.now();

        let remark = ClearanceRemarkActiveModel {
            id: Set(Uuid::new_v4()),
            clearance_id: Set(clearance_id),
            department: Set(String::from(department)),
            message: Set(message.to_string()),
            officer_id: Set(officer_id),
            created_at: Set(now.into()),
        };

        remark.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// All remarks on a clearance, newest first
    pub async fn find_remarks_by_clearance(&self, clearance_id: Uuid) -> Result<Vec<ClearanceRemark>> {
        ClearanceRemarkEntity::find()
            .filter(ClearanceRemarkColumn::ClearanceId.eq(clearance_id))
            .order_by_desc(ClearanceRemarkColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count all clearances
    pub async fn count_clearances(&self) -> Result<u64> {
        ClearanceEntity::find()
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Per-overall-status clearance counts
    pub async fn clearance_status_distribution(&self) -> Result<Vec<(ClearanceStatus, u64)>> {
        let mut distribution = Vec::with_capacity(ClearanceStatus::ALL.len());
        for &status in ClearanceStatus::ALL {
            let count = ClearanceEntity::find()
                .filter(ClearanceColumn::Status.eq(status.as_str()))
                .count(self.read_conn())
                .await?;
            distribution.push((status, count));
        }
        Ok(distribution)
    }

    // ========================================================================
    // Notification Operations
    // ========================================================================

    /// Create a notification
    pub async fn create_notification(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        fyp_id: Option<Uuid>,
    ) -> Result<Notification> {
        let now = self.clock.now();

        let notification = NotificationActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            fyp_id: Set(fyp_id),
            read: Set(false),
            created_at: Set(now.into()),
        };

        let created = notification.insert(self.write_conn()).await?;
        metrics::record_notification();
        Ok(created)
    }

    /// Create a notification as a side effect of a committed mutation.
    ///
    /// A failure here leaves the primary mutation in place; the miss is
    /// logged and not compensated.
    async fn notify(&self, user_id: Uuid, title: &str, message: &str, fyp_id: Option<Uuid>) {
        if let Err(e) = self.create_notification(user_id, title, message, fyp_id).await {
            tracing::warn!(
                user_id = %user_id,
                title = %title,
                error = %e,
                "Failed to write notification"
            );
        }
    }

    /// Notifications for a user, newest first
    pub async fn find_notifications_by_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut query = NotificationEntity::find().filter(NotificationColumn::UserId.eq(user_id));

        if unread_only {
            query = query.filter(NotificationColumn::Read.eq(false));
        }

        query
            .order_by_desc(NotificationColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count unread notifications for a user
    pub async fn unread_notification_count(&self, user_id: Uuid) -> Result<u64> {
        NotificationEntity::find()
            .filter(NotificationColumn::UserId.eq(user_id))
            .filter(NotificationColumn::Read.eq(false))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Mark one notification read; only the owner may flip the flag
    pub async fn mark_notification_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<Notification> {
        let notification = NotificationEntity::find_by_id(notification_id)
            .one(self.write_conn())
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| AppError::NotificationNotFound {
                id: notification_id.to_string(),
            })?;

        let mut active: NotificationActiveModel = notification.into();
        active.read = Set(true);
        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Mark every unread notification for a user as read
    pub async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        let result = NotificationEntity::update_many()
            .col_expr(NotificationColumn::Read, Expr::value(true))
            .filter(NotificationColumn::UserId.eq(user_id))
            .filter(NotificationColumn::Read.eq(false))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected)
    }
}

/// Stamp one milestone timestamp on the active model
fn set_milestone(
    active: &mut FypActiveModel,
    milestone: Milestone,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) {
    match milestone {
        Milestone::IdeaApproved => active.idea_approved_at = Set(Some(at)),
        Milestone::ProposalApproved => active.proposal_approved_at = Set(Some(at)),
        Milestone::SrsApproved => active.srs_approved_at = Set(Some(at)),
        Milestone::InternalDone => active.internal_completed_at = Set(Some(at)),
        Milestone::ExternalDone => active.external_completed_at = Set(Some(at)),
        Milestone::Completed => active.completed_at = Set(Some(at)),
    }
}

/// Set one department's sub-status on the active model
fn set_sub_status(
    active: &mut ClearanceActiveModel,
    department: ClearanceDepartment,
    status: ClearanceStatus,
) {
    let value = Set(String::from(status));
    match department {
        ClearanceDepartment::Department => active.department_status = value,
        ClearanceDepartment::Academic => active.academic_status = value,
        ClearanceDepartment::StudentAffairs => active.affairs_status = value,
        ClearanceDepartment::Accounts => active.accounts_status = value,
    }
}

// These tests drive the repository against sea-orm's mock connection, which is only
// available under the `mock` feature. Run with: cargo test -p acadflow-common --features mock
#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn repo(conn: DatabaseConnection) -> Repository {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap());
        Repository::with_clock(
            DbPool {
                primary: conn,
                replica: None,
            },
            Arc::new(clock),
        )
    }

    fn fyp_row(stage: &str) -> Fyp {
        let now = Utc::now();
        Fyp {
            id: Uuid::new_v4(),
            title: "Campus Energy Monitor".to_string(),
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

    fn clearance_row(student_id: Uuid) -> DegreeClearance {
        let now = Utc::now();
        DegreeClearance {
            id: Uuid::new_v4(),
            student_id,
            status: "PENDING".to_string(),
            department_status: "PENDING".to_string(),
            academic_status: "PENDING".to_string(),
            affairs_status: "PENDING".to_string(),
            accounts_status: "PENDING".to_string(),
            completed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_transition_rejects_unlisted_pair() {
        let fyp = fyp_row("IDEA_PENDING");
        let fyp_id = fyp.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![fyp]])
            .into_connection();

        let err = repo(db)
            .transition_fyp_stage(fyp_id, FypStage::Completed, Uuid::new_v4())
            .await
            .unwrap_err();

        // Rejected before any write is issued
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_transition_rejects_terminal_stage() {
        let fyp = fyp_row("SRS_REJECTED");
        let fyp_id = fyp.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![fyp]])
            .into_connection();

        let err = repo(db)
            .transition_fyp_stage(fyp_id, FypStage::SrsPending, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_transition_unknown_fyp() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Fyp>::new()])
            .into_connection();

        let err = repo(db)
            .transition_fyp_stage(Uuid::new_v4(), FypStage::IdeaApproved, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FypNotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_fyp_duplicate_title_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![fyp_row("IDEA_PENDING")]])
            .into_connection();

        let err = repo(db)
            .create_fyp(Uuid::new_v4(), "campus energy monitor".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_initiate_clearance_twice_conflicts() {
        let student_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![clearance_row(student_id)]])
            .into_connection();

        let err = repo(db).initiate_clearance(student_id).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_approve_unknown_clearance() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<DegreeClearance>::new()])
            .into_connection();

        let err = repo(db)
            .approve_clearance_department(
                Uuid::new_v4(),
                ClearanceDepartment::Accounts,
                Uuid::new_v4(),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ClearanceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_mark_notification_read_checks_owner() {
        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "FYP Stage Updated".to_string(),
            message: "Your FYP has moved".to_string(),
            fyp_id: None,
            read: false,
            created_at: now.into(),
        };
        let notification_id = notification.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![notification]])
            .into_connection();

        // A different user cannot flip the read flag
        let err = repo(db)
            .mark_notification_read(notification_id, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotificationNotFound { .. }));
    }
}
