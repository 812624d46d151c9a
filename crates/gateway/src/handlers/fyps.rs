//! FYP management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::AuthContext;
use crate::response::{ApiResponse, Paginated, PaginationParams};
use crate::AppState;
use acadflow_common::{
    db::{
        models::{Fyp, FypDocument, PlagiarismReport},
        FypFilter, Repository,
    },
    errors::{AppError, Result},
    workflow::{advance_on_upload, next_document_version, DocumentType, FypStage, Role},
    PLAGIARISM_SIMILARITY_THRESHOLD,
};

/// Request to submit a new FYP idea
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitIdeaRequest {
    #[validate(length(min = 3, max = 300, message = "Title must be at least 3 characters"))]
    pub title: String,

    pub description: Option<String>,
}

/// Request to assign a supervisor
#[derive(Debug, Deserialize)]
pub struct AssignSupervisorRequest {
    pub supervisor_id: Uuid,
}

/// Request to upload a document version
#[derive(Debug, Deserialize, Validate)]
pub struct UploadDocumentRequest {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    #[validate(url(message = "Invalid file URL"))]
    pub file_url: String,

    /// Caller-supplied version; auto-incremented from the latest when absent
    pub version: Option<i32>,
}

/// Request to move the FYP to a target stage
#[derive(Debug, Deserialize)]
pub struct UpdateStageRequest {
    pub stage: FypStage,
}

/// Request to attach a plagiarism report
#[derive(Debug, Deserialize, Validate)]
pub struct UploadPlagiarismRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub similarity: f64,

    #[validate(url(message = "Invalid report URL"))]
    pub report_url: String,
}

/// Query parameters for FYP listing
#[derive(Debug, Deserialize)]
pub struct ListFypsQuery {
    pub stage: Option<FypStage>,
    pub student_id: Option<Uuid>,
    pub supervisor_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// FYP with its attached documents
#[derive(Serialize)]
pub struct FypDetailResponse {
    #[serde(flatten)]
    pub fyp: Fyp,
    pub documents: Vec<FypDocument>,
}

/// Submit a new FYP idea (student only)
pub async fn submit_idea(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<SubmitIdeaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Fyp>>)> {
    auth.require_role(Role::Student, "Only students can submit FYP ideas")?;

    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("title".to_string()),
    })?;

    let repo = Repository::new(state.db.clone());

    let fyp = repo
        .create_fyp(auth.user_id, request.title, request.description)
        .await?;

    tracing::info!(fyp_id = %fyp.id, student_id = %auth.user_id, "FYP idea submitted");

    Ok(ApiResponse::created(fyp, "FYP idea submitted successfully"))
}

/// List FYPs with filters
pub async fn list_fyps(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListFypsQuery>,
) -> Result<Json<ApiResponse<Paginated<Fyp>>>> {
    let (page, limit, offset) = PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let repo = Repository::new(state.db.clone());

    let filter = FypFilter {
        stage: query.stage,
        student_id: query.student_id,
        supervisor_id: query.supervisor_id,
        search: query.search,
    };

    let (fyps, total) = repo.list_fyps(filter, offset, limit).await?;

    Ok(ApiResponse::ok(
        Paginated::new(fyps, page, limit, total),
        "FYPs retrieved successfully",
    ))
}

/// List the FYPs the acting user owns or supervises
pub async fn my_fyps(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<Fyp>>>> {
    let repo = Repository::new(state.db.clone());

    let fyps = match auth.role {
        Role::Student => repo.find_fyps_by_student(auth.user_id).await?,
        Role::Supervisor => repo.find_fyps_by_supervisor(auth.user_id).await?,
        _ => {
            return Err(AppError::Forbidden {
                message: "Only students and supervisors can view their FYPs".to_string(),
            })
        }
    };

    Ok(ApiResponse::ok(fyps, "FYPs retrieved successfully"))
}

/// Get one FYP with its documents
pub async fn get_fyp(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(fyp_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FypDetailResponse>>> {
    let repo = Repository::new(state.db.clone());

    let fyp = repo
        .find_fyp_by_id(fyp_id)
        .await?
        .ok_or_else(|| AppError::FypNotFound { id: fyp_id.to_string() })?;

    let documents = repo.find_documents_by_fyp(fyp_id).await?;

    Ok(ApiResponse::ok(
        FypDetailResponse { fyp, documents },
        "FYP retrieved successfully",
    ))
}

/// Assign a supervisor to the acting student's FYP
pub async fn assign_supervisor(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(fyp_id): Path<Uuid>,
    Json(request): Json<AssignSupervisorRequest>,
) -> Result<Json<ApiResponse<Fyp>>> {
    auth.require_role(Role::Student, "Only students can select a supervisor")?;

    let repo = Repository::new(state.db.clone());

    let fyp = repo
        .find_fyp_by_id(fyp_id)
        .await?
        .ok_or_else(|| AppError::FypNotFound { id: fyp_id.to_string() })?;

    if fyp.student_id != auth.user_id {
        return Err(AppError::Forbidden {
            message: "You can only assign a supervisor to your own FYP".to_string(),
        });
    }

    if fyp.fyp_stage() != FypStage::SupervisorPending {
        return Err(AppError::Validation {
            message: "FYP must be in SUPERVISOR_PENDING stage".to_string(),
            field: None,
        });
    }

    let supervisor = repo
        .find_user_by_id(request.supervisor_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: request.supervisor_id.to_string(),
        })?;

    if supervisor.user_role() != Role::Supervisor {
        return Err(AppError::Validation {
            message: "Selected user is not a supervisor".to_string(),
            field: Some("supervisor_id".to_string()),
        });
    }

    let updated = repo.assign_supervisor(fyp_id, request.supervisor_id).await?;

    tracing::info!(
        fyp_id = %fyp_id,
        supervisor_id = %request.supervisor_id,
        "Supervisor assigned"
    );

    Ok(ApiResponse::ok(updated, "Supervisor assigned successfully"))
}

/// Upload a document version, advancing the stage where the upload table says so
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(fyp_id): Path<Uuid>,
    Json(request): Json<UploadDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FypDocument>>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    let fyp = repo
        .find_fyp_by_id(fyp_id)
        .await?
        .ok_or_else(|| AppError::FypNotFound { id: fyp_id.to_string() })?;

    if fyp.student_id != auth.user_id && fyp.supervisor_id != Some(auth.user_id) {
        return Err(AppError::Forbidden {
            message: "Unauthorized to upload documents for this FYP".to_string(),
        });
    }

    let latest = repo.latest_document_version(fyp_id, request.doc_type).await?;
    let version = request
        .version
        .unwrap_or_else(|| next_document_version(latest));

    let document = repo
        .create_document(fyp_id, request.doc_type, request.file_url, version)
        .await?;

    // Exactly the pairs in the upload table advance the stage; any other
    // combination leaves it untouched.
    if let Some(target) = advance_on_upload(fyp.fyp_stage(), request.doc_type) {
        repo.transition_fyp_stage(fyp_id, target, auth.user_id).await?;
    }

    tracing::info!(
        fyp_id = %fyp_id,
        doc_type = %request.doc_type,
        version = version,
        "Document uploaded"
    );

    Ok(ApiResponse::created(document, "Document uploaded successfully"))
}

/// Move the FYP to a target stage (supervisor or admin)
pub async fn update_stage(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(fyp_id): Path<Uuid>,
    Json(request): Json<UpdateStageRequest>,
) -> Result<Json<ApiResponse<Fyp>>> {
    auth.require_any_role(
        &[Role::Supervisor, Role::Admin],
        "Only supervisors and admins can update FYP stages",
    )?;

    let repo = Repository::new(state.db.clone());
    let updated = repo
        .transition_fyp_stage(fyp_id, request.stage, auth.user_id)
        .await?;

    Ok(ApiResponse::ok(updated, "FYP stage updated successfully"))
}

/// Attach a plagiarism report, rejecting similarity above the threshold
pub async fn upload_plagiarism_report(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(fyp_id): Path<Uuid>,
    Json(request): Json<UploadPlagiarismRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlagiarismReport>>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    repo.find_fyp_by_id(fyp_id)
        .await?
        .ok_or_else(|| AppError::FypNotFound { id: fyp_id.to_string() })?;

    if request.similarity > PLAGIARISM_SIMILARITY_THRESHOLD {
        return Err(AppError::Validation {
            message: format!(
                "Plagiarism similarity ({}%) exceeds threshold ({}%)",
                request.similarity, PLAGIARISM_SIMILARITY_THRESHOLD
            ),
            field: Some("similarity".to_string()),
        });
    }

    let report = repo
        .create_plagiarism_report(fyp_id, request.similarity, request.report_url, auth.user_id)
        .await?;

    tracing::info!(
        fyp_id = %fyp_id,
        similarity = request.similarity,
        "Plagiarism report uploaded"
    );

    Ok(ApiResponse::created(report, "Plagiarism report uploaded successfully"))
}
