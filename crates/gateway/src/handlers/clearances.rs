//! Degree clearance handlers

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
        models::{ClearanceRemark, DegreeClearance},
        Repository,
    },
    errors::{AppError, Result},
    workflow::{ClearanceDepartment, ClearanceStatus, Role},
};

/// Request to approve one department track
#[derive(Debug, Deserialize)]
pub struct ApproveDepartmentRequest {
    pub department: ClearanceDepartment,
    pub message: Option<String>,
}

/// Request to reject one department track; a message is mandatory
#[derive(Debug, Deserialize, Validate)]
pub struct RejectDepartmentRequest {
    pub department: ClearanceDepartment,

    #[validate(length(min = 1, message = "Rejection message is required"))]
    pub message: String,
}

/// Query parameters for clearance listing
#[derive(Debug, Deserialize)]
pub struct ListClearancesQuery {
    pub status: Option<ClearanceStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Clearance with its remark trail
#[derive(Serialize)]
pub struct ClearanceDetailResponse {
    #[serde(flatten)]
    pub clearance: DegreeClearance,
    pub remarks: Vec<ClearanceRemark>,
}

/// Roles allowed to browse clearances
const OFFICER_ROLES: &[Role] = &[
    Role::Admin,
    Role::Hod,
    Role::Dean,
    Role::StudentAffairs,
    Role::Accounts,
];

/// Initiate the one-per-student clearance (student only)
pub async fn initiate(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<(StatusCode, Json<ApiResponse<DegreeClearance>>)> {
    auth.require_role(Role::Student, "Only students can initiate clearance")?;

    let repo = Repository::new(state.db.clone());
    let clearance = repo.initiate_clearance(auth.user_id).await?;

    tracing::info!(
        clearance_id = %clearance.id,
        student_id = %auth.user_id,
        "Clearance initiated"
    );

    Ok(ApiResponse::created(clearance, "Clearance initiated successfully"))
}

/// Get the acting student's clearance with remarks
pub async fn my_clearance(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<ClearanceDetailResponse>>> {
    auth.require_role(Role::Student, "Only students can view their clearance")?;

    let repo = Repository::new(state.db.clone());

    let clearance = repo
        .find_clearance_by_student(auth.user_id)
        .await?
        .ok_or_else(|| AppError::ClearanceNotFound {
            id: auth.user_id.to_string(),
        })?;

    let remarks = repo.find_remarks_by_clearance(clearance.id).await?;

    Ok(ApiResponse::ok(
        ClearanceDetailResponse { clearance, remarks },
        "Clearance retrieved successfully",
    ))
}

/// Get one clearance with remarks
pub async fn get_clearance(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(clearance_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClearanceDetailResponse>>> {
    let repo = Repository::new(state.db.clone());

    let clearance = repo
        .find_clearance_by_id(clearance_id)
        .await?
        .ok_or_else(|| AppError::ClearanceNotFound {
            id: clearance_id.to_string(),
        })?;

    let remarks = repo.find_remarks_by_clearance(clearance_id).await?;

    Ok(ApiResponse::ok(
        ClearanceDetailResponse { clearance, remarks },
        "Clearance retrieved successfully",
    ))
}

/// List clearances (officer roles)
pub async fn list_clearances(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListClearancesQuery>,
) -> Result<Json<ApiResponse<Paginated<DegreeClearance>>>> {
    auth.require_any_role(OFFICER_ROLES, "Only clearance officers can list clearances")?;

    let (page, limit, offset) = PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let repo = Repository::new(state.db.clone());
    let (clearances, total) = repo.list_clearances(query.status, offset, limit).await?;

    Ok(ApiResponse::ok(
        Paginated::new(clearances, page, limit, total),
        "Clearances retrieved successfully",
    ))
}

/// Approve the acting officer's department track
pub async fn approve_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(clearance_id): Path<Uuid>,
    Json(request): Json<ApproveDepartmentRequest>,
) -> Result<Json<ApiResponse<DegreeClearance>>> {
    // The role <-> department binding is fixed
    let allowed = ClearanceDepartment::for_role(auth.role);
    if allowed != Some(request.department) {
        return Err(AppError::Forbidden {
            message: "You do not have permission to approve this department".to_string(),
        });
    }

    let repo = Repository::new(state.db.clone());
    let clearance = repo
        .approve_clearance_department(clearance_id, request.department, auth.user_id, request.message)
        .await?;

    Ok(ApiResponse::ok(clearance, "Department approved successfully"))
}

/// Reject the acting officer's department track
pub async fn reject_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(clearance_id): Path<Uuid>,
    Json(request): Json<RejectDepartmentRequest>,
) -> Result<Json<ApiResponse<DegreeClearance>>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("message".to_string()),
    })?;

    let allowed = ClearanceDepartment::for_role(auth.role);
    if allowed != Some(request.department) {
        return Err(AppError::Forbidden {
            message: "You do not have permission to reject this department".to_string(),
        });
    }

    let repo = Repository::new(state.db.clone());
    let clearance = repo
        .reject_clearance_department(clearance_id, request.department, auth.user_id, request.message)
        .await?;

    Ok(ApiResponse::ok(clearance, "Department rejected"))
}
