//! User management handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::extract::AuthContext;
use crate::response::{ApiResponse, Paginated, PaginationParams};
use crate::AppState;
use acadflow_common::{
    auth::hash_password,
    db::{models::User, Repository},
    errors::{AppError, Result},
    workflow::Role,
};

/// Query parameters for user listing
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Request to create a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    pub student_number: Option<String>,

    pub department: Option<String>,

    pub role: Role,
}

/// List users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Paginated<User>>>> {
    auth.require_role(Role::Admin, "Only admins can list users")?;

    let (page, limit, offset) = PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let repo = Repository::new(state.db.clone());

    let (users, total) = repo
        .list_users(query.role, query.search.as_deref(), offset, limit)
        .await?;

    Ok(ApiResponse::ok(
        Paginated::new(users, page, limit, total),
        "Users retrieved successfully",
    ))
}

/// Create a user (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    auth.require_role(Role::Admin, "Only admins can create users")?;

    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    // The hash is stored even though login currently mock-accepts passwords
    let password_hash = hash_password(&request.password)?;

    let user = repo
        .create_user(
            request.email,
            password_hash,
            request.first_name,
            request.last_name,
            request.student_number,
            request.department,
            request.role,
        )
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User created");

    Ok(ApiResponse::created(user, "User created successfully"))
}

/// List all supervisors, for the student's supervisor selection
pub async fn list_supervisors(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let repo = Repository::new(state.db.clone());
    let supervisors = repo.list_users_by_role(Role::Supervisor).await?;

    Ok(ApiResponse::ok(supervisors, "Supervisors retrieved successfully"))
}
