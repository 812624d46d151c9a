//! Authentication handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::response::ApiResponse;
use crate::AppState;
use acadflow_common::{
    db::{models::User, Repository},
    errors::{AppError, Result},
    workflow::{permissions::flattened_permissions, Role},
};

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Optional expected role; login fails when the account's role differs
    pub role: Option<Role>,
}

/// Login response: the account, a bearer token, and the role's capabilities
#[derive(Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    pub permissions: Vec<String>,
}

/// Authenticate a user and issue a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    let user = repo
        .find_user_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if let Some(expected) = request.role {
        if user.user_role() != expected {
            return Err(AppError::Unauthorized {
                message: format!("User does not have {} role", expected),
            });
        }
    }

    // Mock authentication: any password is accepted
    let role = user.user_role();
    let token = state.jwt.generate_token(user.id, &user.email, role)?;
    let permissions = flattened_permissions(role);

    tracing::info!(user_id = %user.id, role = %role, "User logged in");

    Ok(ApiResponse::ok(
        LoginResponse {
            user,
            token,
            permissions,
        },
        "Login successful",
    ))
}
