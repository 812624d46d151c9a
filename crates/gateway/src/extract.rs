//! Request extractors
//!
//! Pulls the authenticated actor out of the bearer token and exposes role
//! guard helpers for the handlers.

use crate::AppState;
use acadflow_common::{
    auth::extract_bearer_token,
    errors::{AppError, Result},
    workflow::Role,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Extracted authentication context available to handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Acting user ID
    pub user_id: Uuid,

    /// Acting user email
    pub email: String,

    /// Acting user role
    pub role: Role,

    /// Request ID for tracing
    pub request_id: String,
}

impl AuthContext {
    /// Require an exact role, returning Forbidden otherwise
    pub fn require_role(&self, role: Role, message: &str) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: message.to_string(),
            })
        }
    }

    /// Require one of the given roles, returning Forbidden otherwise
    pub fn require_any_role(&self, roles: &[Role], message: &str) -> Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: message.to_string(),
            })
        }
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // Extract request ID
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // Extract and validate the bearer token
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing Authorization header".to_string(),
            })?;

        let token = extract_bearer_token(auth_header).ok_or_else(|| AppError::Unauthorized {
            message: "Expected a bearer token".to_string(),
        })?;

        let claims = state.jwt.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized {
            message: "Malformed token subject".to_string(),
        })?;

        Ok(AuthContext {
            user_id,
            email: claims.email,
            role: claims.role,
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "officer@acadflow.edu".to_string(),
            role,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_require_role() {
        assert!(context(Role::Student).require_role(Role::Student, "students only").is_ok());
        let err = context(Role::Examiner)
            .require_role(Role::Student, "students only")
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_require_any_role() {
        let officers = [Role::Hod, Role::Dean, Role::StudentAffairs, Role::Accounts];
        assert!(context(Role::Dean).require_any_role(&officers, "officers only").is_ok());
        assert!(context(Role::Supervisor)
            .require_any_role(&officers, "officers only")
            .is_err());
    }
}
