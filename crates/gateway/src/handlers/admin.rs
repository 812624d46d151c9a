//! Admin analytics handlers

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::extract::AuthContext;
use crate::response::ApiResponse;
use crate::AppState;
use acadflow_common::{
    db::Repository,
    errors::Result,
    workflow::Role,
};

#[derive(Serialize)]
pub struct AnalyticsResponse {
    pub users: UserStats,
    pub fyps: FypStats,
    pub clearances: ClearanceStats,
}

#[derive(Serialize)]
pub struct UserStats {
    pub total: u64,
    pub students: u64,
    pub supervisors: u64,
}

#[derive(Serialize)]
pub struct FypStats {
    pub total: u64,
    pub by_stage: BTreeMap<String, u64>,
}

#[derive(Serialize)]
pub struct ClearanceStats {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
}

/// System-wide aggregates (admin only)
pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<AnalyticsResponse>>> {
    auth.require_role(Role::Admin, "Only admins can view analytics")?;

    tracing::info!(
        request_id = %auth.request_id,
        admin = %auth.email,
        "Analytics requested"
    );

    let repo = Repository::new(state.db.clone());

    let total_users = repo.count_users(None).await?;
    let students = repo.count_users(Some(Role::Student)).await?;
    let supervisors = repo.count_users(Some(Role::Supervisor)).await?;

    let total_fyps = repo.count_fyps().await?;
    let by_stage: BTreeMap<String, u64> = repo
        .fyp_stage_distribution()
        .await?
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(stage, count)| (stage.as_str().to_string(), count))
        .collect();

    let total_clearances = repo.count_clearances().await?;
    let by_status: BTreeMap<String, u64> = repo
        .clearance_status_distribution()
        .await?
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| (status.as_str().to_string(), count))
        .collect();

    Ok(ApiResponse::ok(
        AnalyticsResponse {
            users: UserStats {
                total: total_users,
                students,
                supervisors,
            },
            fyps: FypStats {
                total: total_fyps,
                by_stage,
            },
            clearances: ClearanceStats {
                total: total_clearances,
                by_status,
            },
        },
        "Analytics retrieved successfully",
    ))
}
