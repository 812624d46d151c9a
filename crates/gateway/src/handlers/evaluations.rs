//! Evaluation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::extract::AuthContext;
use crate::response::ApiResponse;
use crate::AppState;
use acadflow_common::{
    db::{
        models::{Evaluation, EvaluationType},
        Repository,
    },
    errors::{AppError, Result},
    workflow::Role,
    EVALUATION_MAX_MARKS, EVALUATION_MIN_MARKS,
};

/// Request to submit (or resubmit) an evaluation
#[derive(Debug, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub fyp_id: Uuid,

    #[serde(rename = "type")]
    pub eval_type: EvaluationType,

    pub marks: i32,

    pub feedback: Option<String>,
}

/// Submit an evaluation (examiner only); resubmission updates in place
pub async fn submit_evaluation(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<SubmitEvaluationRequest>,
) -> Result<Json<ApiResponse<Evaluation>>> {
    auth.require_role(Role::Examiner, "Only examiners can submit evaluations")?;

    if request.marks < EVALUATION_MIN_MARKS || request.marks > EVALUATION_MAX_MARKS {
        return Err(AppError::Validation {
            message: format!(
                "Marks must be between {} and {}",
                EVALUATION_MIN_MARKS, EVALUATION_MAX_MARKS
            ),
            field: Some("marks".to_string()),
        });
    }

    let repo = Repository::new(state.db.clone());

    repo.find_fyp_by_id(request.fyp_id)
        .await?
        .ok_or_else(|| AppError::FypNotFound {
            id: request.fyp_id.to_string(),
        })?;

    let evaluation = repo
        .upsert_evaluation(
            request.fyp_id,
            auth.user_id,
            request.eval_type,
            request.marks,
            request.feedback,
        )
        .await?;

    tracing::info!(
        fyp_id = %request.fyp_id,
        evaluator_id = %auth.user_id,
        eval_type = %request.eval_type,
        marks = request.marks,
        "Evaluation submitted"
    );

    Ok(ApiResponse::ok(evaluation, "Evaluation submitted successfully"))
}

/// All evaluations for one FYP
pub async fn fyp_evaluations(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(fyp_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Evaluation>>>> {
    let repo = Repository::new(state.db.clone());
    let evaluations = repo.find_evaluations_by_fyp(fyp_id).await?;

    Ok(ApiResponse::ok(evaluations, "Evaluations retrieved successfully"))
}

/// Evaluations submitted by the acting user
pub async fn my_evaluations(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<Evaluation>>>> {
    let repo = Repository::new(state.db.clone());
    let evaluations = repo.find_evaluations_by_evaluator(auth.user_id).await?;

    Ok(ApiResponse::ok(evaluations, "Evaluations retrieved successfully"))
}
