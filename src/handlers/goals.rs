use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{goal, prelude::*};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::access::{self, Access};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, Pagination};

/// Request body for creating a new goal
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: Option<String>,
    /// distance, time, event, power, weight
    pub goal_type: String,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
}

/// Request body for updating a goal (unset fields untouched)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_type: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

/// Goal response model
#[derive(Debug, Serialize, ToSchema)]
pub struct GoalResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: String,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub completed_date: Option<DateTime<Utc>>,
}

impl From<goal::Model> for GoalResponse {
    fn from(model: goal::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            goal_type: model.goal_type,
            target_value: model.target_value,
            current_value: model.current_value,
            unit: model.unit,
            target_date: model.target_date,
            is_completed: model.is_completed,
            completed_date: model.completed_date,
        }
    }
}

/// Create a new goal
#[utoipa::path(
    post,
    path = "/api/v1/goals",
    tag = "goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created successfully", body = ApiResponse<GoalResponse>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GoalResponse>>), ApiError> {
    trace!("Entering create_goal function");
    debug!(
        "Creating goal '{}' for user {}",
        request.title, current_user.id
    );

    let now = Utc::now();
    let goal = goal::ActiveModel {
        user_id: Set(current_user.id),
        title: Set(request.title),
        description: Set(request.description),
        goal_type: Set(request.goal_type),
        target_value: Set(request.target_value),
        current_value: Set(request.current_value),
        unit: Set(request.unit),
        target_date: Set(request.target_date),
        is_completed: Set(false),
        completed_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Goal created with ID: {}", goal.id);
    let response = ApiResponse {
        data: GoalResponse::from(goal),
        message: "Goal created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List goals visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/goals",
    tag = "goals",
    params(Pagination),
    responses(
        (status = 200, description = "Goals retrieved successfully", body = ApiResponse<Vec<GoalResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_goals(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(pagination)): Valid<Query<Pagination>>,
) -> Result<Json<ApiResponse<Vec<GoalResponse>>>, ApiError> {
    trace!("Entering get_goals function");

    let mut query = Goal::find();
    if let Access::Ids(ids) = access::accessible_user_ids(&state.db, &current_user).await? {
        query = query.filter(goal::Column::UserId.is_in(ids));
    }

    let goals = query
        .order_by_asc(goal::Column::Id)
        .offset(pagination.skip())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    debug!("Retrieved {} goals for user {}", goals.len(), current_user.id);
    let response = ApiResponse {
        data: goals.into_iter().map(GoalResponse::from).collect(),
        message: "Goals retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific goal
#[utoipa::path(
    get,
    path = "/api/v1/goals/{goal_id}",
    tag = "goals",
    params(
        ("goal_id" = i32, Path, description = "Goal ID"),
    ),
    responses(
        (status = 200, description = "Goal retrieved successfully", body = ApiResponse<GoalResponse>),
        (status = 404, description = "Goal not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_goal(
    Path(goal_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<GoalResponse>>, ApiError> {
    trace!("Entering get_goal function for goal_id: {}", goal_id);

    let goal = Goal::find_by_id(goal_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

    let accessible = access::accessible_user_ids(&state.db, &current_user).await?;
    if !accessible.allows(goal.user_id) {
        warn!("User {} denied access to goal {}", current_user.id, goal.id);
        return Err(ApiError::NotFound("Goal not found".to_string()));
    }

    let response = ApiResponse {
        data: GoalResponse::from(goal),
        message: "Goal retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a goal (owner only). Marking a goal completed stamps
/// `completed_date`.
#[utoipa::path(
    put,
    path = "/api/v1/goals/{goal_id}",
    tag = "goals",
    params(
        ("goal_id" = i32, Path, description = "Goal ID"),
    ),
    request_body = UpdateGoalRequest,
    responses(
        (status = 200, description = "Goal updated successfully", body = ApiResponse<GoalResponse>),
        (status = 404, description = "Goal not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_goal(
    Path(goal_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UpdateGoalRequest>,
) -> Result<Json<ApiResponse<GoalResponse>>, ApiError> {
    trace!("Entering update_goal function for goal_id: {}", goal_id);

    let goal = Goal::find_by_id(goal_id)
        .filter(goal::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

    let mut goal_active = goal.into_active_model();

    if let Some(title) = request.title {
        goal_active.title = Set(title);
    }
    if let Some(description) = request.description {
        goal_active.description = Set(Some(description));
    }
    if let Some(goal_type) = request.goal_type {
        goal_active.goal_type = Set(goal_type);
    }
    if let Some(target_value) = request.target_value {
        goal_active.target_value = Set(Some(target_value));
    }
    if let Some(current_value) = request.current_value {
        goal_active.current_value = Set(Some(current_value));
    }
    if let Some(unit) = request.unit {
        goal_active.unit = Set(Some(unit));
    }
    if let Some(target_date) = request.target_date {
        goal_active.target_date = Set(Some(target_date));
    }
    if let Some(is_completed) = request.is_completed {
        goal_active.is_completed = Set(is_completed);
        goal_active.completed_date = Set(is_completed.then(Utc::now));
    }
    goal_active.updated_at = Set(Utc::now());

    let updated = goal_active.update(&state.db).await?;

    info!("Goal {} updated", updated.id);
    let response = ApiResponse {
        data: GoalResponse::from(updated),
        message: "Goal updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a goal (owner only)
#[utoipa::path(
    delete,
    path = "/api/v1/goals/{goal_id}",
    tag = "goals",
    params(
        ("goal_id" = i32, Path, description = "Goal ID"),
    ),
    responses(
        (status = 204, description = "Goal deleted successfully"),
        (status = 404, description = "Goal not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_goal(
    Path(goal_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_goal function for goal_id: {}", goal_id);

    let goal = Goal::find_by_id(goal_id)
        .filter(goal::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

    goal.delete(&state.db).await?;

    info!("Goal {} deleted", goal_id);
    Ok(StatusCode::NO_CONTENT)
}
