use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{prelude::*, workout};
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

/// Request body for logging a new workout
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateWorkoutRequest {
    pub title: String,
    pub description: Option<String>,
    /// strength, yoga, stretching, ...
    pub workout_type: String,
    pub duration_minutes: i32,
    /// low, medium, high
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub workout_date: DateTime<Utc>,
}

/// Request body for updating a workout (unset fields untouched)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWorkoutRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub workout_type: Option<String>,
    pub duration_minutes: Option<i32>,
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub workout_date: Option<DateTime<Utc>>,
}

/// Workout response model
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkoutResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub workout_type: String,
    pub duration_minutes: i32,
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub workout_date: DateTime<Utc>,
}

impl From<workout::Model> for WorkoutResponse {
    fn from(model: workout::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            workout_type: model.workout_type,
            duration_minutes: model.duration_minutes,
            intensity: model.intensity,
            notes: model.notes,
            workout_date: model.workout_date,
        }
    }
}

/// Log a new workout
#[utoipa::path(
    post,
    path = "/api/v1/workouts",
    tag = "workouts",
    request_body = CreateWorkoutRequest,
    responses(
        (status = 201, description = "Workout created successfully", body = ApiResponse<WorkoutResponse>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkoutResponse>>), ApiError> {
    trace!("Entering create_workout function");
    debug!(
        "Creating workout '{}' for user {}",
        request.title, current_user.id
    );

    let now = Utc::now();
    let workout = workout::ActiveModel {
        user_id: Set(current_user.id),
        title: Set(request.title),
        description: Set(request.description),
        workout_type: Set(request.workout_type),
        duration_minutes: Set(request.duration_minutes),
        intensity: Set(request.intensity),
        notes: Set(request.notes),
        workout_date: Set(request.workout_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Workout created with ID: {}", workout.id);
    let response = ApiResponse {
        data: WorkoutResponse::from(workout),
        message: "Workout created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List workouts visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/workouts",
    tag = "workouts",
    params(Pagination),
    responses(
        (status = 200, description = "Workouts retrieved successfully", body = ApiResponse<Vec<WorkoutResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_workouts(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(pagination)): Valid<Query<Pagination>>,
) -> Result<Json<ApiResponse<Vec<WorkoutResponse>>>, ApiError> {
    trace!("Entering get_workouts function");

    let mut query = Workout::find();
    if let Access::Ids(ids) = access::accessible_user_ids(&state.db, &current_user).await? {
        query = query.filter(workout::Column::UserId.is_in(ids));
    }

    let workouts = query
        .order_by_desc(workout::Column::WorkoutDate)
        .offset(pagination.skip())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    debug!(
        "Retrieved {} workouts for user {}",
        workouts.len(),
        current_user.id
    );
    let response = ApiResponse {
        data: workouts.into_iter().map(WorkoutResponse::from).collect(),
        message: "Workouts retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific workout
#[utoipa::path(
    get,
    path = "/api/v1/workouts/{workout_id}",
    tag = "workouts",
    params(
        ("workout_id" = i32, Path, description = "Workout ID"),
    ),
    responses(
        (status = 200, description = "Workout retrieved successfully", body = ApiResponse<WorkoutResponse>),
        (status = 404, description = "Workout not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_workout(
    Path(workout_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<WorkoutResponse>>, ApiError> {
    trace!("Entering get_workout function for workout_id: {}", workout_id);

    let workout = Workout::find_by_id(workout_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

    let accessible = access::accessible_user_ids(&state.db, &current_user).await?;
    if !accessible.allows(workout.user_id) {
        warn!(
            "User {} denied access to workout {}",
            current_user.id, workout.id
        );
        return Err(ApiError::NotFound("Workout not found".to_string()));
    }

    let response = ApiResponse {
        data: WorkoutResponse::from(workout),
        message: "Workout retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a workout (owner only)
#[utoipa::path(
    put,
    path = "/api/v1/workouts/{workout_id}",
    tag = "workouts",
    params(
        ("workout_id" = i32, Path, description = "Workout ID"),
    ),
    request_body = UpdateWorkoutRequest,
    responses(
        (status = 200, description = "Workout updated successfully", body = ApiResponse<WorkoutResponse>),
        (status = 404, description = "Workout not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_workout(
    Path(workout_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UpdateWorkoutRequest>,
) -> Result<Json<ApiResponse<WorkoutResponse>>, ApiError> {
    trace!(
        "Entering update_workout function for workout_id: {}",
        workout_id
    );

    let workout = Workout::find_by_id(workout_id)
        .filter(workout::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

    let mut workout_active = workout.into_active_model();

    if let Some(title) = request.title {
        workout_active.title = Set(title);
    }
    if let Some(description) = request.description {
        workout_active.description = Set(Some(description));
    }
    if let Some(workout_type) = request.workout_type {
        workout_active.workout_type = Set(workout_type);
    }
    if let Some(duration_minutes) = request.duration_minutes {
        workout_active.duration_minutes = Set(duration_minutes);
    }
    if let Some(intensity) = request.intensity {
        workout_active.intensity = Set(Some(intensity));
    }
    if let Some(notes) = request.notes {
        workout_active.notes = Set(Some(notes));
    }
    if let Some(workout_date) = request.workout_date {
        workout_active.workout_date = Set(workout_date);
    }
    workout_active.updated_at = Set(Utc::now());

    let updated = workout_active.update(&state.db).await?;

    info!("Workout {} updated", updated.id);
    let response = ApiResponse {
        data: WorkoutResponse::from(updated),
        message: "Workout updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a workout (owner only)
#[utoipa::path(
    delete,
    path = "/api/v1/workouts/{workout_id}",
    tag = "workouts",
    params(
        ("workout_id" = i32, Path, description = "Workout ID"),
    ),
    responses(
        (status = 204, description = "Workout deleted successfully"),
        (status = 404, description = "Workout not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_workout(
    Path(workout_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering delete_workout function for workout_id: {}",
        workout_id
    );

    let workout = Workout::find_by_id(workout_id)
        .filter(workout::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

    workout.delete(&state.db).await?;

    info!("Workout {} deleted", workout_id);
    Ok(StatusCode::NO_CONTENT)
}
