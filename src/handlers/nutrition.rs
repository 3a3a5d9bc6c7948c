use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{nutrition_log, prelude::*};
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

/// Request body for logging a nutrition entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateNutritionLogRequest {
    /// breakfast, lunch, dinner, snack
    pub meal_type: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub water_ml: Option<i32>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub log_date: DateTime<Utc>,
}

/// Request body for updating a nutrition entry (unset fields untouched)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNutritionLogRequest {
    pub meal_type: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub water_ml: Option<i32>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub log_date: Option<DateTime<Utc>>,
}

/// Nutrition log response model
#[derive(Debug, Serialize, ToSchema)]
pub struct NutritionLogResponse {
    pub id: i32,
    pub user_id: i32,
    pub meal_type: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub water_ml: Option<i32>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub log_date: DateTime<Utc>,
}

impl From<nutrition_log::Model> for NutritionLogResponse {
    fn from(model: nutrition_log::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            meal_type: model.meal_type,
            calories: model.calories,
            protein_g: model.protein_g,
            carbs_g: model.carbs_g,
            fat_g: model.fat_g,
            water_ml: model.water_ml,
            description: model.description,
            notes: model.notes,
            log_date: model.log_date,
        }
    }
}

/// Log a nutrition entry
#[utoipa::path(
    post,
    path = "/api/v1/nutrition",
    tag = "nutrition",
    request_body = CreateNutritionLogRequest,
    responses(
        (status = 201, description = "Nutrition log created successfully", body = ApiResponse<NutritionLogResponse>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_nutrition_log(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<CreateNutritionLogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NutritionLogResponse>>), ApiError> {
    trace!("Entering create_nutrition_log function");
    debug!("Creating nutrition log for user {}", current_user.id);

    let now = Utc::now();
    let log = nutrition_log::ActiveModel {
        user_id: Set(current_user.id),
        meal_type: Set(request.meal_type),
        calories: Set(request.calories),
        protein_g: Set(request.protein_g),
        carbs_g: Set(request.carbs_g),
        fat_g: Set(request.fat_g),
        water_ml: Set(request.water_ml),
        description: Set(request.description),
        notes: Set(request.notes),
        log_date: Set(request.log_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Nutrition log created with ID: {}", log.id);
    let response = ApiResponse {
        data: NutritionLogResponse::from(log),
        message: "Nutrition log created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List nutrition logs visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/nutrition",
    tag = "nutrition",
    params(Pagination),
    responses(
        (status = 200, description = "Nutrition logs retrieved successfully", body = ApiResponse<Vec<NutritionLogResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_nutrition_logs(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(pagination)): Valid<Query<Pagination>>,
) -> Result<Json<ApiResponse<Vec<NutritionLogResponse>>>, ApiError> {
    trace!("Entering get_nutrition_logs function");

    let mut query = NutritionLog::find();
    if let Access::Ids(ids) = access::accessible_user_ids(&state.db, &current_user).await? {
        query = query.filter(nutrition_log::Column::UserId.is_in(ids));
    }

    let logs = query
        .order_by_desc(nutrition_log::Column::LogDate)
        .offset(pagination.skip())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    debug!(
        "Retrieved {} nutrition logs for user {}",
        logs.len(),
        current_user.id
    );
    let response = ApiResponse {
        data: logs.into_iter().map(NutritionLogResponse::from).collect(),
        message: "Nutrition logs retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific nutrition log
#[utoipa::path(
    get,
    path = "/api/v1/nutrition/{log_id}",
    tag = "nutrition",
    params(
        ("log_id" = i32, Path, description = "Nutrition log ID"),
    ),
    responses(
        (status = 200, description = "Nutrition log retrieved successfully", body = ApiResponse<NutritionLogResponse>),
        (status = 404, description = "Nutrition log not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_nutrition_log(
    Path(log_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<NutritionLogResponse>>, ApiError> {
    trace!("Entering get_nutrition_log function for log_id: {}", log_id);

    let log = NutritionLog::find_by_id(log_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Nutrition log not found".to_string()))?;

    let accessible = access::accessible_user_ids(&state.db, &current_user).await?;
    if !accessible.allows(log.user_id) {
        warn!(
            "User {} denied access to nutrition log {}",
            current_user.id, log.id
        );
        return Err(ApiError::NotFound("Nutrition log not found".to_string()));
    }

    let response = ApiResponse {
        data: NutritionLogResponse::from(log),
        message: "Nutrition log retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a nutrition log (owner only)
#[utoipa::path(
    put,
    path = "/api/v1/nutrition/{log_id}",
    tag = "nutrition",
    params(
        ("log_id" = i32, Path, description = "Nutrition log ID"),
    ),
    request_body = UpdateNutritionLogRequest,
    responses(
        (status = 200, description = "Nutrition log updated successfully", body = ApiResponse<NutritionLogResponse>),
        (status = 404, description = "Nutrition log not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_nutrition_log(
    Path(log_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UpdateNutritionLogRequest>,
) -> Result<Json<ApiResponse<NutritionLogResponse>>, ApiError> {
    trace!(
        "Entering update_nutrition_log function for log_id: {}",
        log_id
    );

    let log = NutritionLog::find_by_id(log_id)
        .filter(nutrition_log::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Nutrition log not found".to_string()))?;

    let mut log_active = log.into_active_model();

    if let Some(meal_type) = request.meal_type {
        log_active.meal_type = Set(Some(meal_type));
    }
    if let Some(calories) = request.calories {
        log_active.calories = Set(Some(calories));
    }
    if let Some(protein_g) = request.protein_g {
        log_active.protein_g = Set(Some(protein_g));
    }
    if let Some(carbs_g) = request.carbs_g {
        log_active.carbs_g = Set(Some(carbs_g));
    }
    if let Some(fat_g) = request.fat_g {
        log_active.fat_g = Set(Some(fat_g));
    }
    if let Some(water_ml) = request.water_ml {
        log_active.water_ml = Set(Some(water_ml));
    }
    if let Some(description) = request.description {
        log_active.description = Set(Some(description));
    }
    if let Some(notes) = request.notes {
        log_active.notes = Set(Some(notes));
    }
    if let Some(log_date) = request.log_date {
        log_active.log_date = Set(log_date);
    }
    log_active.updated_at = Set(Utc::now());

    let updated = log_active.update(&state.db).await?;

    info!("Nutrition log {} updated", updated.id);
    let response = ApiResponse {
        data: NutritionLogResponse::from(updated),
        message: "Nutrition log updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a nutrition log (owner only)
#[utoipa::path(
    delete,
    path = "/api/v1/nutrition/{log_id}",
    tag = "nutrition",
    params(
        ("log_id" = i32, Path, description = "Nutrition log ID"),
    ),
    responses(
        (status = 204, description = "Nutrition log deleted successfully"),
        (status = 404, description = "Nutrition log not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_nutrition_log(
    Path(log_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering delete_nutrition_log function for log_id: {}",
        log_id
    );

    let log = NutritionLog::find_by_id(log_id)
        .filter(nutrition_log::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Nutrition log not found".to_string()))?;

    log.delete(&state.db).await?;

    info!("Nutrition log {} deleted", log_id);
    Ok(StatusCode::NO_CONTENT)
}
