use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{prelude::*, ride};
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

/// Request body for logging a new ride
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateRideRequest {
    pub title: String,
    pub description: Option<String>,
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub elevation_gain_m: Option<f64>,
    pub avg_speed_kmh: Option<f64>,
    pub max_speed_kmh: Option<f64>,
    pub avg_power_watts: Option<i32>,
    pub avg_heart_rate: Option<i32>,
    pub max_heart_rate: Option<i32>,
    pub avg_cadence: Option<i32>,
    pub ride_date: DateTime<Utc>,
    pub route_name: Option<String>,
    pub ride_type: Option<String>,
}

/// Request body for updating a ride (unset fields untouched)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRideRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub elevation_gain_m: Option<f64>,
    pub avg_speed_kmh: Option<f64>,
    pub max_speed_kmh: Option<f64>,
    pub avg_power_watts: Option<i32>,
    pub avg_heart_rate: Option<i32>,
    pub max_heart_rate: Option<i32>,
    pub avg_cadence: Option<i32>,
    pub ride_date: Option<DateTime<Utc>>,
    pub route_name: Option<String>,
    pub ride_type: Option<String>,
}

/// Ride response model
#[derive(Debug, Serialize, ToSchema)]
pub struct RideResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub elevation_gain_m: Option<f64>,
    pub avg_speed_kmh: Option<f64>,
    pub max_speed_kmh: Option<f64>,
    pub avg_power_watts: Option<i32>,
    pub avg_heart_rate: Option<i32>,
    pub max_heart_rate: Option<i32>,
    pub avg_cadence: Option<i32>,
    pub ride_date: DateTime<Utc>,
    pub route_name: Option<String>,
    pub ride_type: Option<String>,
}

impl From<ride::Model> for RideResponse {
    fn from(model: ride::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            distance_km: model.distance_km,
            duration_minutes: model.duration_minutes,
            elevation_gain_m: model.elevation_gain_m,
            avg_speed_kmh: model.avg_speed_kmh,
            max_speed_kmh: model.max_speed_kmh,
            avg_power_watts: model.avg_power_watts,
            avg_heart_rate: model.avg_heart_rate,
            max_heart_rate: model.max_heart_rate,
            avg_cadence: model.avg_cadence,
            ride_date: model.ride_date,
            route_name: model.route_name,
            ride_type: model.ride_type,
        }
    }
}

/// Log a new ride
#[utoipa::path(
    post,
    path = "/api/v1/rides",
    tag = "rides",
    request_body = CreateRideRequest,
    responses(
        (status = 201, description = "Ride created successfully", body = ApiResponse<RideResponse>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_ride(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<CreateRideRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RideResponse>>), ApiError> {
    trace!("Entering create_ride function");
    debug!(
        "Creating ride '{}' for user {}",
        request.title, current_user.id
    );

    let now = Utc::now();
    let ride = ride::ActiveModel {
        user_id: Set(current_user.id),
        title: Set(request.title),
        description: Set(request.description),
        distance_km: Set(request.distance_km),
        duration_minutes: Set(request.duration_minutes),
        elevation_gain_m: Set(request.elevation_gain_m),
        avg_speed_kmh: Set(request.avg_speed_kmh),
        max_speed_kmh: Set(request.max_speed_kmh),
        avg_power_watts: Set(request.avg_power_watts),
        avg_heart_rate: Set(request.avg_heart_rate),
        max_heart_rate: Set(request.max_heart_rate),
        avg_cadence: Set(request.avg_cadence),
        ride_date: Set(request.ride_date),
        route_name: Set(request.route_name),
        ride_type: Set(request.ride_type),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Ride created with ID: {}", ride.id);
    let response = ApiResponse {
        data: RideResponse::from(ride),
        message: "Ride created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List rides visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/rides",
    tag = "rides",
    params(Pagination),
    responses(
        (status = 200, description = "Rides retrieved successfully", body = ApiResponse<Vec<RideResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_rides(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(pagination)): Valid<Query<Pagination>>,
) -> Result<Json<ApiResponse<Vec<RideResponse>>>, ApiError> {
    trace!("Entering get_rides function");

    let mut query = Ride::find();
    if let Access::Ids(ids) = access::accessible_user_ids(&state.db, &current_user).await? {
        query = query.filter(ride::Column::UserId.is_in(ids));
    }

    let rides = query
        .order_by_desc(ride::Column::RideDate)
        .offset(pagination.skip())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    debug!("Retrieved {} rides for user {}", rides.len(), current_user.id);
    let response = ApiResponse {
        data: rides.into_iter().map(RideResponse::from).collect(),
        message: "Rides retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific ride
#[utoipa::path(
    get,
    path = "/api/v1/rides/{ride_id}",
    tag = "rides",
    params(
        ("ride_id" = i32, Path, description = "Ride ID"),
    ),
    responses(
        (status = 200, description = "Ride retrieved successfully", body = ApiResponse<RideResponse>),
        (status = 404, description = "Ride not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_ride(
    Path(ride_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<RideResponse>>, ApiError> {
    trace!("Entering get_ride function for ride_id: {}", ride_id);

    let ride = Ride::find_by_id(ride_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    // Out-of-scope rides are indistinguishable from missing ones
    let accessible = access::accessible_user_ids(&state.db, &current_user).await?;
    if !accessible.allows(ride.user_id) {
        warn!(
            "User {} denied access to ride {} owned by {}",
            current_user.id, ride.id, ride.user_id
        );
        return Err(ApiError::NotFound("Ride not found".to_string()));
    }

    let response = ApiResponse {
        data: RideResponse::from(ride),
        message: "Ride retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a ride (owner only)
#[utoipa::path(
    put,
    path = "/api/v1/rides/{ride_id}",
    tag = "rides",
    params(
        ("ride_id" = i32, Path, description = "Ride ID"),
    ),
    request_body = UpdateRideRequest,
    responses(
        (status = 200, description = "Ride updated successfully", body = ApiResponse<RideResponse>),
        (status = 404, description = "Ride not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_ride(
    Path(ride_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UpdateRideRequest>,
) -> Result<Json<ApiResponse<RideResponse>>, ApiError> {
    trace!("Entering update_ride function for ride_id: {}", ride_id);

    let ride = Ride::find_by_id(ride_id)
        .filter(ride::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    let mut ride_active = ride.into_active_model();

    if let Some(title) = request.title {
        ride_active.title = Set(title);
    }
    if let Some(description) = request.description {
        ride_active.description = Set(Some(description));
    }
    if let Some(distance_km) = request.distance_km {
        ride_active.distance_km = Set(distance_km);
    }
    if let Some(duration_minutes) = request.duration_minutes {
        ride_active.duration_minutes = Set(duration_minutes);
    }
    if let Some(elevation_gain_m) = request.elevation_gain_m {
        ride_active.elevation_gain_m = Set(Some(elevation_gain_m));
    }
    if let Some(avg_speed_kmh) = request.avg_speed_kmh {
        ride_active.avg_speed_kmh = Set(Some(avg_speed_kmh));
    }
    if let Some(max_speed_kmh) = request.max_speed_kmh {
        ride_active.max_speed_kmh = Set(Some(max_speed_kmh));
    }
    if let Some(avg_power_watts) = request.avg_power_watts {
        ride_active.avg_power_watts = Set(Some(avg_power_watts));
    }
    if let Some(avg_heart_rate) = request.avg_heart_rate {
        ride_active.avg_heart_rate = Set(Some(avg_heart_rate));
    }
    if let Some(max_heart_rate) = request.max_heart_rate {
        ride_active.max_heart_rate = Set(Some(max_heart_rate));
    }
    if let Some(avg_cadence) = request.avg_cadence {
        ride_active.avg_cadence = Set(Some(avg_cadence));
    }
    if let Some(ride_date) = request.ride_date {
        ride_active.ride_date = Set(ride_date);
    }
    if let Some(route_name) = request.route_name {
        ride_active.route_name = Set(Some(route_name));
    }
    if let Some(ride_type) = request.ride_type {
        ride_active.ride_type = Set(Some(ride_type));
    }
    ride_active.updated_at = Set(Utc::now());

    let updated = ride_active.update(&state.db).await?;

    info!("Ride {} updated", updated.id);
    let response = ApiResponse {
        data: RideResponse::from(updated),
        message: "Ride updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a ride (owner only)
#[utoipa::path(
    delete,
    path = "/api/v1/rides/{ride_id}",
    tag = "rides",
    params(
        ("ride_id" = i32, Path, description = "Ride ID"),
    ),
    responses(
        (status = 204, description = "Ride deleted successfully"),
        (status = 404, description = "Ride not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_ride(
    Path(ride_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_ride function for ride_id: {}", ride_id);

    let ride = Ride::find_by_id(ride_id)
        .filter(ride::Column::UserId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    ride.delete(&state.db).await?;

    info!("Ride {} deleted", ride_id);
    Ok(StatusCode::NO_CONTENT)
}
