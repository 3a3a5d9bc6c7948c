use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use axum_valid::Valid;
use chrono::{DateTime, Duration, Utc};
use model::entities::{activity, integration, prelude::*};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::access::{self, Access};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::strava::{self, StravaClient};

/// Connection status of one provider for the current user
#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrationStatusResponse {
    pub provider: String,
    pub connected: bool,
    pub connected_at: Option<DateTime<Utc>>,
    pub last_sync: Option<DateTime<Utc>>,
    pub athlete_id: Option<String>,
}

/// OAuth authorization URL for the frontend to open
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectResponse {
    pub auth_url: String,
}

/// Result of a sync run
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncResultResponse {
    pub success: bool,
    pub activities_synced: u32,
    pub message: String,
}

/// Imported activity response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub id: i32,
    pub user_id: i32,
    pub source: String,
    pub external_id: Option<String>,
    pub activity_type: String,
    pub name: String,
    pub activity_date: DateTime<Utc>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub elevation_m: Option<f64>,
    pub calories: Option<i32>,
    pub heart_rate_avg: Option<i32>,
    pub heart_rate_max: Option<i32>,
    pub power_avg: Option<i32>,
    pub power_max: Option<i32>,
    pub cadence_avg: Option<i32>,
    pub speed_avg_kmh: Option<f64>,
    pub speed_max_kmh: Option<f64>,
}

impl From<activity::Model> for ActivityResponse {
    fn from(model: activity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            source: model.source,
            external_id: model.external_id,
            activity_type: model.activity_type,
            name: model.name,
            activity_date: model.activity_date,
            duration_minutes: model.duration_minutes,
            distance_km: model.distance_km,
            elevation_m: model.elevation_m,
            calories: model.calories,
            heart_rate_avg: model.heart_rate_avg,
            heart_rate_max: model.heart_rate_max,
            power_avg: model.power_avg,
            power_max: model.power_max,
            cadence_avg: model.cadence_avg,
            speed_avg_kmh: model.speed_avg_kmh,
            speed_max_kmh: model.speed_max_kmh,
        }
    }
}

/// Query parameters for the OAuth callback
#[derive(Debug, Deserialize, IntoParams)]
pub struct StravaCallbackQuery {
    pub code: String,
    pub state: String,
}

/// Query parameters for a sync run
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct SyncQuery {
    /// How many days of history to fetch (default: 30)
    #[validate(range(min = 1, max = 90))]
    pub days: Option<i64>,
}

/// Query parameters for listing imported activities
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ActivityListQuery {
    /// Filter by source system ("strava", "manual")
    pub source: Option<String>,
    /// Filter by internal activity type ("cycling", "running", ...)
    pub activity_type: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub skip: Option<u64>,
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<u64>,
}

fn get_strava_integration_query(user_id: i32) -> sea_orm::Select<Integration> {
    Integration::find()
        .filter(integration::Column::UserId.eq(user_id))
        .filter(integration::Column::Provider.eq(strava::PROVIDER))
}

/// Get integration status for the current user
#[utoipa::path(
    get,
    path = "/api/v1/integrations/status",
    tag = "integrations",
    responses(
        (status = 200, description = "Integration status retrieved successfully", body = ApiResponse<Vec<IntegrationStatusResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_integration_status(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<Vec<IntegrationStatusResponse>>>, ApiError> {
    trace!("Entering get_integration_status function");

    let strava_integration = get_strava_integration_query(current_user.id)
        .one(&state.db)
        .await?;

    let status_list = vec![IntegrationStatusResponse {
        provider: strava::PROVIDER.to_string(),
        connected: strava_integration.is_some(),
        connected_at: strava_integration.as_ref().map(|i| i.connected_at),
        last_sync: strava_integration.as_ref().and_then(|i| i.last_sync),
        athlete_id: strava_integration.and_then(|i| i.athlete_id),
    }];

    let response = ApiResponse {
        data: status_list,
        message: "Integration status retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the Strava OAuth authorization URL
#[utoipa::path(
    get,
    path = "/api/v1/integrations/strava/connect",
    tag = "integrations",
    responses(
        (status = 200, description = "Authorization URL", body = ApiResponse<ConnectResponse>),
        (status = 503, description = "Strava integration not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn connect_strava(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<ConnectResponse>>, ApiError> {
    trace!("Entering connect_strava function");

    let client = StravaClient::from_config(&state.config)?;
    let redirect_uri = state.config.strava_redirect_uri.clone().ok_or_else(|| {
        ApiError::ServiceUnavailable("Strava integration not configured".to_string())
    })?;

    // The state parameter carries the user id through the public callback
    let oauth_state = format!("user_{}", current_user.id);
    let auth_url = client.authorize_url(&redirect_uri, &oauth_state);

    debug!("Issued Strava authorize URL for user {}", current_user.id);
    let response = ApiResponse {
        data: ConnectResponse { auth_url },
        message: "Authorization URL created successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Handle the Strava OAuth callback (public endpoint; the `state`
/// parameter correlates the callback to a user). Redirects the browser to
/// the configured frontend when done.
#[utoipa::path(
    get,
    path = "/api/v1/integrations/strava/callback",
    tag = "integrations",
    params(StravaCallbackQuery),
    responses(
        (status = 303, description = "Redirect to frontend after connecting"),
        (status = 400, description = "Invalid state or code exchange failed", body = ErrorResponse),
        (status = 503, description = "Strava integration not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state, query))]
pub async fn strava_callback(
    State(state): State<AppState>,
    Query(query): Query<StravaCallbackQuery>,
) -> Result<Redirect, ApiError> {
    trace!("Entering strava_callback function");

    let client = StravaClient::from_config(&state.config)?;

    let user_id: i32 = query
        .state
        .strip_prefix("user_")
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ApiError::BadRequest("Invalid state parameter".to_string()))?;

    let tokens = client.exchange_code(&query.code).await?;
    let expires_at = tokens.expires_at_utc();
    let athlete_id = tokens.athlete.as_ref().map(|a| a.id.to_string());

    // Upsert the integration row for this user
    let existing = get_strava_integration_query(user_id).one(&state.db).await?;
    match existing {
        Some(model) => {
            let mut active = model.into_active_model();
            active.access_token = Set(tokens.access_token);
            active.refresh_token = Set(tokens.refresh_token);
            active.token_expires_at = Set(Some(expires_at));
            active.athlete_id = Set(athlete_id);
            active.update(&state.db).await?;
        }
        None => {
            integration::ActiveModel {
                user_id: Set(user_id),
                provider: Set(strava::PROVIDER.to_string()),
                access_token: Set(tokens.access_token),
                refresh_token: Set(tokens.refresh_token),
                token_expires_at: Set(Some(expires_at)),
                athlete_id: Set(athlete_id),
                connected_at: Set(Utc::now()),
                last_sync: Set(None),
                ..Default::default()
            }
            .insert(&state.db)
            .await?;
        }
    }

    info!("Strava connected for user {}", user_id);
    let frontend_url = format!(
        "{}/integrations?connected=strava",
        state.config.frontend_url.trim_end_matches('/')
    );
    Ok(Redirect::to(&frontend_url))
}

/// Sync recent activities from Strava. Idempotent: already-imported
/// activities are skipped.
#[utoipa::path(
    post,
    path = "/api/v1/integrations/strava/sync",
    tag = "integrations",
    params(SyncQuery),
    responses(
        (status = 200, description = "Sync completed", body = ApiResponse<SyncResultResponse>),
        (status = 400, description = "Strava not connected", body = ErrorResponse),
        (status = 401, description = "Token refresh failed, reconnect required", body = ErrorResponse),
        (status = 502, description = "Strava API request failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn sync_strava(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(query)): Valid<Query<SyncQuery>>,
) -> Result<Json<ApiResponse<SyncResultResponse>>, ApiError> {
    trace!("Entering sync_strava function");
    let days = query.days.unwrap_or(30);
    debug!("Syncing {} days of Strava history for user {}", days, current_user.id);

    let integration = get_strava_integration_query(current_user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Strava not connected".to_string()))?;

    let client = StravaClient::from_config(&state.config)?;

    // Refresh the token first when it has expired
    let integration = strava::ensure_fresh_token(&state.db, &client, integration).await?;

    let after = (Utc::now() - Duration::days(days)).timestamp();
    let fetched = client
        .fetch_activities(&integration.access_token, after)
        .await?;

    let synced_count = strava::import_activities(&state.db, current_user.id, &fetched).await?;

    // last_sync advances even when every activity was a duplicate
    let mut integration_active = integration.into_active_model();
    integration_active.last_sync = Set(Some(Utc::now()));
    integration_active.update(&state.db).await?;

    info!(
        "Synced {} new activities for user {}",
        synced_count, current_user.id
    );
    let response = ApiResponse {
        data: SyncResultResponse {
            success: true,
            activities_synced: synced_count,
            message: format!("Successfully synced {synced_count} new activities from Strava"),
        },
        message: "Sync completed".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Disconnect Strava. The integration row is deleted; imported activities
/// are retained.
#[utoipa::path(
    delete,
    path = "/api/v1/integrations/strava/disconnect",
    tag = "integrations",
    responses(
        (status = 204, description = "Strava disconnected"),
        (status = 404, description = "Strava not connected", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn disconnect_strava(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering disconnect_strava function");

    let integration = get_strava_integration_query(current_user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Strava not connected".to_string()))?;

    integration.delete(&state.db).await?;

    info!("Strava disconnected for user {}", current_user.id);
    Ok(StatusCode::NO_CONTENT)
}

/// List imported activities visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/integrations/activities",
    tag = "integrations",
    params(ActivityListQuery),
    responses(
        (status = 200, description = "Activities retrieved successfully", body = ApiResponse<Vec<ActivityResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_activities(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(query)): Valid<Query<ActivityListQuery>>,
) -> Result<Json<ApiResponse<Vec<ActivityResponse>>>, ApiError> {
    trace!("Entering get_activities function");

    let mut finder = Activity::find();
    if let Access::Ids(ids) = access::accessible_user_ids(&state.db, &current_user).await? {
        finder = finder.filter(activity::Column::UserId.is_in(ids));
    }

    if let Some(source) = &query.source {
        finder = finder.filter(activity::Column::Source.eq(source));
    }
    if let Some(activity_type) = &query.activity_type {
        finder = finder.filter(activity::Column::ActivityType.eq(activity_type));
    }

    let activities = finder
        .order_by_desc(activity::Column::ActivityDate)
        .offset(query.skip.unwrap_or(0))
        .limit(query.limit.unwrap_or(50))
        .all(&state.db)
        .await?;

    debug!(
        "Retrieved {} activities for user {}",
        activities.len(),
        current_user.id
    );
    let response = ApiResponse {
        data: activities.into_iter().map(ActivityResponse::from).collect(),
        message: "Activities retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
