use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{
    prelude::*, trainer_assignment, trainer_request, trainer_request::RequestStatus, user,
    user::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::access;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::auth::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for sending a coaching request to a trainer
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrainerRequestCreate {
    pub trainer_id: i32,
    /// Optional message shown to the trainer
    pub message: Option<String>,
}

/// Request body for responding to a coaching request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrainerRequestRespond {
    pub approve: bool,
}

/// Coaching request response model
#[derive(Debug, Serialize, ToSchema)]
pub struct TrainerRequestResponse {
    pub id: i32,
    pub athlete_id: i32,
    pub trainer_id: i32,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<trainer_request::Model> for TrainerRequestResponse {
    fn from(model: trainer_request::Model) -> Self {
        Self {
            id: model.id,
            athlete_id: model.athlete_id,
            trainer_id: model.trainer_id,
            status: model.status.as_str().to_string(),
            message: model.message,
            created_at: model.created_at,
            responded_at: model.responded_at,
        }
    }
}

/// Assignment response model
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: i32,
    pub trainer_id: i32,
    pub athlete_id: i32,
    pub assigned_at: DateTime<Utc>,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl From<trainer_assignment::Model> for AssignmentResponse {
    fn from(model: trainer_assignment::Model) -> Self {
        Self {
            id: model.id,
            trainer_id: model.trainer_id,
            athlete_id: model.athlete_id,
            assigned_at: model.assigned_at,
            is_active: model.is_active,
            notes: model.notes,
        }
    }
}

/// Query parameters for trainer search
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct TrainerSearchQuery {
    /// Substring matched against name and email
    pub q: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub skip: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

/// Athlete sends a coaching request to a trainer
#[utoipa::path(
    post,
    path = "/api/v1/trainer-requests",
    tag = "trainer-athlete",
    request_body = TrainerRequestCreate,
    responses(
        (status = 201, description = "Request created successfully", body = ApiResponse<TrainerRequestResponse>),
        (status = 400, description = "Duplicate pending request or existing assignment", body = ErrorResponse),
        (status = 404, description = "Trainer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn send_trainer_request(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<TrainerRequestCreate>,
) -> Result<(StatusCode, Json<ApiResponse<TrainerRequestResponse>>), ApiError> {
    trace!("Entering send_trainer_request function");
    debug!(
        "User {} requesting trainer {}",
        current_user.id, request.trainer_id
    );

    // The target must exist and actually be a trainer
    let trainer = User::find_by_id(request.trainer_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trainer not found".to_string()))?;
    if !matches!(trainer.role, UserRole::Trainer | UserRole::Admin) {
        return Err(ApiError::BadRequest("User is not a trainer".to_string()));
    }

    // At most one pending request per (athlete, trainer) pair
    let pending = TrainerRequest::find()
        .filter(trainer_request::Column::AthleteId.eq(current_user.id))
        .filter(trainer_request::Column::TrainerId.eq(request.trainer_id))
        .filter(trainer_request::Column::Status.eq(RequestStatus::Pending))
        .one(&state.db)
        .await?;
    if pending.is_some() {
        warn!(
            "Duplicate pending request from {} to {}",
            current_user.id, request.trainer_id
        );
        return Err(ApiError::BadRequest(
            "You already have a pending request to this trainer".to_string(),
        ));
    }

    // An existing active assignment also blocks a new request
    if access::has_active_assignment(&state.db, request.trainer_id, current_user.id).await? {
        return Err(ApiError::BadRequest(
            "You are already assigned to this trainer".to_string(),
        ));
    }

    let new_request = trainer_request::ActiveModel {
        athlete_id: Set(current_user.id),
        trainer_id: Set(request.trainer_id),
        status: Set(RequestStatus::Pending),
        message: Set(request.message),
        created_at: Set(Utc::now()),
        responded_at: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Trainer request created with ID: {}", new_request.id);
    let response = ApiResponse {
        data: TrainerRequestResponse::from(new_request),
        message: "Request sent successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List coaching requests: sent requests for athletes, received requests
/// for trainers
#[utoipa::path(
    get,
    path = "/api/v1/trainer-requests",
    tag = "trainer-athlete",
    responses(
        (status = 200, description = "Requests retrieved successfully", body = ApiResponse<Vec<TrainerRequestResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_trainer_requests(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<Vec<TrainerRequestResponse>>>, ApiError> {
    trace!("Entering get_trainer_requests function");

    let requests = match current_user.role {
        UserRole::Trainer | UserRole::Admin => {
            TrainerRequest::find()
                .filter(trainer_request::Column::TrainerId.eq(current_user.id))
                .order_by_desc(trainer_request::Column::CreatedAt)
                .all(&state.db)
                .await?
        }
        UserRole::Athlete => {
            TrainerRequest::find()
                .filter(trainer_request::Column::AthleteId.eq(current_user.id))
                .order_by_desc(trainer_request::Column::CreatedAt)
                .all(&state.db)
                .await?
        }
    };

    debug!("Retrieved {} trainer requests", requests.len());
    let response = ApiResponse {
        data: requests
            .into_iter()
            .map(TrainerRequestResponse::from)
            .collect(),
        message: "Requests retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Trainer responds to a coaching request. Approval creates exactly one
/// active assignment; both outcomes are terminal.
#[utoipa::path(
    put,
    path = "/api/v1/trainer-requests/{request_id}/respond",
    tag = "trainer-athlete",
    params(
        ("request_id" = i32, Path, description = "Request ID"),
    ),
    request_body = TrainerRequestRespond,
    responses(
        (status = 200, description = "Request responded successfully", body = ApiResponse<TrainerRequestResponse>),
        (status = 400, description = "Request has already been responded to", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn respond_to_request(
    Path(request_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<TrainerRequestRespond>,
) -> Result<Json<ApiResponse<TrainerRequestResponse>>, ApiError> {
    trace!(
        "Entering respond_to_request function for request_id: {}",
        request_id
    );
    access::require_trainer(&current_user)?;

    let pending = TrainerRequest::find_by_id(request_id)
        .filter(trainer_request::Column::TrainerId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if pending.status != RequestStatus::Pending {
        warn!("Request {} already responded to", request_id);
        return Err(ApiError::BadRequest(
            "Request has already been responded to".to_string(),
        ));
    }

    // Status transition and assignment creation commit together
    let txn = state.db.begin().await?;

    let athlete_id = pending.athlete_id;
    let mut request_active = pending.into_active_model();
    request_active.status = Set(if request.approve {
        RequestStatus::Approved
    } else {
        RequestStatus::Rejected
    });
    request_active.responded_at = Set(Some(Utc::now()));
    let updated = request_active.update(&txn).await?;

    if request.approve {
        trainer_assignment::ActiveModel {
            trainer_id: Set(current_user.id),
            athlete_id: Set(athlete_id),
            assigned_at: Set(Utc::now()),
            is_active: Set(true),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        info!(
            "Request {} approved, assignment created for athlete {}",
            request_id, athlete_id
        );
    } else {
        info!("Request {} rejected", request_id);
    }

    txn.commit().await?;

    let response = ApiResponse {
        data: TrainerRequestResponse::from(updated),
        message: "Request responded successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// List active assignments for the caller (trainer or athlete side)
#[utoipa::path(
    get,
    path = "/api/v1/trainer-requests/assignments",
    tag = "trainer-athlete",
    responses(
        (status = 200, description = "Assignments retrieved successfully", body = ApiResponse<Vec<AssignmentResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_assignments(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<Vec<AssignmentResponse>>>, ApiError> {
    trace!("Entering get_assignments function");

    let column = match current_user.role {
        UserRole::Trainer | UserRole::Admin => trainer_assignment::Column::TrainerId,
        UserRole::Athlete => trainer_assignment::Column::AthleteId,
    };

    let assignments = TrainerAssignment::find()
        .filter(column.eq(current_user.id))
        .filter(trainer_assignment::Column::IsActive.eq(true))
        .all(&state.db)
        .await?;

    debug!("Retrieved {} assignments", assignments.len());
    let response = ApiResponse {
        data: assignments
            .into_iter()
            .map(AssignmentResponse::from)
            .collect(),
        message: "Assignments retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// End an assignment. Only the trainer, the athlete, or an admin may end it.
#[utoipa::path(
    delete,
    path = "/api/v1/trainer-requests/assignments/{assignment_id}",
    tag = "trainer-athlete",
    params(
        ("assignment_id" = i32, Path, description = "Assignment ID"),
    ),
    responses(
        (status = 204, description = "Assignment ended successfully"),
        (status = 403, description = "Not authorized to end this assignment", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn end_assignment(
    Path(assignment_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering end_assignment function for assignment_id: {}",
        assignment_id
    );

    let assignment = TrainerAssignment::find_by_id(assignment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    if current_user.role != UserRole::Admin
        && current_user.id != assignment.trainer_id
        && current_user.id != assignment.athlete_id
    {
        warn!(
            "User {} denied ending assignment {}",
            current_user.id, assignment_id
        );
        return Err(ApiError::Forbidden(
            "Not authorized to end this assignment".to_string(),
        ));
    }

    let mut assignment_active = assignment.into_active_model();
    assignment_active.is_active = Set(false);
    assignment_active.update(&state.db).await?;

    info!("Assignment {} ended", assignment_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Search for trainers by name or email
#[utoipa::path(
    get,
    path = "/api/v1/trainer-requests/trainers/search",
    tag = "trainer-athlete",
    params(TrainerSearchQuery),
    responses(
        (status = 200, description = "Trainers retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_trainers(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(query)): Valid<Query<TrainerSearchQuery>>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering search_trainers function");

    let mut finder = User::find()
        .filter(user::Column::Role.is_in([UserRole::Trainer, UserRole::Admin]))
        .filter(user::Column::IsActive.eq(true))
        .filter(user::Column::IsLocked.eq(false));

    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        finder = finder.filter(
            Condition::any()
                .add(user::Column::FullName.contains(q))
                .add(user::Column::Email.contains(q)),
        );
    }

    let trainers = finder
        .order_by_asc(user::Column::Id)
        .offset(query.skip.unwrap_or(0))
        .limit(query.limit.unwrap_or(20))
        .all(&state.db)
        .await?;

    debug!(
        "Trainer search by user {} returned {} results",
        current_user.id,
        trainers.len()
    );
    let response = ApiResponse {
        data: trainers.into_iter().map(UserResponse::from).collect(),
        message: "Trainers retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// List the athletes assigned to the calling trainer
#[utoipa::path(
    get,
    path = "/api/v1/trainer-requests/my-athletes",
    tag = "trainer-athlete",
    responses(
        (status = 200, description = "Athletes retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Only trainers can access this resource", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_athletes(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_my_athletes function");
    access::require_trainer(&current_user)?;

    let assignments = TrainerAssignment::find()
        .filter(trainer_assignment::Column::TrainerId.eq(current_user.id))
        .filter(trainer_assignment::Column::IsActive.eq(true))
        .all(&state.db)
        .await?;
    let athlete_ids: Vec<i32> = assignments.iter().map(|a| a.athlete_id).collect();

    let athletes = User::find()
        .filter(user::Column::Id.is_in(athlete_ids))
        .all(&state.db)
        .await?;

    debug!(
        "Trainer {} has {} assigned athletes",
        current_user.id,
        athletes.len()
    );
    let response = ApiResponse {
        data: athletes.into_iter().map(UserResponse::from).collect(),
        message: "Athletes retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
