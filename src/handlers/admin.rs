use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Duration, Utc};
use model::entities::{
    invite_token, prelude::*, trainer_assignment, user, user::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, IsolationLevel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::access;
use crate::auth::{generate_invite_token, AuthUser};
use crate::error::ApiError;
use crate::handlers::auth::UserResponse;
use crate::handlers::trainer::AssignmentResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for changing a user's role
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserRoleUpdate {
    /// athlete, trainer or admin
    pub role: String,
}

/// Request body for locking or unlocking an account
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserLockUpdate {
    pub locked: bool,
}

/// Request body for manually creating an assignment
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignmentCreate {
    pub trainer_id: i32,
    pub athlete_id: i32,
    pub notes: Option<String>,
}

/// System-wide counters
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemStatsResponse {
    pub total_users: u64,
    pub total_athletes: u64,
    pub total_trainers: u64,
    pub total_admins: u64,
    pub total_active_assignments: u64,
    pub total_training_plans: u64,
    pub total_rides: u64,
    pub total_workouts: u64,
    pub total_goals: u64,
}

/// Request body for creating an invite token
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct InviteCreateRequest {
    /// Pre-set email; registration with another address will fail
    #[validate(email)]
    pub email: Option<String>,
    /// Role granted on redemption (default: athlete)
    pub role: Option<String>,
    /// Token lifetime in days (default: 7)
    #[validate(range(min = 1, max = 365))]
    pub expires_in_days: Option<i64>,
}

/// Invite token response model (admin view)
#[derive(Debug, Serialize, ToSchema)]
pub struct InviteResponse {
    pub id: i32,
    pub token: String,
    pub email: Option<String>,
    pub role: String,
    pub created_by_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub used_by_id: Option<i32>,
    pub is_active: bool,
    pub is_valid: bool,
}

impl InviteResponse {
    fn from_model(model: invite_token::Model, now: DateTime<Utc>) -> Self {
        Self {
            id: model.id,
            token: model.token.clone(),
            email: model.email.clone(),
            role: model.role.as_str().to_string(),
            created_by_id: model.created_by_id,
            created_at: model.created_at,
            expires_at: model.expires_at,
            used_at: model.used_at,
            used_by_id: model.used_by_id,
            is_active: model.is_active,
            is_valid: model.is_valid(now),
        }
    }
}

/// Query parameters for the admin user listing
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct AdminUserQuery {
    /// Filter by role (athlete, trainer, admin)
    pub role: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub skip: Option<u64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

/// Query parameters for the admin assignment listing
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct AdminAssignmentQuery {
    /// Only return active assignments (default: true)
    pub active_only: Option<bool>,
    #[validate(range(min = 0, max = 100000))]
    pub skip: Option<u64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

// Helper function to parse a role string into the closed enum
fn parse_role(role_str: &str) -> Result<UserRole, ApiError> {
    match role_str {
        "athlete" => Ok(UserRole::Athlete),
        "trainer" => Ok(UserRole::Trainer),
        "admin" => Ok(UserRole::Admin),
        _ => Err(ApiError::BadRequest("Invalid role".to_string())),
    }
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    params(AdminUserQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 400, description = "Invalid role filter", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(query)): Valid<Query<AdminUserQuery>>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_all_users function");
    access::require_admin(&current_user)?;

    let mut finder = User::find();
    if let Some(role_str) = &query.role {
        let role = parse_role(role_str)?;
        finder = finder.filter(user::Column::Role.eq(role));
    }

    let users = finder
        .order_by_asc(user::Column::Id)
        .offset(query.skip.unwrap_or(0))
        .limit(query.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    debug!("Admin {} listed {} users", current_user.id, users.len());
    let response = ApiResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        message: "Users retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get user details by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_by_id(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_user_by_id function for user_id: {}", user_id);
    access::require_admin(&current_user)?;

    let user = User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let response = ApiResponse {
        data: UserResponse::from(user),
        message: "User retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Change a user's role (admin only). An admin cannot demote themselves
/// while they are the only active, unlocked admin; the count-then-act runs
/// in a serializable transaction so concurrent demotions cannot leave zero
/// admins.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{user_id}/role",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UserRoleUpdate,
    responses(
        (status = 200, description = "Role changed successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid role or last-admin protection", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn change_user_role(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UserRoleUpdate>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering change_user_role function for user_id: {}", user_id);
    access::require_admin(&current_user)?;

    let new_role = parse_role(&request.role)?;

    let txn = state
        .db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Self-demotion requires another active, unlocked admin to exist
    if user_id == current_user.id && new_role != UserRole::Admin {
        let other_admins = User::find()
            .filter(user::Column::Role.eq(UserRole::Admin))
            .filter(user::Column::Id.ne(current_user.id))
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::IsLocked.eq(false))
            .count(&txn)
            .await?;
        if other_admins == 0 {
            warn!(
                "Admin {} attempted self-demotion as the only active admin",
                current_user.id
            );
            return Err(ApiError::BadRequest(
                "Cannot demote yourself - you are the only active admin. Promote another user to admin first."
                    .to_string(),
            ));
        }
    }

    let mut user_active = user.into_active_model();
    user_active.role = Set(new_role);
    user_active.updated_at = Set(Utc::now());
    let updated = user_active.update(&txn).await?;

    txn.commit().await?;

    info!("User {} role changed to {}", user_id, new_role.as_str());
    let response = ApiResponse {
        data: UserResponse::from(updated),
        message: "Role changed successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Lock or unlock an account (admin only). Self-lock is always rejected.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{user_id}/lock",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UserLockUpdate,
    responses(
        (status = 200, description = "Lock state changed successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Cannot lock your own account", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn lock_unlock_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UserLockUpdate>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering lock_unlock_user function for user_id: {}", user_id);
    access::require_admin(&current_user)?;

    let user = User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user_id == current_user.id && request.locked {
        warn!("Admin {} attempted to lock their own account", current_user.id);
        return Err(ApiError::BadRequest(
            "Cannot lock your own account".to_string(),
        ));
    }

    let mut user_active = user.into_active_model();
    user_active.is_locked = Set(request.locked);
    user_active.updated_at = Set(Utc::now());
    let updated = user_active.update(&state.db).await?;

    info!(
        "User {} {}",
        user_id,
        if request.locked { "locked" } else { "unlocked" }
    );
    let response = ApiResponse {
        data: UserResponse::from(updated),
        message: "Lock state changed successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a user account permanently (admin only). Self-deletion is always
/// rejected; deleting the last admin is rejected, counting other admins
/// with `is_active` only (deliberately a different predicate than the
/// role-change check). The count-then-delete runs serializably.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, description = "Self-deletion or last-admin protection", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    access::require_admin(&current_user)?;

    if user_id == current_user.id {
        warn!("Admin {} attempted self-deletion", current_user.id);
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    let txn = state
        .db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.role == UserRole::Admin {
        let other_admins = User::find()
            .filter(user::Column::Role.eq(UserRole::Admin))
            .filter(user::Column::Id.ne(user_id))
            .filter(user::Column::IsActive.eq(true))
            .count(&txn)
            .await?;
        if other_admins == 0 {
            warn!("Attempt to delete the last admin account {}", user_id);
            return Err(ApiError::BadRequest(
                "Cannot delete the last admin account".to_string(),
            ));
        }
    }

    user.delete(&txn).await?;
    txn.commit().await?;

    info!("User {} deleted by admin {}", user_id, current_user.id);
    Ok(StatusCode::NO_CONTENT)
}

/// List trainer-athlete assignments (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/admin/assignments",
    tag = "admin",
    params(AdminAssignmentQuery),
    responses(
        (status = 200, description = "Assignments retrieved successfully", body = ApiResponse<Vec<AssignmentResponse>>),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_all_assignments(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(query)): Valid<Query<AdminAssignmentQuery>>,
) -> Result<Json<ApiResponse<Vec<AssignmentResponse>>>, ApiError> {
    trace!("Entering get_all_assignments function");
    access::require_admin(&current_user)?;

    let mut finder = TrainerAssignment::find();
    if query.active_only.unwrap_or(true) {
        finder = finder.filter(trainer_assignment::Column::IsActive.eq(true));
    }

    let assignments = finder
        .order_by_asc(trainer_assignment::Column::Id)
        .offset(query.skip.unwrap_or(0))
        .limit(query.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    debug!("Admin listed {} assignments", assignments.len());
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

/// Manually create a trainer-athlete assignment (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/admin/assignments",
    tag = "admin",
    request_body = AssignmentCreate,
    responses(
        (status = 201, description = "Assignment created successfully", body = ApiResponse<AssignmentResponse>),
        (status = 400, description = "Not a trainer or assignment already exists", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Trainer or athlete not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_assignment(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentResponse>>), ApiError> {
    trace!("Entering create_assignment function");
    access::require_admin(&current_user)?;

    let trainer = User::find_by_id(request.trainer_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trainer not found".to_string()))?;
    if !matches!(trainer.role, UserRole::Trainer | UserRole::Admin) {
        return Err(ApiError::BadRequest("User is not a trainer".to_string()));
    }

    let athlete = User::find_by_id(request.athlete_id).one(&state.db).await?;
    if athlete.is_none() {
        return Err(ApiError::NotFound("Athlete not found".to_string()));
    }

    if access::has_active_assignment(&state.db, request.trainer_id, request.athlete_id).await? {
        return Err(ApiError::BadRequest(
            "Active assignment already exists".to_string(),
        ));
    }

    let assignment = trainer_assignment::ActiveModel {
        trainer_id: Set(request.trainer_id),
        athlete_id: Set(request.athlete_id),
        assigned_at: Set(Utc::now()),
        is_active: Set(true),
        notes: Set(request.notes),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Assignment {} created: trainer {} -> athlete {}",
        assignment.id, request.trainer_id, request.athlete_id
    );
    let response = ApiResponse {
        data: AssignmentResponse::from(assignment),
        message: "Assignment created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// End a trainer-athlete assignment (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/admin/assignments/{assignment_id}",
    tag = "admin",
    params(
        ("assignment_id" = i32, Path, description = "Assignment ID"),
    ),
    responses(
        (status = 204, description = "Assignment ended successfully"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_assignment(
    Path(assignment_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering delete_assignment function for assignment_id: {}",
        assignment_id
    );
    access::require_admin(&current_user)?;

    let assignment = TrainerAssignment::find_by_id(assignment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    let mut assignment_active = assignment.into_active_model();
    assignment_active.is_active = Set(false);
    assignment_active.update(&state.db).await?;

    info!("Assignment {} ended by admin", assignment_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get system-wide statistics (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = ApiResponse<SystemStatsResponse>),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_system_stats(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<SystemStatsResponse>>, ApiError> {
    trace!("Entering get_system_stats function");
    access::require_admin(&current_user)?;

    let total_users = User::find().count(&state.db).await?;
    let total_athletes = User::find()
        .filter(user::Column::Role.eq(UserRole::Athlete))
        .count(&state.db)
        .await?;
    let total_trainers = User::find()
        .filter(user::Column::Role.eq(UserRole::Trainer))
        .count(&state.db)
        .await?;
    let total_admins = User::find()
        .filter(user::Column::Role.eq(UserRole::Admin))
        .count(&state.db)
        .await?;
    let total_active_assignments = TrainerAssignment::find()
        .filter(trainer_assignment::Column::IsActive.eq(true))
        .count(&state.db)
        .await?;
    let total_training_plans = TrainingPlan::find().count(&state.db).await?;
    let total_rides = Ride::find().count(&state.db).await?;
    let total_workouts = Workout::find().count(&state.db).await?;
    let total_goals = Goal::find().count(&state.db).await?;

    let response = ApiResponse {
        data: SystemStatsResponse {
            total_users,
            total_athletes,
            total_trainers,
            total_admins,
            total_active_assignments,
            total_training_plans,
            total_rides,
            total_workouts,
            total_goals,
        },
        message: "Statistics retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Create an invite token (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/admin/invites",
    tag = "admin",
    request_body = InviteCreateRequest,
    responses(
        (status = 201, description = "Invite created successfully", body = ApiResponse<InviteResponse>),
        (status = 400, description = "Invalid role", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_invite(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Json(request)): Valid<Json<InviteCreateRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<InviteResponse>>), ApiError> {
    trace!("Entering create_invite function");
    access::require_admin(&current_user)?;

    let role = match &request.role {
        Some(role_str) => parse_role(role_str)?,
        None => UserRole::Athlete,
    };

    let now = Utc::now();
    let invite = invite_token::ActiveModel {
        token: Set(generate_invite_token()),
        email: Set(request.email),
        role: Set(role),
        created_by_id: Set(current_user.id),
        created_at: Set(now),
        expires_at: Set(now + Duration::days(request.expires_in_days.unwrap_or(7))),
        used_at: Set(None),
        used_by_id: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Invite {} created by admin {}", invite.id, current_user.id);
    let response = ApiResponse {
        data: InviteResponse::from_model(invite, now),
        message: "Invite created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List invite tokens (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/admin/invites",
    tag = "admin",
    responses(
        (status = 200, description = "Invites retrieved successfully", body = ApiResponse<Vec<InviteResponse>>),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_invites(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<Vec<InviteResponse>>>, ApiError> {
    trace!("Entering list_invites function");
    access::require_admin(&current_user)?;

    let now = Utc::now();
    let invites = InviteToken::find()
        .order_by_desc(invite_token::Column::CreatedAt)
        .all(&state.db)
        .await?;

    debug!("Admin listed {} invites", invites.len());
    let response = ApiResponse {
        data: invites
            .into_iter()
            .map(|invite| InviteResponse::from_model(invite, now))
            .collect(),
        message: "Invites retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
