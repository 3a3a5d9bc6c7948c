use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::Utc;
use model::entities::{invite_token, prelude::*, user, user::UserRole};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{create_access_token, hash_password, verify_password, AuthUser};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for registering a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Plaintext password
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Display name
    pub full_name: Option<String>,
    /// Optional invite token fixing the account role
    pub invite_token: Option<String>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token issued on login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_locked: bool,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: model.role.as_str().to_string(),
            is_active: model.is_active,
            is_locked: model.is_locked,
            created_at: model.created_at,
        }
    }
}

/// Public view of an invite token
#[derive(Debug, Serialize, ToSchema)]
pub struct InvitePublicResponse {
    pub token: String,
    pub role: String,
    pub email: Option<String>,
    pub expires_at: chrono::DateTime<Utc>,
    pub is_valid: bool,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Email taken or invite token invalid", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering register function");
    debug!("Registering account for email: {}", request.email);

    let existing = User::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Registration rejected, email already taken: {}", request.email);
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    // Default role, unless a valid invite token overrides it
    let mut role = UserRole::Athlete;
    let mut invite: Option<invite_token::Model> = None;

    if let Some(token) = &request.invite_token {
        let found = InviteToken::find()
            .filter(invite_token::Column::Token.eq(token))
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Invalid invite token".to_string()))?;

        let now = Utc::now();
        if !found.is_valid(now) {
            if found.used_at.is_some() {
                return Err(ApiError::BadRequest(
                    "Invite token has already been used".to_string(),
                ));
            }
            if found.is_expired(now) {
                return Err(ApiError::BadRequest("Invite token has expired".to_string()));
            }
            return Err(ApiError::BadRequest(
                "Invite token is no longer valid".to_string(),
            ));
        }

        if let Some(invite_email) = &found.email {
            if !invite_email.eq_ignore_ascii_case(&request.email) {
                return Err(ApiError::BadRequest(
                    "This invite was sent to a different email address".to_string(),
                ));
            }
        }

        role = found.role;
        invite = Some(found);
    }

    let hashed_password = hash_password(&request.password)?;
    let now = Utc::now();

    let new_user = user::ActiveModel {
        email: Set(request.email.clone()),
        hashed_password: Set(hashed_password),
        full_name: Set(request.full_name.clone()),
        role: Set(role),
        is_active: Set(true),
        is_locked: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    // Mark invite as used
    if let Some(invite_model) = invite {
        let mut invite_active = invite_model.into_active_model();
        invite_active.used_at = Set(Some(now));
        invite_active.used_by_id = Set(Some(new_user.id));
        invite_active.update(&state.db).await?;
    }

    info!(
        "Registered user {} with role {}",
        new_user.id,
        new_user.role.as_str()
    );
    let response = ApiResponse {
        data: UserResponse::from(new_user),
        message: "Account created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Incorrect email or password", body = ErrorResponse),
        (status = 403, description = "Account is locked", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    trace!("Entering login function");
    debug!("Login attempt for email: {}", request.email);

    let user = User::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?;

    let user = match user {
        Some(user) if verify_password(&request.password, &user.hashed_password)? => user,
        _ => {
            warn!("Failed login attempt for email: {}", request.email);
            return Err(ApiError::Unauthorized(
                "Incorrect email or password".to_string(),
            ));
        }
    };

    // Locked accounts cannot authenticate even with correct credentials
    if user.is_locked {
        warn!("Locked account attempted login: {}", user.email);
        return Err(ApiError::AccountLocked);
    }

    let access_token = create_access_token(
        &user.email,
        &state.config.secret_key,
        state.config.access_token_expire_minutes,
    )?;

    info!("User {} logged in", user.id);
    let response = ApiResponse {
        data: TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        },
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the authenticated user's own profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn read_me(
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering read_me function for user {}", current_user.id);

    let response = ApiResponse {
        data: UserResponse::from(current_user),
        message: "User retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Validate an invite token (public endpoint)
#[utoipa::path(
    get,
    path = "/api/v1/auth/invite/{token}",
    tag = "auth",
    params(
        ("token" = String, Path, description = "Invite token"),
    ),
    responses(
        (status = 200, description = "Invite token details", body = ApiResponse<InvitePublicResponse>),
        (status = 404, description = "Invite token not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn validate_invite(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InvitePublicResponse>>, ApiError> {
    trace!("Entering validate_invite function");

    let invite = InviteToken::find()
        .filter(invite_token::Column::Token.eq(&token))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite token not found".to_string()))?;

    let now = Utc::now();
    let response = ApiResponse {
        data: InvitePublicResponse {
            token: invite.token.clone(),
            role: invite.role.as_str().to_string(),
            email: invite.email.clone(),
            expires_at: invite.expires_at,
            is_valid: invite.is_valid(now),
        },
        message: "Invite token retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
