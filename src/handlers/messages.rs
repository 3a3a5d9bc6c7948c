use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{message, prelude::*, user};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::access;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, Pagination};

/// Request body for sending a message
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageCreate {
    pub recipient_id: i32,
    pub content: String,
}

/// Message response model
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<message::Model> for MessageResponse {
    fn from(model: message::Model) -> Self {
        Self {
            id: model.id,
            sender_id: model.sender_id,
            recipient_id: model.recipient_id,
            content: model.content,
            is_read: model.is_read,
            created_at: model.created_at,
            read_at: model.read_at,
        }
    }
}

/// One conversation in the caller's inbox: the counterpart, the latest
/// message, and how many of their messages are unread.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub user_id: i32,
    pub user_name: Option<String>,
    pub user_email: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: u64,
}

/// Unread message counter
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// Send a message. Requires an active trainer-athlete assignment between
/// sender and recipient in either direction; admins bypass the check.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    tag = "messages",
    request_body = MessageCreate,
    responses(
        (status = 201, description = "Message sent successfully", body = ApiResponse<MessageResponse>),
        (status = 403, description = "No active trainer-athlete relationship", body = ErrorResponse),
        (status = 404, description = "Recipient not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<MessageCreate>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    trace!("Entering send_message function");
    debug!(
        "User {} sending message to {}",
        current_user.id, request.recipient_id
    );

    let recipient = User::find_by_id(request.recipient_id)
        .one(&state.db)
        .await?;
    if recipient.is_none() {
        return Err(ApiError::NotFound("Recipient not found".to_string()));
    }

    let is_admin = current_user.role == model::entities::user::UserRole::Admin;
    if !is_admin && !access::are_linked(&state.db, current_user.id, request.recipient_id).await? {
        warn!(
            "User {} denied messaging {}: no active assignment",
            current_user.id, request.recipient_id
        );
        return Err(ApiError::Forbidden(
            "You can only message users you have an active trainer-athlete relationship with"
                .to_string(),
        ));
    }

    let message = message::ActiveModel {
        sender_id: Set(current_user.id),
        recipient_id: Set(request.recipient_id),
        content: Set(request.content),
        is_read: Set(false),
        created_at: Set(Utc::now()),
        read_at: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Message {} sent", message.id);
    let response = ApiResponse {
        data: MessageResponse::from(message),
        message: "Message sent successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List conversations: the latest message per counterpart plus an unread
/// counter, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/messages/conversations",
    tag = "messages",
    responses(
        (status = 200, description = "Conversations retrieved successfully", body = ApiResponse<Vec<ConversationResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_conversations(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<Vec<ConversationResponse>>>, ApiError> {
    trace!("Entering get_conversations function");

    // All traffic involving the caller, newest first; the first message per
    // counterpart is that conversation's latest
    let messages = Message::find()
        .filter(
            Condition::any()
                .add(message::Column::SenderId.eq(current_user.id))
                .add(message::Column::RecipientId.eq(current_user.id)),
        )
        .order_by_desc(message::Column::CreatedAt)
        .order_by_desc(message::Column::Id)
        .all(&state.db)
        .await?;

    let mut latest: Vec<(i32, message::Model)> = Vec::new();
    let mut unread: HashMap<i32, u64> = HashMap::new();

    for msg in messages {
        let other_user_id = if msg.sender_id == current_user.id {
            msg.recipient_id
        } else {
            msg.sender_id
        };

        if msg.recipient_id == current_user.id && !msg.is_read {
            *unread.entry(other_user_id).or_insert(0) += 1;
        }

        if !latest.iter().any(|(id, _)| *id == other_user_id) {
            latest.push((other_user_id, msg));
        }
    }

    let counterpart_ids: Vec<i32> = latest.iter().map(|(id, _)| *id).collect();
    let counterparts: HashMap<i32, user::Model> = User::find()
        .filter(user::Column::Id.is_in(counterpart_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let conversations: Vec<ConversationResponse> = latest
        .into_iter()
        .filter_map(|(other_user_id, msg)| {
            let other = counterparts.get(&other_user_id)?;
            let preview: String = if msg.content.chars().count() > 100 {
                format!("{}...", msg.content.chars().take(100).collect::<String>())
            } else {
                msg.content.clone()
            };
            Some(ConversationResponse {
                user_id: other.id,
                user_name: other.full_name.clone(),
                user_email: other.email.clone(),
                last_message: preview,
                last_message_time: msg.created_at,
                unread_count: unread.get(&other_user_id).copied().unwrap_or(0),
            })
        })
        .collect();

    debug!(
        "User {} has {} conversations",
        current_user.id,
        conversations.len()
    );
    let response = ApiResponse {
        data: conversations,
        message: "Conversations retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the thread with a specific user, oldest first. Reading the thread
/// marks their unread messages to the caller as read.
#[utoipa::path(
    get,
    path = "/api/v1/messages/with/{user_id}",
    tag = "messages",
    params(
        ("user_id" = i32, Path, description = "Counterpart user ID"),
        Pagination,
    ),
    responses(
        (status = 200, description = "Messages retrieved successfully", body = ApiResponse<Vec<MessageResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_messages_with_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(pagination)): Valid<Query<Pagination>>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ApiError> {
    trace!("Entering get_messages_with_user function for user {}", user_id);

    let other = User::find_by_id(user_id).one(&state.db).await?;
    if other.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let mut messages = Message::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(message::Column::SenderId.eq(current_user.id))
                        .add(message::Column::RecipientId.eq(user_id)),
                )
                .add(
                    Condition::all()
                        .add(message::Column::SenderId.eq(user_id))
                        .add(message::Column::RecipientId.eq(current_user.id)),
                ),
        )
        .order_by_desc(message::Column::CreatedAt)
        .order_by_desc(message::Column::Id)
        .offset(pagination.skip())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    // Reading the thread is the read receipt
    let now = Utc::now();
    Message::update_many()
        .col_expr(message::Column::IsRead, Expr::value(true))
        .col_expr(message::Column::ReadAt, Expr::value(now))
        .filter(message::Column::SenderId.eq(user_id))
        .filter(message::Column::RecipientId.eq(current_user.id))
        .filter(message::Column::IsRead.eq(false))
        .exec(&state.db)
        .await?;

    // Chronological order for display
    messages.reverse();

    debug!(
        "Retrieved {} messages between {} and {}",
        messages.len(),
        current_user.id,
        user_id
    );
    let response = ApiResponse {
        data: messages.into_iter().map(MessageResponse::from).collect(),
        message: "Messages retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Count unread messages addressed to the caller
#[utoipa::path(
    get,
    path = "/api/v1/messages/unread-count",
    tag = "messages",
    responses(
        (status = 200, description = "Unread count retrieved successfully", body = ApiResponse<UnreadCountResponse>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_unread_count(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    trace!("Entering get_unread_count function");

    let count = Message::find()
        .filter(message::Column::RecipientId.eq(current_user.id))
        .filter(message::Column::IsRead.eq(false))
        .count(&state.db)
        .await?;

    let response = ApiResponse {
        data: UnreadCountResponse {
            unread_count: count,
        },
        message: "Unread count retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Mark a single received message as read
#[utoipa::path(
    put,
    path = "/api/v1/messages/{message_id}/read",
    tag = "messages",
    params(
        ("message_id" = i32, Path, description = "Message ID"),
    ),
    responses(
        (status = 200, description = "Message marked as read", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Message not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn mark_message_read(
    Path(message_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    trace!("Entering mark_message_read function for message {}", message_id);

    let message = Message::find_by_id(message_id)
        .filter(message::Column::RecipientId.eq(current_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    let mut message_active = message.into_active_model();
    message_active.is_read = Set(true);
    message_active.read_at = Set(Some(Utc::now()));
    let updated = message_active.update(&state.db).await?;

    info!("Message {} marked as read", message_id);
    let response = ApiResponse {
        data: MessageResponse::from(updated),
        message: "Message marked as read".to_string(),
        success: true,
    };
    Ok(Json(response))
}
