//! Chat proxy handlers: thin delegations to the chat directory, open to
//! every authenticated role

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::external::chat::{direct_channel_id, ChatMessage, ChatUser};
use crate::AppState;
use shared::types::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct ChatTokenData {
    pub token: String,
}

/// POST /chat/generate-token
pub async fn generate_token(
    State(state): State<AppState>,
    Json(body): Json<GenerateTokenRequest>,
) -> AppResult<Json<ApiResponse<ChatTokenData>>> {
    if body.user_id.is_empty() {
        return Err(AppError::Validation(
            "Missing required field: userId".to_string(),
        ));
    }

    let token = state.chat.mint_token(&body.user_id)?;
    Ok(Json(ApiResponse::data(
        "Chat token generated successfully",
        ChatTokenData { token },
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatUserRequest {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// POST /chat/create-user
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateChatUserRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if body.username.is_empty() {
        return Err(AppError::Validation(
            "Missing required field: username".to_string(),
        ));
    }

    state
        .chat
        .upsert_users(&[ChatUser {
            id: body.user_id,
            name: body.name,
            username: body.username.clone(),
            avatar: body.avatar,
        }])
        .await?;

    Ok(Json(ApiResponse::message(format!(
        "User {} created/updated successfully",
        body.username
    ))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatUserRequest {
    pub user_id: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

/// POST /chat/update-user: merge the update over the existing entry.
pub async fn update_user(
    State(state): State<AppState>,
    Json(body): Json<UpdateChatUserRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if body.user_id.is_empty() {
        return Err(AppError::Validation(
            "Missing required field: userId".to_string(),
        ));
    }

    let existing = state
        .chat
        .get_user(&body.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    state
        .chat
        .upsert_users(&[ChatUser {
            id: body.user_id.clone(),
            name: body.name.unwrap_or(existing.name),
            username: body.username.unwrap_or(existing.username),
            avatar: body.avatar.unwrap_or(existing.avatar),
        }])
        .await?;

    Ok(Json(ApiResponse::message(format!(
        "User {} updated successfully",
        body.user_id
    ))))
}

#[derive(Serialize)]
pub struct ChatUsersData {
    pub users: Vec<ChatUser>,
}

/// POST /chat/users
pub async fn get_all_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ChatUsersData>>> {
    let users = state.chat.query_users().await?;
    Ok(Json(ApiResponse::data(
        "Chat users fetched successfully",
        ChatUsersData { users },
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub username: String,
    pub target_user: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelData {
    pub channel_id: String,
    pub messages: Vec<ChatMessage>,
}

/// POST /chat/create-chat: create (or fetch) the direct channel between two
/// directory users and return its messages.
pub async fn create_chat(
    State(state): State<AppState>,
    Json(body): Json<CreateChatRequest>,
) -> AppResult<Json<ApiResponse<ChannelData>>> {
    let channel_id = direct_channel_id(&body.username, &body.target_user);

    let members = [body.username.clone(), body.target_user.clone()];
    let users: Vec<ChatUser> = members
        .iter()
        .map(|id| ChatUser {
            id: id.clone(),
            ..ChatUser::default()
        })
        .collect();
    state.chat.upsert_users(&users).await?;

    let messages = state
        .chat
        .create_channel(&channel_id, &members, &body.username)
        .await?;

    Ok(Json(ApiResponse::data(
        "Chat created successfully",
        ChannelData {
            channel_id,
            messages,
        },
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub username: String,
    pub target_user: String,
    pub message: String,
}

/// POST /chat/send-message
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let channel_id = direct_channel_id(&body.username, &body.target_user);

    state
        .chat
        .send_to_channel(&channel_id, &body.message, &body.username)
        .await?;

    Ok(Json(ApiResponse::message("Message sent successfully")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendToChannelRequest {
    pub user_id: String,
    pub target_user: String,
    pub message: String,
}

/// POST /chat/send-message-to-channel
pub async fn send_message_to_channel(
    State(state): State<AppState>,
    Json(body): Json<SendToChannelRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if body.user_id.is_empty() || body.message.is_empty() {
        return Err(AppError::Validation(
            "Missing required fields: channelId, text, or userId".to_string(),
        ));
    }

    let channel_id = direct_channel_id(&body.user_id, &body.target_user);

    state
        .chat
        .send_to_channel(&channel_id, &body.message, &body.user_id)
        .await?;

    Ok(Json(ApiResponse::message("Message sent successfully")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMembersRequest {
    pub channel_id: String,
    pub members: Vec<String>,
}

/// POST /chat/add-members-to-channel
pub async fn add_members_to_channel(
    State(state): State<AppState>,
    Json(body): Json<AddMembersRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if body.channel_id.is_empty() || body.members.is_empty() {
        return Err(AppError::Validation(
            "Missing required fields: channelId or members".to_string(),
        ));
    }

    state
        .chat
        .add_members(&body.channel_id, &body.members)
        .await?;

    Ok(Json(ApiResponse::message("Members added successfully")))
}
