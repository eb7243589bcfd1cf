//! Superadmin handlers: direct signup, session management, and cross-role
//! list/delete surfaces

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{validate_payload, AppError, AppResult};
use crate::handlers::requests::LoginRequest;
use crate::handlers::session::{clear_session_cookies, send_token};
use crate::middleware::CurrentUser;
use crate::services::account::AdminSignupInput;
use crate::AppState;
use shared::models::{Account, SupplierRecord};
use shared::types::{ApiResponse, PaginatedRecords, Pagination, Role};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(custom = "shared::validation::password_strength")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub data_id: Uuid,
}

/// POST /admin/registration
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<AdminRegisterRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .admin_signup(AdminSignupInput {
            full_name: body.full_name,
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await?;

    send_token(
        &state,
        Role::Admin,
        row,
        StatusCode::OK,
        Some("Signup Successfully!"),
    )
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .login(Role::Admin, &body.email, &body.password)
        .await?;

    send_token(
        &state,
        Role::Admin,
        row,
        StatusCode::OK,
        Some("Login successfully!"),
    )
}

/// GET /admin/logout
pub async fn logout(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    (
        clear_session_cookies(state.config.is_production()),
        Json(ApiResponse::message("Logged out successfully")),
    )
}

/// GET /admin/user
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let row = state.accounts().get_profile(Role::Admin, user.id).await?;
    send_token(
        &state,
        Role::Admin,
        row,
        StatusCode::OK,
        Some("Profile fetched successfully!"),
    )
}

// ============================================================================
// Cross-role lists and deletes
// ============================================================================

type AccountListResponse = Json<ApiResponse<PaginatedRecords<Account>>>;

async fn account_list(
    state: &AppState,
    role: Role,
    page: &Pagination,
    message: &str,
) -> AppResult<AccountListResponse> {
    let records = state.accounts().list(role, page).await?;
    Ok(Json(ApiResponse::data(message, records)))
}

/// GET /admin/forwarder/list
pub async fn list_forwarders(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<AccountListResponse> {
    account_list(
        &state,
        Role::Forwarder,
        &page,
        "Forwarder Admin list fetched successfully!",
    )
    .await
}

/// GET /admin/bco/list
pub async fn list_bcos(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<AccountListResponse> {
    account_list(&state, Role::Bco, &page, "BCO list fetched successfully!").await
}

/// GET /admin/chb/list
pub async fn list_chbs(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<AccountListResponse> {
    account_list(&state, Role::Chb, &page, "CHB list fetched successfully!").await
}

/// GET /admin/supplier/list
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PaginatedRecords<SupplierRecord>>>> {
    let records = state.suppliers().list_all(&page).await?;
    Ok(Json(ApiResponse::data(
        "Supplier list fetched successfully!",
        records,
    )))
}

/// DELETE /admin/forwarder/delete
pub async fn delete_forwarder(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Json(body): Json<DeleteRequest>,
) -> AppResult<AccountListResponse> {
    let accounts = state.accounts();

    accounts
        .find_by_id(Role::Forwarder, body.data_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Forwarder Admin".to_string()))?;

    accounts.delete(Role::Forwarder, body.data_id).await?;

    account_list(
        &state,
        Role::Forwarder,
        &page,
        "Forwarder Admin deleted successfully!",
    )
    .await
}

/// DELETE /admin/bco/delete
pub async fn delete_bco(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Json(body): Json<DeleteRequest>,
) -> AppResult<AccountListResponse> {
    let accounts = state.accounts();

    accounts
        .find_by_id(Role::Bco, body.data_id)
        .await?
        .ok_or_else(|| AppError::NotFound("BCO".to_string()))?;

    accounts.delete(Role::Bco, body.data_id).await?;

    account_list(&state, Role::Bco, &page, "BCO Deleted Successfully!").await
}

/// DELETE /admin/chb/delete
pub async fn delete_chb(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Json(body): Json<DeleteRequest>,
) -> AppResult<AccountListResponse> {
    let accounts = state.accounts();

    accounts
        .find_by_id(Role::Chb, body.data_id)
        .await?
        .ok_or_else(|| AppError::NotFound("CHB".to_string()))?;

    accounts.delete(Role::Chb, body.data_id).await?;

    account_list(&state, Role::Chb, &page, "CHB deleted successfully!").await
}

/// DELETE /admin/supplier/delete
pub async fn delete_supplier(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Json(body): Json<DeleteRequest>,
) -> AppResult<Json<ApiResponse<PaginatedRecords<SupplierRecord>>>> {
    let suppliers = state.suppliers();

    suppliers
        .find_by_id(body.data_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

    suppliers.delete(body.data_id).await?;

    let records = suppliers.list_all(&page).await?;
    Ok(Json(ApiResponse::data(
        "Supplier deleted successfully!",
        records,
    )))
}
