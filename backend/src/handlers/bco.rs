//! BCO handlers: invite-driven signup, session management, and supplier
//! management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{validate_payload, AppError, AppResult};
use crate::handlers::forwarder::{send_invite_mail, InviteRequest};
use crate::handlers::requests::{LoginRequest, UpdateProfileRequest};
use crate::handlers::session::{clear_session_cookies, send_token};
use crate::middleware::CurrentUser;
use crate::services::account::BcoSignupInput;
use crate::services::company::{CompanyDetailsInput, ContactPersonInput};
use crate::AppState;
use shared::models::{InvitePayload, SupplierRecord};
use shared::types::{ApiResponse, PaginatedRecords, Pagination, Role};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BcoRegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom = "shared::validation::password_strength")]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    /// Importer record the invite referred to, when signing up from a link.
    pub id: Option<Uuid>,
    pub invite_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupLinkRequest {
    pub invite_token: Option<String>,
}

/// POST /bco/get-user-details: pre-fill a signup form from an invite link.
pub async fn get_user_details(
    State(state): State<AppState>,
    Json(body): Json<SignupLinkRequest>,
) -> AppResult<Json<ApiResponse<InvitePayload>>> {
    let token = body.invite_token.ok_or(AppError::InvalidInvite)?;
    let details = state.tokens.verify_invite(&token)?;

    Ok(Json(ApiResponse::data("BCO details fetched!", details)))
}

/// POST /bco/registration
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<BcoRegisterRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .register_bco(BcoSignupInput {
            full_name: body.full_name,
            email: body.email,
            password: body.password,
            company_name: body.company_name,
            invite_token: body.invite_token,
        })
        .await?;

    // An invited importer becomes Accepted once its invitee holds an account.
    if let Some(importer_id) = body.id {
        state.importers().mark_accepted(importer_id).await?;
    }

    send_token(&state, Role::Bco, row, StatusCode::OK, Some("Signup Successfully!"))
}

/// POST /bco/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .login(Role::Bco, &body.email, &body.password)
        .await?;

    send_token(&state, Role::Bco, row, StatusCode::OK, Some("Login successfully!"))
}

/// GET /bco/logout
pub async fn logout(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    (
        clear_session_cookies(state.config.is_production()),
        Json(ApiResponse::message("Logged Out successfully")),
    )
}

/// GET /bco/user
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let row = state.accounts().get_profile(Role::Bco, user.id).await?;
    send_token(
        &state,
        Role::Bco,
        row,
        StatusCode::OK,
        Some("Profile fetched successfully!"),
    )
}

/// POST /bco/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .update_profile(Role::Bco, user.id, body.into())
        .await?;

    send_token(
        &state,
        Role::Bco,
        row,
        StatusCode::OK,
        Some("Profile Updated successfully!"),
    )
}

// ============================================================================
// Supplier management
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddSupplierRequest {
    #[validate]
    pub contact_person: ContactPersonInput,
    #[validate]
    pub company_details: CompanyDetailsInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSupplierRequest {
    pub data_id: Uuid,
}

type SupplierListResponse = Json<ApiResponse<PaginatedRecords<SupplierRecord>>>;

async fn supplier_list(
    state: &AppState,
    bco_id: Uuid,
    page: &Pagination,
    message: &str,
) -> AppResult<SupplierListResponse> {
    let records = state.suppliers().list(bco_id, page).await?;
    Ok(Json(ApiResponse::data(message, records)))
}

/// GET /bco
pub async fn fetch_dashboard_data(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
) -> AppResult<SupplierListResponse> {
    supplier_list(&state, user.id, &page, "Supplier fetched successfully!").await
}

/// POST /bco/add
pub async fn add_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
    Json(body): Json<AddSupplierRequest>,
) -> AppResult<SupplierListResponse> {
    validate_payload(&body)?;

    let bco = state.accounts().get_profile(Role::Bco, user.id).await?;
    let suppliers = state.suppliers();

    if suppliers
        .company_name_in_use(bco.id, &body.company_details.company_name, None)
        .await?
    {
        return Err(AppError::Conflict(
            "This company name is already in use!".to_string(),
        ));
    }

    // product/port live on the supplier record, not the company.
    let companies = state.companies();
    let company = companies.create_company(&body.company_details).await?;
    let contact = companies
        .create_contact(&body.contact_person, company.id)
        .await?;

    suppliers
        .create(
            &body.contact_person.full_name,
            &contact.email_address,
            body.company_details.product.as_deref(),
            body.company_details.port.as_deref(),
            bco.id,
            contact.id,
            company.id,
        )
        .await?;

    supplier_list(&state, user.id, &page, "Supplier created successfully!").await
}

/// PUT /bco/edit/:supplier_id
pub async fn edit_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Query(page): Query<Pagination>,
    Json(body): Json<AddSupplierRequest>,
) -> AppResult<SupplierListResponse> {
    validate_payload(&body)?;

    let suppliers = state.suppliers();
    let existing = suppliers
        .find_by_id(supplier_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

    if suppliers
        .company_name_in_use(
            user.id,
            &body.company_details.company_name,
            Some(supplier_id),
        )
        .await?
    {
        return Err(AppError::Conflict(
            "This company name is already in use!".to_string(),
        ));
    }

    let companies = state.companies();
    if let Some(company_id) = existing.company_id {
        companies
            .update_company(company_id, &body.company_details)
            .await?;

        if let Some(contact_id) = existing.contact_id {
            companies
                .update_contact(contact_id, &body.contact_person, company_id)
                .await?;
        }
    }

    suppliers
        .update_shipping_details(
            existing.id,
            body.company_details.product.as_deref(),
            body.company_details.port.as_deref(),
        )
        .await?;

    supplier_list(&state, user.id, &page, "Supplier updated successfully!").await
}

/// DELETE /bco/delete
pub async fn delete_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
    Json(body): Json<DeleteSupplierRequest>,
) -> AppResult<SupplierListResponse> {
    let suppliers = state.suppliers();

    suppliers
        .find_by_id(body.data_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

    suppliers.delete(body.data_id).await?;

    supplier_list(&state, user.id, &page, "Supplier deleted successfully!").await
}

/// POST /bco/invite
pub async fn invite_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
    Json(body): Json<InviteRequest>,
) -> AppResult<SupplierListResponse> {
    validate_payload(&body)?;

    let bco = state.accounts().get_profile(Role::Bco, user.id).await?;

    send_invite_mail(
        &state,
        "KARGO Supplier Invitation Email",
        &bco.full_name,
        &body,
    )
    .await?;

    supplier_list(
        &state,
        user.id,
        &page,
        "Please check your email: Invite sent to your account!",
    )
    .await
}
