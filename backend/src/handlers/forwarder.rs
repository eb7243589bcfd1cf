//! Forwarder admin handlers: two-phase signup, session management, and
//! importer management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{validate_payload, AppError, AppResult};
use crate::handlers::requests::{
    ActivationRequest, LoginRequest, RegisterRequest, ResendRequest, UpdateProfileRequest,
};
use crate::handlers::session::{clear_session_cookies, send_token};
use crate::middleware::CurrentUser;
use crate::services::account::RegisterInput;
use crate::services::company::{CompanyDetailsInput, ContactPersonInput};
use crate::AppState;
use shared::models::{ImporterRecord, InvitePayload};
use shared::types::{ApiResponse, PaginatedRecords, Pagination, Role};

/// Registration response carrying the activation token the client replays
/// to `activate-user` with the emailed code.
#[derive(Serialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "activationToken")]
    pub activation_token: String,
}

/// POST /forwarder/registration
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    validate_payload(&body)?;

    let email = body.email.clone();
    let activation = state
        .accounts()
        .begin_registration(
            Role::Forwarder,
            RegisterInput {
                full_name: body.full_name,
                email: body.email,
                password: body.password,
                company_name: body.company_name,
            },
        )
        .await?;

    send_activation_mail(&state, &email, &activation.activation_code).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            success: true,
            message: format!(
                "Please check your email: {} to activate your account!",
                email
            ),
            activation_token: activation.token,
        }),
    ))
}

/// POST /forwarder/activate-user
pub async fn activate_user(
    State(state): State<AppState>,
    Json(body): Json<ActivationRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .activate(Role::Forwarder, &body.activation_token, &body.activation_code)
        .await?;

    send_token(&state, Role::Forwarder, row, StatusCode::CREATED, None)
}

/// POST /forwarder/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .login(Role::Forwarder, &body.email, &body.password)
        .await?;

    send_token(&state, Role::Forwarder, row, StatusCode::OK, None)
}

/// GET /forwarder/logout
pub async fn logout(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    (
        clear_session_cookies(state.config.is_production()),
        Json(ApiResponse::message("Logged Out successfully")),
    )
}

/// GET /forwarder/user
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let row = state.accounts().get_profile(Role::Forwarder, user.id).await?;
    send_token(&state, Role::Forwarder, row, StatusCode::OK, None)
}

/// POST /forwarder/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .update_profile(Role::Forwarder, user.id, body.into())
        .await?;

    send_token(&state, Role::Forwarder, row, StatusCode::OK, None)
}

/// POST /forwarder/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    validate_payload(&body)?;

    let reissued = state
        .accounts()
        .resend_activation(Role::Forwarder, &body.activation_token)
        .await?;

    let (pending, _) = state.tokens.peek_activation(&reissued.token)?;
    send_activation_mail(&state, &pending.email, &reissued.activation_code).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            success: true,
            message: "OTP Sent Successfully!".to_string(),
            activation_token: reissued.token,
        }),
    ))
}

pub(crate) async fn send_activation_mail(
    state: &AppState,
    email: &str,
    activation_code: &str,
) -> AppResult<()> {
    state
        .mail
        .send(
            email,
            "Activate Your KARGO Account",
            "activation-mail",
            &json!({ "activationCode": activation_code }),
        )
        .await
}

// ============================================================================
// Importer management
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddImporterRequest {
    #[validate]
    pub contact_person: ContactPersonInput,
    #[validate]
    pub company_details: CompanyDetailsInput,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditImporterRequest {
    #[validate]
    pub updated_contact_person: ContactPersonInput,
    #[validate]
    pub updated_company_details: CompanyDetailsInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImporterRequest {
    pub importer_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    pub id: Option<Uuid>,
}

type ImporterListResponse = Json<ApiResponse<PaginatedRecords<ImporterRecord>>>;

async fn importer_list(
    state: &AppState,
    forwarder_id: Uuid,
    page: &Pagination,
    message: &str,
) -> AppResult<ImporterListResponse> {
    let records = state.importers().list(forwarder_id, page).await?;
    Ok(Json(ApiResponse::data(message, records)))
}

/// GET /forwarder
pub async fn dashboard_data(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
) -> AppResult<ImporterListResponse> {
    importer_list(&state, user.id, &page, "Importer fetched successfully!").await
}

/// POST /forwarder/add-importer
pub async fn add_importer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
    Json(body): Json<AddImporterRequest>,
) -> AppResult<ImporterListResponse> {
    validate_payload(&body)?;

    let forwarder = state.accounts().get_profile(Role::Forwarder, user.id).await?;
    let importers = state.importers();

    if importers
        .company_name_in_use(forwarder.id, &body.company_details.company_name, None)
        .await?
    {
        return Err(AppError::Conflict(
            "This company name is already in use!".to_string(),
        ));
    }

    let companies = state.companies();
    let company = companies.create_company(&body.company_details).await?;
    let contact = companies
        .create_contact(&body.contact_person, company.id)
        .await?;

    if let Some(tier) = body.contact_person.tier.as_deref() {
        companies.upsert_company_tier(company.id, tier).await?;
    }

    importers
        .create(
            &body.contact_person.full_name,
            &contact.email_address,
            forwarder.id,
            contact.id,
            company.id,
        )
        .await?;

    importer_list(&state, user.id, &page, "Importer created successfully!").await
}

/// PUT /forwarder/edit-importer/:importer_id
pub async fn edit_importer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(importer_id): Path<Uuid>,
    Query(page): Query<Pagination>,
    Json(body): Json<EditImporterRequest>,
) -> AppResult<ImporterListResponse> {
    validate_payload(&body)?;

    let importers = state.importers();
    let existing = importers
        .find_by_id(importer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Importer".to_string()))?;

    if importers
        .company_name_in_use(
            user.id,
            &body.updated_company_details.company_name,
            Some(importer_id),
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
            .update_company(company_id, &body.updated_company_details)
            .await?;

        if let Some(contact_id) = existing.contact_id {
            companies
                .update_contact(contact_id, &body.updated_contact_person, company_id)
                .await?;
        }

        if let Some(tier) = body.updated_contact_person.tier.as_deref() {
            companies.upsert_company_tier(company_id, tier).await?;
        }
    }

    importers
        .update_names(
            existing.id,
            &body.updated_contact_person.full_name,
            &body.updated_contact_person.email,
        )
        .await?;

    importer_list(&state, user.id, &page, "Importer updated successfully!").await
}

/// DELETE /forwarder/delete-importer
pub async fn delete_importer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
    Json(body): Json<DeleteImporterRequest>,
) -> AppResult<ImporterListResponse> {
    let importers = state.importers();

    importers
        .find_by_id(body.importer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Importer".to_string()))?;

    importers.delete(body.importer_id).await?;

    importer_list(&state, user.id, &page, "Importer deleted successfully!").await
}

/// POST /forwarder/invite-importer
pub async fn invite_importer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
    Json(body): Json<InviteRequest>,
) -> AppResult<ImporterListResponse> {
    validate_payload(&body)?;

    let forwarder = state.accounts().get_profile(Role::Forwarder, user.id).await?;

    send_invite_mail(
        &state,
        "KARGO Importer Invitation Email",
        &forwarder.full_name,
        &body,
    )
    .await?;

    importer_list(
        &state,
        user.id,
        &page,
        "Please check your email: Invite sent to your account!",
    )
    .await
}

/// Build the signed signup link and deliver the invitation mail. Shared by
/// the importer and supplier invite endpoints.
pub(crate) async fn send_invite_mail(
    state: &AppState,
    subject: &str,
    inviter_full_name: &str,
    body: &InviteRequest,
) -> AppResult<()> {
    let invite_token = state.tokens.issue_invite(InvitePayload {
        id: body.id,
        email: body.email.clone(),
        company_name: body.company_name.clone(),
        full_name: body.full_name.clone(),
    })?;

    let signup_link = format!(
        "{}/auth/bco/signup?invite={}",
        state.config.frontend.base_url, invite_token
    );

    state
        .mail
        .send(
            &body.email,
            subject,
            "invite-mail",
            &json!({
                "invitedName": body.full_name,
                "inviterFullName": inviter_full_name,
                "inviterCompanyName": body.company_name,
                "signupLink": signup_link,
            }),
        )
        .await
}
