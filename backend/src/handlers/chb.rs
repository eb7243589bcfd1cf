//! Customs-house broker handlers, structurally parallel to the forwarder
//! auth flow

use axum::{extract::State, http::StatusCode, response::Response, Json};

use crate::error::{validate_payload, AppResult};
use crate::handlers::forwarder::{send_activation_mail, RegistrationResponse};
use crate::handlers::requests::{
    ActivationRequest, LoginRequest, RegisterRequest, ResendRequest, UpdateProfileRequest,
};
use crate::handlers::session::{clear_session_cookies, send_token};
use crate::middleware::CurrentUser;
use crate::services::account::RegisterInput;
use crate::AppState;
use shared::types::{ApiResponse, Role};

/// POST /chb/registration
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    validate_payload(&body)?;

    let email = body.email.clone();
    let activation = state
        .accounts()
        .begin_registration(
            Role::Chb,
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

/// POST /chb/activate-user
pub async fn activate_user(
    State(state): State<AppState>,
    Json(body): Json<ActivationRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .activate(Role::Chb, &body.activation_token, &body.activation_code)
        .await?;

    send_token(
        &state,
        Role::Chb,
        row,
        StatusCode::CREATED,
        Some("Activation Successfully!"),
    )
}

/// POST /chb/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .login(Role::Chb, &body.email, &body.password)
        .await?;

    send_token(&state, Role::Chb, row, StatusCode::OK, Some("Login Successfully!"))
}

/// GET /chb/logout
pub async fn logout(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    (
        clear_session_cookies(state.config.is_production()),
        Json(ApiResponse::message("Logged Out successfully")),
    )
}

/// GET /chb/user
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let row = state.accounts().get_profile(Role::Chb, user.id).await?;
    send_token(
        &state,
        Role::Chb,
        row,
        StatusCode::OK,
        Some("User profile fetched successfully!"),
    )
}

/// POST /chb/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Response> {
    validate_payload(&body)?;

    let row = state
        .accounts()
        .update_profile(Role::Chb, user.id, body.into())
        .await?;

    send_token(
        &state,
        Role::Chb,
        row,
        StatusCode::OK,
        Some("Profile Updated Successfully!"),
    )
}

/// POST /chb/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    validate_payload(&body)?;

    let reissued = state
        .accounts()
        .resend_activation(Role::Chb, &body.activation_token)
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
