//! Session response helpers shared by every role's auth handlers
//!
//! A successful login/activation/profile response sets the `access_token`
//! and `refresh_token` cookies (httpOnly, SameSite=Lax, secure in
//! production) and echoes the access token and chat token beside the
//! sanitized account object in the body.

use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::account::AccountRow;
use crate::AppState;
use shared::models::Account;
use shared::types::Role;

/// Sanitized account plus the tokens the frontend needs.
#[derive(Serialize)]
pub struct SessionUser {
    #[serde(flatten)]
    pub account: Account,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "chatToken", skip_serializing_if = "Option::is_none")]
    pub chat_token: Option<String>,
}

#[derive(Serialize)]
pub struct SessionBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: SessionUser,
}

/// Issue session cookies + body for an authenticated account.
pub fn send_token(
    state: &AppState,
    role: Role,
    row: AccountRow,
    status: StatusCode,
    message: Option<&str>,
) -> AppResult<Response> {
    let access_token = state.tokens.sign_access(role, row.id)?;
    let refresh_token = state.tokens.sign_refresh(role, row.id)?;

    // The chat token is minted per chat identity; accounts that have not
    // been provisioned yet simply get none.
    let chat_token = match row.chat_id.as_deref() {
        Some(chat_id) => match state.chat.mint_token(chat_id) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("chat token minting failed: {}", e);
                None
            }
        },
        None => None,
    };

    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            session_cookie(
                "access_token",
                &access_token,
                state.config.auth.access_token_expiry,
                state.config.is_production(),
            ),
        ),
        (
            SET_COOKIE,
            session_cookie(
                "refresh_token",
                &refresh_token,
                state.config.auth.refresh_token_expiry,
                state.config.is_production(),
            ),
        ),
    ]);

    let body = SessionBody {
        success: true,
        message: message.map(|m| m.to_string()),
        user: SessionUser {
            account: row.into_account(),
            access_token,
            chat_token,
        },
    };

    Ok((status, cookies, Json(body)).into_response())
}

/// Clear both session cookies. Stateless JWTs are not revoked server-side.
pub fn clear_session_cookies(production: bool) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    AppendHeaders([
        (SET_COOKIE, session_cookie("access_token", "", 0, production)),
        (SET_COOKIE, session_cookie("refresh_token", "", 0, production)),
    ])
}

fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_are_http_only_and_lax() {
        let cookie = session_cookie("access_token", "abc", 3600, false);
        assert!(cookie.starts_with("access_token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_forced_in_production() {
        let cookie = session_cookie("refresh_token", "abc", 3600, true);
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn clearing_sets_zero_max_age() {
        let cookie = session_cookie("access_token", "", 0, false);
        assert!(cookie.contains("Max-Age=0"));
    }
}
