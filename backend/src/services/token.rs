//! Token issuance and verification
//!
//! Three token families share this module: role-scoped session tokens
//! (access + refresh, one signing secret per role), time-boxed activation
//! tokens carrying a pending registration plus a 4-digit code, and 1-day
//! invite tokens carrying invitee identity for signup pre-fill.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};
use shared::models::{InvitePayload, PendingAccount};
use shared::types::Role;

/// Activation token TTL: the emailed code is only good for 15 minutes.
const ACTIVATION_TTL_MINUTES: i64 = 15;

/// Invite token TTL.
const INVITE_TTL_DAYS: i64 = 1;

/// Session token claims. The role claim makes the expected verification
/// secret explicit instead of being inferred from the request path.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of an activation token.
#[derive(Debug, Serialize, Deserialize)]
struct ActivationClaims {
    user: PendingAccount,
    activation_code: String,
    iat: i64,
    exp: i64,
}

/// Claims of an invite token.
#[derive(Debug, Serialize, Deserialize)]
struct InviteClaims {
    #[serde(flatten)]
    payload: InvitePayload,
    iat: i64,
    exp: i64,
}

/// A freshly issued activation token and its out-of-band code.
#[derive(Debug, Clone)]
pub struct ActivationToken {
    pub token: String,
    pub activation_code: String,
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    auth: AuthConfig,
}

impl TokenService {
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth }
    }

    fn secret_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.auth.admin_secret,
            Role::Forwarder => &self.auth.forwarder_secret,
            Role::Bco => &self.auth.bco_secret,
            Role::Chb => &self.auth.chb_secret,
        }
    }

    fn sign_session(&self, role: Role, id: Uuid, lifetime_secs: i64) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: id,
            role: role.tag().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime_secs)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_for(role).as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Mint a short-lived access token for the given principal.
    pub fn sign_access(&self, role: Role, id: Uuid) -> AppResult<String> {
        self.sign_session(role, id, self.auth.access_token_expiry)
    }

    /// Mint the longer-lived refresh token.
    pub fn sign_refresh(&self, role: Role, id: Uuid) -> AppResult<String> {
        self.sign_session(role, id, self.auth.refresh_token_expiry)
    }

    /// Verify a session token against one role's secret.
    ///
    /// Expired tokens and tampered/wrong-role tokens map to distinct errors
    /// so the client can tell a stale session from an invalid one.
    pub fn verify(&self, role: Role, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_for(role).as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        if data.claims.role != role.tag() {
            return Err(AppError::InvalidToken);
        }

        Ok(data.claims)
    }

    /// Verify a session token from any role: the claimed role selects the
    /// secret, then the signature is fully checked against it.
    pub fn verify_any(&self, token: &str) -> AppResult<Claims> {
        let role = peek_role(token)?;
        self.verify(role, token)
    }

    /// Issue an activation token for a pending registration.
    pub fn issue_activation(&self, pending: PendingAccount) -> AppResult<ActivationToken> {
        let code = rand::rng().random_range(1000..=9999).to_string();
        self.sign_activation(pending, code)
    }

    /// Re-sign a fresh activation token carrying the same payload and code;
    /// the original token stays valid until its own expiry.
    pub fn reissue_activation(
        &self,
        pending: PendingAccount,
        code: String,
    ) -> AppResult<ActivationToken> {
        self.sign_activation(pending, code)
    }

    fn sign_activation(
        &self,
        pending: PendingAccount,
        activation_code: String,
    ) -> AppResult<ActivationToken> {
        let now = Utc::now();
        let claims = ActivationClaims {
            user: pending,
            activation_code: activation_code.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ACTIVATION_TTL_MINUTES)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.auth.activation_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(ActivationToken {
            token,
            activation_code,
        })
    }

    fn decode_activation(&self, token: &str) -> AppResult<ActivationClaims> {
        decode::<ActivationClaims>(
            token,
            &DecodingKey::from_secret(self.auth.activation_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ActivationExpired,
            _ => AppError::InvalidActivationToken,
        })
    }

    /// Consume an activation token: verify signature and expiry, then check
    /// the supplied code against the embedded one.
    ///
    /// The token itself is single-use only by virtue of the email-uniqueness
    /// re-check the caller performs before creating the account.
    pub fn consume_activation(&self, token: &str, code: &str) -> AppResult<PendingAccount> {
        let claims = self.decode_activation(token)?;
        if claims.activation_code != code {
            return Err(AppError::InvalidActivationCode);
        }
        Ok(claims.user)
    }

    /// Recover the pending payload and code from a still-valid activation
    /// token, for the resend flow.
    pub fn peek_activation(&self, token: &str) -> AppResult<(PendingAccount, String)> {
        let claims = self.decode_activation(token)?;
        Ok((claims.user, claims.activation_code))
    }

    /// Issue a 1-day invite token carrying invitee identity.
    pub fn issue_invite(&self, payload: InvitePayload) -> AppResult<String> {
        let now = Utc::now();
        let claims = InviteClaims {
            payload,
            iat: now.timestamp(),
            exp: (now + Duration::days(INVITE_TTL_DAYS)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.auth.invite_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Verify an invite token and return its payload. Expired and tampered
    /// tokens both surface as an invalid invite.
    pub fn verify_invite(&self, token: &str) -> AppResult<InvitePayload> {
        decode::<InviteClaims>(
            token,
            &DecodingKey::from_secret(self.auth.invite_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims.payload)
        .map_err(|_| AppError::InvalidInvite)
    }
}

/// Read the unverified role claim so the right secret can be selected. The
/// claim is only trusted after the full signature check that follows.
fn peek_role(token: &str) -> AppResult<Role> {
    #[derive(Deserialize)]
    struct RoleOnly {
        role: String,
    }

    let payload = token.split('.').nth(1).ok_or(AppError::InvalidToken)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AppError::InvalidToken)?;
    let claims: RoleOnly = serde_json::from_slice(&bytes).map_err(|_| AppError::InvalidToken)?;
    Role::from_tag(&claims.role).ok_or(AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            admin_secret: "admin-secret".into(),
            forwarder_secret: "forwarder-secret".into(),
            bco_secret: "bco-secret".into(),
            chb_secret: "chb-secret".into(),
            activation_secret: "activation-secret".into(),
            invite_secret: "invite-secret".into(),
            access_token_expiry: 3600,
            refresh_token_expiry: 864_000,
        }
    }

    fn pending() -> PendingAccount {
        PendingAccount {
            full_name: "Jane Doe".into(),
            email: "jane@acme.com".into(),
            company_name: "Acme".into(),
            password_hash: "$2b$10$hash".into(),
        }
    }

    #[test]
    fn access_token_verifies_only_with_its_own_role_secret() {
        let service = TokenService::new(test_auth_config());
        let id = Uuid::new_v4();
        let token = service.sign_access(Role::Bco, id).unwrap();

        let claims = service.verify(Role::Bco, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, "bco");

        for role in [Role::Admin, Role::Forwarder, Role::Chb] {
            assert!(matches!(
                service.verify(role, &token),
                Err(AppError::InvalidToken)
            ));
        }
    }

    #[test]
    fn verify_any_selects_secret_from_role_claim() {
        let service = TokenService::new(test_auth_config());
        let id = Uuid::new_v4();
        let token = service.sign_access(Role::Chb, id).unwrap();

        let claims = service.verify_any(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, "chb");

        assert!(matches!(
            service.verify_any("not-a-token"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_session_is_distinguished_from_invalid() {
        let mut auth = test_auth_config();
        // Expired well past the default validation leeway.
        auth.access_token_expiry = -120;
        let service = TokenService::new(auth);
        let token = service.sign_access(Role::Forwarder, Uuid::new_v4()).unwrap();

        assert!(matches!(
            service.verify(Role::Forwarder, &token),
            Err(AppError::TokenExpired)
        ));
        assert!(matches!(
            service.verify(Role::Forwarder, "garbage"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn activation_round_trip_and_code_check() {
        let service = TokenService::new(test_auth_config());
        let issued = service.issue_activation(pending()).unwrap();

        assert_eq!(issued.activation_code.len(), 4);
        assert!(issued.activation_code.chars().all(|c| c.is_ascii_digit()));

        let recovered = service
            .consume_activation(&issued.token, &issued.activation_code)
            .unwrap();
        assert_eq!(recovered.email, "jane@acme.com");

        assert!(matches!(
            service.consume_activation(&issued.token, "0000"),
            Err(AppError::InvalidActivationCode)
        ));
    }

    #[test]
    fn expired_activation_fails_even_with_correct_code() {
        let auth = test_auth_config();
        let service = TokenService::new(auth.clone());

        // Hand-craft an already-expired token with the real secret.
        let now = Utc::now();
        let claims = ActivationClaims {
            user: pending(),
            activation_code: "1234".into(),
            iat: (now - Duration::minutes(30)).timestamp(),
            exp: (now - Duration::minutes(15)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.activation_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.consume_activation(&token, "1234"),
            Err(AppError::ActivationExpired)
        ));
    }

    #[test]
    fn resend_reissues_same_payload_and_code() {
        let service = TokenService::new(test_auth_config());
        let issued = service.issue_activation(pending()).unwrap();

        let (user, code) = service.peek_activation(&issued.token).unwrap();
        assert_eq!(code, issued.activation_code);
        assert_eq!(user.email, "jane@acme.com");

        // A fresh token carries the same code and both remain consumable.
        let fresh = service.reissue_activation(user, code.clone()).unwrap();
        assert_eq!(fresh.activation_code, issued.activation_code);
        assert!(service.consume_activation(&fresh.token, &code).is_ok());
        assert!(service.consume_activation(&issued.token, &code).is_ok());
    }

    #[test]
    fn invite_round_trip() {
        let service = TokenService::new(test_auth_config());
        let payload = InvitePayload {
            id: Some(Uuid::new_v4()),
            email: "importer@cargo.io".into(),
            company_name: "Cargo Importers".into(),
            full_name: "Imp Orter".into(),
        };

        let token = service.issue_invite(payload.clone()).unwrap();
        assert_eq!(service.verify_invite(&token).unwrap(), payload);

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(
            service.verify_invite(&tampered),
            Err(AppError::InvalidInvite)
        ));
    }
}
