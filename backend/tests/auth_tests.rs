//! Authentication contract tests
//!
//! Property-based and unit tests for:
//! - Per-role signing-secret compartmentalization
//! - Username derivation rules
//! - Activation code shape
//! - Session cookie and response envelope contracts

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::types::Role;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{2,8}(\\.[a-z]{2,8})?@[a-z]{3,8}\\.(com|org|net|io)"
}

/// Generate company names with the punctuation real companies carry
fn company_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{3,12}( [A-Za-z]{2,8})?(!|\\.| & Co)?"
}

/// Generate valid passwords per the signup rules
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,6}[A-Z]{1,3}[0-9]{1,3}[!@#$%]{1,2}"
}

/// Mirror of the production username derivation rule, used to state the
/// contract independently of the implementation.
fn expected_username(email: &str, company: &str) -> String {
    let local: String = email
        .split('@')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let company: String = company
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("{}_{}", local, company).trim().to_lowercase()
}

proptest! {
    /// Derived usernames are lowercase and free of non-word characters
    /// besides the single joining underscore.
    #[test]
    fn derived_usernames_are_normalized(
        email in email_strategy(),
        company in company_strategy(),
    ) {
        let username = expected_username(&email, &company);

        prop_assert!(username.contains('_'));
        prop_assert_eq!(username.clone(), username.to_lowercase());
        prop_assert!(username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    /// Derivation is deterministic across repeated calls.
    #[test]
    fn derivation_is_deterministic(
        email in email_strategy(),
        company in company_strategy(),
    ) {
        prop_assert_eq!(
            expected_username(&email, &company),
            expected_username(&email, &company)
        );
    }

    /// Passwords from the signup grammar satisfy every strength rule.
    #[test]
    fn generated_passwords_satisfy_rules(password in password_strategy()) {
        prop_assert!(shared::validation::validate_password(&password).is_ok());
    }
}

#[test]
fn canonical_derivation_example() {
    assert_eq!(
        expected_username("jane.doe@acme.com", "Acme Corp!"),
        "janedoe_acmecorp"
    );
}

// ============================================================================
// Role secret compartmentalization
// ============================================================================

mod role_secret_tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        sub: Uuid,
        role: String,
        iat: i64,
        exp: i64,
    }

    fn secret_for(role: Role) -> &'static str {
        match role {
            Role::Admin => "admin-secret",
            Role::Forwarder => "forwarder-secret",
            Role::Bco => "bco-secret",
            Role::Chb => "chb-secret",
        }
    }

    fn sign(role: Role) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: role.tag().to_string(),
            iat: now,
            exp: now + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret_for(role).as_bytes()),
        )
        .unwrap()
    }

    /// A token minted for one role must not verify under any other role's
    /// secret: a leaked secret cannot forge cross-role sessions.
    #[test]
    fn tokens_do_not_cross_roles() {
        for minted in Role::ALL {
            let token = sign(minted);
            for verifying in Role::ALL {
                let result = decode::<Claims>(
                    &token,
                    &DecodingKey::from_secret(secret_for(verifying).as_bytes()),
                    &Validation::default(),
                );
                if verifying == minted {
                    assert!(result.is_ok(), "{minted} token should verify with its own secret");
                } else {
                    assert!(
                        result.is_err(),
                        "{minted} token must not verify with the {verifying} secret"
                    );
                }
            }
        }
    }

    #[test]
    fn claims_carry_the_role_tag() {
        let token = sign(Role::Bco);
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret_for(Role::Bco).as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.role, "bco");
    }
}

// ============================================================================
// Password hashing
// ============================================================================

mod password_tests {
    #[test]
    fn bcrypt_round_trip() {
        let hash = bcrypt::hash("Sup3r!pass", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(bcrypt::verify("Sup3r!pass", &hash).unwrap());
        assert!(!bcrypt::verify("wrong-password", &hash).unwrap());
    }
}

// ============================================================================
// Activation code shape
// ============================================================================

mod activation_code_tests {
    use rand::Rng;

    /// Codes are 4-digit numerics; leading zeros never occur because the
    /// range starts at 1000.
    #[test]
    fn codes_are_four_digits() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let code = rng.random_range(1000..=9999).to_string();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}

// ============================================================================
// Response envelope contract
// ============================================================================

mod envelope_tests {
    use shared::types::ApiResponse;

    #[test]
    fn message_only_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Logged Out successfully")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Logged Out successfully");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn data_envelope_carries_payload() {
        let body =
            serde_json::to_value(ApiResponse::data("fetched", vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
    }
}
