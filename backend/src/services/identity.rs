//! Identity provisioning
//!
//! Every account eventually carries two derived identifiers: an opaque
//! `chat_id` linking it to the external chat directory, and a human-readable
//! `username` derived from email + company. Provisioning is lazy: login and
//! profile-update fill in whichever identifier is missing.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

/// Generate a short, URL-safe, globally-unique opaque identifier.
///
/// 122 bits of randomness encoded to 22 characters; collision probability is
/// negligible and no uniqueness re-check is performed against the store.
pub fn generate_chat_id() -> String {
    URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
}

/// Derive a username from the email local part and the company name.
///
/// Non-word characters are stripped from both, the parts are joined with an
/// underscore, and the result is lowercased. The result is NOT guaranteed
/// unique; callers must run the global uniqueness check and only persist
/// after confirming no collision across all four account tables.
pub fn derive_username(email: &str, company_name: &str) -> String {
    let email_part: String = email
        .split('@')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let company_part: String = company_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    format!("{}_{}", email_part, company_part)
        .trim()
        .to_lowercase()
}

/// Normalize a caller-supplied username the same way derived ones are stored.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_username_is_deterministic() {
        let first = derive_username("jane.doe@acme.com", "Acme Corp!");
        let second = derive_username("jane.doe@acme.com", "Acme Corp!");
        assert_eq!(first, "janedoe_acmecorp");
        assert_eq!(first, second);
    }

    #[test]
    fn derive_username_strips_non_word_characters() {
        assert_eq!(
            derive_username("mr.x+test@example.org", "Señor & Co."),
            "mrxtest_seorco"
        );
        assert_eq!(derive_username("a_b@c.d", "X-Y Z"), "a_b_xyz");
    }

    #[test]
    fn chat_ids_are_url_safe_and_distinct() {
        let a = generate_chat_id();
        let b = generate_chat_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 22);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_username("  JaneDoe "), "janedoe");
    }
}
