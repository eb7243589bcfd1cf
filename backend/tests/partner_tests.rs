//! Partner-record and pagination contract tests

use proptest::prelude::*;

use shared::types::{InvitedStatus, Pagination, Role};

// ============================================================================
// Invitation lifecycle
// ============================================================================

mod invited_status_tests {
    use super::*;

    #[test]
    fn status_strings_match_stored_values() {
        assert_eq!(InvitedStatus::Pending.as_str(), "Pending");
        assert_eq!(InvitedStatus::Signup.as_str(), "Signup");
        assert_eq!(InvitedStatus::Accepted.as_str(), "Accepted");
    }

    /// Owner-created records start Pending; invitees land on Accepted,
    /// self-registrations on Signup. No transition leaves Accepted.
    #[test]
    fn lifecycle_endpoints() {
        let created = InvitedStatus::Pending;
        let after_invite_signup = InvitedStatus::Accepted;
        let self_registered = InvitedStatus::Signup;

        assert_ne!(created, after_invite_signup);
        assert_ne!(self_registered, after_invite_signup);
    }
}

// ============================================================================
// Pagination
// ============================================================================

proptest! {
    /// Offset/limit math never underflows and always pages forward.
    #[test]
    fn pagination_math_is_monotonic(page in 0u32..1000, page_size in 1u32..100) {
        let p = Pagination { page, page_size };

        prop_assert!(p.offset() >= 0);
        prop_assert_eq!(p.limit(), i64::from(page_size));

        let next = Pagination { page: page.max(1) + 1, page_size };
        prop_assert_eq!(next.offset() - p.offset(), i64::from(page_size));
    }
}

#[test]
fn pagination_defaults_match_query_contract() {
    // `?page=2` with no pageSize keeps the default of 10 per page.
    let p: Pagination = serde_json::from_str(r#"{"page": 2}"#).unwrap();
    assert_eq!(p.page, 2);
    assert_eq!(p.page_size, 10);
    assert_eq!(p.offset(), 10);

    // camelCase pageSize is honored.
    let p: Pagination = serde_json::from_str(r#"{"page": 1, "pageSize": 25}"#).unwrap();
    assert_eq!(p.page_size, 25);
}

// ============================================================================
// Role descriptors
// ============================================================================

mod role_descriptor_tests {
    use super::*;

    /// The global username check must scan every variant's table.
    #[test]
    fn all_roles_have_distinct_tables_and_tags() {
        let tables: Vec<_> = Role::ALL.iter().map(|r| r.table()).collect();
        let tags: Vec<_> = Role::ALL.iter().map(|r| r.tag()).collect();

        for (i, table) in tables.iter().enumerate() {
            for (j, other) in tables.iter().enumerate() {
                if i != j {
                    assert_ne!(table, other);
                }
            }
        }
        assert_eq!(tags, vec!["admin", "forwarder", "bco", "chb"]);
    }

    #[test]
    fn tags_round_trip_through_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }
}

// ============================================================================
// Direct-channel naming
// ============================================================================

proptest! {
    /// The two-member channel id is order-independent, so both sides of a
    /// conversation resolve to the same channel.
    #[test]
    fn channel_id_is_order_independent(
        a in "[a-zA-Z0-9_-]{4,22}",
        b in "[a-zA-Z0-9_-]{4,22}",
    ) {
        fn channel_id(a: &str, b: &str) -> String {
            let mut pair = [a, b];
            pair.sort_unstable();
            pair.join("-")
        }

        prop_assert_eq!(channel_id(&a, &b), channel_id(&b, &a));
    }
}
