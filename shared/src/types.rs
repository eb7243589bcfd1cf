//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// The four account variants of the back-office.
///
/// Each role owns its own account table and its own JWT signing secret, so a
/// leaked secret for one role cannot forge sessions for another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Forwarder,
    Bco,
    Chb,
}

impl Role {
    /// Account table backing this role.
    pub fn table(&self) -> &'static str {
        match self {
            Role::Admin => "admins",
            Role::Forwarder => "forwarder_admins",
            Role::Bco => "bco_accounts",
            Role::Chb => "chb_accounts",
        }
    }

    /// Role tag stored on the account row and carried in token claims.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Forwarder => "forwarder",
            Role::Bco => "bco",
            Role::Chb => "chb",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag {
            "admin" => Some(Role::Admin),
            "forwarder" => Some(Role::Forwarder),
            "bco" => Some(Role::Bco),
            "chb" => Some(Role::Chb),
            _ => None,
        }
    }

    /// All roles, in the order the global username check scans them.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Forwarder, Role::Bco, Role::Chb];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Invitation lifecycle of an importer or supplier record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvitedStatus {
    /// Created by the owning account, no signup yet.
    Pending,
    /// Self-registered without an invite.
    Signup,
    /// Accepted an invite link and completed signup.
    Accepted,
}

impl InvitedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitedStatus::Pending => "Pending",
            InvitedStatus::Signup => "Signup",
            InvitedStatus::Accepted => "Accepted",
        }
    }
}

/// Pagination parameters, `?page=1&pageSize=10`.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

/// Paginated slice of records plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedRecords<T> {
    pub records: Vec<T>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

/// Standard response envelope: `{success, message?, data?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    /// Envelope with a message and no data payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tags_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_tag(role.tag()), Some(role));
        }
        assert_eq!(Role::from_tag("superuser"), None);
    }

    #[test]
    fn role_tables_are_distinct() {
        let tables: std::collections::HashSet<_> =
            Role::ALL.iter().map(|r| r.table()).collect();
        assert_eq!(tables.len(), 4);
    }

    #[test]
    fn pagination_offset_math() {
        let p = Pagination {
            page: 3,
            page_size: 10,
        };
        assert_eq!(p.offset(), 20);
        assert_eq!(p.limit(), 10);

        // page 0 is clamped to the first page
        let p = Pagination {
            page: 0,
            page_size: 25,
        };
        assert_eq!(p.offset(), 0);
    }
}
