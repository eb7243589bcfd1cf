//! Account service: one generic credential-store adapter plus the shared
//! authentication flows, parameterized by [`Role`]
//!
//! The four account variants (admin, forwarder admin, BCO, CHB) behave
//! identically apart from their backing table, role tag, and signing secret,
//! so the register/activate/login/update flows live here once and take the
//! role as a parameter. Duplicate email/company/username checks are
//! pre-condition lookups, not constraint-violation recovery: two racing
//! requests can both pass the check, which the design accepts as best-effort.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::directory::DirectorySync;
use crate::services::identity::{derive_username, generate_chat_id, normalize_username};
use crate::services::token::{ActivationToken, TokenService};
use shared::models::{Account, PendingAccount};
use shared::types::{PaginatedRecords, Pagination, Role};

/// Shared column set of the four account tables.
const ACCOUNT_COLUMNS: &str = "id, full_name, email, password_hash, role, chat_id, username, \
     company_name, physical_address, phone_number, business_registration_number, \
     customs_registration_number, vat_number, avatar, created_at, updated_at";

/// Account row as stored, password hash included. Never serialized; convert
/// with [`AccountRow::into_account`] before returning to a client.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub chat_id: Option<String>,
    pub username: Option<String>,
    pub company_name: Option<String>,
    pub physical_address: Option<String>,
    pub phone_number: Option<String>,
    pub business_registration_number: Option<String>,
    pub customs_registration_number: Option<String>,
    pub vat_number: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Strip the password hash for the response body.
    pub fn into_account(self) -> Account {
        Account {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            role: self.role,
            chat_id: self.chat_id,
            username: self.username,
            company_name: self.company_name,
            physical_address: self.physical_address,
            phone_number: self.phone_number,
            business_registration_number: self.business_registration_number,
            customs_registration_number: self.customs_registration_number,
            vat_number: self.vat_number,
            avatar: self.avatar,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for the registration step of the activation flow.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
}

/// Input for direct admin signup (no activation round-trip).
#[derive(Debug, Deserialize)]
pub struct AdminSignupInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Input for BCO signup, optionally tied to an importer invite.
#[derive(Debug)]
pub struct BcoSignupInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub invite_token: Option<String>,
}

/// Partial profile update; omitted fields keep their prior values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub physical_address: Option<String>,
    pub business_registration_number: Option<String>,
    pub customs_registration_number: Option<String>,
    pub vat_number: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub username: Option<String>,
}

/// Account service
#[derive(Clone)]
pub struct AccountService {
    db: PgPool,
    tokens: TokenService,
    sync: DirectorySync,
}

impl AccountService {
    pub fn new(db: PgPool, tokens: TokenService, sync: DirectorySync) -> Self {
        Self { db, tokens, sync }
    }

    // ========================================================================
    // Credential store adapter
    // ========================================================================

    pub async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM {} WHERE email = $1",
            ACCOUNT_COLUMNS,
            role.table()
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn find_by_id(&self, role: Role, id: Uuid) -> AppResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            ACCOUNT_COLUMNS,
            role.table()
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn email_exists(&self, role: Role, email: &str) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE email = $1",
            role.table()
        ))
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        Ok(count > 0)
    }

    pub async fn company_exists(&self, role: Role, company_name: &str) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE company_name = $1",
            role.table()
        ))
        .bind(company_name)
        .fetch_one(&self.db)
        .await?;

        Ok(count > 0)
    }

    /// Global username check: a username held by any of the four account
    /// variants counts as taken.
    pub async fn is_username_taken(&self, username: &str) -> AppResult<bool> {
        for role in Role::ALL {
            let count = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM {} WHERE username = $1",
                role.table()
            ))
            .bind(username)
            .fetch_one(&self.db)
            .await?;

            if count > 0 {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn insert(
        &self,
        role: Role,
        full_name: &str,
        email: &str,
        password_hash: &str,
        chat_id: Option<&str>,
        username: Option<&str>,
        company_name: Option<&str>,
    ) -> AppResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO {} (full_name, email, password_hash, role, chat_id, username, company_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            role.table(),
            ACCOUNT_COLUMNS
        ))
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role.tag())
        .bind(chat_id)
        .bind(username)
        .bind(company_name)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    /// Partial update: every omitted field keeps its stored value.
    async fn update_row(
        &self,
        role: Role,
        id: Uuid,
        chat_id: Option<&str>,
        username: Option<&str>,
        input: &UpdateProfileInput,
    ) -> AppResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE {} SET \
                chat_id = COALESCE($2, chat_id), \
                username = COALESCE($3, username), \
                full_name = COALESCE($4, full_name), \
                physical_address = COALESCE($5, physical_address), \
                business_registration_number = COALESCE($6, business_registration_number), \
                customs_registration_number = COALESCE($7, customs_registration_number), \
                vat_number = COALESCE($8, vat_number), \
                company_name = COALESCE($9, company_name), \
                phone_number = COALESCE($10, phone_number), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            role.table(),
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .bind(chat_id)
        .bind(username)
        .bind(input.full_name.as_deref())
        .bind(input.physical_address.as_deref())
        .bind(input.business_registration_number.as_deref())
        .bind(input.customs_registration_number.as_deref())
        .bind(input.vat_number.as_deref())
        .bind(input.company_name.as_deref())
        .bind(input.phone_number.as_deref())
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn list(&self, role: Role, page: &Pagination) -> AppResult<PaginatedRecords<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM {} ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            ACCOUNT_COLUMNS,
            role.table()
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {}",
            role.table()
        ))
        .fetch_one(&self.db)
        .await?;

        Ok(PaginatedRecords {
            records: rows.into_iter().map(AccountRow::into_account).collect(),
            total_count,
        })
    }

    pub async fn delete(&self, role: Role, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", role.table()))
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(role_label(role).to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Registration + activation flow (forwarder, CHB)
    // ========================================================================

    /// First half of the two-phase signup: duplicate checks, password hash,
    /// activation token. The caller emails the code out-of-band.
    pub async fn begin_registration(
        &self,
        role: Role,
        input: RegisterInput,
    ) -> AppResult<ActivationToken> {
        if self.email_exists(role, &input.email).await? {
            return Err(AppError::Conflict("Email Already existed!".to_string()));
        }

        if self.company_exists(role, &input.company_name).await? {
            return Err(AppError::Conflict("Company Already existed!".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        self.tokens.issue_activation(PendingAccount {
            full_name: input.full_name,
            email: input.email,
            company_name: input.company_name,
            password_hash,
        })
    }

    /// Second half: consume the activation token, re-check email uniqueness
    /// (guards the race between issuance and activation, and makes the token
    /// effectively single-use), provision identities, and materialize the
    /// account.
    pub async fn activate(&self, role: Role, token: &str, code: &str) -> AppResult<AccountRow> {
        let pending = self.tokens.consume_activation(token, code)?;

        if self.email_exists(role, &pending.email).await? {
            return Err(AppError::Conflict("Email already exist".to_string()));
        }

        let chat_id = generate_chat_id();
        let username = derive_username(&pending.email, &pending.company_name);

        let row = self
            .insert(
                role,
                &pending.full_name,
                &pending.email,
                &pending.password_hash,
                Some(&chat_id),
                Some(&username),
                Some(&pending.company_name),
            )
            .await?;

        self.sync
            .push_profile(&chat_id, &row.full_name, &username, "")
            .await;
        self.sync.bootstrap_welcome(&chat_id, &row.full_name).await;

        Ok(row)
    }

    /// Re-issue the activation mail: same payload and code, fresh token. The
    /// original token is not invalidated.
    pub async fn resend_activation(&self, role: Role, token: &str) -> AppResult<ActivationToken> {
        let (pending, code) = self.tokens.peek_activation(token)?;

        if self.email_exists(role, &pending.email).await? {
            return Err(AppError::Conflict("Email already exist".to_string()));
        }

        self.tokens.reissue_activation(pending, code)
    }

    // ========================================================================
    // Login / profile flows (all roles)
    // ========================================================================

    /// Verify credentials and lazily provision missing identity fields.
    ///
    /// Provisioning twice is idempotent: once both `chat_id` and `username`
    /// are set, login changes nothing and the welcome bootstrap is skipped.
    pub async fn login(&self, role: Role, email: &str, password: &str) -> AppResult<AccountRow> {
        let row = self
            .find_by_email(role, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let matches = verify(password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        self.provision_missing_identity(role, row).await
    }

    pub async fn get_profile(&self, role: Role, id: Uuid) -> AppResult<AccountRow> {
        self.find_by_id(role, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Partial profile update with username-uniqueness enforcement and lazy
    /// identity provisioning.
    pub async fn update_profile(
        &self,
        role: Role,
        id: Uuid,
        mut input: UpdateProfileInput,
    ) -> AppResult<AccountRow> {
        let current = self
            .find_by_id(role, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        // A changed username must be globally unique before it is persisted.
        if let Some(requested) = input.username.as_deref() {
            let requested = normalize_username(requested);
            let current_username = current
                .username
                .as_deref()
                .map(normalize_username)
                .unwrap_or_default();

            if requested != current_username {
                if self.is_username_taken(&requested).await? {
                    return Err(AppError::Conflict(
                        "Username is already taken. Please choose a different one.".to_string(),
                    ));
                }
            }
            input.username = Some(requested);
        }

        // The welcome bootstrap runs once per account, on first-time chat-id
        // assignment.
        let mut send_welcome = false;

        let chat_id = match current.chat_id.clone() {
            Some(existing) => existing,
            None => {
                send_welcome = true;
                generate_chat_id()
            }
        };

        if current.username.is_none() && input.username.is_none() {
            let email = &current.email;
            let company = input
                .company_name
                .as_deref()
                .or(current.company_name.as_deref())
                .unwrap_or("");
            input.username = Some(derive_username(email, company));
        }

        let updated = self
            .update_row(role, id, Some(&chat_id), input.username.as_deref(), &input)
            .await?;

        let username = updated.username.clone().unwrap_or_default();
        let avatar = updated.avatar.clone().unwrap_or_default();
        self.sync
            .push_profile(&chat_id, &updated.full_name, &username, &avatar)
            .await;

        if send_welcome {
            self.sync.bootstrap_welcome(&chat_id, &updated.full_name).await;
        }

        Ok(updated)
    }

    // ========================================================================
    // Direct signups (admin, BCO)
    // ========================================================================

    /// Admin signup: no activation round-trip, username supplied explicitly.
    pub async fn admin_signup(&self, input: AdminSignupInput) -> AppResult<AccountRow> {
        if self.find_by_email(Role::Admin, &input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "You are already a user, please signIn!".to_string(),
            ));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let chat_id = generate_chat_id();
        let username = normalize_username(&input.username);

        let row = self
            .insert(
                Role::Admin,
                &input.full_name,
                &input.email,
                &password_hash,
                Some(&chat_id),
                Some(&username),
                None,
            )
            .await?;

        self.sync
            .push_profile(&chat_id, &row.full_name, &username, "")
            .await;
        self.sync.bootstrap_welcome(&chat_id, &row.full_name).await;

        Ok(row)
    }

    /// BCO signup, either fresh or following an invite link. Invite
    /// verification gates nothing beyond rejecting expired/tampered tokens;
    /// its payload only pre-fills the form client-side.
    pub async fn register_bco(&self, input: BcoSignupInput) -> AppResult<AccountRow> {
        if self
            .find_by_email(Role::Bco, &input.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You are already a user, please signIn!".to_string(),
            ));
        }

        if let Some(token) = input.invite_token.as_deref() {
            if !token.is_empty() {
                self.tokens.verify_invite(token)?;
            }
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let chat_id = generate_chat_id();
        let username = derive_username(&input.email, &input.company_name);

        let row = self
            .insert(
                Role::Bco,
                &input.full_name,
                &input.email,
                &password_hash,
                Some(&chat_id),
                Some(&username),
                Some(&input.company_name),
            )
            .await?;

        self.sync
            .push_profile(&chat_id, &row.full_name, &username, "")
            .await;
        self.sync.bootstrap_welcome(&chat_id, &row.full_name).await;

        Ok(row)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Fill in whichever of `chat_id`/`username` the account lacks; persist
    /// and sync only when something was actually provisioned.
    async fn provision_missing_identity(
        &self,
        role: Role,
        row: AccountRow,
    ) -> AppResult<AccountRow> {
        let needs_chat_id = row.chat_id.is_none();
        let needs_username = row.username.is_none();

        if !needs_chat_id && !needs_username {
            return Ok(row);
        }

        let chat_id = row.chat_id.clone().unwrap_or_else(generate_chat_id);
        let username = match row.username.clone() {
            Some(existing) => normalize_username(&existing),
            None => derive_username(&row.email, row.company_name.as_deref().unwrap_or("")),
        };

        let updated = self
            .update_row(
                role,
                row.id,
                Some(&chat_id),
                Some(&username),
                &UpdateProfileInput::default(),
            )
            .await?;

        self.sync
            .push_profile(&chat_id, &updated.full_name, &username, "")
            .await;
        if needs_chat_id {
            self.sync.bootstrap_welcome(&chat_id, &updated.full_name).await;
        }

        Ok(updated)
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Forwarder => "Forwarder Admin",
        Role::Bco => "BCO",
        Role::Chb => "CHB",
    }
}
