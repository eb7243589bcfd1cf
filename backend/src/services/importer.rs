//! Importer management (forwarder-owned records)

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::company::CompanyService;
use shared::models::{Importer, ImporterRecord};
use shared::types::{InvitedStatus, PaginatedRecords, Pagination};

/// Importer service
#[derive(Clone)]
pub struct ImporterService {
    db: PgPool,
    companies: CompanyService,
}

impl ImporterService {
    pub fn new(db: PgPool) -> Self {
        let companies = CompanyService::new(db.clone());
        Self { db, companies }
    }

    /// Paginated importers for one forwarder, with company, contact, and
    /// tier name joined in ("No Tier" when none is attached).
    pub async fn list(
        &self,
        forwarder_id: Uuid,
        page: &Pagination,
    ) -> AppResult<PaginatedRecords<ImporterRecord>> {
        let importers = sqlx::query_as::<_, Importer>(
            r#"
            SELECT id, full_name, email_address, invited_status, forwarder_id,
                   contact_id, company_id, created_at, updated_at
            FROM importers
            WHERE forwarder_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(forwarder_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM importers WHERE forwarder_id = $1")
                .bind(forwarder_id)
                .fetch_one(&self.db)
                .await?;

        let mut records = Vec::with_capacity(importers.len());
        for importer in importers {
            records.push(self.assemble_record(importer).await?);
        }

        Ok(PaginatedRecords {
            records,
            total_count,
        })
    }

    async fn assemble_record(&self, importer: Importer) -> AppResult<ImporterRecord> {
        let company = match importer.company_id {
            Some(id) => self.companies.get_company(id).await?,
            None => None,
        };
        let contact = match importer.contact_id {
            Some(id) => self.companies.get_contact(id).await?,
            None => None,
        };
        let tier = match importer.company_id {
            Some(id) => self
                .companies
                .company_tier_name(id)
                .await?
                .unwrap_or_else(|| "No Tier".to_string()),
            None => "No Tier".to_string(),
        };

        Ok(ImporterRecord {
            importer,
            tier,
            company,
            contact,
        })
    }

    /// Company-name duplicate check within one forwarder's importer records,
    /// optionally excluding the record being edited.
    pub async fn company_name_in_use(
        &self,
        forwarder_id: Uuid,
        company_name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let count = match exclude {
            Some(importer_id) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*)
                    FROM importers i
                    JOIN companies c ON c.id = i.company_id
                    WHERE i.forwarder_id = $1 AND c.company_name = $2 AND i.id <> $3
                    "#,
                )
                .bind(forwarder_id)
                .bind(company_name.trim())
                .bind(importer_id)
                .fetch_one(&self.db)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*)
                    FROM importers i
                    JOIN companies c ON c.id = i.company_id
                    WHERE i.forwarder_id = $1 AND c.company_name = $2
                    "#,
                )
                .bind(forwarder_id)
                .bind(company_name.trim())
                .fetch_one(&self.db)
                .await?
            }
        };

        Ok(count > 0)
    }

    pub async fn create(
        &self,
        full_name: &str,
        email_address: &str,
        forwarder_id: Uuid,
        contact_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<Importer> {
        let importer = sqlx::query_as::<_, Importer>(
            r#"
            INSERT INTO importers
                (full_name, email_address, invited_status, forwarder_id,
                 contact_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, full_name, email_address, invited_status, forwarder_id,
                      contact_id, company_id, created_at, updated_at
            "#,
        )
        .bind(full_name)
        .bind(email_address)
        .bind(InvitedStatus::Pending.as_str())
        .bind(forwarder_id)
        .bind(contact_id)
        .bind(company_id)
        .fetch_one(&self.db)
        .await?;

        Ok(importer)
    }

    pub async fn find_by_id(&self, importer_id: Uuid) -> AppResult<Option<Importer>> {
        let importer = sqlx::query_as::<_, Importer>(
            r#"
            SELECT id, full_name, email_address, invited_status, forwarder_id,
                   contact_id, company_id, created_at, updated_at
            FROM importers WHERE id = $1
            "#,
        )
        .bind(importer_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(importer)
    }

    /// Sync the importer's own name/email after a contact-person edit.
    pub async fn update_names(
        &self,
        importer_id: Uuid,
        full_name: &str,
        email_address: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE importers SET full_name = $2, email_address = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(importer_id)
        .bind(full_name)
        .bind(email_address)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Flip an invited importer to Accepted once its invitee signs up.
    pub async fn mark_accepted(&self, importer_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE importers SET invited_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(importer_id)
        .bind(InvitedStatus::Accepted.as_str())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, importer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM importers WHERE id = $1")
            .bind(importer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Importer".to_string()));
        }

        Ok(())
    }

    /// Paginated importer list across all forwarders (admin view).
    pub async fn list_all(&self, page: &Pagination) -> AppResult<PaginatedRecords<ImporterRecord>> {
        let importers = sqlx::query_as::<_, Importer>(
            r#"
            SELECT id, full_name, email_address, invited_status, forwarder_id,
                   contact_id, company_id, created_at, updated_at
            FROM importers
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM importers")
            .fetch_one(&self.db)
            .await?;

        let mut records = Vec::with_capacity(importers.len());
        for importer in importers {
            records.push(self.assemble_record(importer).await?);
        }

        Ok(PaginatedRecords {
            records,
            total_count,
        })
    }
}
