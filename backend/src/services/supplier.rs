//! Supplier management (BCO-owned records)

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::company::CompanyService;
use shared::models::{Supplier, SupplierRecord};
use shared::types::{InvitedStatus, PaginatedRecords, Pagination};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
    companies: CompanyService,
}

impl SupplierService {
    pub fn new(db: PgPool) -> Self {
        let companies = CompanyService::new(db.clone());
        Self { db, companies }
    }

    /// Paginated suppliers for one BCO, with company and contact joined in.
    pub async fn list(
        &self,
        bco_id: Uuid,
        page: &Pagination,
    ) -> AppResult<PaginatedRecords<SupplierRecord>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, full_name, email_address, product, port, invited_status,
                   bco_id, contact_id, company_id, created_at, updated_at
            FROM suppliers
            WHERE bco_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(bco_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM suppliers WHERE bco_id = $1")
                .bind(bco_id)
                .fetch_one(&self.db)
                .await?;

        let mut records = Vec::with_capacity(suppliers.len());
        for supplier in suppliers {
            records.push(self.assemble_record(supplier).await?);
        }

        Ok(PaginatedRecords {
            records,
            total_count,
        })
    }

    /// Paginated supplier list across all BCOs (admin view).
    pub async fn list_all(&self, page: &Pagination) -> AppResult<PaginatedRecords<SupplierRecord>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, full_name, email_address, product, port, invited_status,
                   bco_id, contact_id, company_id, created_at, updated_at
            FROM suppliers
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.db)
            .await?;

        let mut records = Vec::with_capacity(suppliers.len());
        for supplier in suppliers {
            records.push(self.assemble_record(supplier).await?);
        }

        Ok(PaginatedRecords {
            records,
            total_count,
        })
    }

    async fn assemble_record(&self, supplier: Supplier) -> AppResult<SupplierRecord> {
        let company = match supplier.company_id {
            Some(id) => self.companies.get_company(id).await?,
            None => None,
        };
        let contact = match supplier.contact_id {
            Some(id) => self.companies.get_contact(id).await?,
            None => None,
        };

        Ok(SupplierRecord {
            supplier,
            company,
            contact,
        })
    }

    /// Company-name duplicate check within one BCO's supplier records.
    pub async fn company_name_in_use(
        &self,
        bco_id: Uuid,
        company_name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let count = match exclude {
            Some(supplier_id) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*)
                    FROM suppliers s
                    JOIN companies c ON c.id = s.company_id
                    WHERE s.bco_id = $1 AND c.company_name = $2 AND s.id <> $3
                    "#,
                )
                .bind(bco_id)
                .bind(company_name.trim())
                .bind(supplier_id)
                .fetch_one(&self.db)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*)
                    FROM suppliers s
                    JOIN companies c ON c.id = s.company_id
                    WHERE s.bco_id = $1 AND c.company_name = $2
                    "#,
                )
                .bind(bco_id)
                .bind(company_name.trim())
                .fetch_one(&self.db)
                .await?
            }
        };

        Ok(count > 0)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        full_name: &str,
        email_address: &str,
        product: Option<&str>,
        port: Option<&str>,
        bco_id: Uuid,
        contact_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers
                (full_name, email_address, product, port, invited_status,
                 bco_id, contact_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, full_name, email_address, product, port, invited_status,
                      bco_id, contact_id, company_id, created_at, updated_at
            "#,
        )
        .bind(full_name)
        .bind(email_address)
        .bind(product)
        .bind(port)
        .bind(InvitedStatus::Pending.as_str())
        .bind(bco_id)
        .bind(contact_id)
        .bind(company_id)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    pub async fn find_by_id(&self, supplier_id: Uuid) -> AppResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, full_name, email_address, product, port, invited_status,
                   bco_id, contact_id, company_id, created_at, updated_at
            FROM suppliers WHERE id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(supplier)
    }

    /// Update the supplier-specific product/port fields after an edit.
    pub async fn update_shipping_details(
        &self,
        supplier_id: Uuid,
        product: Option<&str>,
        port: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE suppliers SET product = $2, port = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(supplier_id)
        .bind(product)
        .bind(port)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }
}
