//! Company, contact, and tier management shared by the importer and
//! supplier flows

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use shared::models::{Company, Contact, Tier};

/// Company fields accepted on importer/supplier create and edit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailsInput {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    pub registered_address: Option<String>,
    pub business_registration_number: Option<String>,
    pub vat_number: Option<String>,
    pub unlocode_registered_address: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city_country: Option<String>,
    pub unlocode_warehouse_address: Option<String>,
    // Supplier-only extras ride along with the company details in the
    // request body but are stored on the supplier record.
    pub product: Option<String>,
    pub port: Option<String>,
}

/// Contact-person fields accepted on importer/supplier create and edit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactPersonInput {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone_number: Option<String>,
    pub status: Option<String>,
    pub account_reference: Option<String>,
    pub api_customer_code: Option<String>,
    pub tier: Option<String>,
}

/// Company service
#[derive(Clone)]
pub struct CompanyService {
    db: PgPool,
}

impl CompanyService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a company together with its first warehouse address.
    pub async fn create_company(&self, details: &CompanyDetailsInput) -> AppResult<Company> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (company_name, registered_address, business_registration_number,
                 vat_number, unlocode_registered_address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_name, registered_address,
                      business_registration_number, vat_number,
                      unlocode_registered_address, created_at, updated_at
            "#,
        )
        .bind(details.company_name.trim())
        .bind(&details.registered_address)
        .bind(&details.business_registration_number)
        .bind(&details.vat_number)
        .bind(&details.unlocode_registered_address)
        .fetch_one(&self.db)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO warehouse_addresses
                (company_id, address_line1, address_line2, city_country,
                 unlocode_warehouse_address)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(company.id)
        .bind(&details.address_line1)
        .bind(details.address_line2.clone().unwrap_or_default())
        .bind(&details.city_country)
        .bind(details.unlocode_warehouse_address.clone().unwrap_or_default())
        .execute(&self.db)
        .await?;

        Ok(company)
    }

    /// Update a company and its warehouse address in place.
    pub async fn update_company(
        &self,
        company_id: Uuid,
        details: &CompanyDetailsInput,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE companies SET
                company_name = $2,
                registered_address = $3,
                business_registration_number = $4,
                vat_number = $5,
                unlocode_registered_address = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(company_id)
        .bind(details.company_name.trim())
        .bind(&details.registered_address)
        .bind(&details.business_registration_number)
        .bind(&details.vat_number)
        .bind(&details.unlocode_registered_address)
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            UPDATE warehouse_addresses SET
                address_line1 = $2,
                address_line2 = $3,
                city_country = $4
            WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .bind(&details.address_line1)
        .bind(details.address_line2.clone().unwrap_or_default())
        .bind(&details.city_country)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn create_contact(
        &self,
        contact: &ContactPersonInput,
        company_id: Uuid,
    ) -> AppResult<Contact> {
        let row = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts
                (company_id, contact_name, email_address, phone_number, status,
                 account_reference, api_customer_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, company_id, contact_name, email_address, phone_number,
                      status, account_reference, api_customer_code
            "#,
        )
        .bind(company_id)
        .bind(&contact.full_name)
        .bind(&contact.email)
        .bind(&contact.phone_number)
        .bind(&contact.status)
        .bind(&contact.account_reference)
        .bind(&contact.api_customer_code)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn update_contact(
        &self,
        contact_id: Uuid,
        contact: &ContactPersonInput,
        company_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE contacts SET
                company_id = $2,
                contact_name = $3,
                email_address = $4,
                phone_number = $5,
                status = $6,
                account_reference = $7,
                api_customer_code = $8
            WHERE id = $1
            "#,
        )
        .bind(contact_id)
        .bind(company_id)
        .bind(&contact.full_name)
        .bind(&contact.email)
        .bind(&contact.phone_number)
        .bind(&contact.status)
        .bind(&contact.account_reference)
        .bind(&contact.api_customer_code)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn get_company(&self, company_id: Uuid) -> AppResult<Option<Company>> {
        let row = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, company_name, registered_address,
                   business_registration_number, vat_number,
                   unlocode_registered_address, created_at, updated_at
            FROM companies WHERE id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn get_contact(&self, contact_id: Uuid) -> AppResult<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, company_id, contact_name, email_address, phone_number,
                   status, account_reference, api_customer_code
            FROM contacts WHERE id = $1
            "#,
        )
        .bind(contact_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    /// Find a tier by name, creating it with a zero markup if absent.
    pub async fn find_or_create_tier(&self, tier_name: &str) -> AppResult<Tier> {
        if let Some(tier) = sqlx::query_as::<_, Tier>(
            "SELECT id, tier_name, markup_percentage FROM tiers WHERE tier_name = $1",
        )
        .bind(tier_name)
        .fetch_optional(&self.db)
        .await?
        {
            return Ok(tier);
        }

        let tier = sqlx::query_as::<_, Tier>(
            r#"
            INSERT INTO tiers (tier_name, markup_percentage)
            VALUES ($1, $2)
            RETURNING id, tier_name, markup_percentage
            "#,
        )
        .bind(tier_name)
        .bind(Decimal::ZERO)
        .fetch_one(&self.db)
        .await?;

        Ok(tier)
    }

    /// Attach a tier to a company, keeping at most one link per company:
    /// an existing link is re-pointed, otherwise a new one is created.
    pub async fn upsert_company_tier(&self, company_id: Uuid, tier_name: &str) -> AppResult<()> {
        let tier = self.find_or_create_tier(tier_name).await?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM company_tiers WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?;

        match existing {
            Some(link_id) => {
                sqlx::query("UPDATE company_tiers SET tier_id = $2 WHERE id = $1")
                    .bind(link_id)
                    .bind(tier.id)
                    .execute(&self.db)
                    .await?;
            }
            None => {
                sqlx::query("INSERT INTO company_tiers (company_id, tier_id) VALUES ($1, $2)")
                    .bind(company_id)
                    .bind(tier.id)
                    .execute(&self.db)
                    .await?;
            }
        }

        Ok(())
    }

    /// Tier name currently attached to a company, if any.
    pub async fn company_tier_name(&self, company_id: Uuid) -> AppResult<Option<String>> {
        let name = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.tier_name
            FROM company_tiers ct
            JOIN tiers t ON t.id = ct.tier_id
            WHERE ct.company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(name)
    }
}
