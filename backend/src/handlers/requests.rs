//! Request DTOs shared by the role-prefixed auth endpoints
//!
//! The four roles accept the same registration/login/update payloads, so the
//! DTOs live here once instead of per role.

use serde::Deserialize;
use validator::Validate;

use crate::services::account::UpdateProfileInput;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom = "shared::validation::password_strength")]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivationRequest {
    #[validate(length(min = 1, message = "Activation token is required"))]
    pub activation_token: String,
    #[validate(length(min = 1, message = "Activation code should be numeric"))]
    pub activation_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendRequest {
    #[validate(length(min = 1, message = "Activation token is required"))]
    pub activation_token: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: Option<String>,
    pub physical_address: Option<String>,
    pub business_registration_number: Option<String>,
    pub customs_registration_number: Option<String>,
    pub vat_number: Option<String>,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: Option<String>,
    #[validate(custom = "shared::validation::phone_number")]
    pub phone_number: Option<String>,
    pub username: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileInput {
    fn from(req: UpdateProfileRequest) -> Self {
        UpdateProfileInput {
            full_name: req.full_name,
            physical_address: req.physical_address,
            business_registration_number: req.business_registration_number,
            customs_registration_number: req.customs_registration_number,
            vat_number: req.vat_number,
            company_name: req.company_name,
            phone_number: req.phone_number,
            username: req.username,
        }
    }
}
