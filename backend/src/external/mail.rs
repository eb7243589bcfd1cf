//! Outbound mail client
//!
//! Mail is delegated to an external delivery API that renders a named
//! template with a data bag; this system never builds MIME bodies itself.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// Mail delivery API client
#[derive(Clone)]
pub struct MailClient {
    http_client: Client,
    api_endpoint: String,
    api_key: String,
    sender: String,
}

#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    template: &'a str,
    data: &'a Value,
}

#[derive(Debug, Deserialize)]
struct MailApiError {
    #[serde(default)]
    message: Option<String>,
}

impl MailClient {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        }
    }

    /// Send a templated mail. `data` is handed to the template verbatim.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        data: &Value,
    ) -> AppResult<()> {
        let request = SendMailRequest {
            from: &self.sender,
            to,
            subject,
            template,
            data,
        };

        let response = self
            .http_client
            .post(format!("{}/send", self.api_endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error: MailApiError = response
                .json()
                .await
                .unwrap_or(MailApiError { message: None });
            Err(AppError::Mail(
                error.message.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}
