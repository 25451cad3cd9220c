/*
 * Responsibility
 * - Account response (never carries the password digest)
 * - updateStatus rule set
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::validation::Validator;

pub const STATUS_MIN_LEN: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .min_len("status", &self.status, STATUS_MIN_LEN, "Status is invalid.")
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub status: String,
    pub content_ids: Vec<String>, // encoded, oldest first
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
