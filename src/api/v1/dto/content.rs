/*
 * Responsibility
 * - Content item request/response DTOs
 * - ids on the wire are the encoded public ids (internal ids never leak)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::validation::Validator;

pub const TITLE_MIN_LEN: usize = 3;
pub const BODY_MIN_LEN: usize = 5;

fn validate_fields(title: &str, body: &str) -> Result<(), AppError> {
    Validator::new()
        .min_len("title", title, TITLE_MIN_LEN, "Title is invalid.")
        .min_len("body", body, BODY_MIN_LEN, "Body is invalid.")
        .finish()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateContentItemRequest {
    pub title: String,
    pub body: String,
    pub media_ref: Option<String>,
}

impl CreateContentItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.title, &self.body)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateContentItemRequest {
    pub title: String,
    pub body: String,
    // None: keep the stored media reference
    pub media_ref: Option<String>,
}

impl UpdateContentItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.title, &self.body)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

impl ListQuery {
    /// Missing, non-numeric or < 1 means the first page.
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemResponse {
    pub id: String, // encoded
    pub title: String,
    pub body: String,
    pub media_ref: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPageResponse {
    pub items: Vec<ContentItemResponse>,
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_first() {
        let page = |raw: Option<&str>| ListQuery {
            page: raw.map(str::to_string),
        }
        .page();

        assert_eq!(page(None), 1);
        assert_eq!(page(Some("abc")), 1);
        assert_eq!(page(Some("0")), 1);
        assert_eq!(page(Some("-3")), 1);
        assert_eq!(page(Some(" 4 ")), 4);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let ok = CreateContentItemRequest {
            title: "abc".into(),
            body: "abcde".into(),
            media_ref: None,
        };
        assert!(ok.validate().is_ok());

        let short = UpdateContentItemRequest {
            title: "ab".into(),
            body: "abcd".into(),
            media_ref: None,
        };
        assert_eq!(short.validate().unwrap_err().data().unwrap().len(), 2);
    }
}
