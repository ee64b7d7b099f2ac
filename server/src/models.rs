use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL as it is persisted in the collection blob.
///
/// Field names are camelCase in the serialized form so existing stored
/// collections keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: u64,
}

/// Aggregate statistics over the whole collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_urls: usize,
    pub total_clicks: u64,
    /// Mean clicks per record, rounded to the nearest integer. Zero when empty.
    pub average_clicks: u64,
    /// The first ten records in stored (newest-first) order.
    pub recent_records: Vec<Record>,
}

/// Uniform JSON envelope for the collection endpoints and for every error.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ── Documented API shapes ──────────────────────────────────────────────────

/// Body of `POST /api/shorturl`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// Response of `POST /api/shorturl`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
}

/// Response of `GET /api/shorturl/:code`.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub original_url: String,
    pub short_url: String,
    pub click_count: u64,
}

/// Response of `GET /api/shorturl/stats/:code`.
#[derive(Debug, Serialize)]
pub struct CodeStatsResponse {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Record> for ShortenResponse {
    fn from(r: Record) -> Self {
        Self {
            original_url: r.original_url,
            short_url: r.short_url,
        }
    }
}

impl From<Record> for LookupResponse {
    fn from(r: Record) -> Self {
        Self {
            original_url: r.original_url,
            short_url: r.short_url,
            click_count: r.click_count,
        }
    }
}

impl From<Record> for CodeStatsResponse {
    fn from(r: Record) -> Self {
        Self {
            original_url: r.original_url,
            short_url: r.short_url,
            short_code: r.short_code,
            click_count: r.click_count,
            created_at: r.created_at,
        }
    }
}
