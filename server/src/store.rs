use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use crate::{
    error::{StorageError, StoreError},
    models::{Record, Stats},
    shortcode::{self, CODE_LENGTH},
    storage::BlobStorage,
};

/// How many records `stats()` reports as recent.
pub const RECENT_LIMIT: usize = 10;

/// Owner of the persisted record collection.
///
/// The whole collection lives under one storage key as a JSON array, newest
/// record first. Every mutation reads the full array, changes it in memory and
/// writes it back. Mutations are serialized through `write_lock`, so
/// concurrent requests cannot lose each other's updates.
pub struct RecordStore {
    storage: Arc<dyn BlobStorage>,
    key: String,
    base_url: String,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(
        storage: Arc<dyn BlobStorage>,
        key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    // ── Operations ─────────────────────────────────────────────────────────

    /// Create a record for `url`, or return the existing one for the same URL.
    pub async fn shorten(&self, url: &str) -> Result<Record, StoreError> {
        let url = validate_url(url)?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;

        if let Some(existing) = records.iter().find(|r| r.original_url == url) {
            return Ok(existing.clone());
        }

        let short_code = {
            let mut rng = rand::thread_rng();
            shortcode::unused_code(
                || shortcode::random_code(&mut rng, CODE_LENGTH),
                |code| records.iter().any(|r| r.short_code == code),
            )
        }
        .ok_or(StoreError::CodeSpaceExhausted)?;

        let record = Record {
            id: Uuid::new_v4().to_string(),
            original_url: url.to_owned(),
            short_url: self.short_url(&short_code),
            short_code,
            created_at: Utc::now(),
            click_count: 0,
        };

        records.insert(0, record.clone());
        self.write_all(&records).await?;

        tracing::info!("Shortened {} -> {}", record.original_url, record.short_code);
        Ok(record)
    }

    /// Resolve a short code, counting the access as a click.
    pub async fn lookup(&self, code: &str) -> Result<Record, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;

        let record = records
            .iter_mut()
            .find(|r| r.short_code == code)
            .ok_or_else(|| StoreError::NotFound(code.to_owned()))?;
        record.click_count += 1;
        let updated = record.clone();

        self.write_all(&records).await?;
        Ok(updated)
    }

    /// Resolve a short code without touching its click count.
    pub async fn peek(&self, code: &str) -> Result<Record, StoreError> {
        self.read_all()
            .await?
            .into_iter()
            .find(|r| r.short_code == code)
            .ok_or_else(|| StoreError::NotFound(code.to_owned()))
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<Record>, StoreError> {
        self.read_all().await
    }

    pub async fn stats(&self) -> Result<Stats, StoreError> {
        let records = self.read_all().await?;
        Ok(summarize(records))
    }

    /// Remove the record with `id`. Returns `false`, without writing, when no
    /// record has that id.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;

        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }

        self.write_all(&records).await?;
        tracing::info!("Deleted record {}", id);
        Ok(true)
    }

    // ── Persistence ────────────────────────────────────────────────────────

    async fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        let Some(raw) = self.storage.load(&self.key).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("Stored collection '{}' cannot be parsed: {}", self.key, e);
            StoreError::from(StorageError::Corrupt(e))
        })
    }

    async fn write_all(&self, records: &[Record]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records).map_err(StorageError::Encode)?;
        self.storage.save(&self.key, &raw).await?;
        Ok(())
    }
}

/// Check that `input` is an absolute http(s) URL and return it trimmed.
pub fn validate_url(input: &str) -> Result<&str, StoreError> {
    let trimmed = input.trim();
    let invalid = |reason: String| StoreError::InvalidUrl {
        url: input.to_owned(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn summarize(records: Vec<Record>) -> Stats {
    let total_urls = records.len();
    let total_clicks: u64 = records.iter().map(|r| r.click_count).sum();
    let average_clicks = if total_urls > 0 {
        (total_clicks as f64 / total_urls as f64).round() as u64
    } else {
        0
    };

    let mut recent_records = records;
    recent_records.truncate(RECENT_LIMIT);

    Stats {
        total_urls,
        total_clicks,
        average_clicks,
        recent_records,
    }
}
