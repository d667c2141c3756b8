// src/db/photo_repository.rs
// DOCUMENTATION: Photo record database operations
// PURPOSE: Persistence of submissions and their review fields

use crate::errors::PhotoError;
use crate::models::{PhotoRecord, ReviewState, VariantUrls, PENDING};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

/// Flat row as stored; the four URLs live in their own columns
#[derive(Debug, FromRow)]
struct PhotoRow {
    name: String,
    event: String,
    original_url: String,
    enhanced_url: String,
    compressed_url: String,
    enhanced_and_compressed_url: String,
    tech_review: String,
    caption: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PhotoRow {
    fn to_record(self) -> PhotoRecord {
        PhotoRecord {
            name: self.name,
            event: self.event,
            urls: VariantUrls {
                original: self.original_url,
                enhanced: self.enhanced_url,
                compressed: self.compressed_url,
                enhanced_and_compressed: self.enhanced_and_compressed_url,
            },
            tech_review: ReviewState::from(self.tech_review),
            caption: ReviewState::from(self.caption),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub struct PhotoRepository;

impl PhotoRepository {
    /// Insert a freshly derived record
    /// DOCUMENTATION: Called by the pipeline only after all four variant
    /// files are durable on disk
    pub async fn insert(pool: &SqlitePool, record: &PhotoRecord) -> Result<(), PhotoError> {
        sqlx::query(
            r#"
            INSERT INTO photos (
                name, event, original_url, enhanced_url,
                compressed_url, enhanced_and_compressed_url,
                tech_review, caption, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.name)
        .bind(&record.event)
        .bind(&record.urls.original)
        .bind(&record.urls.enhanced)
        .bind(&record.urls.compressed)
        .bind(&record.urls.enhanced_and_compressed)
        .bind(record.tech_review.as_str())
        .bind(record.caption.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to insert photo {}: {}", record.name, e);
            PhotoError::DatabaseError(format!("Insert photo failed: {}", e))
        })?;

        Ok(())
    }

    /// Fetch every record in insertion order
    pub async fn all(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            "SELECT * FROM photos ORDER BY created_at ASC, name ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos: {}", e);
            PhotoError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(rows.into_iter().map(PhotoRow::to_record).collect())
    }

    /// Fetch one record by name
    pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<PhotoRecord, PhotoError> {
        let row = sqlx::query_as::<_, PhotoRow>("SELECT * FROM photos WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch photo {}: {}", name, e);
                PhotoError::DatabaseError(format!("Fetch photo failed: {}", e))
            })?;

        row.map(PhotoRow::to_record)
            .ok_or_else(|| PhotoError::NotFound(name.to_string()))
    }

    /// Resolve (or re-resolve) the technical review field
    pub async fn set_tech_review(
        pool: &SqlitePool,
        name: &str,
        value: &str,
    ) -> Result<PhotoRecord, PhotoError> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            UPDATE photos
            SET tech_review = ?, updated_at = ?
            WHERE name = ?
            RETURNING *
            "#,
        )
        .bind(value)
        .bind(Utc::now())
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update tech review for {}: {}", name, e);
            PhotoError::DatabaseError(format!("Update tech review failed: {}", e))
        })?;

        row.map(PhotoRow::to_record)
            .ok_or_else(|| PhotoError::NotFound(name.to_string()))
    }

    /// Resolve (or re-resolve) the caption field
    pub async fn set_caption(
        pool: &SqlitePool,
        name: &str,
        value: &str,
    ) -> Result<PhotoRecord, PhotoError> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            UPDATE photos
            SET caption = ?, updated_at = ?
            WHERE name = ?
            RETURNING *
            "#,
        )
        .bind(value)
        .bind(Utc::now())
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update caption for {}: {}", name, e);
            PhotoError::DatabaseError(format!("Update caption failed: {}", e))
        })?;

        row.map(PhotoRow::to_record)
            .ok_or_else(|| PhotoError::NotFound(name.to_string()))
    }

    /// Delete one record by name
    pub async fn remove(pool: &SqlitePool, name: &str) -> Result<(), PhotoError> {
        let result = sqlx::query("DELETE FROM photos WHERE name = ?")
            .bind(name)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete photo {}: {}", name, e);
                PhotoError::DatabaseError(format!("Delete photo failed: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(PhotoError::NotFound(name.to_string()));
        }

        Ok(())
    }

    /// Records still awaiting technical review
    pub async fn pending_tech(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT * FROM photos
            WHERE tech_review = ?
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .bind(PENDING)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch pending tech queue: {}", e);
            PhotoError::DatabaseError(format!("Fetch pending tech failed: {}", e))
        })?;

        Ok(rows.into_iter().map(PhotoRow::to_record).collect())
    }

    /// Records past technical review but not yet captioned
    /// DOCUMENTATION: Captioning is gated on tech review, so records with
    /// tech_review still pending never appear here
    pub async fn pending_caption(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT * FROM photos
            WHERE caption = ? AND tech_review <> ?
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .bind(PENDING)
        .bind(PENDING)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch pending caption queue: {}", e);
            PhotoError::DatabaseError(format!("Fetch pending caption failed: {}", e))
        })?;

        Ok(rows.into_iter().map(PhotoRow::to_record).collect())
    }

    /// Records with both review stages resolved
    pub async fn published(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT * FROM photos
            WHERE tech_review <> ? AND caption <> ?
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .bind(PENDING)
        .bind(PENDING)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch output queue: {}", e);
            PhotoError::DatabaseError(format!("Fetch output failed: {}", e))
        })?;

        Ok(rows.into_iter().map(PhotoRow::to_record).collect())
    }
}
