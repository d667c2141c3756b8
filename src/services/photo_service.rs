// src/services/photo_service.rs
// DOCUMENTATION: Business logic for photo submissions
// PURPOSE: One upload in, one durable record out, plus listing and deletion

use crate::config::Config;
use crate::db::PhotoRepository;
use crate::errors::PhotoError;
use crate::models::{PhotoRecord, ReviewState, Variant};
use crate::services::{imaging, PhotoStorage};
use actix_web::web;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Upload extensions the pipeline accepts (case-insensitive)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// The four encoded variants of one upload, ready to persist
struct DerivedSet {
    original: Vec<u8>,
    enhanced: Vec<u8>,
    compressed: Vec<u8>,
    enhanced_and_compressed: Vec<u8>,
    compressed_quality: u8,
}

pub struct PhotoService;

impl PhotoService {
    /// Extension policy shared by upload and tech-review replacement
    pub fn allowed_file(filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
            None => false,
        }
    }

    /// Run one upload through the derivation pipeline
    /// DOCUMENTATION: Validates, decodes, derives the four variants,
    /// writes all four files and only then inserts the record. A failed
    /// write or insert rolls back every file written for this request,
    /// so no record ever points at a partial variant set.
    pub async fn ingest(
        pool: &SqlitePool,
        storage: &PhotoStorage,
        config: &Config,
        event: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<PhotoRecord, PhotoError> {
        let event = event.trim();
        if event.is_empty() {
            return Err(PhotoError::ValidationError("No event provided".to_string()));
        }

        if filename.trim().is_empty() {
            return Err(PhotoError::ValidationError(
                "No file selected for uploading".to_string(),
            ));
        }

        if !Self::allowed_file(filename) {
            return Err(PhotoError::ValidationError(
                "Allowed file types are png, jpg, jpeg, webp".to_string(),
            ));
        }

        // The pixel work is CPU-bound, keep it off the async workers
        let target_width = config.target_width;
        let quality = config.jpeg_quality;
        let cap = config.max_compressed_bytes;
        let derived = web::block(move || Self::derive(&bytes, target_width, quality, cap))
            .await
            .map_err(|e| {
                log::error!("Derivation worker failed: {}", e);
                PhotoError::StorageError("Image derivation was interrupted".to_string())
            })??;

        let name = format!("{}.jpeg", Uuid::new_v4().simple());
        log::debug!(
            "Derived variants for {} (compressed encoded at quality {})",
            name,
            derived.compressed_quality
        );

        let planned: [(Variant, &Vec<u8>); 4] = [
            (Variant::Original, &derived.original),
            (Variant::Enhanced, &derived.enhanced),
            (Variant::Compressed, &derived.compressed),
            (Variant::EnhancedAndCompressed, &derived.enhanced_and_compressed),
        ];

        let mut written: Vec<Variant> = Vec::new();
        for (variant, data) in planned {
            if let Err(e) = storage.write_variant(variant, &name, data) {
                Self::rollback(storage, &name, &written);
                return Err(e);
            }
            written.push(variant);
        }

        let now = Utc::now();
        let record = PhotoRecord {
            name: name.clone(),
            event: event.to_string(),
            urls: storage.variant_urls(&name),
            tech_review: ReviewState::Pending,
            caption: ReviewState::Pending,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = PhotoRepository::insert(pool, &record).await {
            Self::rollback(storage, &name, &written);
            return Err(e);
        }

        log::info!("Stored photo {} for event '{}'", name, event);
        Ok(record)
    }

    /// Decode once, derive and encode all four variants
    fn derive(
        bytes: &[u8],
        target_width: u32,
        quality: u8,
        max_compressed_bytes: u64,
    ) -> Result<DerivedSet, PhotoError> {
        let original = imaging::decode_rgb(bytes)?;
        let enhanced = imaging::enhance(&original);
        let compressed = imaging::resize_to_width(&original, target_width);
        let combined = imaging::resize_to_width(&enhanced, target_width);

        let (compressed_bytes, compressed_quality) =
            imaging::encode_jpeg_capped(&compressed, quality, max_compressed_bytes)?;

        Ok(DerivedSet {
            original: imaging::encode_jpeg(&original, quality)?,
            enhanced: imaging::encode_jpeg(&enhanced, quality)?,
            compressed: compressed_bytes,
            enhanced_and_compressed: imaging::encode_jpeg(&combined, quality)?,
            compressed_quality,
        })
    }

    fn rollback(storage: &PhotoStorage, name: &str, written: &[Variant]) {
        for variant in written {
            if let Err(e) = storage.remove_variant(*variant, name) {
                log::warn!("Rollback left {} variant of {}: {}", variant, name, e);
            }
        }
    }

    /// Every record, oldest first
    pub async fn all(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        PhotoRepository::all(pool).await
    }

    /// Delete a record and everything stored under its name
    /// DOCUMENTATION: Files go first; a removal failure aborts before
    /// the row is touched so the store never points at missing data
    pub async fn delete(
        pool: &SqlitePool,
        storage: &PhotoStorage,
        name: &str,
    ) -> Result<(), PhotoError> {
        let record = PhotoRepository::get_by_name(pool, name).await?;

        storage.remove_all(&record.name)?;
        PhotoRepository::remove(pool, &record.name).await?;

        log::info!("Deleted photo {} and its variants", record.name);
        Ok(())
    }
}
