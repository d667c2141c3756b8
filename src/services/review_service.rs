// src/services/review_service.rs
// DOCUMENTATION: Review workflow transitions and queues
// PURPOSE: Move tech_review and caption from "pending" to resolved values

use crate::config::Config;
use crate::db::PhotoRepository;
use crate::errors::PhotoError;
use crate::models::{PhotoRecord, Variant, PENDING};
use crate::services::{imaging, PhotoService, PhotoStorage};
use actix_web::web;
use sqlx::SqlitePool;

pub struct ReviewService;

impl ReviewService {
    /// Resolve technical review to one of the four recorded variant URLs
    /// DOCUMENTATION: Option values outside the variant keys are rejected
    /// without touching the record; re-review simply overwrites
    pub async fn resolve_tech_option(
        pool: &SqlitePool,
        name: &str,
        option: &str,
    ) -> Result<PhotoRecord, PhotoError> {
        let variant = Variant::parse(option)
            .ok_or_else(|| PhotoError::InvalidReviewOption(option.to_string()))?;

        let record = PhotoRepository::get_by_name(pool, name).await?;
        let url = record.urls.get(variant).to_string();

        let updated = PhotoRepository::set_tech_review(pool, &record.name, &url).await?;
        log::info!("Tech review for {} resolved to the {} variant", record.name, variant);
        Ok(updated)
    }

    /// Resolve technical review with a freshly uploaded replacement image
    /// DOCUMENTATION: The replacement is re-encoded as JPEG and stored
    /// under the tech_review subdirectory as the record's name. If the
    /// record update then fails the file is removed again, so a record
    /// that still says pending never has a replacement on disk.
    pub async fn resolve_tech_replacement(
        pool: &SqlitePool,
        storage: &PhotoStorage,
        config: &Config,
        name: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<PhotoRecord, PhotoError> {
        if filename.trim().is_empty() {
            return Err(PhotoError::ValidationError(
                "No file selected for uploading".to_string(),
            ));
        }

        if !PhotoService::allowed_file(filename) {
            return Err(PhotoError::ValidationError(
                "Allowed file types are png, jpg, jpeg, webp".to_string(),
            ));
        }

        // Make sure the record exists before any file lands on disk
        let record = PhotoRepository::get_by_name(pool, name).await?;

        let quality = config.jpeg_quality;
        let encoded = web::block(move || {
            let image = imaging::decode_rgb(&bytes)?;
            imaging::encode_jpeg(&image, quality)
        })
        .await
        .map_err(|e| {
            log::error!("Replacement encode worker failed: {}", e);
            PhotoError::StorageError("Replacement encoding was interrupted".to_string())
        })??;

        storage.write_review(&record.name, &encoded)?;

        let url = storage.review_url(&record.name);
        let updated = match PhotoRepository::set_tech_review(pool, &record.name, &url).await {
            Ok(updated) => updated,
            Err(e) => {
                Self::rollback_replacement(storage, &record.name);
                return Err(e);
            }
        };

        log::info!("Tech review for {} resolved to a replacement upload", record.name);
        Ok(updated)
    }

    fn rollback_replacement(storage: &PhotoStorage, name: &str) {
        if let Err(e) = storage.remove_review(name) {
            log::warn!("Rollback left replacement for {}: {}", name, e);
        }
    }

    /// Resolve the caption with non-empty text
    pub async fn resolve_caption(
        pool: &SqlitePool,
        name: &str,
        caption: &str,
    ) -> Result<PhotoRecord, PhotoError> {
        let caption = caption.trim();
        if caption.is_empty() {
            return Err(PhotoError::ValidationError("No caption provided".to_string()));
        }

        // The sentinel is reserved; a literal "pending" caption would
        // put the record back in the queue
        if caption == PENDING {
            return Err(PhotoError::ValidationError(
                "Caption may not be the reserved word 'pending'".to_string(),
            ));
        }

        let updated = PhotoRepository::set_caption(pool, name, caption).await?;
        log::info!("Caption for {} resolved", name);
        Ok(updated)
    }

    /// Records awaiting technical review
    pub async fn pending_tech(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        PhotoRepository::pending_tech(pool).await
    }

    /// Records awaiting a caption, gated on resolved technical review
    pub async fn pending_caption(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        PhotoRepository::pending_caption(pool).await
    }

    /// Fully reviewed records, ready for publication
    pub async fn output(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, PhotoError> {
        PhotoRepository::published(pool).await
    }
}
