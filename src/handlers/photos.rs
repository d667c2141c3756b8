// src/handlers/photos.rs
// DOCUMENTATION: HTTP handlers for photo submission
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::errors::PhotoError;
use crate::services::{PhotoService, PhotoStorage};
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::SqlitePool;

/// Multipart contract for POST /upload: one event label, exactly one
/// part named "file"
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub event: Option<Text<String>>,
    pub file: Vec<TempFile>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub name: Option<String>,
}

/// POST /upload
/// Submit one photo for an event; derives and stores the four variants
pub async fn upload(
    pool: web::Data<SqlitePool>,
    storage: web::Data<PhotoStorage>,
    config: web::Data<Config>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<impl Responder, PhotoError> {
    if form.file.len() > 1 {
        return Err(PhotoError::ValidationError(
            "Multiple file parts in the request".to_string(),
        ));
    }

    let upload = match form.file.into_iter().next() {
        Some(upload) => upload,
        None => {
            return Err(PhotoError::ValidationError(
                "No file part in the request".to_string(),
            ))
        }
    };

    let event = form.event.map(|t| t.into_inner()).unwrap_or_default();
    let filename = upload.file_name.clone().unwrap_or_default();

    let bytes = tokio::fs::read(upload.file.path()).await.map_err(|e| {
        log::error!("Failed to read upload spool file: {}", e);
        PhotoError::StorageError(format!("Read upload failed: {}", e))
    })?;

    let record = PhotoService::ingest(
        pool.get_ref(),
        storage.get_ref(),
        config.get_ref(),
        &event,
        &filename,
        bytes,
    )
    .await?;

    Ok(HttpResponse::Created().json(record))
}

/// GET /getall
/// Every record, oldest first
pub async fn getall(pool: web::Data<SqlitePool>) -> Result<impl Responder, PhotoError> {
    let records = PhotoService::all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// DELETE /delete?name=<name>
/// Remove a record and all files stored under its name
pub async fn delete(
    pool: web::Data<SqlitePool>,
    storage: web::Data<PhotoStorage>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, PhotoError> {
    let name = match query.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.trim(),
        _ => {
            return Err(PhotoError::ValidationError(
                "No file name provided".to_string(),
            ))
        }
    };

    PhotoService::delete(pool.get_ref(), storage.get_ref(), name).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for photo routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/upload", web::post().to(upload))
        .route("/getall", web::get().to(getall))
        .route("/delete", web::delete().to(delete));
}
