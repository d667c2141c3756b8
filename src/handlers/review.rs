// src/handlers/review.rs
// DOCUMENTATION: HTTP handlers for the review workflow
// PURPOSE: Queue listings plus tech-review and caption resolution

use crate::config::Config;
use crate::errors::PhotoError;
use crate::services::{PhotoStorage, ReviewService};
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

/// Multipart contract for POST /update_tech: the record name plus
/// either an option (one of the four variant keys) or a replacement
/// image part named "file"
#[derive(Debug, MultipartForm)]
pub struct TechReviewForm {
    pub name: Option<Text<String>>,
    pub option: Option<Text<String>>,
    pub file: Vec<TempFile>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CaptionForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 2000, message = "Caption must be 1 to 2000 characters"))]
    pub caption: String,
}

/// GET /pending_tech
/// Records still awaiting technical review
pub async fn pending_tech(pool: web::Data<SqlitePool>) -> Result<impl Responder, PhotoError> {
    let records = ReviewService::pending_tech(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /pending_caption
/// Records past technical review but not yet captioned
pub async fn pending_caption(pool: web::Data<SqlitePool>) -> Result<impl Responder, PhotoError> {
    let records = ReviewService::pending_caption(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /output
/// Fully reviewed records, ready for publication
pub async fn output(pool: web::Data<SqlitePool>) -> Result<impl Responder, PhotoError> {
    let records = ReviewService::output(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// POST /update_tech
/// Resolve technical review by variant option or replacement upload;
/// a request carrying both resolves with the upload
pub async fn update_tech(
    pool: web::Data<SqlitePool>,
    storage: web::Data<PhotoStorage>,
    config: web::Data<Config>,
    MultipartForm(form): MultipartForm<TechReviewForm>,
) -> Result<impl Responder, PhotoError> {
    let name = match &form.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            return Err(PhotoError::ValidationError(
                "No file name provided".to_string(),
            ))
        }
    };

    if form.file.len() > 1 {
        return Err(PhotoError::ValidationError(
            "Multiple file parts in the request".to_string(),
        ));
    }

    let record = match form.file.into_iter().next() {
        Some(upload) => {
            let filename = upload.file_name.clone().unwrap_or_default();
            let bytes = tokio::fs::read(upload.file.path()).await.map_err(|e| {
                log::error!("Failed to read replacement spool file: {}", e);
                PhotoError::StorageError(format!("Read upload failed: {}", e))
            })?;

            ReviewService::resolve_tech_replacement(
                pool.get_ref(),
                storage.get_ref(),
                config.get_ref(),
                &name,
                &filename,
                bytes,
            )
            .await?
        }
        None => match form.option {
            Some(option) => {
                ReviewService::resolve_tech_option(pool.get_ref(), &name, option.trim()).await?
            }
            None => {
                return Err(PhotoError::ValidationError(
                    "No option or file provided".to_string(),
                ))
            }
        },
    };

    Ok(HttpResponse::Ok().json(record))
}

/// POST /update_caption
/// Resolve the caption with non-empty text
pub async fn update_caption(
    pool: web::Data<SqlitePool>,
    form: web::Form<CaptionForm>,
) -> Result<impl Responder, PhotoError> {
    // Validate request
    if let Err(e) = form.validate() {
        return Err(PhotoError::ValidationError(e.to_string()));
    }

    let record = ReviewService::resolve_caption(pool.get_ref(), form.name.trim(), &form.caption).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Configuration for review routes
/// DOCUMENTATION: Mounted only when Config.review_workflow is enabled
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/pending_tech", web::get().to(pending_tech))
        .route("/pending_caption", web::get().to(pending_caption))
        .route("/update_tech", web::post().to(update_tech))
        .route("/update_caption", web::post().to(update_caption))
        .route("/output", web::get().to(output));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::create_schema;
    use crate::models::PhotoRecord;
    use crate::services::{imaging, PhotoService};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use image::{Rgb, RgbImage};
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    const BOUNDARY: &str = "test-boundary-9RQ2pYxnTrWu1hV";

    fn test_config(photos_dir: &str) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            server_address: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            public_base_url: "http://testserver".to_string(),
            photos_dir: photos_dir.to_string(),
            target_width: 192,
            jpeg_quality: 90,
            max_compressed_bytes: 2_000_000,
            max_upload_bytes: 52_428_800,
            review_workflow: true,
            db_max_connections: 1,
            db_connection_timeout: 5,
        }
    }

    fn sample_jpeg() -> Vec<u8> {
        let image = RgbImage::from_fn(48, 32, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        imaging::encode_jpeg(&image, 90).unwrap()
    }

    /// One ingested record plus everything the app needs
    async fn fixture() -> (SqlitePool, PhotoStorage, Config, PhotoRecord, TempDir) {
        let dir = TempDir::new().unwrap();
        let photos_dir = dir.path().join("photos");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();

        let storage = PhotoStorage::new(&photos_dir, "http://testserver");
        storage.ensure_dirs().unwrap();

        let config = test_config(photos_dir.to_str().unwrap());
        let record = PhotoService::ingest(&pool, &storage, &config, "finals", "shot.jpg", sample_jpeg())
            .await
            .unwrap();

        (pool, storage, config, record, dir)
    }

    fn tech_option_body(name: &str, option: &str) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, value) in [("name", name), ("option", option)] {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, field, value
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    #[actix_rt::test]
    async fn test_tech_then_caption_moves_a_record_to_output() {
        let (pool, storage, config, record, _dir) = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(config.clone()))
                .configure(super::config),
        )
        .await;

        // Fresh record sits in the tech queue only
        let req = test::TestRequest::get().uri("/pending_tech").to_request();
        let pending: Vec<PhotoRecord> = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(pending.len(), 1);

        let req = test::TestRequest::get().uri("/pending_caption").to_request();
        let pending: Vec<PhotoRecord> = test::read_body_json(test::call_service(&app, req).await).await;
        assert!(pending.is_empty());

        // Resolve tech review by option
        let req = multipart_request("/update_tech", tech_option_body(&record.name, "enhanced"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: PhotoRecord = test::read_body_json(resp).await;
        assert_eq!(updated.tech_review.as_str(), record.urls.enhanced);

        let req = test::TestRequest::get().uri("/pending_caption").to_request();
        let pending: Vec<PhotoRecord> = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(pending.len(), 1);

        // Resolve the caption
        let req = test::TestRequest::post()
            .uri("/update_caption")
            .set_form([("name", record.name.as_str()), ("caption", "medal ceremony")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/output").to_request();
        let output: Vec<PhotoRecord> = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].caption.as_str(), "medal ceremony");
    }

    #[actix_rt::test]
    async fn test_unknown_option_is_a_structured_error() {
        let (pool, storage, config, record, _dir) = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(config.clone()))
                .configure(super::config),
        )
        .await;

        let req = multipart_request("/update_tech", tech_option_body(&record.name, "thumbnail"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_REVIEW_OPTION");

        // Nothing moved
        let req = test::TestRequest::get().uri("/pending_tech").to_request();
        let pending: Vec<PhotoRecord> = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(pending.len(), 1);
    }

    #[actix_rt::test]
    async fn test_update_tech_without_name_or_payload_is_rejected() {
        let (pool, storage, config, record, _dir) = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(config.clone()))
                .configure(super::config),
        )
        .await;

        // Multipart body with an option but no name field
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"option\"\r\n\r\noriginal\r\n--{}--\r\n",
                BOUNDARY, BOUNDARY
            )
            .as_bytes(),
        );
        let req = multipart_request("/update_tech", body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Name present but neither option nor file
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{}\r\n--{}--\r\n",
                BOUNDARY, record.name, BOUNDARY
            )
            .as_bytes(),
        );
        let req = multipart_request("/update_tech", body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_caption_for_unknown_record_is_not_found() {
        let (pool, storage, config, _record, _dir) = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(config.clone()))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/update_caption")
            .set_form([("name", "missing.jpeg"), ("caption", "nice shot")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
