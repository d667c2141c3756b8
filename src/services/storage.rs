// src/services/storage.rs
// DOCUMENTATION: On-disk photo tree and public URL layout
// PURPOSE: One handle owning where variants live and how they are addressed

use crate::errors::PhotoError;
use crate::models::{Variant, VariantUrls};
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory holding replacement images uploaded during technical review
pub const REVIEW_DIR: &str = "tech_review";

/// Storage handle for the photo tree, shared across request handlers
/// DOCUMENTATION: Construct once in main from Config, inject via web::Data.
/// The tree is `<root>/<variant>/<name>` with one extra subdirectory for
/// tech-review replacements; URLs mirror the tree under `<base>/photos/`.
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    base_url: String,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Create the root and every subdirectory if absent
    /// DOCUMENTATION: Called once at startup, before the server binds
    pub fn ensure_dirs(&self) -> Result<(), PhotoError> {
        for variant in Variant::ALL {
            let dir = self.root.join(variant.key());
            fs::create_dir_all(&dir).map_err(|e| {
                log::error!("Failed to create {}: {}", dir.display(), e);
                PhotoError::StorageError(format!("Create directory failed: {}", e))
            })?;
        }

        let review = self.root.join(REVIEW_DIR);
        fs::create_dir_all(&review).map_err(|e| {
            log::error!("Failed to create {}: {}", review.display(), e);
            PhotoError::StorageError(format!("Create directory failed: {}", e))
        })?;

        Ok(())
    }

    /// A name is a single plain path component, nothing more
    pub fn is_safe_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
    }

    pub fn variant_path(&self, variant: Variant, name: &str) -> PathBuf {
        self.root.join(variant.key()).join(name)
    }

    pub fn review_path(&self, name: &str) -> PathBuf {
        self.root.join(REVIEW_DIR).join(name)
    }

    pub fn variant_url(&self, variant: Variant, name: &str) -> String {
        format!("{}/photos/{}/{}", self.base_url, variant.key(), name)
    }

    pub fn review_url(&self, name: &str) -> String {
        format!("{}/photos/{}/{}", self.base_url, REVIEW_DIR, name)
    }

    /// All four public addresses for one stored name
    pub fn variant_urls(&self, name: &str) -> VariantUrls {
        VariantUrls {
            original: self.variant_url(Variant::Original, name),
            enhanced: self.variant_url(Variant::Enhanced, name),
            compressed: self.variant_url(Variant::Compressed, name),
            enhanced_and_compressed: self.variant_url(Variant::EnhancedAndCompressed, name),
        }
    }

    pub fn write_variant(&self, variant: Variant, name: &str, bytes: &[u8]) -> Result<(), PhotoError> {
        self.write_file(&self.variant_path(variant, name), name, bytes)
    }

    pub fn write_review(&self, name: &str, bytes: &[u8]) -> Result<(), PhotoError> {
        self.write_file(&self.review_path(name), name, bytes)
    }

    fn write_file(&self, path: &Path, name: &str, bytes: &[u8]) -> Result<(), PhotoError> {
        if !Self::is_safe_name(name) {
            return Err(PhotoError::ValidationError(format!(
                "Invalid photo name: {}",
                name
            )));
        }

        fs::write(path, bytes).map_err(|e| {
            log::error!("Failed to write {}: {}", path.display(), e);
            PhotoError::StorageError(format!("Write failed for {}: {}", name, e))
        })
    }

    /// Remove one variant file; a file already gone counts as removed
    pub fn remove_variant(&self, variant: Variant, name: &str) -> Result<(), PhotoError> {
        Self::remove_file(&self.variant_path(variant, name), name)
    }

    /// Remove the tech-review replacement file, same already-gone rule
    pub fn remove_review(&self, name: &str) -> Result<(), PhotoError> {
        Self::remove_file(&self.review_path(name), name)
    }

    /// Remove every file stored under this name
    /// DOCUMENTATION: The four variants are removed strictly; a genuine
    /// removal failure stops the caller before it touches the record.
    /// The tech-review replacement (if any) goes last, best-effort.
    pub fn remove_all(&self, name: &str) -> Result<(), PhotoError> {
        if !Self::is_safe_name(name) {
            return Err(PhotoError::ValidationError(format!(
                "Invalid photo name: {}",
                name
            )));
        }

        for variant in Variant::ALL {
            self.remove_variant(variant, name)?;
        }

        if let Err(e) = self.remove_review(name) {
            log::warn!("Leaving tech-review replacement for {}: {}", name, e);
        }

        Ok(())
    }

    fn remove_file(path: &Path, name: &str) -> Result<(), PhotoError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                log::error!("Failed to remove {}: {}", path.display(), e);
                Err(PhotoError::StorageError(format!(
                    "Remove failed for {}: {}",
                    name, e
                )))
            }
        }
    }
}
