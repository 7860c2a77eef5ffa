//! Upload policy: which file fields an endpoint accepts, their MIME types and
//! sizes, and how stored objects are named.

use chrono::Utc;

use crate::errors::ServiceError;
use crate::storage::FileStore;

const MIB: usize = 1024 * 1024;

pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
pub const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const WEBSITE_THUMBNAIL_PREFIX: &str = "public/websites/thumbnails";
pub const VIDEO_THUMBNAIL_PREFIX: &str = "uploads/videos/thumbnails";
pub const CREATIVE_FILE_PREFIX: &str = "public/creatives/files";
pub const CREATIVE_THUMBNAIL_PREFIX: &str = "public/creatives/thumbnails";

/// A file part taken from a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub field: &'static str,
    pub max_files: usize,
    pub max_bytes: usize,
    pub documents_allowed: bool,
}

pub const WEBSITE_THUMBNAIL: UploadPolicy = UploadPolicy { field: "thumbnail", max_files: 1, max_bytes: 5 * MIB, documents_allowed: false };
pub const VIDEO_THUMBNAIL: UploadPolicy = UploadPolicy { field: "thumbnail", max_files: 1, max_bytes: 5 * MIB, documents_allowed: false };
pub const CREATIVE_FILES: UploadPolicy = UploadPolicy { field: "files", max_files: 2, max_bytes: 10 * MIB, documents_allowed: true };

pub fn is_image(content_type: &str) -> bool {
    IMAGE_TYPES.contains(&content_type.to_ascii_lowercase().as_str())
}

pub fn is_document(content_type: &str) -> bool {
    DOCUMENT_TYPES.contains(&content_type.to_ascii_lowercase().as_str())
}

impl UploadPolicy {
    /// Check every file against this policy. Returns them unchanged when all pass.
    pub fn check(&self, files: Vec<UploadedFile>) -> Result<Vec<UploadedFile>, ServiceError> {
        if let Some(f) = files.iter().find(|f| f.field != self.field) {
            return Err(ServiceError::BadRequest(format!("Unexpected file field '{}'", f.field)));
        }
        if files.len() > self.max_files {
            return Err(ServiceError::BadRequest(format!("Too many files; at most {} allowed", self.max_files)));
        }
        for f in &files {
            let ok = is_image(&f.content_type) || (self.documents_allowed && is_document(&f.content_type));
            if !ok {
                return Err(ServiceError::BadRequest(if self.documents_allowed {
                    format!("Invalid file type for {}. Allowed: PDF, DOC, DOCX, JPG, JPEG, PNG, WebP", f.file_name)
                } else {
                    "Only JPG, JPEG, PNG, and WebP files are allowed".to_string()
                }));
            }
            if f.bytes.len() > self.max_bytes {
                return Err(ServiceError::PayloadTooLarge(format!(
                    "File {} exceeds the {}MB limit",
                    f.file_name,
                    self.max_bytes / MIB
                )));
            }
        }
        Ok(files)
    }
}

/// `{prefix}/{unix_millis}_{name}` with whitespace runs in the name collapsed to `_`.
pub fn object_key(prefix: &str, file_name: &str, millis: i64) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let name = base.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}/{}_{}", prefix.trim_end_matches('/'), millis, name)
}

/// Store `file` under `prefix` and return its key.
pub async fn store(store: &dyn FileStore, prefix: &str, file: UploadedFile) -> Result<String, ServiceError> {
    let key = object_key(prefix, &file.file_name, Utc::now().timestamp_millis());
    store.put(&key, &file.content_type, file.bytes).await?;
    Ok(key)
}

/// Creative uploads: the first document is the deliverable, the first image the thumbnail.
#[derive(Debug, Default)]
pub struct CreativeUpload {
    pub file: Option<UploadedFile>,
    pub thumbnail: Option<UploadedFile>,
}

pub fn classify_creative(files: Vec<UploadedFile>) -> CreativeUpload {
    let mut out = CreativeUpload::default();
    for f in files {
        if is_document(&f.content_type) {
            out.file.get_or_insert(f);
        } else if is_image(&f.content_type) {
            out.thumbnail.get_or_insert(f);
        }
    }
    out
}
