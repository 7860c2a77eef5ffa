//! Service layer providing the CMS operations on top of `models`.
//! - Each entity module owns its input DTOs, list views and write paths.
//! - Uploaded files go through `uploads` (policy, naming) and `storage` (where bytes live).
//! - Errors surface as `ServiceError`, mapped to HTTP by the server crate.

pub mod errors;
pub mod pagination;
pub mod listing;
pub mod serde_ext;
pub mod storage;
pub mod uploads;
pub mod views;
pub mod clients;
pub mod projects;
pub mod websites;
pub mod videos;
pub mod creatives;
pub mod technologies;
pub mod tag_mappings;
#[cfg(test)]
pub mod test_support;
