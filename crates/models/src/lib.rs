pub mod errors;
pub mod db;
pub mod enums;
pub mod validation;
pub mod search;
pub mod client;
pub mod project;
pub mod project_scope;
pub mod technology;
pub mod website;
pub mod website_technology_mapping;
pub mod video;
pub mod creative;
pub mod tag_mapping;

#[cfg(test)]
mod tests;
