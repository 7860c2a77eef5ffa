//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_client;
mod m20250101_000002_create_project;
mod m20250101_000003_create_project_scope;
mod m20250101_000004_create_technology;
mod m20250101_000005_create_website;
mod m20250101_000006_create_website_technology_mapping;
mod m20250101_000007_create_video;
mod m20250101_000008_create_creative;
mod m20250101_000009_create_tag_mapping;
mod m20250101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_client::Migration),
            Box::new(m20250101_000002_create_project::Migration),
            Box::new(m20250101_000003_create_project_scope::Migration),
            Box::new(m20250101_000004_create_technology::Migration),
            Box::new(m20250101_000005_create_website::Migration),
            Box::new(m20250101_000006_create_website_technology_mapping::Migration),
            Box::new(m20250101_000007_create_video::Migration),
            Box::new(m20250101_000008_create_creative::Migration),
            Box::new(m20250101_000009_create_tag_mapping::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000010_add_indexes::Migration),
        ]
    }
}
