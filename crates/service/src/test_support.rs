#![cfg(test)]
use sea_orm::DatabaseConnection;

/// Fresh, fully migrated in-memory database; every test gets its own.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_in_memory().await
}

pub async fn seed_client(db: &DatabaseConnection, id: i32, name: &str) -> Result<(), anyhow::Error> {
    use crate::clients::{sync_clients, ClientSyncItem};
    sync_clients(
        db,
        vec![ClientSyncItem {
            id,
            client_name: Some(name.to_string()),
            country_id: None,
            description: None,
            description1: None,
            thumbnail: None,
            priority: None,
        }],
    )
    .await?;
    Ok(())
}
