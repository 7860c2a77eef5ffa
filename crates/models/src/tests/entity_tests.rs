use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, QueryFilter, Set};

use crate::db::connect_in_memory;
use crate::enums::{ScopeType, TagEntityType, WebsiteType};
use crate::{client, project, project_scope, tag_mapping, technology, website, website_technology_mapping};

async fn seed_client(db: &sea_orm::DatabaseConnection, id: i32) -> Result<client::Model> {
    let now = Utc::now().into();
    let m = client::ActiveModel {
        id: Set(id),
        client_name: Set(Some(format!("Client {id}"))),
        country_id: Set(Some(91)),
        description: Set(None),
        description1: Set(None),
        thumbnail: Set(None),
        priority: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(m)
}

async fn seed_website(db: &sea_orm::DatabaseConnection, client_id: i32, title: &str) -> Result<website::Model> {
    let now = Utc::now().into();
    let m = website::ActiveModel {
        client_id: Set(client_id),
        title: Set(title.into()),
        url: Set("https://example.com".into()),
        kind: Set(WebsiteType::Website),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(m)
}

#[tokio::test]
async fn client_ids_are_caller_assigned() -> Result<()> {
    let db = connect_in_memory().await?;
    seed_client(&db, 4711).await?;
    assert!(client::exists(&db, 4711).await?);
    assert!(!client::exists(&db, 1).await?);
    Ok(())
}

#[tokio::test]
async fn project_scopes_load_and_id_serialises_as_string() -> Result<()> {
    let db = connect_in_memory().await?;
    seed_client(&db, 1).await?;
    let now = Utc::now().into();
    let p = project::ActiveModel {
        id: Set(9_007_199_254_740_993),
        client_id: Set(Some(1)),
        project_name: Set("Rebrand".into()),
        description: Set(None),
        description1: Set(None),
        priority: Set(3),
        start_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    for st in [ScopeType::Website, ScopeType::Seo] {
        project_scope::ActiveModel { project_id: Set(p.id), scope_type: Set(st), is_selected: Set(true), ..Default::default() }
            .insert(&db)
            .await?;
    }

    let projects = project::Entity::find().all(&db).await?;
    let scopes = projects.load_many(project_scope::Entity, &db).await?;
    assert_eq!(scopes[0].len(), 2);

    let json = serde_json::to_value(&projects[0])?;
    assert_eq!(json["id"], "9007199254740993");
    let back: project::Model = serde_json::from_value(json)?;
    assert_eq!(back.id, p.id);
    Ok(())
}

#[tokio::test]
async fn website_type_column_round_trips() -> Result<()> {
    let db = connect_in_memory().await?;
    seed_client(&db, 1).await?;
    let w = seed_website(&db, 1, "Landing").await?;
    let found = website::Entity::find()
        .filter(website::Column::Kind.eq(WebsiteType::Website))
        .one(&db)
        .await?
        .unwrap();
    assert_eq!(found.id, w.id);
    assert_eq!(serde_json::to_value(&found)?["type"], "WEBSITE");
    Ok(())
}

#[tokio::test]
async fn tag_search_matches_case_insensitively() -> Result<()> {
    let db = connect_in_memory().await?;
    seed_client(&db, 1).await?;
    let a = seed_website(&db, 1, "A").await?;
    let b = seed_website(&db, 1, "B").await?;
    for (w, tag) in [(&a, "Ecommerce"), (&b, "Portfolio"), (&a, "ecommerce-b2b")] {
        tag_mapping::ActiveModel {
            entity_type: Set(TagEntityType::Website),
            entity_id: Set(w.id),
            tag_name: Set(tag.into()),
            website_id: Set(Some(w.id)),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }
    let ids = tag_mapping::entity_ids_tagged(&db, TagEntityType::Website, "ECOMM").await?;
    assert_eq!(ids, vec![a.id]);
    assert!(tag_mapping::entity_ids_tagged(&db, TagEntityType::Video, "ecomm").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn tag_search_treats_wildcards_literally() -> Result<()> {
    let db = connect_in_memory().await?;
    seed_client(&db, 1).await?;
    let a = seed_website(&db, 1, "A").await?;
    let b = seed_website(&db, 1, "B").await?;
    for (w, tag) in [(&a, "100%_organic"), (&b, "portfolio")] {
        tag_mapping::ActiveModel {
            entity_type: Set(TagEntityType::Website),
            entity_id: Set(w.id),
            tag_name: Set(tag.into()),
            website_id: Set(Some(w.id)),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }
    assert_eq!(tag_mapping::entity_ids_tagged(&db, TagEntityType::Website, "%").await?, vec![a.id]);
    assert_eq!(tag_mapping::entity_ids_tagged(&db, TagEntityType::Website, "_").await?, vec![a.id]);
    assert!(tag_mapping::entity_ids_tagged(&db, TagEntityType::Website, "o_t").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn technology_lookup_by_name_and_mapping_relation() -> Result<()> {
    let db = connect_in_memory().await?;
    seed_client(&db, 1).await?;
    let w = seed_website(&db, 1, "Shop").await?;
    let now = Utc::now().into();
    let t = technology::ActiveModel { name: Set("Rust".into()), created_at: Set(now), updated_at: Set(now), ..Default::default() }
        .insert(&db)
        .await?;
    website_technology_mapping::ActiveModel {
        website_id: Set(w.id),
        technology_id: Set(t.id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    assert_eq!(technology::find_by_name(&db, "Rust").await?.map(|m| m.id), Some(t.id));
    assert!(technology::find_by_name(&db, "Go").await?.is_none());
    let techs = vec![t];
    let maps = techs.load_many(website_technology_mapping::Entity, &db).await?;
    assert_eq!(maps[0][0].website_id, w.id);
    Ok(())
}
