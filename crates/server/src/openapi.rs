use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct UpdateClientDoc { pub priority: Option<i32>, pub description1: Option<String> }

#[derive(ToSchema)]
pub struct ClientSyncEntryDoc {
    pub id: i32,
    pub client_name: Option<String>,
    pub country_id: Option<i32>,
    pub description: Option<String>,
    pub description1: Option<String>,
    pub thumbnail: Option<String>,
    pub priority: Option<i32>,
}

#[derive(ToSchema)]
pub struct ClientSyncDoc { pub clients: Vec<ClientSyncEntryDoc> }

#[derive(ToSchema)]
pub struct UpdateProjectDoc { pub description1: Option<String>, pub priority: Option<i32> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ScopeDoc { pub scope_type: String, pub is_selected: Option<bool> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProjectSyncEntryDoc {
    pub id: String,
    pub client_id: Option<i32>,
    pub project_name: String,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub startdate: Option<String>,
    pub scopes: Option<Vec<ScopeDoc>>,
}

#[derive(ToSchema)]
pub struct ProjectSyncDoc { pub projects: Vec<ProjectSyncEntryDoc> }

/// Multipart form; every text field may also be sent as JSON.
#[derive(ToSchema)]
pub struct WebsiteFormDoc {
    pub client_id: Option<i32>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub r#type: Option<String>,
    pub description: Option<String>,
    pub launch_date: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
}

#[derive(ToSchema)]
pub struct TechnologyMappingsDoc {
    pub technology_ids: Vec<i32>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(ToSchema)]
pub struct VideoFormDoc {
    pub client_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub format: Option<String>,
    pub r#type: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
}

#[derive(ToSchema)]
pub struct CreativeFormDoc {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub created_at: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    #[schema(value_type = Vec<String>)]
    pub files: Vec<Vec<u8>>,
}

#[derive(ToSchema)]
pub struct TechnologyDoc { pub name: String, pub created_by: Option<i32>, pub updated_by: Option<i32> }

#[derive(ToSchema)]
pub struct TagMappingDoc {
    pub entity_type: String,
    pub entity_id: i32,
    pub tag_name: String,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::clients::list,
        crate::routes::clients::update,
        crate::routes::clients::sync,
        crate::routes::projects::list,
        crate::routes::projects::update,
        crate::routes::projects::sync,
        crate::routes::websites::create,
        crate::routes::websites::list,
        crate::routes::websites::listing,
        crate::routes::websites::update,
        crate::routes::websites::remove,
        crate::routes::websites::set_technologies,
        crate::routes::videos::create,
        crate::routes::videos::list,
        crate::routes::videos::listing,
        crate::routes::videos::update,
        crate::routes::videos::remove,
        crate::routes::creatives::create,
        crate::routes::creatives::list,
        crate::routes::creatives::update,
        crate::routes::creatives::remove,
        crate::routes::technologies::create,
        crate::routes::technologies::list,
        crate::routes::technologies::update,
        crate::routes::technologies::remove,
        crate::routes::tag_mappings::create,
        crate::routes::tag_mappings::for_website,
        crate::routes::tag_mappings::for_video,
        crate::routes::tag_mappings::remove,
    ),
    components(
        schemas(
            HealthResponse,
            UpdateClientDoc,
            ClientSyncEntryDoc,
            ClientSyncDoc,
            UpdateProjectDoc,
            ScopeDoc,
            ProjectSyncEntryDoc,
            ProjectSyncDoc,
            WebsiteFormDoc,
            TechnologyMappingsDoc,
            VideoFormDoc,
            CreativeFormDoc,
            TechnologyDoc,
            TagMappingDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "clients"),
        (name = "projects"),
        (name = "websites"),
        (name = "videos"),
        (name = "creatives"),
        (name = "technologies"),
        (name = "tag-mappings")
    )
)]
pub struct ApiDoc;
