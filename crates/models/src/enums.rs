//! Closed value sets stored as upper snake case strings.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebsiteType {
    #[sea_orm(string_value = "WEBSITE")]
    Website,
    #[sea_orm(string_value = "LANDING_PAGE")]
    LandingPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoFormat {
    #[sea_orm(string_value = "LANDSCAPE")]
    Landscape,
    #[sea_orm(string_value = "PORTRAIT")]
    Portrait,
    #[sea_orm(string_value = "SQUARE")]
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoType {
    #[sea_orm(string_value = "CORPORATE_VIDEO")]
    CorporateVideo,
    #[sea_orm(string_value = "AD_FILM")]
    AdFilm,
    #[sea_orm(string_value = "REEL")]
    Reel,
    #[sea_orm(string_value = "ANIMATION")]
    Animation,
    #[sea_orm(string_value = "INTERVIEW")]
    Interview,
    #[sea_orm(string_value = "PORTRAIT")]
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreativeType {
    #[sea_orm(string_value = "LOGO")]
    Logo,
    #[sea_orm(string_value = "BROCHURE")]
    Brochure,
}

/// Which table a tag points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagEntityType {
    #[sea_orm(string_value = "WEBSITE")]
    Website,
    #[sea_orm(string_value = "VIDEO")]
    Video,
    #[sea_orm(string_value = "CREATIVE")]
    Creative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    #[sea_orm(string_value = "WEBSITE")]
    Website,
    #[sea_orm(string_value = "LANDING_PAGE")]
    LandingPage,
    #[sea_orm(string_value = "VIDEO")]
    Video,
    #[sea_orm(string_value = "SOCIAL_MEDIA")]
    SocialMedia,
    #[sea_orm(string_value = "BRANDING")]
    Branding,
    #[sea_orm(string_value = "SEO")]
    Seo,
    #[sea_orm(string_value = "CONTENT")]
    Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&VideoType::AdFilm).unwrap(), "\"AD_FILM\"");
        let t: WebsiteType = serde_json::from_str("\"LANDING_PAGE\"").unwrap();
        assert_eq!(t, WebsiteType::LandingPage);
        assert!(serde_json::from_str::<CreativeType>("\"logo\"").is_err());
    }

    #[test]
    fn db_values_match_wire_values() {
        assert_eq!(ScopeType::SocialMedia.to_value(), "SOCIAL_MEDIA");
        assert_eq!(TagEntityType::Video.to_value(), "VIDEO");
    }
}
