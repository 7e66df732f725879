use crate::modules::extractors::jwt::Claims;
use crate::modules::store::empty_as_none;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const DEFAULT_AVATAR: &str =
    "https://i.postimg.cc/TPwPZK8R/renderizacao-3d-de-retrato-de-cao-de-desenho-animado.jpg";

/// Schema of a `Users` document. All defaulting for fields older app
/// versions left out happens here, not at call sites.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_avatar")]
    pub image: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub group_id: Option<String>,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub points: i64,
    #[serde(
        rename = "createdAt",
        with = "time::serde::rfc3339::option",
        default
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        rename = "lastPointsUpdate",
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_points_update: Option<OffsetDateTime>,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

impl UserDocument {
    pub fn from_claims(claims: &Claims) -> Self {
        let name = match claims.name.trim() {
            "" => "Usuário".to_string(),
            name => name.to_string(),
        };
        Self {
            id: claims.sub.clone(),
            name,
            email: claims.email.clone(),
            image: claims
                .picture
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(default_avatar),
            group_id: None,
            is_admin: false,
            points: 0,
            created_at: Some(OffsetDateTime::now_utc()),
            last_points_update: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_get_defaults() {
        let user: UserDocument = serde_json::from_value(json!({
            "id": "user_1",
            "name": "Ana",
            "email": "ana@example.com",
        }))
        .unwrap();

        assert_eq!(user.points, 0);
        assert_eq!(user.group_id, None);
        assert!(!user.is_admin);
        assert_eq!(user.image, DEFAULT_AVATAR);
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn empty_group_id_reads_as_none() {
        let user: UserDocument = serde_json::from_value(json!({
            "id": "user_1",
            "group_id": "",
        }))
        .unwrap();
        assert_eq!(user.group_id, None);

        let user: UserDocument = serde_json::from_value(json!({
            "id": "user_1",
            "group_id": "AB12C",
        }))
        .unwrap();
        assert_eq!(user.group_id.as_deref(), Some("AB12C"));
    }
}
