use crate::modules::catalog::CatalogUser;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankingScope {
    #[default]
    Global,
    Group,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct RankingEntry {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub image: String,
    pub points: i64,
}

impl From<CatalogUser> for RankingEntry {
    fn from(user: CatalogUser) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            image: user.image,
            points: user.points,
        }
    }
}
