use crate::configuration::CatalogSettings;
use crate::modules::store::empty_as_none;
use crate::utils::tasks::models::TaskDocument;
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Client for the external task/difficulty catalog service.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    difficulties: Arc<RwLock<Option<Vec<Difficulty>>>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Difficulty {
    pub id: i64,
    pub name: String,
    pub points: i64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CatalogUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub group_id: Option<String>,
}

impl CatalogClient {
    pub fn new(config: CatalogSettings) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Faxinex")
                .build()
                .expect("Failed to build catalog http client"),
            base_url: config.base_url,
            difficulties: Arc::new(RwLock::new(None)),
        }
    }

    /// Full difficulty list, cached for the process lifetime. Falls back to
    /// the fixed three-tier table when the catalog is unreachable; the
    /// fallback is cached too, exactly like a successful fetch.
    pub async fn difficulties(&self) -> Vec<Difficulty> {
        if let Some(cached) = self.difficulties.read().await.as_ref() {
            return cached.clone();
        }

        let list = match self.fetch_difficulties().await {
            Ok(list) => list,
            Err(e) => {
                warn!("Failed to fetch difficulties, using fallback: {e:?}");
                fallback_difficulties()
            }
        };

        *self.difficulties.write().await = Some(list.clone());
        list
    }

    pub async fn difficulty_by_id(&self, id: i64) -> Option<Difficulty> {
        self.difficulties().await.into_iter().find(|d| d.id == id)
    }

    async fn fetch_difficulties(&self) -> anyhow::Result<Vec<Difficulty>> {
        let res = self
            .client
            .get(format!("{}/difficulties", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Difficulty>>()
            .await?;
        Ok(res)
    }

    /// Mirrors a task status change to the catalog service. The document
    /// store stays the source of truth; callers decide how hard to fail.
    pub async fn update_task_status(&self, task_id: &str, status: &str) -> anyhow::Result<()> {
        self.client
            .put(format!("{}/tasks/{}", self.base_url, task_id))
            .json(&json!({ "status": status }))
            .send()
            .await
            .context("Failed to reach task catalog")?
            .error_for_status()
            .context("Task catalog rejected the status update")?;
        Ok(())
    }

    pub async fn fetch_user_tasks(&self, user_id: &str) -> anyhow::Result<Vec<TaskDocument>> {
        let res = self
            .client
            .get(format!("{}/tasks/user/{}", self.base_url, user_id))
            .send()
            .await
            .context("Failed to reach task catalog")?
            .error_for_status()
            .context("Task catalog rejected the task list request")?
            .json::<Vec<TaskDocument>>()
            .await
            .context("Failed to parse catalog task list")?;
        Ok(res)
    }

    pub async fn fetch_users(&self) -> anyhow::Result<Vec<CatalogUser>> {
        let res = self
            .client
            .get(format!("{}/users", self.base_url))
            .send()
            .await
            .context("Failed to reach user catalog")?
            .error_for_status()
            .context("User catalog rejected the request")?
            .json::<Vec<CatalogUser>>()
            .await
            .context("Failed to parse catalog user list")?;
        Ok(res)
    }
}

pub fn fallback_difficulties() -> Vec<Difficulty> {
    vec![
        Difficulty {
            id: 1,
            name: "Fácil".into(),
            points: 3,
        },
        Difficulty {
            id: 2,
            name: "Média".into(),
            points: 5,
        },
        Difficulty {
            id: 3,
            name: "Difícil".into(),
            points: 8,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::CatalogSettings;
    use tracing_test::traced_test;

    fn unreachable_catalog() -> CatalogClient {
        CatalogClient::new(CatalogSettings {
            // discard port: connections are refused immediately
            base_url: "http://127.0.0.1:9".into(),
        })
    }

    #[traced_test]
    #[tokio::test]
    async fn difficulties_fall_back_when_catalog_is_down() {
        let catalog = unreachable_catalog();
        let difficulties = catalog.difficulties().await;
        assert_eq!(difficulties, fallback_difficulties());

        let medium = catalog.difficulty_by_id(2).await.unwrap();
        assert_eq!(medium.points, 5);
    }

    #[tokio::test]
    async fn unknown_difficulty_resolves_to_none() {
        let catalog = unreachable_catalog();
        assert!(catalog.difficulty_by_id(9).await.is_none());
    }
}
