use crate::{
    configuration::Settings,
    modules::{
        catalog::CatalogClient,
        extractors::jwt::JwtAccessSecret,
        smtp::Mailer,
        store::{firestore::FirestoreStore, DynStore},
    },
};
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub store: DynStore,
    pub catalog: CatalogClient,
    pub smtp: Mailer,
    pub jwt: JwtAccessSecret,
}

impl AppState {
    pub fn new(config: Settings, test_store: Option<DynStore>) -> Self {
        AppState {
            store: test_store.unwrap_or_else(|| Arc::new(FirestoreStore::new(config.store))),
            catalog: CatalogClient::new(config.catalog),
            smtp: Mailer::new(config.smtp),
            jwt: JwtAccessSecret(config.app.access_jwt_secret),
        }
    }
}
