use dotenv::dotenv;
use faxinex_backend::app;
use faxinex_backend::configuration::get_config;
use faxinex_backend::modules::extractors::jwt::Claims;
use faxinex_backend::modules::store::{DocumentStore, DynStore};
use faxinex_backend::utils::users::models::UserDocument;
use faxinex_backend::utils::users::sync_user;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use secrecy::ExposeSecret;
use std::net::{SocketAddr, TcpListener};
use time::OffsetDateTime;

pub fn claims_for(id: &str, name: &str, email: &str) -> Claims {
    Claims {
        sub: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        picture: None,
        exp: OffsetDateTime::now_utc().unix_timestamp() + 3600,
    }
}

pub async fn seed_user(store: &dyn DocumentStore, id: &str, name: &str) -> UserDocument {
    let claims = claims_for(id, name, &format!("{id}@example.com"));
    sync_user(store, &claims)
        .await
        .expect("Failed to seed user")
}

pub struct AppData {
    pub addr: SocketAddr,
    secret: String,
}

impl AppData {
    pub async fn new(store: DynStore) -> Self {
        dotenv().ok();

        let mut config = get_config().expect("Failed to read configuration");
        // discard port: catalog calls fail fast and exercise the fallbacks
        config.catalog.base_url = "http://127.0.0.1:9".into();
        let secret = config.app.access_jwt_secret.expose_secret().clone();

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app(config, Some(store)).await.into_make_service())
                .await
                .unwrap()
        });

        Self { addr, secret }
    }

    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build reqwest client")
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn token_for(&self, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("Failed to mint test token")
    }
}
