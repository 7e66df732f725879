use config::{Config, ConfigError};
use lettre::{transport::smtp::authentication::Credentials, Address};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub store: StoreSettings,
    pub catalog: CatalogSettings,
    pub smtp: SmtpSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub access_jwt_secret: Secret<String>,
    pub origin: String,
}

impl ApplicationSettings {
    pub fn get_addr(&self) -> SocketAddr {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse::<SocketAddr>()
            .expect(&format!("Failed to parse address: {addr} "))
    }

    pub fn from_env() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: get_env("PORT").parse::<u16>().expect("Invalid port number"),
            access_jwt_secret: get_secret_env("ACCESS_JWT_SECRET"),
            origin: get_env("WEBSITE_URL"),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct StoreSettings {
    pub project_id: String,
    pub api_key: Secret<String>,
    base_url: Option<String>,
}

impl StoreSettings {
    pub fn get_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://firestore.googleapis.com/v1".into())
    }

    fn from_env() -> Self {
        Self {
            project_id: get_env("STORE_PROJECT_ID"),
            api_key: get_secret_env("STORE_API_KEY"),
            base_url: try_get_env("STORE_BASE_URL"),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
}

impl CatalogSettings {
    fn from_env() -> Self {
        Self {
            base_url: get_env("CATALOG_BASE_URL"),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct SmtpSettings {
    username: Secret<String>,
    password: Secret<String>,
    pub relay: String,
    address: String,
}

impl SmtpSettings {
    pub fn get_credentials(&self) -> Credentials {
        Credentials::new(
            self.username.expose_secret().to_owned(),
            self.password.expose_secret().to_owned(),
        )
    }

    pub fn get_address(&self) -> Address {
        self.address.parse::<Address>().unwrap()
    }

    fn from_env() -> Self {
        let config = Config::builder()
            .add_source(config::Environment::with_prefix("SMTP").separator("_"))
            .build()
            .unwrap();
        config.try_deserialize().unwrap()
    }
}

enum Environment {
    Local,
    Production,
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not supported environment. Use either `local` or `production`"
            )),
        }
    }
}

pub fn get_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_dir = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .map_or(Environment::Local, |env| {
            env.try_into().expect("Failed to parse APP_ENVIRONMENT.")
        });

    match environment {
        Environment::Local => {
            let settings = Config::builder()
                .add_source(config::File::from(config_dir.join("settings.toml")))
                .add_source(
                    config::Environment::with_prefix("APP")
                        .prefix_separator("_")
                        .separator("__"),
                );
            settings.build()?.try_deserialize()
        }

        Environment::Production => Ok(Settings {
            app: ApplicationSettings::from_env(),
            store: StoreSettings::from_env(),
            catalog: CatalogSettings::from_env(),
            smtp: SmtpSettings::from_env(),
        }),
    }
}

fn try_get_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn get_env(name: &str) -> String {
    std::env::var(name).expect(format!("Missing {name}").as_str())
}

fn get_secret_env(name: &str) -> Secret<String> {
    Secret::from(get_env(name))
}
