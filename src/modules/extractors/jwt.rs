use crate::errors::AppError;
use axum::headers::authorization::{Authorization, Bearer};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    http::StatusCode,
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct JwtAccessSecret(pub Secret<String>);

/// Session claims minted by the external identity provider. `sub` is the
/// opaque user id every operation keys on; the profile fields feed the
/// sync-on-login user document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub exp: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    JwtAccessSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::exp(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

        let JwtAccessSecret(key) = JwtAccessSecret::from_ref(state);

        let mut validation = Validation::default();
        validation.leeway = 5;

        let data = decode::<Claims>(
            bearer.token(),
            &DecodingKey::from_secret(key.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::exp(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(data.claims)
    }
}
