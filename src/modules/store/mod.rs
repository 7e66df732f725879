pub mod firestore;
pub mod memory;

use axum::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const USERS: &str = "Users";
pub const GROUPS: &str = "Groups";
pub const TASKS: &str = "Tasks";

/// A document is a flat bag of JSON fields, keyed by collection and id.
pub type Document = Map<String, Value>;

pub type DynStore = Arc<dyn DocumentStore>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },
    #[error("malformed document in {collection}")]
    Malformed {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// One write in an atomic batch. Array ops and the increment match the
/// store's server-side primitives; `Insert` carries a must-not-exist
/// precondition so a lost race on id allocation fails instead of
/// overwriting the winner's document.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Insert {
        collection: &'static str,
        id: String,
        fields: Document,
    },
    Update {
        collection: &'static str,
        id: String,
        fields: Document,
    },
    Delete {
        collection: &'static str,
        id: String,
    },
    ArrayAdd {
        collection: &'static str,
        id: String,
        field: &'static str,
        value: Value,
    },
    ArrayRemove {
        collection: &'static str,
        id: String,
        field: &'static str,
        value: Value,
    },
    Increment {
        collection: &'static str,
        id: String,
        field: &'static str,
        delta: i64,
    },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &'static str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(
        &self,
        collection: &'static str,
        field: &str,
        equals: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Applies all writes atomically: either every write lands or none does.
    async fn apply(&self, writes: Vec<WriteOp>) -> Result<(), StoreError>;

    async fn insert(
        &self,
        collection: &'static str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.apply(vec![WriteOp::Insert {
            collection,
            id: id.to_string(),
            fields,
        }])
        .await
    }

    async fn update(
        &self,
        collection: &'static str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.apply(vec![WriteOp::Update {
            collection,
            id: id.to_string(),
            fields,
        }])
        .await
    }

    async fn delete(&self, collection: &'static str, id: &str) -> Result<(), StoreError> {
        self.apply(vec![WriteOp::Delete {
            collection,
            id: id.to_string(),
        }])
        .await
    }
}

pub fn decode<T: DeserializeOwned>(collection: &'static str, doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc)).map_err(|source| StoreError::Malformed {
        collection: collection.to_string(),
        source,
    })
}

pub fn encode<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Unexpected(anyhow::anyhow!(
            "value did not serialize to a document"
        ))),
        Err(e) => Err(StoreError::Unexpected(anyhow::Error::new(e))),
    }
}

/// Builds a partial-update document from a `json!` object literal.
pub fn fields(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Timestamps travel through the store as RFC 3339 strings.
pub fn timestamp_value(t: OffsetDateTime) -> Value {
    Value::String(t.format(&Rfc3339).expect("RFC 3339 formatting"))
}

/// The mobile clients wrote `group_id` as either null or the empty string;
/// both read back as "no group".
pub fn empty_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let opt = Option::<String>::deserialize(de)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
