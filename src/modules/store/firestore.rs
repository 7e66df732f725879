use super::{Document, DocumentStore, StoreError, WriteOp};
use crate::configuration::StoreSettings;
use anyhow::{anyhow, Context};
use axum::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Firestore REST v1 adapter. Documents are read and written through
/// `documents:get/patch/delete/runQuery/commit`; `apply` maps one batch onto
/// one `commit`, which the store executes atomically.
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: Secret<String>,
}

impl FirestoreStore {
    pub fn new(config: StoreSettings) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Faxinex")
                .build()
                .expect("Failed to build store http client"),
            base_url: config.get_base_url(),
            project_id: config.project_id.clone(),
            api_key: config.api_key,
        }
    }

    fn root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, collection, id
        )
    }

    fn render_write(&self, write: &WriteOp) -> Value {
        match write {
            WriteOp::Insert {
                collection,
                id,
                fields,
            } => json!({
                "update": {
                    "name": self.doc_name(collection, id),
                    "fields": to_firestore_fields(fields),
                },
                "currentDocument": { "exists": false },
            }),
            WriteOp::Update {
                collection,
                id,
                fields,
            } => json!({
                "update": {
                    "name": self.doc_name(collection, id),
                    "fields": to_firestore_fields(fields),
                },
                "updateMask": { "fieldPaths": fields.keys().collect::<Vec<_>>() },
                "currentDocument": { "exists": true },
            }),
            WriteOp::Delete { collection, id } => json!({
                "delete": self.doc_name(collection, id),
            }),
            WriteOp::ArrayAdd {
                collection,
                id,
                field,
                value,
            } => json!({
                "transform": {
                    "document": self.doc_name(collection, id),
                    "fieldTransforms": [{
                        "fieldPath": field,
                        "appendMissingElements": { "values": [to_firestore_value(value)] },
                    }],
                },
            }),
            WriteOp::ArrayRemove {
                collection,
                id,
                field,
                value,
            } => json!({
                "transform": {
                    "document": self.doc_name(collection, id),
                    "fieldTransforms": [{
                        "fieldPath": field,
                        "removeAllFromArray": { "values": [to_firestore_value(value)] },
                    }],
                },
            }),
            WriteOp::Increment {
                collection,
                id,
                field,
                delta,
            } => json!({
                "transform": {
                    "document": self.doc_name(collection, id),
                    "fieldTransforms": [{
                        "fieldPath": field,
                        "increment": { "integerValue": delta.to_string() },
                    }],
                },
            }),
        }
    }

    /// Attributes a failed commit to the write that could have caused it.
    fn classify_failure(status: StatusCode, writes: &[WriteOp]) -> Option<StoreError> {
        match status {
            StatusCode::CONFLICT => writes.iter().find_map(|w| match w {
                WriteOp::Insert { collection, id, .. } => Some(StoreError::AlreadyExists {
                    collection: collection.to_string(),
                    id: id.clone(),
                }),
                _ => None,
            }),
            StatusCode::NOT_FOUND => writes.iter().find_map(|w| match w {
                WriteOp::Update { collection, id, .. }
                | WriteOp::ArrayAdd { collection, id, .. }
                | WriteOp::ArrayRemove { collection, id, .. }
                | WriteOp::Increment { collection, id, .. } => Some(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.clone(),
                }),
                _ => None,
            }),
            _ => None,
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &'static str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = format!(
            "{}/{}/{}?key={}",
            self.root(),
            collection,
            id,
            self.api_key.expose_secret()
        );
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach document store")?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = res
            .error_for_status()
            .context("Document store rejected the read")?
            .json()
            .await
            .context("Failed to parse store response")?;

        Ok(Some(from_firestore_fields(&body["fields"])))
    }

    async fn query(
        &self,
        collection: &'static str,
        field: &str,
        equals: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let url = format!("{}:runQuery?key={}", self.root(), self.api_key.expose_secret());
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": to_firestore_value(equals),
                    },
                },
            },
        });

        let res: Vec<Value> = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach document store")?
            .error_for_status()
            .context("Document store rejected the query")?
            .json()
            .await
            .context("Failed to parse store response")?;

        Ok(res
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(|doc| from_firestore_fields(&doc["fields"]))
            .collect())
    }

    async fn apply(&self, writes: Vec<WriteOp>) -> Result<(), StoreError> {
        let url = format!("{}:commit?key={}", self.root(), self.api_key.expose_secret());
        let body = json!({
            "writes": writes.iter().map(|w| self.render_write(w)).collect::<Vec<_>>(),
        });

        let res = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach document store")?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        if let Some(classified) = Self::classify_failure(status, &writes) {
            return Err(classified);
        }
        let message = res.text().await.unwrap_or_default();
        Err(StoreError::Unexpected(anyhow!(
            "store commit failed with {status}: {message}"
        )))
    }
}

fn to_firestore_fields(doc: &Document) -> Value {
    let mut fields = Map::new();
    for (key, value) in doc {
        fields.insert(key.clone(), to_firestore_value(value));
    }
    Value::Object(fields)
}

fn from_firestore_fields(fields: &Value) -> Document {
    let mut doc = Document::new();
    if let Some(map) = fields.as_object() {
        for (key, value) in map {
            doc.insert(key.clone(), from_firestore_value(value));
        }
    }
    doc
}

fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        // dates travel as RFC 3339 strings; keep them timestamps on the wire
        // so documents stay compatible with what the mobile clients wrote
        Value::String(s) => {
            if OffsetDateTime::parse(s, &Rfc3339).is_ok() {
                json!({ "timestampValue": s })
            } else {
                json!({ "stringValue": s })
            }
        }
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore_value).collect::<Vec<_>>() },
        }),
        Value::Object(map) => {
            let mut fields = Map::new();
            for (key, value) in map {
                fields.insert(key.clone(), to_firestore_value(value));
            }
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

fn from_firestore_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };
    if let Some((kind, inner)) = map.iter().next() {
        match kind.as_str() {
            "nullValue" => Value::Null,
            "booleanValue" => inner.clone(),
            "integerValue" => inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(Value::from)
                .unwrap_or(Value::Null),
            "doubleValue" => inner.clone(),
            "timestampValue" | "stringValue" | "referenceValue" => inner.clone(),
            "arrayValue" => {
                let items = inner["values"]
                    .as_array()
                    .map(|values| values.iter().map(from_firestore_value).collect())
                    .unwrap_or_default();
                Value::Array(items)
            }
            "mapValue" => Value::Object(from_firestore_fields(&inner["fields"])),
            _ => Value::Null,
        }
    } else {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_values_round_trip() {
        let doc = crate::modules::store::fields(json!({
            "id": "A1B2C",
            "points": 42,
            "isAdmin": false,
            "group_id": null,
            "participants": ["u1", "u2"],
            "createdAt": "2025-06-01T12:00:00Z",
        }));

        let wire = to_firestore_fields(&doc);
        assert_eq!(wire["points"], json!({ "integerValue": "42" }));
        assert_eq!(
            wire["createdAt"],
            json!({ "timestampValue": "2025-06-01T12:00:00Z" })
        );
        assert_eq!(wire["group_id"], json!({ "nullValue": null }));

        let back = from_firestore_fields(&wire);
        assert_eq!(back, doc);
    }

    #[test]
    fn update_write_carries_mask_and_precondition() {
        let store = FirestoreStore {
            client: Client::new(),
            base_url: "https://firestore.googleapis.com/v1".into(),
            project_id: "faxinex-test".into(),
            api_key: Secret::new("k".into()),
        };
        let write = store.render_write(&WriteOp::Update {
            collection: "Users",
            id: "u1".into(),
            fields: crate::modules::store::fields(json!({ "group_id": "AB12C" })),
        });

        assert_eq!(write["updateMask"]["fieldPaths"], json!(["group_id"]));
        assert_eq!(write["currentDocument"]["exists"], json!(true));
        assert_eq!(
            write["update"]["name"],
            json!("projects/faxinex-test/databases/(default)/documents/Users/u1")
        );
    }

    #[test]
    fn increment_renders_as_field_transform() {
        let store = FirestoreStore {
            client: Client::new(),
            base_url: "https://firestore.googleapis.com/v1".into(),
            project_id: "faxinex-test".into(),
            api_key: Secret::new("k".into()),
        };
        let write = store.render_write(&WriteOp::Increment {
            collection: "Users",
            id: "u1".into(),
            field: "points",
            delta: 5,
        });

        assert_eq!(
            write["transform"]["fieldTransforms"][0]["increment"],
            json!({ "integerValue": "5" })
        );
    }
}
