use super::{Document, DocumentStore, StoreError, WriteOp};
use axum::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;

/// In-memory document store used by the test suite. Reads go straight to the
/// maps; batches serialize through one lock and are validated in full before
/// any write lands, matching the remote store's all-or-nothing commits.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<&'static str, DashMap<String, Document>>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self, collection: &'static str, id: &str) -> Option<Document> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id).map(|d| d.value().clone()))
    }

    fn put(&self, collection: &'static str, id: String, doc: Document) {
        self.collections
            .entry(collection)
            .or_insert_with(DashMap::new)
            .insert(id, doc);
    }

    fn check(&self, write: &WriteOp) -> Result<(), StoreError> {
        match write {
            WriteOp::Insert { collection, id, .. } => match self.doc(collection, id) {
                Some(_) => Err(StoreError::AlreadyExists {
                    collection: collection.to_string(),
                    id: id.clone(),
                }),
                None => Ok(()),
            },
            WriteOp::Delete { .. } => Ok(()),
            WriteOp::Update { collection, id, .. }
            | WriteOp::ArrayAdd { collection, id, .. }
            | WriteOp::ArrayRemove { collection, id, .. }
            | WriteOp::Increment { collection, id, .. } => match self.doc(collection, id) {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.clone(),
                }),
            },
        }
    }

    fn perform(&self, write: WriteOp) {
        match write {
            WriteOp::Insert {
                collection,
                id,
                fields,
            } => self.put(collection, id, fields),
            WriteOp::Update {
                collection,
                id,
                fields,
            } => {
                if let Some(mut doc) = self.doc(collection, &id) {
                    for (key, value) in fields {
                        doc.insert(key, value);
                    }
                    self.put(collection, id, doc);
                }
            }
            WriteOp::Delete { collection, id } => {
                if let Some(docs) = self.collections.get(collection) {
                    docs.remove(&id);
                }
            }
            WriteOp::ArrayAdd {
                collection,
                id,
                field,
                value,
            } => {
                if let Some(mut doc) = self.doc(collection, &id) {
                    let entry = doc
                        .entry(field.to_string())
                        .or_insert_with(|| Value::Array(vec![]));
                    if let Value::Array(items) = entry {
                        if !items.contains(&value) {
                            items.push(value);
                        }
                    }
                    self.put(collection, id, doc);
                }
            }
            WriteOp::ArrayRemove {
                collection,
                id,
                field,
                value,
            } => {
                if let Some(mut doc) = self.doc(collection, &id) {
                    if let Some(Value::Array(items)) = doc.get_mut(field) {
                        items.retain(|item| item != &value);
                    }
                    self.put(collection, id, doc);
                }
            }
            WriteOp::Increment {
                collection,
                id,
                field,
                delta,
            } => {
                if let Some(mut doc) = self.doc(collection, &id) {
                    let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
                    doc.insert(field.to_string(), Value::from(current + delta));
                    self.put(collection, id, doc);
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &'static str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.doc(collection, id))
    }

    async fn query(
        &self,
        collection: &'static str,
        field: &str,
        equals: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let matches = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|entry| entry.value().get(field) == Some(equals))
                    .map(|entry| entry.value().clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn apply(&self, writes: Vec<WriteOp>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        for write in &writes {
            self.check(write)?;
        }
        for write in writes {
            self.perform(write);
        }
        Ok(())
    }
}
