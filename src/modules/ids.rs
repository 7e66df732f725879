use crate::modules::store::{DocumentStore, StoreError};
use anyhow::anyhow;
use nanoid::nanoid;
use tracing::debug;

pub const ID_ALPHABET: [char; 36] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

pub const GROUP_ID_LENGTH: usize = 5;
pub const TASK_ID_LENGTH: usize = 8;

const MAX_ATTEMPTS: u32 = 16;
const WIDEN_EVERY: u32 = 4;

pub fn generate_id(length: usize) -> String {
    nanoid!(length, &ID_ALPHABET)
}

/// Allocates a code not currently present in the collection. The retry loop
/// is bounded: every fourth collision widens the code by one character, and
/// the allocation fails outright once the attempts run out. The final word
/// on uniqueness belongs to the insert precondition on the write that claims
/// the id.
pub async fn unique_id(
    store: &dyn DocumentStore,
    collection: &'static str,
    length: usize,
) -> Result<String, StoreError> {
    let mut length = length;
    for attempt in 1..=MAX_ATTEMPTS {
        let id = generate_id(length);
        if store.get(collection, &id).await?.is_none() {
            return Ok(id);
        }
        debug!("id collision in {collection} on attempt {attempt}");
        if attempt % WIDEN_EVERY == 0 {
            length += 1;
        }
    }
    Err(StoreError::Unexpected(anyhow!(
        "exhausted id allocation attempts for {collection}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::{fields, memory::MemoryStore, Document, WriteOp, GROUPS};
    use axum::async_trait;
    use serde_json::{json, Value};

    #[test]
    fn generated_ids_use_the_code_alphabet() {
        for _ in 0..100 {
            let id = generate_id(GROUP_ID_LENGTH);
            assert_eq!(id.len(), GROUP_ID_LENGTH);
            assert!(id.chars().all(|c| ID_ALPHABET.contains(&c)));
        }
    }

    #[tokio::test]
    async fn allocation_skips_taken_ids() {
        let store = MemoryStore::new();
        let taken = unique_id(&store, GROUPS, GROUP_ID_LENGTH).await.unwrap();
        store
            .insert(GROUPS, &taken, fields(json!({ "name": "Casa" })))
            .await
            .unwrap();

        let fresh = unique_id(&store, GROUPS, GROUP_ID_LENGTH).await.unwrap();
        assert_ne!(taken, fresh);
    }

    /// Store where every candidate id is already taken.
    struct SaturatedStore;

    #[async_trait]
    impl DocumentStore for SaturatedStore {
        async fn get(&self, _: &'static str, _: &str) -> Result<Option<Document>, StoreError> {
            Ok(Some(Document::new()))
        }

        async fn query(
            &self,
            _: &'static str,
            _: &str,
            _: &Value,
        ) -> Result<Vec<Document>, StoreError> {
            Ok(Vec::new())
        }

        async fn apply(&self, _: Vec<WriteOp>) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn allocation_gives_up_when_codes_never_free() {
        let res = unique_id(&SaturatedStore, GROUPS, GROUP_ID_LENGTH).await;
        match res {
            Err(StoreError::Unexpected(_)) => (),
            _ => panic!("Test result is {:?}", res),
        }
    }
}
