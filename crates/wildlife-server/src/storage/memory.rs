//! In-memory document store using DashMap
//!
//! Always reachable. Data lives as long as the process.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use wildlife_core::ports::{
    no_match, Document, DocumentFilter, DocumentStore, DocumentUpdate, UpdateOutcome, ID_FIELD,
};
use wildlife_core::Result;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Arc<DashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<String> {
        let id = uuid::Uuid::now_v7().to_string();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(id)
    }

    async fn find(&self, collection: &str, filter: &DocumentFilter) -> Result<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        update: &DocumentUpdate,
    ) -> Result<UpdateOutcome> {
        let mut documents = self.collections.get_mut(collection).ok_or_else(no_match)?;
        let document = documents
            .iter_mut()
            .find(|document| filter.matches(document))
            .ok_or_else(no_match)?;

        let modified = update.apply(document);
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &DocumentFilter) -> Result<u64> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        match documents.iter().position(|document| filter.matches(document)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wildlife_core::WildlifeError;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryDocumentStore::new();
        let id = store
            .insert_one("sightings", doc(json!({"speciesName": "Otter"})))
            .await
            .unwrap();

        let found = store
            .find_one("sightings", &DocumentFilter::by_id(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["speciesName"], "Otter");
        assert!(store.find("other", &DocumentFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_collection_is_not_found() {
        let store = MemoryDocumentStore::new();
        let result = store
            .update_one(
                "sightings",
                &DocumentFilter::by_id("nope"),
                &DocumentUpdate::Set(Document::new()),
            )
            .await;
        assert!(matches!(result, Err(WildlifeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_one_removes_first_match() {
        let store = MemoryDocumentStore::new();
        for name in ["Heron", "Heron", "Otter"] {
            store
                .insert_one("sightings", doc(json!({"speciesName": name})))
                .await
                .unwrap();
        }

        let filter = DocumentFilter::field_equals("speciesName", "Heron");
        assert_eq!(store.delete_one("sightings", &filter).await.unwrap(), 1);
        assert_eq!(store.find("sightings", &filter).await.unwrap().len(), 1);
        assert_eq!(store.delete_one("missing", &filter).await.unwrap(), 0);
    }
}
