//! Document store port
//!
//! A collection-oriented store of JSON documents. Implementations own their
//! connection handling: every operation ensures connectivity first and fails
//! with [`WildlifeError::StoreUnavailable`] once the connection budget is spent.

use crate::{Result, WildlifeError};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A stored JSON object
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier of every document
pub const ID_FIELD: &str = "_id";

/// Selects the documents an operation applies to
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentFilter {
    All,
    ById(String),
    /// Top-level field equality
    FieldEquals { field: String, value: Value },
}

impl DocumentFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        DocumentFilter::ById(id.into())
    }

    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        DocumentFilter::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            DocumentFilter::All => true,
            DocumentFilter::ById(id) => {
                document.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str())
            }
            DocumentFilter::FieldEquals { field, value } => document.get(field) == Some(value),
        }
    }
}

/// A modification applied to a single document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentUpdate {
    /// Replace top-level fields
    Set(Document),
    /// Append to an array field (created when absent), then replace top-level fields
    Push {
        field: String,
        values: Vec<Value>,
        set: Document,
    },
}

impl DocumentUpdate {
    /// Apply the update in place. Returns whether the document changed.
    ///
    /// The identifier field is never modified.
    pub fn apply(&self, document: &mut Document) -> bool {
        match self {
            DocumentUpdate::Set(fields) => set_fields(document, fields),
            DocumentUpdate::Push { field, values, set } => {
                let mut modified = false;
                if field != ID_FIELD && !values.is_empty() {
                    let entry = document
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if !entry.is_array() {
                        *entry = Value::Array(Vec::new());
                    }
                    if let Value::Array(items) = entry {
                        items.extend(values.iter().cloned());
                    }
                    modified = true;
                }
                set_fields(document, set) || modified
            }
        }
    }
}

fn set_fields(document: &mut Document, fields: &Document) -> bool {
    let mut modified = false;
    for (key, value) in fields {
        if key == ID_FIELD || document.get(key) == Some(value) {
            continue;
        }
        document.insert(key.clone(), value.clone());
        modified = true;
    }
    modified
}

/// Result of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Collection-backed document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check connectivity, connecting if needed
    async fn ping(&self) -> Result<()>;

    /// Insert a document and return the identifier the store assigned to it
    async fn insert_one(&self, collection: &str, document: Document) -> Result<String>;

    /// All matching documents in insertion order
    async fn find(&self, collection: &str, filter: &DocumentFilter) -> Result<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: &DocumentFilter) -> Result<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    /// Update the first matching document.
    ///
    /// Fails with [`WildlifeError::NotFound`] when nothing matches.
    async fn update_one(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        update: &DocumentUpdate,
    ) -> Result<UpdateOutcome>;

    /// Delete the first matching document, returning the number removed
    async fn delete_one(&self, collection: &str, filter: &DocumentFilter) -> Result<u64>;

    /// Release the connection; a later operation reconnects lazily
    async fn close(&self);
}

/// Error reported when an update or delete matches nothing
pub fn no_match() -> WildlifeError {
    WildlifeError::NotFound("No document found with the specified filter".to_string())
}
