//! Port traits (interfaces) for dependency injection

pub mod storage;

pub use storage::{
    no_match, Document, DocumentFilter, DocumentStore, DocumentUpdate, UpdateOutcome, ID_FIELD,
};
