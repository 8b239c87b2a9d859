//! SQLite document store (embedded, no external dependencies)
//!
//! Documents live in one `documents` table as JSON text, partitioned by
//! collection. `seq` preserves insertion order. The pool is opened lazily on
//! first use and re-opened when a liveness ping fails.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use wildlife_core::ports::{
    no_match, Document, DocumentFilter, DocumentStore, DocumentUpdate, UpdateOutcome, ID_FIELD,
};
use wildlife_core::{Result, WildlifeError};

use super::{connect_with_retry, StoreSettings};

pub struct SqliteDocumentStore {
    database_path: String,
    settings: StoreSettings,
    state: Mutex<PoolState>,
    /// Number of finished connect rounds, readable without the lock
    rounds: AtomicU64,
}

#[derive(Default)]
struct PoolState {
    pool: Option<SqlitePool>,
    /// `(attempts, reason)` of the most recent round when it failed
    last_failure: Option<(u32, String)>,
}

impl SqliteDocumentStore {
    /// Create a store for `database_path`. No connection is made until first use.
    pub fn new(database_path: impl Into<String>, settings: StoreSettings) -> Self {
        Self {
            database_path: database_path.into(),
            settings,
            state: Mutex::new(PoolState::default()),
            rounds: AtomicU64::new(0),
        }
    }

    /// A live pool, connecting (with retry) when there is none or the current one is dead.
    ///
    /// Callers that queued on the lock while a connect round was running get that
    /// round's failure back instead of starting a round of their own.
    async fn pool(&self) -> Result<SqlitePool> {
        let seen = self.rounds.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(pool) = state.pool.as_ref() {
            match timeout(
                self.settings.ping_timeout,
                sqlx::query("SELECT 1").execute(pool),
            )
            .await
            {
                Ok(Ok(_)) => return Ok(pool.clone()),
                Ok(Err(e)) => warn!("Database ping failed, reconnecting: {}", e),
                Err(_) => warn!("Database ping timed out, reconnecting"),
            }
            if let Some(stale) = state.pool.take() {
                stale.close().await;
            }
        } else if self.rounds.load(Ordering::Acquire) != seen {
            if let Some((attempts, reason)) = state.last_failure.clone() {
                debug!("Reusing the connect round that finished while waiting");
                return Err(WildlifeError::StoreUnavailable { attempts, reason });
            }
        }

        let target = format!("SQLite database at {}", self.database_path);
        let result = connect_with_retry(&self.settings.retry, &target, |_| self.connect_once()).await;
        self.rounds.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(pool) => {
                state.pool = Some(pool.clone());
                state.last_failure = None;
                Ok(pool)
            }
            Err(e) => {
                if let WildlifeError::StoreUnavailable { attempts, reason } = &e {
                    state.last_failure = Some((*attempts, reason.clone()));
                }
                Err(e)
            }
        }
    }

    async fn connect_once(&self) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.settings.operation_timeout);

        let pool = timeout(
            self.settings.connect_timeout,
            SqlitePoolOptions::new()
                .max_connections(self.settings.max_connections.max(1))
                .acquire_timeout(self.settings.connect_timeout)
                .connect_with(options),
        )
        .await
        .map_err(|_| {
            WildlifeError::Timeout(format!(
                "connecting to {} took longer than {:?}",
                self.database_path, self.settings.connect_timeout
            ))
        })?
        .map_err(store_error)?;

        Self::run_migrations(&pool).await?;
        Ok(pool)
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                collection TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(store_error)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_collection
            ON documents (collection, seq)
            "#,
        )
        .execute(pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    /// Run one store call under the per-operation timeout
    async fn timed<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match timeout(self.settings.operation_timeout, call).await {
            Ok(result) => result.map_err(store_error),
            Err(_) => Err(WildlifeError::Timeout(format!(
                "{} took longer than {:?}",
                operation, self.settings.operation_timeout
            ))),
        }
    }
}

fn store_error(e: sqlx::Error) -> WildlifeError {
    WildlifeError::Store(e.to_string())
}

/// SQL condition (after `collection = ?1`) and its bind values for a filter
fn filter_clause(filter: &DocumentFilter) -> (&'static str, Vec<String>) {
    match filter {
        DocumentFilter::All => ("", Vec::new()),
        DocumentFilter::ById(id) => (" AND id = ?2", vec![id.clone()]),
        DocumentFilter::FieldEquals { field, value } => (
            " AND json_extract(body, ?2) = json_extract(?3, '$')",
            vec![json_path(field), value.to_string()],
        ),
    }
}

fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', "\\\""))
}

fn parse_body(body: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(document) => Ok(document),
        other => Err(WildlifeError::Serialization(format!(
            "stored document is not an object: {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn ping(&self) -> Result<()> {
        self.pool().await.map(|_| ())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<String> {
        let pool = self.pool().await?;

        let id = uuid::Uuid::now_v7().to_string();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        let body = serde_json::to_string(&document)?;

        self.timed(
            "insert",
            sqlx::query(
                r#"
                INSERT INTO documents (id, collection, body)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(&id)
            .bind(collection)
            .bind(&body)
            .execute(&pool),
        )
        .await?;

        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn find(&self, collection: &str, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let pool = self.pool().await?;

        let (clause, binds) = filter_clause(filter);
        let sql = format!(
            "SELECT body FROM documents WHERE collection = ?1{} ORDER BY seq",
            clause
        );
        let mut query = sqlx::query_as::<_, (String,)>(&sql).bind(collection);
        for value in binds {
            query = query.bind(value);
        }

        let rows = self.timed("find", query.fetch_all(&pool)).await?;
        debug!("Found {} documents in {}", rows.len(), collection);

        rows.iter().map(|(body,)| parse_body(body)).collect()
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        update: &DocumentUpdate,
    ) -> Result<UpdateOutcome> {
        let pool = self.pool().await?;

        let (clause, binds) = filter_clause(filter);
        let sql = format!(
            "SELECT seq, body FROM documents WHERE collection = ?1{} ORDER BY seq LIMIT 1",
            clause
        );

        let mut tx = self.timed("begin", pool.begin()).await?;

        let mut query = sqlx::query_as::<_, (i64, String)>(&sql).bind(collection);
        for value in binds {
            query = query.bind(value);
        }
        let row = self.timed("update lookup", query.fetch_optional(&mut *tx)).await?;

        let Some((seq, body)) = row else {
            return Err(no_match());
        };

        let mut document = parse_body(&body)?;
        let modified = update.apply(&mut document);

        if modified {
            let body = serde_json::to_string(&document)?;
            self.timed(
                "update",
                sqlx::query(
                    r#"
                    UPDATE documents SET body = ?1, updated_at = datetime('now')
                    WHERE seq = ?2
                    "#,
                )
                .bind(&body)
                .bind(seq)
                .execute(&mut *tx),
            )
            .await?;
        }

        self.timed("commit", tx.commit()).await?;

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &DocumentFilter) -> Result<u64> {
        let pool = self.pool().await?;

        let (clause, binds) = filter_clause(filter);
        let sql = format!(
            "DELETE FROM documents WHERE seq = (
                SELECT seq FROM documents WHERE collection = ?1{} ORDER BY seq LIMIT 1
            )",
            clause
        );
        let mut query = sqlx::query(&sql).bind(collection);
        for value in binds {
            query = query.bind(value);
        }

        let result = self.timed("delete", query.execute(&pool)).await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        if let Some(pool) = self.state.lock().await.pool.take() {
            pool.close().await;
            info!("Database connection closed");
        }
    }
}
