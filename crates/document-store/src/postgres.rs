use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::document::with_id;
use crate::{
    Document, DocumentStoreError, ID_FIELD, ObjectId, Result, StoreConfig, UpdateOutcome,
    store::DocumentStore,
};

/// PostgreSQL-backed document store implementation.
///
/// Every collection lives in the single `documents` table; bodies are JSONB.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool described by `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(
            database = config.database_name.as_deref().unwrap_or("<from url>"),
            max_connections = config.max_connections,
            "connected to document store"
        );
        Ok(Self { pool })
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.pool.is_closed() {
            return Err(DocumentStoreError::Closed);
        }
        Ok(())
    }

    fn row_to_document(collection: &str, row: PgRow) -> Result<Document> {
        let body: Value = row.try_get("body")?;
        match body {
            Value::Object(document) => Ok(document),
            other => Err(DocumentStoreError::InvalidDocument {
                collection: collection.to_string(),
                reason: format!("expected a JSON object, found {other}"),
            }),
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId> {
        self.ensure_open()?;

        let id = ObjectId::new();
        let body = Value::Object(with_id(id, document));

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(id.to_hex())
        .bind(body)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        self.ensure_open()?;

        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_document(collection, row))
            .transpose()
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.ensure_open()?;

        let rows = sqlx::query(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Self::row_to_document(collection, row))
            .collect()
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        mut fields: Document,
    ) -> Result<UpdateOutcome> {
        self.ensure_open()?;

        // The identifier inside the body must stay in sync with the key column
        fields.remove(ID_FIELD);

        let row = sqlx::query(
            r#"
            WITH target AS (
                SELECT 1 FROM documents WHERE collection = $1 AND id = $2
            ), updated AS (
                UPDATE documents
                SET body = documents.body || $3
                WHERE collection = $1 AND id = $2
                  AND documents.body IS DISTINCT FROM documents.body || $3
                RETURNING 1
            )
            SELECT
                (SELECT COUNT(*) FROM target) AS matched,
                (SELECT COUNT(*) FROM updated) AS modified
            "#,
        )
        .bind(collection)
        .bind(id.to_hex())
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await?;

        let matched: i64 = row.try_get("matched")?;
        let modified: i64 = row.try_get("modified")?;
        Ok(UpdateOutcome {
            matched: matched.unsigned_abs(),
            modified: modified.unsigned_abs(),
        })
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64> {
        self.ensure_open()?;

        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.to_hex())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            tracing::info!("document store connection closed");
        }
    }
}
