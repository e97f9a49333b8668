use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::store::{
    with_id, without_id, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    StoreError, UpdateResult,
};
use crate::config::DatabaseConfig;

/// Postgres-backed document store: one JSONB table per collection.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

/// Shared WHERE clause; `$1` is the optional id, `$2` the containment object.
const MATCH_CLAUSE: &str = "($1::uuid IS NULL OR id = $1) AND doc @> $2::jsonb";

impl PostgresStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::ConnectionError("no database url configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create collection tables and indexes if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            for statement in schema_statements(collection) {
                sqlx::query(&statement).execute(&self.pool).await?;
            }
        }
        info!("Collection schema ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn schema_statements(collection: Collection) -> Vec<String> {
    let table = quote_identifier(collection.name());
    let mut statements = vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
                id UUID PRIMARY KEY, \
                doc JSONB NOT NULL, \
                created_at TIMESTAMPTZ NOT NULL DEFAULT now())"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {table} USING GIN (doc jsonb_path_ops)",
            quote_identifier(&format!("{}_doc_idx", collection.name()))
        ),
    ];
    if let Some(field) = collection.unique_field() {
        statements.push(format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {table} ((doc->>'{field}'))",
            quote_identifier(&format!("{}_{}_key", collection.name(), field))
        ));
    }
    statements
}

fn select_sql(collection: Collection, single: bool) -> String {
    format!(
        "SELECT id, doc FROM {} WHERE {} ORDER BY created_at, id{}",
        quote_identifier(collection.name()),
        MATCH_CLAUSE,
        if single { " LIMIT 1" } else { "" }
    )
}

fn insert_sql(collection: Collection) -> String {
    format!(
        "INSERT INTO {} (id, doc) VALUES ($1, $2)",
        quote_identifier(collection.name())
    )
}

/// Reports matched and modified counts in one round-trip; `$3` is the `$set` object.
fn update_sql(collection: Collection) -> String {
    let table = quote_identifier(collection.name());
    format!(
        "WITH target AS (\
            SELECT id, doc FROM {table} WHERE {MATCH_CLAUSE} ORDER BY created_at, id LIMIT 1 FOR UPDATE\
         ), changed AS (\
            UPDATE {table} t SET doc = t.doc || $3::jsonb FROM target \
            WHERE t.id = target.id AND NOT (target.doc @> $3::jsonb) RETURNING t.id\
         ) \
         SELECT (SELECT COUNT(*) FROM target) AS matched, (SELECT COUNT(*) FROM changed) AS modified"
    )
}

fn delete_sql(collection: Collection) -> String {
    let table = quote_identifier(collection.name());
    format!(
        "DELETE FROM {table} WHERE id IN (\
            SELECT id FROM {table} WHERE {MATCH_CLAUSE} ORDER BY created_at, id LIMIT 1)"
    )
}

fn containment(filter: &Filter) -> Json<Value> {
    Json(Value::Object(filter.fields.clone()))
}

fn map_write_error(collection: Collection, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            if let Some(field) = collection.unique_field() {
                return StoreError::Duplicate {
                    collection: collection.name(),
                    field,
                };
            }
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(Uuid, Json<Document>)> = sqlx::query_as(&select_sql(collection, false))
            .bind(filter.id)
            .bind(containment(filter))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(id, Json(doc))| with_id(id, doc)).collect())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let row: Option<(Uuid, Json<Document>)> = sqlx::query_as(&select_sql(collection, true))
            .bind(filter.id)
            .bind(containment(filter))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, Json(doc))| with_id(id, doc)))
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOneResult, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query(&insert_sql(collection))
            .bind(id)
            .bind(Json(Value::Object(without_id(document))))
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult, StoreError> {
        let (matched, modified): (i64, i64) = sqlx::query_as(&update_sql(collection))
            .bind(filter.id)
            .bind(containment(filter))
            .bind(Json(Value::Object(without_id(set))))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: matched.unsigned_abs(),
            modified_count: modified.unsigned_abs(),
            upserted_id: None,
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let result = sqlx::query(&delete_sql(collection))
            .bind(filter.id)
            .bind(containment(filter))
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
