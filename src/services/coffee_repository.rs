//! Coffee repository - the mapping from logical operations to store calls.
//!
//! Each coffee is one row of the `coffees` table: a database generated UUID
//! and a `JSONB` document holding every attribute the client sent.
//!
//! # Guarantees
//!
//! - Every operation is exactly one statement; nothing spans records.
//! - Every statement is awaited before its result is returned.
//! - A missing coffee is never an error: `None` for reads, zero counts for writes.

use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    db::DbPool,
    error::AppError,
    models::coffee::{Coffee, CoffeeDocument, CoffeeId, CoffeeRow, DeleteAck, InsertAck, UpdateAck},
};

/// Data access for the coffee collection.
///
/// Implementations are shared by all request handlers behind an `Arc`, so
/// every method takes `&self` and must be safe to call concurrently.
#[async_trait]
pub trait CoffeeRepository: Send + Sync {
    /// Every coffee, in the store's natural order.
    async fn list(&self) -> Result<Vec<Coffee>, AppError>;

    /// The coffee with this id, or `None` when there is none.
    async fn get(&self, id: CoffeeId) -> Result<Option<Coffee>, AppError>;

    /// Store a new document. The store assigns the id.
    async fn insert(&self, document: CoffeeDocument) -> Result<InsertAck, AppError>;

    /// Merge `set` into the stored document, leaving other fields untouched.
    async fn update(&self, id: CoffeeId, set: CoffeeDocument) -> Result<UpdateAck, AppError>;

    /// Remove the coffee with this id.
    async fn delete(&self, id: CoffeeId) -> Result<DeleteAck, AppError>;

    /// Round-trip to the store, used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}

/// SQLSTATE raised when JSONB cannot hold a string, e.g. one containing `\u0000`.
const UNTRANSLATABLE_CHARACTER: &str = "22P05";

/// Values JSONB refuses to store are the client's fault, not the store's.
fn unstorable_as_invalid(err: sqlx::Error) -> AppError {
    let unstorable = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNTRANSLATABLE_CHARACTER);

    if unstorable {
        AppError::InvalidRequest("coffee contains a value the store cannot hold".to_string())
    } else {
        AppError::Database(err)
    }
}

/// `CoffeeRepository` backed by the PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgCoffeeRepository {
    pool: DbPool,
}

impl PgCoffeeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoffeeRepository for PgCoffeeRepository {
    async fn list(&self) -> Result<Vec<Coffee>, AppError> {
        // No ORDER BY: clients get the table's natural order
        let rows = sqlx::query_as::<_, CoffeeRow>("SELECT id, doc FROM coffees")
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "listed coffees");

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: CoffeeId) -> Result<Option<Coffee>, AppError> {
        tracing::debug!(%id, "fetching coffee");

        let row = sqlx::query_as::<_, CoffeeRow>("SELECT id, doc FROM coffees WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, document: CoffeeDocument) -> Result<InsertAck, AppError> {
        let id: uuid::Uuid =
            sqlx::query_scalar("INSERT INTO coffees (doc) VALUES ($1) RETURNING id")
                .bind(Json(document))
                .fetch_one(&self.pool)
                .await
                .map_err(unstorable_as_invalid)?;

        tracing::debug!(%id, "inserted coffee");

        Ok(InsertAck::new(id.into()))
    }

    async fn update(&self, id: CoffeeId, set: CoffeeDocument) -> Result<UpdateAck, AppError> {
        // `||` on JSONB overwrites the keys present in `set` and keeps the rest.
        // The CTE keeps the previous document so an update that writes the same
        // values reports a match without a modification.
        let modified: Vec<bool> = sqlx::query_scalar(
            r#"
            WITH previous AS (
                SELECT id, doc FROM coffees WHERE id = $1 FOR UPDATE
            )
            UPDATE coffees
            SET doc = coffees.doc || $2
            FROM previous
            WHERE coffees.id = previous.id
            RETURNING previous.doc IS DISTINCT FROM coffees.doc
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(set))
        .fetch_all(&self.pool)
        .await
        .map_err(unstorable_as_invalid)?;

        let matched = modified.len() as u64;
        let modified = modified.into_iter().filter(|changed| *changed).count() as u64;
        tracing::debug!(%id, matched, modified, "updated coffee");

        Ok(UpdateAck::new(matched, modified))
    }

    async fn delete(&self, id: CoffeeId) -> Result<DeleteAck, AppError> {
        let deleted = sqlx::query("DELETE FROM coffees WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(%id, deleted, "deleted coffee");

        Ok(DeleteAck::new(deleted))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
