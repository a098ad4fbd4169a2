//! PostgreSQL-backed store and items table bootstrap.

use super::ItemStore;
use crate::error::StoreError;
use crate::model::{Item, NewItem};
use crate::sql::{self, Predicate, QueryBuf, UpdatePlan, ITEMS_TABLE};
use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{PgPool, Postgres};

/// Create the items table and its case-insensitive title index if missing.
/// Range checks are mirrored as CHECK constraints; the year upper bound moves
/// with the calendar and is only enforced by the service.
pub async fn ensure_items_table(pool: &PgPool) -> Result<(), StoreError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{table}" (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT,
            year INT NOT NULL CHECK (year >= 1900),
            score INT NOT NULL CHECK (score >= 0 AND score <= 5)
        )
        "#,
        table = ITEMS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    let index = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {table}_title_lower_key ON \"{table}\" (LOWER(title))",
        table = ITEMS_TABLE
    );
    sqlx::query(&index).execute(pool).await?;
    tracing::info!(table = ITEMS_TABLE, "items table checked or created");
    Ok(())
}

#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        PgItemStore { pool }
    }
}

fn bind_all<'q>(q: &'q QueryBuf) -> Query<'q, Postgres, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params.iter().fold(sqlx::query(&q.sql), |query, p| query.bind(p.clone()))
}

fn bind_all_as<'q, T>(q: &'q QueryBuf) -> QueryAs<'q, Postgres, T, PgArguments>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params.iter().fold(sqlx::query_as::<_, T>(&q.sql), |query, p| query.bind(p.clone()))
}

fn bind_all_scalar<'q, T>(q: &'q QueryBuf) -> QueryScalar<'q, Postgres, T, PgArguments>
where
    (T,): for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params.iter().fold(sqlx::query_scalar::<_, T>(&q.sql), |query, p| query.bind(p.clone()))
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn count_where(&self, predicates: &[Predicate]) -> Result<i64, StoreError> {
        let q = sql::count_where(predicates);
        let n: i64 = bind_all_scalar(&q).fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn select_page(
        &self,
        predicates: &[Predicate],
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Item>, StoreError> {
        let q = sql::select_page(predicates, offset, limit);
        let rows = bind_all_as::<Item>(&q).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let q = sql::select_by_id(id);
        let row = bind_all_as::<Item>(&q).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn exists_title(&self, title: &str, exclude_id: Option<i64>) -> Result<bool, StoreError> {
        let q = sql::exists_title(title, exclude_id);
        let exists: bool = bind_all_scalar(&q).fetch_one(&self.pool).await?;
        Ok(exists)
    }

    async fn insert(&self, item: &NewItem) -> Result<i64, StoreError> {
        let q = sql::insert(item);
        let id: i64 = bind_all_scalar(&q).fetch_one(&self.pool).await?;
        Ok(id)
    }

    async fn update_fields(&self, id: i64, plan: &UpdatePlan) -> Result<u64, StoreError> {
        let q = sql::update(id, plan);
        let result = bind_all(&q).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let q = sql::delete(id);
        let result = bind_all(&q).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
