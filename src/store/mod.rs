//! Record store interface and its implementations.

mod memory;
mod pg;

pub use memory::MemoryItemStore;
pub use pg::{ensure_items_table, PgItemStore};

use crate::error::StoreError;
use crate::model::{Item, NewItem};
use crate::sql::{Predicate, UpdatePlan};
use async_trait::async_trait;

/// Operations the item service needs from its backing table. Implementations
/// must be safe to share across concurrent requests and must enforce
/// case-insensitive title uniqueness themselves.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn count_where(&self, predicates: &[Predicate]) -> Result<i64, StoreError>;

    /// Rows matching all predicates, ordered by id ascending.
    async fn select_page(
        &self,
        predicates: &[Predicate],
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Item>, StoreError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Item>, StoreError>;

    async fn exists_title(&self, title: &str, exclude_id: Option<i64>) -> Result<bool, StoreError>;

    /// Returns the id assigned to the new row.
    async fn insert(&self, item: &NewItem) -> Result<i64, StoreError>;

    /// Returns the number of rows affected.
    async fn update_fields(&self, id: i64, plan: &UpdatePlan) -> Result<u64, StoreError>;

    /// Returns the number of rows affected.
    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
