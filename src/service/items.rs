//! Item operations against an injected store.

use crate::error::AppError;
use crate::model::{Item, ItemPatch, NewItem};
use crate::service::mutation::plan_update;
use crate::service::query::{list_items, ItemPage, Pagination};
use crate::service::validation::{
    normalize_category, normalize_title, validate_score, validate_title_unique, validate_year,
};
use crate::sql::ItemFilter;
use crate::store::ItemStore;

pub struct ItemService;

impl ItemService {
    /// Validate every field, pre-check the title, then insert. Returns the stored record.
    pub async fn create(store: &dyn ItemStore, body: NewItem) -> Result<Item, AppError> {
        let title = normalize_title(&body.title)?;
        validate_year(body.year)?;
        validate_score(body.score)?;
        validate_title_unique(store, &title, None).await?;
        let item = NewItem {
            title,
            category: body.category.as_deref().map(normalize_category),
            year: body.year,
            score: body.score,
        };
        let id = store.insert(&item).await?;
        tracing::info!(id, title = %item.title, "item created");
        Ok(item.into_item(id))
    }

    pub async fn list(
        store: &dyn ItemStore,
        filter: &ItemFilter,
        pagination: Pagination,
    ) -> Result<ItemPage, AppError> {
        list_items(store, filter, pagination).await
    }

    pub async fn read(store: &dyn ItemStore, id: i64) -> Result<Item, AppError> {
        store.fetch_by_id(id).await?.ok_or_else(AppError::item_not_found)
    }

    /// Apply a partial update. Exactly one row must change; zero rows is not found.
    pub async fn update(store: &dyn ItemStore, id: i64, patch: ItemPatch) -> Result<i64, AppError> {
        let plan = plan_update(store, id, patch).await?;
        let affected = store.update_fields(id, &plan).await?;
        if affected == 0 {
            return Err(AppError::item_not_found());
        }
        tracing::info!(id, fields = plan.assignments.len(), "item updated");
        Ok(id)
    }

    pub async fn delete(store: &dyn ItemStore, id: i64) -> Result<(), AppError> {
        let affected = store.delete_by_id(id).await?;
        if affected == 0 {
            return Err(AppError::item_not_found());
        }
        tracing::info!(id, "item deleted");
        Ok(())
    }
}
