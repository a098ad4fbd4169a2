//! In-process store for tests and local experiments. Enforces the same title
//! uniqueness and range constraints as the PostgreSQL table.

use super::ItemStore;
use crate::error::StoreError;
use crate::model::{Item, NewItem};
use crate::sql::{Assignment, BindValue, Column, Operator, Predicate, UpdatePlan};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Item>,
}

#[derive(Default)]
pub struct MemoryItemStore {
    table: Mutex<Table>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Backend(sqlx::Error::Protocol("memory store poisoned".into())))
    }
}

fn text_of(item: &Item, column: Column) -> Option<&str> {
    match column {
        Column::Title => Some(item.title.as_str()),
        Column::Category => item.category.as_deref(),
        _ => None,
    }
}

fn int_of(item: &Item, column: Column) -> Option<i64> {
    match column {
        Column::Id => Some(item.id),
        Column::Year => Some(i64::from(item.year)),
        Column::Score => Some(i64::from(item.score)),
        _ => None,
    }
}

fn matches(item: &Item, p: &Predicate) -> bool {
    match p.op {
        Operator::Eq => match (&p.value, text_of(item, p.column)) {
            (BindValue::Text(want), Some(have)) => have == want.as_str(),
            (BindValue::Text(_), None) => false,
            (v, _) => v.as_int().is_some() && v.as_int() == int_of(item, p.column),
        },
        Operator::Contains => match (p.value.as_text(), text_of(item, p.column)) {
            (Some(needle), Some(hay)) => hay.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        },
    }
}

fn title_taken(table: &Table, title: &str, exclude_id: Option<i64>) -> bool {
    let wanted = title.to_lowercase();
    table
        .rows
        .values()
        .any(|r| Some(r.id) != exclude_id && r.title.to_lowercase() == wanted)
}

fn check_ranges(year: i32, score: i32) -> Result<(), StoreError> {
    if year < 1900 {
        return Err(StoreError::CheckViolation("items_year_check".into()));
    }
    if !(0..=5).contains(&score) {
        return Err(StoreError::CheckViolation("items_score_check".into()));
    }
    Ok(())
}

fn type_mismatch(column: Column, value: &BindValue) -> StoreError {
    StoreError::Backend(sqlx::Error::Protocol(format!(
        "cannot assign {} to {}",
        value,
        column.name()
    )))
}

fn apply(item: &mut Item, a: &Assignment) -> Result<(), StoreError> {
    let as_i32 = || {
        a.value
            .as_int()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| type_mismatch(a.column, &a.value))
    };
    match (a.column, &a.value) {
        (Column::Title, BindValue::Text(s)) => item.title = s.clone(),
        (Column::Category, BindValue::Text(s)) => item.category = Some(s.clone()),
        (Column::Year, _) => item.year = as_i32()?,
        (Column::Score, _) => item.score = as_i32()?,
        (column, value) => return Err(type_mismatch(column, value)),
    }
    Ok(())
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn count_where(&self, predicates: &[Predicate]) -> Result<i64, StoreError> {
        let table = self.lock()?;
        let n = table
            .rows
            .values()
            .filter(|r| predicates.iter().all(|p| matches(r, p)))
            .count();
        Ok(n as i64)
    }

    async fn select_page(
        &self,
        predicates: &[Predicate],
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Item>, StoreError> {
        let table = self.lock()?;
        let rows = table
            .rows
            .values()
            .filter(|r| predicates.iter().all(|p| matches(r, p)))
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Item>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn exists_title(&self, title: &str, exclude_id: Option<i64>) -> Result<bool, StoreError> {
        let table = self.lock()?;
        Ok(title_taken(&table, title, exclude_id))
    }

    async fn insert(&self, item: &NewItem) -> Result<i64, StoreError> {
        let mut table = self.lock()?;
        if title_taken(&table, &item.title, None) {
            return Err(StoreError::UniqueViolation("items_title_lower_key".into()));
        }
        check_ranges(item.year, item.score)?;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, item.clone().into_item(id));
        Ok(id)
    }

    async fn update_fields(&self, id: i64, plan: &UpdatePlan) -> Result<u64, StoreError> {
        let mut table = self.lock()?;
        let Some(current) = table.rows.get(&id) else {
            return Ok(0);
        };
        let mut updated = current.clone();
        for a in &plan.assignments {
            apply(&mut updated, a)?;
        }
        if title_taken(&table, &updated.title, Some(id)) {
            return Err(StoreError::UniqueViolation("items_title_lower_key".into()));
        }
        check_ranges(updated.year, updated.score)?;
        table.rows.insert(id, updated);
        Ok(1)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        Ok(u64::from(self.lock()?.rows.remove(&id).is_some()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(title: &str, year: i32) -> NewItem {
        NewItem { title: title.into(), category: Some("Drama".into()), year, score: 3 }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = MemoryItemStore::new();
        assert_eq!(store.insert(&new_item("A", 2000)).await.unwrap(), 1);
        assert_eq!(store.insert(&new_item("B", 2001)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_title_is_a_unique_violation() {
        let store = MemoryItemStore::new();
        store.insert(&new_item("Nova", 2000)).await.unwrap();
        let err = store.insert(&new_item("NOVA", 2001)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn out_of_range_score_is_a_check_violation() {
        let store = MemoryItemStore::new();
        let mut item = new_item("A", 2000);
        item.score = 6;
        assert!(matches!(store.insert(&item).await, Err(StoreError::CheckViolation(_))));
    }

    #[tokio::test]
    async fn predicates_filter_case_insensitively() {
        let store = MemoryItemStore::new();
        store.insert(&new_item("The Nova Affair", 2000)).await.unwrap();
        store.insert(&new_item("Other", 2000)).await.unwrap();
        let preds = vec![Predicate::contains(Column::Title, "nOvA"), Predicate::equals(Column::Year, 2000)];
        assert_eq!(store.count_where(&preds).await.unwrap(), 1);
        let page = store.select_page(&preds, 0, 8).await.unwrap();
        assert_eq!(page[0].title, "The Nova Affair");
    }

    #[tokio::test]
    async fn exists_title_ignores_case_and_excluded_id() {
        let store = MemoryItemStore::new();
        let id = store.insert(&new_item("Nova", 2000)).await.unwrap();
        assert!(store.exists_title("nOVA", None).await.unwrap());
        assert!(!store.exists_title("NOVA", Some(id)).await.unwrap());
        assert!(!store.exists_title("Orbit", None).await.unwrap());
    }

    #[tokio::test]
    async fn update_missing_row_affects_nothing() {
        let store = MemoryItemStore::new();
        let n = store
            .update_fields(
                9,
                &UpdatePlan { assignments: vec![Assignment { column: Column::Score, value: BindValue::Int(1) }] },
            )
            .await
            .unwrap();
        assert_eq!(n, 0);
    }
}
