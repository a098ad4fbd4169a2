//! Turns a partial item payload into ordered, validated assignments.

use crate::error::AppError;
use crate::model::ItemPatch;
use crate::service::validation::{
    normalize_category, normalize_title, validate_score, validate_title_unique, validate_year,
};
use crate::sql::{Assignment, BindValue, Column, UpdatePlan};
use crate::store::ItemStore;

/// Checks every supplied field and returns assignments in the order title,
/// category, year, score. Absent fields produce nothing. Any failure aborts
/// the whole plan, so nothing is written.
pub async fn plan_update(store: &dyn ItemStore, id: i64, patch: ItemPatch) -> Result<UpdatePlan, AppError> {
    if patch.is_empty() {
        return Err(AppError::NoFields);
    }
    let title = patch.title.as_deref().map(normalize_title).transpose()?;
    if let Some(year) = patch.year {
        validate_year(year)?;
    }
    if let Some(score) = patch.score {
        validate_score(score)?;
    }
    if let Some(t) = &title {
        validate_title_unique(store, t, Some(id)).await?;
    }

    let mut assignments = Vec::new();
    if let Some(t) = title {
        assignments.push(Assignment { column: Column::Title, value: BindValue::Text(t) });
    }
    if let Some(c) = patch.category.as_deref() {
        assignments.push(Assignment { column: Column::Category, value: BindValue::Text(normalize_category(c)) });
    }
    if let Some(y) = patch.year {
        assignments.push(Assignment { column: Column::Year, value: BindValue::Int(y) });
    }
    if let Some(s) = patch.score {
        assignments.push(Assignment { column: Column::Score, value: BindValue::Int(s) });
    }
    if assignments.is_empty() {
        return Err(AppError::NoFields);
    }
    Ok(UpdatePlan { assignments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewItem;
    use crate::store::MemoryItemStore;

    async fn seeded() -> (MemoryItemStore, i64) {
        let store = MemoryItemStore::new();
        store
            .insert(&NewItem { title: "Nova".into(), category: Some("Drama".into()), year: 2020, score: 4 })
            .await
            .unwrap();
        let id = store
            .insert(&NewItem { title: "Orbit".into(), category: None, year: 2001, score: 2 })
            .await
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn empty_patch_is_no_fields() {
        let (store, id) = seeded().await;
        let err = plan_update(&store, id, ItemPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NoFields));
    }

    #[tokio::test]
    async fn only_present_fields_become_assignments() {
        let (store, id) = seeded().await;
        let patch = ItemPatch { score: Some(5), category: Some(" Sci-Fi ".into()), ..Default::default() };
        let plan = plan_update(&store, id, patch).await.unwrap();
        assert_eq!(
            plan.assignments,
            vec![
                Assignment { column: Column::Category, value: BindValue::Text("Sci-Fi".into()) },
                Assignment { column: Column::Score, value: BindValue::Int(5) },
            ]
        );
        assert_eq!(plan.id_index(), 3);
    }

    #[tokio::test]
    async fn title_taken_by_another_item_conflicts() {
        let (store, id) = seeded().await;
        let patch = ItemPatch { title: Some("NOVA".into()), ..Default::default() };
        assert!(matches!(plan_update(&store, id, patch).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn keeping_own_title_in_other_case_is_allowed() {
        let (store, id) = seeded().await;
        let patch = ItemPatch { title: Some("ORBIT".into()), ..Default::default() };
        assert!(plan_update(&store, id, patch).await.is_ok());
    }

    #[tokio::test]
    async fn out_of_range_values_abort_the_plan() {
        let (store, id) = seeded().await;
        let patch = ItemPatch { title: Some("Fresh".into()), score: Some(6), ..Default::default() };
        assert!(matches!(plan_update(&store, id, patch).await, Err(AppError::Validation(_))));
        let patch = ItemPatch { year: Some(1850), ..Default::default() };
        assert!(matches!(plan_update(&store, id, patch).await, Err(AppError::Validation(_))));
    }
}
