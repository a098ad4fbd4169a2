//! Field validation for item writes.

use crate::error::AppError;
use crate::store::ItemStore;
use chrono::Datelike;

pub const MIN_YEAR: i32 = 1900;
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 5;

/// Calendar year from the wall clock, read on every call.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn validate_year(year: i32) -> Result<(), AppError> {
    validate_year_against(year, current_year())
}

/// Year check with an explicit upper bound.
pub fn validate_year_against(year: i32, max_year: i32) -> Result<(), AppError> {
    if year < MIN_YEAR || year > max_year {
        return Err(AppError::Validation(format!(
            "year must be between {} and {}",
            MIN_YEAR, max_year
        )));
    }
    Ok(())
}

pub fn validate_score(score: i32) -> Result<(), AppError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(AppError::Validation(format!(
            "score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }
    Ok(())
}

/// Trims the title and rejects it when nothing is left.
pub fn normalize_title(title: &str) -> Result<String, AppError> {
    let t = title.trim();
    if t.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    Ok(t.to_string())
}

pub fn normalize_category(category: &str) -> String {
    category.trim().to_string()
}

/// Case-insensitive uniqueness pre-check. A match on `exclude_id` itself is not
/// a conflict. The store's unique index still decides races between writers.
pub async fn validate_title_unique(
    store: &dyn ItemStore,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    if store.exists_title(title, exclude_id).await? {
        return Err(AppError::duplicate_title());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewItem;
    use crate::store::MemoryItemStore;

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(validate_year_against(1899, 2026).is_err());
        assert!(validate_year_against(1900, 2026).is_ok());
        assert!(validate_year_against(2026, 2026).is_ok());
        assert!(validate_year_against(2027, 2026).is_err());
    }

    #[test]
    fn year_upper_bound_follows_the_clock() {
        let now = current_year();
        assert!(validate_year(now).is_ok());
        assert!(validate_year(now + 1).is_err());
    }

    #[test]
    fn score_accepts_exactly_zero_to_five() {
        for s in -3..=9 {
            assert_eq!(validate_score(s).is_ok(), (0..=5).contains(&s), "score {}", s);
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(normalize_title("   ").is_err());
        assert_eq!(normalize_title("  Nova ").unwrap(), "Nova");
    }

    #[tokio::test]
    async fn uniqueness_ignores_case_and_excluded_id() {
        let store = MemoryItemStore::new();
        let id = store
            .insert(&NewItem { title: "Nova".into(), category: None, year: 2020, score: 4 })
            .await
            .unwrap();
        let err = validate_title_unique(&store, "nOVA", None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(validate_title_unique(&store, "NOVA", Some(id)).await.is_ok());
        assert!(validate_title_unique(&store, "Nova 2", None).await.is_ok());
    }
}
