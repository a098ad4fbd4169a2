//! Paged listing: one count and one page fetch over the same predicates.

use crate::error::AppError;
use crate::model::Item;
use crate::sql::ItemFilter;
use crate::store::ItemStore;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Positive integer or the given default. Malformed input is not an error.
fn positive_or(raw: Option<&String>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

impl Pagination {
    /// Reads `page` and `pageSize`, falling back to 1 and 8.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        Pagination {
            page: positive_or(params.get("page"), DEFAULT_PAGE),
            page_size: positive_or(params.get("pageSize"), DEFAULT_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            total / self.page_size + i64::from(total % self.page_size != 0)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// Count, then fetch the requested page. A page past the end yields no items
/// with the same metadata. Any store failure fails the whole listing.
pub async fn list_items(
    store: &dyn ItemStore,
    filter: &ItemFilter,
    pagination: Pagination,
) -> Result<ItemPage, AppError> {
    let predicates = filter.predicates();
    let total = store.count_where(&predicates).await?;
    let items = store
        .select_page(&predicates, pagination.offset(), pagination.page_size)
        .await?;
    tracing::debug!(
        total,
        page = pagination.page,
        page_size = pagination.page_size,
        returned = items.len(),
        "listed items"
    );
    Ok(ItemPage {
        items,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
        total_pages: pagination.total_pages(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_absent() {
        assert_eq!(Pagination::from_query(&HashMap::new()), Pagination::default());
    }

    #[test]
    fn malformed_or_non_positive_values_fall_back() {
        let p = Pagination::from_query(&params(&[("page", "0"), ("pageSize", "abc")]));
        assert_eq!(p, Pagination { page: 1, page_size: 8 });
        let p = Pagination::from_query(&params(&[("page", "-4"), ("pageSize", "-1")]));
        assert_eq!(p, Pagination { page: 1, page_size: 8 });
    }

    #[test]
    fn offset_is_zero_based() {
        let p = Pagination { page: 3, page_size: 10 };
        assert_eq!(p.offset(), 20);
        assert_eq!(Pagination::default().offset(), 0);
    }

    #[test]
    fn total_pages_is_ceiling() {
        let p = Pagination { page: 1, page_size: 8 };
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(8), 1);
        assert_eq!(p.total_pages(9), 2);
        assert_eq!(p.total_pages(17), 3);
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = ItemPage { items: vec![], total: 0, page: 1, page_size: 8, total_pages: 0 };
        let v = serde_json::to_value(&page).unwrap();
        assert_eq!(v["pageSize"], 8);
        assert_eq!(v["totalPages"], 0);
    }
}
