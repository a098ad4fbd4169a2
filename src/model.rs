//! Item record and the payloads that create or change it.

use serde::{Deserialize, Serialize};

/// A persisted item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub year: i32,
    pub score: i32,
}

/// Create payload. `title`, `year` and `score` are required; `category` may be omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub year: i32,
    pub score: i32,
}

impl NewItem {
    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            title: self.title,
            category: self.category,
            year: self.year,
            score: self.score,
        }
    }
}

/// Partial update payload. A field that is missing or `null` is left untouched;
/// there is no way to clear a field.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub score: Option<i32>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none() && self.year.is_none() && self.score.is_none()
    }
}
