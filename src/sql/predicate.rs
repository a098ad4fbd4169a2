//! Typed filter predicates and update assignments over the item columns.

use crate::sql::BindValue;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Title,
    Category,
    Year,
    Score,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Title => "title",
            Column::Category => "category",
            Column::Year => "year",
            Column::Score => "score",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    /// Case-insensitive substring match. The bound value is the raw needle.
    Contains,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub column: Column,
    pub op: Operator,
    pub value: BindValue,
}

impl Predicate {
    pub fn equals(column: Column, value: impl Into<BindValue>) -> Self {
        Predicate { column, op: Operator::Eq, value: value.into() }
    }

    pub fn contains(column: Column, needle: impl Into<String>) -> Self {
        Predicate { column, op: Operator::Contains, value: BindValue::Text(needle.into()) }
    }
}

/// One `column = value` pair of an UPDATE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub column: Column,
    pub value: BindValue,
}

/// Validated assignments for one UPDATE. The id parameter sits right after them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatePlan {
    pub assignments: Vec<Assignment>,
}

impl UpdatePlan {
    /// Positional index reserved for the target id in the WHERE clause.
    pub fn id_index(&self) -> usize {
        self.assignments.len() + 1
    }
}

/// Optional list filters as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
}

impl ItemFilter {
    /// Reads `search`, `category` and `year` from query parameters. Text filters
    /// are used verbatim (whitespace included); only empty ones are dropped, and
    /// so is a `year` that does not parse as an integer.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let text = |key: &str| params.get(key).filter(|s| !s.is_empty()).cloned();
        let year = params.get("year").and_then(|s| s.trim().parse::<i32>().ok());
        ItemFilter {
            search: text("search"),
            category: text("category"),
            year,
        }
    }

    /// Predicates in a fixed order: search, category, year. Count and page
    /// queries both render from this list, so they bind identical parameters.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(s) = self.search.as_deref().filter(|s| !s.is_empty()) {
            out.push(Predicate::contains(Column::Title, s));
        }
        if let Some(c) = self.category.as_deref().filter(|c| !c.is_empty()) {
            out.push(Predicate::contains(Column::Category, c));
        }
        if let Some(y) = self.year {
            out.push(Predicate::equals(Column::Year, y));
        }
        out
    }
}
