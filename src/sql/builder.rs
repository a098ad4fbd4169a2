//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the items table.
//! Identifiers come from [`Column`] only; every caller-supplied value is a parameter.

use crate::model::NewItem;
use crate::sql::{BindValue, Column, Operator, Predicate, UpdatePlan};

pub const ITEMS_TABLE: &str = "items";

const SELECT_COLUMNS: &str = "\"id\", \"title\", \"category\", \"year\", \"score\"";

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape LIKE metacharacters so user text matches literally (default escape is `\`).
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Renders predicates joined with AND, numbering placeholders from the buffer's
/// current parameter count. Returns an empty string when there are none.
fn where_clause(q: &mut QueryBuf, predicates: &[Predicate]) -> String {
    let mut parts = Vec::with_capacity(predicates.len());
    for p in predicates {
        let col = quoted(p.column.name());
        let part = match p.op {
            Operator::Eq => {
                let n = q.push_param(p.value.clone());
                format!("{} = ${}", col, n)
            }
            Operator::Contains => {
                let needle = p.value.as_text().map(escape_like).unwrap_or_else(|| p.value.to_string());
                let n = q.push_param(BindValue::Text(format!("%{}%", needle)));
                format!("{} ILIKE ${}", col, n)
            }
        };
        parts.push(part);
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT COUNT(*) restricted by predicates.
pub fn count_where(predicates: &[Predicate]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, predicates);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(ITEMS_TABLE), where_sql);
    q
}

/// SELECT one page restricted by predicates, ordered by id. Offset and limit
/// are bound after the predicate parameters.
pub fn select_page(predicates: &[Predicate], offset: i64, limit: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, predicates);
    let offset_param = q.push_param(BindValue::BigInt(offset));
    let limit_param = q.push_param(BindValue::BigInt(limit));
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} ASC OFFSET ${} LIMIT ${}",
        SELECT_COLUMNS,
        quoted(ITEMS_TABLE),
        where_sql,
        quoted(Column::Id.name()),
        offset_param,
        limit_param
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::BigInt(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        SELECT_COLUMNS,
        quoted(ITEMS_TABLE),
        quoted(Column::Id.name()),
        n
    );
    q
}

/// Case-insensitive title existence check, optionally ignoring one id.
pub fn exists_title(title: &str, exclude_id: Option<i64>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let title_col = quoted(Column::Title.name());
    let n = q.push_param(BindValue::from(title));
    let mut cond = format!("LOWER({}) = LOWER(${})", title_col, n);
    if let Some(id) = exclude_id {
        let m = q.push_param(BindValue::BigInt(id));
        cond.push_str(&format!(" AND {} <> ${}", quoted(Column::Id.name()), m));
    }
    q.sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE {})", quoted(ITEMS_TABLE), cond);
    q
}

/// INSERT all writable columns, returning the new id.
pub fn insert(item: &NewItem) -> QueryBuf {
    let mut q = QueryBuf::new();
    let title = q.push_param(BindValue::from(item.title.as_str()));
    // NULL category goes through a typed literal instead of a parameter.
    let category = match &item.category {
        Some(c) => format!("${}", q.push_param(BindValue::from(c.as_str()))),
        None => "NULL::TEXT".to_string(),
    };
    let year = q.push_param(BindValue::Int(item.year));
    let score = q.push_param(BindValue::Int(item.score));
    q.sql = format!(
        "INSERT INTO {} ({}, {}, {}, {}) VALUES (${}, {}, ${}, ${}) RETURNING {}",
        quoted(ITEMS_TABLE),
        quoted(Column::Title.name()),
        quoted(Column::Category.name()),
        quoted(Column::Year.name()),
        quoted(Column::Score.name()),
        title,
        category,
        year,
        score,
        quoted(Column::Id.name())
    );
    q
}

/// UPDATE by id: one SET entry per assignment, in order. The id is bound at
/// the plan's reserved index. Callers must not pass an empty plan.
pub fn update(id: i64, plan: &UpdatePlan) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(plan.assignments.len());
    for a in &plan.assignments {
        let n = q.push_param(a.value.clone());
        sets.push(format!("{} = ${}", quoted(a.column.name()), n));
    }
    let id_param = plan.id_index();
    q.params.push(BindValue::BigInt(id));
    debug_assert_eq!(q.params.len(), id_param);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(ITEMS_TABLE),
        sets.join(", "),
        quoted(Column::Id.name()),
        id_param
    );
    q
}

/// DELETE by id.
pub fn delete(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::BigInt(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(ITEMS_TABLE),
        quoted(Column::Id.name()),
        n
    );
    q
}
