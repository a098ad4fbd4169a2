//! Values bound to positional parameters. Each variant declares its own PostgreSQL type.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    Int(i32),
    BigInt(i64),
    Text(String),
}

impl BindValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            BindValue::Int(n) => Some(i64::from(*n)),
            BindValue::BigInt(n) => Some(*n),
            BindValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BindValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Int(n) => write!(f, "{}", n),
            BindValue::BigInt(n) => write!(f, "{}", n),
            BindValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i32> for BindValue {
    fn from(n: i32) -> Self {
        BindValue::Int(n)
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::BigInt(n)
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Int(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::BigInt(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            BindValue::Int(_) => PgTypeInfo::with_name("INT4"),
            BindValue::BigInt(_) => PgTypeInfo::with_name("INT8"),
            BindValue::Text(_) => PgTypeInfo::with_name("TEXT"),
        })
    }
}

impl sqlx::Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
