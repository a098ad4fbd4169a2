//! Item service: validated item records over HTTP, backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Item, ItemPatch, NewItem};
pub use routes::{app, app_routes, common_routes, item_routes};
pub use service::{ItemPage, ItemService, Pagination};
pub use state::AppState;
pub use store::{ensure_items_table, ItemStore, MemoryItemStore, PgItemStore};
