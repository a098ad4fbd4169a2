//! ItemService: validated item operations over the safe SQL builder.

mod items;
pub mod mutation;
pub mod query;
pub mod validation;
pub use items::ItemService;
pub use mutation::plan_update;
pub use query::{list_items, ItemPage, Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
