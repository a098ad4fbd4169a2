//! Response bodies for item writes.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedBody {
    pub message: String,
    pub id: i64,
}

pub fn updated(id: i64) -> UpdatedBody {
    UpdatedBody {
        message: "item updated successfully".into(),
        id,
    }
}

pub fn deleted() -> MessageBody {
    MessageBody {
        message: "item deleted successfully".into(),
    }
}
