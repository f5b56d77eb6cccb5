use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Append-only "who did what" entry. Never mutated or deleted by the
/// application; the feed endpoint truncates to the most recent 50.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub message: String,
    pub created_at: DateTime,
}

impl ActivityLogEntry {
    pub const COLLECTION: &'static str = "activity_logs";
}
