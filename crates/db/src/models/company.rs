use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A cooperative. Root of multi-tenancy: every other document carries
/// its `company_id` and every query filters by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub owner_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Company {
    pub const COLLECTION: &'static str = "companies";
}
