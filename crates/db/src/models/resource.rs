use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Shared ledger entity. `quantity` is debited/credited by the allocation
/// transactions; `status` is re-derived from quantity on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub category: ResourceCategory,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub status: ResourceStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Seeds,
    Fertilizer,
    Pesticide,
    Equipment,
    Feed,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Available,
    LowStock,
    OutOfStock,
}

impl Resource {
    pub const COLLECTION: &'static str = "resources";
}
