use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Aggregate root. Tasks, comments, outputs, files and allocation records
/// are embedded lists with no lifecycle outside this document; the whole
/// aggregate is rewritten on each mutation.
///
/// `progress` and `team` are derived fields: recomputed from the entire
/// task list on every task mutation, never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub team: Vec<ObjectId>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub outputs: Vec<ProjectOutput>,
    #[serde(default)]
    pub allocated_resources: Vec<AllocatedResource>,
    #[serde(default)]
    pub files: Vec<FileRef>,
    pub created_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    OnHold,
    Delayed,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_to: Vec<ObjectId>,
    pub deadline: Option<DateTime>,
    #[serde(default)]
    pub files: Vec<FileRef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: ObjectId,
    pub text: String,
    pub author_id: ObjectId,
    pub author_name: String,
    pub created_at: DateTime,
}

/// Free-form production record (harvest, delivery, processing batch).
/// Outputs never affect the derived fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectOutput {
    pub id: ObjectId,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub date: DateTime,
}

/// Denormalized snapshot of a resource quantity committed to this project.
/// At most one record per `resource_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatedResource {
    pub resource_id: ObjectId,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    pub id: ObjectId,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_by: ObjectId,
    pub uploaded_at: DateTime,
}

impl Project {
    pub const COLLECTION: &'static str = "projects";
}
