pub mod activity_log;
pub mod company;
pub mod notification;
pub mod project;
pub mod resource;
pub mod user;

pub use activity_log::ActivityLogEntry;
pub use company::Company;
pub use notification::Notification;
pub use project::{
    AllocatedResource, Comment, FileRef, Project, ProjectOutput, ProjectStatus, Task, TaskStatus,
};
pub use resource::{Resource, ResourceCategory, ResourceStatus};
pub use user::{Role, User};
