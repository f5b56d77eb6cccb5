use agrocoop_db::models::Role;

/// Everything a route can ask permission for. One function answers all of
/// them so the role rules live in a single place instead of being re-derived
/// per handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageUsers,
    CreateProject,
    EditProject,
    DeleteProject,
    EditTasks,
    Comment,
    RecordOutputs,
    ManageFiles,
    ManageResources,
    AllocateResources,
    ViewReports,
}

pub fn can(role: Role, action: Action) -> bool {
    use Action::*;

    match role {
        Role::Admin => true,
        Role::ProjectManager => !matches!(action, ManageUsers),
        Role::Member => matches!(
            action,
            EditTasks | Comment | RecordOutputs | ManageFiles
        ),
        Role::Accountant => matches!(action, ViewReports),
    }
}
