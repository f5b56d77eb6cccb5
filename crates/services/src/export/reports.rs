use agrocoop_db::models::{Project, Resource, TaskStatus};

/// Pure row builders: already-fetched documents in, (headers, rows) out.
/// The CSV and PDF renderers consume the same shape.

pub const PROJECT_HEADERS: [&str; 6] = [
    "Title",
    "Status",
    "Progress (%)",
    "Team Size",
    "Tasks",
    "Completed Tasks",
];

pub fn project_rows(projects: &[Project]) -> Vec<Vec<String>> {
    projects
        .iter()
        .map(|p| {
            let completed = p
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count();
            vec![
                p.title.clone(),
                format!("{:?}", p.status),
                p.progress.to_string(),
                p.team.len().to_string(),
                p.tasks.len().to_string(),
                completed.to_string(),
            ]
        })
        .collect()
}

pub const RESOURCE_HEADERS: [&str; 5] = ["Name", "Category", "Quantity", "Unit", "Status"];

pub fn resource_rows(resources: &[Resource]) -> Vec<Vec<String>> {
    resources
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                format!("{:?}", r.category),
                r.quantity.to_string(),
                r.unit.clone(),
                format!("{:?}", r.status),
            ]
        })
        .collect()
}

pub const OUTPUT_HEADERS: [&str; 4] = ["Description", "Quantity", "Unit", "Date"];

pub fn output_rows(project: &Project) -> Vec<Vec<String>> {
    project
        .outputs
        .iter()
        .map(|o| {
            vec![
                o.description.clone(),
                o.quantity.to_string(),
                o.unit.clone(),
                o.date.to_chrono().format("%Y-%m-%d").to_string(),
            ]
        })
        .collect()
}
