use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use agrocoop_db::models::{
    Comment, FileRef, Project, ProjectOutput, ProjectStatus, Task, TaskStatus,
};

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

/// Outcome of a task mutation: the post-state aggregate, the touched task,
/// and the user ids owed a notification (the fan-out layer drops the actor).
pub struct TaskMutation {
    pub project: Project,
    pub task: Task,
    pub notify: Vec<ObjectId>,
}

pub struct ProjectDao {
    pub base: BaseDao<Project>,
}

/// progress = round(100 * completed / total), 0 when the list is empty.
pub fn progress_of(tasks: &[Task]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    ((completed as f64 / tasks.len() as f64) * 100.0).round() as u32
}

/// team = deduplicated union of every task's assignee list, first-seen order.
pub fn team_of(tasks: &[Task]) -> Vec<ObjectId> {
    let mut team = Vec::new();
    for task in tasks {
        for assignee in &task.assigned_to {
            if !team.contains(assignee) {
                team.push(*assignee);
            }
        }
    }
    team
}

impl ProjectDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Project::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        created_by: ObjectId,
        title: String,
        description: Option<String>,
        status: ProjectStatus,
    ) -> DaoResult<Project> {
        let now = DateTime::now();
        let project = Project {
            id: None,
            company_id,
            title,
            description,
            status,
            progress: 0,
            // Team is derived from task assignees, never seeded at creation.
            team: Vec::new(),
            tasks: Vec::new(),
            comments: Vec::new(),
            outputs: Vec::new(),
            allocated_resources: Vec::new(),
            files: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        };

        let project_id = self.base.insert_one(&project).await?;
        self.base.find_by_id(project_id).await
    }

    pub async fn find_by_company(
        &self,
        company_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Project>> {
        self.base
            .find_paginated(
                doc! { "company_id": company_id },
                Some(doc! { "created_at": -1 }),
                params,
            )
            .await
    }

    pub async fn get(&self, company_id: ObjectId, project_id: ObjectId) -> DaoResult<Project> {
        self.base.find_by_id_in_company(company_id, project_id).await
    }

    pub async fn update_fields(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        title: Option<String>,
        description: Option<String>,
        status: Option<ProjectStatus>,
    ) -> DaoResult<bool> {
        let mut set_doc = doc! {};

        if let Some(title) = title {
            set_doc.insert("title", title);
        }
        if let Some(description) = description {
            set_doc.insert("description", description);
        }
        if let Some(status) = status {
            set_doc.insert("status", bson::to_bson(&status)?);
        }

        if set_doc.is_empty() {
            return Ok(false);
        }

        self.base
            .update_one(
                doc! { "_id": project_id, "company_id": company_id },
                doc! { "$set": set_doc },
            )
            .await
    }

    /// Unconditional delete. Outstanding resource allocations are NOT
    /// released back to the ledger (observed behavior, kept as-is).
    pub async fn delete(&self, company_id: ObjectId, project_id: ObjectId) -> DaoResult<bool> {
        let deleted = self.base.delete_in_company(company_id, project_id).await?;
        if !deleted {
            return Err(DaoError::NotFound);
        }
        Ok(deleted)
    }

    // ---- task mutations ------------------------------------------------
    //
    // Every task edit rewrites the whole task list and recomputes progress
    // and team from it. O(tasks) per edit, but the derived fields can never
    // drift from the list they were computed from.

    pub async fn add_task(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        title: String,
        status: TaskStatus,
        assigned_to: Vec<ObjectId>,
        deadline: Option<DateTime>,
    ) -> DaoResult<TaskMutation> {
        let mut project = self.get(company_id, project_id).await?;

        let task = Task {
            id: ObjectId::new(),
            title,
            status,
            assigned_to: assigned_to.clone(),
            deadline,
            files: Vec::new(),
        };
        project.tasks.push(task.clone());

        self.persist_tasks(company_id, project_id, &project.tasks).await?;
        project.progress = progress_of(&project.tasks);
        project.team = team_of(&project.tasks);

        Ok(TaskMutation {
            project,
            task,
            notify: assigned_to,
        })
    }

    pub async fn update_task(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        task_id: ObjectId,
        title: Option<String>,
        status: Option<TaskStatus>,
        assigned_to: Option<Vec<ObjectId>>,
        deadline: Option<DateTime>,
    ) -> DaoResult<TaskMutation> {
        let mut project = self.get(company_id, project_id).await?;

        let task = project
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(DaoError::NotFound)?;

        let mut notify = Vec::new();

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(assigned_to) = assigned_to {
            // Only assignees that were not on the task before get notified.
            for added in assigned_to.iter().filter(|a| !task.assigned_to.contains(a)) {
                notify.push(*added);
            }
            task.assigned_to = assigned_to;
        }
        if let Some(status) = status {
            if task.status != status {
                task.status = status;
                // A real status change notifies everyone currently assigned.
                for assignee in &task.assigned_to {
                    if !notify.contains(assignee) {
                        notify.push(*assignee);
                    }
                }
            }
        }
        if deadline.is_some() {
            task.deadline = deadline;
        }

        let task = task.clone();
        self.persist_tasks(company_id, project_id, &project.tasks).await?;
        project.progress = progress_of(&project.tasks);
        project.team = team_of(&project.tasks);

        Ok(TaskMutation {
            project,
            task,
            notify,
        })
    }

    pub async fn delete_task(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        task_id: ObjectId,
    ) -> DaoResult<Project> {
        let mut project = self.get(company_id, project_id).await?;

        let before = project.tasks.len();
        project.tasks.retain(|t| t.id != task_id);
        if project.tasks.len() == before {
            return Err(DaoError::NotFound);
        }

        self.persist_tasks(company_id, project_id, &project.tasks).await?;
        project.progress = progress_of(&project.tasks);
        project.team = team_of(&project.tasks);

        Ok(project)
    }

    async fn persist_tasks(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        tasks: &[Task],
    ) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": project_id, "company_id": company_id },
                doc! { "$set": {
                    "tasks": bson::to_bson(tasks)?,
                    "progress": progress_of(tasks),
                    "team": bson::to_bson(&team_of(tasks))?,
                } },
            )
            .await
    }

    // ---- comments ------------------------------------------------------

    pub async fn add_comment(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        author_id: ObjectId,
        author_name: String,
        text: String,
    ) -> DaoResult<(Comment, Vec<ObjectId>)> {
        let project = self.get(company_id, project_id).await?;

        let comment = Comment {
            id: ObjectId::new(),
            text,
            author_id,
            author_name,
            created_at: DateTime::now(),
        };

        self.base
            .update_one(
                doc! { "_id": project_id, "company_id": company_id },
                doc! { "$push": { "comments": bson::to_bson(&comment)? } },
            )
            .await?;

        Ok((comment, project.team))
    }

    /// Comments are deletable only by their author. This is the one
    /// authorization rule enforced inside a mutation instead of the
    /// route-level policy check.
    pub async fn delete_comment(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        comment_id: ObjectId,
        requester_id: ObjectId,
    ) -> DaoResult<()> {
        let project = self.get(company_id, project_id).await?;

        let comment = project
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .ok_or(DaoError::NotFound)?;

        if comment.author_id != requester_id {
            return Err(DaoError::Forbidden(
                "Only the author can delete a comment".to_string(),
            ));
        }

        self.base
            .update_one(
                doc! { "_id": project_id, "company_id": company_id },
                doc! { "$pull": { "comments": { "id": comment_id } } },
            )
            .await?;

        Ok(())
    }

    // ---- file metadata -------------------------------------------------

    pub async fn add_file(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        task_id: Option<ObjectId>,
        name: String,
        content_type: String,
        size: u64,
        uploaded_by: ObjectId,
    ) -> DaoResult<FileRef> {
        let mut project = self.get(company_id, project_id).await?;

        let file = FileRef {
            id: ObjectId::new(),
            name,
            content_type,
            size,
            uploaded_by,
            uploaded_at: DateTime::now(),
        };

        match task_id {
            Some(task_id) => {
                let task = project
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == task_id)
                    .ok_or(DaoError::NotFound)?;
                task.files.push(file.clone());
                self.base
                    .update_one(
                        doc! { "_id": project_id, "company_id": company_id },
                        doc! { "$set": { "tasks": bson::to_bson(&project.tasks)? } },
                    )
                    .await?;
            }
            None => {
                self.base
                    .update_one(
                        doc! { "_id": project_id, "company_id": company_id },
                        doc! { "$push": { "files": bson::to_bson(&file)? } },
                    )
                    .await?;
            }
        }

        Ok(file)
    }

    /// Removes the metadata record and returns it so the caller can issue
    /// the companion blob deletion.
    pub async fn delete_file(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        task_id: Option<ObjectId>,
        file_id: ObjectId,
    ) -> DaoResult<FileRef> {
        let mut project = self.get(company_id, project_id).await?;

        match task_id {
            Some(task_id) => {
                let task = project
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == task_id)
                    .ok_or(DaoError::NotFound)?;
                let pos = task
                    .files
                    .iter()
                    .position(|f| f.id == file_id)
                    .ok_or(DaoError::NotFound)?;
                let file = task.files.remove(pos);
                self.base
                    .update_one(
                        doc! { "_id": project_id, "company_id": company_id },
                        doc! { "$set": { "tasks": bson::to_bson(&project.tasks)? } },
                    )
                    .await?;
                Ok(file)
            }
            None => {
                let pos = project
                    .files
                    .iter()
                    .position(|f| f.id == file_id)
                    .ok_or(DaoError::NotFound)?;
                let file = project.files.remove(pos);
                self.base
                    .update_one(
                        doc! { "_id": project_id, "company_id": company_id },
                        doc! { "$pull": { "files": { "id": file_id } } },
                    )
                    .await?;
                Ok(file)
            }
        }
    }

    // ---- outputs -------------------------------------------------------
    //
    // Production records never touch progress/team; no recomputation here.

    pub async fn add_output(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        description: String,
        quantity: f64,
        unit: String,
        date: DateTime,
    ) -> DaoResult<ProjectOutput> {
        // Existence check first so absence surfaces as NotFound.
        self.get(company_id, project_id).await?;

        let output = ProjectOutput {
            id: ObjectId::new(),
            description,
            quantity,
            unit,
            date,
        };

        self.base
            .update_one(
                doc! { "_id": project_id, "company_id": company_id },
                doc! { "$push": { "outputs": bson::to_bson(&output)? } },
            )
            .await?;

        Ok(output)
    }

    pub async fn delete_output(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        output_id: ObjectId,
    ) -> DaoResult<ProjectOutput> {
        let project = self.get(company_id, project_id).await?;

        let output = project
            .outputs
            .iter()
            .find(|o| o.id == output_id)
            .cloned()
            .ok_or(DaoError::NotFound)?;

        self.base
            .update_one(
                doc! { "_id": project_id, "company_id": company_id },
                doc! { "$pull": { "outputs": { "id": output_id } } },
            )
            .await?;

        Ok(output)
    }
}
