use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use tracing::warn;
use agrocoop_db::models::{ActivityLogEntry, Notification};

use crate::dao::base::{BaseDao, DaoResult};

/// Best-effort side-effect fan-out after a successful mutation.
///
/// Writes run as detached tasks: a failure is logged and swallowed, never
/// surfaced to the caller and never able to roll back the mutation that
/// triggered it. The read side (feed and inbox queries) is ordinary.
pub struct FanoutService {
    pub activities: BaseDao<ActivityLogEntry>,
    pub notifications: BaseDao<Notification>,
}

impl FanoutService {
    pub fn new(db: &Database) -> Self {
        Self {
            activities: BaseDao::new(db, ActivityLogEntry::COLLECTION),
            notifications: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    /// Append one activity-log row. An empty message skips the insert.
    pub fn activity(&self, company_id: ObjectId, message: String) {
        if message.is_empty() {
            return;
        }

        let dao = self.activities.clone();
        tokio::spawn(async move {
            let entry = ActivityLogEntry {
                id: None,
                company_id,
                message,
                created_at: DateTime::now(),
            };
            if let Err(e) = dao.insert_one(&entry).await {
                warn!(error = %e, "Activity log insert failed (ignored)");
            }
        });
    }

    /// One notification row per recipient, actor excluded. An empty
    /// recipient list is a no-op.
    pub fn notify(
        &self,
        company_id: ObjectId,
        recipients: &[ObjectId],
        actor_id: ObjectId,
        message: String,
        link: Option<String>,
    ) {
        let targets: Vec<ObjectId> = recipients
            .iter()
            .copied()
            .filter(|uid| *uid != actor_id)
            .collect();
        if targets.is_empty() {
            return;
        }

        let dao = self.notifications.clone();
        tokio::spawn(async move {
            let now = DateTime::now();
            for user_id in targets {
                let notification = Notification {
                    id: None,
                    company_id,
                    user_id,
                    message: message.clone(),
                    link: link.clone(),
                    is_read: false,
                    created_at: now,
                };
                if let Err(e) = dao.insert_one(&notification).await {
                    warn!(error = %e, %user_id, "Notification insert failed (ignored)");
                }
            }
        });
    }

    /// The activity feed shows the most recent entries only.
    pub const FEED_LIMIT: i64 = 50;

    pub async fn recent_activity(
        &self,
        company_id: ObjectId,
    ) -> DaoResult<Vec<ActivityLogEntry>> {
        self.activities
            .find_limited(
                doc! { "company_id": company_id },
                doc! { "created_at": -1 },
                Self::FEED_LIMIT,
            )
            .await
    }

    pub async fn user_notifications(
        &self,
        company_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Vec<Notification>> {
        self.notifications
            .find_many(
                doc! { "company_id": company_id, "user_id": user_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn mark_read(
        &self,
        user_id: ObjectId,
        notification_id: ObjectId,
    ) -> DaoResult<bool> {
        self.notifications
            .update_one(
                doc! { "_id": notification_id, "user_id": user_id },
                doc! { "$set": { "is_read": true } },
            )
            .await
    }

    pub async fn mark_all_read(&self, company_id: ObjectId, user_id: ObjectId) -> DaoResult<u64> {
        let result = self
            .notifications
            .collection()
            .update_many(
                doc! { "company_id": company_id, "user_id": user_id, "is_read": false },
                doc! { "$set": { "is_read": true } },
            )
            .await?;
        Ok(result.modified_count)
    }
}
