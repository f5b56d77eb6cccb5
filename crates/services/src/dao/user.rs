use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use agrocoop_db::models::{Role, User};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        email: String,
        display_name: String,
        password_hash: String,
        role: Role,
    ) -> DaoResult<User> {
        self.create_with_id(ObjectId::new(), company_id, email, display_name, password_hash, role)
            .await
    }

    /// Insert with a caller-chosen id. Sign-up pre-generates the owner's id
    /// so the company can reference it before the user document exists.
    pub async fn create_with_id(
        &self,
        id: ObjectId,
        company_id: ObjectId,
        email: String,
        display_name: String,
        password_hash: String,
        role: Role,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: Some(id),
            company_id,
            email,
            display_name,
            password_hash: Some(password_hash),
            role,
            created_at: now,
            updated_at: now,
        };

        self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email })
            .await?
            .ok_or(DaoError::NotFound)
    }
}
