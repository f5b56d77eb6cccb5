use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use agrocoop_db::models::{Company, Role, User};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct CompanyDao {
    pub base: BaseDao<Company>,
    pub users: BaseDao<User>,
}

impl CompanyDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Company::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(&self, name: String, owner_id: ObjectId) -> DaoResult<Company> {
        let now = DateTime::now();
        let company = Company {
            id: None,
            name,
            owner_id,
            created_at: now,
            updated_at: now,
        };

        let company_id = self.base.insert_one(&company).await?;
        self.base.find_by_id(company_id).await
    }

    pub async fn is_member(&self, company_id: ObjectId, user_id: ObjectId) -> DaoResult<bool> {
        let count = self
            .users
            .count(doc! { "_id": user_id, "company_id": company_id })
            .await?;
        Ok(count > 0)
    }

    /// Resolves the caller's role within a company; Forbidden when the
    /// user does not belong to it.
    pub async fn member_role(
        &self,
        company_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Role> {
        let user = self
            .users
            .find_one(doc! { "_id": user_id, "company_id": company_id })
            .await?
            .ok_or(DaoError::Forbidden("Not a member".to_string()))?;
        Ok(user.role)
    }

    pub async fn find_members(&self, company_id: ObjectId) -> DaoResult<Vec<User>> {
        self.users
            .find_many(
                doc! { "company_id": company_id },
                Some(doc! { "display_name": 1 }),
            )
            .await
    }
}
