use bson::{doc, oid::ObjectId, DateTime};
use mongodb::error::{TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT};
use mongodb::{ClientSession, Collection, Database};
use agrocoop_db::models::{AllocatedResource, Project, Resource, ResourceCategory, ResourceStatus};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ResourceDao {
    pub base: BaseDao<Resource>,
    db: Database,
    projects: Collection<Project>,
    low_stock_threshold: f64,
}

/// quantity <= 0 forces OutOfStock; below the low-stock threshold LowStock.
pub fn derive_status(quantity: f64, low_stock_threshold: f64) -> ResourceStatus {
    if quantity <= 0.0 {
        ResourceStatus::OutOfStock
    } else if quantity < low_stock_threshold {
        ResourceStatus::LowStock
    } else {
        ResourceStatus::Available
    }
}

impl ResourceDao {
    pub fn new(db: &Database, low_stock_threshold: f64) -> Self {
        Self {
            base: BaseDao::new(db, Resource::COLLECTION),
            db: db.clone(),
            projects: db.collection::<Project>(Project::COLLECTION),
            low_stock_threshold,
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        name: String,
        category: ResourceCategory,
        quantity: f64,
        unit: String,
    ) -> DaoResult<Resource> {
        let now = DateTime::now();
        let resource = Resource {
            id: None,
            company_id,
            name,
            category,
            quantity,
            unit,
            status: derive_status(quantity, self.low_stock_threshold),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&resource).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_company(&self, company_id: ObjectId) -> DaoResult<Vec<Resource>> {
        self.base
            .find_many(
                doc! { "company_id": company_id },
                Some(doc! { "name": 1 }),
            )
            .await
    }

    pub async fn get(&self, company_id: ObjectId, resource_id: ObjectId) -> DaoResult<Resource> {
        self.base.find_by_id_in_company(company_id, resource_id).await
    }

    pub async fn update(
        &self,
        company_id: ObjectId,
        resource_id: ObjectId,
        name: Option<String>,
        category: Option<ResourceCategory>,
        quantity: Option<f64>,
        unit: Option<String>,
    ) -> DaoResult<bool> {
        let mut set_doc = doc! {};

        if let Some(name) = name {
            set_doc.insert("name", name);
        }
        if let Some(category) = category {
            set_doc.insert("category", bson::to_bson(&category)?);
        }
        if let Some(quantity) = quantity {
            set_doc.insert("quantity", quantity);
            set_doc.insert(
                "status",
                bson::to_bson(&derive_status(quantity, self.low_stock_threshold))?,
            );
        }
        if let Some(unit) = unit {
            set_doc.insert("unit", unit);
        }

        if set_doc.is_empty() {
            return Ok(false);
        }

        self.base
            .update_one(
                doc! { "_id": resource_id, "company_id": company_id },
                doc! { "$set": set_doc },
            )
            .await
    }

    pub async fn delete(&self, company_id: ObjectId, resource_id: ObjectId) -> DaoResult<bool> {
        let deleted = self.base.delete_in_company(company_id, resource_id).await?;
        if !deleted {
            return Err(DaoError::NotFound);
        }
        Ok(deleted)
    }

    // ---- allocation transaction ----------------------------------------
    //
    // The one cross-document atomic operation: debit the ledger and append
    // the project's allocation record as a unit, so concurrent allocations
    // cannot over-commit a resource below zero. Both documents are read and
    // written inside one MongoDB transaction; transient aborts retry the
    // whole body.

    pub async fn allocate(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        resource_id: ObjectId,
        quantity: f64,
    ) -> DaoResult<AllocatedResource> {
        if quantity <= 0.0 {
            return Err(DaoError::Validation(
                "Allocation quantity must be positive".to_string(),
            ));
        }

        let mut session = self.db.client().start_session().await?;

        loop {
            session.start_transaction().await?;

            let outcome = self
                .try_allocate(&mut session, company_id, project_id, resource_id, quantity)
                .await;

            match outcome {
                Ok(record) => match commit(&mut session).await {
                    Ok(()) => return Ok(record),
                    Err(e) if e.contains_label(TRANSIENT_TRANSACTION_ERROR) => continue,
                    Err(e) => return Err(e.into()),
                },
                Err(e) => {
                    let _ = session.abort_transaction().await;
                    if is_transient(&e) {
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn try_allocate(
        &self,
        session: &mut ClientSession,
        company_id: ObjectId,
        project_id: ObjectId,
        resource_id: ObjectId,
        quantity: f64,
    ) -> DaoResult<AllocatedResource> {
        let resource = self
            .base
            .collection()
            .find_one(doc! { "_id": resource_id, "company_id": company_id })
            .session(&mut *session)
            .await?
            .ok_or(DaoError::NotFound)?;

        let project = self
            .projects
            .find_one(doc! { "_id": project_id, "company_id": company_id })
            .session(&mut *session)
            .await?
            .ok_or(DaoError::NotFound)?;

        if project
            .allocated_resources
            .iter()
            .any(|a| a.resource_id == resource_id)
        {
            return Err(DaoError::Conflict(format!(
                "{} is already allocated to this project; deallocate it first",
                resource.name
            )));
        }

        if resource.quantity < quantity {
            return Err(DaoError::Conflict(format!(
                "Insufficient stock for {}: {} {} available, {} requested",
                resource.name, resource.quantity, resource.unit, quantity
            )));
        }

        let remaining = resource.quantity - quantity;
        let record = AllocatedResource {
            resource_id,
            name: resource.name.clone(),
            quantity,
            unit: resource.unit.clone(),
        };

        self.base
            .collection()
            .update_one(
                doc! { "_id": resource_id },
                doc! {
                    "$inc": { "quantity": -quantity },
                    "$set": {
                        "status": bson::to_bson(&derive_status(remaining, self.low_stock_threshold))?,
                        "updated_at": DateTime::now(),
                    },
                },
            )
            .session(&mut *session)
            .await?;

        self.projects
            .update_one(
                doc! { "_id": project_id },
                doc! {
                    "$push": { "allocated_resources": bson::to_bson(&record)? },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .session(&mut *session)
            .await?;

        Ok(record)
    }

    pub async fn deallocate(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        resource_id: ObjectId,
    ) -> DaoResult<AllocatedResource> {
        let mut session = self.db.client().start_session().await?;

        loop {
            session.start_transaction().await?;

            let outcome = self
                .try_deallocate(&mut session, company_id, project_id, resource_id)
                .await;

            match outcome {
                Ok(record) => match commit(&mut session).await {
                    Ok(()) => return Ok(record),
                    Err(e) if e.contains_label(TRANSIENT_TRANSACTION_ERROR) => continue,
                    Err(e) => return Err(e.into()),
                },
                Err(e) => {
                    let _ = session.abort_transaction().await;
                    if is_transient(&e) {
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn try_deallocate(
        &self,
        session: &mut ClientSession,
        company_id: ObjectId,
        project_id: ObjectId,
        resource_id: ObjectId,
    ) -> DaoResult<AllocatedResource> {
        let project = self
            .projects
            .find_one(doc! { "_id": project_id, "company_id": company_id })
            .session(&mut *session)
            .await?
            .ok_or(DaoError::NotFound)?;

        let record = project
            .allocated_resources
            .iter()
            .find(|a| a.resource_id == resource_id)
            .cloned()
            .ok_or(DaoError::NotFound)?;

        let resource = self
            .base
            .collection()
            .find_one(doc! { "_id": resource_id, "company_id": company_id })
            .session(&mut *session)
            .await?
            .ok_or(DaoError::NotFound)?;

        let restored = resource.quantity + record.quantity;

        self.base
            .collection()
            .update_one(
                doc! { "_id": resource_id },
                doc! {
                    "$inc": { "quantity": record.quantity },
                    "$set": {
                        "status": bson::to_bson(&derive_status(restored, self.low_stock_threshold))?,
                        "updated_at": DateTime::now(),
                    },
                },
            )
            .session(&mut *session)
            .await?;

        self.projects
            .update_one(
                doc! { "_id": project_id },
                doc! {
                    "$pull": { "allocated_resources": { "resource_id": resource_id } },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .session(&mut *session)
            .await?;

        Ok(record)
    }
}

async fn commit(session: &mut ClientSession) -> Result<(), mongodb::error::Error> {
    loop {
        match session.commit_transaction().await {
            Ok(()) => return Ok(()),
            Err(e) if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) => continue,
            Err(e) => return Err(e),
        }
    }
}

fn is_transient(err: &DaoError) -> bool {
    match err {
        DaoError::Mongo(e) => e.contains_label(TRANSIENT_TRANSACTION_ERROR),
        _ => false,
    }
}
