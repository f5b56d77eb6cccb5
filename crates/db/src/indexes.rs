use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Companies
    create_indexes(
        db,
        "companies",
        vec![index(bson::doc! { "owner_id": 1 })],
    )
    .await?;

    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "company_id": 1, "role": 1 }),
        ],
    )
    .await?;

    // Projects
    create_indexes(
        db,
        "projects",
        vec![
            index(bson::doc! { "company_id": 1, "created_at": -1 }),
            index(bson::doc! { "company_id": 1, "status": 1 }),
            index(bson::doc! { "company_id": 1, "team": 1 }),
            index(bson::doc! { "allocated_resources.resource_id": 1 }),
        ],
    )
    .await?;

    // Resources
    create_indexes(
        db,
        "resources",
        vec![
            index(bson::doc! { "company_id": 1, "name": 1 }),
            index(bson::doc! { "company_id": 1, "category": 1, "status": 1 }),
        ],
    )
    .await?;

    // Activity Logs
    create_indexes(
        db,
        "activity_logs",
        vec![index(bson::doc! { "company_id": 1, "created_at": -1 })],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![
            index(bson::doc! { "user_id": 1, "is_read": 1, "created_at": -1 }),
            index(bson::doc! { "company_id": 1, "user_id": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
