use bson::oid::ObjectId;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Path-addressed blob store backed by a local directory.
///
/// Keys follow `projects/{project_id}/[tasks/{task_id}/]{file_id}-{name}`,
/// matching the metadata records embedded in the project aggregate.
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_key(
        project_id: ObjectId,
        task_id: Option<ObjectId>,
        file_id: ObjectId,
        name: &str,
    ) -> String {
        match task_id {
            Some(task_id) => format!(
                "projects/{}/tasks/{}/{}-{}",
                project_id.to_hex(),
                task_id.to_hex(),
                file_id.to_hex(),
                name
            ),
            None => format!(
                "projects/{}/{}-{}",
                project_id.to_hex(),
                file_id.to_hex(),
                name
            ),
        }
    }

    pub async fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await
    }

    pub async fn get(&self, key: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(key)).await
    }

    pub async fn exists(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.root.join(key))
            .await
            .unwrap_or(false)
    }

    /// Idempotent: deleting an object that is already gone is success.
    pub async fn delete(&self, key: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(key, "Blob already absent, treating delete as success");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
