use common::Job;
use common::storage::{JobStore, StorageError};
use uuid::Uuid;

/// Read-only job lookup. Reads go straight to the store; nothing is cached.
pub struct StatusService<'a> {
    jobs: &'a dyn JobStore,
}

impl<'a> StatusService<'a> {
    pub fn new(jobs: &'a dyn JobStore) -> Self {
        Self { jobs }
    }

    pub async fn get(&self, id: Uuid) -> Result<Job, StorageError> {
        self.jobs.get(id).await?.ok_or(StorageError::NotFound(id))
    }
}
