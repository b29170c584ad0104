use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{AttemptStatus, ResponseSet};
use super::repository::{
    AttemptKey, AttemptRecord, AttemptRepository, Completion, RepositoryError,
};

/// Process-local attempt store. Each operation holds the lock for its whole check-and-set.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAttemptRepository {
    records: Arc<Mutex<HashMap<AttemptKey, AttemptRecord>>>,
}

impl InMemoryAttemptRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<AttemptKey, AttemptRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("attempt store poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttemptRepository for InMemoryAttemptRepository {
    fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.key.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, key: &AttemptKey) -> Result<Option<AttemptRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(key).cloned())
    }

    fn merge_responses(
        &self,
        key: &AttemptKey,
        partial: &ResponseSet,
        at: DateTime<Utc>,
    ) -> Result<AttemptRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard.get_mut(key).ok_or(RepositoryError::NotFound)?;
        if record.status.is_terminal() {
            return Err(RepositoryError::AlreadyCompleted);
        }

        if record.responses.merge(partial) {
            record.revision += 1;
            record.updated_at = at;
        }
        Ok(record.clone())
    }

    fn complete(
        &self,
        key: &AttemptKey,
        expected_revision: u64,
        completion: Completion,
    ) -> Result<AttemptRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard.get_mut(key).ok_or(RepositoryError::NotFound)?;
        if record.status.is_terminal() {
            return Err(RepositoryError::AlreadyCompleted);
        }
        if record.revision != expected_revision {
            return Err(RepositoryError::StaleRevision {
                expected: expected_revision,
                found: record.revision,
            });
        }

        record.status = AttemptStatus::Completed;
        record.completed_at = Some(completion.completed_at);
        record.updated_at = completion.completed_at;
        record.total_time_seconds = Some(completion.total_time_seconds);
        record.scores = Some(completion.scores);
        Ok(record.clone())
    }
}
