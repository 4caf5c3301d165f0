//! Shared registry of task snapshots

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::task::model::{Stage, Task};

/// Process-lifetime map from task id to the latest task snapshot.
///
/// Each entry has a single writer (the pipeline running that task) while any
/// number of status queries may read it. Snapshots are swapped wholesale under
/// the shard lock, so readers never observe a partially updated task.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: DashMap<Uuid, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task. Ids are never reused.
    pub fn put(&self, task: Task) -> Result<()> {
        match self.tasks.entry(task.id()) {
            Entry::Occupied(_) => Err(AppError::Internal(format!(
                "task {} is already registered",
                task.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(task);
                Ok(())
            }
        }
    }

    /// Current snapshot of a task
    pub fn get(&self, id: &Uuid) -> Result<Task> {
        self.tasks
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))
    }

    /// Install a new snapshot for an existing, non-terminal task
    pub fn replace(&self, task: Task) -> Result<()> {
        let id = task.id();
        let mut current = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))?;

        if current.is_terminal() {
            return Err(AppError::Internal(format!(
                "task {} is already {}",
                id, current.stage
            )));
        }

        *current = task;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks currently in `stage`
    pub fn count_in_stage(&self, stage: Stage) -> usize {
        self.tasks.iter().filter(|entry| entry.stage == stage).count()
    }
}
