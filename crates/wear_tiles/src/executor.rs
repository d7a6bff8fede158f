//! UI executor
//!
//! Continuations of asynchronous resource loads are queued here and only run
//! when the host pumps the executor, never from inside inflation.

use futures::executor::LocalPool;
use futures::executor::LocalSpawner;

/// Single-threaded task queue standing in for the host UI thread
pub struct UiExecutor {
    pool: LocalPool,
}

impl UiExecutor {
    pub fn new() -> Self {
        Self {
            pool: LocalPool::new(),
        }
    }

    /// Handle used to queue tasks
    pub fn spawner(&self) -> LocalSpawner {
        self.pool.spawner()
    }

    /// Run queued tasks until none can make progress
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Run one task that can make progress, if any
    pub fn try_run_one(&mut self) -> bool {
        self.pool.try_run_one()
    }
}

impl Default for UiExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_only_when_pumped() {
        let mut executor = UiExecutor::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        executor
            .spawner()
            .spawn_local(async move { flag.set(true) })
            .unwrap();

        assert!(!ran.get());
        executor.run_until_stalled();
        assert!(ran.get());
    }
}
