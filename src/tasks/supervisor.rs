//! Ownership of spawned background tasks

use std::{
    future::Future,
    sync::{Mutex, MutexGuard},
};

use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Keeps the handle of every background task so callers can observe and
/// await their completion. Tasks are never cancelled.
#[derive(Debug, Default)]
pub struct TaskSupervisor {
    tasks: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
}

impl TaskSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(&'static str, JoinHandle<()>)>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Spawn `task` on the runtime and keep its handle
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!("Spawning {} task", name);
        let handle = tokio::spawn(task);
        let mut tasks = self.lock();
        tasks.retain(|(_, handle)| !handle.is_finished());
        tasks.push((name, handle));
    }

    /// Number of tasks that have not finished yet
    pub fn active(&self) -> usize {
        let mut tasks = self.lock();
        tasks.retain(|(_, handle)| !handle.is_finished());
        tasks.len()
    }

    /// Wait until every task, including ones spawned while waiting, is done
    pub async fn wait_idle(&self) {
        loop {
            let pending = std::mem::take(&mut *self.lock());
            if pending.is_empty() {
                return;
            }
            for (name, handle) in pending {
                if let Err(e) = handle.await {
                    error!("{} task failed: {}", name, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn wait_idle_covers_nested_tasks() {
        let supervisor = Arc::new(TaskSupervisor::new());
        let done = Arc::new(AtomicUsize::new(0));

        let inner_supervisor = Arc::clone(&supervisor);
        let inner_done = Arc::clone(&done);
        supervisor.spawn("outer", async move {
            sleep(Duration::from_secs(1)).await;
            let done = Arc::clone(&inner_done);
            inner_supervisor.spawn("inner", async move {
                sleep(Duration::from_secs(5)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
            inner_done.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(supervisor.active(), 1);
        supervisor.wait_idle().await;
        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert_eq!(supervisor.active(), 0);
    }

    #[tokio::test]
    async fn panicked_task_does_not_poison_wait() {
        let supervisor = TaskSupervisor::new();
        supervisor.spawn("doomed", async { panic!("relay exploded") });
        supervisor.wait_idle().await;
        assert_eq!(supervisor.active(), 0);
    }
}
