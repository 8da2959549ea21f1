use std::future::Future;
use tokio::task::JoinHandle;

/// Spawned timer tasks owned by one component. Dropping the set aborts every
/// task still pending, so no completion can fire after its owner is gone.
#[derive(Debug, Default)]
pub struct ScopedTasks {
    handles: Vec<JoinHandle<()>>,
}

impl ScopedTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.retain(|handle| !handle.is_finished());
        self.handles.push(tokio::spawn(task));
    }

    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|handle| !handle.is_finished()).count()
    }

    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for ScopedTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_tasks() {
        let (tx, mut rx) = mpsc::channel::<u8>(4);
        let mut tasks = ScopedTasks::new();

        let tx_task = tx.clone();
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let _ = tx_task.send(1).await;
        });
        assert_eq!(tasks.pending(), 1);
        drop(tasks);

        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_tasks_are_pruned() {
        let mut tasks = ScopedTasks::new();
        tasks.spawn(async {});
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(tasks.pending(), 0);

        tasks.spawn(async {
            tokio::time::sleep(Duration::from_secs(1)).await;
        });
        assert_eq!(tasks.handles.len(), 1);
    }
}
