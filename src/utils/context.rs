use crate::models::error::SError;
use crate::models::task_status::TaskStatus;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::spawn_blocking;
use tokio::task_local;

task_local! {
     static CHANNEL: UnboundedSender<TaskStatus>;
}

pub struct TaskContext;

impl TaskContext {
    /// Runs `f` on the blocking pool with `channel` bound as the status sink.
    pub async fn provide<F, R>(channel: UnboundedSender<TaskStatus>, f: F) -> Result<R, SError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        spawn_blocking(move || CHANNEL.sync_scope(channel, f))
            .await
            .map_err(|e| SError::AsyncRuntimeError(e.to_string()))
    }

    pub fn emit(status: TaskStatus) -> Result<(), SError> {
        CHANNEL
            .try_with(|c| {
                c.send(status)
                    .map_err(|e| SError::UpdateStatusError(e.to_string()))
            })
            .unwrap_or_else(|_| Err(SError::ContextUnprovided))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_context_fails() {
        assert_eq!(
            TaskContext::emit(TaskStatus::Message("x".into())),
            Err(SError::ContextUnprovided)
        );
    }

    #[tokio::test]
    async fn test_provide_routes_status_to_channel() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let out = TaskContext::provide(tx, || {
            TaskContext::emit(TaskStatus::Message("hello".into())).map(|_| 7)
        })
        .await
        .unwrap();
        assert_eq!(out, Ok(7));
        assert_eq!(rx.recv().await, Some(TaskStatus::Message("hello".into())));
    }
}
