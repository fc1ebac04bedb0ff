use async_trait::async_trait;
use super::todo::{NewTodo, Todo, TodoId};

/// Storage boundary for todos. Absence is reported as `Ok(None)`, never as an error.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Creates the backing schema if it does not exist yet.
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, draft: NewTodo) -> anyhow::Result<Todo>;
    async fn find_by_id(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Most recently created first.
    async fn find_all(&self) -> anyhow::Result<Vec<Todo>>;
    /// Stamps `updated_at` on `todo` and overwrites its row. Unknown ids are a no-op.
    async fn update(&self, todo: &mut Todo) -> anyhow::Result<()>;
    /// Unknown ids are a no-op.
    async fn delete(&self, id: TodoId) -> anyhow::Result<()>;
}
