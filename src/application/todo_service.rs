use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::ValidationError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{NewTodo, Todo, TodoId};

#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TodoError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create_todo(&self, title: String, description: String) -> Result<Todo>;
    async fn get_all_todos(&self) -> Result<Vec<Todo>>;
    async fn get_todo_by_id(&self, id: TodoId) -> Result<Option<Todo>>;
    async fn update_todo(&self, id: TodoId, title: String, description: String, completed: bool) -> Result<()>;
    async fn toggle_todo(&self, id: TodoId) -> Result<()>;
    /// Succeeds whether or not `id` exists.
    async fn delete_todo(&self, id: TodoId) -> Result<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }

    async fn load(&self, id: TodoId) -> Result<Todo> {
        self.repo.find_by_id(id).await?.ok_or(TodoError::NotFound(id))
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create_todo(&self, title: String, description: String) -> Result<Todo> {
        let draft = NewTodo::new(title, description);
        draft.validate()?;
        let todo = self.repo.create(draft).await?;
        tracing::info!(id = %todo.id, "todo created");
        Ok(todo)
    }

    async fn get_all_todos(&self) -> Result<Vec<Todo>> { Ok(self.repo.find_all().await?) }

    async fn get_todo_by_id(&self, id: TodoId) -> Result<Option<Todo>> { Ok(self.repo.find_by_id(id).await?) }

    async fn update_todo(&self, id: TodoId, title: String, description: String, completed: bool) -> Result<()> {
        let mut todo = self.load(id).await?;
        todo.title = title;
        todo.description = description;
        todo.completed = completed;
        todo.validate()?;
        self.repo.update(&mut todo).await?;
        tracing::info!(%id, "todo updated");
        Ok(())
    }

    async fn toggle_todo(&self, id: TodoId) -> Result<()> {
        let mut todo = self.load(id).await?;
        todo.toggle();
        self.repo.update(&mut todo).await?;
        tracing::info!(%id, completed = todo.completed, "todo toggled");
        Ok(())
    }

    async fn delete_todo(&self, id: TodoId) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::debug!(%id, "todo deleted");
        Ok(())
    }
}
