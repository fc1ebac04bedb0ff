use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

/// Process-local repository used in tests in place of SQLite.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    items: BTreeMap<TodoId, Todo>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| anyhow!("in-memory todo store poisoned"))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn init(&self) -> Result<()> { Ok(()) }

    async fn create(&self, draft: NewTodo) -> Result<Todo> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: TodoId(state.next_id),
            title: draft.title,
            description: draft.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> { Ok(self.lock()?.items.get(&id).cloned()) }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let mut todos: Vec<Todo> = self.lock()?.items.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn update(&self, todo: &mut Todo) -> Result<()> {
        let mut state = self.lock()?;
        todo.touch();
        if let Some(stored) = state.items.get_mut(&todo.id) {
            stored.title = todo.title.clone();
            stored.description = todo.description.clone();
            stored.completed = todo.completed;
            stored.updated_at = todo.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        self.lock()?.items.remove(&id);
        Ok(())
    }
}
