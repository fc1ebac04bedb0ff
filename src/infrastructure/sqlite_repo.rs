use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Row, SqlitePool};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> { Self::connect_with(database_url, 5).await }

    pub async fn connect_with(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true);
        // Every connection to an in-memory database gets its own empty database,
        // so keep exactly one alive for the life of the pool.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to {database_url}"))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (title <> ''),
                description TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .context("failed to create todos table")?;
        Ok(())
    }

    async fn create(&self, draft: NewTodo) -> Result<Todo> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO todos (title, description, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(false)
        .bind(format_timestamp(now))
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await?;
        Ok(Todo {
            id: TodoId(result.last_insert_rowid()),
            title: draft.title,
            description: draft.description,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, title, description, completed, created_at, updated_at FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, title, description, completed, created_at, updated_at FROM todos ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn update(&self, todo: &mut Todo) -> Result<()> {
        todo.touch();
        sqlx::query("UPDATE todos SET title = ?1, description = ?2, completed = ?3, updated_at = ?4 WHERE id = ?5")
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(format_timestamp(todo.updated_at))
            .bind(todo.id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// Fixed width so that ORDER BY on the text column is chronological.
fn format_timestamp(ts: DateTime<Utc>) -> String { ts.to_rfc3339_opts(SecondsFormat::Nanos, true) }

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("malformed timestamp {raw:?}"))?
        .with_timezone(&Utc))
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
