use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::{routing::{get, patch, post}, Json, Router};
use serde::Deserialize;

use crate::application::todo_service::TodoService;
use crate::domain::todo::{Todo, TodoId};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", post(create_todo::<S>).get(list_todos::<S>))
        .route("/todos/:id", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .route("/todos/:id/toggle", patch(toggle_todo::<S>))
        .with_state(state)
}

// Missing fields decode to empty values and are left to validation.
#[derive(Deserialize)]
struct CreateBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct UpdateBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<CreateBody>, JsonRejection>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(body) = payload.map_err(decode_error)?;
    let todo = state.service.create_todo(body.title, body.description).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.get_all_todos().await?))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    match state.service.get_todo_by_id(id).await? {
        Some(todo) => Ok(Json(todo)),
        None => Err(ApiError::not_found(format!("todo {id} not found"))),
    }
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, payload: Result<Json<UpdateBody>, JsonRejection>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload.map_err(decode_error)?;
    state.service.update_todo(id, body.title, body.description, body.completed).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.toggle_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> { s.parse::<i64>().map(TodoId).map_err(|_| ApiError::bad_request("invalid id")) }

fn decode_error(rejection: JsonRejection) -> ApiError { ApiError::bad_request(rejection.body_text()) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42").unwrap(), TodoId(42));
        assert_eq!(parse_id("-3").unwrap(), TodoId(-3));
        for bad in ["abc", "", "1.5", "9999999999999999999999"] {
            assert_eq!(parse_id(bad).unwrap_err().status, StatusCode::BAD_REQUEST, "{bad:?}");
        }
    }
}
