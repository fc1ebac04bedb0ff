use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn validate(&self) -> Result<(), ValidationError> { validate_title(&self.title) }

    /// Flips completion. Title and description are assumed valid already.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.touch();
    }

    /// Moves `updated_at` forward, strictly past its previous value.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at { now } else { self.updated_at + Duration::nanoseconds(1) };
    }
}

/// A todo that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> { validate_title(&self.title) }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let chars = title.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong { max: TITLE_MAX_CHARS, actual: chars });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Todo {
        let now = Utc::now();
        Todo { id: TodoId(1), title: "Buy milk".into(), description: "2% fat".into(), completed: false, created_at: now, updated_at: now }
    }

    #[test]
    fn titles_within_bounds_are_valid() {
        for len in [1, 2, 50, 99, 100] {
            let draft = NewTodo::new("a".repeat(len), "");
            assert_eq!(draft.validate(), Ok(()), "length {len}");
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        assert_eq!(NewTodo::new("", "anything").validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let err = NewTodo::new("a".repeat(101), "").validate().unwrap_err();
        assert_eq!(err, ValidationError::TitleTooLong { max: 100, actual: 101 });
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // 100 three-byte characters
        let title = "あ".repeat(100);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert_eq!(NewTodo::new(title, "").validate(), Ok(()));
    }

    #[test]
    fn description_is_unconstrained() {
        let mut todo = sample();
        todo.description = "x".repeat(10_000);
        assert!(todo.validate().is_ok());
    }

    #[test]
    fn toggle_twice_restores_flag_and_advances_updated_at() {
        let mut todo = sample();
        let t0 = todo.updated_at;
        todo.toggle();
        assert!(todo.completed);
        let t1 = todo.updated_at;
        assert!(t1 > t0);
        todo.toggle();
        assert!(!todo.completed);
        assert!(todo.updated_at > t1);
        assert!(todo.updated_at >= todo.created_at);
    }

    #[test]
    fn touch_moves_forward_even_when_clock_lags() {
        let mut todo = sample();
        todo.updated_at = Utc::now() + Duration::hours(1);
        let before = todo.updated_at;
        todo.touch();
        assert_eq!(todo.updated_at, before + Duration::nanoseconds(1));
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Buy milk");
        assert_eq!(value["completed"], false);
        assert!(value.get("created_at").is_some());
        assert!(value.get("updated_at").is_some());
    }
}
