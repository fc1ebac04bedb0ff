use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("title must be at most {max} characters (got {actual})")]
    TitleTooLong { max: usize, actual: usize },
}
