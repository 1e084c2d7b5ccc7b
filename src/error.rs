use thiserror::Error;

/// Errors raised while building a [Grid](crate::grid::Grid). Failing to find a path is not an
/// error; see [AStar::run](crate::astar::AStar::run).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl GridError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
