use thiserror::Error;

/// Errors raised when a pagination callback receives an unusable value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Pages are 1-based.
    #[error("page index must be at least 1")]
    InvalidPage,

    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Pagination keys are owned by the pager, not by the filter form.
    #[error("'{0}' is a pagination key and cannot be set as a filter")]
    ReservedKey(String),
}
