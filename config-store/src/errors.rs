use thiserror::Error;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested id.
    #[error("record not found: id={0}")]
    NotFound(u64),

    /// Another record already uses this name.
    #[error("name already in use: {0}")]
    DuplicateName(String),

    /// The default model config cannot be removed.
    #[error("the default model config cannot be deleted")]
    DefaultModelDeletion,
}
