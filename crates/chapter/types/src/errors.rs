//! Error types for catalogs and term drafts

/// Errors raised by catalog lookups and term draft reconstruction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown position code: {0}")]
    UnknownPosition(String),

    #[error("Position {0} is not a board position")]
    NotBoardPosition(String),

    #[error("Invalid term year: {0}")]
    InvalidYear(i32),

    #[error("Board position {position} is held by both {first} and {second}")]
    BoardSeatConflict {
        position: String,
        first: String,
        second: String,
    },
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
