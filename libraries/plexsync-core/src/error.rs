/// Core error types for PlexSync
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error raised by a catalog collaborator (local library or remote server)
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The catalog cannot perform the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Data read from the catalog could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Failure reported by the backing store or service
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an invalid data error
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// A value outside the canonical half-star domain reached the codec boundary
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Invalid rating {value}: expected 0.0 to 5.0 in steps of 0.5")]
pub struct InvalidRatingError {
    /// The offending value, in stars
    pub value: f64,
}
