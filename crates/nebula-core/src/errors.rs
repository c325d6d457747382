use thiserror::Error;

/// Configuration errors.
///
/// Every variant is an invalid-argument failure raised at the configuration
/// boundary, before any layer is rebuilt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NebulaError {
    #[error("Invalid vertex count {0}: a layer needs at least 3 vertices")]
    InvalidVertexCount(usize),
    #[error("Invalid vertex count list entry: '{0}'")]
    InvalidVertexList(String),
    #[error("Invalid color: '{0}'")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, NebulaError>;
