use thiserror::Error;

use crate::types::ComponentId;

/// Why a workspace mutation was turned down. The workspace is left exactly as
/// it was, so a front end can snap the dragged item back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("position ({x}, {y}) is occupied")]
    Occupied { x: i32, y: i32 },
    #[error("position ({x}, {y}) is inside the palette")]
    InPalette { x: i32, y: i32 },
    #[error("no component with id {0}")]
    UnknownComponent(ComponentId),
    #[error("truth table over {count} inputs exceeds the limit of {limit}")]
    TooManyInputs { count: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to access layout file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed layout json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout must be a list of components or an object with a `components` list")]
    NotAList,
}
