pub mod components;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod history;
pub mod persistence;
pub mod propagation;
pub mod table;
pub mod types;
pub mod workspace;

pub use components::PlacedComponent;
pub use config::{ConfigError, SimConfig};
pub use error::{LayoutError, WorkspaceError};
pub use graph::ConnectionGraph;
pub use persistence::{LayoutRecord, LoadReport, SkipReason};
pub use types::{ComponentId, ComponentKind, Rotation, Signal};
pub use workspace::{MoveOutcome, SimulationReport, Workspace};
