//! The layout shape exchanged with storage: an ordered list of
//! `{kind, x, y, rotation}` records without ids.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    error::LayoutError,
    history::SnapshotEntry,
    types::{ComponentId, ComponentKind, Rotation},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub kind: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub rotation: i32,
}

impl LayoutRecord {
    pub fn new(kind: ComponentKind, x: i32, y: i32, rotation: Rotation) -> LayoutRecord {
        LayoutRecord {
            kind: kind.as_str().to_string(),
            x,
            y,
            rotation: rotation.degrees(),
        }
    }

    pub fn validate(&self) -> Result<(ComponentKind, Rotation), SkipReason> {
        let kind = self
            .kind
            .parse::<ComponentKind>()
            .map_err(|e| SkipReason::UnknownKind(e.0))?;
        let rotation =
            Rotation::from_degrees(self.rotation).map_err(|e| SkipReason::InvalidRotation(e.0))?;
        Ok((kind, rotation))
    }
}

impl From<&SnapshotEntry> for LayoutRecord {
    fn from(e: &SnapshotEntry) -> Self {
        LayoutRecord::new(e.kind, e.x, e.y, e.rotation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("unknown component kind `{0}`")]
    UnknownKind(String),
    #[error("invalid rotation {0}")]
    InvalidRotation(i32),
    #[error("position ({x}, {y}) is occupied")]
    Occupied { x: i32, y: i32 },
    #[error("position ({x}, {y}) is inside the palette")]
    InPalette { x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    // position in the source list
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<ComponentId>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Splits a layout document into its records. A record that doesn't have
/// the expected shape comes back as an `Err` in its slot instead of failing
/// the whole document.
pub fn parse_layout(json: &str) -> Result<Vec<Result<LayoutRecord, SkipReason>>, LayoutError> {
    let doc: Value = serde_json::from_str(json)?;
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("components") {
            Some(Value::Array(items)) => items,
            _ => return Err(LayoutError::NotAList),
        },
        _ => return Err(LayoutError::NotAList),
    };
    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<LayoutRecord>(item)
                .map_err(|e| SkipReason::Malformed(e.to_string()))
        })
        .collect())
}

pub fn layout_to_json(records: &[LayoutRecord]) -> Result<String, LayoutError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn read_layout_file(
    path: impl AsRef<Path>,
) -> Result<Vec<Result<LayoutRecord, SkipReason>>, LayoutError> {
    let text = fs::read_to_string(path)?;
    parse_layout(&text)
}

pub fn write_layout_file(
    path: impl AsRef<Path>,
    records: &[LayoutRecord],
) -> Result<(), LayoutError> {
    fs::write(path, layout_to_json(records)?)?;
    Ok(())
}
