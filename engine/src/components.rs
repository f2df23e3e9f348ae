use std::fmt;

use crate::{
    geometry::Point,
    types::{signal_char, ComponentId, ComponentKind, LogicReducer, Rotation, Signal},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedComponent {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
    pub value: Signal,
}

impl PlacedComponent {
    pub fn new(
        id: ComponentId,
        kind: ComponentKind,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> PlacedComponent {
        PlacedComponent {
            id,
            kind,
            x,
            y,
            rotation,
            value: None,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

impl fmt::Display for PlacedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] at ({}, {}) rot {} = {}",
            self.id,
            self.kind,
            self.x,
            self.y,
            self.rotation,
            signal_char(self.value)
        )
    }
}

// incoming values are never empty when a reducer runs
fn parity(v: &[bool]) -> bool {
    v.iter().fold(false, |a, b| a ^ *b)
}

/// Gate behaviour by kind. Constant inputs have no reducer (they are seeded,
/// never evaluated) and wires merge instead of reducing.
pub fn reducer(kind: ComponentKind) -> Option<LogicReducer> {
    let eval: LogicReducer = match kind {
        ComponentKind::Input0 | ComponentKind::Input1 | ComponentKind::Wire => return None,
        ComponentKind::Output => |v| v[0],
        ComponentKind::Not => |v| !v[0],
        ComponentKind::And => |v| v.iter().all(|b| *b),
        ComponentKind::Or => |v| v.iter().any(|b| *b),
        ComponentKind::Nand => |v| !v.iter().all(|b| *b),
        ComponentKind::Nor => |v| !v.iter().any(|b| *b),
        ComponentKind::Xor => parity,
        ComponentKind::Xnor => |v| !parity(v),
    };
    Some(eval)
}
