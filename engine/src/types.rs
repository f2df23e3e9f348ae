use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type LogicReducer = fn(&[bool]) -> bool;

// None is the undefined state
pub type Signal = Option<bool>;

pub fn signal_char(s: Signal) -> char {
    match s {
        Some(true) => '1',
        Some(false) => '0',
        None => 'x',
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(String);

impl ComponentId {
    pub(crate) fn generate(kind: ComponentKind, n: u64) -> ComponentId {
        ComponentId(format!("{}_{}", kind.as_str(), n))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        ComponentId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "input-0")]
    Input0,
    #[serde(rename = "input-1")]
    Input1,
    #[serde(rename = "output")]
    Output,
    #[serde(rename = "wire")]
    Wire,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "nand")]
    Nand,
    #[serde(rename = "nor")]
    Nor,
    #[serde(rename = "xor")]
    Xor,
    #[serde(rename = "xnor")]
    Xnor,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::Input1,
        ComponentKind::Input0,
        ComponentKind::Output,
        ComponentKind::Wire,
        ComponentKind::And,
        ComponentKind::Or,
        ComponentKind::Not,
        ComponentKind::Nand,
        ComponentKind::Nor,
        ComponentKind::Xor,
        ComponentKind::Xnor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Input0 => "input-0",
            ComponentKind::Input1 => "input-1",
            ComponentKind::Output => "output",
            ComponentKind::Wire => "wire",
            ComponentKind::And => "and",
            ComponentKind::Or => "or",
            ComponentKind::Not => "not",
            ComponentKind::Nand => "nand",
            ComponentKind::Nor => "nor",
            ComponentKind::Xor => "xor",
            ComponentKind::Xnor => "xnor",
        }
    }

    /// Number of input ports.
    pub fn arity(&self) -> usize {
        match self {
            ComponentKind::Input0 | ComponentKind::Input1 => 0,
            ComponentKind::Output | ComponentKind::Wire | ComponentKind::Not => 1,
            ComponentKind::And
            | ComponentKind::Or
            | ComponentKind::Nand
            | ComponentKind::Nor
            | ComponentKind::Xor
            | ComponentKind::Xnor => 2,
        }
    }

    pub fn has_output(&self) -> bool {
        !matches!(self, ComponentKind::Output)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, ComponentKind::Input0 | ComponentKind::Input1)
    }

    /// The literal a constant input is seeded with.
    pub fn literal(&self) -> Option<bool> {
        match self {
            ComponentKind::Input0 => Some(false),
            ComponentKind::Input1 => Some(true),
            _ => None,
        }
    }

    pub fn constant(val: bool) -> ComponentKind {
        if val {
            ComponentKind::Input1
        } else {
            ComponentKind::Input0
        }
    }

    // wires, constant inputs and the probe take a single grid cell
    pub fn is_small(&self) -> bool {
        matches!(
            self,
            ComponentKind::Wire
                | ComponentKind::Input0
                | ComponentKind::Input1
                | ComponentKind::Output
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component kind `{0}`")]
pub struct ParseKindError(pub String);

impl FromStr for ComponentKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rotation must be one of 0, 90, 180, 270 (got {0})")]
pub struct InvalidRotation(pub i32);

impl Rotation {
    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    pub fn from_degrees(deg: i32) -> Result<Rotation, InvalidRotation> {
        match deg {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            other => Err(InvalidRotation(other)),
        }
    }

    /// Quarter turn clockwise on screen (y grows downwards).
    pub fn next(&self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Exact (cos, sin) of the rotation angle.
    pub fn unit(&self) -> (f64, f64) {
        match self {
            Rotation::R0 => (1.0, 0.0),
            Rotation::R90 => (0.0, 1.0),
            Rotation::R180 => (-1.0, 0.0),
            Rotation::R270 => (0.0, -1.0),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_parse_back() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.as_str().parse::<ComponentKind>(), Ok(kind));
        }
        assert_eq!(
            "buffer".parse::<ComponentKind>(),
            Err(ParseKindError("buffer".to_string()))
        );
    }

    #[test]
    fn serde_uses_kind_tags() {
        let json = serde_json::to_string(&ComponentKind::Input1).unwrap();
        assert_eq!(json, "\"input-1\"");
        let back: ComponentKind = serde_json::from_str("\"xnor\"").unwrap();
        assert_eq!(back, ComponentKind::Xnor);
    }

    #[test]
    fn arity_rule() {
        assert_eq!(ComponentKind::Input0.arity(), 0);
        assert_eq!(ComponentKind::Not.arity(), 1);
        assert_eq!(ComponentKind::Wire.arity(), 1);
        assert_eq!(ComponentKind::Output.arity(), 1);
        assert_eq!(ComponentKind::Nor.arity(), 2);
        assert!(!ComponentKind::Output.has_output());
        assert!(ComponentKind::Input1.has_output());
    }

    #[test]
    fn rotation_cycles() {
        let mut r = Rotation::R0;
        for _ in 0..4 {
            r = r.next();
        }
        assert_eq!(r, Rotation::R0);
        assert_eq!(Rotation::R270.next(), Rotation::R0);
        assert_eq!(Rotation::from_degrees(45), Err(InvalidRotation(45)));
        assert_eq!(Rotation::from_degrees(180).unwrap().degrees(), 180);
    }
}
