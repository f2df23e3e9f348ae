//! Rotation-aware port placement.
//!
//! Every port position in the crate goes through [`PortGeometry`], whether
//! it is the graph builder matching ports, the port listing of the cli, or
//! the snap assist of the workspace.

use std::ops::{Add, Sub};

use crate::{
    components::PlacedComponent,
    consts::{PORT_DISTANCE, PORT_SPREAD},
    types::{ComponentId, ComponentKind, Rotation},
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub owner: ComponentId,
    pub direction: PortDirection,
    pub index: usize,
    pub world: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortGeometry {
    // centre to output port
    distance: f64,
    // sideways shift of the two inputs of a dual input gate
    spread: f64,
}

impl Default for PortGeometry {
    fn default() -> Self {
        PortGeometry::new(PORT_DISTANCE, PORT_SPREAD)
    }
}

impl PortGeometry {
    pub fn new(distance: f64, spread: f64) -> PortGeometry {
        PortGeometry { distance, spread }
    }

    /// Offset of the output port from the component centre, `None` for the
    /// output probe which has nothing to drive.
    pub fn output_offset(&self, kind: ComponentKind, rotation: Rotation) -> Option<Point> {
        if !kind.has_output() {
            return None;
        }
        let (c, s) = rotation.unit();
        Some(Point::new(self.distance * c, self.distance * s))
    }

    /// Input offsets in slot order.
    pub fn input_offsets(&self, kind: ComponentKind, rotation: Rotation) -> Vec<Point> {
        let (c, s) = rotation.unit();
        let (d, w) = (self.distance, self.spread);
        match kind.arity() {
            0 => vec![],
            1 => vec![Point::new(-d * c, -d * s)],
            _ => vec![
                Point::new(-d * c - w * s, -d * s + w * c),
                Point::new(-d * c + w * s, -d * s - w * c),
            ],
        }
    }

    pub fn output_point(&self, comp: &PlacedComponent) -> Option<Point> {
        self.output_offset(comp.kind, comp.rotation)
            .map(|off| comp.center() + off)
    }

    pub fn input_points(&self, comp: &PlacedComponent) -> Vec<Point> {
        let center = comp.center();
        self.input_offsets(comp.kind, comp.rotation)
            .into_iter()
            .map(|off| center + off)
            .collect()
    }

    /// All ports of a component in world coordinates, output first.
    pub fn ports_of(&self, comp: &PlacedComponent) -> Vec<Port> {
        let mut ports = Vec::with_capacity(3);
        if let Some(world) = self.output_point(comp) {
            ports.push(Port {
                owner: comp.id.clone(),
                direction: PortDirection::Out,
                index: 0,
                world,
            });
        }
        for (index, world) in self.input_points(comp).into_iter().enumerate() {
            ports.push(Port {
                owner: comp.id.clone(),
                direction: PortDirection::In,
                index,
                world,
            });
        }
        ports
    }
}
