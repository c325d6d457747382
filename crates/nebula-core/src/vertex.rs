//! # Vertex Module
//!
//! Per-vertex state of a layer.
//!
//! ## Key Types
//! - `Vertex`: stable index plus the current position in local (unrotated) space.
//! - `VertexAttributes`: the animated polar anchor and the derived Bezier handles,
//!   stored in a side array indexed by `Vertex::index`.
//! - `Direction`: a `+1` / `-1` sign used for rotation and radial oscillation.

use kurbo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A `+1` / `-1` sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Picks either sign with equal probability.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    pub fn signum(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// A node of a [`VertexRing`](crate::ring::VertexRing).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position in the ring, `0..vertex_count`. Never changes.
    pub index: usize,
    /// Current position in local (unrotated) coordinates.
    pub point: Point,
}

impl Vertex {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            point: Point::ORIGIN,
        }
    }
}

/// Animated and derived state of one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexAttributes {
    /// Polar angle of the vertex in radians, fixed at creation.
    pub anchor_angle: f64,
    /// Current distance from the center, kept within the radius bounds.
    pub radius: f64,
    /// Whether the radius currently grows or shrinks.
    pub direction: Direction,
    /// Incoming Bezier handle (used by the segment ending at this vertex).
    pub control_point1: Point,
    /// Outgoing Bezier handle (used by the segment starting at this vertex).
    pub control_point2: Point,
}

impl VertexAttributes {
    pub fn new(anchor_angle: f64, radius: f64, direction: Direction) -> Self {
        Self {
            anchor_angle,
            radius,
            direction,
            control_point1: Point::ORIGIN,
            control_point2: Point::ORIGIN,
        }
    }

    /// Position of the vertex for the given center.
    pub fn position(&self, center: Point) -> Point {
        polar(center, self.anchor_angle, self.radius)
    }
}

/// Point at `distance` from `origin` along `angle` (radians).
pub fn polar(origin: Point, angle: f64, distance: f64) -> Point {
    Point::new(
        origin.x + angle.cos() * distance,
        origin.y + angle.sin() * distance,
    )
}
