//! # Layer Module
//!
//! One animated blob shape.
//!
//! ## Responsibilities
//! - **Construction**: random rotation, one vertex per equal angular slice, random radii.
//! - **Smoothing**: derives Bezier handles from neighbor positions and assembles the closed path.
//! - **Motion**: per-tick rotation and bounded radial oscillation.
//!
//! Rotation is never baked into vertex coordinates; painters rotate the path about the
//! shared center at draw time.

use crate::color::Argb;
use crate::errors::Result;
use crate::ring::VertexRing;
use crate::vertex::{polar, Direction, VertexAttributes};
use kurbo::{BezPath, Point};
use rand::Rng;
use std::f64::consts::{PI, TAU};

/// Stack-wide inputs that shape every layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerGeometry {
    pub center: Point,
    pub min_radius: f64,
    pub max_radius: f64,
    pub roundness: f64,
}

/// Per-tick motion amounts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Degrees added to (or removed from) the rotation each tick.
    pub rotation_delta: f64,
    /// Pixels added to (or removed from) each vertex radius each tick.
    pub radial_step: f64,
}

#[derive(Clone, Debug)]
pub struct Layer {
    fill_color: Argb,
    stroke_color: Argb,
    rotation: f64,
    rotation_direction: Direction,
    ring: VertexRing,
    attributes: Vec<VertexAttributes>,
    path: BezPath,
}

impl Layer {
    /// Builds a fresh layer. `stroke_color` defaults to `fill_color`.
    ///
    /// Fails when `vertex_count < 3`; nothing is allocated in that case.
    pub fn new<R: Rng + ?Sized>(
        vertex_count: usize,
        fill_color: Argb,
        stroke_color: Option<Argb>,
        geometry: &LayerGeometry,
        rng: &mut R,
    ) -> Result<Self> {
        let mut ring = VertexRing::new(vertex_count)?;

        let rotation = rng.gen_range(0.0..360.0);
        let rotation_direction = Direction::random(rng);

        let slice = TAU / vertex_count as f64;
        let spread = geometry.max_radius - geometry.min_radius;

        let mut attributes = Vec::with_capacity(vertex_count);
        for vertex in ring.iter_mut() {
            let anchor_angle = vertex.index as f64 * slice + slice * 0.5;
            let radius = geometry.min_radius + rng.gen::<f64>() * spread;
            let attrs = VertexAttributes::new(anchor_angle, radius, Direction::random(rng));
            vertex.point = attrs.position(geometry.center);
            attributes.push(attrs);
        }

        let mut layer = Self {
            fill_color,
            stroke_color: stroke_color.unwrap_or(fill_color),
            rotation,
            rotation_direction,
            ring,
            attributes,
            path: BezPath::new(),
        };
        layer.rebuild_path(geometry.roundness);
        Ok(layer)
    }

    /// Recomputes every control point from the current neighbor positions and
    /// reassembles the closed path.
    pub fn rebuild_path(&mut self, roundness: f64) {
        let ring = &self.ring;
        for (index, attrs) in self.attributes.iter_mut().enumerate() {
            let point = ring.vertex(index).point;
            let previous = ring.vertex(ring.previous(index)).point;
            let next = ring.vertex(ring.next(index)).point;

            let amplitude = roundness * previous.distance(next) / 4.0;
            let angle = (previous.y - next.y).atan2(previous.x - next.x);

            attrs.control_point1 = polar(point, angle, amplitude);
            attrs.control_point2 = polar(point, angle + PI, amplitude);
        }

        let mut path = BezPath::new();
        path.move_to(ring.vertex(0).point);
        for vertex in ring {
            let next = ring.next(vertex.index);
            path.curve_to(
                self.attributes[vertex.index].control_point2,
                self.attributes[next].control_point1,
                ring.vertex(next).point,
            );
        }
        path.close_path();
        self.path = path;
    }

    /// Advances one tick: rotates, pulses every radius within the bounds, rebuilds the path.
    pub fn advance(&mut self, geometry: &LayerGeometry, motion: &Motion) {
        self.rotation = wrap_degrees(
            self.rotation + self.rotation_direction.signum() * motion.rotation_delta,
        );

        for vertex in self.ring.iter_mut() {
            let attrs = &mut self.attributes[vertex.index];
            let moved = attrs.radius + attrs.direction.signum() * motion.radial_step;
            attrs.radius = geometry.max_radius.min(geometry.min_radius.max(moved));

            // Exact comparison against the post-clamp value: an overshooting step snaps
            // to the bound and reverses on the next tick.
            if attrs.radius == geometry.min_radius {
                attrs.direction = Direction::Positive;
            } else if attrs.radius == geometry.max_radius {
                attrs.direction = Direction::Negative;
            }

            vertex.point = attrs.position(geometry.center);
        }

        self.rebuild_path(geometry.roundness);
    }

    /// Moves every vertex to a new center, keeping radii, directions and rotation.
    pub fn recenter(&mut self, geometry: &LayerGeometry) {
        for vertex in self.ring.iter_mut() {
            vertex.point = self.attributes[vertex.index].position(geometry.center);
        }
        self.rebuild_path(geometry.roundness);
    }

    pub fn set_colors(&mut self, fill_color: Argb, stroke_color: Option<Argb>) {
        self.fill_color = fill_color;
        self.stroke_color = stroke_color.unwrap_or(fill_color);
    }

    pub fn vertex_count(&self) -> usize {
        self.ring.vertex_count()
    }

    pub fn fill_color(&self) -> Argb {
        self.fill_color
    }

    pub fn stroke_color(&self) -> Argb {
        self.stroke_color
    }

    /// Current rotation in degrees, always within `[0, 360)`.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation
    }

    pub fn rotation_direction(&self) -> Direction {
        self.rotation_direction
    }

    pub fn ring(&self) -> &VertexRing {
        &self.ring
    }

    pub fn attributes(&self) -> &[VertexAttributes] {
        &self.attributes
    }

    /// The closed cubic path in local (unrotated) coordinates.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Angular width of one vertex slice, in radians.
    pub fn slice_angle(&self) -> f64 {
        TAU / self.ring.vertex_count() as f64
    }
}

/// Reduces `degrees` into `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NebulaError;
    use kurbo::PathEl;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn geometry(min_radius: f64, max_radius: f64, roundness: f64) -> LayerGeometry {
        LayerGeometry {
            center: Point::new(300.0, 300.0),
            min_radius,
            max_radius,
            roundness,
        }
    }

    fn layer(vertex_count: usize, geometry: &LayerGeometry) -> Layer {
        let mut rng = StdRng::seed_from_u64(7);
        Layer::new(vertex_count, Argb(0xFF11_2233), None, geometry, &mut rng).unwrap()
    }

    fn approx(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn test_construction_rejects_small_rings() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = Layer::new(2, Argb::BLACK, None, &geometry(10.0, 20.0, 1.0), &mut rng)
            .unwrap_err();
        assert_eq!(err, NebulaError::InvalidVertexCount(2));
    }

    #[test]
    fn test_anchors_sit_on_slice_midpoints() {
        let layer = layer(4, &geometry(10.0, 20.0, 1.0));
        let slice = TAU / 4.0;
        for (i, attrs) in layer.attributes().iter().enumerate() {
            assert!((attrs.anchor_angle - (i as f64 + 0.5) * slice).abs() < 1e-12);
            assert!(attrs.radius >= 10.0 && attrs.radius <= 20.0);
        }
        assert!(layer.rotation_degrees() >= 0.0 && layer.rotation_degrees() < 360.0);
    }

    #[test]
    fn test_stroke_defaults_to_fill() {
        let layer = layer(5, &geometry(10.0, 20.0, 1.0));
        assert_eq!(layer.stroke_color(), layer.fill_color());
    }

    #[test]
    fn test_zero_roundness_collapses_handles() {
        let layer = layer(6, &geometry(50.0, 80.0, 0.0));
        for vertex in layer.ring() {
            let attrs = &layer.attributes()[vertex.index];
            assert!(approx(attrs.control_point1, vertex.point));
            assert!(approx(attrs.control_point2, vertex.point));
        }
    }

    #[test]
    fn test_handles_are_opposite_and_equal_length() {
        let layer = layer(7, &geometry(50.0, 80.0, 1.3));
        for vertex in layer.ring() {
            let attrs = &layer.attributes()[vertex.index];
            let a = attrs.control_point1 - vertex.point;
            let b = attrs.control_point2 - vertex.point;
            assert!((a + b).hypot() < 1e-9);

            let previous = layer.ring().vertex(layer.ring().previous(vertex.index)).point;
            let next = layer.ring().vertex(layer.ring().next(vertex.index)).point;
            let expected = 1.3 * previous.distance(next) / 4.0;
            assert!((a.hypot() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_path_walks_ring_once() {
        let layer = layer(5, &geometry(50.0, 80.0, 1.0));
        let elements = layer.path().elements();
        assert_eq!(elements.len(), 5 + 2);
        assert_eq!(elements[0], PathEl::MoveTo(layer.ring().vertex(0).point));
        for (i, el) in elements[1..6].iter().enumerate() {
            let next = (i + 1) % 5;
            let expected = PathEl::CurveTo(
                layer.attributes()[i].control_point2,
                layer.attributes()[next].control_point1,
                layer.ring().vertex(next).point,
            );
            assert_eq!(*el, expected);
        }
        assert_eq!(elements[6], PathEl::ClosePath);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut layer = layer(8, &geometry(40.0, 90.0, 1.0));
        let attributes = layer.attributes().to_vec();
        let path = layer.path().clone();
        layer.rebuild_path(1.0);
        assert_eq!(layer.attributes(), attributes.as_slice());
        assert_eq!(layer.path(), &path);
    }

    #[test]
    fn test_advance_keeps_anchor_angles() {
        let geometry = geometry(40.0, 90.0, 1.0);
        let mut layer = layer(6, &geometry);
        let anchors: Vec<f64> = layer.attributes().iter().map(|a| a.anchor_angle).collect();
        let motion = Motion {
            rotation_delta: 3.0,
            radial_step: 7.5,
        };
        for _ in 0..50 {
            layer.advance(&geometry, &motion);
        }
        let after: Vec<f64> = layer.attributes().iter().map(|a| a.anchor_angle).collect();
        assert_eq!(anchors, after);
        for vertex in layer.ring() {
            let attrs = &layer.attributes()[vertex.index];
            assert!(approx(vertex.point, attrs.position(geometry.center)));
        }
    }

    #[test]
    fn test_bounce_reverses_at_bounds() {
        let geometry = geometry(10.0, 20.0, 1.0);
        let mut layer = layer(3, &geometry);
        layer.attributes[0].radius = 19.5;
        layer.attributes[0].direction = Direction::Positive;
        let motion = Motion {
            rotation_delta: 0.0,
            radial_step: 1.0,
        };

        layer.advance(&geometry, &motion);
        assert_eq!(layer.attributes()[0].radius, 20.0);
        assert_eq!(layer.attributes()[0].direction, Direction::Negative);

        layer.advance(&geometry, &motion);
        assert_eq!(layer.attributes()[0].radius, 19.0);
        assert_eq!(layer.attributes()[0].direction, Direction::Negative);
    }

    #[test]
    fn test_recenter_preserves_phase() {
        let geometry = geometry(40.0, 90.0, 1.0);
        let mut layer = layer(5, &geometry);
        let radii: Vec<f64> = layer.attributes().iter().map(|a| a.radius).collect();
        let rotation = layer.rotation_degrees();
        let moved = LayerGeometry {
            center: Point::new(320.0, 310.0),
            ..geometry
        };
        layer.recenter(&moved);
        let after: Vec<f64> = layer.attributes().iter().map(|a| a.radius).collect();
        assert_eq!(radii, after);
        assert_eq!(rotation, layer.rotation_degrees());
        for vertex in layer.ring() {
            assert!((vertex.point.distance(moved.center) - radii[vertex.index]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert_eq!(wrap_degrees(-1e-20), 0.0);
    }

    proptest! {
        #[test]
        fn radius_stays_bounded_and_flips_at_bounds(
            min_radius in 0.0f64..200.0,
            spread in 0.0f64..100.0,
            step in 0.0f64..40.0,
            ticks in 1usize..200,
        ) {
            let max_radius = min_radius + spread;
            let geometry = geometry(min_radius, max_radius, 1.0);
            let mut layer = layer(3, &geometry);
            layer.attributes[0].radius = (max_radius - step).max(min_radius);
            layer.attributes[0].direction = Direction::Positive;
            let motion = Motion { rotation_delta: 0.0, radial_step: step };

            for _ in 0..ticks {
                let before = layer.attributes()[0];
                layer.advance(&geometry, &motion);
                let after = layer.attributes()[0];
                prop_assert!(after.radius >= min_radius && after.radius <= max_radius);
                if after.radius == min_radius {
                    prop_assert_eq!(after.direction, Direction::Positive);
                } else if after.radius == max_radius {
                    prop_assert_eq!(after.direction, Direction::Negative);
                } else {
                    prop_assert_eq!(after.direction, before.direction);
                }
            }
        }

        #[test]
        fn rotation_wraps_into_range(delta in 0.0f64..360.0, ticks in 0usize..500) {
            let geometry = geometry(10.0, 20.0, 1.0);
            let mut layer = layer(4, &geometry);
            let initial = layer.rotation_degrees();
            let sign = layer.rotation_direction().signum();
            let motion = Motion { rotation_delta: delta, radial_step: 0.0 };
            for _ in 0..ticks {
                layer.advance(&geometry, &motion);
                prop_assert!(layer.rotation_degrees() >= 0.0 && layer.rotation_degrees() < 360.0);
            }
            let expected = wrap_degrees(initial + ticks as f64 * delta * sign);
            let diff = (layer.rotation_degrees() - expected).abs();
            prop_assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "got {} expected {}", layer.rotation_degrees(), expected);
        }
    }
}
