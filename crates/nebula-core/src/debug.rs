//! # Debug Module
//!
//! Read-only snapshots of internal geometry for diagnostic overlays.
//! Nothing in the animation path depends on this module.

use crate::color::Argb;
use crate::config::DebugOptions;
use crate::layer::Layer;
use kurbo::{Line, Point, Rect};

pub const BOUNDS_COLOR: Argb = Argb(0xFFE0_E0E0);
pub const RADIUS_COLOR: Argb = Argb(0xFFFF_0000);
pub const SLICE_COLOR: Argb = Argb(0xFFE0_E0E0);
pub const ANCHOR_RAY_COLOR: Argb = Argb(0xFF00_FFFF);
pub const CONTROL_POINT1_COLOR: Argb = Argb(0xFF00_FF00);
pub const CONTROL_POINT2_COLOR: Argb = Argb(0xFF00_00FF);

pub const OVERLAY_STROKE_WIDTH: f64 = 2.0;
pub const VERTEX_MARKER_RADIUS: f64 = 16.0;
pub const CONTROL_POINT_MARKER_RADIUS: f64 = 8.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DebugOverlay {
    pub options: DebugOptions,
    pub bounds: Rect,
    pub center: Point,
    pub min_radius: f64,
    pub max_radius: f64,
    pub layers: Vec<LayerOverlay>,
}

/// Geometry of one layer. Vertices, handles and anchor rays live in the rotated layer
/// space; slice rays do not.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerOverlay {
    pub rotation_degrees: f64,
    pub fill_color: Argb,
    pub vertices: Vec<Point>,
    /// `(control_point1, control_point2)` per vertex.
    pub control_points: Vec<(Point, Point)>,
    pub anchor_rays: Vec<Line>,
    pub slice_rays: Vec<Line>,
}

impl LayerOverlay {
    pub fn capture(layer: &Layer, center: Point, bounds: Rect) -> Self {
        // Rays are long enough to leave the bounds in every direction.
        let reach = |angle: f64| {
            Point::new(
                center.x + angle.cos() * bounds.width(),
                center.y + angle.sin() * bounds.height(),
            )
        };

        let slice = layer.slice_angle();
        let slice_rays = (0..layer.vertex_count())
            .map(|i| Line::new(center, reach(i as f64 * slice)))
            .collect();

        let attributes = layer.attributes();
        Self {
            rotation_degrees: layer.rotation_degrees(),
            fill_color: layer.fill_color(),
            vertices: layer.ring().iter().map(|v| v.point).collect(),
            control_points: attributes
                .iter()
                .map(|a| (a.control_point1, a.control_point2))
                .collect(),
            anchor_rays: attributes
                .iter()
                .map(|a| Line::new(center, reach(a.anchor_angle)))
                .collect(),
            slice_rays,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerGeometry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::TAU;

    #[test]
    fn test_capture_mirrors_layer_geometry() {
        let center = Point::new(100.0, 100.0);
        let bounds = Rect::new(0.0, 0.0, 200.0, 200.0);
        let geometry = LayerGeometry {
            center,
            min_radius: 60.0,
            max_radius: 100.0,
            roundness: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let layer = Layer::new(4, Argb::WHITE, None, &geometry, &mut rng).unwrap();

        let overlay = LayerOverlay::capture(&layer, center, bounds);
        assert_eq!(overlay.vertices.len(), 4);
        assert_eq!(overlay.control_points.len(), 4);
        assert_eq!(overlay.anchor_rays.len(), 4);
        assert_eq!(overlay.slice_rays.len(), 4);
        assert_eq!(overlay.rotation_degrees, layer.rotation_degrees());

        // First slice boundary points along +x; first anchor sits half a slice later.
        let first = overlay.slice_rays[0];
        assert_eq!(first.p0, center);
        assert!((first.p1.x - 300.0).abs() < 1e-9);
        let anchor = overlay.anchor_rays[0].p1 - center;
        assert!((anchor.y.atan2(anchor.x) - TAU / 8.0).abs() < 1e-9);
    }
}
