//! # Frame Module
//!
//! What a painter needs to draw one frame, with the alpha rules already applied.

use crate::color::Argb;
use crate::debug::DebugOverlay;
use kurbo::{BezPath, Point, Rect, Size};

/// Stroke parameters for one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePaint {
    pub color: Argb,
    pub width: f64,
}

/// One layer ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerPaint {
    /// Closed path in local (unrotated) coordinates.
    pub path: BezPath,
    /// Rotation to apply about [`Frame::center`] before painting.
    pub rotation_degrees: f64,
    /// `None` when the fill is skipped.
    pub fill: Option<Argb>,
    /// `None` when the stroke is skipped.
    pub stroke: Option<StrokePaint>,
}

/// A full frame, layers in paint order (first is painted first).
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Preferred canvas size, padding included.
    pub size: Size,
    pub bounds: Rect,
    /// Canvas area inside the padding. Layers are clipped to it; the debug overlay is not.
    pub clip: Rect,
    pub center: Point,
    pub layers: Vec<LayerPaint>,
    /// Present only while debug drawing is enabled.
    pub debug: Option<DebugOverlay>,
}
