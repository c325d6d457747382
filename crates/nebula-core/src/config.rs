//! # Config Module
//!
//! The serializable configuration document and its normalization rules.
//!
//! ## Responsibilities
//! - **Defaults**: the values a stack starts from when a field is absent.
//! - **Normalization**: numeric fields are clamped, empty lists replaced, and
//!   list entries validated. Invalid list entries are rejected; nothing else is.
//! - **Host Strings**: parsing of comma separated vertex count attributes.

use crate::color::Argb;
use crate::errors::{NebulaError, Result};
use crate::property::Property;
use crate::ring::MIN_VERTICES;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 140;

pub const DEFAULT_MIN_RADIUS: f64 = 200.0;
pub const DEFAULT_MAX_RADIUS: f64 = 250.0;
pub const DEFAULT_ROUNDNESS: f64 = 1.0;
pub const DEFAULT_LAYERS_COUNT: usize = 3;
pub const DEFAULT_VERTICES_COUNT: usize = 10;
pub const DEFAULT_FILL_COLOR: Argb = Argb(0x2080_8080);
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
pub const DEFAULT_FPS: u32 = 24;
pub const DEFAULT_FRAME_VERTEX_TRANSLATION: f64 = 1.0;
pub const DEFAULT_FRAME_LAYER_ROTATION: f64 = 0.0174;

/// Space reserved around the drawing bounds, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// Which diagnostic overlays a painter should draw. Nothing is drawn unless `enabled`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    pub enabled: bool,
    pub bounds: bool,
    pub min_radius: bool,
    pub max_radius: bool,
    pub slices: bool,
    pub vertices: bool,
    pub vertex_paths: bool,
    pub control_points: bool,
}

impl DebugOptions {
    /// Every overlay switched on.
    pub fn all() -> Self {
        Self {
            enabled: true,
            bounds: true,
            min_radius: true,
            max_radius: true,
            slices: true,
            vertices: true,
            vertex_paths: true,
            control_points: true,
        }
    }
}

/// Complete configuration of a layer stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaConfig {
    /// Smallest vertex radius, in pixels.
    pub min_radius: f64,
    /// Largest vertex radius, in pixels. Also sizes the drawing bounds.
    pub max_radius: f64,
    /// Bezier handle scale; `0` draws straight edges.
    pub roundness: f64,
    pub layers_count: usize,
    /// Per-layer vertex counts, read cyclically.
    pub vertices_count: Vec<usize>,
    /// Per-layer fill colors, read cyclically.
    pub fill_colors: Vec<Argb>,
    /// Per-layer stroke colors, read cyclically. Empty means "use the fill color".
    pub stroke_colors: Vec<Argb>,
    pub stroke_width: f64,
    /// Fill alpha override in `[0, 1]`; `None` keeps each color's own alpha.
    pub fill_alpha: Option<f32>,
    /// Stroke alpha override in `[0, 1]`; `None` keeps each color's own alpha.
    pub stroke_alpha: Option<f32>,
    pub frames_per_second: u32,
    /// Radial step per tick, in pixels.
    pub frame_vertex_translation: f64,
    /// Rotation per tick, in degrees.
    pub frame_layer_rotation: f64,
    pub padding: Padding,
    /// Fixed RNG seed for reproducible layouts.
    pub seed: Option<u64>,
    pub debug: DebugOptions,
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            roundness: DEFAULT_ROUNDNESS,
            layers_count: DEFAULT_LAYERS_COUNT,
            vertices_count: vec![DEFAULT_VERTICES_COUNT],
            fill_colors: vec![DEFAULT_FILL_COLOR],
            stroke_colors: Vec::new(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill_alpha: None,
            stroke_alpha: None,
            frames_per_second: DEFAULT_FPS,
            frame_vertex_translation: DEFAULT_FRAME_VERTEX_TRANSLATION,
            frame_layer_rotation: DEFAULT_FRAME_LAYER_ROTATION,
            padding: Padding::default(),
            seed: None,
            debug: DebugOptions::default(),
        }
    }
}

impl NebulaConfig {
    /// Returns a copy with every field brought into its valid range.
    ///
    /// Fails only on vertex counts below three; the receiver is never modified.
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self {
            min_radius: non_negative("min_radius", self.min_radius),
            max_radius: non_negative("max_radius", self.max_radius),
            roundness: non_negative("roundness", self.roundness),
            layers_count: normalize_layers_count(self.layers_count),
            vertices_count: normalize_vertices_count(self.vertices_count.clone())?,
            fill_colors: normalize_fill_colors(self.fill_colors.clone()),
            stroke_colors: self.stroke_colors.clone(),
            stroke_width: non_negative("stroke_width", self.stroke_width),
            fill_alpha: normalize_alpha("fill_alpha", self.fill_alpha),
            stroke_alpha: normalize_alpha("stroke_alpha", self.stroke_alpha),
            frames_per_second: clamp_fps(self.frames_per_second),
            frame_vertex_translation: non_negative("frame_vertex_translation", self.frame_vertex_translation),
            frame_layer_rotation: normalize_frame_rotation(self.frame_layer_rotation),
            padding: normalize_padding(self.padding),
            seed: self.seed,
            debug: self.debug,
        })
    }

    /// Properties whose values differ between `self` and `other`. The seed is not a
    /// property and is ignored.
    pub fn diff(&self, other: &NebulaConfig) -> Vec<Property> {
        let mut changed = Vec::new();
        let mut check = |differs: bool, property: Property| {
            if differs {
                changed.push(property);
            }
        };
        check(self.min_radius != other.min_radius, Property::MinRadius);
        check(self.max_radius != other.max_radius, Property::MaxRadius);
        check(self.roundness != other.roundness, Property::Roundness);
        check(self.layers_count != other.layers_count, Property::LayersCount);
        check(self.vertices_count != other.vertices_count, Property::VerticesCount);
        check(self.fill_colors != other.fill_colors, Property::FillColors);
        check(self.stroke_colors != other.stroke_colors, Property::StrokeColors);
        check(self.stroke_width != other.stroke_width, Property::StrokeWidth);
        check(self.fill_alpha != other.fill_alpha, Property::FillAlpha);
        check(self.stroke_alpha != other.stroke_alpha, Property::StrokeAlpha);
        check(
            self.frames_per_second != other.frames_per_second,
            Property::FramesPerSecond,
        );
        check(
            self.frame_vertex_translation != other.frame_vertex_translation,
            Property::FrameVertexTranslation,
        );
        check(
            self.frame_layer_rotation != other.frame_layer_rotation,
            Property::FrameLayerRotation,
        );
        check(self.padding != other.padding, Property::Padding);
        check(self.debug != other.debug, Property::Debug);
        changed
    }

    /// Minimum radius actually used for geometry; never above the maximum.
    pub fn effective_min_radius(&self) -> f64 {
        self.min_radius.min(self.max_radius)
    }
}

/// Parses a vertex count attribute such as `"3, 5,7"`.
pub fn parse_vertex_counts(text: &str) -> Result<Vec<usize>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .map(|entry| {
            entry
                .parse::<usize>()
                .map_err(|_| NebulaError::InvalidVertexList(entry.to_string()))
        })
        .collect()
}

/// Raises negative and NaN values to 0.
pub(crate) fn non_negative(field: &'static str, value: f64) -> f64 {
    if value >= 0.0 {
        return value;
    }
    warn!(field, value, "negative value raised to 0");
    0.0
}

pub(crate) fn normalize_padding(padding: Padding) -> Padding {
    Padding {
        left: non_negative("padding.left", padding.left),
        top: non_negative("padding.top", padding.top),
        right: non_negative("padding.right", padding.right),
        bottom: non_negative("padding.bottom", padding.bottom),
    }
}

pub(crate) fn clamp_fps(fps: u32) -> u32 {
    let clamped = fps.clamp(MIN_FPS, MAX_FPS);
    if clamped != fps {
        warn!(fps, clamped, "frame rate clamped");
    }
    clamped
}

pub(crate) fn normalize_layers_count(count: usize) -> usize {
    if count == 0 {
        warn!("layers_count of 0 raised to 1");
        1
    } else {
        count
    }
}

/// Degrees per tick: reduced modulo 360, negative results raised to 0.
pub(crate) fn normalize_frame_rotation(degrees: f64) -> f64 {
    let reduced = non_negative("frame_layer_rotation", degrees % 360.0);
    if reduced != degrees && degrees >= 0.0 {
        warn!(degrees, reduced, "frame rotation reduced modulo 360");
    }
    reduced
}

/// Clamps an alpha override into `[0, 1]`; NaN clears the override.
pub(crate) fn normalize_alpha(field: &'static str, alpha: Option<f32>) -> Option<f32> {
    let value = alpha?;
    if value.is_nan() {
        warn!(field, "NaN alpha override ignored");
        return None;
    }
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        warn!(field, value, clamped, "alpha override clamped");
    }
    Some(clamped)
}

pub(crate) fn normalize_vertices_count(counts: Vec<usize>) -> Result<Vec<usize>> {
    if counts.is_empty() {
        return Ok(vec![DEFAULT_VERTICES_COUNT]);
    }
    if let Some(&bad) = counts.iter().find(|&&count| count < MIN_VERTICES) {
        return Err(NebulaError::InvalidVertexCount(bad));
    }
    Ok(counts)
}

pub(crate) fn normalize_fill_colors(colors: Vec<Argb>) -> Vec<Argb> {
    if colors.is_empty() {
        vec![DEFAULT_FILL_COLOR]
    } else {
        colors
    }
}
