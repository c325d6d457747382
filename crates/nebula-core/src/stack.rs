//! # Stack Module
//!
//! The engine root: an ordered set of layers plus the parameters they share.
//!
//! ## Responsibilities
//! - **Configuration**: one setter per property; each validates its input, looks up the
//!   property's [`Effect`], applies it, and marks the stack invalid.
//! - **Rebuild**: geometry changes replace every layer. New layers are built before the
//!   old ones are dropped, so a failed rebuild leaves the stack untouched.
//! - **Tick**: [`LayerStack::advance`] moves every layer one frame, in stack order.
//! - **Output**: [`LayerStack::frame`] resolves paths, rotations and paints for a painter.

use crate::color::{cyclic, resolve_paint, Argb};
use crate::config::{
    clamp_fps, non_negative, normalize_alpha, normalize_fill_colors, normalize_frame_rotation,
    normalize_layers_count, normalize_padding, normalize_vertices_count, DebugOptions,
    NebulaConfig, Padding, DEFAULT_FILL_COLOR, DEFAULT_VERTICES_COUNT,
};
use crate::debug::{DebugOverlay, LayerOverlay};
use crate::errors::Result;
use crate::frame::{Frame, LayerPaint, StrokePaint};
use crate::layer::{Layer, LayerGeometry, Motion};
use crate::measure::{measure, MeasureSpec};
use crate::property::{Effect, Property};
use crate::ticker::frame_interval;
use kurbo::{Point, Rect, Size};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Pending work for the host, accumulated until [`LayerStack::take_invalidation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// The frame changed and should be painted again.
    pub redraw: bool,
    /// The preferred size changed and the host should measure again.
    pub relayout: bool,
}

pub struct LayerStack {
    config: NebulaConfig,
    layers: Vec<Layer>,
    rng: StdRng,
    invalidation: Invalidation,
}

impl LayerStack {
    /// Builds a stack, seeding from `config.seed` or from entropy.
    #[instrument(level = "debug", skip(config), fields(layers = config.layers_count))]
    pub fn new(config: NebulaConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Builds a stack with a fixed seed, ignoring `config.seed`.
    pub fn with_seed(config: NebulaConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: NebulaConfig, mut rng: StdRng) -> Result<Self> {
        let config = config.normalized()?;
        let layers = build_layers(&config, &mut rng)?;
        Ok(Self {
            config,
            layers,
            rng,
            invalidation: Invalidation {
                redraw: true,
                relayout: true,
            },
        })
    }

    pub fn config(&self) -> &NebulaConfig {
        &self.config
    }

    /// Layers in paint order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn geometry(&self) -> LayerGeometry {
        LayerGeometry {
            center: self.center(),
            min_radius: self.config.effective_min_radius(),
            max_radius: self.config.max_radius,
            roundness: self.config.roundness,
        }
    }

    pub fn motion(&self) -> Motion {
        Motion {
            rotation_delta: self.config.frame_layer_rotation,
            radial_step: self.config.frame_vertex_translation,
        }
    }

    /// Square of side `2 * max_radius`, offset by the left/top padding.
    pub fn bounds(&self) -> Rect {
        bounds_for(&self.config)
    }

    /// Center shared by every layer; rotations happen about this point.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Drawing bounds plus padding on every side.
    pub fn preferred_size(&self) -> Size {
        let side = 2.0 * self.config.max_radius;
        let padding = self.config.padding;
        Size::new(
            side + padding.left + padding.right,
            side + padding.top + padding.bottom,
        )
    }

    /// Preferred size minus padding; painters clip layers to this area.
    pub fn content_rect(&self) -> Rect {
        let size = self.preferred_size();
        let padding = self.config.padding;
        Rect::new(
            padding.left,
            padding.top,
            size.width - padding.right,
            size.height - padding.bottom,
        )
    }

    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Size {
        measure(self.preferred_size(), width, height)
    }

    /// Time the ticker should wait between two [`advance`](Self::advance) calls.
    pub fn frame_interval(&self) -> Duration {
        frame_interval(self.config.frames_per_second)
    }

    /// Moves every layer by one frame, in stack order.
    pub fn advance(&mut self) {
        let geometry = self.geometry();
        let motion = self.motion();
        for layer in &mut self.layers {
            layer.advance(&geometry, &motion);
        }
        self.invalidation.redraw = true;
        trace!(layers = self.layers.len(), "advanced one frame");
    }

    /// Returns and clears the pending invalidation.
    pub fn take_invalidation(&mut self) -> Invalidation {
        std::mem::take(&mut self.invalidation)
    }

    pub fn invalidation(&self) -> Invalidation {
        self.invalidation
    }

    /// Resolves everything a painter needs for the current state.
    pub fn frame(&self) -> Frame {
        let config = &self.config;
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerPaint {
                path: layer.path().clone(),
                rotation_degrees: layer.rotation_degrees(),
                fill: resolve_paint(layer.fill_color(), config.fill_alpha),
                stroke: if config.stroke_width > 0.0 {
                    resolve_paint(layer.stroke_color(), config.stroke_alpha).map(|color| {
                        StrokePaint {
                            color,
                            width: config.stroke_width,
                        }
                    })
                } else {
                    None
                },
            })
            .collect();

        Frame {
            size: self.preferred_size(),
            bounds: self.bounds(),
            clip: self.content_rect(),
            center: self.center(),
            layers,
            debug: config.debug.enabled.then(|| self.debug_overlay()),
        }
    }

    /// Snapshot of the internal geometry, regardless of the debug switches.
    pub fn debug_overlay(&self) -> DebugOverlay {
        let bounds = self.bounds();
        let center = bounds.center();
        DebugOverlay {
            options: self.config.debug,
            bounds,
            center,
            min_radius: self.config.effective_min_radius(),
            max_radius: self.config.max_radius,
            layers: self
                .layers
                .iter()
                .map(|layer| LayerOverlay::capture(layer, center, bounds))
                .collect(),
        }
    }

    // --- Geometry properties (full rebuild) ---

    pub fn set_min_radius(&mut self, min_radius: f64) -> Result<Effect> {
        self.rebuild_with(Property::MinRadius, |c| c.min_radius = non_negative("min_radius", min_radius))
    }

    pub fn set_max_radius(&mut self, max_radius: f64) -> Result<Effect> {
        self.rebuild_with(Property::MaxRadius, |c| c.max_radius = non_negative("max_radius", max_radius))
    }

    /// Sets both radius bounds with a single rebuild.
    pub fn set_radius_range(&mut self, min_radius: f64, max_radius: f64) -> Result<Effect> {
        self.rebuild_with(Property::MaxRadius, |c| {
            c.min_radius = non_negative("min_radius", min_radius);
            c.max_radius = non_negative("max_radius", max_radius);
        })
    }

    pub fn set_roundness(&mut self, roundness: f64) -> Result<Effect> {
        self.rebuild_with(Property::Roundness, |c| c.roundness = non_negative("roundness", roundness))
    }

    pub fn set_layers_count(&mut self, layers_count: usize) -> Result<Effect> {
        let layers_count = normalize_layers_count(layers_count);
        self.rebuild_with(Property::LayersCount, |c| c.layers_count = layers_count)
    }

    /// An empty list falls back to the default count; any entry below three is rejected
    /// before the stack is touched.
    pub fn set_vertices_count(&mut self, vertices_count: Vec<usize>) -> Result<Effect> {
        let vertices_count = normalize_vertices_count(vertices_count)?;
        self.rebuild_with(Property::VerticesCount, |c| c.vertices_count = vertices_count)
    }

    // --- Palette properties (in-place refresh) ---

    /// An empty list falls back to the default fill color.
    pub fn set_fill_colors(&mut self, fill_colors: Vec<Argb>) -> Effect {
        self.config.fill_colors = normalize_fill_colors(fill_colors);
        self.apply(Property::FillColors)
    }

    /// An empty list makes every stroke follow its layer's fill color.
    pub fn set_stroke_colors(&mut self, stroke_colors: Vec<Argb>) -> Effect {
        self.config.stroke_colors = stroke_colors;
        self.apply(Property::StrokeColors)
    }

    // --- Everything else ---

    pub fn set_stroke_width(&mut self, stroke_width: f64) -> Effect {
        self.config.stroke_width = non_negative("stroke_width", stroke_width);
        self.apply(Property::StrokeWidth)
    }

    pub fn set_fill_alpha(&mut self, fill_alpha: Option<f32>) -> Effect {
        self.config.fill_alpha = normalize_alpha("fill_alpha", fill_alpha);
        self.apply(Property::FillAlpha)
    }

    pub fn set_stroke_alpha(&mut self, stroke_alpha: Option<f32>) -> Effect {
        self.config.stroke_alpha = normalize_alpha("stroke_alpha", stroke_alpha);
        self.apply(Property::StrokeAlpha)
    }

    /// Clamped to `[1, 140]`.
    pub fn set_frames_per_second(&mut self, frames_per_second: u32) -> Effect {
        self.config.frames_per_second = clamp_fps(frames_per_second);
        self.apply(Property::FramesPerSecond)
    }

    /// Radial step per tick in pixels; negative values become 0.
    pub fn set_frame_vertex_translation(&mut self, pixels: f64) -> Effect {
        self.config.frame_vertex_translation = non_negative("frame_vertex_translation", pixels);
        self.apply(Property::FrameVertexTranslation)
    }

    /// Rotation per tick in degrees; reduced modulo 360, negative values become 0.
    pub fn set_frame_layer_rotation(&mut self, degrees: f64) -> Effect {
        self.config.frame_layer_rotation = normalize_frame_rotation(degrees);
        self.apply(Property::FrameLayerRotation)
    }

    pub fn set_padding(&mut self, padding: Padding) -> Effect {
        self.config.padding = normalize_padding(padding);
        self.apply(Property::Padding)
    }

    pub fn set_debug(&mut self, debug: DebugOptions) -> Effect {
        self.config.debug = debug;
        self.apply(Property::Debug)
    }

    /// Replaces the whole configuration, doing only the work the changed fields require.
    ///
    /// The document is validated up front; on error the stack is left as it was.
    pub fn apply_config(&mut self, config: NebulaConfig) -> Result<Effect> {
        let config = config.normalized()?;
        let changed = self.config.diff(&config);
        let effect = changed
            .iter()
            .map(|p| p.effect())
            .max()
            .unwrap_or(Effect::Redraw);

        if effect == Effect::Rebuild {
            let layers = build_layers(&config, &mut self.rng)?;
            self.config = config;
            self.layers = layers;
        } else {
            self.config = config;
            if changed.iter().any(|p| p.effect() == Effect::Refresh) {
                self.refresh();
            }
            if changed.contains(&Property::Padding) {
                self.relayout();
            }
        }

        if changed.iter().any(|p| p.affects_measurement()) {
            self.invalidation.relayout = true;
        }
        self.invalidation.redraw = true;
        debug!(?changed, ?effect, "configuration applied");
        Ok(effect)
    }

    fn rebuild_with<F>(&mut self, property: Property, update: F) -> Result<Effect>
    where
        F: FnOnce(&mut NebulaConfig),
    {
        let mut config = self.config.clone();
        update(&mut config);
        let layers = build_layers(&config, &mut self.rng)?;
        self.config = config;
        self.layers = layers;
        Ok(self.notify(property))
    }

    fn apply(&mut self, property: Property) -> Effect {
        match property.effect() {
            Effect::Refresh => self.refresh(),
            Effect::Relayout => self.relayout(),
            Effect::Rebuild | Effect::Reschedule | Effect::Redraw => {}
        }
        self.notify(property)
    }

    fn notify(&mut self, property: Property) -> Effect {
        let effect = property.effect();
        if property.affects_measurement() {
            self.invalidation.relayout = true;
        }
        self.invalidation.redraw = true;
        debug!(%property, ?effect, "property changed");
        effect
    }

    fn refresh(&mut self) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            let (fill, stroke) = layer_colors(&self.config, index);
            layer.set_colors(fill, stroke);
        }
    }

    fn relayout(&mut self) {
        let geometry = self.geometry();
        for layer in &mut self.layers {
            layer.recenter(&geometry);
        }
    }
}

fn bounds_for(config: &NebulaConfig) -> Rect {
    let side = 2.0 * config.max_radius;
    Rect::new(
        config.padding.left,
        config.padding.top,
        config.padding.left + side,
        config.padding.top + side,
    )
}

/// Fill and optional stroke color of layer `index`.
fn layer_colors(config: &NebulaConfig, index: usize) -> (Argb, Option<Argb>) {
    let fill = cyclic(&config.fill_colors, index).unwrap_or(DEFAULT_FILL_COLOR);
    (fill, cyclic(&config.stroke_colors, index))
}

fn build_layers(config: &NebulaConfig, rng: &mut StdRng) -> Result<Vec<Layer>> {
    let geometry = LayerGeometry {
        center: bounds_for(config).center(),
        min_radius: config.effective_min_radius(),
        max_radius: config.max_radius,
        roundness: config.roundness,
    };

    let layers = (0..config.layers_count)
        .map(|index| {
            let vertex_count =
                cyclic(&config.vertices_count, index).unwrap_or(DEFAULT_VERTICES_COUNT);
            let (fill, stroke) = layer_colors(config, index);
            Layer::new(vertex_count, fill, stroke, &geometry, &mut *rng)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        layers = layers.len(),
        vertices = ?config.vertices_count,
        "layers rebuilt"
    );
    Ok(layers)
}
