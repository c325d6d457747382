//! # Property Module
//!
//! Declares, for every configurable field, what a change to it does to the stack.
//! Setters on [`LayerStack`](crate::stack::LayerStack) look their effect up here
//! instead of hard-coding it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configurable fields of a layer stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    MinRadius,
    MaxRadius,
    Roundness,
    LayersCount,
    VerticesCount,
    FillColors,
    StrokeColors,
    StrokeWidth,
    FillAlpha,
    StrokeAlpha,
    FramesPerSecond,
    FrameVertexTranslation,
    FrameLayerRotation,
    Padding,
    Debug,
}

/// What has to happen after a property changes, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Painter-only change; just redraw.
    Redraw,
    /// Only the ticker interval changes.
    Reschedule,
    /// Palette change; layers keep their geometry and phase.
    Refresh,
    /// The center moves; layers are re-centred in place.
    Relayout,
    /// All layers are discarded and rebuilt from scratch.
    Rebuild,
}

impl Property {
    pub const ALL: [Property; 15] = [
        Property::MinRadius,
        Property::MaxRadius,
        Property::Roundness,
        Property::LayersCount,
        Property::VerticesCount,
        Property::FillColors,
        Property::StrokeColors,
        Property::StrokeWidth,
        Property::FillAlpha,
        Property::StrokeAlpha,
        Property::FramesPerSecond,
        Property::FrameVertexTranslation,
        Property::FrameLayerRotation,
        Property::Padding,
        Property::Debug,
    ];

    pub fn effect(self) -> Effect {
        match self {
            Property::MinRadius
            | Property::MaxRadius
            | Property::Roundness
            | Property::LayersCount
            | Property::VerticesCount => Effect::Rebuild,
            Property::FillColors | Property::StrokeColors => Effect::Refresh,
            Property::Padding => Effect::Relayout,
            Property::FramesPerSecond => Effect::Reschedule,
            Property::StrokeWidth
            | Property::FillAlpha
            | Property::StrokeAlpha
            | Property::FrameVertexTranslation
            | Property::FrameLayerRotation
            | Property::Debug => Effect::Redraw,
        }
    }

    /// Whether the host's preferred size depends on this property.
    pub fn affects_measurement(self) -> bool {
        matches!(self, Property::MaxRadius | Property::Padding)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Property::MinRadius => "min_radius",
            Property::MaxRadius => "max_radius",
            Property::Roundness => "roundness",
            Property::LayersCount => "layers_count",
            Property::VerticesCount => "vertices_count",
            Property::FillColors => "fill_colors",
            Property::StrokeColors => "stroke_colors",
            Property::StrokeWidth => "stroke_width",
            Property::FillAlpha => "fill_alpha",
            Property::StrokeAlpha => "stroke_alpha",
            Property::FramesPerSecond => "frames_per_second",
            Property::FrameVertexTranslation => "frame_vertex_translation",
            Property::FrameLayerRotation => "frame_layer_rotation",
            Property::Padding => "padding",
            Property::Debug => "debug",
        };
        f.write_str(name)
    }
}
