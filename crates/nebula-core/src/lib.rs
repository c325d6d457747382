//! # Nebula Core
//!
//! `nebula-core` is the procedural geometry and animation engine behind Nebula's
//! layered blob backgrounds.
//!
//! Each layer is a ring of vertices on a fixed polar grid: every vertex keeps its
//! angle for life while its radius pulses between two bounds. Smooth cubic handles are
//! derived from neighboring vertices each frame, and the layer as a whole slowly rotates.
//!
//! ## Core Features
//!
//! *   **Frame Driven**: [`LayerStack::advance`] moves everything by exactly one frame;
//!     no real time is involved, so animations are reproducible tick by tick.
//! *   **Explicit Configuration**: one setter per property, each returning the
//!     [`Effect`] it had (rebuild, refresh, relayout, reschedule or redraw).
//! *   **Painter Agnostic**: [`LayerStack::frame`] yields `kurbo` paths plus resolved
//!     colors; see `nebula-skia` for a Skia painter.
//!
//! ## Usage
//!
//! ```rust
//! use nebula_core::{FixedTicks, LayerStack, NebulaConfig, Ticker};
//!
//! let mut stack = LayerStack::with_seed(NebulaConfig::default(), 42)?;
//! let ticks = Ticker::new(FixedTicks::new(10)).run(&mut stack, |stack| {
//!     let frame = stack.frame();
//!     assert_eq!(frame.layers.len(), 3);
//! });
//! assert_eq!(ticks, 10);
//! # Ok::<(), nebula_core::NebulaError>(())
//! ```

/// ARGB32 colors, palette lookup and alpha resolution.
pub mod color;

/// The serializable configuration document.
pub mod config;

/// Diagnostic geometry snapshots.
pub mod debug;

pub mod errors;

/// Render output handed to painters.
pub mod frame;

/// A single animated blob.
pub mod layer;

/// Host size negotiation.
pub mod measure;

/// Per-property change effects.
pub mod property;

/// The circular vertex topology.
pub mod ring;

/// The engine root.
pub mod stack;

/// Frame scheduling.
pub mod ticker;

/// Per-vertex state.
pub mod vertex;

pub use color::{parse_color_list, Argb};
pub use config::{parse_vertex_counts, DebugOptions, NebulaConfig, Padding};
pub use debug::{DebugOverlay, LayerOverlay};
pub use errors::NebulaError;
pub use frame::{Frame, LayerPaint, StrokePaint};
pub use layer::{Layer, LayerGeometry, Motion};
pub use measure::MeasureSpec;
pub use property::{Effect, Property};
pub use ring::VertexRing;
pub use stack::{Invalidation, LayerStack};
pub use ticker::{
    frame_interval, CancelHandle, FixedTicks, FrameClock, Scheduler, SleepScheduler, Ticker,
};
pub use vertex::{Direction, Vertex, VertexAttributes};
