use kurbo::{BezPath, Line, PathEl};
use nebula_core::debug::{
    ANCHOR_RAY_COLOR, BOUNDS_COLOR, CONTROL_POINT1_COLOR, CONTROL_POINT2_COLOR,
    CONTROL_POINT_MARKER_RADIUS, OVERLAY_STROKE_WIDTH, RADIUS_COLOR, SLICE_COLOR,
    VERTEX_MARKER_RADIUS,
};
use nebula_core::{Argb, DebugOverlay, Frame, LayerPaint};
use skia_safe::{Canvas, ClipOp, Color, EncodedImageFormat, Paint, PaintStyle, Path, Point, Rect, Surface};
use std::path::Path as FsPath;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create surface")]
    SurfaceFailure,
    #[error("Failed to encode image")]
    EncodeFailure,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

pub struct SkiaRenderer;

impl SkiaRenderer {
    /// Paints `frame` onto `canvas` in frame coordinates. Layers are drawn in stack
    /// order, each rotated about the shared center and clipped to `frame.clip`.
    pub fn draw(canvas: &Canvas, frame: &Frame) {
        let center = to_skia_point(frame.center);

        canvas.save();
        canvas.clip_rect(to_skia_rect(frame.clip), ClipOp::Intersect, true);
        for layer in &frame.layers {
            canvas.save();
            canvas.rotate(sanitize(layer.rotation_degrees as f32), Some(center));
            draw_layer(canvas, layer);
            canvas.restore();
        }
        canvas.restore();

        if let Some(overlay) = &frame.debug {
            draw_debug(canvas, overlay);
        }
    }
}

/// Renders `frame` into a transparent raster surface of the frame's size.
#[instrument(level = "debug", skip_all, fields(layers = frame.layers.len()))]
pub fn render_surface(frame: &Frame) -> Result<Surface> {
    let width = frame.size.width.ceil().max(1.0) as i32;
    let height = frame.size.height.ceil().max(1.0) as i32;
    let mut surface = skia_safe::surfaces::raster_n32_premul((width, height))
        .ok_or(RenderError::SurfaceFailure)?;

    let canvas = surface.canvas();
    canvas.clear(Color::TRANSPARENT);
    SkiaRenderer::draw(canvas, frame);
    debug!(width, height, "frame rendered");
    Ok(surface)
}

/// Renders `frame` and encodes it as PNG.
pub fn render_png(frame: &Frame) -> Result<Vec<u8>> {
    let mut surface = render_surface(frame)?;
    let image = surface.image_snapshot();
    // No GPU context: the surface is raster.
    let data = image
        .encode(None, EncodedImageFormat::PNG, 100)
        .ok_or(RenderError::EncodeFailure)?;
    Ok(data.as_bytes().to_vec())
}

pub fn write_png(frame: &Frame, path: impl AsRef<FsPath>) -> Result<()> {
    let bytes = render_png(frame)?;
    std::fs::write(path.as_ref(), bytes)?;
    debug!(path = %path.as_ref().display(), "frame written");
    Ok(())
}

fn draw_layer(canvas: &Canvas, layer: &LayerPaint) {
    if layer.fill.is_none() && layer.stroke.is_none() {
        return;
    }
    let path = kurbo_to_skia_path(&layer.path);

    if let Some(fill) = layer.fill {
        canvas.draw_path(&path, &fill_paint(fill));
    }
    if let Some(stroke) = layer.stroke {
        canvas.draw_path(&path, &stroke_paint(stroke.color, stroke.width));
    }
}

fn draw_debug(canvas: &Canvas, overlay: &DebugOverlay) {
    let options = overlay.options;
    let center = to_skia_point(overlay.center);

    if options.bounds {
        canvas.draw_rect(to_skia_rect(overlay.bounds), &overlay_paint(BOUNDS_COLOR));
    }

    let radius_paint = overlay_paint(RADIUS_COLOR);
    if options.min_radius {
        canvas.draw_circle(center, sanitize(overlay.min_radius as f32), &radius_paint);
    }
    if options.max_radius {
        canvas.draw_circle(center, sanitize(overlay.max_radius as f32), &radius_paint);
    }

    let slice_paint = overlay_paint(SLICE_COLOR);
    let anchor_paint = overlay_paint(ANCHOR_RAY_COLOR);
    let cp1_paint = overlay_paint(CONTROL_POINT1_COLOR);
    let cp2_paint = overlay_paint(CONTROL_POINT2_COLOR);

    for layer in &overlay.layers {
        if options.slices {
            for ray in &layer.slice_rays {
                draw_line(canvas, ray, &slice_paint);
            }
        }

        canvas.save();
        canvas.rotate(sanitize(layer.rotation_degrees as f32), Some(center));

        if options.vertices {
            let vertex_paint = fill_paint(layer.fill_color);
            for vertex in &layer.vertices {
                canvas.draw_circle(
                    to_skia_point(*vertex),
                    VERTEX_MARKER_RADIUS as f32,
                    &vertex_paint,
                );
            }
        }

        if options.vertex_paths {
            for ray in &layer.anchor_rays {
                draw_line(canvas, ray, &anchor_paint);
            }
        }

        if options.control_points {
            let radius = CONTROL_POINT_MARKER_RADIUS as f32;
            for (cp1, cp2) in &layer.control_points {
                canvas.draw_circle(to_skia_point(*cp1), radius, &cp1_paint);
                canvas.draw_circle(to_skia_point(*cp2), radius, &cp2_paint);
            }
        }

        canvas.restore();
    }
}

fn draw_line(canvas: &Canvas, line: &Line, paint: &Paint) {
    canvas.draw_line(to_skia_point(line.p0), to_skia_point(line.p1), paint);
}

fn fill_paint(color: Argb) -> Paint {
    let mut paint = Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(PaintStyle::Fill);
    paint.set_color(to_skia_color(color));
    paint
}

fn stroke_paint(color: Argb, width: f64) -> Paint {
    let mut paint = Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(PaintStyle::Stroke);
    paint.set_stroke_width(sanitize(width as f32));
    paint.set_color(to_skia_color(color));
    paint
}

fn overlay_paint(color: Argb) -> Paint {
    stroke_paint(color, OVERLAY_STROKE_WIDTH)
}

pub fn to_skia_color(color: Argb) -> Color {
    Color::new(color.0)
}

fn to_skia_rect(r: kurbo::Rect) -> Rect {
    Rect::new(
        sanitize(r.x0 as f32),
        sanitize(r.y0 as f32),
        sanitize(r.x1 as f32),
        sanitize(r.y1 as f32),
    )
}

fn to_skia_point(p: kurbo::Point) -> Point {
    Point::new(sanitize(p.x as f32), sanitize(p.y as f32))
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

pub fn kurbo_to_skia_path(bez_path: &BezPath) -> Path {
    let mut path = Path::new();
    for el in bez_path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                path.move_to(to_skia_point(*p));
            }
            PathEl::LineTo(p) => {
                path.line_to(to_skia_point(*p));
            }
            PathEl::QuadTo(p1, p2) => {
                path.quad_to(to_skia_point(*p1), to_skia_point(*p2));
            }
            PathEl::CurveTo(p1, p2, p3) => {
                path.cubic_to(to_skia_point(*p1), to_skia_point(*p2), to_skia_point(*p3));
            }
            PathEl::ClosePath => {
                path.close();
            }
        }
    }
    path
}
