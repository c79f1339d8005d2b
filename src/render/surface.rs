use crate::assets::decode::SourceImage;
use crate::foundation::core::{Affine, Canvas, Point};
use crate::geometry::affine::Triangle;
use crate::geometry::quad::Quad;
use crate::render::blend::BlendMode;

/// One clipped, transformed image blit: the unit of work of the warp renderer.
///
/// `transform` maps source-image pixel space onto surface space. It is an explicit value
/// rather than ambient surface state, so nothing carries over from one blit to the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleBlit {
    /// Destination clip triangle, in surface space.
    pub clip: Triangle,
    /// Source triangle the clip was derived from, in image pixel space.
    pub source: Triangle,
    /// Image-to-surface transform.
    pub transform: Affine,
    /// Uniform opacity in `[0, 1]`.
    pub opacity: f32,
    pub blend: BlendMode,
    /// Set when the source triangle was degenerate and `transform` fell back to identity.
    pub degenerate: bool,
}

/// Edit overlay: quad outline plus a filled marker per vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadOverlay {
    pub quad: Quad,
    /// Transform applied to the overlay geometry. The renderer always passes identity so
    /// markers are never skewed by a preceding warp.
    pub transform: Affine,
    pub handle_radius: f64,
    pub line_width: f64,
    /// Straight-alpha RGBA for the outline and idle handles.
    pub color: [u8; 4],
    /// Straight-alpha RGBA for the highlighted handle.
    pub active_color: [u8; 4],
    /// Vertex being dragged, if any.
    pub active: Option<usize>,
}

/// A 2D raster target the warp renderer draws onto.
///
/// Implementations must accept any finite input without panicking: degenerate triangles cover
/// no pixels, and geometry outside the surface is clipped.
pub trait WarpSurface {
    /// Current surface size.
    fn canvas(&self) -> Canvas;

    /// Resize the backing store. Contents after a resize are unspecified until cleared.
    fn resize(&mut self, canvas: Canvas);

    /// Overwrite every pixel with a straight-alpha RGBA color.
    fn clear(&mut self, rgba: [u8; 4]);

    /// Draw `image` through `blit.transform`, restricted to `blit.clip`.
    fn blit_triangle(&mut self, image: &SourceImage, blit: &TriangleBlit);

    /// Draw the quad outline and vertex handles.
    fn draw_overlay(&mut self, overlay: &QuadOverlay);
}

/// A draw call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear([u8; 4]),
    Triangle {
        image_width: u32,
        image_height: u32,
        blit: TriangleBlit,
    },
    Overlay(QuadOverlay),
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    canvas: Canvas,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    /// Recorded operations, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Recorded triangle blits, oldest first.
    pub fn blits(&self) -> impl Iterator<Item = &TriangleBlit> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Triangle { blit, .. } => Some(blit),
            _ => None,
        })
    }

    /// Every point a recorded blit maps an image corner to.
    ///
    /// Handy for checking where the source rectangle landed after a warp.
    pub fn mapped_image_corners(&self) -> Vec<Point> {
        let mut out = Vec::new();
        for op in &self.ops {
            let DrawOp::Triangle {
                image_width,
                image_height,
                blit,
            } = op
            else {
                continue;
            };
            let (w, h) = (f64::from(*image_width), f64::from(*image_height));
            for s in blit.source {
                let is_corner = (s.x == 0.0 || s.x == w) && (s.y == 0.0 || s.y == h);
                if is_corner {
                    out.push(blit.transform * s);
                }
            }
        }
        out
    }
}

impl WarpSurface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    fn clear(&mut self, rgba: [u8; 4]) {
        self.ops.push(DrawOp::Clear(rgba));
    }

    fn blit_triangle(&mut self, image: &SourceImage, blit: &TriangleBlit) {
        self.ops.push(DrawOp::Triangle {
            image_width: image.width,
            image_height: image.height,
            blit: *blit,
        });
    }

    fn draw_overlay(&mut self, overlay: &QuadOverlay) {
        self.ops.push(DrawOp::Overlay(*overlay));
    }
}
