//! Piecewise-affine quad warp.
//!
//! The source rectangle is cut into an `n x n` grid. Each cell's corners are mapped onto the
//! destination quad by bilinear interpolation, the cell is split into two triangles, and each
//! triangle is drawn with the affine transform that carries its source vertices onto its
//! destination vertices. `n = 1` is the two-triangle fast path; larger `n` approximates a
//! projective warp more closely at `2n²` blits.

use crate::assets::decode::SourceImage;
use crate::foundation::core::{Affine, Point};
use crate::geometry::affine::{Triangle, try_affine_from_triangles};
use crate::geometry::quad::Quad;
use crate::render::blend::BlendMode;
use crate::render::surface::{QuadOverlay, TriangleBlit, WarpSurface};

/// Default grid density of the smooth warp.
pub const DEFAULT_SUBDIVISIONS: u32 = 6;

/// Per-call warp parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Uniform opacity, clamped to `[0, 1]` when drawing.
    pub opacity: f32,
    pub blend: BlendMode,
    /// Grid density per axis; `0` is treated as `1`.
    pub subdivisions: u32,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend: BlendMode::Normal,
            subdivisions: DEFAULT_SUBDIVISIONS,
        }
    }
}

impl WarpConfig {
    /// Two triangles for the whole quad.
    pub fn fast() -> Self {
        Self {
            subdivisions: 1,
            ..Self::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_subdivisions(mut self, subdivisions: u32) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Effective grid density (at least 1).
    pub fn grid(&self) -> u32 {
        self.subdivisions.max(1)
    }

    /// Opacity clamped to `[0, 1]`; non-finite values draw nothing.
    pub fn effective_opacity(&self) -> f32 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Counters from one [`render_warp`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarpStats {
    pub triangles: usize,
    /// Triangles whose source was degenerate and were drawn with the identity transform.
    pub degenerate: usize,
}

/// Plan the blits that warp an `image_width x image_height` image onto `quad`.
///
/// Pure: no surface involved. Returns nothing for a zero-sized image.
pub fn plan_warp(image_width: u32, image_height: u32, quad: &Quad, config: &WarpConfig) -> Vec<TriangleBlit> {
    if image_width == 0 || image_height == 0 {
        return Vec::new();
    }

    let w = f64::from(image_width);
    let h = f64::from(image_height);
    let n = config.grid();
    let nf = f64::from(n);
    let opacity = config.effective_opacity();

    let mut out = Vec::with_capacity((n as usize) * (n as usize) * 2);
    let mut push = |source: Triangle, clip: Triangle| {
        let solved = try_affine_from_triangles(&source, &clip);
        out.push(TriangleBlit {
            clip,
            source,
            transform: solved.unwrap_or(Affine::IDENTITY),
            opacity,
            blend: config.blend,
            degenerate: solved.is_none(),
        });
    };

    for row in 0..n {
        for col in 0..n {
            let u0 = f64::from(col) / nf;
            let u1 = f64::from(col + 1) / nf;
            let v0 = f64::from(row) / nf;
            let v1 = f64::from(row + 1) / nf;

            let src_tl = Point::new(u0 * w, v0 * h);
            let src_tr = Point::new(u1 * w, v0 * h);
            let src_br = Point::new(u1 * w, v1 * h);
            let src_bl = Point::new(u0 * w, v1 * h);

            let dst_tl = quad.bilinear(u0, v0);
            let dst_tr = quad.bilinear(u1, v0);
            let dst_br = quad.bilinear(u1, v1);
            let dst_bl = quad.bilinear(u0, v1);

            push([src_tl, src_tr, src_br], [dst_tl, dst_tr, dst_br]);
            push([src_tl, src_br, src_bl], [dst_tl, dst_br, dst_bl]);
        }
    }
    out
}

/// Warp `image` onto `quad` on `surface`.
///
/// Only pixels inside the quad are touched; clearing previous frames is the caller's job.
/// Skips drawing entirely when either the surface or the image is empty.
#[tracing::instrument(level = "trace", skip(surface, image), fields(image_w = image.width, image_h = image.height))]
pub fn render_warp<S: WarpSurface + ?Sized>(
    surface: &mut S,
    image: &SourceImage,
    quad: &Quad,
    config: &WarpConfig,
) -> WarpStats {
    if surface.canvas().is_empty() || image.is_empty() {
        return WarpStats::default();
    }

    let mut stats = WarpStats::default();
    for blit in plan_warp(image.width, image.height, quad, config) {
        surface.blit_triangle(image, &blit);
        stats.triangles += 1;
        stats.degenerate += usize::from(blit.degenerate);
    }
    if stats.degenerate > 0 {
        tracing::debug!(degenerate = stats.degenerate, "degenerate warp triangles drawn with identity");
    }
    stats
}

/// Look of the edit overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleStyle {
    pub handle_radius: f64,
    pub line_width: f64,
    pub color: [u8; 4],
    pub active_color: [u8; 4],
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            handle_radius: 8.0,
            line_width: 2.0,
            color: [255, 255, 255, 230],
            active_color: [56, 132, 255, 255],
        }
    }
}

/// Draw the quad outline and a marker per vertex, in untransformed surface space.
pub fn render_handles<S: WarpSurface + ?Sized>(
    surface: &mut S,
    quad: &Quad,
    style: &HandleStyle,
    active: Option<usize>,
) {
    if surface.canvas().is_empty() {
        return;
    }
    surface.draw_overlay(&QuadOverlay {
        quad: *quad,
        transform: Affine::IDENTITY,
        handle_radius: style.handle_radius,
        line_width: style.line_width,
        color: style.color,
        active_color: style.active_color,
        active,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/warp.rs"]
mod tests;
