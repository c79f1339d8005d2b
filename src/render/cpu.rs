use std::path::Path;

use anyhow::Context as _;
use kurbo::Shape as _;

use crate::assets::decode::SourceImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8Premul};
use crate::foundation::error::QuadfitResult;
use crate::foundation::math::{add_sat_u8, mul_div255_u8, opacity_u8};
use crate::geometry::affine::{Triangle, signed_area2};
use crate::render::blend::{
    self, BlendMode, PremulRgba8, blend_over, multiply, over_u8, soft_light,
};
use crate::render::surface::{QuadOverlay, TriangleBlit, WarpSurface};

/// CPU raster surface: premultiplied RGBA8, row-major, tightly packed.
///
/// Triangle blits sample pixel centers, so two triangles sharing an edge never both touch a
/// pixel and never leave a gap between them. Source pixels are fetched nearest-neighbour
/// through the inverse blit transform.
#[derive(Clone, Debug, PartialEq)]
pub struct CpuSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CpuSurface {
    /// A transparent surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba8_len()],
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`; transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Plain unscaled draw of `image` with its top-left corner at `origin` (rounded to pixels).
    pub fn draw_image_at(&mut self, image: &SourceImage, origin: Point, opacity: f32, mode: BlendMode) {
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return;
        }
        let ox = origin.x.round() as i64;
        let oy = origin.y.round() as i64;
        for sy in 0..i64::from(image.height) {
            let dy = oy + sy;
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            for sx in 0..i64::from(image.width) {
                let dx = ox + sx;
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let Some(src) = image.pixel(sx, sy) else {
                    continue;
                };
                let idx = ((dy as usize) * (self.width as usize) + (dx as usize)) * 4;
                let dst = [
                    self.data[idx],
                    self.data[idx + 1],
                    self.data[idx + 2],
                    self.data[idx + 3],
                ];
                self.data[idx..idx + 4].copy_from_slice(&blend::composite(dst, src, opacity, mode));
            }
        }
    }

    /// Straight-alpha copy of the surface.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        image::RgbaImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Write the surface as a straight-alpha PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> QuadfitResult<()> {
        let path = path.as_ref();
        let img = self.to_rgba_image();
        image::save_buffer_with_format(
            path,
            img.as_raw(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    #[inline(always)]
    fn blit_with<F>(&mut self, image: &SourceImage, blit: &TriangleBlit, kernel: F)
    where
        F: Fn(PremulRgba8, PremulRgba8) -> PremulRgba8,
    {
        let Some(raster) = TriangleRaster::new(&blit.clip) else {
            return;
        };
        let Some(inv) = invert(blit.transform) else {
            return;
        };
        let Some((x0, x1, y0, y1)) = raster.pixel_span(self.width, self.height) else {
            return;
        };

        let stride = self.width as usize;
        for y in y0..=y1 {
            let py = f64::from(y) + 0.5;
            for x in x0..=x1 {
                let p = Point::new(f64::from(x) + 0.5, py);
                if !raster.covers(p) {
                    continue;
                }
                let s = inv * p;
                let Some(src) = image.pixel(s.x.floor() as i64, s.y.floor() as i64) else {
                    continue;
                };
                let idx = ((y as usize) * stride + (x as usize)) * 4;
                let dst = [
                    self.data[idx],
                    self.data[idx + 1],
                    self.data[idx + 2],
                    self.data[idx + 3],
                ];
                self.data[idx..idx + 4].copy_from_slice(&kernel(dst, src));
            }
        }
    }
}

impl WarpSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    fn resize(&mut self, canvas: Canvas) {
        if canvas == self.canvas() {
            return;
        }
        self.width = canvas.width;
        self.height = canvas.height;
        self.data.clear();
        self.data.resize(canvas.rgba8_len(), 0);
    }

    fn clear(&mut self, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        let px = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    fn blit_triangle(&mut self, image: &SourceImage, blit: &TriangleBlit) {
        let opacity = blit.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || image.is_empty() {
            return;
        }
        // Blend dispatch happens once per blit; each arm monomorphizes its own inner loop.
        match blit.blend {
            BlendMode::Normal => {
                let op = opacity_u8(opacity);
                self.blit_with(image, blit, |d, s| over_u8(d, s, op));
            }
            BlendMode::Multiply => {
                self.blit_with(image, blit, |d, s| blend_over(d, s, opacity, multiply));
            }
            BlendMode::Overlay => {
                self.blit_with(image, blit, |d, s| blend_over(d, s, opacity, blend::overlay));
            }
            BlendMode::SoftLight => {
                self.blit_with(image, blit, |d, s| blend_over(d, s, opacity, soft_light));
            }
        }
    }

    fn draw_overlay(&mut self, overlay: &QuadOverlay) {
        let (Ok(w), Ok(h)) = (u16::try_from(self.width), u16::try_from(self.height)) else {
            tracing::warn!(
                width = self.width,
                height = self.height,
                "surface exceeds u16; skipping handle overlay"
            );
            return;
        };
        if w == 0 || h == 0 {
            return;
        }

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(affine_to_cpu(overlay.transform));

        let points = overlay.quad.points();
        let mut outline = BezPath::new();
        outline.move_to(points[0]);
        for p in &points[1..] {
            outline.line_to(*p);
        }
        outline.close_path();

        ctx.set_paint(color_to_cpu(overlay.color));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(overlay.line_width.max(0.0)));
        ctx.stroke_path(&bezpath_to_cpu(&outline));

        for (i, p) in points.iter().enumerate() {
            let color = if overlay.active == Some(i) {
                overlay.active_color
            } else {
                overlay.color
            };
            let marker = kurbo::Circle::new(*p, overlay.handle_radius.max(0.0)).to_path(0.1);
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_path(&bezpath_to_cpu(&marker));
        }

        ctx.flush();
        let mut scratch = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut scratch);
        premul_over_in_place(&mut self.data, scratch.data_as_u8_slice());
    }
}

/// Pixel-center coverage test for one triangle.
struct TriangleRaster {
    v: Triangle,
}

impl TriangleRaster {
    /// `None` for zero-area or non-finite triangles, which cover no pixels.
    fn new(t: &Triangle) -> Option<Self> {
        if t.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        let area2 = signed_area2(t);
        if area2 == 0.0 || !area2.is_finite() {
            return None;
        }
        let v = if area2 > 0.0 { *t } else { [t[0], t[2], t[1]] };
        Some(Self { v })
    }

    /// Inclusive pixel range whose centers can fall inside the triangle, clipped to the surface.
    fn pixel_span(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let min_x = self.v.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = self.v.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = self.v.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = self.v.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let span = |lo: f64, hi: f64, len: u32| -> Option<(u32, u32)> {
            let first = (lo - 0.5).ceil().max(0.0);
            let last = (hi - 0.5).floor().min(f64::from(len) - 1.0);
            if first > last {
                return None;
            }
            Some((first as u32, last as u32))
        };
        let (x0, x1) = span(min_x, max_x, width)?;
        let (y0, y1) = span(min_y, max_y, height)?;
        Some((x0, x1, y0, y1))
    }

    fn covers(&self, p: Point) -> bool {
        let [a, b, c] = self.v;
        covers_edge(a, b, p) && covers_edge(b, c, p) && covers_edge(c, a, p)
    }
}

/// Inside test against the directed edge `a -> b` of a positively wound triangle.
///
/// Points exactly on the edge belong to the triangle only when the edge points down (or left,
/// when horizontal). A shared edge is walked in opposite directions by its two triangles, so
/// exactly one of them claims such points.
#[inline]
fn covers_edge(a: Point, b: Point, p: Point) -> bool {
    let e = edge_fn(a, b, p);
    if e != 0.0 {
        return e > 0.0;
    }
    let dy = b.y - a.y;
    dy > 0.0 || (dy == 0.0 && b.x - a.x < 0.0)
}

/// Edge function evaluated with the endpoints in a canonical order, so `edge_fn(a, b, p)` is
/// exactly `-edge_fn(b, a, p)` in floating point.
#[inline]
fn edge_fn(a: Point, b: Point, p: Point) -> f64 {
    let raw = |a: Point, b: Point| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if (a.x, a.y) <= (b.x, b.y) {
        raw(a, b)
    } else {
        -raw(b, a)
    }
}

fn invert(a: Affine) -> Option<Affine> {
    let det = a.determinant();
    if !det.is_finite() || det.abs() < f64::EPSILON {
        return None;
    }
    let inv = a.inverse();
    inv.as_coeffs().iter().all(|c| c.is_finite()).then_some(inv)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn color_to_cpu(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = rgba;
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(s[3], mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in 0..3 {
            px[c] = ((u32::from(px[c]) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
