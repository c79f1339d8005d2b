use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{QuadfitError, QuadfitResult};

/// A decoded bitmap ready to be warped.
///
/// Pixels are premultiplied RGBA8, row-major, tightly packed. The buffer is shared, so cloning a
/// `SourceImage` is cheap.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap an already-premultiplied RGBA8 buffer.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> QuadfitResult<Self> {
        let expected = Canvas::new(width, height).rgba8_len();
        if data.len() != expected {
            return Err(QuadfitError::decode(format!(
                "rgba8 buffer for {width}x{height} must be {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Premultiply and wrap a straight-alpha RGBA8 buffer.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> QuadfitResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// A `width x height` image filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let data = px.repeat((width as usize).saturating_mul(height as usize));
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    /// Image dimensions as a canvas.
    pub fn size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Return `true` for a zero-sized bitmap (nothing to draw).
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let d = &self.rgba8_premul[idx..idx + 4];
        Some([d[0], d[1], d[2], d[3]])
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> QuadfitResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> QuadfitResult<SourceImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let img = decode_image(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = img.width,
        height = img.height,
        "decoded source image"
    );
    Ok(img)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
