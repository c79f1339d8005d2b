use crate::foundation::math::{add_sat_u8, mul_div255_u8, opacity_u8, unit_to_u8};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Compositing operator used when drawing the warped image over existing surface content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Porter-Duff source-over.
    #[default]
    Normal,
    Multiply,
    Overlay,
    SoftLight,
}

impl BlendMode {
    /// All supported modes.
    pub const ALL: [BlendMode; 4] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Overlay,
        BlendMode::SoftLight,
    ];

    /// The canvas-style composite operator name for this mode.
    pub fn operator_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "source-over",
            BlendMode::Multiply => "multiply",
            BlendMode::Overlay => "overlay",
            BlendMode::SoftLight => "soft-light",
        }
    }
}

/// Integer premultiplied source-over with a uniform opacity.
#[inline]
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    over_u8(dst, src, opacity_u8(opacity))
}

/// [`over`] with a pre-quantized 0..=255 opacity, for inner loops.
#[inline]
pub(crate) fn over_u8(dst: PremulRgba8, src: PremulRgba8, op: u16) -> PremulRgba8 {
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over with a separable blend function applied to unpremultiplied channels.
///
/// `out_a = sa + da * (1 - sa)`
/// `out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da`
#[inline(always)]
pub(crate) fn blend_over<F>(dst: PremulRgba8, src: PremulRgba8, opacity: f32, blend_fn: F) -> PremulRgba8
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let sa = (f32::from(src[3]) / 255.0) * opacity;
    let da = f32::from(dst[3]) / 255.0;
    let inv_sa = 1.0 - sa;

    let mut out = [0u8; 4];
    for c in 0..3 {
        let sp = (f32::from(src[c]) / 255.0) * opacity;
        let dp = f32::from(dst[c]) / 255.0;
        let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
        let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
        let b = blend_fn(sc, dc).clamp(0.0, 1.0);
        out[c] = unit_to_u8((sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0));
    }
    out[3] = unit_to_u8((sa + da * inv_sa).clamp(0.0, 1.0));
    out
}

#[inline]
pub(crate) fn multiply(s: f32, d: f32) -> f32 {
    s * d
}

#[inline]
pub(crate) fn overlay(s: f32, d: f32) -> f32 {
    if d <= 0.5 {
        2.0 * s * d
    } else {
        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
    }
}

#[inline]
pub(crate) fn soft_light(s: f32, d: f32) -> f32 {
    if s <= 0.5 {
        d - (1.0 - 2.0 * s) * d * (1.0 - d)
    } else {
        let g = if d <= 0.25 {
            ((16.0 * d - 12.0) * d + 4.0) * d
        } else {
            d.sqrt()
        };
        d + (2.0 * s - 1.0) * (g - d)
    }
}

/// Composite one pixel with the given mode. Dispatches per call; hot loops should pick the
/// kernel once per blit instead.
pub fn composite(dst: PremulRgba8, src: PremulRgba8, opacity: f32, mode: BlendMode) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => over(dst, src, opacity),
        BlendMode::Multiply => blend_over(dst, src, opacity, multiply),
        BlendMode::Overlay => blend_over(dst, src, opacity, overlay),
        BlendMode::SoftLight => blend_over(dst, src, opacity, soft_light),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
