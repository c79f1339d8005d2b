use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::editor::controller::QuadEditor;
use crate::foundation::error::{QuadfitError, QuadfitResult};
use crate::geometry::quad::Quad;
use crate::render::blend::BlendMode;

/// Upper bound accepted for `subdivisions` in a fit file.
pub const MAX_SUBDIVISIONS: u32 = 256;

/// JSON description of a fit: an optional quad plus optional editor settings.
///
/// Absent fields leave the editor's current value alone, so a file holding only
/// `{"blend": "multiply"}` is valid.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quad: Option<Quad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend: Option<BlendMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdivisions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_handles: Option<bool>,
}

impl FitConfig {
    /// Parse and validate a fit from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> QuadfitResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| QuadfitError::serde(format!("parse fit JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a fit from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> QuadfitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            QuadfitError::validation(format!("open fit JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Snapshot every setting of `editor`.
    pub fn from_editor(editor: &QuadEditor) -> Self {
        let cfg = editor.config();
        Self {
            quad: Some(editor.quad()),
            opacity: Some(cfg.warp.opacity),
            blend: Some(cfg.warp.blend),
            subdivisions: Some(cfg.warp.subdivisions),
            show_handles: Some(cfg.show_handles),
        }
    }

    pub fn validate(&self) -> QuadfitResult<()> {
        if let Some(q) = &self.quad
            && q.points().iter().any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(QuadfitError::validation("quad coordinates must be finite"));
        }
        if let Some(o) = self.opacity
            && !(0.0..=1.0).contains(&o)
        {
            return Err(QuadfitError::validation(format!(
                "opacity must be in [0, 1], got {o}"
            )));
        }
        if let Some(n) = self.subdivisions
            && !(1..=MAX_SUBDIVISIONS).contains(&n)
        {
            return Err(QuadfitError::validation(format!(
                "subdivisions must be in 1..={MAX_SUBDIVISIONS}, got {n}"
            )));
        }
        Ok(())
    }

    /// Overwrite the editor settings this fit names.
    pub fn apply(&self, editor: &mut QuadEditor) {
        if let Some(q) = self.quad {
            editor.set_quad(q);
        }
        if let Some(o) = self.opacity {
            editor.set_opacity(o);
        }
        if let Some(b) = self.blend {
            editor.set_blend_mode(b);
        }
        if let Some(n) = self.subdivisions {
            editor.set_subdivisions(n);
        }
        if let Some(show) = self.show_handles {
            editor.set_show_handles(show);
        }
    }

    /// Fields set in `other` win.
    pub fn merged(self, other: Self) -> Self {
        Self {
            quad: other.quad.or(self.quad),
            opacity: other.opacity.or(self.opacity),
            blend: other.blend.or(self.blend),
            subdivisions: other.subdivisions.or(self.subdivisions),
            show_handles: other.show_handles.or(self.show_handles),
        }
    }

    pub fn to_json_pretty(&self) -> QuadfitResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QuadfitError::serde(format!("serialize fit JSON: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
