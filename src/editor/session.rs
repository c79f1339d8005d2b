use crate::assets::decode::SourceImage;
use crate::config::FitConfig;
use crate::editor::controller::{EditorOpts, QuadEditor};
use crate::editor::pointer::PointerEvent;
use crate::foundation::core::Canvas;
use crate::geometry::quad::Quad;
use crate::render::blend::BlendMode;
use crate::render::surface::WarpSurface;
use crate::render::warp::{WarpConfig, render_handles, render_warp};

/// When a mutation turns into pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedrawPolicy {
    /// Redraw at the end of every mutating call.
    #[default]
    Immediate,
    /// Mark the session dirty; [`FitSession::flush`] draws once (e.g. per animation frame).
    Coalesced,
}

/// An editor wired to a surface and the images it composites.
///
/// The garment is absent until the host finishes decoding it. Until then pointer events are
/// dropped and resizes only update sizes.
#[derive(Debug)]
pub struct FitSession<S> {
    editor: QuadEditor,
    surface: S,
    garment: Option<SourceImage>,
    backdrop: Option<SourceImage>,
    policy: RedrawPolicy,
    clear_color: [u8; 4],
    dirty: bool,
    frames: u64,
}

impl<S: WarpSurface> FitSession<S> {
    /// Wrap `surface`; the editor picks up the surface's current size.
    pub fn new(surface: S, opts: EditorOpts) -> Self {
        let mut editor = QuadEditor::new(opts);
        editor.resize(surface.canvas());
        Self {
            editor,
            surface,
            garment: None,
            backdrop: None,
            policy: RedrawPolicy::default(),
            clear_color: [0, 0, 0, 0],
            dirty: false,
            frames: 0,
        }
    }

    pub fn with_policy(mut self, policy: RedrawPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Straight-alpha color the surface is cleared to before each frame.
    pub fn with_clear_color(mut self, rgba: [u8; 4]) -> Self {
        self.clear_color = rgba;
        self
    }

    pub fn editor(&self) -> &QuadEditor {
        &self.editor
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn quad(&self) -> Quad {
        self.editor.quad()
    }

    pub fn is_loaded(&self) -> bool {
        self.garment.is_some()
    }

    /// Pending changes not yet drawn.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Frames drawn so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Install the decoded garment image and draw it.
    pub fn load_garment(&mut self, image: SourceImage) {
        tracing::debug!(width = image.width, height = image.height, "garment loaded");
        self.garment = Some(image);
        self.request_redraw();
    }

    /// Set or clear the photo drawn underneath the garment, stretched over the whole surface.
    pub fn set_backdrop(&mut self, image: Option<SourceImage>) {
        self.backdrop = image;
        self.request_redraw();
    }

    /// Feed one pointer event. Returns `true` when it changed what is on screen.
    pub fn on_pointer(&mut self, ev: &PointerEvent) -> bool {
        if self.garment.is_none() {
            return false;
        }
        let changed = self.editor.handle(ev);
        if changed {
            self.request_redraw();
        }
        changed
    }

    /// The host container changed size.
    pub fn on_resize(&mut self, canvas: Canvas) {
        self.surface.resize(canvas);
        self.editor.resize(canvas);
        self.request_redraw();
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.editor.set_opacity(opacity);
        self.request_redraw();
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.editor.set_blend_mode(blend);
        self.request_redraw();
    }

    pub fn set_subdivisions(&mut self, subdivisions: u32) {
        self.editor.set_subdivisions(subdivisions);
        self.request_redraw();
    }

    pub fn set_show_handles(&mut self, show: bool) {
        self.editor.set_show_handles(show);
        self.request_redraw();
    }

    /// Resize the garment about its center. Returns `true` when the quad changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        let changed = self.editor.set_scale(scale);
        if changed {
            self.request_redraw();
        }
        changed
    }

    /// Rotate the garment about its center, in degrees. Returns `true` when the quad changed.
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        let changed = self.editor.set_rotation(degrees);
        if changed {
            self.request_redraw();
        }
        changed
    }

    pub fn set_quad(&mut self, quad: Quad) {
        self.editor.set_quad(quad);
        self.request_redraw();
    }

    /// Apply every setting a fit names.
    pub fn apply_fit(&mut self, fit: &FitConfig) {
        fit.apply(&mut self.editor);
        self.request_redraw();
    }

    pub fn reset(&mut self) {
        self.editor.reset();
        self.request_redraw();
    }

    /// Draw pending changes. Returns `true` when a frame was drawn.
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        if self.redraw() {
            self.dirty = false;
            return true;
        }
        false
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
        if self.policy == RedrawPolicy::Immediate {
            self.flush();
        }
    }

    /// Clear, backdrop, garment, then handles. Stays dirty while there is nothing to draw.
    fn redraw(&mut self) -> bool {
        let Some(garment) = &self.garment else {
            return false;
        };
        let canvas = self.surface.canvas();
        if canvas.is_empty() {
            return false;
        }

        self.surface.clear(self.clear_color);
        if let Some(backdrop) = &self.backdrop {
            let full = Quad::from_rect(canvas.bounds());
            render_warp(&mut self.surface, backdrop, &full, &WarpConfig::fast());
        }

        let config = *self.editor.config();
        render_warp(&mut self.surface, garment, &self.editor.quad(), &config.warp);
        if config.show_handles {
            render_handles(
                &mut self.surface,
                &self.editor.quad(),
                &self.editor.handle_style(),
                self.editor.active_vertex(),
            );
        }
        self.frames += 1;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
