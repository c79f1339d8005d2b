//! Pointer-driven quad editing.
//!
//! [`QuadEditor`] owns the current [`Quad`] and turns raw pointer input into one of three
//! gestures: idle, moving the whole quad, or dragging a single vertex. It never touches
//! pixels; every handler returns whether the visible state changed so the caller can redraw.

use crate::editor::pointer::{PointerEvent, PointerKind};
use crate::foundation::core::{Canvas, Point};
use crate::geometry::quad::Quad;
use crate::render::blend::BlendMode;
use crate::render::warp::{HandleStyle, WarpConfig};

/// Opacity restored by [`QuadEditor::reset`].
pub const DEFAULT_OPACITY: f32 = 0.8;
/// Hit-test tolerance around each vertex, in pixels.
pub const DEFAULT_PICK_RADIUS: f64 = 14.0;
/// Radius of the drawn vertex markers, in pixels.
pub const DEFAULT_HANDLE_RADIUS: f64 = 8.0;
/// Smallest garment size relative to the last reset.
pub const MIN_SCALE: f64 = 0.4;
/// Largest garment size relative to the last reset.
pub const MAX_SCALE: f64 = 2.0;
/// Rotation limit either way, in degrees.
pub const MAX_ROTATION_DEG: f64 = 35.0;

/// Active gesture, tracked from pointer-down to pointer-up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The whole quad follows the pointer.
    MoveWhole {
        /// Pointer that started the gesture.
        pointer_id: u64,
        /// Pointer position at pointer-down.
        anchor: Point,
        /// Quad at pointer-down; every move is computed from it, not from the previous move.
        snapshot: Quad,
    },
    /// One vertex follows the pointer.
    DragVertex {
        /// Pointer that started the gesture.
        pointer_id: u64,
        /// Vertex index in `0..4`.
        index: usize,
    },
}

impl DragState {
    /// Pointer owning the gesture, if any.
    pub fn pointer_id(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::MoveWhole { pointer_id, .. } | Self::DragVertex { pointer_id, .. } => {
                Some(*pointer_id)
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Coarse view of [`DragState`] without gesture bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorState {
    Idle,
    MovingQuad,
    DraggingVertex(usize),
}

impl From<&DragState> for EditorState {
    fn from(drag: &DragState) -> Self {
        match drag {
            DragState::Idle => Self::Idle,
            DragState::MoveWhole { .. } => Self::MovingQuad,
            DragState::DragVertex { index, .. } => Self::DraggingVertex(*index),
        }
    }
}

/// User-facing render configuration held by the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorConfig {
    pub warp: WarpConfig,
    pub show_handles: bool,
    /// Size factor applied since the last reset.
    pub scale: f64,
    /// Rotation applied since the last reset, in degrees.
    pub rotation_deg: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            warp: WarpConfig::default().with_opacity(DEFAULT_OPACITY),
            show_handles: true,
            scale: 1.0,
            rotation_deg: 0.0,
        }
    }
}

/// Interaction tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorOpts {
    /// Vertex hit-test radius. Larger than the marker so touch input can grab it.
    pub pick_radius: f64,
    /// Drawn marker radius.
    pub handle_radius: f64,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            pick_radius: DEFAULT_PICK_RADIUS,
            handle_radius: DEFAULT_HANDLE_RADIUS,
        }
    }
}

impl EditorOpts {
    pub fn with_pick_radius(mut self, pick_radius: f64) -> Self {
        self.pick_radius = pick_radius;
        self
    }

    pub fn with_handle_radius(mut self, handle_radius: f64) -> Self {
        self.handle_radius = handle_radius;
        self
    }
}

/// Quad editing state machine.
#[derive(Clone, Debug, Default)]
pub struct QuadEditor {
    canvas: Canvas,
    quad: Quad,
    drag: DragState,
    config: EditorConfig,
    opts: EditorOpts,
}

impl QuadEditor {
    /// An editor with an empty canvas and the unseeded quad.
    pub fn new(opts: EditorOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    pub fn quad(&self) -> Quad {
        self.quad
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn state(&self) -> EditorState {
        EditorState::from(&self.drag)
    }

    /// Vertex currently being dragged, for highlighting.
    pub fn active_vertex(&self) -> Option<usize> {
        match self.drag {
            DragState::DragVertex { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Overlay look derived from the editor options.
    pub fn handle_style(&self) -> HandleStyle {
        HandleStyle {
            handle_radius: self.opts.handle_radius,
            ..HandleStyle::default()
        }
    }

    /// Track a new surface size.
    ///
    /// The quad is seeded the first time the canvas becomes non-empty and only while it is
    /// still unset; a quad the user already adjusted is kept as-is.
    pub fn resize(&mut self, canvas: Canvas) -> bool {
        let changed = canvas != self.canvas;
        self.canvas = canvas;
        if self.quad.is_unset() && !canvas.is_empty() {
            self.quad = Quad::seed_for(canvas);
            tracing::debug!(
                width = canvas.width,
                height = canvas.height,
                quad = ?self.quad.points(),
                "seeded quad"
            );
            return true;
        }
        changed
    }

    /// Start a gesture at `p`.
    ///
    /// Vertices are hit-tested first, in index order, so a vertex overlapping the interior
    /// always wins. A press outside the quad leaves the editor idle.
    ///
    /// Presses from another pointer are ignored while a gesture is active. A second press from
    /// the gesture's own pointer means its release was lost: the old gesture is dropped and the
    /// press is hit-tested afresh. Returns `true` when the highlighted vertex changed.
    pub fn pointer_down(&mut self, p: Point, pointer_id: u64) -> bool {
        if self.canvas.is_empty() || !is_finite(p) {
            return false;
        }
        let mut dropped_vertex = false;
        match self.drag.pointer_id() {
            Some(owner) if owner != pointer_id => return false,
            Some(_) => {
                dropped_vertex = self.active_vertex().is_some();
                tracing::debug!(pointer_id, "stale gesture dropped");
                self.drag = DragState::Idle;
            }
            None => {}
        }

        if let Some(index) = self.quad.hit_vertex(p, self.opts.pick_radius) {
            self.drag = DragState::DragVertex { pointer_id, index };
            tracing::debug!(index, pointer_id, "vertex drag started");
            return true;
        }
        if self.quad.contains(p) {
            self.drag = DragState::MoveWhole {
                pointer_id,
                anchor: p,
                snapshot: self.quad,
            };
            tracing::debug!(pointer_id, "quad move started");
        }
        dropped_vertex
    }

    /// Continue the active gesture. Moves from another pointer are ignored.
    pub fn pointer_move(&mut self, p: Point, pointer_id: u64) -> bool {
        if !is_finite(p) || self.drag.pointer_id() != Some(pointer_id) {
            return false;
        }

        let next = match self.drag {
            DragState::Idle => return false,
            DragState::DragVertex { index, .. } => {
                self.quad.with_vertex(index, self.canvas.clamp_point(p))
            }
            DragState::MoveWhole {
                anchor, snapshot, ..
            } => snapshot.translated(p - anchor).clamped_to(self.canvas),
        };
        let changed = next != self.quad;
        self.quad = next;
        changed
    }

    /// End the active gesture, whichever pointer it belongs to.
    pub fn pointer_up(&mut self) -> bool {
        let was = std::mem::take(&mut self.drag);
        if !was.is_idle() {
            tracing::debug!(state = ?EditorState::from(&was), "gesture ended");
        }
        matches!(was, DragState::DragVertex { .. })
    }

    /// Same as [`QuadEditor::pointer_up`].
    pub fn pointer_cancel(&mut self) -> bool {
        self.pointer_up()
    }

    /// Dispatch a raw event.
    pub fn handle(&mut self, ev: &PointerEvent) -> bool {
        match ev.kind {
            PointerKind::Down => self.pointer_down(ev.position(), ev.pointer_id),
            PointerKind::Move => self.pointer_move(ev.position(), ev.pointer_id),
            PointerKind::Up => self.pointer_up(),
            PointerKind::Cancel => self.pointer_cancel(),
        }
    }

    /// Reseed the quad for the current canvas and restore opacity, blend mode, handle
    /// visibility, scale and rotation. Subdivisions are kept. Always ends in [`DragState::Idle`].
    pub fn reset(&mut self) {
        let subdivisions = self.config.warp.subdivisions;
        self.quad = Quad::seed_for(self.canvas);
        self.config = EditorConfig::default();
        self.config.warp.subdivisions = subdivisions;
        self.drag = DragState::Idle;
        tracing::debug!(quad = ?self.quad.points(), "editor reset");
    }

    /// Replace the quad outright, ending any gesture. The quad is not clamped.
    pub fn set_quad(&mut self, quad: Quad) {
        self.quad = quad;
        self.drag = DragState::Idle;
    }

    /// Set the garment opacity, clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.config.warp.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.config.warp.blend = blend;
    }

    /// Set the warp grid density (at least 1).
    pub fn set_subdivisions(&mut self, subdivisions: u32) {
        self.config.warp.subdivisions = subdivisions.max(1);
    }

    pub fn set_show_handles(&mut self, show: bool) {
        self.config.show_handles = show;
    }

    /// Resize the quad about its center to `scale` times its size at the last reset.
    ///
    /// `scale` is clamped to `[MIN_SCALE, MAX_SCALE]` and non-finite values are ignored. The
    /// result is clamped per vertex like a move, and any gesture ends. Returns `true` when the
    /// quad changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() || self.quad.is_unset() || self.canvas.is_empty() {
            return false;
        }
        let scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        if scale == self.config.scale {
            return false;
        }
        let factor = scale / self.config.scale;
        self.config.scale = scale;
        self.replace_clamped(self.quad.scaled_about_center(factor))
    }

    /// Turn the quad about its center to `degrees` relative to the last reset.
    ///
    /// `degrees` is clamped to `±MAX_ROTATION_DEG`; otherwise behaves like
    /// [`QuadEditor::set_scale`].
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() || self.quad.is_unset() || self.canvas.is_empty() {
            return false;
        }
        let degrees = degrees.clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG);
        if degrees == self.config.rotation_deg {
            return false;
        }
        let delta = (degrees - self.config.rotation_deg).to_radians();
        self.config.rotation_deg = degrees;
        self.replace_clamped(self.quad.rotated_about_center(delta))
    }

    fn replace_clamped(&mut self, next: Quad) -> bool {
        let next = next.clamped_to(self.canvas);
        self.drag = DragState::Idle;
        let changed = next != self.quad;
        self.quad = next;
        changed
    }
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/editor/controller.rs"]
mod tests;
