//! quadfit composites a garment image onto a photo through a freely deformable quadrilateral.
//!
//! The crate has two halves that only meet through a [`Quad`] value:
//!
//! 1. **Warp**: [`render_warp`] cuts the source image into an `n x n` grid, maps every grid
//!    corner onto the quad by bilinear interpolation and blits each cell as two affine-mapped
//!    triangles onto a [`WarpSurface`]. `subdivisions = 1` is the two-triangle fast path.
//! 2. **Edit**: [`QuadEditor`] turns pointer down/move/up/cancel events into vertex drags and
//!    whole-quad moves, clamped to the canvas. [`FitSession`] wires an editor to a surface
//!    and redraws after every change.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Infallible interaction**: rendering and pointer handling never return errors or panic;
//!   degenerate geometry degrades visually instead.
//! - **Premultiplied RGBA8** end-to-end on the CPU surface.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod editor;
mod foundation;
mod geometry;
mod render;

pub use assets::decode::{SourceImage, decode_image, load_image};
pub use config::{FitConfig, MAX_SUBDIVISIONS};
pub use editor::controller::{
    DEFAULT_HANDLE_RADIUS, DEFAULT_OPACITY, DEFAULT_PICK_RADIUS, DragState, EditorConfig,
    EditorOpts, EditorState, MAX_ROTATION_DEG, MAX_SCALE, MIN_SCALE, QuadEditor,
};
pub use editor::pointer::{PointerEvent, PointerKind};
pub use editor::session::{FitSession, RedrawPolicy};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{QuadfitError, QuadfitResult};
pub use geometry::affine::{
    DEGENERATE_EPSILON, Triangle, affine_from_triangles, signed_area2, try_affine_from_triangles,
};
pub use geometry::quad::{
    Quad, SEED_CENTER_X_FRAC, SEED_CENTER_Y_FRAC, SEED_HEIGHT_FRAC, SEED_WIDTH_FRAC,
};
pub use render::blend::{BlendMode, PremulRgba8, composite, over};
pub use render::cpu::CpuSurface;
pub use render::surface::{DrawOp, QuadOverlay, RecordingSurface, TriangleBlit, WarpSurface};
pub use render::warp::{
    DEFAULT_SUBDIVISIONS, HandleStyle, WarpConfig, WarpStats, plan_warp, render_handles,
    render_warp,
};
