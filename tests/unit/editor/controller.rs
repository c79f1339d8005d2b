use super::*;
use crate::foundation::core::Vec2;

fn seeded(width: u32, height: u32) -> QuadEditor {
    let mut ed = QuadEditor::default();
    assert!(ed.resize(Canvas::new(width, height)));
    ed
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn assert_within(ed: &QuadEditor) {
    let c = ed.canvas();
    for v in ed.quad().points() {
        assert!(
            (0.0..=f64::from(c.width)).contains(&v.x) && (0.0..=f64::from(c.height)).contains(&v.y),
            "{v:?} escaped {c:?}"
        );
    }
}

#[test]
fn first_nonempty_resize_seeds_and_later_resizes_keep_quad() {
    let mut ed = QuadEditor::default();
    assert!(ed.quad().is_unset());
    ed.resize(Canvas::EMPTY);
    assert!(ed.quad().is_unset());

    ed.resize(Canvas::new(400, 500));
    assert_eq!(ed.quad(), Quad::seed_for(Canvas::new(400, 500)));

    ed.pointer_down(ed.quad().vertex(0), 0);
    ed.pointer_move(p(10.0, 10.0), 0);
    ed.pointer_up();
    let adjusted = ed.quad();

    ed.resize(Canvas::new(800, 600));
    assert_eq!(ed.quad(), adjusted);
    assert_eq!(ed.canvas(), Canvas::new(800, 600));
}

#[test]
fn vertex_wins_over_interior() {
    // A tiny quad: every interior point is also within pick radius of a vertex.
    let mut ed = seeded(100, 100);
    ed.set_quad(Quad::from_rect(crate::foundation::core::Rect::new(40.0, 40.0, 50.0, 50.0)));
    assert!(ed.quad().contains(p(45.0, 45.0)));
    ed.pointer_down(p(45.0, 45.0), 0);
    assert_eq!(ed.state(), EditorState::DraggingVertex(0));
}

#[test]
fn overlapping_markers_pick_lowest_index() {
    let mut ed = seeded(100, 100);
    ed.set_quad(Quad::new([p(50.0, 50.0), p(52.0, 50.0), p(80.0, 80.0), p(20.0, 80.0)]));
    ed.pointer_down(p(51.5, 50.0), 0);
    assert_eq!(ed.active_vertex(), Some(0));
}

#[test]
fn press_inside_starts_move_and_outside_stays_idle() {
    let mut ed = seeded(400, 500);
    assert!(!ed.pointer_down(p(5.0, 5.0), 0));
    assert_eq!(ed.state(), EditorState::Idle);

    ed.pointer_down(p(200.0, 225.0), 0);
    assert_eq!(ed.state(), EditorState::MovingQuad);
    match ed.drag() {
        DragState::MoveWhole { anchor, snapshot, .. } => {
            assert_eq!(*anchor, p(200.0, 225.0));
            assert_eq!(*snapshot, ed.quad());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn move_is_snapshot_plus_delta() {
    let mut ed = seeded(400, 500);
    let start = ed.quad();
    ed.pointer_down(p(200.0, 225.0), 0);
    for i in 1..=20 {
        ed.pointer_move(p(200.0 + f64::from(i) * 0.1, 225.0 - f64::from(i) * 0.3), 0);
    }
    ed.pointer_move(p(210.0, 215.0), 0);
    assert_eq!(ed.quad(), start.translated(Vec2::new(10.0, -10.0)));
}

#[test]
fn move_clamps_each_vertex_independently() {
    let mut ed = seeded(400, 500);
    let start = ed.quad();
    ed.pointer_down(p(200.0, 225.0), 0);
    ed.pointer_move(p(-100.0, 225.0), 0);
    let q = ed.quad();
    // Left edge pinned at 0, right edge moved by -300 and lost the shape.
    assert_eq!(q.vertex(0).x, 0.0);
    assert_eq!(q.vertex(1).x, 0.0);
    assert_eq!(q.vertex(0).y, start.vertex(0).y);
    assert_within(&ed);
}

#[test]
fn vertex_drag_clamps_per_axis() {
    let mut ed = seeded(400, 500);
    ed.pointer_down(ed.quad().vertex(2), 0);
    ed.pointer_move(p(1000.0, 250.0), 0);
    assert_eq!(ed.quad().vertex(2), p(400.0, 250.0));
    ed.pointer_move(p(-3.0, -4.0), 0);
    assert_eq!(ed.quad().vertex(2), p(0.0, 0.0));
}

#[test]
fn arbitrary_moves_stay_in_bounds() {
    let mut ed = seeded(300, 200);
    let mut seed = 0x2545_f491_u64;
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % 2000) as f64 - 800.0
    };
    for _ in 0..50 {
        let q = ed.quad();
        let target = if next() > 0.0 { q.vertex(3) } else { q.bilinear(0.5, 0.5) };
        ed.pointer_down(target, 0);
        for _ in 0..10 {
            ed.pointer_move(p(next(), next()), 0);
            assert_within(&ed);
        }
        ed.pointer_up();
    }
}

#[test]
fn cancel_returns_to_idle_and_later_moves_do_nothing() {
    let mut ed = seeded(400, 500);
    ed.pointer_down(ed.quad().vertex(1), 0);
    ed.pointer_move(p(300.0, 80.0), 0);
    assert!(ed.pointer_cancel());
    assert!(ed.drag().is_idle());

    let before = ed.quad();
    assert!(!ed.pointer_move(p(10.0, 10.0), 0));
    assert_eq!(ed.quad(), before);
}

#[test]
fn second_pointer_is_ignored_while_dragging() {
    let mut ed = seeded(400, 500);
    let v1 = ed.quad().vertex(1);
    ed.pointer_down(v1, 7);
    assert!(!ed.pointer_down(ed.quad().vertex(3), 8));
    assert!(!ed.pointer_move(p(0.0, 0.0), 8));
    assert_eq!(ed.quad().vertex(1), v1);
    assert!(ed.pointer_move(p(390.0, 50.0), 7));
    assert_eq!(ed.quad().vertex(1), p(390.0, 50.0));
}

#[test]
fn same_pointer_press_after_lost_release_starts_fresh_gesture() {
    let mut ed = seeded(400, 500);
    ed.pointer_down(ed.quad().vertex(1), 0);
    ed.pointer_move(p(300.0, 80.0), 0);

    // No pointer-up arrived; the next press comes from the same pointer.
    let center = ed.quad().bilinear(0.5, 0.5);
    assert!(ed.pointer_down(center, 0));
    assert_eq!(ed.state(), EditorState::MovingQuad);

    let before = ed.quad();
    ed.pointer_move(center + Vec2::new(10.0, 10.0), 0);
    assert_eq!(ed.quad(), before.translated(Vec2::new(10.0, 10.0)));
    assert_eq!(ed.quad().vertex(1), p(310.0, 90.0));
}

#[test]
fn pick_radius_option_widens_vertex_hits() {
    let near = p(96.0, 105.0);
    let mut narrow = seeded(400, 500);
    assert_eq!(narrow.quad().vertex(0), p(116.0, 105.0));
    narrow.pointer_down(near, 0);
    assert_eq!(narrow.state(), EditorState::Idle);

    let mut wide = QuadEditor::new(EditorOpts::default().with_pick_radius(30.0));
    wide.resize(Canvas::new(400, 500));
    assert!(wide.pointer_down(near, 0));
    assert_eq!(wide.state(), EditorState::DraggingVertex(0));
}

#[test]
fn reset_is_idempotent_and_keeps_subdivisions() {
    let mut ed = seeded(400, 500);
    ed.set_opacity(0.25);
    ed.set_blend_mode(BlendMode::Multiply);
    ed.set_show_handles(false);
    ed.set_subdivisions(3);
    ed.set_scale(1.3);
    ed.set_rotation(-12.0);
    ed.pointer_down(ed.quad().vertex(0), 0);
    ed.pointer_move(p(1.0, 1.0), 0);

    ed.reset();
    let (q1, c1) = (ed.quad(), *ed.config());
    ed.reset();
    assert_eq!(ed.quad(), q1);
    assert_eq!(*ed.config(), c1);

    assert_eq!(q1, Quad::seed_for(Canvas::new(400, 500)));
    assert_eq!(c1.warp.opacity, DEFAULT_OPACITY);
    assert_eq!(c1.warp.blend, BlendMode::Normal);
    assert!(c1.show_handles);
    assert_eq!(c1.warp.subdivisions, 3);
    assert_eq!(c1.scale, 1.0);
    assert_eq!(c1.rotation_deg, 0.0);
    assert_eq!(ed.state(), EditorState::Idle);
}

#[test]
fn scale_is_relative_to_reset_and_clamped() {
    let mut ed = seeded(400, 500);
    let seed = ed.quad();

    assert!(ed.set_scale(1.5));
    assert_eq!(ed.quad(), seed.scaled_about_center(1.5));
    assert_eq!(ed.config().scale, 1.5);

    assert!(ed.set_scale(1.0));
    for (got, want) in ed.quad().points().into_iter().zip(seed.points()) {
        assert!(got.distance(want) < 1e-9, "{got:?} vs {want:?}");
    }

    ed.set_scale(5.0);
    assert_eq!(ed.config().scale, MAX_SCALE);
    assert_eq!(ed.quad().vertex(0).y, 0.0);
    assert_within(&ed);

    ed.set_scale(0.01);
    assert_eq!(ed.config().scale, MIN_SCALE);
    assert!(!ed.set_scale(f64::NAN));
    assert_eq!(ed.config().scale, MIN_SCALE);
}

#[test]
fn rotation_turns_about_center_and_ends_gesture() {
    let mut ed = seeded(400, 500);
    let seed = ed.quad();
    ed.pointer_down(seed.vertex(2), 0);

    assert!(ed.set_rotation(90.0));
    assert_eq!(ed.config().rotation_deg, MAX_ROTATION_DEG);
    assert!(ed.drag().is_idle());
    assert!(ed.quad().center().distance(seed.center()) < 1e-9);
    assert_within(&ed);

    assert!(ed.set_rotation(0.0));
    for (got, want) in ed.quad().points().into_iter().zip(seed.points()) {
        assert!(got.distance(want) < 1e-9, "{got:?} vs {want:?}");
    }
    assert!(!ed.set_rotation(f64::INFINITY));
}

#[test]
fn transforms_wait_for_a_seeded_quad() {
    let mut ed = QuadEditor::default();
    assert!(!ed.set_scale(1.2));
    assert!(!ed.set_rotation(10.0));
    assert_eq!(ed.config().scale, 1.0);
    assert!(ed.quad().is_unset());
}

#[test]
fn empty_canvas_ignores_presses() {
    let mut ed = QuadEditor::default();
    assert!(!ed.pointer_down(p(0.0, 0.0), 0));
    assert!(ed.drag().is_idle());
}

#[test]
fn non_finite_positions_are_ignored() {
    let mut ed = seeded(400, 500);
    ed.pointer_down(ed.quad().vertex(0), 0);
    let before = ed.quad();
    assert!(!ed.pointer_move(p(f64::NAN, 10.0), 0));
    assert_eq!(ed.quad(), before);
}

#[test]
fn setters_clamp_their_input() {
    let mut ed = QuadEditor::default();
    ed.set_opacity(3.0);
    assert_eq!(ed.config().warp.opacity, 1.0);
    ed.set_opacity(f32::NAN);
    assert_eq!(ed.config().warp.opacity, 1.0);
    ed.set_subdivisions(0);
    assert_eq!(ed.config().warp.subdivisions, 1);
}

#[test]
fn handle_dispatches_by_kind() {
    let mut ed = seeded(400, 500);
    let v = ed.quad().vertex(3);
    assert!(ed.handle(&PointerEvent::down(v.x, v.y)));
    assert!(ed.handle(&PointerEvent::moved(v.x - 5.0, v.y)));
    assert!(ed.handle(&PointerEvent::up(0.0, 0.0)));
    assert!(!ed.handle(&PointerEvent::up(0.0, 0.0)));
}

#[test]
fn dragging_top_right_vertex_to_corner() {
    let mut ed = seeded(400, 500);
    ed.set_quad(Quad::new([p(116.0, 97.0), p(284.0, 97.0), p(284.0, 337.0), p(116.0, 337.0)]));

    ed.pointer_down(p(290.0, 103.0), 1);
    assert_eq!(ed.state(), EditorState::DraggingVertex(1));
    ed.pointer_move(p(390.0, 50.0), 1);
    assert_eq!(
        ed.quad(),
        Quad::new([p(116.0, 97.0), p(390.0, 50.0), p(284.0, 337.0), p(116.0, 337.0)])
    );
    ed.pointer_up();
    assert_eq!(ed.state(), EditorState::Idle);
}
