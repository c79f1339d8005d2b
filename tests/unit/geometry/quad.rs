use super::*;

fn square() -> Quad {
    Quad::from_rect(Rect::new(10.0, 10.0, 110.0, 110.0))
}

#[test]
fn seed_matches_centered_box() {
    let q = Quad::seed_for(Canvas::new(400, 500));
    assert_eq!(
        q.points(),
        [
            Point::new(116.0, 105.0),
            Point::new(284.0, 105.0),
            Point::new(284.0, 345.0),
            Point::new(116.0, 345.0),
        ]
    );
    assert!(Quad::seed_for(Canvas::EMPTY).is_unset());
    assert!(!q.is_unset());
}

#[test]
fn bilinear_corners_hit_vertices() {
    let q = Quad::new([
        Point::new(3.0, 4.0),
        Point::new(90.0, -7.0),
        Point::new(120.0, 80.0),
        Point::new(-5.0, 60.0),
    ]);
    assert_eq!(q.bilinear(0.0, 0.0), q.vertex(0));
    assert_eq!(q.bilinear(1.0, 0.0), q.vertex(1));
    assert_eq!(q.bilinear(1.0, 1.0), q.vertex(2));
    assert_eq!(q.bilinear(0.0, 1.0), q.vertex(3));
}

#[test]
fn bilinear_center_of_rect_is_rect_center() {
    let c = square().bilinear(0.5, 0.5);
    assert!((c.x - 60.0).abs() < 1e-12);
    assert!((c.y - 60.0).abs() < 1e-12);
}

#[test]
fn contains_uses_even_odd_rule() {
    let q = square();
    assert!(q.contains(Point::new(50.0, 50.0)));
    assert!(!q.contains(Point::new(5.0, 50.0)));
    assert!(!q.contains(Point::new(50.0, 200.0)));

    // Bowtie crossing at (50, 50): the left and right lobes are inside, top and bottom are not.
    let bowtie = Quad::new([
        Point::new(0.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(100.0, 0.0),
        Point::new(0.0, 100.0),
    ]);
    assert!(bowtie.contains(Point::new(20.0, 50.0)));
    assert!(bowtie.contains(Point::new(80.0, 50.0)));
    assert!(!bowtie.contains(Point::new(50.0, 20.0)));
    assert!(!bowtie.contains(Point::new(50.0, 80.0)));
}

#[test]
fn hit_vertex_takes_first_in_index_order() {
    let q = Quad::new([
        Point::new(0.0, 0.0),
        Point::new(5.0, 0.0),
        Point::new(5.0, 5.0),
        Point::new(0.0, 5.0),
    ]);
    // Every vertex is within 14px; index 0 wins.
    assert_eq!(q.hit_vertex(Point::new(4.0, 4.0), 14.0), Some(0));
    assert_eq!(square().hit_vertex(Point::new(110.0, 100.0), 14.0), Some(2));
    assert_eq!(square().hit_vertex(Point::new(60.0, 60.0), 14.0), None);
}

#[test]
fn mutators_return_new_values() {
    let q = square();
    let moved = q.translated(Vec2::new(5.0, -5.0));
    assert_eq!(q.vertex(0), Point::new(10.0, 10.0));
    assert_eq!(moved.vertex(0), Point::new(15.0, 5.0));

    let edited = q.with_vertex(1, Point::new(1.0, 2.0));
    assert_eq!(q.vertex(1), Point::new(110.0, 10.0));
    assert_eq!(edited.vertex(1), Point::new(1.0, 2.0));
}

#[test]
fn clamp_pins_each_vertex_independently() {
    let canvas = Canvas::new(100, 100);
    let q = square().clamped_to(canvas);
    assert_eq!(q.vertex(0), Point::new(10.0, 10.0));
    assert_eq!(q.vertex(2), Point::new(100.0, 100.0));
    assert!(q.within(canvas));
    assert!(!square().within(canvas));
}

#[test]
fn parse_accepts_pairs_and_rejects_garbage() {
    let q = Quad::parse("116,97 284,97;284,337 116,337").unwrap();
    assert_eq!(q.vertex(1), Point::new(284.0, 97.0));
    assert!(Quad::parse("1,2 3,4").is_err());
    assert!(Quad::parse("1,2 3,4 5,6 7").is_err());
    assert!(Quad::parse("1,2 3,4 5,6 7,nan").is_err());
}

#[test]
fn serde_uses_point_pairs() {
    let q = square();
    let json = serde_json::to_string(&q).unwrap();
    assert_eq!(json, "[[10.0,10.0],[110.0,10.0],[110.0,110.0],[10.0,110.0]]");
    let back: Quad = serde_json::from_str(&json).unwrap();
    assert_eq!(back, q);
}

#[test]
fn scale_and_rotate_pivot_on_the_center() {
    let q = square();
    assert_eq!(q.center(), Point::new(60.0, 60.0));

    let big = q.scaled_about_center(2.0);
    assert_eq!(big.vertex(0), Point::new(-40.0, -40.0));
    assert_eq!(big.vertex(2), Point::new(160.0, 160.0));
    assert_eq!(big.center(), q.center());
    assert_eq!(q.vertex(0), Point::new(10.0, 10.0));

    let turned = q.rotated_about_center(std::f64::consts::FRAC_PI_2);
    // A quarter turn clockwise moves the top-left corner to the top-right.
    assert!(turned.vertex(0).distance(Point::new(110.0, 10.0)) < 1e-9);
    assert!(turned.vertex(1).distance(Point::new(110.0, 110.0)) < 1e-9);
    assert!(turned.center().distance(q.center()) < 1e-9);
}

#[test]
#[should_panic]
fn vertex_index_past_three_panics() {
    let _ = square().vertex(4);
}
