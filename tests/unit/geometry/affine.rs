use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn maps_each_source_vertex_onto_destination() {
    let src = [
        Point::new(0.0, 0.0),
        Point::new(200.0, 0.0),
        Point::new(200.0, 300.0),
    ];
    let dst = [
        Point::new(116.0, 97.0),
        Point::new(390.0, 50.0),
        Point::new(284.0, 337.0),
    ];
    let m = affine_from_triangles(&src, &dst);
    for (s, d) in src.iter().zip(dst.iter()) {
        assert!(close(m * *s, *d), "{:?} -> {:?}, want {:?}", s, m * *s, d);
    }
}

#[test]
fn identical_triangles_give_identity() {
    let t = [
        Point::new(3.0, 1.0),
        Point::new(40.0, 7.0),
        Point::new(12.0, 33.0),
    ];
    let m = affine_from_triangles(&t, &t);
    let c = m.as_coeffs();
    assert!((c[0] - 1.0).abs() < 1e-12);
    assert!(c[1].abs() < 1e-12);
    assert!(c[2].abs() < 1e-12);
    assert!((c[3] - 1.0).abs() < 1e-12);
    assert!(c[4].abs() < 1e-9);
    assert!(c[5].abs() < 1e-9);
}

#[test]
fn degenerate_source_falls_back_to_identity() {
    let collapsed = [
        Point::new(5.0, 5.0),
        Point::new(5.0, 5.0),
        Point::new(10.0, 10.0),
    ];
    let dst = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ];
    assert!(try_affine_from_triangles(&collapsed, &dst).is_none());
    assert_eq!(affine_from_triangles(&collapsed, &dst), Affine::IDENTITY);
}

#[test]
fn degenerate_destination_is_solvable_and_finite() {
    let src = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
    ];
    let dst = [Point::new(4.0, 4.0); 3];
    let m = try_affine_from_triangles(&src, &dst).unwrap();
    assert!(m.as_coeffs().iter().all(|c| c.is_finite()));
    assert!(close(m * Point::new(7.0, 2.0), Point::new(4.0, 4.0)));
}

#[test]
fn signed_area_sign_tracks_winding() {
    let cw = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
    ];
    let ccw = [cw[0], cw[2], cw[1]];
    assert_eq!(signed_area2(&cw), 100.0);
    assert_eq!(signed_area2(&ccw), -100.0);
}
