//! Smooth area outlines built as Bézier paths and flattened into polygons.
//!
//! Two interpolations are provided:
//! - uniform cubic B-spline ("basis") for the streamgraph bands; it does not pass
//!   through interior points, which keeps the layers soft;
//! - monotone cubic in x for the small trend charts; it passes through every
//!   point and never overshoots between them.

use kurbo::{BezPath, PathEl, Point};

/// Maximum distance between the flattened polyline and the true curve, in pixels.
pub const FLATTEN_TOLERANCE: f64 = 0.25;

fn weighted(terms: &[(f64, Point)], div: f64) -> Point {
    let v = terms
        .iter()
        .fold(kurbo::Vec2::ZERO, |acc, (w, p)| acc + p.to_vec2() * *w);
    (v / div).to_point()
}

fn basis_segment(path: &mut BezPath, a: Point, b: Point, c: Point) {
    path.curve_to(
        weighted(&[(2.0, a), (1.0, b)], 3.0),
        weighted(&[(1.0, a), (2.0, b)], 3.0),
        weighted(&[(1.0, a), (4.0, b), (1.0, c)], 6.0),
    );
}

/// Append a B-spline through `pts`. With `connect` the first point is joined
/// with a straight line to the current path end instead of starting a new subpath.
fn push_basis(path: &mut BezPath, pts: &[Point], connect: bool) {
    let Some(&first) = pts.first() else {
        return;
    };
    if connect {
        path.line_to(first);
    } else {
        path.move_to(first);
    }
    let n = pts.len();
    match n {
        1 => {}
        2 => path.line_to(pts[1]),
        _ => {
            path.line_to(weighted(&[(5.0, pts[0]), (1.0, pts[1])], 6.0));
            for k in 2..n {
                basis_segment(path, pts[k - 2], pts[k - 1], pts[k]);
            }
            basis_segment(path, pts[n - 2], pts[n - 1], pts[n - 1]);
            path.line_to(pts[n - 1]);
        }
    }
}

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at `b` given its neighbours, clamped so the curve stays monotone.
fn interior_slope(a: Point, b: Point, c: Point) -> f64 {
    let h0 = b.x - a.x;
    let h1 = c.x - b.x;
    if h0 == 0.0 || h1 == 0.0 {
        return 0.0;
    }
    let s0 = (b.y - a.y) / h0;
    let s1 = (c.y - b.y) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

/// Tangent at an end point from the neighbouring tangent `t`.
fn end_slope(a: Point, b: Point, t: f64) -> f64 {
    let h = b.x - a.x;
    if h == 0.0 {
        t
    } else {
        (3.0 * (b.y - a.y) / h - t) / 2.0
    }
}

/// Per-point tangents for the monotone-x interpolation.
pub fn monotone_tangents(pts: &[Point]) -> Vec<f64> {
    let n = pts.len();
    match n {
        0 | 1 => vec![0.0; n],
        2 => {
            let h = pts[1].x - pts[0].x;
            let s = if h == 0.0 { 0.0 } else { (pts[1].y - pts[0].y) / h };
            vec![s, s]
        }
        _ => {
            let mut t = vec![0.0; n];
            for i in 1..n - 1 {
                t[i] = interior_slope(pts[i - 1], pts[i], pts[i + 1]);
            }
            t[0] = end_slope(pts[0], pts[1], t[1]);
            t[n - 1] = end_slope(pts[n - 2], pts[n - 1], t[n - 2]);
            t
        }
    }
}

fn push_monotone(path: &mut BezPath, pts: &[Point]) {
    let Some(&first) = pts.first() else {
        return;
    };
    path.move_to(first);
    let t = monotone_tangents(pts);
    for i in 0..pts.len().saturating_sub(1) {
        let (a, b) = (pts[i], pts[i + 1]);
        let dx = (b.x - a.x) / 3.0;
        path.curve_to(
            Point::new(a.x + dx, a.y + dx * t[i]),
            Point::new(b.x - dx, b.y - dx * t[i + 1]),
            b,
        );
    }
}

/// Flatten a path into polygon vertices (close markers are dropped).
pub fn flatten_polygon(path: &BezPath) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => out.push((p.x, p.y)),
        _ => {}
    });
    out
}

/// Closed area between two edges, both smoothed with the B-spline:
/// `upper` is traced forward, then `lower` backward.
pub fn basis_area(upper: &[Point], lower: &[Point]) -> Vec<(f64, f64)> {
    let mut path = BezPath::new();
    push_basis(&mut path, upper, false);
    let back: Vec<Point> = lower.iter().rev().copied().collect();
    let connect = !path.elements().is_empty();
    push_basis(&mut path, &back, connect);
    if !path.elements().is_empty() {
        path.close_path();
    }
    flatten_polygon(&path)
}

/// Closed area under a monotone curve down to a horizontal `baseline` (pixel y).
pub fn monotone_area(pts: &[Point], baseline: f64) -> Vec<(f64, f64)> {
    let mut path = BezPath::new();
    push_monotone(&mut path, pts);
    if let (Some(first), Some(last)) = (pts.first(), pts.last()) {
        path.line_to(Point::new(last.x, baseline));
        path.line_to(Point::new(first.x, baseline));
        path.close_path();
    }
    flatten_polygon(&path)
}
