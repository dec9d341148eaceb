//! Geometry helpers used by hit-testing and bounds computation.

use kurbo::{Point, Rect, Vec2};

/// Distance from a point to a line segment (a→b).
///
/// The query point is clamp-projected onto the segment; a zero-length
/// segment degenerates to point distance.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Evaluate a quadratic Bézier at parameter `t`.
pub fn quad_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
        mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
    )
}

/// Sample a quadratic Bézier into `steps` segments (`steps + 1` points).
pub fn sample_quad(p0: Point, p1: Point, p2: Point, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| quad_point(p0, p1, p2, i as f64 / steps as f64))
        .collect()
}

/// Exact bounding box of a quadratic Bézier.
pub fn quad_bounds(p0: Point, p1: Point, p2: Point) -> Rect {
    let mut rect = Rect::from_points(p0, p2);
    let extremum = |a: f64, b: f64, c: f64| -> Option<f64> {
        let denom = a - 2.0 * b + c;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let t = (a - b) / denom;
        (t > 0.0 && t < 1.0).then_some(t)
    };
    for t in [extremum(p0.x, p1.x, p2.x), extremum(p0.y, p1.y, p2.y)]
        .into_iter()
        .flatten()
    {
        let p = quad_point(p0, p1, p2, t);
        rect = rect.union_pt(p);
    }
    rect
}

/// Axis-aligned bounds of a point list. Empty input yields a zero rect.
pub fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Closed containment test (edges count as inside).
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Strict AABB overlap: touching edges do not count.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Translate every point in place.
pub fn translate_points(points: &mut [Point], delta: Vec2) {
    for p in points {
        *p += delta;
    }
}

/// Perpendicular distance from `point` to the infinite line through `a` and `b`.
fn perpendicular_distance(point: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len_sq = d.hypot2();
    if len_sq < f64::EPSILON {
        return (point - a).hypot();
    }
    (point - a).cross(d).abs() / len_sq.sqrt()
}

/// Ramer-Douglas-Peucker line simplification.
pub fn rdp_simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = rdp_simplify(&points[..=max_index], tolerance);
        let right = rdp_simplify(&points[max_index..], tolerance);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}
