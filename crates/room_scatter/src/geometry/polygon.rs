//! Simple-polygon helpers on the floor (XZ) plane.
use glam::Vec2;

/// Even-odd point-in-polygon test. Points exactly on an edge may land on either side.
pub fn contains_point(polygon: &[Vec2], p: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shoelace area, positive for counter-clockwise winding.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

#[inline]
pub fn area(polygon: &[Vec2]) -> f32 {
    signed_area(polygon).abs()
}

/// Total length of the closed boundary.
pub fn perimeter(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 2 {
        return 0.0;
    }
    edges(polygon).map(|(a, b)| a.distance(b)).sum()
}

/// Shortest distance from `p` to any polygon edge.
pub fn distance_to_boundary(polygon: &[Vec2], p: Vec2) -> f32 {
    edges(polygon)
        .map(|(a, b)| distance_to_segment(p, a, b))
        .fold(f32::INFINITY, f32::min)
}

pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Axis-aligned bounding rectangle as `(min, max)`.
pub fn bounding_rect(polygon: &[Vec2]) -> (Vec2, Vec2) {
    polygon.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

/// Iterates closed-loop edges `(v[i], v[i + 1])`, wrapping around to the first vertex.
pub fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn l_shape_containment() {
        let poly = l_shape();
        assert!(contains_point(&poly, Vec2::new(1.0, 1.0)));
        assert!(contains_point(&poly, Vec2::new(3.0, 1.0)));
        assert!(contains_point(&poly, Vec2::new(1.0, 3.0)));
        assert!(!contains_point(&poly, Vec2::new(3.0, 3.0)));
        assert!(!contains_point(&poly, Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        assert!(!contains_point(&[Vec2::ZERO, Vec2::X], Vec2::ZERO));
        assert_eq!(area(&[Vec2::ZERO, Vec2::X]), 0.0);
    }

    #[test]
    fn area_and_winding() {
        let poly = l_shape();
        assert!((signed_area(&poly) - 12.0).abs() < 1e-5);
        let reversed: Vec<Vec2> = poly.iter().rev().copied().collect();
        assert!((signed_area(&reversed) + 12.0).abs() < 1e-5);
        assert!((area(&reversed) - 12.0).abs() < 1e-5);
    }

    #[test]
    fn boundary_distance() {
        let poly = l_shape();
        assert!((distance_to_boundary(&poly, Vec2::new(1.0, 1.0)) - 1.0).abs() < 1e-5);
        assert!((distance_to_boundary(&poly, Vec2::new(1.5, 3.0)) - 0.5).abs() < 1e-5);
        assert!((perimeter(&poly) - 16.0).abs() < 1e-5);
        let (lo, hi) = bounding_rect(&poly);
        assert_eq!(lo, Vec2::ZERO);
        assert_eq!(hi, Vec2::splat(4.0));
    }
}
