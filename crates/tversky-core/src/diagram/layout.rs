//! Area-proportional placement of two circles.
//!
//! Circle areas follow the set sizes and the lens where they overlap follows
//! the intersection size. The centre distance that produces a given lens
//! area has no closed form, so it is found by bisection: the lens area falls
//! monotonically as the centres move apart.

use std::f64::consts::PI;

/// Drawing canvas width in pixels.
pub const CANVAS_WIDTH: f64 = 520.0;
/// Drawing canvas height in pixels.
pub const CANVAS_HEIGHT: f64 = 340.0;

/// Radius of the larger circle.
const MAX_RADIUS: f64 = 110.0;
/// Smallest radius drawn, so tiny and empty sets stay visible.
const MIN_RADIUS: f64 = 22.0;
/// Space between the circles of disjoint sets.
const DISJOINT_GAP: f64 = 16.0;
/// Vertical position of the circle centres.
const CENTRE_Y: f64 = 182.0;
/// Bisection steps; 60 halvings exhaust f64 precision on this range.
const BISECTION_STEPS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub centre: Point,
    pub radius: f64,
}

impl Circle {
    #[must_use]
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

/// Solved geometry for one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct VennLayout {
    pub circle_a: Circle,
    pub circle_b: Circle,
    /// Anchor for the only-A count.
    pub only_a_anchor: Point,
    /// Anchor for the only-B count.
    pub only_b_anchor: Point,
    /// Anchor for the intersection count.
    pub intersection_anchor: Point,
    /// Anchor for set A's label, above its circle.
    pub label_a_anchor: Point,
    /// Anchor for set B's label, above its circle.
    pub label_b_anchor: Point,
}

impl VennLayout {
    /// Lay out circles for the given region sizes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn solve(only_a: usize, only_b: usize, intersection: usize) -> Self {
        let size_a = (only_a + intersection) as f64;
        let size_b = (only_b + intersection) as f64;
        let largest = size_a.max(size_b);

        let radius_for = |size: f64| {
            if largest == 0.0 {
                MIN_RADIUS
            } else {
                (MAX_RADIUS * (size / largest).sqrt()).max(MIN_RADIUS)
            }
        };
        let r_a = radius_for(size_a);
        let r_b = radius_for(size_b);

        let distance = if intersection == 0 {
            r_a + r_b + DISJOINT_GAP
        } else if only_a == 0 && only_b == 0 {
            0.0
        } else if only_a == 0 || only_b == 0 {
            // One set contains the other: inner circle touches the outer rim.
            (r_a - r_b).abs()
        } else {
            let unit_area = PI * MAX_RADIUS * MAX_RADIUS / largest;
            let full_overlap = PI * r_a.min(r_b).powi(2);
            let target = (intersection as f64 * unit_area).min(full_overlap);
            distance_for_lens(r_a, r_b, target)
        };

        // Centre the union of both discs horizontally.
        let left = (-r_a).min(distance - r_b);
        let right = r_a.max(distance + r_b);
        let x_a = CANVAS_WIDTH / 2.0 - (left + right) / 2.0;
        let x_b = x_a + distance;

        let circle_a = Circle {
            centre: Point { x: x_a, y: CENTRE_Y },
            radius: r_a,
        };
        let circle_b = Circle {
            centre: Point { x: x_b, y: CENTRE_Y },
            radius: r_b,
        };

        let (a_left, a_right) = (x_a - r_a, x_a + r_a);
        let (b_left, b_right) = (x_b - r_b, x_b + r_b);

        let only_a_anchor = segment_midpoint(a_left, b_left.min(a_right))
            .unwrap_or(x_a - r_a / 2.0);
        let only_b_anchor = segment_midpoint(a_right.max(b_left), b_right)
            .unwrap_or(x_b + r_b / 2.0);
        let intersection_anchor =
            segment_midpoint(a_left.max(b_left), a_right.min(b_right)).unwrap_or(f64::midpoint(x_a, x_b));

        Self {
            circle_a,
            circle_b,
            only_a_anchor: Point {
                x: only_a_anchor,
                y: CENTRE_Y,
            },
            only_b_anchor: Point {
                x: only_b_anchor,
                y: CENTRE_Y,
            },
            intersection_anchor: Point {
                x: intersection_anchor,
                y: CENTRE_Y,
            },
            label_a_anchor: Point {
                x: x_a,
                y: CENTRE_Y - r_a - 14.0,
            },
            label_b_anchor: Point {
                x: x_b,
                y: CENTRE_Y - r_b - 14.0,
            },
        }
    }

    /// Distance between the two centres.
    #[must_use]
    pub fn centre_distance(&self) -> f64 {
        (self.circle_b.centre.x - self.circle_a.centre.x).abs()
    }

    /// Area currently shared by both circles.
    #[must_use]
    pub fn overlap_area(&self) -> f64 {
        lens_area(
            self.circle_a.radius,
            self.circle_b.radius,
            self.centre_distance(),
        )
    }
}

/// Area of the intersection of two circles with radii `r1`, `r2` whose centres
/// are `d` apart.
#[must_use]
pub fn lens_area(r1: f64, r2: f64, d: f64) -> f64 {
    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        return PI * r1.min(r2).powi(2);
    }
    let (r1_sq, r2_sq, d_sq) = (r1 * r1, r2 * r2, d * d);
    let alpha = ((d_sq + r1_sq - r2_sq) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let beta = ((d_sq + r2_sq - r1_sq) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let kite = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2))
        .max(0.0)
        .sqrt();
    r1_sq.mul_add(alpha, r2_sq * beta) - 0.5 * kite
}

fn distance_for_lens(r1: f64, r2: f64, target: f64) -> f64 {
    let mut near = (r1 - r2).abs();
    let mut far = r1 + r2;
    for _ in 0..BISECTION_STEPS {
        let mid = f64::midpoint(near, far);
        if lens_area(r1, r2, mid) > target {
            near = mid;
        } else {
            far = mid;
        }
    }
    f64::midpoint(near, far)
}

fn segment_midpoint(start: f64, end: f64) -> Option<f64> {
    (end - start > 1e-9).then(|| f64::midpoint(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn lens_area_limits() {
        assert!(close(lens_area(10.0, 10.0, 25.0), 0.0, 1e-12));
        assert!(close(lens_area(10.0, 5.0, 2.0), PI * 25.0, 1e-9));
        // Equal circles, d = r: known value r^2 (2π/3 - √3/2).
        let expected = 100.0 * (2.0 * PI / 3.0 - 3.0_f64.sqrt() / 2.0);
        assert!(close(lens_area(10.0, 10.0, 10.0), expected, 1e-9));
    }

    #[test]
    fn disjoint_sets_do_not_overlap() {
        let layout = VennLayout::solve(3, 4, 0);
        assert!(layout.centre_distance() > layout.circle_a.radius + layout.circle_b.radius);
        assert!(close(layout.overlap_area(), 0.0, 1e-12));
    }

    #[test]
    fn equal_sets_coincide() {
        let layout = VennLayout::solve(0, 0, 5);
        assert!(close(layout.centre_distance(), 0.0, 1e-12));
        assert!(close(layout.circle_a.radius, layout.circle_b.radius, 1e-12));
    }

    #[test]
    fn subset_is_nested() {
        // A = {i1, i2}, B = {i1, i2, b1, b2, b3, b4, b5, b6}
        let layout = VennLayout::solve(0, 6, 2);
        let inner = layout.circle_a.radius;
        let outer = layout.circle_b.radius;
        assert!(inner < outer);
        assert!(layout.centre_distance() <= outer - inner + 1e-6);
    }

    #[test]
    fn small_subset_stays_nested_when_radius_is_clamped() {
        // |B| = 1 inside |A| = 200: B's radius is raised to MIN_RADIUS.
        let layout = VennLayout::solve(199, 0, 1);
        let outer = layout.circle_a.radius;
        let inner = layout.circle_b.radius;
        assert!(close(inner, MIN_RADIUS, 1e-12));
        assert!(layout.centre_distance() <= outer - inner + 1e-6);
        assert!(close(layout.overlap_area(), layout.circle_b.area(), 1e-6));

        let mirrored = VennLayout::solve(0, 199, 1);
        assert!(
            mirrored.centre_distance()
                <= mirrored.circle_b.radius - mirrored.circle_a.radius + 1e-6
        );
    }

    #[test]
    fn lens_matches_intersection_share() {
        // |A| = 4, |B| = 4, |A∩B| = 2: the lens is half of either circle.
        let layout = VennLayout::solve(2, 2, 2);
        let half = layout.circle_a.area() / 2.0;
        assert!(close(layout.overlap_area(), half, 1e-6));
    }

    #[test]
    fn larger_set_gets_larger_circle() {
        let layout = VennLayout::solve(9, 1, 1);
        assert!(layout.circle_a.radius > layout.circle_b.radius);
        assert!(close(layout.circle_a.radius, MAX_RADIUS, 1e-12));
    }

    #[test]
    fn empty_sets_get_placeholder_circles() {
        let layout = VennLayout::solve(0, 0, 0);
        assert!(close(layout.circle_a.radius, MIN_RADIUS, 1e-12));
        assert!(close(layout.circle_b.radius, MIN_RADIUS, 1e-12));
        assert!(layout.centre_distance() > 2.0 * MIN_RADIUS);
    }

    #[test]
    fn drawing_fits_the_canvas() {
        for (a, b, i) in [(0, 0, 0), (10, 10, 0), (1, 50, 3), (0, 0, 9), (7, 2, 5)] {
            let layout = VennLayout::solve(a, b, i);
            for circle in [layout.circle_a, layout.circle_b] {
                assert!(circle.centre.x - circle.radius >= 0.0, "{a},{b},{i}");
                assert!(circle.centre.x + circle.radius <= CANVAS_WIDTH, "{a},{b},{i}");
                assert!(circle.centre.y - circle.radius >= 24.0);
                assert!(circle.centre.y + circle.radius <= CANVAS_HEIGHT);
            }
        }
    }

    #[test]
    fn region_anchors_are_ordered_left_to_right() {
        let layout = VennLayout::solve(3, 3, 2);
        assert!(layout.only_a_anchor.x < layout.intersection_anchor.x);
        assert!(layout.intersection_anchor.x < layout.only_b_anchor.x);
    }
}
