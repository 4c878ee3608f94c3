//! Metaball connector geometry.
//!
//! Given two circles, decides whether they are close enough to visually merge
//! and, if so, builds the closed four-vertex outline that bridges them. The
//! outline runs `p1a -> p2a -> p2b -> p1b`: two vertices on each circle, with
//! Bezier handles on the two bridging curves that pinch into a waist.

use crate::geometry::{Circle, CubicBezier, Point};
use std::f64::consts::{FRAC_PI_2, PI};

/// Blend factor the menu uses for every pair.
pub const DEFAULT_BLEND: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParams {
    /// How far the outline pulls from the raw tangent toward the full
    /// silhouette (`v`).
    pub blend: f64,
    pub handle_len_rate: f64,
    pub max_distance: f64,
}

impl BlendParams {
    pub fn new(blend: f64, handle_len_rate: f64, max_distance: f64) -> Self {
        Self {
            blend,
            handle_len_rate,
            max_distance,
        }
    }
}

/// A path vertex. Handles are relative to `point`; a zero handle means the
/// adjoining curve leaves or enters the vertex in a straight line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub point: Point,
    pub handle_in: Point,
    pub handle_out: Point,
}

impl Segment {
    fn new(point: Point) -> Self {
        Self {
            point,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub segments: [Segment; 4],
    /// Handle length as a fraction of each circle's radius (`d2`).
    pub handle_scale: f64,
}

impl Connector {
    pub fn vertices(&self) -> [Point; 4] {
        self.segments.map(|s| s.point)
    }

    /// The four cubic curves of the closed outline, starting at `p1a`.
    pub fn curves(&self) -> impl Iterator<Item = CubicBezier> + '_ {
        (0..self.segments.len()).map(move |i| {
            let from = self.segments[i];
            let to = self.segments[(i + 1) % self.segments.len()];
            CubicBezier {
                from: from.point,
                ctrl1: from.point + from.handle_out,
                ctrl2: to.point + to.handle_in,
                to: to.point,
            }
        })
    }
}

fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// Computes the metaball outline joining `a` and `b`, or `None` when the two
/// circles cannot blend: either radius is zero, the centers coincide, the
/// circles are farther apart than `max_distance`, or one contains the other.
///
/// The returned outline carries no style; callers paint it like `a`.
pub fn compute_connector(a: &Circle, b: &Circle, params: BlendParams) -> Option<Connector> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    let (r1, r2) = (a.radius, b.radius);
    let v = params.blend;
    let d = a.center.distance(b.center);

    if d == 0.0 || !d.is_finite() || d > params.max_distance || d <= (r1 - r2).abs() {
        return None;
    }

    let (u1, u2) = if d < r1 + r2 {
        (
            clamped_acos((r1 * r1 + d * d - r2 * r2) / (2.0 * r1 * d)),
            clamped_acos((r2 * r2 + d * d - r1 * r1) / (2.0 * r2 * d)),
        )
    } else {
        (0.0, 0.0)
    };

    let angle1 = (b.center - a.center).angle();
    let angle2 = clamped_acos((r1 - r2) / d);
    let angle1a = angle1 + u1 + (angle2 - u1) * v;
    let angle1b = angle1 - u1 - (angle2 - u1) * v;
    let angle2a = angle1 + PI - u2 - (PI - u2 - angle2) * v;
    let angle2b = angle1 - PI + u2 + (PI - u2 - angle2) * v;

    let p1a = a.center + Point::from_polar(angle1a, r1);
    let p1b = a.center + Point::from_polar(angle1b, r1);
    let p2a = b.center + Point::from_polar(angle2a, r2);
    let p2b = b.center + Point::from_polar(angle2b, r2);

    let total_radius = r1 + r2;
    // shorten handles while the circles overlap, otherwise they overshoot
    let handle_scale = (v * params.handle_len_rate).min(p1a.distance(p2a) / total_radius)
        * (d * 2.0 / total_radius).min(1.0);
    let (h1, h2) = (r1 * handle_scale, r2 * handle_scale);

    let mut segments = [
        Segment::new(p1a),
        Segment::new(p2a),
        Segment::new(p2b),
        Segment::new(p1b),
    ];
    segments[0].handle_out = Point::from_polar(angle1a - FRAC_PI_2, h1);
    segments[1].handle_in = Point::from_polar(angle2a + FRAC_PI_2, h2);
    segments[2].handle_out = Point::from_polar(angle2b - FRAC_PI_2, h2);
    segments[3].handle_in = Point::from_polar(angle1b + FRAC_PI_2, h1);

    Some(Connector {
        segments,
        handle_scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn params() -> BlendParams {
        BlendParams::new(DEFAULT_BLEND, 2.4, 300.0)
    }

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle::new(Point::new(x, y), r)
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn zero_radius_never_connects() {
        let a = circle(0.0, 0.0, 0.0);
        let b = circle(50.0, 0.0, 40.0);
        assert!(compute_connector(&a, &b, params()).is_none());
        assert!(compute_connector(&b, &a, params()).is_none());
    }

    #[test]
    fn beyond_max_distance_never_connects() {
        let a = circle(0.0, 0.0, 40.0);
        let b = circle(300.5, 0.0, 40.0);
        assert!(compute_connector(&a, &b, params()).is_none());

        let edge = circle(300.0, 0.0, 40.0);
        assert!(compute_connector(&a, &edge, params()).is_some());
    }

    #[test]
    fn contained_circle_never_connects() {
        let big = circle(0.0, 0.0, 100.0);
        let small = circle(30.0, 0.0, 20.0);
        assert!(compute_connector(&big, &small, params()).is_none());
        assert!(compute_connector(&small, &big, params()).is_none());

        // internally tangent counts as contained
        let tangent = circle(80.0, 0.0, 20.0);
        assert!(compute_connector(&big, &tangent, params()).is_none());
    }

    #[test]
    fn coincident_equal_circles_are_rejected() {
        let a = circle(10.0, 10.0, 40.0);
        assert!(compute_connector(&a, &a, params()).is_none());
    }

    #[test]
    fn separated_equal_circles_use_outer_tangent_blend() {
        let a = circle(0.0, 0.0, 40.0);
        let b = circle(200.0, 0.0, 40.0);
        let c = compute_connector(&a, &b, params()).unwrap();

        // u = 0 and angle2 = pi/2, so the outline leaves each circle at 45 degrees
        let q = std::f64::consts::FRAC_PI_4;
        let [p1a, p2a, p2b, p1b] = c.vertices();
        assert!(close(p1a, Point::from_polar(q, 40.0)));
        assert!(close(p1b, Point::from_polar(-q, 40.0)));
        assert!(close(p2a, b.center + Point::from_polar(PI - q, 40.0)));
        assert!(close(p2b, b.center + Point::from_polar(-PI + q, 40.0)));
    }

    #[test]
    fn handles_sit_on_the_bridging_curves_only() {
        let a = circle(0.0, 0.0, 40.0);
        let b = circle(120.0, 30.0, 55.0);
        let c = compute_connector(&a, &b, params()).unwrap();

        let s = &c.segments;
        assert_eq!(s[0].handle_in, Point::ORIGIN);
        assert_eq!(s[1].handle_out, Point::ORIGIN);
        assert_eq!(s[2].handle_in, Point::ORIGIN);
        assert_eq!(s[3].handle_out, Point::ORIGIN);

        let curves: Vec<_> = c.curves().collect();
        assert_eq!(curves.len(), 4);
        assert!(!curves[0].is_straight());
        assert!(curves[1].is_straight());
        assert!(!curves[2].is_straight());
        assert!(curves[3].is_straight());
        assert_eq!(curves[3].to, s[0].point);

        assert!((s[0].handle_out.length() - 40.0 * c.handle_scale).abs() < EPS);
        assert!((s[1].handle_in.length() - 55.0 * c.handle_scale).abs() < EPS);
    }

    #[test]
    fn equal_circles_are_symmetric_about_the_axis() {
        let a = circle(10.0, 20.0, 45.0);
        let b = circle(90.0, 80.0, 45.0);
        let c = compute_connector(&a, &b, params()).unwrap();
        let s = &c.segments;
        let mirror = |p: Point| p.mirror_across(a.center, b.center);

        assert!(close(mirror(s[0].point), s[3].point));
        assert!(close(mirror(s[1].point), s[2].point));

        // handles mirror as directions, so reflect their endpoints
        let end = |seg: &Segment, h: Point| seg.point + h;
        assert!(close(mirror(end(&s[0], s[0].handle_out)), end(&s[3], s[3].handle_in)));
        assert!(close(mirror(end(&s[1], s[1].handle_in)), end(&s[2], s[2].handle_out)));
    }

    #[test]
    fn overlapping_circles_connect_with_inward_pull() {
        let a = circle(0.0, 0.0, 50.0);
        let b = circle(60.0, 0.0, 40.0);
        let c = compute_connector(&a, &b, params()).unwrap();

        for p in c.vertices() {
            assert!(p.is_finite());
        }
        let [p1a, p2a, p2b, p1b] = c.vertices();
        assert!((p1a.distance(a.center) - 50.0).abs() < EPS);
        assert!((p1b.distance(a.center) - 50.0).abs() < EPS);
        assert!((p2a.distance(b.center) - 40.0).abs() < EPS);
        assert!((p2b.distance(b.center) - 40.0).abs() < EPS);
        // vertices move past the raw intersection toward the outer tangent
        let u1 = (0.75f64).acos();
        assert!(p1a.angle() > u1);
        assert!(p1b.angle() < -u1);
    }

    #[test]
    fn deep_overlap_shortens_handles() {
        let a = circle(0.0, 0.0, 50.0);
        let b = circle(30.0, 0.0, 40.0);
        let c = compute_connector(&a, &b, params()).unwrap();

        let [p1a, p2a, _, _] = c.vertices();
        let unscaled = (DEFAULT_BLEND * 2.4).min(p1a.distance(p2a) / 90.0);
        assert!((c.handle_scale - unscaled * (60.0 / 90.0)).abs() < EPS);
    }

    #[test]
    fn identical_inputs_give_identical_outlines() {
        let a = circle(3.0, 4.0, 33.0);
        let b = circle(150.0, -20.0, 47.0);
        assert_eq!(
            compute_connector(&a, &b, params()),
            compute_connector(&a, &b, params())
        );
    }

    #[test]
    fn handle_scale_is_capped_and_grows_toward_max_distance() {
        let a = circle(0.0, 0.0, 40.0);
        let cap = DEFAULT_BLEND * 2.4;
        let mut last = 0.0;
        for step in 0..=40 {
            let d = 81.0 + step as f64 * (300.0 - 81.0) / 40.0;
            let c = compute_connector(&a, &circle(d, 0.0, 40.0), params()).unwrap();
            assert!(c.handle_scale >= last - EPS);
            assert!(c.handle_scale <= cap + EPS);
            last = c.handle_scale;
        }
        assert!((last - cap).abs() < EPS);
    }

    #[test]
    fn waist_thins_as_distance_approaches_max() {
        let a = circle(0.0, 0.0, 40.0);
        let waist = |d: f64| {
            let c = compute_connector(&a, &circle(d, 0.0, 40.0), params()).unwrap();
            let top = c.curves().next().unwrap();
            top.point_at(0.5).y.abs()
        };

        let mut last = f64::INFINITY;
        for d in [90.0, 120.0, 160.0, 220.0, 299.0] {
            let w = waist(d);
            assert!(w <= last + EPS, "waist grew at d={d}: {w} > {last}");
            last = w;
        }
        assert!(last < 40.0 * 0.2);
    }
}
