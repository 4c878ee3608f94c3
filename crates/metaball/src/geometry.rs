use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing along `angle` (radians).
    pub fn from_polar(angle: f64, length: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos * length, sin * length)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Reflects the point across the line through `a` and `b`.
    pub fn mirror_across(self, a: Self, b: Self) -> Self {
        let axis = b - a;
        let len_sq = axis.x * axis.x + axis.y * axis.y;
        if len_sq == 0.0 {
            return self;
        }
        let rel = self - a;
        let t = (rel.x * axis.x + rel.y * axis.y) / len_sq;
        let foot = a + axis * t;
        foot + (foot - self)
    }

    pub fn normalize(self, size: Size) -> NormalizedPoint {
        NormalizedPoint::new(self.x / size.width, self.y / size.height)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Position expressed as fractions of the surface size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pixels(self, size: Size) -> Point {
        Point::new(self.x * size.width, self.y * size.height)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// A circle with no visual extent cannot take part in a blend.
    pub fn is_degenerate(&self) -> bool {
        self.radius.is_nan() || self.radius <= 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// Axis-aligned rectangle with its top-left corner at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.origin.x..=self.origin.x + self.size.width).contains(&point.x)
            && (self.origin.y..=self.origin.y + self.size.height).contains(&point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicBezier {
    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.from.x + b * self.ctrl1.x + c * self.ctrl2.x + d * self.to.x,
            a * self.from.y + b * self.ctrl1.y + c * self.ctrl2.y + d * self.to.y,
        )
    }

    pub fn is_straight(&self) -> bool {
        self.ctrl1 == self.from && self.ctrl2 == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn polar_construction_matches_angle_and_length() {
        let p = Point::from_polar(FRAC_PI_2, 3.0);
        assert!(approx(p, Point::new(0.0, 3.0)));
        assert!((p.length() - 3.0).abs() < 1e-12);
        assert!((p.angle() - FRAC_PI_2).abs() < 1e-12);

        let back = Point::from_polar(PI, 2.0);
        assert!(approx(back, Point::new(-2.0, 0.0)));
    }

    #[test]
    fn mirror_across_horizontal_axis_flips_y() {
        let p = Point::new(3.0, 7.0);
        let m = p.mirror_across(Point::new(0.0, 2.0), Point::new(10.0, 2.0));
        assert!(approx(m, Point::new(3.0, -3.0)));
    }

    #[test]
    fn normalized_points_scale_with_surface() {
        let n = NormalizedPoint::new(0.25, 0.5);
        let size = Size::new(800.0, 600.0);
        assert_eq!(n.to_pixels(size), Point::new(200.0, 300.0));
        assert_eq!(n.to_pixels(size.scale(2.0)), Point::new(400.0, 600.0));
        assert_eq!(Point::new(200.0, 300.0).normalize(size), n);
    }

    #[test]
    fn zero_and_nan_radius_are_degenerate() {
        assert!(Circle::new(Point::ORIGIN, 0.0).is_degenerate());
        assert!(Circle::new(Point::ORIGIN, f64::NAN).is_degenerate());
        assert!(!Circle::new(Point::ORIGIN, 1.0).is_degenerate());
    }

    #[test]
    fn rect_contains_its_edges_only() {
        let rect = Rect::new(Point::new(10.0, 20.0), Size::new(30.0, 5.0));
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(40.0, 25.0)));
        assert!(!rect.contains(Point::new(40.5, 22.0)));
        assert!(!rect.contains(Point::new(20.0, 19.0)));
    }

    #[test]
    fn bezier_endpoints_and_midpoint() {
        let curve = CubicBezier {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(0.0, 4.0),
            ctrl2: Point::new(4.0, 4.0),
            to: Point::new(4.0, 0.0),
        };
        assert!(approx(curve.point_at(0.0), curve.from));
        assert!(approx(curve.point_at(1.0), curve.to));
        assert!(approx(curve.point_at(0.5), Point::new(2.0, 3.0)));
        assert!(!curve.is_straight());
    }
}
