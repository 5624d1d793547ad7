use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Axis {
    /// Mirror across a vertical line, flipping x.
    X,
    /// Mirror across a horizontal line, flipping y.
    Y,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn splat(v: f64) -> Point {
        Point { x: v, y: v }
    }

    /// Rotates around `origin`. Positive angles turn counter-clockwise as seen in KiCad,
    /// where the y axis points down.
    pub fn rotate(&self, angle_deg: f64, origin: Point) -> Point {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        Point {
            x: origin.x + dx * c + dy * s,
            y: origin.y - dx * s + dy * c,
        }
    }

    pub fn mirror(&self, axis: Axis, at: f64) -> Point {
        match axis {
            Axis::X => Point { x: 2.0 * at - self.x, y: self.y },
            Axis::Y => Point { x: self.x, y: 2.0 * at - self.y },
        }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn min(&self, other: Point) -> Point {
        Point { x: self.x.min(other.x), y: self.y.min(other.y) }
    }

    pub fn max(&self, other: Point) -> Point {
        Point { x: self.x.max(other.x), y: self.y.max(other.y) }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point { x: -self.x, y: -self.y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub min: Point,
    pub max: Point,
}

impl Outline {
    pub const ORIGIN: Outline = Outline { min: Point::ORIGIN, max: Point::ORIGIN };

    pub fn new(min: Point, max: Point) -> Outline {
        Outline { min: min.min(max), max: min.max(max) }
    }

    /// Box of `size` centered on `center`.
    pub fn centered(center: Point, size: Point) -> Outline {
        let half = size * 0.5;
        Outline::new(center - half, center + half)
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Outline> {
        points.into_iter().fold(None, |acc: Option<Outline>, p| match acc {
            None => Some(Outline { min: p, max: p }),
            Some(o) => Some(Outline { min: o.min.min(p), max: o.max.max(p) }),
        })
    }

    pub fn union(&self, other: &Outline) -> Outline {
        Outline { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn translate(&self, by: Point) -> Outline {
        Outline { min: self.min + by, max: self.max + by }
    }

    pub fn expand(&self, margin: f64) -> Outline {
        Outline::new(self.min - Point::splat(margin), self.max + Point::splat(margin))
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn transformed(&self, transform: &Affine) -> Outline {
        let corners = self.corners().map(|c| transform.apply(c));
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }
        Outline { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
}

/// Linear part `m` (row-major) plus translation `t`: `p' = m·p + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    m: [[f64; 2]; 2],
    t: Point,
}

impl Default for Affine {
    fn default() -> Self {
        Affine::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { m: [[1.0, 0.0], [0.0, 1.0]], t: Point::ORIGIN };

    pub fn translation(offset: Point) -> Affine {
        Affine { t: offset, ..Affine::IDENTITY }
    }

    pub fn rotation(angle_deg: f64) -> Affine {
        let (s, c) = angle_deg.to_radians().sin_cos();
        Affine { m: [[c, s], [-s, c]], t: Point::ORIGIN }
    }

    pub fn mirror(axis: Axis, at: f64) -> Affine {
        match axis {
            Axis::X => Affine { m: [[-1.0, 0.0], [0.0, 1.0]], t: Point::new(2.0 * at, 0.0) },
            Axis::Y => Affine { m: [[1.0, 0.0], [0.0, -1.0]], t: Point::new(0.0, 2.0 * at) },
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.m[0][0] * p.x + self.m[0][1] * p.y + self.t.x,
            y: self.m[1][0] * p.x + self.m[1][1] * p.y + self.t.y,
        }
    }

    fn apply_linear(&self, p: Point) -> Point {
        Point {
            x: self.m[0][0] * p.x + self.m[0][1] * p.y,
            y: self.m[1][0] * p.x + self.m[1][1] * p.y,
        }
    }

    /// `self` first, then `outer`.
    pub fn then(&self, outer: &Affine) -> Affine {
        let a = &outer.m;
        let b = &self.m;
        Affine {
            m: [
                [a[0][0] * b[0][0] + a[0][1] * b[1][0], a[0][0] * b[0][1] + a[0][1] * b[1][1]],
                [a[1][0] * b[0][0] + a[1][1] * b[1][0], a[1][0] * b[0][1] + a[1][1] * b[1][1]],
            ],
            t: outer.apply(self.t),
        }
    }

    /// Maps an orientation given in degrees through the linear part.
    pub fn map_angle(&self, angle_deg: f64) -> f64 {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let v = self.apply_linear(Point::new(c, -s));
        normalize_angle((-v.y).atan2(v.x).to_degrees())
    }

    pub fn is_mirrored(&self) -> bool {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0] < 0.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Affine::IDENTITY
    }
}

/// Brings an angle into (-180, 180], snapping float noise to zero.
pub fn normalize_angle(angle_deg: f64) -> f64 {
    let mut a = angle_deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    if a.abs() < 1e-9 { 0.0 } else { a }
}

/// Rounds away from zero onto `grid`, the way courtyards are snapped.
pub fn round_to_grid(value: f64, grid: f64) -> f64 {
    if value > 0.0 {
        (value / grid - 1e-9).ceil() * grid
    } else {
        (value / grid + 1e-9).floor() * grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotate_is_counter_clockwise_in_kicad_frame() {
        let p = Point::new(1.0, 0.0).rotate(90.0, Point::ORIGIN);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn rotate_around_origin_point() {
        let p = Point::new(2.0, 1.0).rotate(180.0, Point::new(1.0, 1.0));
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn mirror_flips_selected_axis() {
        assert_eq!(Point::new(3.0, 2.0).mirror(Axis::X, 1.0), Point::new(-1.0, 2.0));
        assert_eq!(Point::new(3.0, 2.0).mirror(Axis::Y, 0.0), Point::new(3.0, -2.0));
    }

    #[test]
    fn affine_rotation_matches_point_rotation() {
        let p = Point::new(1.5, -0.5);
        let a = Affine::rotation(30.0).apply(p);
        let b = p.rotate(30.0, Point::ORIGIN);
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
    }

    #[test]
    fn affine_composition_applies_inner_first() {
        let inner = Affine::translation(Point::new(1.0, 0.0));
        let outer = Affine::rotation(90.0);
        let p = inner.then(&outer).apply(Point::ORIGIN);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn map_angle_accounts_for_mirroring() {
        assert_abs_diff_eq!(Affine::rotation(90.0).map_angle(45.0), 135.0, epsilon = 1e-9);
        let mirrored = Affine::mirror(Axis::X, 0.0);
        assert!(mirrored.is_mirrored());
        assert_abs_diff_eq!(mirrored.map_angle(30.0), 150.0, epsilon = 1e-9);
    }

    #[test]
    fn outline_of_rotated_box() {
        let o = Outline::centered(Point::ORIGIN, Point::new(4.0, 2.0)).transformed(&Affine::rotation(90.0));
        assert_abs_diff_eq!(o.min.x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(o.max.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn courtyard_rounding_moves_away_from_zero() {
        assert_abs_diff_eq!(round_to_grid(1.23, 0.1), 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(round_to_grid(-1.23, 0.1), -1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(round_to_grid(1.2, 0.1), 1.2, epsilon = 1e-9);
    }
}
