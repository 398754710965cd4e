//! 3D point type for LiDAR returns.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// A single LiDAR return in sensor units (f64).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate (height)
    pub z: f64,
}

impl Point3D {
    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Origin (0, 0, 0)
    pub const ZERO: Point3D = Point3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Dot product (as vectors)
    #[inline]
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (as vectors)
    #[inline]
    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length as a vector from the origin
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// True if every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Point3D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Point3D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Point3D::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f64; 3]> for Point3D {
    #[inline]
    fn from([x, y, z]: [f64; 3]) -> Self {
        Point3D::new(x, y, z)
    }
}

/// Translate a run of points so that `origin` becomes (0, 0, 0).
pub fn translate_to_origin(points: &[Point3D], origin: Point3D) -> Vec<Point3D> {
    points.iter().map(|&p| p - origin).collect()
}

/// Extract the z values of a point run.
pub fn heights(points: &[Point3D]) -> Vec<f64> {
    points.iter().map(|p| p.z).collect()
}
