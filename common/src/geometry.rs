//! Geometric values exchanged with the geometry service.
//!
//! These are plain values: every record copies them in and never mutates them.
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result},
    ops::{Add, Mul, Neg, Sub},
};

use crate::BOGUS_D;

/// Addresses a single wire plane as a (cryostat, TPC, plane) triplet.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaneId {
    pub cryostat: u32,
    pub tpc: u32,
    pub plane: u32,
}

impl PlaneId {
    pub fn new(cryostat: u32, tpc: u32, plane: u32) -> Self {
        Self {
            cryostat,
            tpc,
            plane,
        }
    }
}

impl Display for PlaneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({},{},{})", self.cryostat, self.tpc, self.plane)
    }
}

/// A position in global detector coordinates [cm].
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Out-of-detector location written by legacy producers when no position was known.
    pub const SENTINEL: Point3 = Point3 {
        x: BOGUS_D,
        y: BOGUS_D,
        z: BOGUS_D,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl Display for Point3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// A displacement, direction or momentum in global detector coordinates.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn mag2(&self) -> f64 {
        self.dot(self)
    }

    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    /// Returns the vector scaled to unit length, or the vector itself if it is null.
    pub fn unit(&self) -> Vector3 {
        let mag = self.mag();
        if mag > 0.0 { *self * (1.0 / mag) } else { *self }
    }
}

impl Display for Vector3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

impl Sub for Point3 {
    type Output = Vector3;

    fn sub(self, rhs: Point3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vector3> for Point3 {
    type Output = Point3;

    fn add(self, rhs: Vector3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn plane_id_display() {
        assert_eq!(PlaneId::new(0, 1, 2).to_string(), "(0,1,2)");
    }

    #[test]
    fn unit_vector() {
        let v = Vector3::new(3.0, 0.0, 4.0).unit();
        assert_approx_eq!(v.mag(), 1.0);
        assert_approx_eq!(v.x, 0.6);
        assert_approx_eq!(v.z, 0.8);
    }

    #[test]
    fn null_vector_stays_null() {
        assert_eq!(Vector3::default().unit(), Vector3::default());
    }

    #[test]
    fn point_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(0.5, 0.5, 0.5);
        let d = a - b;
        assert_eq!(d, Vector3::new(0.5, 1.5, 2.5));
        assert_eq!(b + d, a);
    }

    #[test]
    fn sentinel_is_out_of_detector() {
        assert_eq!(Point3::SENTINEL.to_array(), [-999.0, -999.0, -999.0]);
    }
}
