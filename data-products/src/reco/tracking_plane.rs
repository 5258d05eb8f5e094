//! Conversion of track parameters between a measurement plane and global coordinates.
//!
//! On a plane the track state is the 5-vector `(u, v, du/dw, dv/dw, 1/p)`, where `u`, `v` are
//! coordinates on the plane and `w` is along its normal. Globally it is the 6-vector
//! `(x, y, z, px, py, pz)`. The plane frame is obtained from the global one by a rotation of
//! `beta` about x followed by `alpha` about the new y axis.
//!
//! All functions are total: degenerate input (a track parallel to the plane, a null
//! momentum) yields non-finite numbers rather than an error.
use lardata_common::{Point3, Vector3};
use ndarray::{Array2, arr2};
use serde::{Deserialize, Serialize};

/// `(u, v, du/dw, dv/dw, 1/p)`.
pub type LocalParameters = [f64; 5];
/// `(x, y, z, px, py, pz)`.
pub type GlobalParameters = [f64; 6];

#[derive(Default, Clone, Copy, Debug, PartialEq)]
struct TrigCache {
    cos_alpha: f64,
    sin_alpha: f64,
    cos_beta: f64,
    sin_beta: f64,
}

impl TrigCache {
    /// `direction` must be a unit vector.
    fn new(direction: &Vector3) -> Self {
        let dir_yz = direction.y.hypot(direction.z);
        let (cos_beta, sin_beta) = if dir_yz != 0.0 {
            (direction.z / dir_yz, -direction.y / dir_yz)
        } else {
            (1.0, 0.0)
        };
        Self {
            cos_alpha: dir_yz,
            sin_alpha: direction.x,
            cos_beta,
            sin_beta,
        }
    }
}

/// A measurement plane through `position` with unit normal `direction`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaneDescription", into = "PlaneDescription")]
pub struct Plane {
    position: Point3,
    direction: Vector3,
    trig: TrigCache,
}

#[derive(Clone, Serialize, Deserialize)]
struct PlaneDescription {
    position: Point3,
    direction: Vector3,
}

impl From<PlaneDescription> for Plane {
    fn from(value: PlaneDescription) -> Self {
        Plane::new(value.position, value.direction)
    }
}

impl From<Plane> for PlaneDescription {
    fn from(value: Plane) -> Self {
        Self {
            position: value.position,
            direction: value.direction,
        }
    }
}

impl Plane {
    /// The direction is normalised. A null direction leaves the frame degenerate.
    pub fn new(position: Point3, direction: Vector3) -> Self {
        let direction = direction.unit();
        Self {
            position,
            direction,
            trig: TrigCache::new(&direction),
        }
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn cos_alpha(&self) -> f64 {
        self.trig.cos_alpha
    }

    pub fn sin_alpha(&self) -> f64 {
        self.trig.sin_alpha
    }

    pub fn cos_beta(&self) -> f64 {
        self.trig.cos_beta
    }

    pub fn sin_beta(&self) -> f64 {
        self.trig.sin_beta
    }

    /// Components of `vector` along (u, v, w).
    fn to_local(&self, vector: &Vector3) -> (f64, f64, f64) {
        let TrigCache {
            cos_alpha: ca,
            sin_alpha: sa,
            cos_beta: cb,
            sin_beta: sb,
        } = self.trig;
        (
            vector.x * ca + vector.y * sa * sb - vector.z * sa * cb,
            vector.y * cb + vector.z * sb,
            vector.x * sa - vector.y * ca * sb + vector.z * ca * cb,
        )
    }

    /// #Arguments
    /// * `par5` - the state on the plane.
    /// * `track_along_plane_dir` - whether the momentum points along the plane normal;
    ///   the local parameters cannot tell.
    pub fn local5d_to_global6d(
        &self,
        par5: &LocalParameters,
        track_along_plane_dir: bool,
    ) -> GlobalParameters {
        let TrigCache {
            cos_alpha: ca,
            sin_alpha: sa,
            cos_beta: cb,
            sin_beta: sb,
        } = self.trig;
        let [u, v, dudw, dvdw, qop] = *par5;
        let norm = qop * (1.0 + dudw * dudw + dvdw * dvdw).sqrt();
        let denom = if track_along_plane_dir { norm } else { -norm };
        let pos = self.position;
        [
            pos.x + u * ca,
            pos.y + u * sa * sb + v * cb,
            pos.z - u * sa * cb + v * sb,
            (dudw * ca + sa) / denom,
            (dudw * sa * sb + dvdw * cb - ca * sb) / denom,
            (-dudw * sa * cb + dvdw * sb + ca * cb) / denom,
        ]
    }

    /// Projects a global state onto the plane. A null momentum gives `1/p = 1`.
    pub fn global6d_to_local5d(&self, par6: &GlobalParameters) -> LocalParameters {
        let [x, y, z, px, py, pz] = *par6;
        let momentum = Vector3::new(px, py, pz);
        let (pu, pv, pw) = self.to_local(&momentum);
        let (u, v, _) = self.to_local(&(Point3::new(x, y, z) - self.position));
        let p = momentum.mag();
        [u, v, pu / pw, pv / pw, if p > 0.0 { 1.0 / p } else { 1.0 }]
    }

    /// d(global)/d(local), 6x5.
    ///
    /// Without momentum `mom_or_dir` is the track direction and the `1/p` column is zero.
    pub fn local5d_to_global6d_jacobian(
        &self,
        has_momentum: bool,
        mom_or_dir: &Vector3,
    ) -> Array2<f64> {
        let TrigCache {
            cos_alpha: ca,
            sin_alpha: sa,
            cos_beta: cb,
            sin_beta: sb,
        } = self.trig;
        let along = mom_or_dir.dot(&self.direction) > 0.0;
        let (pu, pv, pw) = self.to_local(mom_or_dir);
        let l2 = pu / pw;
        let l3 = pv / pw;
        let l4 = if has_momentum {
            1.0 / mom_or_dir.mag()
        } else {
            1.0
        };
        let slope2 = l2 * l2 + l3 * l3 + 1.0;
        let den23 = l4 * slope2 * slope2.sqrt() * if along { 1.0 } else { -1.0 };
        let den4 = l4 * l4 * slope2.sqrt();
        let qop_column = |value: f64| if has_momentum { value / den4 } else { 0.0 };
        arr2(&[
            [ca, 0.0, 0.0, 0.0, 0.0],
            [sa * sb, cb, 0.0, 0.0, 0.0],
            [-sa * cb, sb, 0.0, 0.0, 0.0],
            [
                0.0,
                0.0,
                (ca * (l3 * l3 + 1.0) - sa * l2) / den23,
                -l3 * (l2 * ca + sa) / den23,
                qop_column(-(l2 * ca + sa)),
            ],
            [
                0.0,
                0.0,
                (ca * sb * l2 - cb * l2 * l3 + sa * sb * (l3 * l3 + 1.0)) / den23,
                (sb * l3 * (ca - sa * l2) + cb * (l2 * l2 + 1.0)) / den23,
                qop_column(ca * sb - cb * l3 - sa * sb * l2),
            ],
            [
                0.0,
                0.0,
                -(ca * cb * l2 + cb * sa * l3 * l3 + cb * sa + sb * l2 * l3) / den23,
                (-ca * cb * l3 + cb * sa * l2 * l3 + sb * l2 * l2 + sb) / den23,
                qop_column(-ca * cb + cb * sa * l2 - sb * l3),
            ],
        ])
    }

    /// d(local)/d(global), 5x6.
    pub fn global6d_to_local5d_jacobian(
        &self,
        has_momentum: bool,
        mom_or_dir: &Vector3,
    ) -> Array2<f64> {
        let TrigCache {
            cos_alpha: ca,
            sin_alpha: sa,
            cos_beta: cb,
            sin_beta: sb,
        } = self.trig;
        let Vector3 { x, y, z } = *mom_or_dir;
        let pw = ca * (cb * z - sb * y) + sa * x;
        let den23 = pw * pw;
        let den4 = mom_or_dir.mag() * mom_or_dir.mag2();
        let norm_a = ca * ca + sa * sa;
        let norm_b = cb * cb + sb * sb;
        let qop_row = |value: f64| if has_momentum { -value / den4 } else { 0.0 };
        arr2(&[
            [ca, sa * sb, -sa * cb, 0.0, 0.0, 0.0],
            [0.0, cb, sb, 0.0, 0.0, 0.0],
            [
                0.0,
                0.0,
                0.0,
                norm_a * (cb * z - sb * y) / den23,
                sb * x * norm_a / den23,
                -cb * x * norm_a / den23,
            ],
            [
                0.0,
                0.0,
                0.0,
                -sa * (cb * y + sb * z) / den23,
                (ca * z * norm_b + cb * sa * x) / den23,
                (-ca * y * norm_b + sa * sb * x) / den23,
            ],
            [0.0, 0.0, 0.0, qop_row(x), qop_row(y), qop_row(z)],
        ])
    }

    /// Rotates global vectors into (u, v, w).
    pub fn global3d_to_local3d_rotation(&self) -> Array2<f64> {
        let TrigCache {
            cos_alpha: ca,
            sin_alpha: sa,
            cos_beta: cb,
            sin_beta: sb,
        } = self.trig;
        arr2(&[
            [ca, sa * sb, -sa * cb],
            [0.0, cb, sb],
            [sa, -ca * sb, ca * cb],
        ])
    }

    /// Inverse (and transpose) of [Self::global3d_to_local3d_rotation].
    pub fn local3d_to_global3d_rotation(&self) -> Array2<f64> {
        let TrigCache {
            cos_alpha: ca,
            sin_alpha: sa,
            cos_beta: cb,
            sin_beta: sb,
        } = self.trig;
        arr2(&[
            [ca, 0.0, sa],
            [sa * sb, cb, -ca * sb],
            [-sa * cb, sb, ca * cb],
        ])
    }

    /// Propagates a 5x5 local covariance to the 6x6 global one as `J C Jᵀ`.
    pub fn local5d_to_global6d_covariance(
        &self,
        covariance: &[[f64; 5]; 5],
        has_momentum: bool,
        mom_or_dir: &Vector3,
    ) -> Array2<f64> {
        let jacobian = self.local5d_to_global6d_jacobian(has_momentum, mom_or_dir);
        jacobian.dot(&arr2(covariance)).dot(&jacobian.t())
    }

    /// Propagates a 6x6 global covariance to the 5x5 local one as `J C Jᵀ`.
    pub fn global6d_to_local5d_covariance(
        &self,
        covariance: &[[f64; 6]; 6],
        has_momentum: bool,
        mom_or_dir: &Vector3,
    ) -> Array2<f64> {
        let jacobian = self.global6d_to_local5d_jacobian(has_momentum, mom_or_dir);
        jacobian.dot(&arr2(covariance)).dot(&jacobian.t())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const TOLERANCE: f64 = 1e-9;

    fn tilted() -> Plane {
        Plane::new(Point3::new(1.0, -2.0, 5.0), Vector3::new(0.3, -0.4, 0.86))
    }

    fn assert_identity(matrix: &Array2<f64>) {
        let identity = Array2::<f64>::eye(matrix.nrows());
        for (found, expected) in matrix.iter().zip(identity.iter()) {
            assert_approx_eq!(found, expected, TOLERANCE);
        }
    }

    #[test]
    fn plane_normal_to_z() {
        let plane = Plane::new(Point3::default(), Vector3::new(0.0, 0.0, 1.0));
        let global = plane.local5d_to_global6d(&[1.0, 2.0, 0.0, 0.0, 0.5], true);
        let expected = [1.0, 2.0, 0.0, 0.0, 0.0, 2.0];
        for (found, expected) in global.iter().zip(expected) {
            assert_approx_eq!(found, expected, TOLERANCE);
        }
    }

    #[test]
    fn direction_is_normalised() {
        let plane = Plane::new(Point3::default(), Vector3::new(0.0, 0.0, 4.0));
        assert_eq!(plane.direction(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(plane.cos_alpha(), 1.0);
        assert_eq!(plane.sin_alpha(), 0.0);
        assert_eq!(plane.cos_beta(), 1.0);
        assert_eq!(plane.sin_beta(), 0.0);
    }

    #[test]
    fn normal_along_x() {
        let plane = Plane::new(Point3::default(), Vector3::new(2.0, 0.0, 0.0));
        assert_approx_eq!(plane.cos_alpha(), 0.0);
        assert_approx_eq!(plane.sin_alpha(), 1.0);
        assert_eq!(plane.cos_beta(), 1.0);
        assert_eq!(plane.sin_beta(), 0.0);
    }

    #[test]
    fn round_trip() {
        let plane = tilted();
        let local = [0.7, -1.2, 0.25, -0.4, 0.8];
        let global = plane.local5d_to_global6d(&local, true);
        let back = plane.global6d_to_local5d(&global);
        for (found, expected) in back.iter().zip(local) {
            assert_approx_eq!(found, expected, TOLERANCE);
        }
    }

    #[test]
    fn backwards_track_flips_momentum() {
        let plane = tilted();
        let local = [0.0, 0.0, 0.1, 0.2, 1.0];
        let [.., fx, fy, fz] = plane.local5d_to_global6d(&local, true);
        let [.., bx, by, bz] = plane.local5d_to_global6d(&local, false);
        assert_approx_eq!(fx, -bx);
        assert_approx_eq!(fy, -by);
        assert_approx_eq!(fz, -bz);
        assert!(Vector3::new(fx, fy, fz).dot(&plane.direction()) > 0.0);
    }

    #[test]
    fn null_momentum_projects_to_unit_inverse_momentum() {
        let plane = tilted();
        let [.., qop] = plane.global6d_to_local5d(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(qop, 1.0);
    }

    #[test]
    fn jacobians_are_inverse() {
        let plane = tilted();
        let [.., px, py, pz] = plane.local5d_to_global6d(&[0.7, -1.2, 0.25, -0.4, 0.8], true);
        let momentum = Vector3::new(px, py, pz);
        let forward = plane.local5d_to_global6d_jacobian(true, &momentum);
        let backward = plane.global6d_to_local5d_jacobian(true, &momentum);
        assert_eq!(forward.dim(), (6, 5));
        assert_eq!(backward.dim(), (5, 6));
        assert_identity(&backward.dot(&forward));
    }

    #[test]
    fn direction_only_jacobian_drops_momentum() {
        let plane = tilted();
        let direction = Vector3::new(0.2, 0.1, 0.9).unit();
        let forward = plane.local5d_to_global6d_jacobian(false, &direction);
        let backward = plane.global6d_to_local5d_jacobian(false, &direction);
        assert!(forward.column(4).iter().all(|v| *v == 0.0));
        assert!(backward.row(4).iter().all(|v| *v == 0.0));

        let product = backward.dot(&forward);
        assert_identity(&product.slice(ndarray::s![0..4, 0..4]).to_owned());
    }

    #[test]
    fn rotations_are_inverse() {
        let plane = tilted();
        let to_local = plane.global3d_to_local3d_rotation();
        assert_identity(&plane.local3d_to_global3d_rotation().dot(&to_local));

        let normal = plane.direction();
        let w = to_local.dot(&ndarray::arr1(&normal.to_array()));
        assert_approx_eq!(w[0], 0.0, TOLERANCE);
        assert_approx_eq!(w[1], 0.0, TOLERANCE);
        assert_approx_eq!(w[2], 1.0, TOLERANCE);
    }

    #[test]
    fn covariance_propagation() {
        let plane = Plane::new(Point3::default(), Vector3::new(0.0, 0.0, 1.0));
        let mut covariance = [[0.0; 5]; 5];
        for (i, row) in covariance.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        let global =
            plane.local5d_to_global6d_covariance(&covariance, true, &Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(global.dim(), (6, 6));
        assert_approx_eq!(global[[0, 0]], 1.0, TOLERANCE);
        assert_approx_eq!(global[[1, 1]], 1.0, TOLERANCE);
        assert_approx_eq!(global[[2, 2]], 0.0, TOLERANCE);
        for (a, b) in global.iter().zip(global.t().iter()) {
            assert_approx_eq!(a, b, TOLERANCE);
        }
    }

    #[test]
    fn json_keeps_plane_geometry() {
        let plane = tilted();
        let json = serde_json::to_string(&plane).unwrap();
        let decoded: Plane = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.position(), plane.position());
        assert_approx_eq!(decoded.cos_alpha(), plane.cos_alpha(), TOLERANCE);
        assert_approx_eq!(decoded.sin_beta(), plane.sin_beta(), TOLERANCE);
    }
}
