use lardata_common::{BOGUS_I, Point3};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result},
};

pub type SpacePointId = i32;

/// A reconstructed 3D point with its uncertainty.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpacePoint {
    #[serde(default)]
    id: Option<SpacePointId>,
    xyz: Point3,
    /// Lower triangle of the position covariance matrix.
    err_xyz: [f64; 6],
    chisq: f64,
}

impl SpacePoint {
    /// Identifier legacy producers write for a point without an ID.
    pub const INVALID_ID: SpacePointId = BOGUS_I;

    pub fn new(xyz: Point3, err_xyz: [f64; 6], chisq: f64, id: Option<SpacePointId>) -> Self {
        Self {
            id,
            xyz,
            err_xyz,
            chisq,
        }
    }

    pub fn id(&self) -> Option<SpacePointId> {
        self.id
    }

    pub fn id_or_invalid(&self) -> SpacePointId {
        self.id.unwrap_or(Self::INVALID_ID)
    }

    pub fn xyz(&self) -> Point3 {
        self.xyz
    }

    pub fn err_xyz(&self) -> &[f64; 6] {
        &self.err_xyz
    }

    pub fn chisq(&self) -> f64 {
        self.chisq
    }

    /// Strict ordering by ID; points without an ID sort as [Self::INVALID_ID].
    pub fn precedes(&self, other: &Self) -> bool {
        self.id_or_invalid() < other.id_or_invalid()
    }

    pub fn cmp_by_id(&self, other: &Self) -> Ordering {
        self.id_or_invalid().cmp(&other.id_or_invalid())
    }

    /// Compares this point against a bare ID, for searching a slice sorted with [Self::cmp_by_id].
    pub fn cmp_to_id(&self, id: SpacePointId) -> Ordering {
        self.id_or_invalid().cmp(&id)
    }
}

/// Finds the point with the given ID in a slice sorted by ID.
pub fn find_by_id(points: &[SpacePoint], id: SpacePointId) -> Option<&SpacePoint> {
    points
        .binary_search_by(|point| point.cmp_to_id(id))
        .ok()
        .and_then(|index| points.get(index))
}

impl Display for SpacePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            " SpacePoint ID {:>5} (X,Y,Z) = ({:>5.2} , {:>5.2} , {:>5.2})",
            self.id_or_invalid(),
            self.xyz.x,
            self.xyz.y,
            self.xyz.z
        )
    }
}
