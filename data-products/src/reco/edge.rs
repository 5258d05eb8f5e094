use super::space_point::{SpacePoint, SpacePointId, find_by_id};
use lardata_common::BOGUS_I;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result},
};

pub type EdgeId = i32;

/// A straight connection between two space points.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Edge {
    /// [cm]
    length: f64,
    #[serde(default)]
    first_point_id: Option<SpacePointId>,
    #[serde(default)]
    second_point_id: Option<SpacePointId>,
    #[serde(default)]
    id: Option<EdgeId>,
}

impl Edge {
    pub const INVALID_ID: EdgeId = BOGUS_I;

    pub fn new(
        length: f64,
        first_point_id: SpacePointId,
        second_point_id: SpacePointId,
        id: Option<EdgeId>,
    ) -> Self {
        Self {
            length,
            first_point_id: Some(first_point_id),
            second_point_id: Some(second_point_id),
            id,
        }
    }

    /// Connects two points, taking the length from their separation.
    pub fn from_points(first: &SpacePoint, second: &SpacePoint, id: Option<EdgeId>) -> Self {
        Self {
            length: (second.xyz() - first.xyz()).mag(),
            first_point_id: first.id(),
            second_point_id: second.id(),
            id,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn first_point_id(&self) -> SpacePointId {
        self.first_point_id.unwrap_or(SpacePoint::INVALID_ID)
    }

    pub fn second_point_id(&self) -> SpacePointId {
        self.second_point_id.unwrap_or(SpacePoint::INVALID_ID)
    }

    pub fn id(&self) -> Option<EdgeId> {
        self.id
    }

    pub fn id_or_invalid(&self) -> EdgeId {
        self.id.unwrap_or(Self::INVALID_ID)
    }

    /// Looks up both end points in a slice sorted by space point ID.
    pub fn end_points<'a>(
        &self,
        points: &'a [SpacePoint],
    ) -> (Option<&'a SpacePoint>, Option<&'a SpacePoint>) {
        let find = |id: Option<SpacePointId>| id.and_then(|id| find_by_id(points, id));
        (find(self.first_point_id), find(self.second_point_id))
    }

    /// Strictly shorter than `other`.
    pub fn precedes(&self, other: &Self) -> bool {
        self.length < other.length
    }

    /// Total order on length, suitable for `sort_by`.
    pub fn cmp_by_length(&self, other: &Self) -> Ordering {
        self.length.total_cmp(&other.length)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            " Edge ID {} has length {:6.2} cm",
            self.id_or_invalid(),
            self.length
        )?;
        writeln!(
            f,
            "   - First Point ID: {}, second point ID: {}",
            self.first_point_id(),
            self.second_point_id()
        )
    }
}
