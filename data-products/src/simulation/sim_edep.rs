use lardata_common::{NO_PARTICLE_ID, Point3, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Energy deposited by a simulated particle, tagged with its species.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimEDep {
    time: f64,
    position: Option<Point3>,
    energy: f64,
    track_id: Option<TrackId>,
    pdg_code: i32,
}

impl SimEDep {
    pub fn new(
        position: Point3,
        time: f64,
        energy: f64,
        track_id: TrackId,
        pdg_code: i32,
    ) -> Self {
        Self {
            time,
            position: Some(position),
            energy,
            track_id: Some(track_id),
            pdg_code,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn position(&self) -> Option<Point3> {
        self.position
    }

    pub fn position_or_sentinel(&self) -> Point3 {
        self.position.unwrap_or(Point3::SENTINEL)
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn track_id(&self) -> Option<TrackId> {
        self.track_id
    }

    pub fn track_id_or_sentinel(&self) -> TrackId {
        self.track_id.unwrap_or(NO_PARTICLE_ID)
    }

    /// Zero when the species is unknown.
    pub fn pdg_code(&self) -> i32 {
        self.pdg_code
    }
}

impl Display for SimEDep {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "SimEDep: {} at {} t={} from track {} (PDG {})",
            self.energy,
            self.position_or_sentinel(),
            self.time,
            self.track_id_or_sentinel(),
            self.pdg_code
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_unset() {
        let edep = SimEDep::default();
        assert_eq!(edep.time(), 0.0);
        assert_eq!(edep.position(), None);
        assert_eq!(edep.position_or_sentinel(), Point3::SENTINEL);
        assert_eq!(edep.energy(), 0.0);
        assert_eq!(edep.track_id(), None);
        assert_eq!(edep.track_id_or_sentinel(), NO_PARTICLE_ID);
        assert_eq!(edep.pdg_code(), 0);
    }

    #[test]
    fn fields_are_copied() {
        let edep = SimEDep::new(Point3::new(0.5, 1.5, 2.5), 10.0, 0.25, 4, 11);
        assert_eq!(edep.position(), Some(Point3::new(0.5, 1.5, 2.5)));
        assert_eq!(edep.track_id(), Some(4));
        assert_eq!(edep.pdg_code(), 11);
        assert_eq!(
            edep.to_string(),
            "SimEDep: 0.25 at (0.5,1.5,2.5) t=10 from track 4 (PDG 11)\n"
        );
    }

    #[test]
    fn json_omits_nothing() {
        let edep = SimEDep::new(Point3::new(0.5, 1.5, 2.5), 10.0, 0.25, 4, 11);
        let json = serde_json::to_string(&edep).unwrap();
        assert_eq!(serde_json::from_str::<SimEDep>(&json).unwrap(), edep);
        assert_eq!(serde_json::from_str::<SimEDep>("{}").unwrap(), SimEDep::default());
    }
}
