use lardata_common::{Point3, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// A single step of energy loss recorded by the detector simulation.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimEnergyDeposit {
    /// Scintillation photons produced.
    num_photons: i32,
    /// [GeV]
    energy: f64,
    /// [mm]
    position: Point3,
    /// [ns]
    time: f64,
    track_id: TrackId,
}

impl SimEnergyDeposit {
    pub fn new(
        num_photons: i32,
        energy: f64,
        position: Point3,
        time: f64,
        track_id: TrackId,
    ) -> Self {
        Self {
            num_photons,
            energy,
            position,
            time,
            track_id,
        }
    }

    pub fn num_photons(&self) -> i32 {
        self.num_photons
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    /// `(x, y, z, t)`.
    pub fn four_position(&self) -> [f64; 4] {
        let Point3 { x, y, z } = self.position;
        [x, y, z, self.time]
    }
}

impl Display for SimEnergyDeposit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "Deposit of {} GeV at {} t={} ns by track {} ({} photons)",
            self.energy, self.position, self.time, self.track_id, self.num_photons
        )
    }
}
