use lardata_common::{Point3, TrackId};
use serde::{Deserialize, Serialize};

/// What one simulated track left on a channel within one tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Deposit {
    pub track_id: TrackId,
    /// Electrons or photons collected; may be fractional.
    pub quantity: f64,
    /// [MeV]
    pub energy: f64,
    /// Where the energy was released [cm].
    pub position: Point3,
}

impl Deposit {
    pub(crate) fn with_offset(&self, offset: TrackId) -> Self {
        Self {
            track_id: self.track_id.saturating_add(offset),
            ..*self
        }
    }

    /// Folds `other` into this one: quantity and energy add up, the position becomes the
    /// quantity-weighted mean. Without any quantity the first position is kept.
    pub(crate) fn accumulate(&mut self, other: &Deposit) {
        let (own_weight, other_weight) = (self.quantity, other.quantity);
        let weight = own_weight + other_weight;
        if weight > 0.0 {
            let mean =
                |mine: f64, theirs: f64| (mine * own_weight + theirs * other_weight) / weight;
            self.position = Point3::new(
                mean(self.position.x, other.position.x),
                mean(self.position.y, other.position.y),
                mean(self.position.z, other.position.z),
            );
        }
        self.quantity = weight;
        self.energy += other.energy;
    }
}

/// Energy a track contributed within a tick window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackShare {
    pub track_id: TrackId,
    /// Relative to all tracks in the window.
    pub energy_fraction: f64,
    pub energy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn deposit(quantity: f64, x: f64) -> Deposit {
        Deposit {
            track_id: 1,
            quantity,
            energy: 0.5,
            position: Point3::new(x, 2.0, -1.0),
        }
    }

    #[test]
    fn weighted_position() {
        let mut summary = deposit(1.0, 0.0);
        summary.accumulate(&deposit(3.0, 4.0));
        assert_approx_eq!(summary.quantity, 4.0);
        assert_approx_eq!(summary.energy, 1.0);
        assert_approx_eq!(summary.position.x, 3.0);
        assert_approx_eq!(summary.position.y, 2.0);
        assert_approx_eq!(summary.position.z, -1.0);
    }

    #[test]
    fn no_quantity_keeps_first_position() {
        let mut summary = deposit(0.0, 1.0);
        summary.accumulate(&deposit(0.0, 5.0));
        assert_eq!(summary.position.x, 1.0);
        assert!(summary.position.x.is_finite());
    }

    #[test]
    fn offset_saturates() {
        let shifted = deposit(1.0, 0.0).with_offset(100);
        assert_eq!(shifted.track_id, 101);
        let saturated = deposit(1.0, 0.0).with_offset(TrackId::MAX);
        assert_eq!(saturated.track_id, TrackId::MAX);
    }
}
