use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Energy left in a detector volume and the quanta it liberated.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnergyDeposition {
    deposited_energy: f64,
    num_electrons: i32,
    num_photons: i32,
}

impl EnergyDeposition {
    pub fn new(deposited_energy: f64, num_electrons: i32, num_photons: i32) -> Self {
        Self {
            deposited_energy,
            num_electrons,
            num_photons,
        }
    }

    pub fn deposited_energy(&self) -> f64 {
        self.deposited_energy
    }

    pub fn num_electrons(&self) -> i32 {
        self.num_electrons
    }

    pub fn num_photons(&self) -> i32 {
        self.num_photons
    }
}

impl Display for EnergyDeposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "Energy deposition of {} MeV: {} electrons, {} photons",
            self.deposited_energy, self.num_electrons, self.num_photons
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_zero() {
        let deposition = EnergyDeposition::default();
        assert_eq!(deposition.deposited_energy(), 0.0);
        assert_eq!(deposition.num_electrons(), 0);
        assert_eq!(deposition.num_photons(), 0);
    }

    #[test]
    fn fields_are_copied() {
        let deposition = EnergyDeposition::new(2.5, 60_000, 90_000);
        assert_eq!(deposition, EnergyDeposition::new(2.5, 60_000, 90_000));
        assert_eq!(
            deposition.to_string(),
            "Energy deposition of 2.5 MeV: 60000 electrons, 90000 photons\n"
        );
    }
}
