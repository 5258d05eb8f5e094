//! Truth-level records written by the detector simulation.
pub mod deposit_ledger;
mod energy_deposition;
mod sim_edep;
mod sim_energy_deposit;

pub use deposit_ledger::{
    Deposit, DepositKind, DepositLedger, Ionization, Scintillation, SimChannel, SimOpChannel,
    TrackShare,
};
pub use energy_deposition::EnergyDeposition;
pub use sim_edep::SimEDep;
pub use sim_energy_deposit::SimEnergyDeposit;
