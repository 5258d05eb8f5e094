use lardata_common::{ChannelId, OpChannelId};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};

/// Distinguishes what a ledger counts and which kind of channel owns it.
pub trait DepositKind {
    type Channel: Copy + Ord + Display + Debug + Serialize + DeserializeOwned;

    /// Unit of the deposited quantity, as printed.
    const QUANTITY: &'static str;
    /// Name of the owning channel, as printed.
    const CHANNEL: &'static str;
    /// Name of the time bucket, as printed.
    const TICK: &'static str;
}

/// Ionization electrons drifted to a wire readout channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ionization;

impl DepositKind for Ionization {
    type Channel = ChannelId;

    const QUANTITY: &'static str = "electrons";
    const CHANNEL: &'static str = "channel";
    const TICK: &'static str = "TDC";
}

/// Scintillation photons reaching an optical detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scintillation;

impl DepositKind for Scintillation {
    type Channel = OpChannelId;

    const QUANTITY: &'static str = "photons";
    const CHANNEL: &'static str = "optical channel";
    const TICK: &'static str = "time tick";
}
