pub mod geometry;
pub mod tracer;

pub use geometry::{PlaneId, Point3, Vector3};

/// Geant4 supplied track identifier.
pub type TrackId = i32;
/// Readout channel of a wire plane.
pub type ChannelId = u32;
/// Optical detector channel.
pub type OpChannelId = i32;
/// Discrete readout time used to bucket deposits.
pub type Tick = u32;

/// Placeholder used by legacy integer fields that were never filled.
pub const BOGUS_I: i32 = -999;
/// Placeholder used by legacy floating-point fields that were never filled.
pub const BOGUS_D: f64 = -999.0;
/// Track id marking a deposit not attributable to any simulated particle.
pub const NO_PARTICLE_ID: TrackId = -999_999;
