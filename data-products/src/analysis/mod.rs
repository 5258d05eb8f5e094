//! Quantities derived from reconstructed objects: calorimetry, timing and identification.
mod calorimetry;
mod flash_match;
mod particle_id;
mod t0;
mod true_calorimetry;

pub use calorimetry::{
    Calorimetry, CalorimetrySample, CalorimetrySeries, CalorimetrySummary, PitchSource,
    SeriesRecord,
};
pub use flash_match::FlashMatch;
pub use particle_id::{
    ALGORITHM_NAME_NOT_SET, AlgorithmScore, NDF_NOT_SET, ParticleId, PlaneSet, TemplateFit,
    TrackDirection, VALUE_NOT_SET, VariableType,
};
pub use t0::{T0, TriggerType, UNSET_CONFIDENCE, UNSET_ID};
pub use true_calorimetry::{TrueCalorimetry, TrueCalorimetrySample, TrueCalorimetrySeries};
