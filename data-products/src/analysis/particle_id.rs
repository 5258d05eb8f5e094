//! Particle identification results for one track on one plane.
//!
//! Besides the fixed chi2 template fit, a [ParticleId] carries any number of
//! [AlgorithmScore]s produced by experiment-specific algorithms.
use lardata_common::PlaneId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Name rendered for a score whose algorithm was never named.
pub const ALGORITHM_NAME_NOT_SET: &str = "AlgNameNotSet";
pub const NDF_NOT_SET: i32 = -9999;
pub const VALUE_NOT_SET: f32 = -9999.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum VariableType {
    #[strum(to_string = "kGOF")]
    GoodnessOfFit,
    #[strum(to_string = "kLikelihood")]
    Likelihood,
    #[strum(to_string = "kLogL")]
    LogLikelihood,
    #[strum(to_string = "kScore")]
    Score,
    #[strum(to_string = "kPIDA")]
    Pida,
    #[strum(to_string = "kdEdxtruncmean")]
    DedxTruncatedMean,
    #[strum(to_string = "kdQdxtruncmean")]
    DqdxTruncatedMean,
    #[strum(to_string = "kTrackLength")]
    TrackLength,
    #[strum(to_string = "kEdeposited")]
    DepositedEnergy,
    #[strum(to_string = "kEbyRange")]
    EnergyByRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDirection {
    #[strum(to_string = "kForward")]
    Forward,
    #[strum(to_string = "kBackward")]
    Backward,
}

/// The wire planes an algorithm used.
///
/// Packed form: bit 0 is the collection plane, bits 1 to 4 are induction planes 1 to 4.
/// Higher bits are not planes and are discarded on unpacking.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlaneSet {
    pub collection: bool,
    pub induction_1: bool,
    pub induction_2: bool,
    pub induction_3: bool,
    pub induction_4: bool,
}

impl PlaneSet {
    const NUM_PLANES: u32 = 5;

    pub fn from_bits(bits: u8) -> Self {
        if u32::from(bits) >> Self::NUM_PLANES != 0 {
            tracing::debug!(bits, "Discarding plane bits beyond the fifth plane");
        }
        let bit = |n: u8| bits & (1 << n) != 0;
        Self {
            collection: bit(0),
            induction_1: bit(1),
            induction_2: bit(2),
            induction_3: bit(3),
            induction_4: bit(4),
        }
    }

    pub fn to_bits(self) -> u8 {
        [
            self.collection,
            self.induction_1,
            self.induction_2,
            self.induction_3,
            self.induction_4,
        ]
        .into_iter()
        .enumerate()
        .filter(|(_, set)| *set)
        .fold(0, |bits, (n, _)| bits | (1 << n))
    }

    pub fn is_empty(self) -> bool {
        self.to_bits() == 0
    }

    /// Number of planes in the set.
    pub fn len(self) -> u32 {
        self.to_bits().count_ones()
    }
}

/// Output of one generic identification algorithm. Unset fields are `None`.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AlgorithmScore {
    pub algorithm_name: Option<String>,
    pub variable_type: Option<VariableType>,
    pub track_direction: Option<TrackDirection>,
    pub ndf: Option<i32>,
    /// PDG code of the hypothesis assumed, zero if none.
    pub assumed_pdg: i32,
    pub value: Option<f32>,
    pub planes: PlaneSet,
}

impl AlgorithmScore {
    pub fn algorithm_name_or_default(&self) -> &str {
        self.algorithm_name
            .as_deref()
            .unwrap_or(ALGORITHM_NAME_NOT_SET)
    }

    pub fn ndf_or_sentinel(&self) -> i32 {
        self.ndf.unwrap_or(NDF_NOT_SET)
    }

    pub fn value_or_sentinel(&self) -> f32 {
        self.value.unwrap_or(VALUE_NOT_SET)
    }
}

impl Display for AlgorithmScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} {} {} ndf={} pdg={} value={} planes={:05b}",
            self.algorithm_name_or_default(),
            self.variable_type
                .map_or_else(|| "kNotSet".to_owned(), |v| v.to_string()),
            self.track_direction
                .map_or_else(|| "kNoDirection".to_owned(), |d| d.to_string()),
            self.ndf_or_sentinel(),
            self.assumed_pdg,
            self.value_or_sentinel(),
            self.planes.to_bits()
        )
    }
}

/// Result of the chi2 template fit.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateFit {
    pub pdg: i32,
    pub ndf: i32,
    /// Minimum reduced chi2.
    pub min_chi2: f64,
    /// Difference between the two lowest reduced chi2's.
    pub delta_chi2: f64,
    pub chi2_proton: f64,
    pub chi2_kaon: f64,
    pub chi2_pion: f64,
    pub chi2_muon: f64,
    /// Energy missed on dead wires by a contained particle.
    pub missing_e: f64,
    /// As [Self::missing_e] using the average dE/dx.
    pub missing_e_avg: f64,
    pub pida: f64,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParticleId {
    #[serde(flatten)]
    fit: TemplateFit,
    plane_id: PlaneId,
    #[serde(default)]
    scores: Vec<AlgorithmScore>,
}

impl ParticleId {
    pub fn new(fit: TemplateFit, plane_id: PlaneId) -> Self {
        Self {
            fit,
            plane_id,
            scores: Vec::new(),
        }
    }

    pub fn from_scores(scores: Vec<AlgorithmScore>) -> Self {
        Self {
            scores,
            ..Default::default()
        }
    }

    pub fn fit(&self) -> &TemplateFit {
        &self.fit
    }

    pub fn pdg(&self) -> i32 {
        self.fit.pdg
    }

    pub fn ndf(&self) -> i32 {
        self.fit.ndf
    }

    pub fn pida(&self) -> f64 {
        self.fit.pida
    }

    pub fn plane_id(&self) -> PlaneId {
        self.plane_id
    }

    pub fn scores(&self) -> &[AlgorithmScore] {
        &self.scores
    }
}

impl Display for ParticleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let fit = &self.fit;
        writeln!(f, "Determined particle PDG code: {}", fit.pdg)?;
        writeln!(f, " NDF: {}", fit.ndf)?;
        writeln!(f, " Minimal chi2: {}", fit.min_chi2)?;
        writeln!(f, " Delta chi2: {}", fit.delta_chi2)?;
        writeln!(f, " chi2 with proton template: {}", fit.chi2_proton)?;
        writeln!(f, " chi2 with kaon template: {}", fit.chi2_kaon)?;
        writeln!(f, " chi2 with pion template: {}", fit.chi2_pion)?;
        writeln!(f, " chi2 with muon template: {}", fit.chi2_muon)?;
        writeln!(f, " PIDA:                    {}", fit.pida)?;
        writeln!(f, " planeID={}", self.plane_id)?;
        for score in &self.scores {
            writeln!(f, " score: {score}")?;
        }
        Ok(())
    }
}
