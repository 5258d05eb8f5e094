use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Identifier written by legacy producers when the T0 has no ID.
pub const UNSET_ID: i32 = -1;
/// Confidence written by legacy producers when none was estimated.
pub const UNSET_CONFIDENCE: f64 = -1.0;

/// What determined the event time.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum TriggerType {
    #[default]
    MuonCounter,
    PhotonDetector,
    MonteCarloTruth,
    /// Codes outside the conventional set are kept as they are.
    Other(u32),
}

impl From<u32> for TriggerType {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::MuonCounter,
            1 => Self::PhotonDetector,
            2 => Self::MonteCarloTruth,
            other => Self::Other(other),
        }
    }
}

impl From<TriggerType> for u32 {
    fn from(value: TriggerType) -> Self {
        match value {
            TriggerType::MuonCounter => 0,
            TriggerType::PhotonDetector => 1,
            TriggerType::MonteCarloTruth => 2,
            TriggerType::Other(code) => code,
        }
    }
}

/// The time of an interaction, as found by matching to a trigger source.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct T0 {
    /// [ns]
    time: f64,
    trigger_type: TriggerType,
    /// Identifies the muon track, flash or particle the time was matched from.
    trigger_bits: i32,
    #[serde(default)]
    id: Option<i32>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl T0 {
    pub fn new(time: f64, trigger_type: TriggerType, trigger_bits: i32) -> Self {
        Self {
            time,
            trigger_type,
            trigger_bits,
            id: None,
            confidence: None,
        }
    }

    pub fn with_id(self, id: i32) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn with_confidence(self, confidence: f64) -> Self {
        Self {
            confidence: Some(confidence),
            ..self
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn trigger_type(&self) -> TriggerType {
        self.trigger_type
    }

    pub fn trigger_bits(&self) -> i32 {
        self.trigger_bits
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn id_or_sentinel(&self) -> i32 {
        self.id.unwrap_or(UNSET_ID)
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn confidence_or_sentinel(&self) -> f64 {
        self.confidence.unwrap_or(UNSET_CONFIDENCE)
    }
}

impl Display for T0 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "T0 with Time: {}", self.time)?;
        writeln!(f, " from Trigger type: {}", u32::from(self.trigger_type))?;
        writeln!(f, " with bits: {}", self.trigger_bits)?;
        writeln!(f, " with ID: {}", self.id_or_sentinel())?;
        writeln!(f, " with confidence: {}", self.confidence_or_sentinel())
    }
}
