//! Calorimetry with the simulated energy and charge seen by each sampled wire.
use super::calorimetry::{
    CalorimetrySample, CalorimetrySeries, CalorimetrySummary, SeriesRecord, write_sample,
    write_summary,
};
use crate::error::{DataProductResult, SeriesField};
use itertools::izip;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Parallel-array form of [TrueCalorimetry].
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrueCalorimetrySeries {
    #[serde(flatten)]
    pub calorimetry: CalorimetrySeries,
    pub wire: Vec<u16>,
    pub de: Vec<f64>,
    pub dq: Vec<f64>,
}

#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct TrueCalorimetrySample {
    pub calorimetry: CalorimetrySample,
    pub wire: u16,
    /// Simulated energy deposited under the wire [MeV].
    pub deposited_energy: f64,
    /// Simulated charge collected by the wire [e].
    pub collected_charge: f64,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrueCalorimetrySeries", into = "TrueCalorimetrySeries")]
pub struct TrueCalorimetry {
    summary: CalorimetrySummary,
    samples: Vec<TrueCalorimetrySample>,
}

impl TrueCalorimetry {
    /// As [Calorimetry::from_series](super::Calorimetry::from_series), additionally
    /// requiring wire, dE and dQ (in that order) to match dE/dx.
    pub fn from_series(series: TrueCalorimetrySeries) -> DataProductResult<Self> {
        let TrueCalorimetrySeries {
            calorimetry,
            wire,
            de,
            dq,
        } = series;
        let (summary, samples) = calorimetry.into_samples([
            (SeriesField::Wire, wire.len()),
            (SeriesField::DepositedEnergy, de.len()),
            (SeriesField::CollectedCharge, dq.len()),
        ])?;
        let samples = izip!(samples, wire, de, dq)
            .map(
                |(calorimetry, wire, deposited_energy, collected_charge)| TrueCalorimetrySample {
                    calorimetry,
                    wire,
                    deposited_energy,
                    collected_charge,
                },
            )
            .collect();
        Ok(Self { summary, samples })
    }

    pub fn samples(&self) -> &[TrueCalorimetrySample] {
        &self.samples
    }

    pub fn wire(&self) -> Vec<u16> {
        self.samples.iter().map(|s| s.wire).collect()
    }

    pub fn de(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.deposited_energy).collect()
    }

    pub fn dq(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.collected_charge).collect()
    }
}

impl SeriesRecord for TrueCalorimetry {
    fn summary(&self) -> &CalorimetrySummary {
        &self.summary
    }

    fn calorimetry_samples(&self) -> impl Iterator<Item = &CalorimetrySample> {
        self.samples.iter().map(|s| &s.calorimetry)
    }
}

impl TryFrom<TrueCalorimetrySeries> for TrueCalorimetry {
    type Error = crate::DataProductError;

    fn try_from(series: TrueCalorimetrySeries) -> DataProductResult<Self> {
        Self::from_series(series)
    }
}

impl From<TrueCalorimetry> for TrueCalorimetrySeries {
    fn from(value: TrueCalorimetry) -> Self {
        let (wire, de, dq) = (value.wire(), value.de(), value.dq());
        let calorimetry = CalorimetrySeries::from_samples(
            value.summary,
            value.samples.iter().map(|s| &s.calorimetry),
        );
        Self {
            calorimetry,
            wire,
            de,
            dq,
        }
    }
}

impl Display for TrueCalorimetry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "True Calo")?;
        write_summary(f, &self.summary)?;
        for sample in &self.samples {
            write_sample(f, &sample.calorimetry, &self.summary.plane_id)?;
            writeln!(
                f,
                " wire=({}) dE=({}) dQ=({})",
                sample.wire, sample.deposited_energy, sample.collected_charge
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataProductError, analysis::PitchSource};
    use lardata_common::PlaneId;

    fn series(len: usize) -> TrueCalorimetrySeries {
        TrueCalorimetrySeries {
            calorimetry: CalorimetrySeries {
                kinetic_energy: 80.0,
                dedx: vec![2.0; len],
                dqdx: vec![200.0; len],
                residual_range: (0..len).rev().map(|r| r as f64).collect(),
                range: len as f64,
                pitch: PitchSource::Uniform(0.5),
                plane_id: PlaneId::new(0, 0, 2),
                ..Default::default()
            },
            wire: (0..len as u16).map(|w| 100 + w).collect(),
            de: vec![1.0; len],
            dq: vec![6000.0; len],
        }
    }

    #[test]
    fn truth_sequences_are_checked_after_reco() {
        let mut input = series(3);
        input.dq.pop();
        input.calorimetry.residual_range.pop();
        assert!(matches!(
            TrueCalorimetry::from_series(input.clone()),
            Err(DataProductError::LengthMismatch {
                field: SeriesField::ResidualRange,
                ..
            })
        ));
        input.calorimetry.residual_range.push(0.0);
        assert_eq!(
            TrueCalorimetry::from_series(input),
            Err(DataProductError::LengthMismatch {
                reference: SeriesField::EnergyLoss,
                field: SeriesField::CollectedCharge,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn accessors_share_length() {
        let calo = TrueCalorimetry::from_series(series(4)).unwrap();
        assert_eq!(calo.num_samples(), 4);
        assert_eq!(calo.wire(), [100, 101, 102, 103]);
        assert_eq!(calo.de().len(), 4);
        assert_eq!(calo.dq().len(), 4);
        assert_eq!(calo.residual_range(), [3.0, 2.0, 1.0, 0.0]);
        assert_eq!(calo.collection_pitch(), 0.5);
    }

    #[test]
    fn render_has_truth_suffix() {
        let calo = TrueCalorimetry::from_series(series(1)).unwrap();
        assert_eq!(
            calo.to_string(),
            "True Calo\nKinetic Energy: 80\n Range: 1\n\
             dE/dx=2 Residual range=0 dQ/dx=200 (x,y,z)=(-999,-999,-999) pitch=0.5 planeID=(0,0,2) \
             wire=(100) dE=(1) dQ=(6000)\n"
        );
    }

    #[test]
    fn back_to_series() {
        let input = series(3);
        let calo = TrueCalorimetry::from_series(input.clone()).unwrap();
        let output = TrueCalorimetrySeries::from(calo);
        assert_eq!(output.wire, [100, 101, 102]);
        assert_eq!(output.de, input.de);
        assert_eq!(output.dq, input.dq);
        assert_eq!(output.calorimetry.dedx, input.calorimetry.dedx);
        assert_eq!(output.calorimetry.residual_range, [2.0, 1.0, 0.0]);
    }

    #[test]
    fn json_round_trip() {
        let calo = TrueCalorimetry::from_series(series(2)).unwrap();
        let json = serde_json::to_string(&calo).unwrap();
        assert_eq!(serde_json::from_str::<TrueCalorimetry>(&json).unwrap(), calo);
    }
}
