//! Calorimetric measurements sampled along a reconstructed track on one wire plane.
//!
//! Producers hand the measurements over as parallel arrays ([CalorimetrySeries]); they are
//! checked once, here, and stored as one [CalorimetrySample] per sampling point so the
//! arrays can no longer drift apart.
use crate::error::{DataProductResult, SeriesField, check_lengths};
use itertools::izip;
use lardata_common::{PlaneId, Point3};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Track pitch as supplied by the producer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PitchSource {
    /// One pitch shared by every sample.
    Uniform(f64),
    /// One pitch per sample.
    PerSample(Vec<f64>),
}

impl Default for PitchSource {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl PitchSource {
    fn per_sample_len(&self) -> Option<usize> {
        match self {
            Self::Uniform(_) => None,
            Self::PerSample(pitch) => Some(pitch.len()),
        }
    }

    fn into_samples(self, len: usize) -> Vec<f64> {
        match self {
            Self::Uniform(pitch) => vec![pitch; len],
            Self::PerSample(pitch) => pitch,
        }
    }
}

/// The parallel-array form in which calorimetry is produced and persisted.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CalorimetrySeries {
    pub kinetic_energy: f64,
    pub dedx: Vec<f64>,
    pub dqdx: Vec<f64>,
    pub residual_range: Vec<f64>,
    /// Residual range of dead wires on the plane; not sampled alongside the others.
    #[serde(default)]
    pub dead_wire_residual_range: Vec<f64>,
    pub range: f64,
    pub pitch: PitchSource,
    /// Space point positions, one per sample, if known.
    #[serde(default)]
    pub positions: Option<Vec<Point3>>,
    pub plane_id: PlaneId,
}

/// One sampling point along the track.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct CalorimetrySample {
    pub dedx: f64,
    pub dqdx: f64,
    pub residual_range: f64,
    pub pitch: f64,
    /// `None` when the producer did not supply a space point.
    pub position: Option<Point3>,
}

impl CalorimetrySample {
    pub fn position_or_sentinel(&self) -> Point3 {
        self.position.unwrap_or(Point3::SENTINEL)
    }
}

/// Scalars describing the whole track segment.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct CalorimetrySummary {
    pub kinetic_energy: f64,
    pub range: f64,
    pub plane_id: PlaneId,
    pub dead_wire_residual_range: Vec<f64>,
}

impl CalorimetrySeries {
    /// Validates the series against dE/dx and splits it into its summary and samples.
    /// `extra` lists further sequences which must match, checked after the built-in ones.
    pub(crate) fn into_samples<I>(
        self,
        extra: I,
    ) -> DataProductResult<(CalorimetrySummary, Vec<CalorimetrySample>)>
    where
        I: IntoIterator<Item = (SeriesField, usize)>,
    {
        let len = self.dedx.len();
        let supplied = [
            Some((SeriesField::ChargeLoss, self.dqdx.len())),
            Some((SeriesField::ResidualRange, self.residual_range.len())),
            self.pitch
                .per_sample_len()
                .map(|found| (SeriesField::Pitch, found)),
            self.positions
                .as_ref()
                .map(|positions| (SeriesField::Positions, positions.len())),
        ];
        check_lengths(
            SeriesField::EnergyLoss,
            len,
            supplied.into_iter().flatten().chain(extra),
        )?;

        let pitch = self.pitch.into_samples(len);
        let positions: Vec<Option<Point3>> = match self.positions {
            Some(positions) => positions
                .into_iter()
                .map(|position| (position != Point3::SENTINEL).then_some(position))
                .collect(),
            None => vec![None; len],
        };

        let samples = izip!(self.dedx, self.dqdx, self.residual_range, pitch, positions)
            .map(
                |(dedx, dqdx, residual_range, pitch, position)| CalorimetrySample {
                    dedx,
                    dqdx,
                    residual_range,
                    pitch,
                    position,
                },
            )
            .collect();

        let summary = CalorimetrySummary {
            kinetic_energy: self.kinetic_energy,
            range: self.range,
            plane_id: self.plane_id,
            dead_wire_residual_range: self.dead_wire_residual_range,
        };
        Ok((summary, samples))
    }

    pub(crate) fn from_samples<'a, I>(summary: CalorimetrySummary, samples: I) -> Self
    where
        I: IntoIterator<Item = &'a CalorimetrySample>,
    {
        let samples: Vec<_> = samples.into_iter().collect();
        let positions = samples
            .iter()
            .any(|sample| sample.position.is_some())
            .then(|| {
                samples
                    .iter()
                    .map(|sample| sample.position_or_sentinel())
                    .collect()
            });
        Self {
            kinetic_energy: summary.kinetic_energy,
            dedx: samples.iter().map(|sample| sample.dedx).collect(),
            dqdx: samples.iter().map(|sample| sample.dqdx).collect(),
            residual_range: samples.iter().map(|sample| sample.residual_range).collect(),
            dead_wire_residual_range: summary.dead_wire_residual_range,
            range: summary.range,
            pitch: PitchSource::PerSample(samples.iter().map(|sample| sample.pitch).collect()),
            positions,
            plane_id: summary.plane_id,
        }
    }
}

/// Read access shared by the reconstructed and the truth-level calorimetry records.
/// The sequence accessors return the legacy parallel views, one value per sample.
pub trait SeriesRecord {
    fn summary(&self) -> &CalorimetrySummary;

    fn calorimetry_samples(&self) -> impl Iterator<Item = &CalorimetrySample>;

    fn kinetic_energy(&self) -> f64 {
        self.summary().kinetic_energy
    }

    fn range(&self) -> f64 {
        self.summary().range
    }

    fn plane_id(&self) -> PlaneId {
        self.summary().plane_id
    }

    fn dead_wire_residual_range(&self) -> &[f64] {
        &self.summary().dead_wire_residual_range
    }

    fn num_samples(&self) -> usize {
        self.calorimetry_samples().count()
    }

    fn dedx(&self) -> Vec<f64> {
        self.calorimetry_samples().map(|s| s.dedx).collect()
    }

    fn dqdx(&self) -> Vec<f64> {
        self.calorimetry_samples().map(|s| s.dqdx).collect()
    }

    fn residual_range(&self) -> Vec<f64> {
        self.calorimetry_samples()
            .map(|s| s.residual_range)
            .collect()
    }

    fn pitch(&self) -> Vec<f64> {
        self.calorimetry_samples().map(|s| s.pitch).collect()
    }

    /// Positions with unknown ones replaced by [Point3::SENTINEL].
    fn positions(&self) -> Vec<Point3> {
        self.calorimetry_samples()
            .map(CalorimetrySample::position_or_sentinel)
            .collect()
    }

    /// Pitch on the collection plane, taken from the first sample, or zero without samples.
    fn collection_pitch(&self) -> f64 {
        self.calorimetry_samples()
            .next()
            .map(|s| s.pitch)
            .unwrap_or_default()
    }
}

/// Reconstructed calorimetry of one track on one plane.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalorimetrySeries", into = "CalorimetrySeries")]
pub struct Calorimetry {
    summary: CalorimetrySummary,
    samples: Vec<CalorimetrySample>,
}

impl Calorimetry {
    /// Builds the record from its parallel-array form.
    ///
    /// # Errors
    /// [LengthMismatch](crate::DataProductError::LengthMismatch) if dQ/dx, residual range,
    /// per-sample pitch or positions do not have as many entries as dE/dx.
    pub fn from_series(series: CalorimetrySeries) -> DataProductResult<Self> {
        let (summary, samples) = series.into_samples([])?;
        Ok(Self { summary, samples })
    }

    pub fn samples(&self) -> &[CalorimetrySample] {
        &self.samples
    }
}

impl SeriesRecord for Calorimetry {
    fn summary(&self) -> &CalorimetrySummary {
        &self.summary
    }

    fn calorimetry_samples(&self) -> impl Iterator<Item = &CalorimetrySample> {
        self.samples.iter()
    }
}

impl TryFrom<CalorimetrySeries> for Calorimetry {
    type Error = crate::DataProductError;

    fn try_from(series: CalorimetrySeries) -> DataProductResult<Self> {
        Self::from_series(series)
    }
}

impl From<Calorimetry> for CalorimetrySeries {
    fn from(calorimetry: Calorimetry) -> Self {
        CalorimetrySeries::from_samples(calorimetry.summary, &calorimetry.samples)
    }
}

pub(crate) fn write_summary(f: &mut Formatter<'_>, summary: &CalorimetrySummary) -> Result {
    writeln!(
        f,
        "Kinetic Energy: {}\n Range: {}",
        summary.kinetic_energy, summary.range
    )
}

pub(crate) fn write_sample(
    f: &mut Formatter<'_>,
    sample: &CalorimetrySample,
    plane_id: &PlaneId,
) -> Result {
    let position = sample.position_or_sentinel();
    write!(
        f,
        "dE/dx={} Residual range={} dQ/dx={} (x,y,z)=({},{},{}) pitch={} planeID={}",
        sample.dedx,
        sample.residual_range,
        sample.dqdx,
        position.x,
        position.y,
        position.z,
        sample.pitch,
        plane_id
    )
}

impl Display for Calorimetry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_summary(f, &self.summary)?;
        for sample in &self.samples {
            write_sample(f, sample, &self.summary.plane_id)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
