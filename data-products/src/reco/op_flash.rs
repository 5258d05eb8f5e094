use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result},
};

/// A flash of scintillation light seen by the optical detectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OpFlash {
    /// Relative to the trigger.
    time: f64,
    time_width: f64,
    /// By the optical readout clock.
    abs_time: f64,
    frame: u32,
    pe_per_opdet: Vec<f64>,
    /// Geometric centre in each wire view.
    wire_centers: Vec<f64>,
    wire_widths: Vec<f64>,
    y_center: f64,
    y_width: f64,
    z_center: f64,
    z_width: f64,
    fast_to_total: f64,
    in_beam_frame: bool,
    on_beam_time: i32,
}

/// All light counted as fast unless a ratio was measured.
impl Default for OpFlash {
    fn default() -> Self {
        Self {
            time: 0.0,
            time_width: 0.0,
            abs_time: 0.0,
            frame: 0,
            pe_per_opdet: Vec::new(),
            wire_centers: Vec::new(),
            wire_widths: Vec::new(),
            y_center: 0.0,
            y_width: 0.0,
            z_center: 0.0,
            z_width: 0.0,
            fast_to_total: 1.0,
            in_beam_frame: false,
            on_beam_time: 0,
        }
    }
}

impl OpFlash {
    pub fn new(
        time: f64,
        time_width: f64,
        abs_time: f64,
        frame: u32,
        pe_per_opdet: Vec<f64>,
    ) -> Self {
        Self {
            time,
            time_width,
            abs_time,
            frame,
            pe_per_opdet,
            ..Default::default()
        }
    }

    pub fn with_beam(self, in_beam_frame: bool, on_beam_time: i32) -> Self {
        Self {
            in_beam_frame,
            on_beam_time,
            ..self
        }
    }

    pub fn with_fast_to_total(self, fast_to_total: f64) -> Self {
        Self {
            fast_to_total,
            ..self
        }
    }

    /// #Arguments
    /// * `y` - (centre, width) in y.
    /// * `z` - (centre, width) in z.
    pub fn with_extent(
        self,
        (y_center, y_width): (f64, f64),
        (z_center, z_width): (f64, f64),
    ) -> Self {
        Self {
            y_center,
            y_width,
            z_center,
            z_width,
            ..self
        }
    }

    pub fn with_wires(self, wire_centers: Vec<f64>, wire_widths: Vec<f64>) -> Self {
        Self {
            wire_centers,
            wire_widths,
            ..self
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_width(&self) -> f64 {
        self.time_width
    }

    pub fn abs_time(&self) -> f64 {
        self.abs_time
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Photoelectrons on the given optical detector, if it exists.
    pub fn pe(&self, opdet: usize) -> Option<f64> {
        self.pe_per_opdet.get(opdet).copied()
    }

    pub fn pes(&self) -> &[f64] {
        &self.pe_per_opdet
    }

    pub fn total_pe(&self) -> f64 {
        self.pe_per_opdet.iter().sum()
    }

    pub fn wire_centers(&self) -> &[f64] {
        &self.wire_centers
    }

    pub fn wire_widths(&self) -> &[f64] {
        &self.wire_widths
    }

    pub fn y_center(&self) -> f64 {
        self.y_center
    }

    pub fn y_width(&self) -> f64 {
        self.y_width
    }

    pub fn z_center(&self) -> f64 {
        self.z_center
    }

    pub fn z_width(&self) -> f64 {
        self.z_width
    }

    pub fn fast_to_total(&self) -> f64 {
        self.fast_to_total
    }

    pub fn in_beam_frame(&self) -> bool {
        self.in_beam_frame
    }

    pub fn on_beam_time(&self) -> i32 {
        self.on_beam_time
    }

    /// Strictly earlier than `other`.
    pub fn precedes(&self, other: &Self) -> bool {
        self.time < other.time
    }

    pub fn cmp_by_time(&self, other: &Self) -> Ordering {
        self.time.total_cmp(&other.time)
    }
}

/// Sorts flashes by time, keeping simultaneous flashes in their original order.
pub fn sort_by_time(flashes: &mut [OpFlash]) {
    flashes.sort_by(OpFlash::cmp_by_time);
}

impl Display for OpFlash {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "OpFlash at time {} (width {}, absolute {}) in frame {} with {} PE",
            self.time,
            self.time_width,
            self.abs_time,
            self.frame,
            self.total_pe()
        )?;
        writeln!(
            f,
            " y = {} +/- {}, z = {} +/- {}, fast/total = {}",
            self.y_center, self.y_width, self.z_center, self.z_width, self.fast_to_total
        )?;
        writeln!(
            f,
            " in beam frame: {}, on beam time: {}",
            self.in_beam_frame, self.on_beam_time
        )
    }
}
