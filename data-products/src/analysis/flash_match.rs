use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Match of an optical flash to a reconstructed object.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlashMatch {
    chi2: f64,
    flash_id: i32,
    subject_id: i32,
    in_beam: bool,
}

impl FlashMatch {
    pub fn new(chi2: f64, flash_id: i32, subject_id: i32, in_beam: bool) -> Self {
        Self {
            chi2,
            flash_id,
            subject_id,
            in_beam,
        }
    }

    pub fn chi2(&self) -> f64 {
        self.chi2
    }

    pub fn flash_id(&self) -> i32 {
        self.flash_id
    }

    pub fn subject_id(&self) -> i32 {
        self.subject_id
    }

    pub fn in_beam(&self) -> bool {
        self.in_beam
    }
}

impl Display for FlashMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Flash match with Chi2: {}", self.chi2)?;
        writeln!(f, " from flash: {}", self.flash_id)?;
        writeln!(f, " to object: {}", self.subject_id)
    }
}
