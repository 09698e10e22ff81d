//! This module contains the [`SnpSettings`] structure which can be used to customise
//! the Touchstone parsing.
//!
//! NB: The toggles exist because Touchstone writers disagree with each other (and with
//! the specification) on a few points, and because the behavior of other readers of
//! the format differs on files that are slightly out of shape. The defaults follow the
//! specification; flipping a toggle trades that for compatibility.
use crate::errors::SnpError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// This structure holds the settings for the custom reading of Touchstone files.
///
/// The fields are kept private and accessed through setters and getters, as not every
/// combination of values is meaningful and further coupled settings may be added.
pub struct SnpSettings {
    /// Reject a data row carrying more values than the header allows, instead of
    /// warning and truncating it.
    pub(crate) strict_row_width: bool,
    /// Emit a reference frame of ones for version 2 files with non-scattering
    /// parameters. When false, such files emit no reference frame at all.
    pub(crate) emit_nonscattering_reference: bool,
    /// Convert noise rows in place: noise figure dB to linear power ratio, reflection
    /// angle degrees to radians. When false the raw values pass through.
    pub(crate) convert_noise_values: bool,
}

impl Default for SnpSettings {
    /// Creates the default instance: lenient row handling with all conversions on.
    fn default() -> Self {
        SnpSettings {
            strict_row_width: false,
            emit_nonscattering_reference: true,
            convert_noise_values: true,
        }
    }
}

impl SnpSettings {
    #[cfg(feature = "to_json")]
    pub fn to_json(&self) -> Result<String, SnpError> {
        serde_json::to_string(&self).map_err(SnpError::SerdeError)
    }

    /// A function to set strict handling of over-wide data rows.
    pub fn set_strict_row_width(&mut self, strict: bool) {
        self.strict_row_width = strict;
    }

    pub fn get_strict_row_width(&self) -> bool {
        self.strict_row_width
    }

    /// Sets whether version 2 non-scattering files emit a reference frame of ones.
    pub fn set_emit_nonscattering_reference(&mut self, emit: bool) {
        self.emit_nonscattering_reference = emit;
    }

    pub fn get_emit_nonscattering_reference(&self) -> bool {
        self.emit_nonscattering_reference
    }

    /// Sets whether noise figure and reflection angle are converted in place.
    pub fn set_convert_noise_values(&mut self, convert: bool) {
        self.convert_noise_values = convert;
    }

    pub fn get_convert_noise_values(&self) -> bool {
        self.convert_noise_values
    }
}
