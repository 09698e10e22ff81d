//! This file contains the definition of the header record of a Touchstone file. It is
//! populated by the parser while it walks the option and keyword lines and is then used
//! for interpreting the data rows.
use crate::enums::*;
use crate::errors::SnpError;
use crate::DEFAULT_REFERENCE_RESISTANCE;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything a Touchstone file declares about itself before (and between) data rows.
///
/// The record accumulates monotonically: the option line and each keyword line only
/// ever fill fields in, and once data rows are being consumed the record is effectively
/// frozen. In a version 1 file the port count starts out unknown (zero) and is inferred
/// from the shape of the first data rows; in a version 2 file it is declared by
/// `[NUMBER OF PORTS]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnpHeader {
    /// Touchstone dialect, 1 or 2.
    pub file_version: u8,
    /// Unit of the frequency column.
    pub frequency_unit: FrequencyUnit,
    /// Encoding of the complex values.
    pub number_format: NumberFormat,
    /// Which network parameter the matrix holds.
    pub parameter_kind: ParameterKind,
    /// The `R` token of the option line, in ohms.
    pub reference_resistance: f64,
    /// Number of ports; 0 while still unknown.
    pub num_ports: usize,
    /// Column order of two-port rows.
    pub two_port_order: TwoPortOrder,
    /// Which triangle (if not all) of the matrix the rows store.
    pub matrix_format: MatrixFormat,
    /// Declared `[NUMBER OF FREQUENCIES]`; 0 if not declared.
    pub sweep_points_expected: usize,
    /// Declared `[NUMBER OF NOISE FREQUENCIES]`; 0 if not declared.
    pub sweep_points_noise_expected: usize,
    /// Per-port reference impedances from `[REFERENCE]`, once complete.
    pub reference_resistances: Option<Vec<f64>>,
}

impl Default for SnpHeader {
    /// The defaults of a version 1 file with a bare `#` option line.
    fn default() -> Self {
        SnpHeader {
            file_version: 1,
            frequency_unit: FrequencyUnit::default(),
            number_format: NumberFormat::default(),
            parameter_kind: ParameterKind::default(),
            reference_resistance: DEFAULT_REFERENCE_RESISTANCE,
            num_ports: 0,
            two_port_order: TwoPortOrder::default(),
            matrix_format: MatrixFormat::default(),
            sweep_points_expected: 0,
            sweep_points_noise_expected: 0,
            reference_resistances: None,
        }
    }
}

impl SnpHeader {
    /// Interpret an option line (`# GHZ S MA R 50`).
    ///
    /// Tokens may appear in any order and unknown tokens are skipped; the only way an
    /// option line fails is an `R` token without a following number. The line is
    /// expected to be uppercased and comment-stripped already, which is how the ingest
    /// buffer hands lines out.
    /// ```
    /// use snp_core::SnpHeader;
    /// use snp_core::enums::{FrequencyUnit, NumberFormat, ParameterKind};
    ///
    /// let mut header = SnpHeader::default();
    /// header.apply_option_line("# MHZ S MA R 75").unwrap();
    /// assert_eq!(header.frequency_unit, FrequencyUnit::MegaHz);
    /// assert_eq!(header.number_format, NumberFormat::MagnitudeAngle);
    /// assert_eq!(header.parameter_kind, ParameterKind::Scattering);
    /// assert_eq!(header.reference_resistance, 75.0);
    /// ```
    pub fn apply_option_line(&mut self, line: &str) -> Result<(), SnpError> {
        let mut tokens = line.trim_start_matches('#').split_whitespace();
        while let Some(token) = tokens.next() {
            if let Some(unit) = FrequencyUnit::from_token(token) {
                self.frequency_unit = unit;
            } else if let Some(format) = NumberFormat::from_token(token) {
                self.number_format = format;
            } else if let Some(kind) = ParameterKind::from_token(token) {
                self.parameter_kind = kind;
            } else if token == "R" {
                self.reference_resistance = tokens
                    .next()
                    .and_then(|value| value.parse::<f64>().ok())
                    .ok_or_else(|| SnpError::BadOptionLine {
                        line: line.to_string(),
                    })?;
            }
            // Anything else is skipped.
        }
        Ok(())
    }

    /// How many values one data row carries, or `None` while the port count is unknown.
    ///
    /// A full matrix row is the frequency plus `n * n` complex entries; a triangular
    /// row stores only `(n * n + n) / 2` of them.
    pub fn values_per_row(&self) -> Option<usize> {
        if self.num_ports == 0 {
            return None;
        }
        let n = self.num_ports;
        Some(match self.matrix_format {
            MatrixFormat::Full => 2 * n * n + 1,
            MatrixFormat::Lower | MatrixFormat::Upper => n * n + n + 1,
        })
    }

    /// The number of doubles one reconstructed matrix occupies (`2 * n^2`).
    pub fn matrix_values(&self) -> usize {
        2 * self.num_ports * self.num_ports
    }

    /// Whether the file carries scattering parameters.
    ///
    /// Version 2 ties the meaning of reference impedances to this: for the other
    /// parameter kinds the per-port references are normalized to 1.
    pub fn is_scattering(&self) -> bool {
        self.parameter_kind == ParameterKind::Scattering
    }
}
