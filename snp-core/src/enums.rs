//! This contains all the enums that describe the fields of a Touchstone header.
//!
//! A Touchstone file declares how its numbers are to be read in two places: the option
//! line (`# GHZ S MA R 50`) common to both format versions, and the bracketed keyword
//! lines of version 2 (`[MATRIX FORMAT] UPPER` and friends). Each of these fields can
//! only take a small set of values, which lends itself well to being represented by
//! enums. Tokens are matched after the input has been ASCII-uppercased, so the
//! `from_token` constructors only deal with the canonical spelling. They return an
//! `Option` rather than an error because an unrecognized token in an option line is
//! skipped, not fatal.
use num::Complex;
#[cfg(any(feature = "to_json", feature = "serde"))]
use serde::{Deserialize, Serialize};

/// The unit the frequency column of the data rows is recorded in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum FrequencyUnit {
    Hz,
    KiloHz,
    MegaHz,
    GigaHz,
}

impl Default for FrequencyUnit {
    /// GHz is what the Touchstone specification assumes when no unit is given.
    fn default() -> Self {
        FrequencyUnit::GigaHz
    }
}

impl std::fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:?}", self)
    }
}

impl FrequencyUnit {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "HZ" => Some(FrequencyUnit::Hz),
            "KHZ" => Some(FrequencyUnit::KiloHz),
            "MHZ" => Some(FrequencyUnit::MegaHz),
            "GHZ" => Some(FrequencyUnit::GigaHz),
            _ => None,
        }
    }

    /// The factor that converts a recorded frequency value to hertz.
    pub fn multiplier(self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KiloHz => 1e3,
            FrequencyUnit::MegaHz => 1e6,
            FrequencyUnit::GigaHz => 1e9,
        }
    }
}

/// The encoding of the complex values on the data rows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum NumberFormat {
    /// dB magnitude and angle in degrees (`DB`).
    DbAngle,
    /// Linear magnitude and angle in degrees (`MA`).
    MagnitudeAngle,
    /// Real and imaginary part (`RI`).
    RealImaginary,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::MagnitudeAngle
    }
}

impl std::fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:?}", self)
    }
}

impl NumberFormat {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "DB" => Some(NumberFormat::DbAngle),
            "MA" => Some(NumberFormat::MagnitudeAngle),
            "RI" => Some(NumberFormat::RealImaginary),
            _ => None,
        }
    }

    /// Rewrite one complex pair in place to the normalized (magnitude, radians) form.
    ///
    /// All three source encodings end up in the same shape, so downstream consumers
    /// never have to look at the number format again.
    /// ```
    /// use snp_core::enums::NumberFormat;
    ///
    /// let mut pair = [0.5, 90.0];
    /// NumberFormat::MagnitudeAngle.normalize_pair(&mut pair);
    /// assert_eq!(pair[0], 0.5);
    /// assert!((pair[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    /// ```
    pub fn normalize_pair(self, pair: &mut [f64]) {
        match self {
            NumberFormat::DbAngle => {
                pair[0] = 10f64.powf(pair[0] / 20.0);
                pair[1] = pair[1].to_radians();
            }
            NumberFormat::MagnitudeAngle => {
                pair[1] = pair[1].to_radians();
            }
            NumberFormat::RealImaginary => {
                let c = Complex::new(pair[0], pair[1]);
                pair[0] = c.norm();
                // atan2 of the origin is left at zero angle.
                pair[1] = if c.re == 0.0 && c.im == 0.0 {
                    0.0
                } else {
                    c.arg()
                };
            }
        }
    }
}

/// The kind of network parameter the file carries.
///
/// The parameter kind is passed through to the emitted frames; no conversion between
/// kinds is performed anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum ParameterKind {
    /// Scattering parameters (`S`).
    Scattering,
    /// Admittance parameters (`Y`).
    Admittance,
    /// Impedance parameters (`Z`).
    Impedance,
    /// Hybrid-H parameters (`H`).
    HybridH,
    /// Hybrid-G parameters (`G`).
    HybridG,
}

impl Default for ParameterKind {
    fn default() -> Self {
        ParameterKind::Scattering
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:?}", self)
    }
}

impl ParameterKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "S" => Some(ParameterKind::Scattering),
            "Y" => Some(ParameterKind::Admittance),
            "Z" => Some(ParameterKind::Impedance),
            "H" => Some(ParameterKind::HybridH),
            "G" => Some(ParameterKind::HybridG),
            _ => None,
        }
    }
}

/// Column order of the off-diagonal entries of a two-port data row.
///
/// Version 1 files store `S11 S21 S12 S22` (the `21_12` order); version 2 files declare
/// the order with the `[TWO-PORT ORDER]` keyword. Rows are normalized to row-major
/// `S11 S12 S21 S22` when they are moved into the sweep store.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum TwoPortOrder {
    Order12_21,
    Order21_12,
}

impl Default for TwoPortOrder {
    /// The version 1 convention.
    fn default() -> Self {
        TwoPortOrder::Order21_12
    }
}

impl std::fmt::Display for TwoPortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:?}", self)
    }
}

impl TwoPortOrder {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "12_21" => Some(TwoPortOrder::Order12_21),
            "21_12" => Some(TwoPortOrder::Order21_12),
            _ => None,
        }
    }
}

/// Which part of the n-by-n matrix each data row stores.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum MatrixFormat {
    /// All `n * n` entries, row-major.
    Full,
    /// Row `i` carries the `i + 1` entries up to the diagonal.
    Lower,
    /// Row `i` carries the `n - i` entries from the diagonal on.
    Upper,
}

impl Default for MatrixFormat {
    fn default() -> Self {
        MatrixFormat::Full
    }
}

impl std::fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:?}", self)
    }
}

impl MatrixFormat {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "FULL" => Some(MatrixFormat::Full),
            "LOWER" => Some(MatrixFormat::Lower),
            "UPPER" => Some(MatrixFormat::Upper),
            _ => None,
        }
    }
}

/// What an emitted frame measures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum MeasuredQuantity {
    Frequency,
    Resistance,
    NPortParameter,
}

/// The unit of an emitted frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum Unit {
    Hertz,
    Ohm,
    Unitless,
}
