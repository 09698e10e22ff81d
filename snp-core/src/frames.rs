//! The frame model through which parsed data leaves the parser.
//!
//! The parser does not return a finished document; it pushes frames into a
//! [`FrameSink`] as blocks of the file complete. A frame is a flat run of doubles plus
//! the metadata needed to interpret it (measured quantity, unit, flags). The data slice
//! borrows the parser's sweep store and is only valid for the duration of the callback,
//! which is what lets multi-megabyte sweeps pass downstream without a copy.
use crate::enums::{MeasuredQuantity, ParameterKind, Unit};
use crate::errors::SnpError;
#[cfg(any(feature = "to_json", feature = "serde"))]
use serde::{Deserialize, Serialize};

/// Flags qualifying the measured quantity of a frame.
///
/// A plain bit-set. Resistance frames carry [`MqFlags::REFERENCE`], parameter data
/// frames carry the flag of their parameter kind, and noise frames carry
/// [`MqFlags::TWO_PORT_NOISE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct MqFlags(u32);

impl MqFlags {
    pub const NONE: MqFlags = MqFlags(0);
    /// The values are reference impedances, not measured data.
    pub const REFERENCE: MqFlags = MqFlags(1);
    pub const PARAM_S: MqFlags = MqFlags(1 << 1);
    pub const PARAM_Y: MqFlags = MqFlags(1 << 2);
    pub const PARAM_Z: MqFlags = MqFlags(1 << 3);
    pub const PARAM_G: MqFlags = MqFlags(1 << 4);
    pub const PARAM_H: MqFlags = MqFlags(1 << 5);
    /// The values are a two-port noise characterization.
    pub const TWO_PORT_NOISE: MqFlags = MqFlags(1 << 6);

    /// The flag matching a parameter kind.
    pub fn for_kind(kind: ParameterKind) -> MqFlags {
        match kind {
            ParameterKind::Scattering => Self::PARAM_S,
            ParameterKind::Admittance => Self::PARAM_Y,
            ParameterKind::Impedance => Self::PARAM_Z,
            ParameterKind::HybridG => Self::PARAM_G,
            ParameterKind::HybridH => Self::PARAM_H,
        }
    }

    pub fn contains(self, other: MqFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for MqFlags {
    type Output = MqFlags;

    fn bitor(self, rhs: MqFlags) -> MqFlags {
        MqFlags(self.0 | rhs.0)
    }
}

/// One emitted run of samples.
///
/// The data borrows the parser's buffers; a sink that needs the values beyond the
/// callback must copy them.
#[derive(Debug, Clone, Copy)]
pub struct AnalogFrame<'a> {
    pub data: &'a [f64],
    pub quantity: MeasuredQuantity,
    pub unit: Unit,
    pub flags: MqFlags,
    /// Decimal digits the values are good for.
    pub digits: u8,
}

/// The downstream consumer of parsed data.
///
/// `session_begin`/`session_end` bracket one parsed file, `frame_begin`/`frame_end`
/// bracket its data portion, and `analog` delivers the individual frames in order:
/// the reference frame first, then per block a frequency frame followed by the
/// parameter (or noise) frame. All calls happen on the caller's thread, re-entrantly
/// from within `receive` and `end`.
///
/// The sentinel methods default to doing nothing so that simple sinks only need to
/// implement `analog`.
pub trait FrameSink {
    fn session_begin(&mut self) -> Result<(), SnpError> {
        Ok(())
    }

    fn session_end(&mut self) -> Result<(), SnpError> {
        Ok(())
    }

    fn frame_begin(&mut self) -> Result<(), SnpError> {
        Ok(())
    }

    fn frame_end(&mut self) -> Result<(), SnpError> {
        Ok(())
    }

    fn analog(&mut self, frame: &AnalogFrame) -> Result<(), SnpError>;
}
