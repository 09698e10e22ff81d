//! This library is the foundation for the `snp-in` crate. It holds the structures that
//! describe a parsed Touchstone (SnP) file: the header record, the enums for its option
//! and keyword fields, the analog frame model used to hand data downstream, and the
//! error type. It can be built either with serialization support, or in a slightly more
//! lightweight manner without it (see features).
//!
//! The library was designed to follow the Touchstone File Format Specification
//! (IBIS Open Forum, version 2.0), while also accepting the older version 1 dialect.
extern crate num;

#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod enums;
pub mod errors;
pub mod frames;
pub mod header;
pub mod settings;
#[cfg(test)]
mod tests;

pub use errors::SnpError;

pub use enums::*;
pub use frames::{AnalogFrame, FrameSink, MqFlags};
pub use header::SnpHeader;
pub use settings::SnpSettings;

/// A noise row is a frequency plus four noise quantities.
pub const NOISE_ROW_VALUES: usize = 5;
/// The largest port count that has a conventional `.sNp` file suffix.
pub const MAX_SUFFIX_PORTS: usize = 8;
/// Reference impedance assumed when the option line carries no `R` token.
pub const DEFAULT_REFERENCE_RESISTANCE: f64 = 50.0;
/// Decimal digits of the emitted samples (IEEE 754 doubles).
pub const ENCODING_DIGITS: u8 = 15;
/// Granularity for growing the sweep stores when no point count was declared.
pub const INITIAL_SWEEP_CAPACITY: usize = 512;
