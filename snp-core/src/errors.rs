/// Basic Error types.
///
/// Every variant is fatal to the current parse; the parser performs no local recovery.
#[derive(Debug)]
pub enum SnpError {
    /// Map file error (this is just a `std::io` error when mapping files).
    MapFile(std::io::Error),
    /// The first processed line is neither an option line nor a `[VERSION]` keyword.
    BadHeader { line: String },
    /// Malformed option line (an `R` token with a missing or non-numeric value).
    BadOptionLine { line: String },
    /// A `[VERSION]` keyword naming anything other than 2.0.
    BadVersion { version: String },
    /// A keyword that is recognized but deliberately not handled.
    UnsupportedFeature { feature: String },
    /// A data token that does not parse as a number.
    BadNumber { token: String },
    /// A version 1 row total that is not of the form `2 * n^2 + 1` for any `n`.
    InconsistentMatrixShape { count: usize },
    /// A data row carrying more values than the header allows (strict mode only).
    RowWidth { expected: usize, got: usize },
    /// Noise data in a file that does not describe a two-port.
    NoiseRequiresTwoPorts { ports: usize },
    /// A version 2 file missing a keyword the format makes mandatory.
    MissingRequiredKeyword { keyword: &'static str },
    /// A `[REFERENCE]` keyword before the port count is known.
    ReferenceBeforePortCount,
    /// A recognized keyword with an argument outside its value set.
    InvalidKeywordValue {
        keyword: &'static str,
        value: String,
    },
    #[cfg(feature = "to_json")]
    /// Serialisation/Deserialisation error.
    SerdeError(serde_json::Error),
}

impl std::fmt::Display for SnpError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::SnpError::*;
        match self {
            #[cfg(feature = "to_json")]
            SerdeError(x) => write!(fmt, "{}", x),
            MapFile(e) => write!(fmt, "Could not create file map: {}", e),
            BadHeader { line } => write!(
                fmt,
                "File must start with an option line or [VERSION], found '{}'",
                line
            ),
            BadOptionLine { line } => write!(fmt, "Malformed option line '{}'", line),
            BadVersion { version } => {
                write!(fmt, "Only Touchstone version 2.0 is handled, found '{}'", version)
            }
            UnsupportedFeature { feature } => write!(fmt, "{} is not supported", feature),
            BadNumber { token } => write!(fmt, "Could not parse '{}' as a number", token),
            InconsistentMatrixShape { count } => write!(
                fmt,
                "A row of {} values does not describe a square matrix of any port count",
                count
            ),
            RowWidth { expected, got } => write!(
                fmt,
                "Data row carries {} values but the header allows {}",
                got, expected
            ),
            NoiseRequiresTwoPorts { ports } => write!(
                fmt,
                "Noise data is only defined for two-ports, file has {} ports",
                ports
            ),
            MissingRequiredKeyword { keyword } => {
                write!(fmt, "Required keyword {} not found", keyword)
            }
            ReferenceBeforePortCount => {
                write!(fmt, "[REFERENCE] must come after [NUMBER OF PORTS]")
            }
            InvalidKeywordValue { keyword, value } => {
                write!(fmt, "Invalid value '{}' for keyword {}", value, keyword)
            }
        }
    }
}

impl From<SnpError> for String {
    fn from(e: SnpError) -> String {
        e.to_string()
    }
}

impl std::error::Error for SnpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::SnpError::*;
        match self {
            #[cfg(feature = "to_json")]
            SerdeError(x) => x.source(),
            MapFile(x) => x.source(),
            _ => None,
        }
    }
}
