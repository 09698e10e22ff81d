//! Format detection for frameworks that sniff files before choosing a reader.
//!
//! The probe gets a file name hint and the first stretch of the file and answers with
//! a confidence, lower meaning stronger. File names are a strong hint; the `.s1p`
//! through `.s8p` suffixes are conventional enough to answer on alone. Failing that,
//! the header has to open like a Touchstone file to get a (weaker) answer.
use snp_core::MAX_SUFFIX_PORTS;

use crate::buffer::{strip_comment, ChunkBuffer};

/// Confidence for a matching `.sNp` file suffix.
const SUFFIX_CONFIDENCE: u32 = 10;
/// Confidence for a header that opens with an option line or a version keyword.
const HEADER_CONFIDENCE: u32 = 50;

/// Decide whether the input looks like a Touchstone file.
///
/// Returns `None` when neither the file name nor the header snippet gives the format
/// away.
/// ```
/// use snp_in::probe::format_match;
///
/// assert_eq!(format_match(Some("sweep.s2p"), None), Some(10));
/// assert_eq!(format_match(Some("sweep.csv"), Some(b"# GHZ S MA R 50\n")), Some(50));
/// assert_eq!(format_match(Some("sweep.csv"), Some(b"1,2,3\n")), None);
/// ```
pub fn format_match(file_name: Option<&str>, header: Option<&[u8]>) -> Option<u32> {
    if let Some(name) = file_name {
        let name = name.to_ascii_lowercase();
        for ports in 1..=MAX_SUFFIX_PORTS {
            if name.ends_with(&format!(".s{}p", ports)) {
                return Some(SUFFIX_CONFIDENCE);
            }
        }
    }

    // No usable name; the snippet has to speak for itself. Normalize it the same way
    // the parser would and look at the first meaningful line.
    let header = header?;
    let mut buffer = ChunkBuffer::new();
    buffer.append(header);
    for raw in buffer.take_lines(true) {
        let line = strip_comment(&raw);
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') || line.starts_with("[VERSION]") {
            return Some(HEADER_CONFIDENCE);
        }
        return None;
    }
    None
}
