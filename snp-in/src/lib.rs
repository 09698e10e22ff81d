//! This is a library for reading Touchstone (SnP) network parameter files into rust.
//! It is built around a streaming push parser that accepts arbitrarily-sized byte
//! chunks, so it can sit behind any transport; for the common case of a file on disk
//! there is [`SnpFile`], which maps the file into memory and collects the parsed sweep.
//!
//! The library was designed to follow the Touchstone File Format Specification
//! (IBIS Open Forum, version 2.0), while also accepting the older version 1 dialect
//! with its inferred port counts and its implicit noise section.
//!
//! This library is not designed for writing of Touchstone files.
extern crate log;
extern crate memmap2;
extern crate num;
extern crate snp_core;
#[cfg(test)]
extern crate tempfile;

pub mod buffer;
pub mod parser;
pub mod probe;
pub mod sink;

use memmap2::{Mmap, MmapOptions};

pub use snp_core::enums;
pub use snp_core::errors::*;
pub use snp_core::{AnalogFrame, FrameSink, MqFlags, SnpHeader, SnpSettings};

pub use parser::SnpParser;
pub use probe::format_match;
pub use sink::{OwnedFrame, RecordingSink, SinkEvent};

use snp_core::enums::MeasuredQuantity;
use snp_core::NOISE_ROW_VALUES;

/// One contiguous block of sweep points: the main network data, or the noise section.
///
/// Frequencies are in hertz. For a network block the payload holds one full row-major
/// `n * n` matrix of (magnitude, radians) pairs per point; for a noise block it holds
/// one 5-wide record per point (frequency, noise figure, reflection magnitude,
/// reflection angle, normalized resistance).
#[derive(Debug, Clone, PartialEq)]
pub struct SweepBlock {
    pub(crate) frequencies: Vec<f64>,
    pub(crate) data: Vec<f64>,
    pub(crate) noise: bool,
    pub(crate) stride: usize,
}

impl SweepBlock {
    /// The frequencies of the block, in hertz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// The flat payload of the block.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Whether this is the noise section.
    pub fn is_noise(&self) -> bool {
        self.noise
    }

    /// Number of sweep points in the block.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Obligatory `is_empty` method.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload of one sweep point: a matrix, or a noise record.
    pub fn point(&self, idx: usize) -> Option<&[f64]> {
        let start = idx.checked_mul(self.stride)?;
        self.data.get(start..start + self.stride)
    }
}

/// A fully parsed Touchstone file.
///
/// This is the convenience entry point for callers that have a file on disk and do not
/// care about streaming: the file is mapped into memory, pushed through [`SnpParser`]
/// and reassembled from the emitted frames.
///
/// ```
/// use std::env::var;
/// use std::path::PathBuf;
/// use snp_in::SnpFile;
///
/// let mut root = var("CARGO_MANIFEST_DIR").map(PathBuf::from).unwrap();
/// root.pop();
/// let name = root.join("testdata").join("attenuator.s2p");
///
/// let file = SnpFile::open(name.to_str().unwrap(), Default::default()).unwrap();
/// assert_eq!(file.num_ports(), 2);
/// assert_eq!(file.references(), &[50.0, 50.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SnpFile {
    pub(crate) header: SnpHeader,
    pub(crate) references: Vec<f64>,
    pub(crate) blocks: Vec<SweepBlock>,
}

impl SnpFile {
    /// Attempts to open a Touchstone file stored in a given location, with a given set
    /// of settings.
    pub fn open(file_name: &str, settings: SnpSettings) -> Result<Self, SnpError> {
        let (map, _file) = map_file_to_memory(file_name)?;
        Self::read(&map, settings)
    }

    /// Parse a complete in-memory Touchstone document.
    pub fn read(bytes: &[u8], settings: SnpSettings) -> Result<Self, SnpError> {
        let mut parser = SnpParser::new(settings);
        let mut sink = RecordingSink::new();
        parser.receive(bytes, &mut sink)?;
        parser.end(&mut sink)?;

        let header = parser.header().clone();
        let stride = header.matrix_values();
        let mut references = Vec::new();
        let mut blocks: Vec<SweepBlock> = Vec::new();
        for event in sink.events {
            let frame = match event {
                SinkEvent::Analog(frame) => frame,
                _ => continue,
            };
            match frame.quantity {
                MeasuredQuantity::Resistance if frame.flags.contains(MqFlags::REFERENCE) => {
                    references = frame.data;
                }
                // A frequency frame opens a block, the payload frame that follows
                // completes it.
                MeasuredQuantity::Frequency => blocks.push(SweepBlock {
                    frequencies: frame.data,
                    data: Vec::new(),
                    noise: false,
                    stride,
                }),
                MeasuredQuantity::NPortParameter => {
                    if let Some(block) = blocks.last_mut() {
                        block.noise = frame.flags.contains(MqFlags::TWO_PORT_NOISE);
                        if block.noise {
                            block.stride = NOISE_ROW_VALUES;
                        }
                        block.data = frame.data;
                    }
                }
                _ => {}
            }
        }
        blocks.retain(|block| !block.is_empty());

        Ok(SnpFile {
            header,
            references,
            blocks,
        })
    }

    /// The header record of the parsed file.
    pub fn header(&self) -> &SnpHeader {
        &self.header
    }

    /// Number of ports, declared or inferred.
    pub fn num_ports(&self) -> usize {
        self.header.num_ports
    }

    /// The per-port reference impedances, in ohms.
    pub fn references(&self) -> &[f64] {
        &self.references
    }

    /// Number of sweep blocks (one, or two when a noise section is present).
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get a block by index.
    pub fn block(&self, idx: usize) -> Option<&SweepBlock> {
        self.blocks.get(idx)
    }

    /// Iterate through the blocks.
    pub fn blocks_iter(&self) -> std::slice::Iter<SweepBlock> {
        self.blocks.iter()
    }

    /// The main network data block, if any data was present.
    pub fn network(&self) -> Option<&SweepBlock> {
        self.blocks.iter().find(|block| !block.is_noise())
    }

    /// The noise block, if the file had one.
    pub fn noise(&self) -> Option<&SweepBlock> {
        self.blocks.iter().find(|block| block.is_noise())
    }
}

/// This function creates a memory map from a file.
pub(crate) fn map_file_to_memory(file_name: &str) -> Result<(Mmap, std::fs::File), SnpError> {
    let snp = std::fs::File::open(file_name).map_err(SnpError::MapFile)?;
    let map = unsafe { MmapOptions::new().map(&snp).map_err(SnpError::MapFile)? };
    Ok((map, snp))
}
