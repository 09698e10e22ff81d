//! This submodule holds the push parser: the state machine that walks the lines of a
//! Touchstone file and the sweep builder that turns completed data rows into frames.
//!
//! The parser is fed arbitrary byte chunks through [`SnpParser::receive`] and told when
//! the input is over through [`SnpParser::end`]. Frames go out through the sink as
//! blocks of the file complete: the reference impedances as soon as the port count is
//! settled, then per block the frequencies and the matrix (or noise) data. A version 1
//! file is one long implicit data block (with an optional trailing noise block detected
//! by a frequency stepping backwards); a version 2 file announces its sections with
//! bracketed keywords.
use log::{debug, warn};
use num::integer::Roots;

use snp_core::enums::{MatrixFormat, MeasuredQuantity, TwoPortOrder, Unit};
use snp_core::errors::SnpError;
use snp_core::frames::{AnalogFrame, FrameSink, MqFlags};
use snp_core::header::SnpHeader;
use snp_core::settings::SnpSettings;
use snp_core::{ENCODING_DIGITS, INITIAL_SWEEP_CAPACITY, NOISE_ROW_VALUES};

use crate::buffer::{strip_comment, ChunkBuffer};

/// Where in the file the parser currently is.
///
/// The first eight states are the phases of the format itself; `Done` is reached by
/// `[END]` and swallows any trailing input, `Failed` is reached by any error and
/// discards further input until the parser is replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParserState {
    StartFile,
    OptionLine,
    NumPorts,
    Keywords,
    References,
    SkipInfo,
    DataLines,
    NoiseData,
    Done,
    Failed,
}

/// The streaming Touchstone parser.
///
/// One instance parses one file. The sink is passed into `receive` and `end` rather
/// than stored, so the emitted [`AnalogFrame`]s can borrow the parser's sweep store;
/// a sink must consume (or copy) a frame before returning.
/// ```
/// use snp_core::{FrameSink, AnalogFrame, SnpSettings};
/// use snp_in::parser::SnpParser;
///
/// struct CountingSink(usize);
/// impl FrameSink for CountingSink {
///     fn analog(&mut self, frame: &AnalogFrame) -> Result<(), snp_core::SnpError> {
///         self.0 += frame.data.len();
///         Ok(())
///     }
/// }
///
/// let mut parser = SnpParser::new(SnpSettings::default());
/// let mut sink = CountingSink(0);
/// parser.receive(b"# MHZ S MA R 75\n100 0.5 90\n", &mut sink).unwrap();
/// parser.end(&mut sink).unwrap();
/// // One reference, one frequency and one complex pair.
/// assert_eq!(sink.0, 4);
/// ```
#[derive(Debug)]
pub struct SnpParser {
    header: SnpHeader,
    settings: SnpSettings,
    state: ParserState,
    buffer: ChunkBuffer,
    started: bool,
    references_sent: bool,
    frame_open: bool,
    /// Frequency of the row most recently moved to the sweep store, in file units.
    last_freq: f64,
    /// The values of the row currently being assembled, across line boundaries.
    data_set: Vec<f64>,
    /// Frequencies of the current block, already in hertz.
    sweep_freq: Vec<f64>,
    /// Payload of the current block: normalized matrices, or 5-wide noise records.
    sweep_data: Vec<f64>,
}

impl Default for SnpParser {
    fn default() -> Self {
        SnpParser::new(SnpSettings::default())
    }
}

impl SnpParser {
    pub fn new(settings: SnpSettings) -> Self {
        SnpParser {
            header: SnpHeader::default(),
            settings,
            state: ParserState::StartFile,
            buffer: ChunkBuffer::new(),
            started: false,
            references_sent: false,
            frame_open: false,
            last_freq: 0.0,
            data_set: Vec::new(),
            sweep_freq: Vec::new(),
            sweep_data: Vec::new(),
        }
    }

    /// The header record as parsed so far.
    pub fn header(&self) -> &SnpHeader {
        &self.header
    }

    /// Feed one chunk of input.
    ///
    /// Complete lines are processed immediately; the partial tail is held for the next
    /// call. A parser that has failed discards the chunk.
    pub fn receive(&mut self, chunk: &[u8], sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        if self.state == ParserState::Failed {
            return Ok(());
        }
        self.buffer.append(chunk);
        self.process_buffer(false, sink)
    }

    /// Signal end-of-input: the buffered remainder is processed, a version 1 file that
    /// never resolved its port count gets its one chance to do so, and whatever block
    /// is open is flushed. The session end sentinel goes out even when the final lines
    /// fail to parse.
    pub fn end(&mut self, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        let mut ret = Ok(());
        if self.state != ParserState::Failed {
            ret = self.process_buffer(true, sink);
            if ret.is_ok() && self.state != ParserState::Done {
                // A single-row version 1 file never sees a second line; the shape
                // check has to happen here instead.
                if self.header.file_version == 1
                    && self.header.num_ports == 0
                    && !self.data_set.is_empty()
                {
                    ret = self
                        .infer_port_count()
                        .and_then(|_| self.emit_references(sink))
                        .and_then(|_| self.complete_row());
                }
                if ret.is_ok() && self.header.num_ports > 0 {
                    ret = self.flush_block(sink);
                }
                if ret.is_ok() && self.frame_open {
                    ret = sink.frame_end();
                    self.frame_open = false;
                }
            }
            if ret.is_err() {
                self.state = ParserState::Failed;
            }
        }
        if self.started {
            let end_ret = sink.session_end();
            if ret.is_ok() {
                ret = end_ret;
            }
        }
        ret
    }

    /// Truncate the ingest buffer and clear the started flag. The rest of the state
    /// persists; a fresh parse needs a fresh instance.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.started = false;
    }

    fn process_buffer(
        &mut self,
        at_end: bool,
        sink: &mut dyn FrameSink,
    ) -> Result<(), SnpError> {
        if !self.started {
            sink.session_begin()?;
            self.started = true;
        }
        for raw in self.buffer.take_lines(at_end) {
            let line = strip_comment(&raw);
            if line.is_empty() {
                continue;
            }
            if let Err(e) = self.process_line(line, sink) {
                self.state = ParserState::Failed;
                return Err(e);
            }
        }
        Ok(())
    }

    fn process_line(&mut self, line: &str, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        // A version 1 file has exactly one meaningful option line; any later `#` line
        // is a stray and gets skipped, whatever state we are in.
        if line.starts_with('#')
            && self.state != ParserState::StartFile
            && self.state != ParserState::OptionLine
        {
            return Ok(());
        }

        match self.state {
            // A version 1 file starts with the option line, a version 2 file with the
            // [VERSION] keyword.
            ParserState::StartFile => {
                if line.starts_with('#') {
                    self.header.file_version = 1;
                    self.state = ParserState::DataLines;
                    self.header.apply_option_line(line)
                } else if line.starts_with('[') {
                    self.state = ParserState::OptionLine;
                    self.parse_version_line(line)
                } else {
                    Err(SnpError::BadHeader {
                        line: line.to_string(),
                    })
                }
            }
            ParserState::OptionLine => {
                if !line.starts_with('#') {
                    return Err(SnpError::BadHeader {
                        line: line.to_string(),
                    });
                }
                self.state = ParserState::NumPorts;
                self.header.apply_option_line(line)
            }
            ParserState::NumPorts => {
                // Version 2 requires the port count as the first keyword after the
                // option line.
                let arg = keyword_argument(line, "[NUMBER OF PORTS]").ok_or(
                    SnpError::MissingRequiredKeyword {
                        keyword: "[NUMBER OF PORTS]",
                    },
                )?;
                self.header.num_ports = parse_port_count(arg)?;
                self.state = ParserState::Keywords;
                Ok(())
            }
            ParserState::Keywords => {
                if line.starts_with('[') {
                    self.parse_key_line(line, sink)
                } else {
                    self.state = ParserState::DataLines;
                    self.parse_data_line(line, sink)
                }
            }
            ParserState::References => self.parse_references(line, sink),
            ParserState::SkipInfo => {
                if keyword_argument(line, "[END INFORMATION]").is_some() {
                    self.state = ParserState::Keywords;
                }
                Ok(())
            }
            ParserState::DataLines => {
                if line.starts_with('[') {
                    if keyword_argument(line, "[NOISE DATA]").is_some() {
                        return self.begin_noise_block(sink);
                    }
                    if keyword_argument(line, "[END]").is_some() {
                        return self.finish_file(sink);
                    }
                    return Ok(());
                }
                self.parse_data_line(line, sink)
            }
            ParserState::NoiseData => {
                if line.starts_with('[') {
                    if keyword_argument(line, "[END]").is_some() {
                        return self.finish_file(sink);
                    }
                    return Ok(());
                }
                self.parse_data_line(line, sink)
            }
            ParserState::Done | ParserState::Failed => Ok(()),
        }
    }

    fn parse_version_line(&mut self, line: &str) -> Result<(), SnpError> {
        let arg = match keyword_argument(line, "[VERSION]") {
            Some(arg) => arg,
            None => {
                return Err(SnpError::BadHeader {
                    line: line.to_string(),
                })
            }
        };
        if arg.starts_with("2.0") {
            self.header.file_version = 2;
            Ok(())
        } else {
            Err(SnpError::BadVersion {
                version: arg.to_string(),
            })
        }
    }

    fn parse_key_line(&mut self, line: &str, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        if let Some(arg) = keyword_argument(line, "[NUMBER OF PORTS]") {
            self.header.num_ports = parse_port_count(arg)?;
        } else if let Some(arg) = keyword_argument(line, "[TWO-PORT ORDER]") {
            self.header.two_port_order = match arg.split_whitespace().next() {
                Some(token) => TwoPortOrder::from_token(token).ok_or_else(|| {
                    SnpError::InvalidKeywordValue {
                        keyword: "[TWO-PORT ORDER]",
                        value: arg.to_string(),
                    }
                })?,
                None => {
                    return Err(SnpError::InvalidKeywordValue {
                        keyword: "[TWO-PORT ORDER]",
                        value: arg.to_string(),
                    })
                }
            };
        } else if let Some(arg) = keyword_argument(line, "[NUMBER OF FREQUENCIES]") {
            self.header.sweep_points_expected = parse_usize(arg)?;
        } else if let Some(arg) = keyword_argument(line, "[NUMBER OF NOISE FREQUENCIES]") {
            self.header.sweep_points_noise_expected = parse_usize(arg)?;
        } else if let Some(arg) = keyword_argument(line, "[REFERENCE]") {
            if self.header.num_ports == 0 {
                return Err(SnpError::ReferenceBeforePortCount);
            }
            self.header.reference_resistances = Some(Vec::with_capacity(self.header.num_ports));
            self.state = ParserState::References;
            // The keyword line itself may already carry values.
            return self.parse_references(arg, sink);
        } else if let Some(arg) = keyword_argument(line, "[MATRIX FORMAT]") {
            if self.header.num_ports == 0 {
                return Err(SnpError::MissingRequiredKeyword {
                    keyword: "[NUMBER OF PORTS]",
                });
            }
            self.header.matrix_format = match arg.split_whitespace().next() {
                Some(token) => MatrixFormat::from_token(token).ok_or_else(|| {
                    SnpError::InvalidKeywordValue {
                        keyword: "[MATRIX FORMAT]",
                        value: arg.to_string(),
                    }
                })?,
                None => {
                    return Err(SnpError::InvalidKeywordValue {
                        keyword: "[MATRIX FORMAT]",
                        value: arg.to_string(),
                    })
                }
            };
        } else if keyword_argument(line, "[MIXED-MODE ORDER]").is_some() {
            return Err(SnpError::UnsupportedFeature {
                feature: "[MIXED-MODE ORDER]".to_string(),
            });
        } else if keyword_argument(line, "[BEGIN INFORMATION]").is_some() {
            self.state = ParserState::SkipInfo;
        } else if keyword_argument(line, "[NETWORK DATA]").is_some() {
            if self.header.num_ports == 0 {
                return Err(SnpError::MissingRequiredKeyword {
                    keyword: "[NUMBER OF PORTS]",
                });
            }
            self.state = ParserState::DataLines;
        }
        // Unknown keywords are skipped.
        Ok(())
    }

    fn parse_references(&mut self, line: &str, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        let wanted = self.header.num_ports;
        let complete = {
            let refs = match self.header.reference_resistances.as_mut() {
                Some(refs) => refs,
                None => return Err(SnpError::ReferenceBeforePortCount),
            };
            for token in line.split_whitespace() {
                if refs.len() >= wanted {
                    break;
                }
                match token.parse::<f64>() {
                    Ok(value) => refs.push(value),
                    Err(_) => {
                        return Err(SnpError::BadNumber {
                            token: token.to_string(),
                        })
                    }
                }
            }
            refs.len() == wanted
        };
        if complete {
            self.state = ParserState::Keywords;
            self.emit_references(sink)?;
        }
        Ok(())
    }

    fn parse_data_line(&mut self, line: &str, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        let mut vals: Vec<f64> = Vec::new();
        for token in line.split_whitespace() {
            match token.parse::<f64>() {
                Ok(value) => vals.push(value),
                Err(_) => {
                    return Err(SnpError::BadNumber {
                        token: token.to_string(),
                    })
                }
            }
        }
        if vals.is_empty() {
            return Ok(());
        }

        if self.header.num_ports == 0 && self.header.file_version == 1 {
            // Frequencies sit at the odd positions, so a line opening with an odd
            // count while values are pending means a new row has begun and the pending
            // values are one complete row. That pins down the port count.
            if !self.data_set.is_empty() && vals.len() % 2 == 1 {
                self.infer_port_count()?;
                self.emit_references(sink)?;
                self.complete_row()?;
            }
        }

        // A version 1 frequency stepping backwards at a row boundary is the start of
        // the noise section.
        if self.header.file_version == 1
            && self.state == ParserState::DataLines
            && self.header.num_ports > 0
            && self.data_set.is_empty()
            && !self.sweep_freq.is_empty()
            && vals[0] < self.last_freq
        {
            if self.header.num_ports != 2 {
                return Err(SnpError::NoiseRequiresTwoPorts {
                    ports: self.header.num_ports,
                });
            }
            self.flush_block(sink)?;
            self.state = ParserState::NoiseData;
        }

        self.data_set.extend_from_slice(&vals);
        self.try_complete_row()
    }

    fn try_complete_row(&mut self) -> Result<(), SnpError> {
        let expected = if self.state == ParserState::NoiseData {
            Some(NOISE_ROW_VALUES)
        } else {
            self.header.values_per_row()
        };
        let expected = match expected {
            Some(expected) => expected,
            // Version 1 before inference: rows cannot be bounded yet.
            None => return Ok(()),
        };
        if self.data_set.len() > expected {
            if self.settings.get_strict_row_width() {
                return Err(SnpError::RowWidth {
                    expected,
                    got: self.data_set.len(),
                });
            }
            warn!(
                "data row carries {} values, expected {}; truncating",
                self.data_set.len(),
                expected
            );
            self.data_set.truncate(expected);
        }
        if self.data_set.len() == expected {
            if self.state == ParserState::NoiseData {
                self.complete_noise_row();
            } else {
                self.complete_row()?;
            }
        }
        Ok(())
    }

    fn infer_port_count(&mut self) -> Result<(), SnpError> {
        let count = self.data_set.len();
        let ports = (count / 2).sqrt();
        if ports == 0 || 2 * ports * ports + 1 != count {
            return Err(SnpError::InconsistentMatrixShape { count });
        }
        self.header.num_ports = ports;
        Ok(())
    }

    /// Move the completed row out of the data set: frequency to the sweep in hertz,
    /// payload normalized to (magnitude, radians), laid out as one full row-major
    /// matrix.
    fn complete_row(&mut self) -> Result<(), SnpError> {
        let ports = self.header.num_ports;
        if ports == 0 {
            return Err(SnpError::InconsistentMatrixShape {
                count: self.data_set.len(),
            });
        }
        let stride = self.header.matrix_values();
        let raw_freq = self.data_set[0];
        self.last_freq = raw_freq;

        if self.sweep_freq.is_empty() {
            let points = if self.header.file_version > 1 && self.header.sweep_points_expected > 0 {
                self.header.sweep_points_expected
            } else {
                INITIAL_SWEEP_CAPACITY
            };
            self.sweep_freq.reserve(points);
            self.sweep_data.reserve(points * stride);
        }

        let freq_hz = raw_freq * self.header.frequency_unit.multiplier();
        self.sweep_freq.push(freq_hz);
        debug!("adding sweep point at {} Hz", freq_hz);

        let format = self.header.number_format;
        for pair in self.data_set[1..].chunks_exact_mut(2) {
            format.normalize_pair(pair);
        }

        let base = self.sweep_data.len();
        self.sweep_data.resize(base + stride, 0.0);
        let matrix = &mut self.sweep_data[base..];
        match self.header.matrix_format {
            MatrixFormat::Full => matrix.copy_from_slice(&self.data_set[1..]),
            MatrixFormat::Upper => {
                let mut idx = 1;
                for i in 0..ports {
                    let row_len = 2 * (ports - i);
                    let offset = i * (ports + 1) * 2;
                    matrix[offset..offset + row_len]
                        .copy_from_slice(&self.data_set[idx..idx + row_len]);
                    idx += row_len;
                }
                mirror_into_lower(matrix, ports);
            }
            MatrixFormat::Lower => {
                let mut idx = 1;
                for i in 0..ports {
                    let row_len = 2 * (i + 1);
                    let offset = i * ports * 2;
                    matrix[offset..offset + row_len]
                        .copy_from_slice(&self.data_set[idx..idx + row_len]);
                    idx += row_len;
                }
                mirror_into_upper(matrix, ports);
            }
        }

        // Version 1 two-ports store S21 before S12; normalize to row-major.
        if ports == 2 && self.header.two_port_order == TwoPortOrder::Order21_12 {
            matrix.swap(2, 4);
            matrix.swap(3, 5);
        }

        self.data_set.clear();
        Ok(())
    }

    /// Move a completed noise row out of the data set. The record stays 5 wide in the
    /// sweep store, with the frequency repeated for the block's frequency frame.
    fn complete_noise_row(&mut self) {
        self.data_set[0] *= self.header.frequency_unit.multiplier();
        if self.settings.get_convert_noise_values() {
            // Minimum noise figure arrives in dB, the reflection angle in degrees.
            self.data_set[1] = 10f64.powf(self.data_set[1] / 10.0);
            self.data_set[3] = self.data_set[3].to_radians();
        }
        if self.sweep_freq.is_empty() && self.header.sweep_points_noise_expected > 0 {
            self.sweep_freq.reserve(self.header.sweep_points_noise_expected);
            self.sweep_data
                .reserve(self.header.sweep_points_noise_expected * NOISE_ROW_VALUES);
        }
        self.sweep_freq.push(self.data_set[0]);
        self.sweep_data.extend_from_slice(&self.data_set);
        self.data_set.clear();
    }

    /// Send the reference frame, once.
    ///
    /// The per-port vector is completed from the option line's resistance where the
    /// file declared nothing; a version 2 file with non-scattering parameters gets a
    /// vector of ones instead (or, configurably, no frame at all).
    fn emit_references(&mut self, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        if self.references_sent {
            return Ok(());
        }
        let ports = self.header.num_ports;
        if ports == 0 {
            return Ok(());
        }
        if self.header.file_version > 1 && !self.header.is_scattering() {
            if !self.settings.get_emit_nonscattering_reference() {
                self.references_sent = true;
                return Ok(());
            }
            self.header.reference_resistances = Some(vec![1.0; ports]);
        } else {
            let fallback = self.header.reference_resistance;
            let refs = self
                .header
                .reference_resistances
                .get_or_insert_with(Vec::new);
            refs.resize(ports, fallback);
        }
        debug!("sending reference resistance information");
        let data: &[f64] = self.header.reference_resistances.as_deref().unwrap_or(&[]);
        sink.analog(&AnalogFrame {
            data,
            quantity: MeasuredQuantity::Resistance,
            unit: Unit::Ohm,
            flags: MqFlags::REFERENCE,
            digits: ENCODING_DIGITS,
        })?;
        self.references_sent = true;
        Ok(())
    }

    /// Emit the frequencies and the data of the current block, then clear the store.
    ///
    /// Called at `[NOISE DATA]`, `[END]`, the version 1 noise transition and
    /// end-of-input. Whether the payload frame is parameter data or noise data depends
    /// on the state at the time of the call.
    fn flush_block(&mut self, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        self.emit_references(sink)?;
        if !self.frame_open {
            sink.frame_begin()?;
            self.frame_open = true;
        }
        sink.analog(&AnalogFrame {
            data: &self.sweep_freq,
            quantity: MeasuredQuantity::Frequency,
            unit: Unit::Hertz,
            flags: MqFlags::NONE,
            digits: ENCODING_DIGITS,
        })?;
        let flags = if self.state == ParserState::NoiseData {
            MqFlags::TWO_PORT_NOISE
        } else {
            MqFlags::for_kind(self.header.parameter_kind)
        };
        sink.analog(&AnalogFrame {
            data: &self.sweep_data,
            quantity: MeasuredQuantity::NPortParameter,
            unit: Unit::Unitless,
            flags,
            digits: ENCODING_DIGITS,
        })?;
        self.sweep_freq.clear();
        self.sweep_data.clear();
        Ok(())
    }

    /// Handle a `[NOISE DATA]` keyword: close out the main block and switch over.
    fn begin_noise_block(&mut self, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        if self.header.num_ports != 2 {
            return Err(SnpError::NoiseRequiresTwoPorts {
                ports: self.header.num_ports,
            });
        }
        self.flush_block(sink)?;
        self.data_set.clear();
        self.state = ParserState::NoiseData;
        Ok(())
    }

    /// Handle `[END]`: flush, close the data portion and ignore whatever follows.
    fn finish_file(&mut self, sink: &mut dyn FrameSink) -> Result<(), SnpError> {
        self.flush_block(sink)?;
        if self.frame_open {
            sink.frame_end()?;
            self.frame_open = false;
        }
        self.state = ParserState::Done;
        Ok(())
    }
}

/// The argument of a keyword line, if the line starts with that keyword.
fn keyword_argument<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.strip_prefix(keyword).map(str::trim_start)
}

fn parse_usize(arg: &str) -> Result<usize, SnpError> {
    let token = arg.split_whitespace().next().unwrap_or("");
    token.parse::<usize>().map_err(|_| SnpError::BadNumber {
        token: token.to_string(),
    })
}

fn parse_port_count(arg: &str) -> Result<usize, SnpError> {
    let ports = parse_usize(arg)?;
    if ports == 0 {
        return Err(SnpError::InvalidKeywordValue {
            keyword: "[NUMBER OF PORTS]",
            value: arg.to_string(),
        });
    }
    Ok(ports)
}

/// Copy the upper triangle onto the lower one. `matrix` is one row-major complex
/// matrix of `2 * ports * ports` doubles.
fn mirror_into_lower(matrix: &mut [f64], ports: usize) {
    for i in 0..ports {
        for j in (i + 1)..ports {
            matrix[2 * (j * ports + i)] = matrix[2 * (i * ports + j)];
            matrix[2 * (j * ports + i) + 1] = matrix[2 * (i * ports + j) + 1];
        }
    }
}

/// Copy the lower triangle onto the upper one.
fn mirror_into_upper(matrix: &mut [f64], ports: usize) {
    for i in 0..ports {
        for j in (i + 1)..ports {
            matrix[2 * (i * ports + j)] = matrix[2 * (j * ports + i)];
            matrix[2 * (i * ports + j) + 1] = matrix[2 * (j * ports + i) + 1];
        }
    }
}
