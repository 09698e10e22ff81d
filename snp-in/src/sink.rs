//! A sink that records everything it is sent.
//!
//! The frames handed to a [`FrameSink`] borrow the parser's buffers, so a consumer
//! that wants to look at them later has to copy. [`RecordingSink`] does exactly that,
//! keeping the sentinels and the frames in arrival order. It backs the [`SnpFile`]
//! front end and is also the easiest way to assert on a parse in tests.
//!
//! [`SnpFile`]: crate::SnpFile
use snp_core::enums::{MeasuredQuantity, Unit};
use snp_core::errors::SnpError;
use snp_core::frames::{AnalogFrame, FrameSink, MqFlags};

/// An [`AnalogFrame`] with owned data.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedFrame {
    pub data: Vec<f64>,
    pub quantity: MeasuredQuantity,
    pub unit: Unit,
    pub flags: MqFlags,
    pub digits: u8,
}

impl From<&AnalogFrame<'_>> for OwnedFrame {
    fn from(frame: &AnalogFrame) -> Self {
        OwnedFrame {
            data: frame.data.to_vec(),
            quantity: frame.quantity,
            unit: frame.unit,
            flags: frame.flags,
            digits: frame.digits,
        }
    }
}

/// Everything a sink can observe, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    SessionBegin,
    SessionEnd,
    FrameBegin,
    FrameEnd,
    Analog(OwnedFrame),
}

/// A [`FrameSink`] that stores owned copies of all events.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink { events: Vec::new() }
    }

    /// Just the analog frames, in emission order.
    pub fn frames(&self) -> Vec<&OwnedFrame> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Analog(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }
}

impl FrameSink for RecordingSink {
    fn session_begin(&mut self) -> Result<(), SnpError> {
        self.events.push(SinkEvent::SessionBegin);
        Ok(())
    }

    fn session_end(&mut self) -> Result<(), SnpError> {
        self.events.push(SinkEvent::SessionEnd);
        Ok(())
    }

    fn frame_begin(&mut self) -> Result<(), SnpError> {
        self.events.push(SinkEvent::FrameBegin);
        Ok(())
    }

    fn frame_end(&mut self) -> Result<(), SnpError> {
        self.events.push(SinkEvent::FrameEnd);
        Ok(())
    }

    fn analog(&mut self, frame: &AnalogFrame) -> Result<(), SnpError> {
        self.events.push(SinkEvent::Analog(frame.into()));
        Ok(())
    }
}
