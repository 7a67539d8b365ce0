//! Latched acceleration samples exposed to consumers.

use crate::registers::BURST_LEN;

/// One complete raw 3-axis reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSample {
    /// X-axis reading.
    pub x: i16,
    /// Y-axis reading.
    pub y: i16,
    /// Z-axis reading.
    pub z: i16,
}

impl AxisSample {
    /// Creates a sample from its three axes.
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decodes the `DATAX0..DATAZ1` burst, low byte first per axis.
    pub const fn from_burst(raw: &[u8; BURST_LEN]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AxisSample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AxisSample {{ x: {}, y: {}, z: {} }}", self.x, self.y, self.z);
    }
}

/// Holds the most recently completed reading plus busy/ready flags.
///
/// `busy` mirrors the bus enable line: it is set whenever any transaction is
/// in flight, not only while a read is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleRegister {
    sample: AxisSample,
    ready: bool,
    busy: bool,
}

impl SampleRegister {
    /// Creates an empty register.
    pub const fn new() -> Self {
        Self {
            sample: AxisSample::new(0, 0, 0),
            ready: false,
            busy: false,
        }
    }

    /// Replaces the held sample and raises the ready flag.
    pub fn latch(&mut self, sample: AxisSample) {
        self.sample = sample;
        self.ready = true;
    }

    /// Snapshot of the held sample and the busy flag.
    pub const fn read(&self) -> (AxisSample, bool) {
        (self.sample, self.busy)
    }

    /// Whether a sample was latched since the last [`take`](Self::take).
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns the held sample if a new one is ready and clears the flag.
    pub fn take(&mut self) -> Option<AxisSample> {
        if self.ready {
            self.ready = false;
            Some(self.sample)
        } else {
            None
        }
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}
