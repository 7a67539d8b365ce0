//! Bus transport abstraction for the acquisition engine.
//!
//! A transport turns byte-level requests from the engine into line levels, one
//! reference tick at a time. Two bindings share the same contract:
//! [`ClockedHalfDuplex`] (clock, data-out, data-in, chip-select) and
//! [`HandshakedFourPhase`] (two open-drain lines with acknowledgment and clock
//! stretching).

pub mod clocked;
pub mod handshake;

pub use clocked::ClockedHalfDuplex;
pub use handshake::HandshakedFourPhase;

use crate::registers::Command;

/// Levels driven by the bus master at the physical boundary.
///
/// On the two-wire binding `true` means "released" (pulled up) and `enable`
/// has no wire of its own: it marks the span between start and stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusLines {
    /// Serial clock level.
    pub clock: bool,
    /// Outgoing data level.
    pub data_out: bool,
    /// Transaction enable (chip-select asserted when `true`).
    pub enable: bool,
}

impl BusLines {
    /// Levels of a bus with no transaction in progress.
    pub const IDLE: Self = Self {
        clock: true,
        data_out: true,
        enable: false,
    };
}

/// Levels sampled from the physical boundary before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSample {
    /// Incoming data level.
    pub data_in: bool,
    /// Clock level read back from the wire. Only the two-wire binding uses it.
    pub clock_in: bool,
}

impl LineSample {
    /// Creates a sample from both line levels.
    pub const fn new(data_in: bool, clock_in: bool) -> Self {
        Self { data_in, clock_in }
    }

    /// Sample for a bus where only the data line is read back.
    pub const fn data(data_in: bool) -> Self {
        Self {
            data_in,
            clock_in: true,
        }
    }
}

impl Default for LineSample {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Transfer direction of a [`BusTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master sends payload bytes.
    Write,
    /// Device returns payload bytes.
    Read,
}

/// The command/response exchange currently holding the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusTransaction {
    /// Transfer direction.
    pub direction: Direction,
    /// Raw command byte (read flag, multi-byte flag, register address).
    pub command: u8,
    /// Number of payload bytes following the command.
    pub length: usize,
}

impl BusTransaction {
    /// Describes a transaction for `command` carrying `length` payload bytes.
    pub fn new(command: Command, length: usize) -> Self {
        Self {
            direction: if command.read() {
                Direction::Read
            } else {
                Direction::Write
            },
            command: command.into(),
            length,
        }
    }
}

/// Faults only a transport with acknowledgment can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// The device did not acknowledge a byte.
    Nack,
    /// The device held the clock low past the stretch limit.
    ClockStretchTimeout,
}

/// Completion reported by [`Transport::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportEvent {
    /// The requested byte finished shifting. Carries the byte seen on the data-in side.
    Transferred(u8),
    /// The transaction ended and the enable signal is deasserted.
    Released,
    /// The transfer was abandoned.
    Fault(BusFault),
}

/// Tick-driven byte transport used by [`Adxl345`](crate::device::Adxl345).
///
/// Requests are issued at most once per completion: after `begin`, `write_byte`
/// or `read_byte` the engine waits for [`TransportEvent::Transferred`]; after
/// `end` it waits for [`TransportEvent::Released`].
pub trait Transport {
    /// Releases every line and forgets any request in flight.
    fn reset(&mut self);

    /// Opens a transaction and sends `command`.
    fn begin(&mut self, command: Command);

    /// Sends one payload byte.
    fn write_byte(&mut self, byte: u8);

    /// Receives one payload byte; `last` marks the final byte of the burst.
    fn read_byte(&mut self, last: bool);

    /// Closes the transaction.
    fn end(&mut self);

    /// Advances one reference tick using the sampled input levels.
    fn tick(&mut self, input: LineSample) -> Option<TransportEvent>;

    /// Levels currently driven.
    fn lines(&self) -> BusLines;

    /// Whether a transaction holds the bus.
    fn is_selected(&self) -> bool {
        self.lines().enable
    }
}
