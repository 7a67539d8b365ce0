//! Four-wire clocked serial binding.
//!
//! The clock rests high. Each bit is driven on the falling edge and sampled on
//! the rising edge half a bus-clock period later, most significant bit first.

use super::{BusLines, LineSample, Transport, TransportEvent};
use crate::clock::{BitClock, TransitionEvent};
use crate::registers::Command;
use crate::shift::ShiftEngine;

// Clock level between transfers.
const CLOCK_IDLE: bool = true;
// Byte shifted out while the device answers a read.
const READ_FILL: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Shifting,
    Selected,
    Holding(u32),
}

/// Clocked half-duplex master built from [`BitClock`] and [`ShiftEngine`].
#[derive(Debug, Clone)]
pub struct ClockedHalfDuplex {
    clock: BitClock,
    shift: ShiftEngine,
    phase: Phase,
    half_period: u32,
    data_out: bool,
    enable: bool,
}

impl ClockedHalfDuplex {
    /// Creates an idle bus toggling the clock every `half_period_ticks` ticks.
    pub const fn new(half_period_ticks: u32) -> Self {
        Self {
            clock: BitClock::new(half_period_ticks, CLOCK_IDLE),
            shift: ShiftEngine::new(),
            phase: Phase::Idle,
            half_period: half_period_ticks,
            data_out: true,
            enable: false,
        }
    }

    fn load(&mut self, byte: u8) {
        self.shift.load_byte(byte);
        self.phase = Phase::Shifting;
    }
}

impl Transport for ClockedHalfDuplex {
    fn reset(&mut self) {
        self.clock.reset();
        self.shift.reset();
        self.phase = Phase::Idle;
        self.data_out = true;
        self.enable = false;
    }

    fn begin(&mut self, command: Command) {
        self.enable = true;
        self.load(command.into());
    }

    fn write_byte(&mut self, byte: u8) {
        self.load(byte);
    }

    fn read_byte(&mut self, _last: bool) {
        self.load(READ_FILL);
    }

    fn end(&mut self) {
        // Keep the device selected for one more full clock period with the clock parked.
        self.phase = Phase::Holding(2 * self.half_period);
    }

    fn tick(&mut self, input: LineSample) -> Option<TransportEvent> {
        let edge = self.clock.tick(self.phase == Phase::Shifting);

        match self.phase {
            Phase::Shifting => match edge {
                TransitionEvent::FallingEdge => {
                    self.data_out = self.shift.on_transmit_phase();
                }
                TransitionEvent::RisingEdge => {
                    self.shift.on_receive_phase(input.data_in);
                    if self.shift.byte_complete() {
                        self.phase = Phase::Selected;
                        return Some(TransportEvent::Transferred(self.shift.received()));
                    }
                }
                TransitionEvent::None => {}
            },
            Phase::Holding(remaining) => {
                if remaining <= 1 {
                    self.phase = Phase::Idle;
                    self.enable = false;
                    self.data_out = true;
                    return Some(TransportEvent::Released);
                }
                self.phase = Phase::Holding(remaining - 1);
            }
            Phase::Idle | Phase::Selected => {}
        }

        None
    }

    fn lines(&self) -> BusLines {
        BusLines {
            clock: self.clock.level(),
            data_out: self.data_out,
            enable: self.enable,
        }
    }
}
