//! Two-wire handshaked binding with acknowledgment and clock stretching.
//!
//! Every bit slot runs through four phases, each lasting the configured number
//! of ticks:
//!
//! 0. drive data while the clock is low
//! 1. release the clock and wait until it reads back high
//! 2. sample data, or move data to form a start/stop condition
//! 3. pull the clock low
//!
//! Both lines are open-drain: a driven `true` releases the line.

use super::{BusFault, BusLines, LineSample, Transport, TransportEvent};
use crate::params::I2cAddress;
use crate::registers::Command;
use crate::shift::ShiftEngine;

// Longest request: start, address+W, register, repeated start, address+R.
const MAX_STEPS: usize = 5;
// Slot index of the acknowledge bit following eight data bits.
const ACK_SLOT: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Send(u8),
    Receive { ack: bool },
    Stop,
}

/// Four-phase handshaked master addressing a single fixed device.
#[derive(Debug, Clone)]
pub struct HandshakedFourPhase {
    address: u8,
    phase_ticks: u32,
    stretch_limit: u32,
    shift: ShiftEngine,
    script: [Step; MAX_STEPS],
    len: usize,
    pos: usize,
    slot: u8,
    phase: u8,
    wait: u32,
    stretched: u32,
    acked: bool,
    scl: bool,
    sda: bool,
    enable: bool,
}

impl HandshakedFourPhase {
    /// Creates an idle bus talking to `address`.
    ///
    /// Each phase lasts `phase_ticks` ticks; a device may hold the clock low for
    /// up to `stretch_limit_ticks` ticks before the transfer is abandoned.
    pub const fn new(address: I2cAddress, phase_ticks: u32, stretch_limit_ticks: u32) -> Self {
        Self {
            address: address.addr(),
            phase_ticks,
            stretch_limit: stretch_limit_ticks,
            shift: ShiftEngine::new(),
            script: [Step::Stop; MAX_STEPS],
            len: 0,
            pos: 0,
            slot: 0,
            phase: 0,
            wait: 0,
            stretched: 0,
            acked: true,
            scl: true,
            sda: true,
            enable: false,
        }
    }

    /// Whether a request is still being clocked out.
    pub fn is_running(&self) -> bool {
        self.pos < self.len
    }

    fn schedule(&mut self, steps: &[Step]) {
        self.script[..steps.len()].copy_from_slice(steps);
        self.len = steps.len();
        self.pos = 0;
        self.slot = 0;
        self.phase = 0;
        self.wait = 0;
        self.stretched = 0;
        self.prepare(steps[0]);
    }

    fn prepare(&mut self, step: Step) {
        match step {
            Step::Send(byte) => self.shift.load_byte(byte),
            Step::Receive { .. } => self.shift.load_byte(0xFF),
            Step::Start | Step::Stop => {}
        }
        self.acked = true;
    }

    fn drive(&mut self, step: Step, data_in: bool) {
        let data_slot = self.slot < ACK_SLOT;

        match self.phase {
            0 => {
                self.sda = match step {
                    Step::Start => true,
                    Step::Stop => false,
                    Step::Send(_) | Step::Receive { .. } if data_slot => {
                        self.shift.on_transmit_phase()
                    }
                    Step::Send(_) => true,
                    Step::Receive { ack } => !ack,
                }
            }
            2 => match step {
                Step::Start => self.sda = false,
                Step::Stop => self.sda = true,
                Step::Send(_) | Step::Receive { .. } if data_slot => {
                    self.shift.on_receive_phase(data_in)
                }
                Step::Send(_) => self.acked = !data_in,
                Step::Receive { .. } => {}
            },
            _ => {
                if step != Step::Stop {
                    self.scl = false;
                }
            }
        }
    }

    fn complete_slot(&mut self, step: Step) -> Option<TransportEvent> {
        match step {
            Step::Send(_) | Step::Receive { .. } if self.slot < ACK_SLOT => {
                self.slot += 1;
                None
            }
            Step::Send(_) if !self.acked => Some(self.abort(BusFault::Nack)),
            Step::Stop => {
                self.enable = false;
                self.advance()
            }
            _ => self.advance(),
        }
    }

    fn advance(&mut self) -> Option<TransportEvent> {
        let finished = self.script[self.pos];
        self.slot = 0;
        self.pos += 1;

        if self.pos < self.len {
            self.prepare(self.script[self.pos]);
            return None;
        }

        self.len = 0;
        self.pos = 0;
        Some(match finished {
            Step::Stop => TransportEvent::Released,
            _ => TransportEvent::Transferred(self.shift.received()),
        })
    }

    fn abort(&mut self, fault: BusFault) -> TransportEvent {
        // A stop must begin with the clock low, or moving data reads as a start.
        self.scl = false;
        self.len = 0;
        self.pos = 0;
        self.slot = 0;
        self.phase = 0;
        self.wait = 0;
        self.stretched = 0;
        TransportEvent::Fault(fault)
    }
}

impl Transport for HandshakedFourPhase {
    fn reset(&mut self) {
        self.shift.reset();
        self.len = 0;
        self.pos = 0;
        self.slot = 0;
        self.phase = 0;
        self.wait = 0;
        self.stretched = 0;
        self.acked = true;
        self.scl = true;
        self.sda = true;
        self.enable = false;
    }

    fn begin(&mut self, command: Command) {
        let write = self.address << 1;
        let register = command.address();
        self.enable = true;

        if command.read() {
            self.schedule(&[
                Step::Start,
                Step::Send(write),
                Step::Send(register),
                Step::Start,
                Step::Send(write | 0x01),
            ]);
        } else {
            self.schedule(&[Step::Start, Step::Send(write), Step::Send(register)]);
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.schedule(&[Step::Send(byte)]);
    }

    fn read_byte(&mut self, last: bool) {
        self.schedule(&[Step::Receive { ack: !last }]);
    }

    fn end(&mut self) {
        self.schedule(&[Step::Stop]);
    }

    fn tick(&mut self, input: LineSample) -> Option<TransportEvent> {
        if !self.is_running() {
            return None;
        }

        if self.wait > 0 {
            self.wait -= 1;
            return None;
        }

        let step = self.script[self.pos];
        if self.phase == 1 {
            self.scl = true;
            if !input.clock_in {
                self.stretched += 1;
                if self.stretched >= self.stretch_limit {
                    return Some(self.abort(BusFault::ClockStretchTimeout));
                }
                return None;
            }
            self.stretched = 0;
        } else {
            self.drive(step, input.data_in);
        }

        self.wait = self.phase_ticks.saturating_sub(1);
        if self.phase < 3 {
            self.phase += 1;
            return None;
        }

        self.phase = 0;
        self.complete_slot(step)
    }

    fn lines(&self) -> BusLines {
        BusLines {
            clock: self.scl,
            data_out: self.sda,
            enable: self.enable,
        }
    }
}
