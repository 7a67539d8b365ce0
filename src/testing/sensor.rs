use std::vec::Vec;

use crate::clock::TransitionEvent;
use crate::interface::{BusLines, LineSample};
use crate::params::I2cAddress;
use crate::registers::{BURST_LEN, Command, EXPECTED_DEVID, REG_DATAX0, REG_DEVID};

const REGISTER_COUNT: usize = 64;

pub(crate) trait SimDevice {
    /// Reacts to the master's levels and returns what the master reads next tick.
    fn observe(&mut self, lines: BusLines) -> LineSample;
}

fn register_file(axes: [u8; BURST_LEN]) -> [u8; REGISTER_COUNT] {
    let mut regs = [0u8; REGISTER_COUNT];
    regs[REG_DEVID as usize] = EXPECTED_DEVID;
    let base = REG_DATAX0 as usize;
    regs[base..base + BURST_LEN].copy_from_slice(&axes);
    regs
}

/// Clocked four-wire slave: shifts in on the rising edge, out on the falling edge.
#[derive(Debug, Clone)]
pub(crate) struct ClockedSensor {
    regs: [u8; REGISTER_COUNT],
    writes: Vec<(u8, u8)>,
    commands: Vec<u8>,
    selected: bool,
    clock: bool,
    incoming: u8,
    bits: u8,
    command: Option<Command>,
    pointer: u8,
    outgoing: u8,
    data_out: bool,
}

impl ClockedSensor {
    pub(crate) fn new() -> Self {
        Self {
            regs: register_file([0; BURST_LEN]),
            writes: Vec::new(),
            commands: Vec::new(),
            selected: false,
            clock: true,
            incoming: 0,
            bits: 0,
            command: None,
            pointer: 0,
            outgoing: 0,
            data_out: true,
        }
    }

    pub(crate) fn with_axes(mut self, axes: [u8; BURST_LEN]) -> Self {
        self.set_axes(axes);
        self
    }

    pub(crate) fn set_axes(&mut self, axes: [u8; BURST_LEN]) {
        let base = REG_DATAX0 as usize;
        self.regs[base..base + BURST_LEN].copy_from_slice(&axes);
    }

    pub(crate) fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub(crate) fn commands(&self) -> &[u8] {
        &self.commands
    }

    fn byte_received(&mut self, byte: u8) {
        match self.command {
            None => {
                let command = Command::from(byte);
                self.commands.push(byte);
                self.pointer = command.address();
                self.command = Some(command);
                if command.read() {
                    self.load_outgoing();
                }
            }
            Some(command) if command.read() => {
                if command.multi_byte() {
                    self.load_outgoing();
                }
            }
            Some(command) => {
                self.regs[self.pointer as usize] = byte;
                self.writes.push((self.pointer, byte));
                if command.multi_byte() {
                    self.pointer = (self.pointer + 1) & 0x3F;
                }
            }
        }
    }

    fn load_outgoing(&mut self) {
        self.outgoing = self.regs[self.pointer as usize];
        self.pointer = (self.pointer + 1) & 0x3F;
    }
}

impl SimDevice for ClockedSensor {
    fn observe(&mut self, lines: BusLines) -> LineSample {
        if !lines.enable {
            self.selected = false;
            self.command = None;
            self.bits = 0;
            self.data_out = true;
            self.clock = lines.clock;
            return LineSample::data(true);
        }

        if !self.selected {
            self.selected = true;
            self.incoming = 0;
            self.bits = 0;
        }

        match TransitionEvent::between(self.clock, lines.clock) {
            TransitionEvent::FallingEdge => {
                if self.command.is_some_and(|command| command.read()) {
                    self.data_out = self.outgoing & 0x80 != 0;
                    self.outgoing <<= 1;
                }
            }
            TransitionEvent::RisingEdge => {
                self.incoming = (self.incoming << 1) | lines.data_out as u8;
                self.bits += 1;
                if self.bits == 8 {
                    self.bits = 0;
                    self.byte_received(self.incoming);
                }
            }
            TransitionEvent::None => {}
        }

        self.clock = lines.clock;
        LineSample::data(self.data_out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Receive,
    AckOut,
    Transmit,
    AckIn,
}

/// Open-drain two-wire slave with auto-increment, ACK generation and optional
/// clock stretching after every acknowledged byte.
#[derive(Debug, Clone)]
pub(crate) struct TwoWireSensor {
    regs: [u8; REGISTER_COUNT],
    address: u8,
    writes: Vec<(u8, u8)>,
    mode: Mode,
    incoming: u8,
    bits: u8,
    expect_address: bool,
    expect_pointer: bool,
    reading: bool,
    pointer: u8,
    outgoing: u8,
    master_acked: bool,
    pull_sda: bool,
    stretch: u32,
    hold: u32,
    stuck: bool,
    stall_after: Option<u32>,
    transmitted: u32,
    scl: bool,
    sda: bool,
}

impl TwoWireSensor {
    pub(crate) fn new(address: I2cAddress) -> Self {
        Self {
            regs: register_file([0; BURST_LEN]),
            address: address.addr(),
            writes: Vec::new(),
            mode: Mode::Idle,
            incoming: 0,
            bits: 0,
            expect_address: false,
            expect_pointer: false,
            reading: false,
            pointer: 0,
            outgoing: 0,
            master_acked: false,
            pull_sda: false,
            stretch: 0,
            hold: 0,
            stuck: false,
            stall_after: None,
            transmitted: 0,
            scl: true,
            sda: true,
        }
    }

    pub(crate) fn with_axes(mut self, axes: [u8; BURST_LEN]) -> Self {
        let base = REG_DATAX0 as usize;
        self.regs[base..base + BURST_LEN].copy_from_slice(&axes);
        self
    }

    /// Holds the clock low for `ticks` observations after every ACK it sends.
    pub(crate) fn with_stretch(mut self, ticks: u32) -> Self {
        self.stretch = ticks;
        self
    }

    /// Holds the clock low forever.
    pub(crate) fn with_stuck_clock(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// Holds the clock low forever once `bytes` data bytes have been sent.
    pub(crate) fn with_stall_after(mut self, bytes: u32) -> Self {
        self.stall_after = Some(bytes);
        self
    }

    pub(crate) fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    fn start(&mut self) {
        self.mode = Mode::Receive;
        self.incoming = 0;
        self.bits = 0;
        self.expect_address = true;
        self.pull_sda = false;
    }

    fn clock_rising(&mut self, sda: bool) {
        match self.mode {
            Mode::Receive => {
                self.incoming = (self.incoming << 1) | sda as u8;
                self.bits += 1;
            }
            Mode::AckIn => self.master_acked = !sda,
            Mode::Idle | Mode::AckOut | Mode::Transmit => {}
        }
    }

    fn clock_falling(&mut self) {
        match self.mode {
            Mode::Receive if self.bits == 8 => self.byte_received(),
            Mode::AckOut => {
                self.pull_sda = false;
                self.hold = self.stretch;
                if self.reading {
                    self.transmit_next();
                } else {
                    self.mode = Mode::Receive;
                    self.incoming = 0;
                    self.bits = 0;
                }
            }
            Mode::Transmit => {
                self.bits += 1;
                if self.bits == 8 {
                    self.pull_sda = false;
                    self.mode = Mode::AckIn;
                } else {
                    self.drive_bit();
                }
            }
            Mode::AckIn => {
                if self.master_acked {
                    self.transmit_next();
                } else {
                    self.pull_sda = false;
                    self.mode = Mode::Idle;
                }
            }
            Mode::Idle | Mode::Receive => {}
        }
    }

    fn byte_received(&mut self) {
        let byte = self.incoming;

        if self.expect_address {
            self.expect_address = false;
            if byte >> 1 != self.address {
                self.mode = Mode::Idle;
                return;
            }
            self.reading = byte & 0x01 != 0;
            self.expect_pointer = !self.reading;
        } else if self.expect_pointer {
            self.expect_pointer = false;
            self.pointer = byte & 0x3F;
        } else {
            self.regs[self.pointer as usize] = byte;
            self.writes.push((self.pointer, byte));
            self.pointer = (self.pointer + 1) & 0x3F;
        }

        self.pull_sda = true;
        self.mode = Mode::AckOut;
    }

    fn transmit_next(&mut self) {
        if self.stall_after == Some(self.transmitted) {
            self.stuck = true;
        }
        self.transmitted += 1;
        self.outgoing = self.regs[self.pointer as usize];
        self.pointer = (self.pointer + 1) & 0x3F;
        self.bits = 0;
        self.mode = Mode::Transmit;
        self.drive_bit();
    }

    fn drive_bit(&mut self) {
        self.pull_sda = self.outgoing & (0x80 >> self.bits) == 0;
    }
}

impl SimDevice for TwoWireSensor {
    fn observe(&mut self, lines: BusLines) -> LineSample {
        let scl = lines.clock && self.hold == 0 && !self.stuck;
        self.hold = self.hold.saturating_sub(1);
        let sda = lines.data_out && !self.pull_sda;

        if self.scl && scl {
            if self.sda && !sda {
                self.start();
            } else if !self.sda && sda {
                self.pull_sda = false;
                self.mode = Mode::Idle;
            }
        } else if !self.scl && scl {
            self.clock_rising(sda);
        } else if self.scl && !scl {
            self.clock_falling();
        }

        self.scl = scl;
        self.sda = lines.data_out && !self.pull_sda;
        LineSample::new(self.sda, scl)
    }
}
