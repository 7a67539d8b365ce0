//! Register map and command byte definitions for the ADXL345 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::Wakeup;

/// Register address of `DEVID`.
pub const REG_DEVID: u8 = 0x00;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `DATAX0`.
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `DATAX1`.
pub const REG_DATAX1: u8 = 0x33;
/// Register address of `DATAY0`.
pub const REG_DATAY0: u8 = 0x34;
/// Register address of `DATAY1`.
pub const REG_DATAY1: u8 = 0x35;
/// Register address of `DATAZ0`.
pub const REG_DATAZ0: u8 = 0x36;
/// Register address of `DATAZ1`.
pub const REG_DATAZ1: u8 = 0x37;

/// Expected content of `DEVID`.
pub const EXPECTED_DEVID: u8 = 0xE5;

/// Number of consecutive bytes spanning the X, Y, Z data registers.
pub const BURST_LEN: usize = 6;

/// Command byte sent first in every clocked transaction.
///
/// Bit 7 selects read, bit 6 enables multi-byte auto-increment, bits 5:0 hold
/// the register address.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    // Register address (bits 5:0).
    pub address: B6,
    // Multi-byte transfer flag (bit 6).
    pub multi_byte: bool,
    // Read flag (bit 7).
    pub read: bool,
}

impl Command {
    /// Single-byte write to `register`.
    pub fn write(register: u8) -> Self {
        Self::new().with_address(register & 0x3F)
    }

    /// Multi-byte read starting at `register`.
    pub fn burst_read(register: u8) -> Self {
        Self::new()
            .with_address(register & 0x3F)
            .with_multi_byte(true)
            .with_read(true)
    }
}

impl From<u8> for Command {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerCtl {
    // Sleep-mode reading frequency (bits 1:0).
    pub wakeup: Wakeup,
    // Sleep mode enable (bit 2).
    pub sleep: bool,
    // Measurement mode enable (bit 3).
    pub measure: bool,
    // Auto-sleep enable (bit 4).
    pub auto_sleep: bool,
    // Activity/inactivity link (bit 5).
    pub link: bool,
    #[skip]
    __: B2,
}

impl PowerCtl {
    /// Continuous measurement with every other feature left at reset.
    pub fn measuring() -> Self {
        Self::new().with_measure(true)
    }
}

impl From<u8> for PowerCtl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerCtl> for u8 {
    fn from(value: PowerCtl) -> Self {
        value.into_bytes()[0]
    }
}
