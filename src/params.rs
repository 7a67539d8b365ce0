//! Strongly typed parameter enumerations for the ADXL345 engine.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the register definitions. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use adxl345_bitbang::params::{I2cAddress, OutputDataRate};
//!
//! let odr = OutputDataRate::Od100Hz;
//! assert_eq!(odr.millihertz(), 100_000);
//! assert_eq!(I2cAddress::AltLow.addr(), 0x53);
//! ```

use modular_bitfield::prelude::Specifier;

/// Output data rates of the ADXL345, used to pace burst reads.
///
/// Only the polling interval follows the selected rate. The device runs at
/// its reset rate of 100 Hz, so rates above it repeat samples and rates below
/// it skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    /// 6.25 Hz output data rate.
    Od6Hz25,
    /// 12.5 Hz output data rate.
    Od12Hz5,
    /// 25 Hz output data rate.
    Od25Hz,
    /// 50 Hz output data rate.
    Od50Hz,
    /// 100 Hz output data rate.
    Od100Hz,
    /// 200 Hz output data rate.
    Od200Hz,
    /// 400 Hz output data rate.
    Od400Hz,
    /// 800 Hz output data rate.
    Od800Hz,
    /// 1600 Hz output data rate.
    Od1600Hz,
    /// 3200 Hz output data rate.
    Od3200Hz,
}

impl OutputDataRate {
    /// Returns the ODR in millihertz so fractional rates stay exact.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Od6Hz25 => 6_250,
            Self::Od12Hz5 => 12_500,
            Self::Od25Hz => 25_000,
            Self::Od50Hz => 50_000,
            Self::Od100Hz => 100_000,
            Self::Od200Hz => 200_000,
            Self::Od400Hz => 400_000,
            Self::Od800Hz => 800_000,
            Self::Od1600Hz => 1_600_000,
            Self::Od3200Hz => 3_200_000,
        }
    }

    /// Number of reference ticks spanning one output period at `reference_hz`.
    pub const fn period_ticks(self, reference_hz: u32) -> u32 {
        (reference_hz as u64 * 1_000 / self.millihertz() as u64) as u32
    }
}

/// Sleep-mode reading frequency (`POWER_CTL.WAKEUP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum Wakeup {
    /// 8 Hz readings while asleep.
    Hz8 = 0b00,
    /// 4 Hz readings while asleep.
    Hz4 = 0b01,
    /// 2 Hz readings while asleep.
    Hz2 = 0b10,
    /// 1 Hz readings while asleep.
    Hz1 = 0b11,
}

/// Two-wire device address selected by the `ALT ADDRESS` pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cAddress {
    /// `ALT ADDRESS` tied low.
    AltLow,
    /// `ALT ADDRESS` tied high.
    AltHigh,
}

impl I2cAddress {
    /// Returns the 7-bit bus address.
    pub const fn addr(self) -> u8 {
        match self {
            Self::AltLow => 0x53,
            Self::AltHigh => 0x1D,
        }
    }
}
