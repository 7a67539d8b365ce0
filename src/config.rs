//! Configuration primitives for the ADXL345 acquisition engine.
//!
//! Every threshold is expressed in reference ticks, i.e. calls to
//! [`Adxl345::tick`](crate::device::Adxl345::tick).

use crate::params::OutputDataRate;

// ADXL345 supply ramp to first valid transaction (microseconds).
const POWER_UP_SETTLE_US: u32 = 11_100;
// Settle time after writing POWER_CTL before the first data read (microseconds).
const CONFIG_SETTLE_US: u32 = 10_000;
// Reference tick rate the defaults are scaled for.
const DEFAULT_REFERENCE_HZ: u32 = 4_000_000;
// Clocked bus half periods per second (1 MHz SCLK).
const CLOCKED_HALF_PERIOD_HZ: u32 = 2_000_000;
// Two-wire phases per second: four phases per bit at the 400 kHz device limit.
const TWO_WIRE_PHASE_HZ: u32 = 1_600_000;
// Clock-stretch budget on the two-wire bus (microseconds).
const STRETCH_LIMIT_US: u32 = 1_000;
// Shortest stretch limit that covers the read-back of a released clock.
const MIN_STRETCH_LIMIT_TICKS: u32 = 2;

/// Converts a duration in microseconds to reference ticks.
pub const fn ticks_for_us(reference_hz: u32, micros: u32) -> u32 {
    (reference_hz as u64 * micros as u64 / 1_000_000) as u32
}

const fn at_least(value: u32, floor: u32) -> u32 {
    if value < floor { floor } else { value }
}

/// User-facing timing configuration for the acquisition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Reference tick frequency in hertz.
    pub reference_hz: u32,
    /// Reference ticks per bus-clock half period on the clocked bus.
    pub half_period_ticks: u32,
    /// Reference ticks per handshake phase on the two-wire bus.
    pub phase_ticks: u32,
    /// Ticks to wait after power-up before configuring the device.
    pub power_up_ticks: u32,
    /// Ticks between the configuration write and the first burst read.
    pub settle_ticks: u32,
    /// Ticks between consecutive burst reads.
    pub read_interval_ticks: u32,
    /// Ticks a device may hold the clock low before the two-wire bus gives up.
    pub stretch_limit_ticks: u32,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Derives every threshold from device timing at the given tick rate.
    ///
    /// `odr` only paces the burst reads. The device itself stays at its reset
    /// output data rate of 100 Hz because `BW_RATE` is never written.
    pub const fn timed(reference_hz: u32, odr: OutputDataRate) -> Self {
        let phase_ticks = (reference_hz as u64).div_ceil(TWO_WIRE_PHASE_HZ as u64) as u32;
        Self {
            reference_hz,
            half_period_ticks: at_least(reference_hz / CLOCKED_HALF_PERIOD_HZ, 1),
            phase_ticks: at_least(phase_ticks, 1),
            power_up_ticks: ticks_for_us(reference_hz, POWER_UP_SETTLE_US),
            settle_ticks: ticks_for_us(reference_hz, CONFIG_SETTLE_US),
            read_interval_ticks: odr.period_ticks(reference_hz),
            stretch_limit_ticks: at_least(
                ticks_for_us(reference_hz, STRETCH_LIMIT_US),
                MIN_STRETCH_LIMIT_TICKS,
            ),
        }
    }

    /// Checks that every divisor and threshold can actually elapse.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.half_period_ticks == 0 || self.phase_ticks == 0 {
            return Err(ConfigError::ZeroClockDivisor);
        }

        if self.power_up_ticks == 0 || self.settle_ticks == 0 || self.read_interval_ticks == 0 {
            return Err(ConfigError::ZeroDelay);
        }

        // Releasing the clock always costs one tick before the line reads back high.
        if self.stretch_limit_ticks < MIN_STRETCH_LIMIT_TICKS {
            return Err(ConfigError::StretchLimitTooShort);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Replaces every threshold with device timing at `reference_hz` and `odr`.
    pub fn timed(mut self, reference_hz: u32, odr: OutputDataRate) -> Self {
        self.config = Config::timed(reference_hz, odr);
        self
    }

    /// Overrides the bus-clock divisor.
    pub fn half_period_ticks(mut self, ticks: u32) -> Self {
        self.config.half_period_ticks = ticks;
        self
    }

    /// Overrides the handshake phase length of the two-wire bus.
    pub fn phase_ticks(mut self, ticks: u32) -> Self {
        self.config.phase_ticks = ticks;
        self
    }

    /// Overrides the power-up wait.
    pub fn power_up_ticks(mut self, ticks: u32) -> Self {
        self.config.power_up_ticks = ticks;
        self
    }

    /// Overrides the post-configuration settle wait.
    pub fn settle_ticks(mut self, ticks: u32) -> Self {
        self.config.settle_ticks = ticks;
        self
    }

    /// Overrides the spacing between burst reads.
    pub fn read_interval_ticks(mut self, ticks: u32) -> Self {
        self.config.read_interval_ticks = ticks;
        self
    }

    /// Polls once per period of `odr`.
    ///
    /// The device rate is not changed; it keeps sampling at 100 Hz.
    pub fn read_interval_from(mut self, odr: OutputDataRate) -> Self {
        self.config.read_interval_ticks = odr.period_ticks(self.config.reference_hz);
        self
    }

    /// Overrides the clock-stretch timeout of the two-wire bus.
    pub fn stretch_limit_ticks(mut self, ticks: u32) -> Self {
        self.config.stretch_limit_ticks = ticks;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::timed(DEFAULT_REFERENCE_HZ, OutputDataRate::Od100Hz)
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The bus clock would never toggle.
    ZeroClockDivisor,
    /// A wait threshold is zero.
    ZeroDelay,
    /// The clock-stretch timeout cannot cover a single clock release.
    StretchLimitTooShort,
}
