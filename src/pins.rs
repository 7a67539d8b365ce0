//! Pin-level binding built on top of `embedded-hal` digital traits.
//!
//! Pin names follow the ADXL345 datasheet (device perspective): the master
//! drives `SCLK`, `SDI` and `CS` and reads `SDO`. `CS` is active low.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::Config;
use crate::device::Adxl345;
use crate::error::{Error, Result};
use crate::interface::{BusLines, ClockedHalfDuplex, LineSample, Transport};

/// Acquisition engine wired to four GPIO pins.
pub struct PinBus<BUS, SCLK, SDI, SDO, CS> {
    engine: Adxl345<BUS>,
    sclk: SCLK,
    sdi: SDI,
    sdo: SDO,
    cs: CS,
    driven: BusLines,
}

impl<SCLK, SDI, SDO, CS, E> PinBus<ClockedHalfDuplex, SCLK, SDI, SDO, CS>
where
    SCLK: OutputPin<Error = E>,
    SDI: OutputPin<Error = E>,
    SDO: InputPin<Error = E>,
    CS: OutputPin<Error = E>,
{
    /// Convenience constructor for the four-wire clocked bus.
    pub fn new_clocked(config: Config, sclk: SCLK, sdi: SDI, sdo: SDO, cs: CS) -> Result<Self, E> {
        let engine = Adxl345::new_clocked(config).map_err(|_| Error::InvalidConfig)?;
        Self::new(engine, sclk, sdi, sdo, cs)
    }
}

impl<BUS, SCLK, SDI, SDO, CS, E> PinBus<BUS, SCLK, SDI, SDO, CS>
where
    BUS: Transport,
    SCLK: OutputPin<Error = E>,
    SDI: OutputPin<Error = E>,
    SDO: InputPin<Error = E>,
    CS: OutputPin<Error = E>,
{
    /// Wraps `engine` and drives every pin to the engine's current levels.
    pub fn new(
        engine: Adxl345<BUS>,
        mut sclk: SCLK,
        mut sdi: SDI,
        sdo: SDO,
        mut cs: CS,
    ) -> Result<Self, E> {
        let lines = engine.lines();
        sclk.set_state(PinState::from(lines.clock))?;
        sdi.set_state(PinState::from(lines.data_out))?;
        cs.set_state(PinState::from(!lines.enable))?;

        Ok(Self {
            engine,
            sclk,
            sdi,
            sdo,
            cs,
            driven: lines,
        })
    }

    /// Samples `SDO`, advances the engine one tick and updates changed outputs.
    ///
    /// Must be called once per reference tick.
    pub fn step(&mut self) -> Result<BusLines, E> {
        let data_in = self.sdo.is_high()?;
        let lines = self.engine.tick(LineSample::data(data_in));
        self.drive(lines)?;
        Ok(lines)
    }

    /// Resets the engine and returns the pins to idle.
    pub fn reset(&mut self) -> Result<(), E> {
        self.engine.reset();
        let lines = self.engine.lines();
        self.drive(lines)
    }

    /// Shared access to the engine.
    pub fn engine(&self) -> &Adxl345<BUS> {
        &self.engine
    }

    /// Mutable access to the engine.
    pub fn engine_mut(&mut self) -> &mut Adxl345<BUS> {
        &mut self.engine
    }

    /// Consumes the binding and returns the engine and pins.
    pub fn release(self) -> (Adxl345<BUS>, SCLK, SDI, SDO, CS) {
        (self.engine, self.sclk, self.sdi, self.sdo, self.cs)
    }

    fn drive(&mut self, lines: BusLines) -> Result<(), E> {
        // Select before the first clock edge, deselect after the last one.
        if lines.enable && !self.driven.enable {
            self.cs.set_low()?;
        }
        if lines.clock != self.driven.clock {
            self.sclk.set_state(PinState::from(lines.clock))?;
        }
        if lines.data_out != self.driven.data_out {
            self.sdi.set_state(PinState::from(lines.data_out))?;
        }
        if !lines.enable && self.driven.enable {
            self.cs.set_high()?;
        }

        self.driven = lines;
        Ok(())
    }
}
