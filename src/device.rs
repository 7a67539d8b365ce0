//! Tick-driven ADXL345 acquisition engine.
//!
//! The engine is advanced by calling [`Adxl345::tick`] exactly once per
//! reference tick. Every wait is a counted number of ticks, so skipping calls
//! stretches all device timing by the number of skipped ticks.

use crate::config::{Config, ConfigError};
use crate::interface::{
    BusFault,
    BusLines,
    BusTransaction,
    ClockedHalfDuplex,
    HandshakedFourPhase,
    LineSample,
    Transport,
    TransportEvent,
};
use crate::params::I2cAddress;
use crate::registers::{BURST_LEN, Command, PowerCtl, REG_DATAX0, REG_POWER_CTL};
use crate::sample::{AxisSample, SampleRegister};

/// Position of the acquisition sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for the device supply to settle.
    #[default]
    PowerUpWait,
    /// Shifting the `POWER_CTL` write command.
    ConfigWriteCmd,
    /// Shifting the measurement-mode payload.
    ConfigWriteData,
    /// Holding enable for one clock period after the payload.
    WaitWriteDone,
    /// Waiting for the device to start measuring.
    PostWriteDelay,
    /// Shifting the burst-read command.
    ReadCmd,
    /// Receiving the six data bytes.
    ReadBytes,
    /// Sample latched; holding enable before release.
    WaitReadDone,
    /// Waiting one output period before the next read.
    PostReadDelay,
}

/// Sequencer position plus its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineState {
    /// Current state.
    pub state: State,
    /// Ticks spent in the current state.
    pub delay: u32,
    /// Index of the next burst byte to capture.
    pub byte_cursor: u8,
}

/// Running counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Samples latched since construction.
    pub samples: u32,
    /// Transport faults since construction.
    pub faults: u32,
}

/// Bit-banged acquisition engine for the ADXL345 accelerometer.
pub struct Adxl345<BUS> {
    bus: BUS,
    config: Config,
    engine: EngineState,
    raw: [u8; BURST_LEN],
    transaction: Option<BusTransaction>,
    samples: SampleRegister,
    fault: Option<BusFault>,
    stats: Stats,
}

impl<BUS> Adxl345<BUS> {
    // ==================================================================
    // == Ownership =====================================================
    // ==================================================================
    /// Consumes the engine and returns the owned transport.
    pub fn release(self) -> (BUS, Config) {
        (self.bus, self.config)
    }

    /// Provides read access to the underlying transport.
    pub fn bus(&self) -> &BUS {
        &self.bus
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================================================================
    // == Observation ===================================================
    // ==================================================================
    /// Copy of the sequencer state.
    pub fn engine_state(&self) -> EngineState {
        self.engine
    }

    /// Current sequencer position.
    pub fn state(&self) -> State {
        self.engine.state
    }

    /// Transaction holding the bus, if any.
    pub fn transaction(&self) -> Option<BusTransaction> {
        self.transaction
    }

    /// Latched sample and whether a transaction is in flight.
    pub fn read(&self) -> (AxisSample, bool) {
        self.samples.read()
    }

    /// Latched sample.
    pub fn sample(&self) -> AxisSample {
        self.samples.read().0
    }

    /// Returns the latched sample once per latch.
    pub fn take_sample(&mut self) -> Option<AxisSample> {
        self.samples.take()
    }

    /// Most recent transport fault, kept until taken or reset.
    pub fn last_fault(&self) -> Option<BusFault> {
        self.fault
    }

    /// Returns and clears the most recent transport fault.
    pub fn take_fault(&mut self) -> Option<BusFault> {
        self.fault.take()
    }

    /// Latch and fault counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }
}

impl Adxl345<ClockedHalfDuplex> {
    /// Convenience constructor for the four-wire clocked bus.
    pub fn new_clocked(config: Config) -> Result<Self, ConfigError> {
        Self::new(ClockedHalfDuplex::new(config.half_period_ticks), config)
    }
}

impl Adxl345<HandshakedFourPhase> {
    /// Convenience constructor for the two-wire handshaked bus.
    pub fn new_handshaked(config: Config, address: I2cAddress) -> Result<Self, ConfigError> {
        let bus = HandshakedFourPhase::new(address, config.phase_ticks, config.stretch_limit_ticks);
        Self::new(bus, config)
    }
}

impl<BUS> Adxl345<BUS>
where
    BUS: Transport,
{
    // ==================================================================
    // == Construction ==================================================
    // ==================================================================
    /// Creates an engine in [`State::PowerUpWait`] driving `bus`.
    pub fn new(mut bus: BUS, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        bus.reset();

        Ok(Self {
            bus,
            config,
            engine: EngineState::default(),
            raw: [0; BURST_LEN],
            transaction: None,
            samples: SampleRegister::new(),
            fault: None,
            stats: Stats::default(),
        })
    }

    // ==================================================================
    // == Tick & Reset ==================================================
    // ==================================================================
    /// Advances the engine by one reference tick and returns the levels to drive.
    ///
    /// `input` holds the line levels sampled before this tick.
    pub fn tick(&mut self, input: LineSample) -> BusLines {
        match self.bus.tick(input) {
            Some(TransportEvent::Fault(fault)) => self.on_fault(fault),
            event => self.advance(event),
        }

        self.samples.set_busy(self.bus.is_selected());
        self.bus.lines()
    }

    /// Synchronous reset: back to [`State::PowerUpWait`] with an idle bus.
    ///
    /// A partially captured burst is discarded; the last latched sample stays.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.engine = EngineState::default();
        self.raw = [0; BURST_LEN];
        self.transaction = None;
        self.fault = None;
        self.samples.set_busy(false);
    }

    /// Levels currently driven onto the bus.
    pub fn lines(&self) -> BusLines {
        self.bus.lines()
    }

    // ==================================================================
    // == Sequencer =====================================================
    // ==================================================================
    fn advance(&mut self, event: Option<TransportEvent>) {
        let transferred = match event {
            Some(TransportEvent::Transferred(byte)) => Some(byte),
            _ => None,
        };
        let released = event == Some(TransportEvent::Released);

        match self.engine.state {
            State::PowerUpWait => {
                if self.elapsed(self.config.power_up_ticks) {
                    info!("power-up settled, enabling measurement");
                    self.open(Command::write(REG_POWER_CTL), 1, State::ConfigWriteCmd);
                }
            }
            State::ConfigWriteCmd => {
                if transferred.is_some() {
                    self.bus.write_byte(PowerCtl::measuring().into());
                    self.enter(State::ConfigWriteData);
                }
            }
            State::ConfigWriteData => {
                if transferred.is_some() {
                    self.bus.end();
                    self.enter(State::WaitWriteDone);
                }
            }
            State::WaitWriteDone => {
                if released {
                    self.close(State::PostWriteDelay);
                }
            }
            State::PostWriteDelay => {
                if self.elapsed(self.config.settle_ticks) {
                    self.open_read();
                }
            }
            State::ReadCmd => {
                if transferred.is_some() {
                    self.engine.byte_cursor = 0;
                    self.bus.read_byte(false);
                    self.enter(State::ReadBytes);
                }
            }
            State::ReadBytes => {
                if let Some(byte) = transferred {
                    self.capture(byte);
                }
            }
            State::WaitReadDone => {
                if released {
                    self.close(State::PostReadDelay);
                }
            }
            State::PostReadDelay => {
                if self.elapsed(self.config.read_interval_ticks) {
                    self.open_read();
                }
            }
        }
    }

    fn capture(&mut self, byte: u8) {
        let cursor = self.engine.byte_cursor as usize;
        self.raw[cursor] = byte;

        let next = cursor + 1;
        if next < BURST_LEN {
            self.engine.byte_cursor = next as u8;
            self.bus.read_byte(next == BURST_LEN - 1);
            return;
        }

        let sample = AxisSample::from_burst(&self.raw);
        self.samples.latch(sample);
        self.stats.samples = self.stats.samples.wrapping_add(1);
        trace!("latched {}", sample);

        self.engine.byte_cursor = 0;
        self.bus.end();
        self.enter(State::WaitReadDone);
    }

    fn on_fault(&mut self, fault: BusFault) {
        warn!("bus fault {} in {}", fault, self.engine.state);
        self.fault = Some(fault);
        self.stats.faults = self.stats.faults.wrapping_add(1);

        match self.engine.state {
            State::ConfigWriteCmd | State::ConfigWriteData => {
                self.bus.end();
                self.enter(State::WaitWriteDone);
            }
            State::ReadCmd | State::ReadBytes => {
                self.engine.byte_cursor = 0;
                self.bus.end();
                self.enter(State::WaitReadDone);
            }
            State::WaitWriteDone => {
                self.bus.reset();
                self.close(State::PostWriteDelay);
            }
            State::WaitReadDone => {
                self.bus.reset();
                self.close(State::PostReadDelay);
            }
            State::PowerUpWait | State::PostWriteDelay | State::PostReadDelay => {}
        }
    }

    fn open_read(&mut self) {
        self.open(Command::burst_read(REG_DATAX0), BURST_LEN, State::ReadCmd);
    }

    fn open(&mut self, command: Command, length: usize, next: State) {
        self.bus.begin(command);
        self.transaction = Some(BusTransaction::new(command, length));
        self.enter(next);
    }

    fn close(&mut self, next: State) {
        self.transaction = None;
        self.enter(next);
    }

    fn enter(&mut self, next: State) {
        debug!("{} -> {}", self.engine.state, next);
        self.engine.state = next;
        self.engine.delay = 0;
    }

    fn elapsed(&mut self, threshold: u32) -> bool {
        self.engine.delay = self.engine.delay.saturating_add(1);
        self.engine.delay >= threshold
    }
}
