//! Testing infrastructure (behavioural device models and a tick bench).

pub(crate) mod sensor;

pub(crate) use sensor::{ClockedSensor, SimDevice, TwoWireSensor};

use crate::device::Adxl345;
use crate::interface::{BusLines, LineSample, Transport};

/// Wires an engine to a simulated device, feeding each tick the levels the
/// device produced after the previous one.
pub(crate) struct Bench<BUS, DEV> {
    pub(crate) engine: Adxl345<BUS>,
    pub(crate) device: DEV,
    pub(crate) ticks: usize,
    input: LineSample,
}

impl<BUS, DEV> Bench<BUS, DEV>
where
    BUS: Transport,
    DEV: SimDevice,
{
    pub(crate) fn new(engine: Adxl345<BUS>, mut device: DEV) -> Self {
        let input = device.observe(engine.lines());
        Self {
            engine,
            device,
            ticks: 0,
            input,
        }
    }

    pub(crate) fn step(&mut self) -> BusLines {
        let lines = self.engine.tick(self.input);
        self.input = self.device.observe(lines);
        self.ticks += 1;
        lines
    }

    /// Steps until `done` holds, panicking after `limit` ticks.
    pub(crate) fn run_until<F>(&mut self, limit: usize, mut done: F) -> usize
    where
        F: FnMut(&Adxl345<BUS>) -> bool,
    {
        for _ in 0..limit {
            self.step();
            if done(&self.engine) {
                return self.ticks;
            }
        }
        panic!("condition not reached within {limit} ticks");
    }
}
