#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

mod error;

pub mod clock;
pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod pins;
pub mod registers;
pub mod sample;
pub mod shift;

#[cfg(test)]
mod testing;

pub use crate::device::Adxl345;
pub use crate::error::{Error, Result};
