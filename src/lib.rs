#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;
mod error;

pub mod config;
pub mod device;
pub mod frame;
pub mod interface;
pub mod params;
pub mod registers;
pub mod sequence;
pub mod tuning;

#[cfg(test)]
mod testing;

pub use crate::device::{MotionDelta, OpticalFlow, ProductId};
pub use crate::error::{Error, Result};
pub use crate::frame::{FRAME_SIZE, FRAME_WIDTH};
pub use crate::interface::spi::{SPI_MAX_FREQUENCY_HZ, SPI_MODE};
