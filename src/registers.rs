//! Register map definitions for the PMW3901 / PAA5100 optical flow sensors.
//!
//! Only a handful of registers are documented by the vendor. Everything the
//! tuning and performance sequences touch beyond these is addressed by raw
//! value in [`crate::sequence`].
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::FrameTag;

/// Register address of `PRODUCT_ID`.
pub const REG_PRODUCT_ID: u8 = 0x00;
/// Register address of `REVISION_ID`.
pub const REG_REVISION_ID: u8 = 0x01;
/// Register address of `MOTION`.
pub const REG_MOTION: u8 = 0x02;
/// Register address of `DELTA_X_L`.
pub const REG_DELTA_X_L: u8 = 0x03;
/// Register address of `DELTA_X_H`.
pub const REG_DELTA_X_H: u8 = 0x04;
/// Register address of `DELTA_Y_L`.
pub const REG_DELTA_Y_L: u8 = 0x05;
/// Register address of `DELTA_Y_H`.
pub const REG_DELTA_Y_H: u8 = 0x06;
/// Register address of `POWER_UP_RESET`.
pub const REG_POWER_UP_RESET: u8 = 0x3A;
/// Register address of `RAW_DATA_GRAB`.
pub const REG_RAW_DATA_GRAB: u8 = 0x58;
/// Register address of `INVERSE_PRODUCT_ID`.
pub const REG_INVERSE_PRODUCT_ID: u8 = 0x5F;
/// Register address of the bank (page) select register.
pub const REG_BANK_SELECT: u8 = 0x7F;

/// Register value types that know their own address.
pub trait Register {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
}

/// Bitfield view of one byte read from `RAW_DATA_GRAB` (address `0x58`).
///
/// Bits 7:6 carry the [`FrameTag`], bits 5:0 the pixel payload.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDataGrab {
    pub payload: B6,
    pub tag: FrameTag,
}

impl From<u8> for RawDataGrab {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<RawDataGrab> for u8 {
    fn from(value: RawDataGrab) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for RawDataGrab {
    const ADDRESS: u8 = REG_RAW_DATA_GRAB;
}

/// Expected value of the `PRODUCT_ID` register.
pub const EXPECTED_PRODUCT_ID: u8 = 0x49;
/// Expected value of the `INVERSE_PRODUCT_ID` register.
pub const EXPECTED_INVERSE_PRODUCT_ID: u8 = 0xB8;
/// Expected value of the `REVISION_ID` register.
pub const EXPECTED_REVISION_ID: u8 = 0x00;

/// Power-up reset command value written to the `POWER_UP_RESET` register.
pub const POWER_UP_RESET_COMMAND: u8 = 0x5A;

/// Value written to `RAW_DATA_GRAB` to request a new frame capture.
pub const RAW_DATA_GRAB_START: u8 = 0xFF;

/// Bank holding the LED drive register.
pub const LED_BANK: u8 = 0x14;
/// LED drive register address (in [`LED_BANK`]).
pub const REG_LED_DRIVE: u8 = 0x6F;
/// LED drive value that turns the illumination LED on.
pub const LED_ON: u8 = 0x1C;
/// LED drive value that turns the illumination LED off.
pub const LED_OFF: u8 = 0x00;
