//! Tuning sequence applied once after power-on reset.
//!
//! PixArt ships this as an opaque list of writes with two branches that depend
//! on factory data read back from bank `0x0E`.

use crate::error::Result;
use crate::interface::FlowInterface;
use crate::sequence::{self, CALIBRATION_UNLOCK, TUNING_BRIDGE, TUNING_PRELUDE};

// Bank 0x0E registers.
const REG_GAIN_SELECT: u8 = 0x67;
const REG_GAIN: u8 = 0x48;
const REG_CALIBRATION_STATUS: u8 = 0x73;
const REG_CALIBRATION_1: u8 = 0x70;
const REG_CALIBRATION_2: u8 = 0x71;

const HIGH_GAIN: u8 = 0x04;
const LOW_GAIN: u8 = 0x02;

const CALIBRATION_1_THRESHOLD: u16 = 28;
const CALIBRATION_1_MAX: u16 = 0x3F;
// Approximates a 0.45 scale factor; the register keeps only the low byte.
const CALIBRATION_2_FACTOR: u16 = 45;

/// Runs the tuning sequence, including both data-dependent branches.
pub fn apply_tuning<IFACE>(interface: &mut IFACE) -> Result<(), IFACE::Error>
where
    IFACE: FlowInterface,
{
    sequence::apply(interface, TUNING_PRELUDE)?;

    let gain_select = interface.read_register(REG_GAIN_SELECT)?;
    let gain = if gain_select & 0x80 != 0 { HIGH_GAIN } else { LOW_GAIN };
    trace!("tuning gain select {=u8:#x}, gain {=u8:#x}", gain_select, gain);
    interface.write_register(REG_GAIN, gain)?;

    sequence::apply(interface, TUNING_BRIDGE)?;

    if interface.read_register(REG_CALIBRATION_STATUS)? != 0x00 {
        return Ok(());
    }

    let raw_1 = interface.read_register(REG_CALIBRATION_1)?;
    let raw_2 = interface.read_register(REG_CALIBRATION_2)?;
    let (value_1, value_2) = calibration_values(raw_1, raw_2);
    debug!(
        "calibration {=u8} -> {=u8}, {=u8} -> {=u8}",
        raw_1,
        value_1,
        raw_2,
        value_2
    );

    sequence::apply(interface, CALIBRATION_UNLOCK)?;
    interface.write_register(REG_CALIBRATION_1, value_1)?;
    interface.write_register(REG_CALIBRATION_2, value_2)?;
    Ok(())
}

/// Derives the two calibration values written back when register `0x73` reads zero.
///
/// The first value gains 14 up to the threshold and 11 above it, then is
/// clamped to `0x3F`. The second is multiplied by 45 and truncated to a byte.
pub fn calibration_values(raw_1: u8, raw_2: u8) -> (u8, u8) {
    let value_1 = u16::from(raw_1);
    let value_1 = if value_1 <= CALIBRATION_1_THRESHOLD {
        value_1 + 14
    } else {
        value_1 + 11
    };
    let value_1 = value_1.min(CALIBRATION_1_MAX) as u8;

    let value_2 = (u16::from(raw_2) * CALIBRATION_2_FACTOR) as u8;

    (value_1, value_2)
}
