//! Vendor register sequences expressed as data.
//!
//! The values below come from PixArt application notes and are not documented
//! any further. Bank-select writes (`0x7F`) change the meaning of every address
//! that follows them, so each table must be replayed exactly in order.

use crate::error::Result;
use crate::interface::FlowInterface;
use crate::params::Variant;

/// One entry of a register sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Write `value` to `register`.
    Write(u8, u8),
    /// Pause for the given number of milliseconds.
    DelayMs(u32),
}

const fn w(register: u8, value: u8) -> Step {
    Step::Write(register, value)
}

/// Tuning writes issued before the first branch on register `0x67`.
pub const TUNING_PRELUDE: &[Step] = &[
    w(0x7F, 0x00),
    w(0x55, 0x01),
    w(0x50, 0x07),
    w(0x7F, 0x0E),
    w(0x43, 0x10),
];

/// Tuning writes issued between the two branches.
pub const TUNING_BRIDGE: &[Step] = &[
    w(0x7F, 0x00),
    w(0x51, 0x7B),
    w(0x50, 0x00),
    w(0x55, 0x00),
    w(0x7F, 0x0E),
];

/// Writes preceding the calibrated values when register `0x73` reads zero.
pub const CALIBRATION_UNLOCK: &[Step] = &[
    w(0x7F, 0x00),
    w(0x61, 0xAD),
    w(0x51, 0x70),
    w(0x7F, 0x0E),
];

/// Handshake that switches the sensor into raw frame readout.
pub const FRAME_ENABLE: &[Step] = &[
    w(0x7F, 0x07),
    w(0x41, 0x1D),
    w(0x4C, 0x00),
    w(0x7F, 0x08),
    w(0x6A, 0x38),
    w(0x7F, 0x00),
    w(0x55, 0x04),
    w(0x40, 0x80),
    w(0x4D, 0x11),
];

/// Performance optimisation registers for the PMW3901.
pub const PMW3901_PERFORMANCE: &[Step] = &[
    w(0x7F, 0x00),
    w(0x61, 0xAD),
    w(0x7F, 0x03),
    w(0x40, 0x00),
    w(0x7F, 0x05),
    w(0x41, 0xB3),
    w(0x43, 0xF1),
    w(0x45, 0x14),
    w(0x5B, 0x32),
    w(0x5F, 0x34),
    w(0x7B, 0x08),
    w(0x7F, 0x06),
    w(0x44, 0x1B),
    w(0x40, 0xBF),
    w(0x4E, 0x3F),
    w(0x7F, 0x08),
    w(0x65, 0x20),
    w(0x6A, 0x18),
    w(0x7F, 0x09),
    w(0x4F, 0xAF),
    w(0x5F, 0x40),
    w(0x48, 0x80),
    w(0x49, 0x80),
    w(0x57, 0x77),
    w(0x60, 0x78),
    w(0x61, 0x78),
    w(0x62, 0x08),
    w(0x63, 0x50),
    w(0x7F, 0x0A),
    w(0x45, 0x60),
    w(0x7F, 0x00),
    w(0x4D, 0x11),
    w(0x55, 0x80),
    w(0x74, 0x1F),
    w(0x75, 0x1F),
    w(0x4A, 0x78),
    w(0x4B, 0x78),
    w(0x44, 0x08),
    w(0x45, 0x50),
    w(0x64, 0xFF),
    w(0x65, 0x1F),
    w(0x7F, 0x14),
    w(0x65, 0x60),
    w(0x66, 0x08),
    w(0x63, 0x78),
    w(0x7F, 0x15),
    w(0x48, 0x58),
    w(0x7F, 0x07),
    w(0x41, 0x0D),
    w(0x43, 0x14),
    w(0x4B, 0x0E),
    w(0x45, 0x0F),
    w(0x44, 0x42),
    w(0x4C, 0x80),
    w(0x7F, 0x10),
    w(0x5B, 0x02),
    w(0x7F, 0x07),
    w(0x40, 0x41),
    w(0x70, 0x00),
    Step::DelayMs(100),
    w(0x32, 0x44),
    w(0x7F, 0x07),
    w(0x40, 0x40),
    w(0x7F, 0x06),
    w(0x62, 0xF0),
    w(0x63, 0x00),
    w(0x7F, 0x0D),
    w(0x48, 0xC0),
    w(0x6F, 0xD5),
    w(0x7F, 0x00),
    w(0x5B, 0xA0),
    w(0x4E, 0xA8),
    w(0x5A, 0x50),
    w(0x40, 0x80),
];

/// Performance optimisation registers for the PAA5100JE.
pub const PAA5100_PERFORMANCE: &[Step] = &[
    w(0x7F, 0x00),
    w(0x61, 0xAD),
    w(0x7F, 0x03),
    w(0x40, 0x00),
    w(0x7F, 0x05),
    w(0x41, 0xB3),
    w(0x43, 0xF1),
    w(0x45, 0x14),
    w(0x5F, 0x34),
    w(0x7B, 0x08),
    w(0x5E, 0x34),
    w(0x5B, 0x11),
    w(0x6D, 0x11),
    w(0x45, 0x17),
    w(0x70, 0xE5),
    w(0x71, 0xE5),
    w(0x7F, 0x06),
    w(0x44, 0x1B),
    w(0x40, 0xBF),
    w(0x4E, 0x3F),
    w(0x7F, 0x08),
    w(0x66, 0x44),
    w(0x65, 0x20),
    w(0x6A, 0x3A),
    w(0x61, 0x05),
    w(0x62, 0x05),
    w(0x7F, 0x09),
    w(0x4F, 0xAF),
    w(0x5F, 0x40),
    w(0x48, 0x80),
    w(0x49, 0x80),
    w(0x57, 0x77),
    w(0x60, 0x78),
    w(0x61, 0x78),
    w(0x62, 0x08),
    w(0x63, 0x50),
    w(0x7F, 0x0A),
    w(0x45, 0x60),
    w(0x7F, 0x00),
    w(0x4D, 0x11),
    w(0x55, 0x80),
    w(0x74, 0x21),
    w(0x75, 0x1F),
    w(0x4A, 0x78),
    w(0x4B, 0x78),
    w(0x44, 0x08),
    w(0x45, 0x50),
    w(0x64, 0xFF),
    w(0x65, 0x1F),
    w(0x7F, 0x14),
    w(0x65, 0x67),
    w(0x66, 0x08),
    w(0x63, 0x70),
    w(0x6F, 0x1C),
    w(0x7F, 0x15),
    w(0x48, 0x48),
    w(0x7F, 0x07),
    w(0x41, 0x0D),
    w(0x43, 0x14),
    w(0x4B, 0x0E),
    w(0x45, 0x0F),
    w(0x44, 0x42),
    w(0x4C, 0x80),
    w(0x7F, 0x10),
    w(0x5B, 0x02),
    w(0x7F, 0x07),
    w(0x40, 0x41),
    Step::DelayMs(100),
    w(0x7F, 0x00),
    w(0x32, 0x00),
    w(0x7F, 0x07),
    w(0x40, 0x40),
    w(0x7F, 0x06),
    w(0x68, 0xF0),
    w(0x69, 0x00),
    w(0x7F, 0x0D),
    w(0x48, 0xC0),
    w(0x6F, 0xD5),
    w(0x7F, 0x00),
    w(0x5B, 0xA0),
    w(0x4E, 0xA8),
    w(0x5A, 0x90),
    w(0x40, 0x80),
    w(0x73, 0x1F),
    Step::DelayMs(100),
    w(0x73, 0x00),
];

/// Returns the performance register load for `variant`.
pub const fn performance_table(variant: Variant) -> &'static [Step] {
    match variant {
        Variant::Pmw3901 => PMW3901_PERFORMANCE,
        Variant::Paa5100 => PAA5100_PERFORMANCE,
    }
}

/// Replays `steps` in order, pausing at every [`Step::DelayMs`].
pub fn apply<IFACE>(interface: &mut IFACE, steps: &[Step]) -> Result<(), IFACE::Error>
where
    IFACE: FlowInterface,
{
    for step in steps {
        match *step {
            Step::Write(register, value) => interface.write_register(register, value)?,
            Step::DelayMs(ms) => interface.delay_ms(ms),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, SimInterface};

    fn writes(steps: &[Step]) -> usize {
        steps.iter().filter(|step| matches!(step, Step::Write(..))).count()
    }

    #[test]
    fn tables_start_by_selecting_bank_zero() {
        for table in [PMW3901_PERFORMANCE, PAA5100_PERFORMANCE, TUNING_PRELUDE, TUNING_BRIDGE] {
            assert_eq!(table[0], Step::Write(0x7F, 0x00));
        }
    }

    #[test]
    fn pmw3901_table_pauses_once_after_bank_seven_setup() {
        let pauses: Vec<usize> = PMW3901_PERFORMANCE
            .iter()
            .enumerate()
            .filter(|(_, step)| matches!(step, Step::DelayMs(_)))
            .map(|(index, _)| index)
            .collect();

        assert_eq!(pauses.len(), 1);
        assert_eq!(PMW3901_PERFORMANCE[pauses[0]], Step::DelayMs(100));
        assert_eq!(PMW3901_PERFORMANCE[pauses[0] - 1], Step::Write(0x70, 0x00));
        assert_eq!(PMW3901_PERFORMANCE[pauses[0] + 1], Step::Write(0x32, 0x44));
        assert_eq!(writes(PMW3901_PERFORMANCE), 73);
    }

    #[test]
    fn paa5100_table_toggles_register_0x73_around_final_pause() {
        let len = PAA5100_PERFORMANCE.len();
        assert_eq!(
            &PAA5100_PERFORMANCE[len - 3..],
            &[w(0x73, 0x1F), Step::DelayMs(100), w(0x73, 0x00)]
        );
        assert_eq!(writes(PAA5100_PERFORMANCE), 84);
    }

    #[test]
    fn apply_replays_writes_and_pauses_in_order() {
        let mut sim = SimInterface::new();
        let steps = [w(0x7F, 0x05), w(0x41, 0xB3), Step::DelayMs(100), w(0x7F, 0x00)];

        apply(&mut sim, &steps).unwrap();

        assert_eq!(
            sim.ops(),
            &[
                Op::Write(0x7F, 0x05),
                Op::Write(0x41, 0xB3),
                Op::DelayMs(100),
                Op::Write(0x7F, 0x00),
            ]
        );
    }

    #[test]
    fn frame_enable_handshake_is_nine_writes() {
        assert_eq!(FRAME_ENABLE.len(), 9);
        assert_eq!(writes(FRAME_ENABLE), 9);
    }
}
