//! Raw frame (image) readout.
//!
//! After the enable handshake the sensor streams one 35x35 frame through the
//! `RAW_DATA_GRAB` register. Every read carries a [`FrameTag`] in its top two
//! bits; a pixel is assembled from an [`FrameTag::Upper`] byte and the byte
//! read immediately after it.

use crate::error::{Error, Result};
use crate::interface::FlowInterface;
use crate::params::{FrameMode, FrameTag, PollLimit};
use crate::registers::{RawDataGrab, Register, RAW_DATA_GRAB_START};
use crate::sequence::{self, FRAME_ENABLE};

/// Width and height of a frame in pixels.
pub const FRAME_WIDTH: usize = 35;
/// Number of pixels in one frame.
pub const FRAME_SIZE: usize = FRAME_WIDTH * FRAME_WIDTH;

// Capture control register cleared before every grab request (bank 0).
const REG_GRAB_CONTROL: u8 = 0x70;
const READY_SETTLE_US: u32 = 50;

fn read_grab<IFACE>(interface: &mut IFACE) -> core::result::Result<RawDataGrab, IFACE::Error>
where
    IFACE: FlowInterface,
{
    interface.read_register(RawDataGrab::ADDRESS).map(RawDataGrab::from)
}

/// Requests a grab and spins until `RAW_DATA_GRAB` stops reporting busy.
pub fn ready_gate<IFACE>(interface: &mut IFACE, limit: PollLimit) -> Result<(), IFACE::Error>
where
    IFACE: FlowInterface,
{
    interface.write_register(REG_GRAB_CONTROL, 0x00)?;
    interface.write_register(RawDataGrab::ADDRESS, RAW_DATA_GRAB_START)?;

    let mut attempts = 0u32;
    loop {
        let status = read_grab(interface)?;
        attempts = attempts.saturating_add(1);
        if status.tag() != FrameTag::Busy {
            return Ok(());
        }
        if limit.exhausted(attempts) {
            warn!("frame ready gate timed out after {=u32} reads", attempts);
            return Err(Error::PollTimeout);
        }
    }
}

/// Switches the sensor into frame readout and waits for the first grab.
pub fn enable_frame_buffer<IFACE>(interface: &mut IFACE, limit: PollLimit) -> Result<(), IFACE::Error>
where
    IFACE: FlowInterface,
{
    sequence::apply(interface, FRAME_ENABLE)?;
    ready_gate(interface, limit)?;
    interface.delay_us(READY_SETTLE_US);
    Ok(())
}

/// Combines an upper byte and the byte that follows it into one pixel.
pub const fn compose_pixel(upper: u8, lower: u8) -> u8 {
    ((upper << 2) & 0xFC) | (lower & 0x03)
}

/// Streams one frame into `buffer` and re-arms the grab afterwards.
///
/// Runs exactly [`FRAME_SIZE`] slots. Returns the number of pixels written to
/// the front of `buffer`; in [`FrameMode::Compatible`] every
/// [`FrameTag::Lower`] byte met while waiting for a slot consumes the slot
/// without a pixel, so the count can be short.
pub fn read_frame<IFACE>(
    interface: &mut IFACE,
    buffer: &mut [u8; FRAME_SIZE],
    limit: PollLimit,
    mode: FrameMode,
) -> Result<usize, IFACE::Error>
where
    IFACE: FlowInterface,
{
    let mut count = 0;

    for _ in 0..FRAME_SIZE {
        if let Some(upper) = next_upper(interface, limit, mode)? {
            let lower = interface.read_register(RawDataGrab::ADDRESS)?;
            buffer[count] = compose_pixel(u8::from(upper), lower);
            count += 1;
        }
    }

    ready_gate(interface, limit)?;

    if count < FRAME_SIZE {
        debug!("frame short by {=usize} pixels", FRAME_SIZE - count);
    }
    Ok(count)
}

/// Reads until an upper byte arrives, or `None` when a slot is skipped.
fn next_upper<IFACE>(
    interface: &mut IFACE,
    limit: PollLimit,
    mode: FrameMode,
) -> Result<Option<RawDataGrab>, IFACE::Error>
where
    IFACE: FlowInterface,
{
    let mut attempts = 0u32;
    loop {
        let grab = read_grab(interface)?;
        attempts = attempts.saturating_add(1);

        match (grab.tag(), mode) {
            (FrameTag::Upper, _) => return Ok(Some(grab)),
            (FrameTag::Lower, FrameMode::Compatible) => {
                trace!("skipping frame slot on lower tag");
                return Ok(None);
            }
            _ => {}
        }

        if limit.exhausted(attempts) {
            warn!("frame tag poll timed out after {=u32} reads", attempts);
            return Err(Error::PollTimeout);
        }
    }
}
