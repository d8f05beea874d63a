//! SPI interface implementation built on top of `embedded-hal` `SpiBus`.
//!
//! The sensor needs microsecond gaps while chip-select is held low and a
//! chip-select pulse that is not tied to any transfer, so the interface drives
//! the bus, the chip-select pin and the delay source itself instead of going
//! through `SpiDevice`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, SpiBus, MODE_3};

use super::FlowInterface;

/// SPI mode the bus must be configured with before handing it to the driver.
pub const SPI_MODE: Mode = MODE_3;
/// Maximum SPI clock frequency supported by the sensor.
pub const SPI_MAX_FREQUENCY_HZ: u32 = 4_000_000;

// Bit 7 of the address byte selects a register write.
const WRITE_FLAG: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;

// Minimum timing floors around each register access (microseconds).
const CS_SETUP_US: u32 = 50;
const ADDRESS_GAP_US: u32 = 50;
const WRITE_HOLD_US: u32 = 50;
const READ_HOLD_US: u32 = 100;
const WRITE_RECOVERY_US: u32 = 200;

// Hold time for each edge of the bus reset pulse (milliseconds).
const RESET_EDGE_MS: u32 = 1;

/// Errors reported by [`SpiInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<SpiE, PinE> {
    /// The SPI bus reported an error.
    Spi(SpiE),
    /// The chip-select pin reported an error.
    Pin(PinE),
}

/// SPI-based interface implementation for the optical flow driver.
pub struct SpiInterface<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
}

impl<SPI, CS, D> SpiInterface<SPI, CS, D> {
    /// Creates a new interface from an SPI bus, its chip-select pin and a delay source.
    ///
    /// The bus must already be configured for [`SPI_MODE`], MSB first, at no more
    /// than [`SPI_MAX_FREQUENCY_HZ`].
    pub const fn new(spi: SPI, cs: CS, delay: D) -> Self {
        Self { spi, cs, delay }
    }

    /// Builds the address byte used to read or write a register.
    fn address_byte(register: u8, is_write: bool) -> u8 {
        let address = register & ADDRESS_MASK;
        if is_write { address | WRITE_FLAG } else { address }
    }

    /// Consumes the interface and returns the owned bus, pin and delay.
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }
}

impl<SPI, CS, D> SpiInterface<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    fn select(&mut self) -> core::result::Result<(), InterfaceError<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(InterfaceError::Pin)
    }

    fn deselect(&mut self) -> core::result::Result<(), InterfaceError<SPI::Error, CS::Error>> {
        self.cs.set_high().map_err(InterfaceError::Pin)
    }

    /// Clocks one byte out and returns the byte clocked in.
    fn transfer_byte(&mut self, byte: u8) -> core::result::Result<u8, InterfaceError<SPI::Error, CS::Error>> {
        let mut word = [byte];
        self.spi
            .transfer_in_place(&mut word)
            .map_err(InterfaceError::Spi)?;
        // Gaps are timed from the end of the transfer, not from when it was queued.
        self.spi.flush().map_err(InterfaceError::Spi)?;
        Ok(word[0])
    }

    /// Runs one framed access: address byte, gap, payload byte.
    fn framed(
        &mut self,
        address: u8,
        payload: u8,
        hold_us: u32,
    ) -> core::result::Result<u8, InterfaceError<SPI::Error, CS::Error>> {
        self.select()?;
        self.delay.delay_us(CS_SETUP_US);

        let result = self.transfer_byte(address).and_then(|_| {
            self.delay.delay_us(ADDRESS_GAP_US);
            self.transfer_byte(payload)
        });

        // Release the line even if the transfer failed so the next access starts clean.
        self.delay.delay_us(hold_us);
        let released = self.deselect();
        let value = result?;
        released?;
        Ok(value)
    }
}

impl<SPI, CS, D> FlowInterface for SpiInterface<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = InterfaceError<SPI::Error, CS::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        trace!("write {=u8:#x} <- {=u8:#x}", register & ADDRESS_MASK, value);
        self.framed(Self::address_byte(register, true), value, WRITE_HOLD_US)?;
        self.delay.delay_us(WRITE_RECOVERY_US);
        Ok(())
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let value = self.framed(Self::address_byte(register, false), 0x00, READ_HOLD_US)?;
        trace!("read {=u8:#x} -> {=u8:#x}", register & ADDRESS_MASK, value);
        Ok(value)
    }

    fn reset_bus(&mut self) -> core::result::Result<(), Self::Error> {
        trace!("bus reset pulse");
        self.deselect()?;
        self.delay.delay_ms(RESET_EDGE_MS);
        self.select()?;
        self.delay.delay_ms(RESET_EDGE_MS);
        self.deselect()?;
        self.delay.delay_ms(RESET_EDGE_MS);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
