//! Bus interface abstraction for the optical flow driver.

pub mod spi;

/// Abstraction over the low-level register access required by the driver.
///
/// Register addresses passed to implementations are 7-bit; the read/write
/// discriminator in bit 7 is owned by the implementation.
pub trait FlowInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Pulses the chip-select line to resynchronise the serial port.
    fn reset_bus(&mut self) -> core::result::Result<(), Self::Error>;

    /// Blocks for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Blocks for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);
}
