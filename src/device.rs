//! High-level optical flow device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::{self, FRAME_SIZE};
use crate::interface::spi::SpiInterface;
use crate::interface::FlowInterface;
use crate::params::Variant;
use crate::registers::{
    EXPECTED_INVERSE_PRODUCT_ID,
    EXPECTED_PRODUCT_ID,
    EXPECTED_REVISION_ID,
    LED_BANK,
    LED_OFF,
    LED_ON,
    POWER_UP_RESET_COMMAND,
    REG_BANK_SELECT,
    REG_DELTA_X_H,
    REG_DELTA_X_L,
    REG_DELTA_Y_H,
    REG_DELTA_Y_L,
    REG_INVERSE_PRODUCT_ID,
    REG_LED_DRIVE,
    REG_MOTION,
    REG_POWER_UP_RESET,
    REG_PRODUCT_ID,
    REG_REVISION_ID,
};
use crate::sequence;
use crate::tuning;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

// Wait after the power-up reset command before talking to the chip (milliseconds).
const POWER_UP_DELAY_MS: u32 = 5;
// Wait after clearing the motion registers (milliseconds).
const MOTION_PRIME_DELAY_MS: u32 = 1;
// Settle time before switching the LED (milliseconds).
const LED_SETTLE_DELAY_MS: u32 = 200;

/// High-level synchronous driver for the PMW3901 / PAA5100 optical flow sensors.
///
/// Register sequences rely on the bank-select register, so the driver must not
/// be shared between tasks without external locking around each call.
pub struct OpticalFlow<IFACE> {
    interface: IFACE,
    config: Config,
}

/// Motion accumulated since the previous read, in raw sensor counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionDelta {
    /// Motion along the X axis.
    pub x: i16,
    /// Motion along the Y axis.
    pub y: i16,
}

/// Product identification registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProductId {
    /// `PRODUCT_ID` register (`0x00`).
    pub product_id: u8,
    /// `REVISION_ID` register (`0x01`).
    pub revision: u8,
}

impl ProductId {
    /// Returns `true` when both registers hold the values expected after initialization.
    pub const fn is_expected(&self) -> bool {
        self.product_id == EXPECTED_PRODUCT_ID && self.revision == EXPECTED_REVISION_ID
    }
}

impl<IFACE> OpticalFlow<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// No bus traffic happens until [`OpticalFlow::init`] is called.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self { interface, config }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the configured chip variant.
    pub fn variant(&self) -> Variant {
        self.config.variant
    }
}

impl<SPI, CS, D> OpticalFlow<SpiInterface<SPI, CS, D>>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, cs: CS, delay: D, config: Config) -> Self {
        Self::new(SpiInterface::new(spi, cs, delay), config)
    }

    /// Releases the driver, returning the SPI bus, chip-select pin, delay and configuration.
    pub fn release_spi(self) -> (SPI, CS, D, Config) {
        let (iface, config) = self.release();
        let (spi, cs, delay) = iface.release();
        (spi, cs, delay, config)
    }
}

impl<IFACE, CommE> OpticalFlow<IFACE>
where
    IFACE: FlowInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Resets, identifies and tunes the sensor for the configured variant.
    ///
    /// Any error leaves the sensor in an unknown state; motion and frame reads
    /// must not be used until a later call succeeds.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;
        debug!("initializing {}", self.config.variant);

        self.interface.reset_bus()?;
        self.interface
            .write_register(REG_POWER_UP_RESET, POWER_UP_RESET_COMMAND)?;
        self.interface.delay_ms(POWER_UP_DELAY_MS);

        self.probe_identity()?;
        self.prime_motion()?;

        tuning::apply_tuning(&mut self.interface)?;
        sequence::apply(
            &mut self.interface,
            sequence::performance_table(self.config.variant),
        )?;

        let ids = self.read_ids()?;
        if !ids.is_expected() {
            error!(
                "verification failed: product id {=u8:#x}, revision {=u8:#x}",
                ids.product_id,
                ids.revision
            );
            return Err(Error::VerificationFailed {
                product_id: ids.product_id,
                revision: ids.revision,
            });
        }

        debug!("sensor ready");
        Ok(())
    }

    // ==================================================================
    // == Identification ================================================
    // ==================================================================
    /// Reads the product ID and revision registers.
    pub fn read_ids(&mut self) -> Result<ProductId, CommE> {
        let product_id = self.interface.read_register(REG_PRODUCT_ID)?;
        let revision = self.interface.read_register(REG_REVISION_ID)?;
        Ok(ProductId {
            product_id,
            revision,
        })
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads the motion accumulated since the previous call.
    pub fn read_motion(&mut self) -> Result<MotionDelta, CommE> {
        // Reading MOTION latches the delta registers.
        self.interface.read_register(REG_MOTION)?;

        let x_low = self.interface.read_register(REG_DELTA_X_L)?;
        let x_high = self.interface.read_register(REG_DELTA_X_H)?;
        let y_low = self.interface.read_register(REG_DELTA_Y_L)?;
        let y_high = self.interface.read_register(REG_DELTA_Y_H)?;

        Ok(MotionDelta {
            x: i16::from_le_bytes([x_low, x_high]),
            y: i16::from_le_bytes([y_low, y_high]),
        })
    }

    /// Switches the sensor into raw frame readout.
    ///
    /// Must precede [`OpticalFlow::read_frame_buffer`]; motion data is not
    /// meaningful while frame readout is enabled.
    pub fn enable_frame_buffer(&mut self) -> Result<(), CommE> {
        frame::enable_frame_buffer(&mut self.interface, self.config.poll_limit)
    }

    /// Streams one frame into `buffer`, returning the number of pixels written.
    ///
    /// See [`frame::read_frame`] for when fewer than [`FRAME_SIZE`] pixels are
    /// returned.
    pub fn read_frame_buffer(&mut self, buffer: &mut [u8; FRAME_SIZE]) -> Result<usize, CommE> {
        frame::read_frame(
            &mut self.interface,
            buffer,
            self.config.poll_limit,
            self.config.frame_mode,
        )
    }

    /// Enables frame readout and streams one frame into `buffer`.
    pub fn capture_frame(&mut self, buffer: &mut [u8; FRAME_SIZE]) -> Result<usize, CommE> {
        self.enable_frame_buffer()?;
        self.read_frame_buffer(buffer)
    }

    // ==================================================================
    // == LED & Raw Register Access =====================================
    // ==================================================================
    /// Turns the illumination LED on or off.
    pub fn set_led(&mut self, on: bool) -> Result<(), CommE> {
        self.interface.delay_ms(LED_SETTLE_DELAY_MS);
        self.interface.write_register(REG_BANK_SELECT, LED_BANK)?;
        self.interface
            .write_register(REG_LED_DRIVE, if on { LED_ON } else { LED_OFF })?;
        self.interface.write_register(REG_BANK_SELECT, 0x00)?;
        Ok(())
    }

    /// Writes a raw register in the currently selected bank.
    ///
    /// Only the low seven bits of `register` are used.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.interface
            .write_register(register & 0x7F, value)
            .map_err(Error::from)
    }

    /// Reads a raw register in the currently selected bank.
    ///
    /// Only the low seven bits of `register` are used.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        self.interface
            .read_register(register & 0x7F)
            .map_err(Error::from)
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn probe_identity(&mut self) -> Result<(), CommE> {
        let product_id = self.interface.read_register(REG_PRODUCT_ID)?;
        let inverse_product_id = self.interface.read_register(REG_INVERSE_PRODUCT_ID)?;

        let accepted = self.config.identity_check.accepts(
            product_id == EXPECTED_PRODUCT_ID,
            inverse_product_id == EXPECTED_INVERSE_PRODUCT_ID,
        );
        if !accepted {
            error!(
                "identity mismatch: product id {=u8:#x}, inverse {=u8:#x}",
                product_id,
                inverse_product_id
            );
            return Err(Error::IdentityMismatch {
                product_id,
                inverse_product_id,
            });
        }

        Ok(())
    }

    fn prime_motion(&mut self) -> Result<(), CommE> {
        for register in REG_MOTION..=REG_DELTA_Y_H {
            self.interface.read_register(register)?;
        }
        self.interface.delay_ms(MOTION_PRIME_DELAY_MS);
        Ok(())
    }
}
