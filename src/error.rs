//! Error handling primitives for the optical flow driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The identity probe after power-on reset did not recognise the chip.
    IdentityMismatch {
        /// Value read from the product ID register (`0x00`).
        product_id: u8,
        /// Value read from the inverse product ID register (`0x5F`).
        inverse_product_id: u8,
    },
    /// The product ID or revision read after the register load was wrong.
    VerificationFailed {
        /// Value read from the product ID register (`0x00`).
        product_id: u8,
        /// Value read from the revision register (`0x01`).
        revision: u8,
    },
    /// The numeric variant selector does not name a supported chip.
    UnsupportedVariant(u8),
    /// A bounded poll ran out of attempts before the sensor became ready.
    PollTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
