//! Strongly typed parameter enumerations for the optical flow driver.
//!
//! These enums are used across [`Config`](crate::config::Config) and the
//! high-level driver APIs. Prefer these types over raw integers to keep
//! configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use optical_flow_sensor::params::{FrameMode, PollLimit, Variant};
//!
//! let variant = Variant::try_from(2u8).unwrap();
//! assert_eq!(variant, Variant::Paa5100);
//! let _ = (PollLimit::Attempts(1_000), FrameMode::Strict);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::error::Error;

/// Supported sensor variants.
///
/// Both chips share the register protocol and differ only in the bulk
/// performance register load applied during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// PixArt PMW3901 (far-field, 80 mm to infinity).
    Pmw3901,
    /// PixArt PAA5100JE (near-field, 15 to 35 mm).
    Paa5100,
}

impl Variant {
    /// Returns the legacy numeric selector for this variant.
    pub const fn code(self) -> u8 {
        match self {
            Self::Pmw3901 => 1,
            Self::Paa5100 => 2,
        }
    }
}

impl TryFrom<u8> for Variant {
    type Error = Error<core::convert::Infallible>;

    /// Maps the legacy numeric selector (`1` = PMW3901, `2` = PAA5100).
    fn try_from(code: u8) -> core::result::Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Pmw3901),
            2 => Ok(Self::Paa5100),
            other => Err(Error::UnsupportedVariant(other)),
        }
    }
}

/// Status tag carried in bits 7:6 of every `RAW_DATA_GRAB` read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FrameTag {
    /// No data latched yet.
    NotReady = 0b00,
    /// Byte carries the upper six bits of the next pixel.
    Upper = 0b01,
    /// Byte carries the lower bits of a pixel.
    Lower = 0b10,
    /// Capture still in progress.
    Busy = 0b11,
}

/// Bound applied to the two hardware polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollLimit {
    /// Spin until the sensor answers, however long that takes.
    Unbounded,
    /// Give up with [`Error::PollTimeout`] after this many register reads.
    Attempts(u32),
}

impl PollLimit {
    /// Returns `true` once `attempts` reads have used up the budget.
    pub const fn exhausted(self, attempts: u32) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Attempts(max) => attempts >= max,
        }
    }
}

/// Handling of `0b10` tags while streaming a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameMode {
    /// A `0b10` tag consumes one pixel slot without emitting a pixel.
    ///
    /// Frames come back short whenever the sensor emits such a tag.
    Compatible,
    /// A `0b10` tag is re-read like `0b00` and `0b11`, so every frame is full.
    Strict,
}

/// Acceptance rule for the identity probe after power-on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentityCheck {
    /// Accept when either the product ID or the inverse product ID matches.
    Permissive,
    /// Require both the product ID and the inverse product ID to match.
    Strict,
}

impl IdentityCheck {
    /// Applies the rule to the two comparison results.
    pub const fn accepts(self, id_matches: bool, inverse_matches: bool) -> bool {
        match self {
            Self::Permissive => id_matches || inverse_matches,
            Self::Strict => id_matches && inverse_matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_codes_round_trip() {
        for variant in [Variant::Pmw3901, Variant::Paa5100] {
            assert_eq!(Variant::try_from(variant.code()), Ok(variant));
        }
    }

    #[test]
    fn unknown_variant_code_is_rejected() {
        assert_eq!(Variant::try_from(0u8), Err(Error::UnsupportedVariant(0)));
        assert_eq!(Variant::try_from(3u8), Err(Error::UnsupportedVariant(3)));
    }

    #[test]
    fn poll_limit_budget() {
        assert!(!PollLimit::Unbounded.exhausted(u32::MAX));
        assert!(!PollLimit::Attempts(3).exhausted(2));
        assert!(PollLimit::Attempts(3).exhausted(3));
    }

    #[test]
    fn identity_rules() {
        assert!(IdentityCheck::Permissive.accepts(true, false));
        assert!(IdentityCheck::Permissive.accepts(false, true));
        assert!(!IdentityCheck::Permissive.accepts(false, false));
        assert!(!IdentityCheck::Strict.accepts(true, false));
        assert!(IdentityCheck::Strict.accepts(true, true));
    }
}
