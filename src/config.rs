//! Configuration primitives for the optical flow driver.

use crate::params::{FrameMode, IdentityCheck, PollLimit, Variant};

/// User-facing configuration for the optical flow sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Chip variant, selecting the performance register load.
    pub variant: Variant,
    /// Bound on the ready-gate and frame-tag polling loops.
    pub poll_limit: PollLimit,
    /// Handling of `0b10` tags while streaming a frame.
    pub frame_mode: FrameMode,
    /// Acceptance rule for the identity probe.
    pub identity_check: IdentityCheck,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is usable.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.poll_limit == PollLimit::Attempts(0) {
            return Err(ConfigError::ZeroPollAttempts);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Selects the chip variant.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Bounds the polling loops.
    pub fn poll_limit(mut self, poll_limit: PollLimit) -> Self {
        self.config.poll_limit = poll_limit;
        self
    }

    /// Overrides the frame streaming mode.
    pub fn frame_mode(mut self, frame_mode: FrameMode) -> Self {
        self.config.frame_mode = frame_mode;
        self
    }

    /// Overrides the identity probe rule.
    pub fn identity_check(mut self, identity_check: IdentityCheck) -> Self {
        self.config.identity_check = identity_check;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::Pmw3901,
            poll_limit: PollLimit::Unbounded,
            frame_mode: FrameMode::Compatible,
            identity_check: IdentityCheck::Permissive,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A bounded poll limit must allow at least one read.
    ZeroPollAttempts,
}
