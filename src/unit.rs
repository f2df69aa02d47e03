//! Host lifecycle boundary.
//!
//! The host hands the voice a [`RuntimeDescriptor`] once, before anything
//! else. Validation happens there and only there: a voice that exists has a
//! supported sample rate and channel layout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SAMPLE_RATE;

/// Host status code for success.
pub const ERR_NONE: i8 = 0;
/// Host status code for a build target mismatch.
pub const ERR_TARGET: i8 = -1;
/// Host status code for an API version mismatch.
pub const ERR_API_VERSION: i8 = -2;
/// Host status code for an unsupported sample rate.
pub const ERR_SAMPLERATE: i8 = -4;
/// Host status code for an unsupported buffer geometry.
pub const ERR_GEOMETRY: i8 = -8;
/// Host status code for an allocation failure.
pub const ERR_MEMORY: i8 = -16;

/// Output channels the voice writes: one mono signal duplicated to L/R.
pub const OUTPUT_CHANNELS: u8 = 2;

/// What the host tells the voice about the runtime it will be rendered in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeDescriptor {
    pub sample_rate: u32,
    pub output_channels: u8,
}

impl Default for RuntimeDescriptor {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            output_channels: OUTPUT_CHANNELS,
        }
    }
}

impl RuntimeDescriptor {
    pub fn new(sample_rate: u32, output_channels: u8) -> Self {
        Self {
            sample_rate,
            output_channels,
        }
    }

    /// Check the descriptor against what the voice supports.
    pub fn validate(&self) -> Result<(), InitError> {
        if self.sample_rate != SAMPLE_RATE {
            return Err(InitError::UnsupportedSampleRate {
                requested: self.sample_rate,
            });
        }

        if self.output_channels != OUTPUT_CHANNELS {
            return Err(InitError::UnsupportedGeometry {
                channels: self.output_channels,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("samplerate unsupported: {requested} Hz (expected 48000 Hz)")]
    UnsupportedSampleRate { requested: u32 },

    #[error("geometry unsupported: {channels} output channels (expected 2)")]
    UnsupportedGeometry { channels: u8 },
}

impl InitError {
    /// Status code reported to the host.
    pub fn code(&self) -> i8 {
        match self {
            InitError::UnsupportedSampleRate { .. } => ERR_SAMPLERATE,
            InitError::UnsupportedGeometry { .. } => ERR_GEOMETRY,
        }
    }
}

/// Collapse an init result into the host's status code.
pub fn status_code<T>(result: &Result<T, InitError>) -> i8 {
    match result {
        Ok(_) => ERR_NONE,
        Err(err) => err.code(),
    }
}
