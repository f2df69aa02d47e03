//! Monophonic subtractive synthesizer voice.
//!
//! One band-limited oscillator, one resonant state-variable filter, one envelope and a small
//! modulation matrix, rendered per sample into an interleaved stereo buffer.
//! Everything after [`Synth::new`] is allocation-free and realtime-safe.

pub mod dsp;
pub mod io;
pub mod synth; // Voice: parameters, gate, modulation, render loop
pub mod unit; // Host lifecycle boundary

pub use synth::{ParamId, Synth, VoiceMessage};
pub use unit::{InitError, RuntimeDescriptor};

/// The only sample rate the voice runs at.
pub const SAMPLE_RATE: u32 = 48_000;

/// Convert a (fractional) MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}
