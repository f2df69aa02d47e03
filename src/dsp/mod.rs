//! Low-level DSP primitives used by the voice.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the voice struct. They stay focused on the
//! signal-processing math; parameter mapping and routing live in `synth`.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter with low-pass and friends.
pub mod filter;
/// Band-limited oscillator waveforms.
pub mod oscillator;
/// Breakpoint envelope driven by a bipolar trigger.
pub mod segment;

pub use envelope::{Adsr, EnvelopeGenerator, EnvelopeState, Trigger};
pub use filter::{FilterMode, SVFilter};
pub use oscillator::{Oscillator, Waveform};
pub use segment::SegmentEnvelope;
