//! Benchmarks for the DSP primitives and the full voice.

mod envelope;
mod filter;
mod oscillator;
mod voice;

pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use voice::bench_voice;
