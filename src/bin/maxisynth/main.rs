//! maxisynth - plays a short phrase through the default output device
//!
//! Run with: cargo run [-- --segment]

mod app;

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use maxisynth::{
    dsp::SegmentEnvelope,
    synth::{ParamId, CONTROL_QUEUE_SIZE},
    RuntimeDescriptor, Synth, SAMPLE_RATE,
};

use app::{Phrase, Step};

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let desc = RuntimeDescriptor::default();
    let (handle, rx) = Synth::control_queue(CONTROL_QUEUE_SIZE);

    let phrase = Phrase::new(140.0)
        .set(ParamId::Waveform, 1)
        .set(ParamId::Cutoff, 500)
        .set(ParamId::Resonance, 64)
        .set(ParamId::Decay, 250)
        .set(ParamId::Sustain, 40)
        .set(ParamId::Release, 300)
        .set(ParamId::EnvCutoffInt, 60)
        .set(ParamId::EnvPwmInt, 50)
        .steps([
            Step::note(48, 120),
            Step::note(51, 90),
            Step::note(55, 100),
            Step::note(58, 90),
            Step::rest(),
            Step::note(60, 127),
            Step::note(58, 80),
            Step::note(55, 100),
        ]);

    if std::env::args().any(|arg| arg == "--segment") {
        let envelope = SegmentEnvelope::new(SAMPLE_RATE as f32);
        let synth = Synth::with_envelope(&desc, envelope).wrap_err("voice init failed")?;
        app::run(synth, rx, handle, phrase)
    } else {
        let synth = Synth::new(&desc).wrap_err("voice init failed")?;
        app::run(synth, rx, handle, phrase)
    }
}
