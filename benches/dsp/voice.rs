//! Benchmarks for the full render loop.
//!
//! Every sample runs envelope → modulation → oscillator → filter
//! coefficient update → filter → amplifier, so this is the number that
//! matters against the block deadline.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use maxisynth::{dsp::SegmentEnvelope, synth::ParamId, RuntimeDescriptor, Synth};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice/render");
    let desc = RuntimeDescriptor::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // Defaults: saw, filter wide open, no modulation
        let mut plain = Synth::new(&desc).expect("48 kHz stereo is supported");
        plain.note_on(45, 127);
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, &frames| {
            b.iter(|| {
                plain.render(black_box(&mut buffer), frames);
            })
        });

        // Every envelope destination active
        let mut modulated = Synth::new(&desc).expect("48 kHz stereo is supported");
        for (id, value) in [
            (ParamId::Waveform, 1),
            (ParamId::Cutoff, 400),
            (ParamId::Resonance, 64),
            (ParamId::Attack, 500),
            (ParamId::EnvPitchInt, 10),
            (ParamId::EnvCutoffInt, 80),
            (ParamId::EnvPwmInt, 60),
        ] {
            modulated.set_parameter(id.index(), value);
        }
        modulated.note_on(45, 127);
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, &frames| {
            b.iter(|| {
                modulated.render(black_box(&mut buffer), frames);
            })
        });

        let mut segment = Synth::with_envelope(&desc, SegmentEnvelope::new(48_000.0))
            .expect("48 kHz stereo is supported");
        segment.set_parameter(ParamId::EnvCutoffInt.index(), 80);
        segment.note_on(45, 127);
        group.bench_with_input(BenchmarkId::new("segment", size), &size, |b, &frames| {
            b.iter(|| {
                segment.render(black_box(&mut buffer), frames);
            })
        });
    }

    group.finish();
}
