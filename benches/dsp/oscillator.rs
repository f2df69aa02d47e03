//! Benchmarks for band-limited waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use maxisynth::dsp::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            ("saw", Waveform::Saw),
            ("rectangle", Waveform::Rectangle),
            ("triangle", Waveform::Triangle),
        ] {
            let mut osc = Oscillator::new(48_000.0);
            osc.set_waveform(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(440.0));
                })
            });
        }

        // Per-sample pulse width changes, as the voice does under PWM
        let mut osc = Oscillator::new(48_000.0);
        osc.set_waveform(Waveform::Rectangle);
        group.bench_with_input(BenchmarkId::new("pwm", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    osc.set_pulse_width(0.1 + 0.8 * i as f32 / size as f32);
                    *sample = osc.play(black_box(440.0));
                }
            })
        });
    }

    group.finish();
}
