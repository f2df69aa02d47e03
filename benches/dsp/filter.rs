//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use maxisynth::dsp::{SVFilter, FilterMode};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Fixed coefficients
        let mut filter = SVFilter::lowpass(48_000.0, 1_000.0, 2.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Coefficients recomputed every sample, as the voice does
        let mut filter = SVFilter::new(48_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_sweep", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let cutoff = 200.0 + 8_000.0 * i as f32 / size as f32;
                    filter.set(FilterMode::LowPass, black_box(cutoff), 2.0, 0.0);
                    *sample = filter.play(input[i]);
                }
            })
        });
    }

    group.finish();
}
