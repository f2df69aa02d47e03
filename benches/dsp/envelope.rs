//! Benchmarks for the envelope engines.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use maxisynth::dsp::{Adsr, EnvelopeGenerator, SegmentEnvelope, Trigger};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Adsr::adsr(48_000.0, 100.0, 100.0, 0.7, 300.0);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(Trigger::ON));
            })
        });

        // Sustain phase (holding steady)
        let mut env = Adsr::adsr(48_000.0, 1.0, 1.0, 0.7, 300.0);
        for _ in 0..200 {
            env.next(Trigger::ON);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(Trigger::ON));
            })
        });

        // Release phase (ramping down), restarted from sustain every batch
        let mut sustained = Adsr::adsr(48_000.0, 1.0, 1.0, 0.7, 100.0);
        for _ in 0..200 {
            sustained.next(Trigger::ON);
        }
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter_batched(
                || sustained.clone(),
                |mut env| {
                    env.render(black_box(&mut buffer), black_box(Trigger::OFF));
                    env
                },
                BatchSize::SmallInput,
            )
        });

        // Breakpoint engine, attack phase
        let mut env = SegmentEnvelope::new(48_000.0);
        env.set_attack_ms(100.0);
        group.bench_with_input(BenchmarkId::new("segment", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(Trigger::ON));
            })
        });
    }

    group.finish();
}
