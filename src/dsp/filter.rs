use std::f32::consts::{FRAC_1_SQRT_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
State-Variable Filter
=====================

A second-order section: the same five responses a biquad gives, built from
two trapezoidal integrators instead of a direct-form coefficient set.

| mode      | passes                 | rejects          | output            |
| --------- | ---------------------- | ---------------- | ----------------- |
| low-pass  | below cutoff           | above cutoff     | v2                |
| high-pass | above cutoff           | below cutoff     | x - k·v1 - v2     |
| band-pass | around cutoff          | both sides       | k·v1              |
| notch     | everything but cutoff  | cutoff           | x - k·v1          |
| peak      | everything, boost/cut  | -                | x + k·(A² - 1)·v1 |

Per sample, with g = tan(π · cutoff / sample_rate) and k = 1 / Q:

    a1 = 1 / (1 + g · (g + k))
    v3 = x - ic2
    v1 = a1 · ic1 + g · a1 · v3         band
    v2 = ic2 + g · a1 · ic1 + g² · a1 · v3   low
    ic1 ← 2 · v1 - ic1
    ic2 ← 2 · v2 - ic2

The voice moves the cutoff every sample, often in jumps. The two integrator
states hold band and low-pass signal at their natural level, so a
coefficient change never meets state scaled for a different filter. A
direct-form biquad switched the same way at high Q rings up without bound.

g blows up as the cutoff approaches Nyquist (tan(π/2) = ∞), so the cutoff is
clamped just below it. Q is a plain multiplier: 0.707 is the flattest
passband, higher values ring at the cutoff. Peak mode uses A = 10^(gain/40)
and narrows k to 1 / (Q · A) so boost and cut mirror each other.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
    Peak,
}

/// Lowest cutoff accepted, in Hz.
pub const MIN_CUTOFF_HZ: f32 = 1.0;
/// Highest cutoff accepted, as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.499;
/// Smallest resonance (Q) accepted.
pub const MIN_Q: f32 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Coefficients {
    g: f32,
    k: f32,
    a1: f32,
    a2: f32,
    a3: f32,
    /// Peak mode band gain, A² - 1.
    boost: f32,
}

impl Coefficients {
    fn compute(mode: FilterMode, g: f32, q: f32, gain_db: f32) -> Self {
        let (k, boost) = match mode {
            FilterMode::Peak => {
                let a = 10.0_f32.powf(gain_db / 40.0);
                (1.0 / (q * a), a * a - 1.0)
            }
            _ => (1.0 / q, 0.0),
        };

        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;
        Self { g, k, a1, a2, a3, boost }
    }

    fn is_finite(&self) -> bool {
        self.g.is_finite()
            && self.k.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
            && self.a3.is_finite()
            && self.boost.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    coefficients: Coefficients,
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    mode: FilterMode,
    cutoff_hz: f32,
    q: f32,
}

impl SVFilter {
    /// Low-pass, wide open, flat passband.
    pub fn new(sample_rate: f32) -> Self {
        let cutoff_hz = sample_rate * MAX_CUTOFF_RATIO;
        let g = (PI * MAX_CUTOFF_RATIO).tan();
        Self {
            coefficients: Coefficients::compute(FilterMode::LowPass, g, FRAC_1_SQRT_2, 0.0),
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate,
            mode: FilterMode::LowPass,
            cutoff_hz,
            q: FRAC_1_SQRT_2,
        }
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        let mut filter = Self::new(sample_rate);
        filter.set(FilterMode::LowPass, cutoff_hz, q, 0.0);
        filter
    }

    pub fn highpass(sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        let mut filter = Self::new(sample_rate);
        filter.set(FilterMode::HighPass, cutoff_hz, q, 0.0);
        filter
    }

    /// Recompute the coefficients.
    ///
    /// `gain_db` only affects [`FilterMode::Peak`]. The cutoff is clamped to
    /// `[MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * sample_rate]` and `q` is floored at
    /// `MIN_Q`. Non-finite arguments keep the previous coefficients.
    #[inline]
    pub fn set(&mut self, mode: FilterMode, cutoff_hz: f32, q: f32, gain_db: f32) {
        if !(cutoff_hz.is_finite() && q.is_finite() && gain_db.is_finite()) {
            return;
        }

        let cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF_HZ, self.sample_rate * MAX_CUTOFF_RATIO);
        let q = q.max(MIN_Q);
        let g = (PI * cutoff_hz / self.sample_rate).tan();

        let coefficients = Coefficients::compute(mode, g, q, gain_db);
        if coefficients.is_finite() {
            self.coefficients = coefficients;
            self.mode = mode;
            self.cutoff_hz = cutoff_hz;
            self.q = q;
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn play(&mut self, sample: f32) -> f32 {
        let c = self.coefficients;

        let v3 = sample - self.ic2eq;
        let v1 = c.a1 * self.ic1eq + c.a2 * v3;
        let v2 = self.ic2eq + c.a2 * self.ic1eq + c.a3 * v3;

        let out = match self.mode {
            FilterMode::LowPass => v2,
            FilterMode::HighPass => sample - c.k * v1 - v2,
            FilterMode::BandPass => c.k * v1,
            FilterMode::Notch => sample - c.k * v1,
            FilterMode::Peak => sample + c.k * c.boost * v1,
        };

        if !out.is_finite() {
            // Never let a blown-up state reach the output
            self.reset();
            return 0.0;
        }

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.play(*sample);
        }
    }

    /// Clear the integrators. Coefficients are kept.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Cutoff actually in use, after clamping.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    /// True when the filter holds no signal.
    pub fn is_silent(&self) -> bool {
        self.ic1eq == 0.0 && self.ic2eq == 0.0
    }
}
