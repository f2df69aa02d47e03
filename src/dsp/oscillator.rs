#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Band-Limited Oscillator
=======================

A digital oscillator steps a phase accumulator through [0, 1) and maps the
phase to a waveform. The naive versions of sawtooth and pulse jump
instantly at their edges. An instant jump contains energy at every
frequency, and everything above Nyquist folds back down as aliasing:
inharmonic whistles that get worse the higher the note.

Vocabulary
----------

  phase       Position inside one cycle, 0.0 to 1.0.

  increment   How far phase moves per sample: frequency / sample_rate.
              Also written `dt`. At 480 Hz and 48 kHz, dt = 0.01.

  BLEP        Band-Limited stEP. The difference between an ideal band-limited
              step and a naive step. Adding it around a jump smooths the jump.

  PolyBLEP    A two-sample polynomial approximation of the BLEP. Cheap, and
              good enough to push aliasing well below the harmonics.

  PolyBLAMP   The integrated version (Band-Limited rAMP) for waveforms that
              don't jump but change slope abruptly, like a triangle's corners.


The Correction
--------------

PolyBLEP only touches the sample right before and right after a jump:

    t < dt         (just after the jump)   blep = 2u - u² - 1,  u = t / dt
    t > 1 - dt     (just before the jump)  blep = u² + 2u + 1,  u = (t - 1) / dt
    otherwise                              blep = 0

Sawtooth: naive ramp 2t - 1, falling jump at the wrap, so subtract blep(t).

Rectangle: +1 while t < width, -1 after. Rising edge at t = 0 (add blep(t)),
falling edge at t = width (subtract blep at the phase shifted by width).

Triangle: no jumps, but two corners. At a corner the slope changes by ±8 per
cycle, so the correction is the PolyBLAMP scaled by 4 * dt.

Everything else (the flat middle of each cycle) is the plain naive waveform,
so the cost per sample is a handful of multiplies and two comparisons.
*/

/// Waveform shapes the voice oscillator can produce.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Saw,
    Rectangle,
    Triangle,
}

impl Waveform {
    /// Map the raw `Wave` parameter value onto a shape. Unknown values are saw.
    pub fn from_param(value: i32) -> Self {
        match value {
            1 => Waveform::Rectangle,
            2 => Waveform::Triangle,
            _ => Waveform::Saw,
        }
    }
}

const MIN_PULSE_WIDTH: f32 = 0.01;
const MAX_PULSE_WIDTH: f32 = 0.99;

#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    waveform: Waveform,
    pulse_width: f32,
    inv_sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            waveform: Waveform::Saw,
            pulse_width: 0.5,
            inv_sample_rate: 1.0 / sample_rate,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sample_rate = 1.0 / sample_rate;
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Duty cycle of the rectangle, clamped to (0, 1). Ignored by other shapes.
    pub fn set_pulse_width(&mut self, width: f32) {
        if width.is_finite() {
            self.pulse_width = width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH);
        }
    }

    pub fn pulse_width(&self) -> f32 {
        self.pulse_width
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    ///
    /// The caller is expected to keep `frequency` inside the audio band; a
    /// non-finite or negative frequency holds the phase where it is.
    #[inline]
    pub fn play(&mut self, frequency: f32) -> f32 {
        let dt = if frequency.is_finite() && frequency > 0.0 {
            (frequency * self.inv_sample_rate).min(0.5)
        } else {
            0.0
        };
        let t = self.phase;

        let sample = match self.waveform {
            Waveform::Saw => 2.0 * t - 1.0 - poly_blep(t, dt),
            Waveform::Rectangle => {
                // Keep both edges at least one increment apart
                let width = if dt > 0.0 {
                    self.pulse_width.clamp(dt, 1.0 - dt)
                } else {
                    self.pulse_width
                };
                let naive = if t < width { 1.0 } else { -1.0 };
                let falling = wrap(t - width);
                naive + poly_blep(t, dt) - poly_blep(falling, dt)
            }
            Waveform::Triangle => {
                let naive = if t < 0.25 {
                    4.0 * t
                } else if t < 0.75 {
                    2.0 - 4.0 * t
                } else {
                    4.0 * t - 4.0
                };
                // Trough at t = 0.75, peak at t = 0.25
                let trough = wrap(t + 0.25);
                let peak = wrap(t + 0.75);
                naive + 4.0 * dt * (poly_blamp(trough, dt) - poly_blamp(peak, dt))
            }
        };

        self.phase = wrap(t + dt);
        sample
    }

    /// Fill a buffer at a fixed frequency.
    pub fn render(&mut self, buffer: &mut [f32], frequency: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.play(frequency);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[inline]
fn wrap(phase: f32) -> f32 {
    let wrapped = phase - phase.floor();
    // floor() can leave exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let u = t / dt;
        2.0 * u - u * u - 1.0
    } else if t > 1.0 - dt {
        let u = (t - 1.0) / dt;
        u * u + 2.0 * u + 1.0
    } else {
        0.0
    }
}

#[inline]
fn poly_blamp(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let u = t / dt - 1.0;
        -u * u * u / 3.0
    } else if t > 1.0 - dt {
        let u = (t - 1.0) / dt + 1.0;
        u * u * u / 3.0
    } else {
        0.0
    }
}
