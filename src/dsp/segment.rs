//! Breakpoint envelope driven by a bipolar trigger.
//!
//! The shape is a chain of linear segments between fixed levels:
//!
//! ```text
//!   0 ──attack──▶ peak ──decay──▶ sustain ══hold══ ──release──▶ 0
//! ```
//!
//! The hold segment lasts for as long as the trigger stays positive. A
//! negative trigger jumps to the release segment from the current level, a
//! positive one during release starts the attack segment again from wherever
//! the level is.

use crate::dsp::envelope::{ms_to_samples, EnvelopeGenerator, EnvelopeState, Trigger};

pub struct SegmentEnvelope {
    sample_rate: f32,

    peak: f32,
    sustain_level: f32,
    attack_samples: f32,
    decay_samples: f32,
    release_samples: f32,

    stage: EnvelopeState,
    level: f32,

    // Running segment: level = origin + elapsed * step
    origin: f32,
    elapsed: u32,
    step: f32,
}

/// Distance at which a ramp counts as having arrived.
const ARRIVAL: f32 = 1e-6;

impl SegmentEnvelope {
    /// 1 ms attack, decay and release with full sustain.
    pub fn new(sample_rate: f32) -> Self {
        let one_ms = ms_to_samples(1.0, sample_rate);
        Self {
            sample_rate,
            peak: 1.0,
            sustain_level: 1.0,
            attack_samples: one_ms,
            decay_samples: one_ms,
            release_samples: one_ms,
            stage: EnvelopeState::Idle,
            level: 0.0,
            origin: 0.0,
            elapsed: 0,
            step: 0.0,
        }
    }

    /// Level reached at the end of the attack segment (default 1.0).
    pub fn with_peak(mut self, peak: f32) -> Self {
        if peak.is_finite() {
            self.peak = peak.clamp(0.0, 1.0);
        }
        self
    }

    fn start_segment(&mut self, stage: EnvelopeState, step: f32) {
        self.stage = stage;
        self.origin = self.level;
        self.elapsed = 0;
        self.step = step;
    }

    fn start_attack(&mut self) {
        self.start_segment(EnvelopeState::Attack, self.peak / self.attack_samples);
    }

    fn start_decay(&mut self) {
        let step = (self.sustain_level - self.peak) / self.decay_samples;
        self.start_segment(EnvelopeState::Decay, step);
    }

    fn start_release(&mut self) {
        self.start_segment(EnvelopeState::Release, -self.level / self.release_samples);
    }

    /// Advance one step along the running segment and report whether
    /// `target` was reached.
    #[inline]
    fn ramp_to(&mut self, target: f32) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        self.level = self.origin + self.elapsed as f32 * self.step;
        let arrived = if self.step >= 0.0 {
            self.level >= target - ARRIVAL
        } else {
            self.level <= target + ARRIVAL
        };
        if arrived {
            self.level = target;
        }
        arrived
    }

    /// Drive the envelope with a bipolar trigger level (> 0 held, <= 0 released).
    pub fn play(&mut self, trigger: f32) -> f32 {
        let held = trigger > 0.0;

        match (held, self.stage) {
            (true, EnvelopeState::Idle | EnvelopeState::Release) => self.start_attack(),
            (false, EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain) => {
                self.start_release()
            }
            _ => {}
        }

        match self.stage {
            EnvelopeState::Idle => self.level = 0.0,
            EnvelopeState::Attack => {
                if self.ramp_to(self.peak) {
                    self.start_decay();
                }
            }
            EnvelopeState::Decay => {
                if self.ramp_to(self.sustain_level) {
                    self.stage = EnvelopeState::Sustain;
                    self.step = 0.0;
                }
            }
            EnvelopeState::Sustain => {
                // Follow sustain changes at the decay rate
                let max_step = 1.0 / self.decay_samples;
                let delta = (self.sustain_level - self.level).clamp(-max_step, max_step);
                self.level += delta;
            }
            EnvelopeState::Release => {
                if self.ramp_to(0.0) {
                    self.stage = EnvelopeState::Idle;
                    self.step = 0.0;
                }
            }
        }

        self.level
    }
}

impl EnvelopeGenerator for SegmentEnvelope {
    #[inline]
    fn next(&mut self, trigger: Trigger) -> f32 {
        self.play(trigger.bipolar())
    }

    fn set_attack_ms(&mut self, ms: f32) {
        self.attack_samples = ms_to_samples(ms, self.sample_rate);
        if self.stage == EnvelopeState::Attack {
            self.start_attack();
        }
    }

    fn set_decay_ms(&mut self, ms: f32) {
        self.decay_samples = ms_to_samples(ms, self.sample_rate);
        if self.stage == EnvelopeState::Decay {
            let step = (self.sustain_level - self.peak) / self.decay_samples;
            self.start_segment(EnvelopeState::Decay, step);
        }
    }

    fn set_sustain(&mut self, level: f32) {
        if !level.is_finite() {
            return;
        }
        self.sustain_level = level.clamp(0.0, 1.0);
        if self.stage == EnvelopeState::Decay {
            let step = (self.sustain_level - self.level) / self.decay_samples;
            self.start_segment(EnvelopeState::Decay, step);
        }
    }

    fn set_release_ms(&mut self, ms: f32) {
        self.release_samples = ms_to_samples(ms, self.sample_rate);
        if self.stage == EnvelopeState::Release {
            self.start_release();
        }
    }

    fn stage(&self) -> EnvelopeState {
        self.stage
    }

    fn level(&self) -> f32 {
        self.level
    }

    fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.origin = 0.0;
        self.elapsed = 0;
        self.step = 0.0;
    }
}
