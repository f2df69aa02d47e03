/*
ADSR Envelope Implementation
============================

This module implements the amplitude-shaping envelope of the voice: a linear
attack followed by exponential decay and release.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). It is routed
              to amplitude, pitch, cutoff and pulse width.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  trigger     The gate signal seen by the envelope. Rising trigger starts
              Attack, falling trigger starts Release from wherever we are.

  increment   How much `level` rises per sample during Attack.

  coefficient How much of the remaining distance to the target survives one
              sample during Decay and Release.


The Shape
---------

  Level
    1.0 ┐    ╱╲
        │   ╱  ╲__
    S   │  ╱      ‾‾‾‾‾‾‾‾‾‾╲
        │ ╱                   ╲_
    0.0 └╱──────────────────────‾‾──→ Time
        Attack Decay  Sustain  Release
         (A)   (D)      (S)      (R)

Attack is a straight line. Decay and release are exponential: each sample
keeps a fixed fraction of the remaining distance to the target. That's how
an RC circuit discharges and it's what most ears expect of a fading note.


The Math: Time to Coefficients
------------------------------

A stage time in milliseconds becomes a sample count:

    samples = time_ms * sample_rate / 1000

Attack covers 0 → 1 linearly:

    increment = 1 / samples

Decay and release shrink the distance to their target to 1 % over the stage:

    coefficient = 0.01 ^ (1 / samples)

Once the distance is at 1 % of the stage's span we snap to the target, so a
release really does land on 0.0 and the stage takes the configured time.


Re-triggering
-------------

A rising trigger during Release (or a fresh one from Idle) restarts Attack
from the CURRENT level, never from zero. Jumping back to zero would be an
audible click. A trigger that stays high keeps whatever stage is running:
overlapping notes don't restart the envelope.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Trigger low, envelope inactive, level = 0
    Attack,  // Trigger went high, ramping up to 1.0
    Decay,   // Reached peak, falling to sustain level
    Sustain, // Holding at sustain level while trigger is high
    Release, // Trigger went low, falling to 0
}

/// Gate signal fed to an envelope once per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trigger(bool);

impl Trigger {
    pub const ON: Trigger = Trigger(true);
    pub const OFF: Trigger = Trigger(false);

    /// Active while at least one note is held.
    #[inline]
    pub fn from_gate(count: u32) -> Self {
        Trigger(count > 0)
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self.0
    }

    /// Unipolar form: 1.0 active, 0.0 inactive.
    #[inline]
    pub fn level(self) -> f32 {
        if self.0 {
            1.0
        } else {
            0.0
        }
    }

    /// Bipolar form: +1.0 active, -1.0 inactive.
    #[inline]
    pub fn bipolar(self) -> f32 {
        if self.0 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Per-sample envelope driven by a [`Trigger`].
///
/// Stage setters reconfigure timing without changing the current stage.
pub trait EnvelopeGenerator: Send {
    /// Advance one sample and return the new level.
    fn next(&mut self, trigger: Trigger) -> f32;

    fn set_attack_ms(&mut self, ms: f32);
    fn set_decay_ms(&mut self, ms: f32);
    fn set_sustain(&mut self, level: f32);
    fn set_release_ms(&mut self, ms: f32);

    fn stage(&self) -> EnvelopeState;
    fn level(&self) -> f32;

    /// Back to Idle at level 0.
    fn reset(&mut self);

    /// Advance one sample and scale `amplitude` by the envelope.
    #[inline]
    fn adsr(&mut self, amplitude: f32, trigger: Trigger) -> f32 {
        amplitude * self.next(trigger)
    }

    /// Render a block of envelope values with a constant trigger.
    fn render(&mut self, buffer: &mut [f32], trigger: Trigger) {
        for sample in buffer.iter_mut() {
            *sample = self.next(trigger);
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    fn is_active(&self) -> bool {
        !matches!(self.stage(), EnvelopeState::Idle)
    }
}

/// Remaining fraction of a stage's span at which decay and release snap.
const RESIDUE: f32 = 0.01;

/// Convert a stage time to a sample count, never less than one sample.
#[inline]
pub(crate) fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    if ms.is_finite() {
        (ms * sample_rate * 0.001).max(1.0)
    } else {
        1.0
    }
}

#[inline]
fn residue_coefficient(samples: f32) -> f32 {
    RESIDUE.powf(1.0 / samples)
}

#[derive(Debug, Clone)]
pub struct Adsr {
    sample_rate: f32,

    // Stage configuration
    attack_increment: f32, // level gained per sample, 0 → 1
    decay_coefficient: f32, // distance to sustain kept per sample
    sustain_level: f32,    // level to hold (0.0 - 1.0)
    release_coefficient: f32, // level kept per sample

    // Runtime state
    stage: EnvelopeState,
    level: f32,
    was_triggered: bool,

    // Attack bookkeeping: level = origin + elapsed * increment
    attack_origin: f32,
    attack_elapsed: u32,

    // Span of the running decay/release, used to decide when to snap
    stage_span: f32,
}

impl Adsr {
    /// 1 ms attack, decay and release with full sustain.
    pub fn new(sample_rate: f32) -> Self {
        Self::adsr(sample_rate, 1.0, 1.0, 1.0, 1.0)
    }

    pub fn adsr(
        sample_rate: f32,
        attack_ms: f32,
        decay_ms: f32,
        sustain: f32,
        release_ms: f32,
    ) -> Self {
        let mut env = Self {
            sample_rate,
            attack_increment: 1.0,
            decay_coefficient: 0.0,
            sustain_level: 1.0,
            release_coefficient: 0.0,
            stage: EnvelopeState::Idle,
            level: 0.0,
            was_triggered: false,
            attack_origin: 0.0,
            attack_elapsed: 0,
            stage_span: 0.0,
        };
        env.set_attack_ms(attack_ms);
        env.set_decay_ms(decay_ms);
        env.set_sustain(sustain);
        env.set_release_ms(release_ms);
        env
    }

    fn enter_attack(&mut self) {
        self.attack_origin = self.level;
        self.attack_elapsed = 0;
        self.stage = EnvelopeState::Attack;
    }

    fn enter_decay(&mut self) {
        self.stage_span = (self.level - self.sustain_level).abs();
        self.stage = EnvelopeState::Decay;
    }

    fn enter_release(&mut self) {
        self.stage_span = self.level;
        self.stage = EnvelopeState::Release;
    }
}

impl EnvelopeGenerator for Adsr {
    fn next(&mut self, trigger: Trigger) -> f32 {
        let triggered = trigger.is_active();

        if triggered && !self.was_triggered {
            if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
                self.enter_attack();
            }
        } else if !triggered && self.was_triggered && self.stage != EnvelopeState::Idle {
            self.enter_release();
        }
        self.was_triggered = triggered;

        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.attack_elapsed = self.attack_elapsed.saturating_add(1);
                self.level =
                    self.attack_origin + self.attack_elapsed as f32 * self.attack_increment;

                if self.level >= 1.0 - f32::EPSILON {
                    self.level = 1.0;
                    self.enter_decay();
                }
            }

            EnvelopeState::Decay => {
                let distance = (self.level - self.sustain_level) * self.decay_coefficient;
                self.level = self.sustain_level + distance;

                if distance.abs() <= RESIDUE * self.stage_span {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                // Glide rather than jump when sustain changes while held
                let distance = (self.level - self.sustain_level) * self.decay_coefficient;
                self.level = self.sustain_level + distance;
            }

            EnvelopeState::Release => {
                self.level *= self.release_coefficient;

                if self.level <= RESIDUE * self.stage_span {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    fn set_attack_ms(&mut self, ms: f32) {
        self.attack_increment = 1.0 / ms_to_samples(ms, self.sample_rate);
        if self.stage == EnvelopeState::Attack {
            // Continue from here at the new rate
            self.attack_origin = self.level;
            self.attack_elapsed = 0;
        }
    }

    fn set_decay_ms(&mut self, ms: f32) {
        self.decay_coefficient = residue_coefficient(ms_to_samples(ms, self.sample_rate));
    }

    fn set_sustain(&mut self, level: f32) {
        if level.is_finite() {
            self.sustain_level = level.clamp(0.0, 1.0);
        }
    }

    fn set_release_ms(&mut self, ms: f32) {
        self.release_coefficient = residue_coefficient(ms_to_samples(ms, self.sample_rate));
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
        self.was_triggered = false;
        self.attack_origin = 0.0;
        self.attack_elapsed = 0;
        self.stage_span = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn run(env: &mut Adsr, trigger: Trigger, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| env.next(trigger)).collect()
    }

    #[test]
    fn attack_reaches_full_level_in_attack_time() {
        let attack_ms = 10.0;
        let attack_samples = (attack_ms * SAMPLE_RATE / 1000.0) as usize;
        let mut env = Adsr::adsr(SAMPLE_RATE, attack_ms, 100.0, 0.5, 100.0);

        let levels = run(&mut env, Trigger::ON, attack_samples + 1);

        assert!(
            levels[..attack_samples].windows(2).all(|w| w[1] >= w[0]),
            "attack must rise monotonically"
        );
        assert!(levels[attack_samples - 2] < 1.0, "attack finished early");
        assert!(
            levels[attack_samples - 1] >= 0.999 || levels[attack_samples] >= 0.999,
            "attack should reach 1.0 within one sample of {attack_samples}"
        );
    }

    #[test]
    fn decay_settles_on_sustain() {
        let sustain = 0.6;
        let mut env = Adsr::adsr(SAMPLE_RATE, 1.0, 20.0, sustain, 100.0);

        // 1 ms attack + 20 ms decay, plus slack
        run(&mut env, Trigger::ON, (0.025 * SAMPLE_RATE) as usize);

        assert_eq!(env.stage(), EnvelopeState::Sustain);
        assert!((env.level() - sustain).abs() < 1e-6);
    }

    #[test]
    fn full_sustain_skips_decay() {
        let mut env = Adsr::adsr(SAMPLE_RATE, 1.0, 500.0, 1.0, 100.0);
        run(&mut env, Trigger::ON, 50);
        assert_eq!(env.stage(), EnvelopeState::Sustain);
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn release_falls_to_idle_within_release_time() {
        let release_ms = 30.0;
        let release_samples = (release_ms * SAMPLE_RATE / 1000.0) as usize;
        let mut env = Adsr::adsr(SAMPLE_RATE, 1.0, 1.0, 0.7, release_ms);

        run(&mut env, Trigger::ON, 500);
        assert_eq!(env.stage(), EnvelopeState::Sustain);

        let levels = run(&mut env, Trigger::OFF, release_samples + 2);
        assert!(
            levels.windows(2).all(|w| w[1] <= w[0]),
            "release must fall monotonically"
        );
        assert_eq!(env.stage(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
        // Still audible just before the configured time
        assert!(levels[release_samples - 3] > 0.0);
    }

    #[test]
    fn release_from_attack_starts_at_current_level() {
        let mut env = Adsr::adsr(SAMPLE_RATE, 100.0, 10.0, 0.5, 10.0);
        run(&mut env, Trigger::ON, 100);
        let before = env.level();
        assert_eq!(env.stage(), EnvelopeState::Attack);

        let after = env.next(Trigger::OFF);
        assert_eq!(env.stage(), EnvelopeState::Release);
        assert!(after <= before && before - after < 0.01);
    }

    #[test]
    fn retrigger_during_release_continues_from_current_level() {
        let mut env = Adsr::adsr(SAMPLE_RATE, 5.0, 5.0, 0.8, 200.0);
        run(&mut env, Trigger::ON, 1_000);
        run(&mut env, Trigger::OFF, 1_000);
        assert_eq!(env.stage(), EnvelopeState::Release);

        let before = env.level();
        let after = env.next(Trigger::ON);
        assert_eq!(env.stage(), EnvelopeState::Attack);
        let step = 1.0 / (5.0 * SAMPLE_RATE / 1000.0);
        assert!(after > before);
        assert!(after - before <= step + 1e-6, "retrigger jumped");
    }

    #[test]
    fn retrigger_mid_decay_moves_at_most_one_attack_step() {
        let attack_samples = 5.0 * SAMPLE_RATE / 1000.0;
        let mut env = Adsr::adsr(SAMPLE_RATE, 5.0, 200.0, 0.2, 300.0);
        run(&mut env, Trigger::ON, attack_samples as usize + 500);
        assert_eq!(env.stage(), EnvelopeState::Decay);

        let mut previous = env.level();
        for level in run(&mut env, Trigger::OFF, 3) {
            assert!((previous - level).abs() < 0.01, "release jumped");
            previous = level;
        }
        assert_eq!(env.stage(), EnvelopeState::Release);

        let after = env.next(Trigger::ON);
        assert_eq!(env.stage(), EnvelopeState::Attack);
        assert!(
            (after - previous).abs() <= 1.0 / attack_samples + 1e-6,
            "retrigger jumped from {previous} to {after}"
        );
    }

    #[test]
    fn held_trigger_does_not_restart_decay() {
        let mut env = Adsr::adsr(SAMPLE_RATE, 1.0, 50.0, 0.2, 50.0);
        let levels = run(&mut env, Trigger::ON, 48 + 200);
        assert_eq!(env.stage(), EnvelopeState::Decay);
        // Decay keeps falling, one small step at a time
        let tail = &levels[60..];
        assert!(tail.windows(2).all(|w| w[1] <= w[0] && w[0] - w[1] < 0.01));
    }

    #[test]
    fn stage_setters_keep_current_stage() {
        let mut env = Adsr::adsr(SAMPLE_RATE, 1.0, 1.0, 0.5, 1.0);
        run(&mut env, Trigger::ON, 500);
        assert_eq!(env.stage(), EnvelopeState::Sustain);

        env.set_attack_ms(300.0);
        env.set_decay_ms(300.0);
        env.set_release_ms(300.0);
        assert_eq!(env.stage(), EnvelopeState::Sustain);

        // Sustain change glides instead of jumping
        env.set_sustain(0.9);
        let next = env.next(Trigger::ON);
        assert!(next > 0.5 && next < 0.9);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut env = Adsr::new(SAMPLE_RATE);
        run(&mut env, Trigger::ON, 10);
        env.reset();
        assert_eq!(env.stage(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn trigger_forms() {
        assert!(Trigger::from_gate(2).is_active());
        assert!(!Trigger::from_gate(0).is_active());
        assert_eq!(Trigger::ON.level(), 1.0);
        assert_eq!(Trigger::OFF.level(), 0.0);
        assert_eq!(Trigger::OFF.bipolar(), -1.0);
    }
}
