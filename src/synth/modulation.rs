//! Envelope routing.

/*
Modulation Router
=================

One envelope drives four destinations. Each destination has its own depth,
set from a percentage parameter:

    destination   depth at 100 %        applied as
    -----------   -------------------   -------------------------------
    amplitude     full envelope         crossfade with the raw gate
    pitch         ±24 semitones         added to the note number
    cutoff        ±60 semitones         added to the cutoff note
    pulse width   +0.49 duty cycle      added to the 0.5 base width

Amplitude is the odd one out. It is not `gate × env × depth`, it's a
crossfade between the envelope and the bare gate:

    gain = depth · env + (1 - depth) · gate

At 0 % the amplifier opens and closes with the gate (an organ), at 100 % it
follows the envelope only, and in between the two are mixed.
*/

/// Semitones of pitch offset per percent of `>Pitch`.
pub const PITCH_SEMITONES_PER_PERCENT: f32 = 0.24;
/// Semitones of cutoff offset per percent of `>Cutoff`.
pub const CUTOFF_SEMITONES_PER_PERCENT: f32 = 0.6;
/// Duty-cycle delta per percent of `>PWM`.
pub const PWM_PER_PERCENT: f32 = 0.0049;
/// Pulse width with no envelope applied.
pub const BASE_PULSE_WIDTH: f32 = 0.5;

/// Instantaneous offsets for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub pitch: f32,       // semitones
    pub cutoff: f32,      // semitones
    pub pulse_width: f32, // absolute duty cycle
    pub amplitude: f32,   // gain
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationDepths {
    amp: f32,
    amp_reverse: f32,
    pitch: f32,
    cutoff: f32,
    pwm: f32,
}

impl Default for ModulationDepths {
    /// Envelope fully on amplitude, nothing else modulated.
    fn default() -> Self {
        Self {
            amp: 1.0,
            amp_reverse: 0.0,
            pitch: 0.0,
            cutoff: 0.0,
            pwm: 0.0,
        }
    }
}

impl ModulationDepths {
    pub fn set_amp_percent(&mut self, percent: i32) {
        self.amp = 0.01 * percent as f32;
        self.amp_reverse = 1.0 - self.amp;
    }

    pub fn set_pitch_percent(&mut self, percent: i32) {
        self.pitch = PITCH_SEMITONES_PER_PERCENT * percent as f32;
    }

    pub fn set_cutoff_percent(&mut self, percent: i32) {
        self.cutoff = CUTOFF_SEMITONES_PER_PERCENT * percent as f32;
    }

    pub fn set_pwm_percent(&mut self, percent: i32) {
        self.pwm = PWM_PER_PERCENT * percent as f32;
    }

    /// Route one envelope sample. `gate` is the unipolar trigger level.
    #[inline]
    pub fn route(&self, env: f32, gate: f32) -> Modulation {
        Modulation {
            pitch: self.pitch * env,
            cutoff: self.cutoff * env,
            pulse_width: BASE_PULSE_WIDTH + self.pwm * env,
            amplitude: self.amp * env + self.amp_reverse * gate,
        }
    }

    pub fn amp(&self) -> f32 {
        self.amp
    }

    pub fn amp_reverse(&self) -> f32 {
        self.amp_reverse
    }
}
