use log::{debug, warn};

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::{
    dsp::{Adsr, EnvelopeGenerator, EnvelopeState, FilterMode, Oscillator, SVFilter, Waveform},
    note_to_freq,
    synth::{
        gate::Gate,
        message::{MessageReceiver, VoiceMessage},
        modulation::ModulationDepths,
        params::{ParamId, ParameterSet},
    },
    unit::{InitError, RuntimeDescriptor},
};

#[cfg(feature = "rtrb")]
use crate::synth::message::{control_queue, VoiceHandle};

/// Ceiling applied to the modulated cutoff before the filter's own clamp.
pub const MAX_CUTOFF_HZ: f32 = 23_999.0;

/// One monophonic voice: oscillator → low-pass → amplifier, one envelope
/// routed to pitch, cutoff, pulse width and amplitude.
///
/// `E` picks the envelope engine once, at construction.
pub struct Synth<E: EnvelopeGenerator = Adsr> {
    params: ParameterSet,
    gate: Gate,

    note: f32,
    amp: f32,
    cutoff_offset: f32,
    resonance: f32,
    depths: ModulationDepths,

    oscillator: Oscillator,
    filter: SVFilter,
    envelope: E,

    suspended: bool,
}

impl Synth<Adsr> {
    /// Validate the runtime and build a voice with the ADSR engine.
    pub fn new(desc: &RuntimeDescriptor) -> Result<Self, InitError> {
        Self::with_envelope(desc, Adsr::new(desc.sample_rate as f32))
    }

    /// See [`control_queue`].
    #[cfg(feature = "rtrb")]
    pub fn control_queue(capacity: usize) -> (VoiceHandle, Consumer<VoiceMessage>) {
        control_queue(capacity)
    }
}

impl<E: EnvelopeGenerator> Synth<E> {
    /// Validate the runtime and build a voice around `envelope`.
    ///
    /// Every parameter starts at its descriptor default.
    pub fn with_envelope(desc: &RuntimeDescriptor, envelope: E) -> Result<Self, InitError> {
        debug!(
            "init: {} Hz, {} output channels",
            desc.sample_rate, desc.output_channels
        );

        if let Err(err) = desc.validate() {
            warn!("init rejected: {err}");
            return Err(err);
        }

        let sample_rate = desc.sample_rate as f32;
        let mut synth = Self {
            params: ParameterSet::default(),
            gate: Gate::new(),
            note: 0.0,
            amp: 0.0,
            cutoff_offset: 0.0,
            resonance: 1.0,
            depths: ModulationDepths::default(),
            oscillator: Oscillator::new(sample_rate),
            filter: SVFilter::new(sample_rate),
            envelope,
            suspended: false,
        };

        for id in ParamId::ALL {
            synth.set_parameter(id.index(), id.descriptor().default);
        }

        Ok(synth)
    }

    pub fn teardown(self) {
        debug!("teardown");
    }

    /// Back to the default waveform with the oscillator rewound and every
    /// gate layer dropped. Filter memory and envelope stage carry over, so a
    /// sounding note releases instead of clicking off.
    ///
    /// Runs on the render thread when it arrives through the control queue,
    /// so it does not log.
    pub fn reset(&mut self) {
        self.oscillator.set_waveform(Waveform::Saw);
        self.oscillator.reset();
        self.gate.clear();
    }

    pub fn resume(&mut self) {
        debug!("resume");
        self.suspended = false;
    }

    pub fn suspend(&mut self) {
        debug!("suspend");
        self.suspended = true;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /* ---------------------------------------------------------------------- */
    /* Parameters                                                             */
    /* ---------------------------------------------------------------------- */

    /// Store a raw parameter value and recompute what derives from it.
    ///
    /// The value is clamped to the slot's range first. Reserved slots only
    /// store; indices past the last slot are ignored.
    pub fn set_parameter(&mut self, index: u8, value: i32) {
        let Some(value) = self.params.store(index, value) else {
            return;
        };
        let Some(id) = ParamId::from_index(index) else {
            return;
        };

        let v = value as f32;
        match id {
            ParamId::Note => self.note = v,
            ParamId::Waveform => self.oscillator.set_waveform(Waveform::from_param(value)),
            ParamId::Cutoff => self.cutoff_offset = 0.1 * v - 63.5,
            ParamId::Resonance => self.resonance = 2.0_f32.powf(v / 32.0),
            ParamId::Attack => self.envelope.set_attack_ms(v + 1.0),
            ParamId::Decay => self.envelope.set_decay_ms(v + 1.0),
            ParamId::Sustain => self.envelope.set_sustain(0.01 * v),
            ParamId::Release => self.envelope.set_release_ms(v + 1.0),
            ParamId::EnvAmpInt => self.depths.set_amp_percent(value),
            ParamId::EnvPitchInt => self.depths.set_pitch_percent(value),
            ParamId::EnvCutoffInt => self.depths.set_cutoff_percent(value),
            ParamId::EnvPwmInt => self.depths.set_pwm_percent(value),
        }
    }

    /// Last stored raw value; 0 for indices past the last slot.
    pub fn parameter_value(&self, index: u8) -> i32 {
        self.params.get(index)
    }

    /// No custom text for any parameter; the host shows the number.
    pub fn parameter_str_value(&self, _index: u8, _value: i32) -> Option<&'static str> {
        None
    }

    pub fn parameter_bmp_value(&self, _index: u8, _value: i32) -> Option<&'static [u8]> {
        None
    }

    /* ---------------------------------------------------------------------- */
    /* Notes                                                                  */
    /* ---------------------------------------------------------------------- */

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        self.note = note as f32;
        self.gate_on(velocity);
    }

    /// The note number is not matched: any note-off closes one gate layer.
    pub fn note_off(&mut self, _note: u8) {
        self.gate_off();
    }

    pub fn gate_on(&mut self, velocity: u8) {
        self.amp = velocity as f32 / 127.0;
        self.gate.on();
    }

    pub fn gate_off(&mut self) {
        self.gate.off();
    }

    /// Drop every gate layer; the envelope releases from where it is.
    pub fn all_note_off(&mut self) {
        self.gate.clear();
    }

    pub fn pitch_bend(&mut self, _bend: u16) {}

    pub fn channel_pressure(&mut self, _pressure: u8) {}

    pub fn aftertouch(&mut self, _note: u8, _aftertouch: u8) {}

    /* ---------------------------------------------------------------------- */
    /* Presets (a single implicit one)                                        */
    /* ---------------------------------------------------------------------- */

    pub fn load_preset(&mut self, _index: u8) {}

    pub fn preset_index(&self) -> u8 {
        0
    }

    pub fn preset_name(_index: u8) -> Option<&'static str> {
        None
    }

    /* ---------------------------------------------------------------------- */
    /* Control queue                                                          */
    /* ---------------------------------------------------------------------- */

    pub fn apply(&mut self, message: VoiceMessage) {
        match message {
            VoiceMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            VoiceMessage::NoteOff { note } => self.note_off(note),
            VoiceMessage::SetParameter { index, value } => self.set_parameter(index, value),
            VoiceMessage::AllNoteOff => self.all_note_off(),
            VoiceMessage::Reset => self.reset(),
        }
    }

    /// Drain pending control messages. Call at the start of a block.
    pub fn apply_messages<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            self.apply(message);
        }
    }

    /* ---------------------------------------------------------------------- */
    /* Render                                                                 */
    /* ---------------------------------------------------------------------- */

    /// Render `frames` interleaved stereo frames into `out`, the same sample
    /// on both channels.
    ///
    /// Writes `min(frames, out.len() / 2)` frames and returns that count.
    /// Samples past the written frames are left alone.
    pub fn render(&mut self, out: &mut [f32], frames: usize) -> usize {
        let frames = frames.min(out.len() / 2);

        let trigger = self.gate.trigger();
        let gate_level = trigger.level();

        for frame in out.chunks_exact_mut(2).take(frames) {
            let env = self.envelope.next(trigger);
            let m = self.depths.route(env, gate_level);

            self.oscillator.set_pulse_width(m.pulse_width);
            let sig = self.oscillator.play(note_to_freq(self.note + m.pitch));

            let cutoff_note = (self.note + self.cutoff_offset + m.cutoff).max(0.0);
            let cutoff = note_to_freq(cutoff_note).min(MAX_CUTOFF_HZ);
            self.filter.set(FilterMode::LowPass, cutoff, self.resonance, 0.0);
            let sig = self.filter.play(sig * self.amp) * m.amplitude;

            frame[0] = sig;
            frame[1] = sig;
        }

        frames
    }

    /* ---------------------------------------------------------------------- */
    /* State                                                                  */
    /* ---------------------------------------------------------------------- */

    pub fn gate_count(&self) -> u32 {
        self.gate.count()
    }

    /// Current base note, before envelope pitch modulation.
    pub fn note(&self) -> f32 {
        self.note
    }

    /// Velocity gain of the last note-on.
    pub fn amplitude(&self) -> f32 {
        self.amp
    }

    pub fn cutoff_offset(&self) -> f32 {
        self.cutoff_offset
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn envelope_stage(&self) -> EnvelopeState {
        self.envelope.stage()
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn envelope(&self) -> &E {
        &self.envelope
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    pub fn filter(&self) -> &SVFilter {
        &self.filter
    }
}
