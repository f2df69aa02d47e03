//! Audio device setup and the phrase player

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Consumer;

use maxisynth::{
    dsp::EnvelopeGenerator,
    synth::{ParamId, VoiceHandle, VoiceMessage},
    Synth,
};

/// One eighth note: a note held for most of the step, or silence.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    note: Option<(u8, u8)>,
}

impl Step {
    pub fn note(note: u8, velocity: u8) -> Self {
        Self {
            note: Some((note, velocity)),
        }
    }

    pub fn rest() -> Self {
        Self { note: None }
    }
}

pub struct Phrase {
    bpm: f64,
    parameters: Vec<(ParamId, i32)>,
    steps: Vec<Step>,
}

impl Phrase {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            parameters: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn set(mut self, id: ParamId, value: i32) -> Self {
        self.parameters.push((id, value));
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    fn step_duration(&self) -> Duration {
        Duration::from_secs_f64(30.0 / self.bpm)
    }
}

/// Open the default device at the voice's rate and play `phrase` once.
pub fn run<E: EnvelopeGenerator + 'static>(
    mut synth: Synth<E>,
    mut rx: Consumer<VoiceMessage>,
    mut handle: VoiceHandle,
    phrase: Phrase,
) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;

    let config = cpal::StreamConfig {
        channels: 2,
        sample_rate: cpal::SampleRate(maxisynth::SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };

    println!("=== maxisynth ===");
    println!("Device: {}", device.name().unwrap_or_else(|_| "unknown".into()));
    println!("Sample rate: {} Hz", config.sample_rate.0);
    println!("Tempo: {} BPM, {} steps", phrase.bpm, phrase.steps.len());
    println!();

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                synth.apply_messages(&mut rx);
                let frames = data.len() / 2;
                synth.render(data, frames);
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("device does not accept 48 kHz stereo output")?;

    stream.play().wrap_err("failed to start the output stream")?;

    for &(id, value) in &phrase.parameters {
        handle.set_parameter(id.index(), value);
    }

    let step = phrase.step_duration();
    let held = step.mul_f64(0.8);
    for s in &phrase.steps {
        match s.note {
            Some((note, velocity)) => {
                handle.note_on(note, velocity);
                thread::sleep(held);
                handle.note_off(note);
                thread::sleep(step - held);
            }
            None => thread::sleep(step),
        }
    }

    // Let the release ring out
    thread::sleep(Duration::from_millis(600));
    handle.all_note_off();
    thread::sleep(Duration::from_millis(50));

    Ok(())
}
