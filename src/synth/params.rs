//! Parameter identities, descriptors and the raw parameter store.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Total parameter slots the host addresses, active or not.
pub const PARAMETER_SLOTS: usize = 24;
/// Slots that carry a parameter.
pub const ACTIVE_PARAMETERS: usize = 12;

/// The voice's parameters, in host slot order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Note,
    Waveform,
    Cutoff,
    Resonance,
    Attack,
    Decay,
    Sustain,
    Release,
    EnvAmpInt,
    EnvPitchInt,
    EnvCutoffInt,
    EnvPwmInt,
}

impl ParamId {
    pub const ALL: [ParamId; ACTIVE_PARAMETERS] = [
        ParamId::Note,
        ParamId::Waveform,
        ParamId::Cutoff,
        ParamId::Resonance,
        ParamId::Attack,
        ParamId::Decay,
        ParamId::Sustain,
        ParamId::Release,
        ParamId::EnvAmpInt,
        ParamId::EnvPitchInt,
        ParamId::EnvCutoffInt,
        ParamId::EnvPwmInt,
    ];

    /// Slot index to parameter. Reserved and out-of-range slots are `None`.
    pub fn from_index(index: u8) -> Option<ParamId> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn descriptor(self) -> &'static ParamDescriptor {
        &PARAMETER_DESCRIPTORS[self as usize]
    }
}

/// How the host should display a parameter value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    Plain,
    Percent,
    Milliseconds,
    MidiNote,
}

/// Static description of one parameter slot.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub center: i32,
    pub default: i32,
    pub display: DisplayType,
    /// Fractional digits shown by the host (value / 10^digits).
    pub fractional_digits: u8,
}

impl ParamDescriptor {
    const fn new(
        name: &'static str,
        min: i32,
        max: i32,
        center: i32,
        default: i32,
        display: DisplayType,
        fractional_digits: u8,
    ) -> Self {
        Self {
            name,
            min,
            max,
            center,
            default,
            display,
            fractional_digits,
        }
    }

    const RESERVED: ParamDescriptor = ParamDescriptor::new("", 0, 0, 0, 0, DisplayType::Plain, 0);

    #[inline]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    pub fn is_reserved(&self) -> bool {
        self.name.is_empty()
    }
}

use DisplayType::*;

/// Descriptor table in host slot order: four pages of three, then reserved.
pub static PARAMETER_DESCRIPTORS: [ParamDescriptor; PARAMETER_SLOTS] = [
    // Page 1
    ParamDescriptor::new("Note", 0, 127, 60, 60, MidiNote, 0),
    ParamDescriptor::new("Wave", 0, 2, 0, 0, Plain, 0),
    ParamDescriptor::new("Cutoff", 0, 1270, 0, 1270, Plain, 1),
    ParamDescriptor::new("Reso", -128, 128, 0, -16, Plain, 0),
    // Page 2
    ParamDescriptor::new("Attack", 0, 1000, 0, 0, Milliseconds, 0),
    ParamDescriptor::new("Decay", 0, 1000, 0, 0, Milliseconds, 0),
    ParamDescriptor::new("Sustain", 0, 100, 0, 100, Percent, 0),
    ParamDescriptor::new("Release", 0, 1000, 0, 0, Milliseconds, 0),
    // Page 3
    ParamDescriptor::new("EG >AMP", 0, 100, 0, 100, Percent, 0),
    ParamDescriptor::new(">Pitch", -100, 100, 0, 0, Percent, 0),
    ParamDescriptor::new(">Cutoff", -100, 100, 0, 0, Percent, 0),
    ParamDescriptor::new(">PWM", 0, 100, 0, 0, Percent, 0),
    // Pages 4-6
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
    ParamDescriptor::RESERVED,
];

/// Raw parameter values exactly as the host last set them (after clamping).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    values: [i32; PARAMETER_SLOTS],
}

impl Default for ParameterSet {
    fn default() -> Self {
        let mut values = [0; PARAMETER_SLOTS];
        for (value, descriptor) in values.iter_mut().zip(PARAMETER_DESCRIPTORS.iter()) {
            *value = descriptor.default;
        }
        Self { values }
    }
}

impl ParameterSet {
    /// Clamp and store a value. Returns the stored value, or `None` when
    /// `index` is not a slot.
    pub fn store(&mut self, index: u8, value: i32) -> Option<i32> {
        let slot = self.values.get_mut(index as usize)?;
        *slot = PARAMETER_DESCRIPTORS[index as usize].clamp(value);
        Some(*slot)
    }

    /// Stored value, 0 for indices past the last slot.
    pub fn get(&self, index: u8) -> i32 {
        self.values.get(index as usize).copied().unwrap_or(0)
    }

    pub fn value(&self, id: ParamId) -> i32 {
        self.values[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamId, i32)> + '_ {
        ParamId::ALL.iter().map(move |&id| (id, self.value(id)))
    }
}
