// Purpose: the voice itself, its parameters and how control reaches it

pub mod gate;
pub mod message;
pub mod modulation;
pub mod params;
pub mod voice;

pub use gate::Gate;
#[cfg(feature = "rtrb")]
pub use message::{control_queue, VoiceHandle};
pub use message::{MessageReceiver, VoiceMessage, CONTROL_QUEUE_SIZE};
pub use modulation::{Modulation, ModulationDepths};
pub use params::{DisplayType, ParamDescriptor, ParamId, ParameterSet, PARAMETER_DESCRIPTORS};
pub use voice::Synth;
