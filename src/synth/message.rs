#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

/// Control events delivered to the render thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoiceMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    SetParameter { index: u8, value: i32 },
    AllNoteOff,
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}

/// Default control queue depth.
pub const CONTROL_QUEUE_SIZE: usize = 256;

/// Control-thread end of the queue.
#[cfg(feature = "rtrb")]
pub struct VoiceHandle {
    tx: Producer<VoiceMessage>,
}

#[cfg(feature = "rtrb")]
impl VoiceHandle {
    /// Queue a message. Returns false and drops it when the queue is full.
    pub fn send(&mut self, message: VoiceMessage) -> bool {
        match self.tx.push(message) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("control queue full, dropping {message:?}");
                false
            }
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> bool {
        self.send(VoiceMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> bool {
        self.send(VoiceMessage::NoteOff { note })
    }

    pub fn set_parameter(&mut self, index: u8, value: i32) -> bool {
        self.send(VoiceMessage::SetParameter { index, value })
    }

    pub fn all_note_off(&mut self) -> bool {
        self.send(VoiceMessage::AllNoteOff)
    }

    pub fn reset(&mut self) -> bool {
        log::debug!("reset");
        self.send(VoiceMessage::Reset)
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Create a control queue: the handle stays on the control thread, the
/// consumer moves to the render thread.
#[cfg(feature = "rtrb")]
pub fn control_queue(capacity: usize) -> (VoiceHandle, Consumer<VoiceMessage>) {
    let (tx, rx) = RingBuffer::<VoiceMessage>::new(capacity);
    (VoiceHandle { tx }, rx)
}
