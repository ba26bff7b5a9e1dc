// Paraphonic voice management: note bookkeeping for a fixed voice pool.
// Voices share one envelope and one signal path, so this layer decides pitch
// only; rendering happens in `source` and `effects`.

pub mod allocator;
pub mod voice;

pub use allocator::{Allocation, NoteOnOutcome, VoiceAllocator};
pub use voice::{Voice, VoiceSnapshot, VoiceState};
