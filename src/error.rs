use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised outside the render path.
///
/// Rendering itself never fails: overflowing events are dropped, unknown
/// parameters are ignored and non-finite samples are replaced by silence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("event channel capacity must be at least 2, got {0}")]
    InvalidCapacity(usize),

    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("wire event must be {expected} bytes, got {actual}")]
    WireLength { expected: usize, actual: usize },

    #[error("unknown event source byte 0x{0:02x}")]
    UnknownSource(u8),

    #[error("unknown event type byte 0x{0:02x}")]
    UnknownEventKind(u8),

    #[error("command `{0}` is missing a `:` separator")]
    MissingSeparator(String),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("invalid value `{value}` for command `{command}`")]
    InvalidValue { command: String, value: String },

    #[error("unknown waveform `{0}`")]
    UnknownWaveform(String),
}
