use thiserror::Error;

/// Pending GPU error code, as drained by `GpuBackend::take_error`.
///
/// GPU errors are never fatal for the engine: the render-state cache logs and
/// counts them, then keeps going.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum GpuErrorCode {
    #[error("invalid enum")]
    InvalidEnum,
    #[error("invalid value")]
    InvalidValue,
    #[error("invalid operation")]
    InvalidOperation,
    #[error("matrix stack overflow")]
    StackOverflow,
    #[error("matrix stack underflow")]
    StackUnderflow,
    #[error("out of memory")]
    OutOfMemory,
    #[error("unknown error 0x{0:04x}")]
    Other(u32),
}

impl GpuErrorCode {
    /// Maps a raw fixed-function error enum. Returns `None` for `NO_ERROR` (0).
    pub fn from_raw(code: u32) -> Option<Self> {
        Some(match code {
            0 => return None,
            0x0500 => Self::InvalidEnum,
            0x0501 => Self::InvalidValue,
            0x0502 => Self::InvalidOperation,
            0x0503 => Self::StackOverflow,
            0x0504 => Self::StackUnderflow,
            0x0505 => Self::OutOfMemory,
            other => Self::Other(other),
        })
    }
}
