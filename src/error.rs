use std::fmt;

/// Errors surfaced at the kernel's control boundary.
///
/// Rendering never fails with an error; an unsupported channel layout is
/// reported through the `bool` returned by the frame processor.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Stream reset with a sample rate that is zero, negative or not finite.
    InvalidSampleRate(f64),
    /// A raw host parameter id that maps to no control.
    UnknownParameter(u32),
    /// The control queue between the UI and audio threads is full.
    QueueFull,
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::InvalidSampleRate(rate) => {
                write!(f, "invalid sample rate: {rate} Hz")
            }
            KernelError::UnknownParameter(id) => write!(f, "unknown parameter id {id}"),
            KernelError::QueueFull => write!(f, "control queue is full"),
        }
    }
}

impl std::error::Error for KernelError {}

pub type Result<T> = std::result::Result<T, KernelError>;
