use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
pub enum DMError {
    // User input
    #[error("Empty data")]
    EmptyData,
    #[error("Data too long: {required} needed, at most {capacity} available")]
    DataTooLong { required: usize, capacity: usize },
    #[error("Forced symbol size {rows}x{cols} holds {capacity} codewords, {required} needed")]
    InvalidForcedSize { rows: usize, cols: usize, capacity: usize, required: usize },
    #[error("Invalid symbol size")]
    InvalidSize,
    #[error("Invalid character")]
    InvalidChar,

    // Library defects
    #[error("Internal encoding table error: {0}")]
    InternalEncodingTable(&'static str),
    #[error("Internal placement mismatch: {placed} bits placed, {expected} expected")]
    InternalPlacementMismatch { placed: usize, expected: usize },
}

impl DMError {
    /// True for invariant violations inside the library, false for errors caused by the input
    /// or the configuration.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalEncodingTable(_) | Self::InternalPlacementMismatch { .. })
    }
}

pub type DMResult<T> = Result<T, DMError>;
