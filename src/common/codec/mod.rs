pub mod encoder;
pub mod lookahead;
pub mod types;

pub use encoder::*;
pub use types::Mode;

// Segment
//------------------------------------------------------------------------------

// Run of consecutive input bytes encoded in one mode
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Segment {
    pub mode: Mode,
    // Index of the first input byte
    pub start: usize,
    pub len: usize,
    // Entered with a latch codeword; ascii is the default mode and is never latched
    pub latched: bool,
}

impl Segment {
    pub fn new(mode: Mode, start: usize, len: usize) -> Self {
        Self { mode, start, len, latched: mode != Mode::Ascii }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

// Codec proptesting
//------------------------------------------------------------------------------
