pub mod bitstream;
pub mod codec;
pub mod ec;
pub mod error;
pub mod metadata;
pub mod placement;

pub use codec::{Mode, Segment};
