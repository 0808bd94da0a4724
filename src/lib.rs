//! # dmism
//!
//! A Rust library for generating ECC200 Data Matrix symbols.
//!
//! ## Features
//!
//! - **Optimised encoding**: Switches between the ASCII, C40, Text, X12, EDIFACT and Base256
//!   encodation modes with a look-ahead to keep the codeword count low
//! - **All ECC200 sizes**: 24 square and 6 rectangular sizes, from 10x10 to 144x144
//! - **Rectangular extension**: Optional DMRE sizes (ISO/IEC 21471) for long, flat symbols
//! - **Reed-Solomon error correction**: Block interleaving over GF(256)
//! - **Module grid output**: Plain grid of modules, ready for any renderer
//!
//! ## Quick Start
//!
//! ### Generating a Data Matrix
//!
//! ```rust
//! use dmism::DMBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dm = DMBuilder::new(b"123456").build()?;
//!
//! assert_eq!((dm.rows(), dm.cols()), (10, 10));
//! assert_eq!(dm.codewords(), [142, 164, 186, 114, 25, 5, 88, 102]);
//! println!("{}", dm.to_debug_str());
//! # Ok(())
//! # }
//! ```
//!
//! ### Advanced Configuration
//!
//! ```rust
//! use dmism::{DMBuilder, Shape, SizeId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dm = DMBuilder::from_text("Straße 12, Köln")?
//!     .rect_extension(true)   // Allow DMRE sizes - if not set, only the ECC200 sizes are used
//!     .shape(Shape::Rectangle) // Restrict the selection - if not set, any shape fits
//!     .build()?;
//!
//! assert!(dm.rows() < dm.cols());
//!
//! // Forcing a size skips the selection
//! let dm = DMBuilder::new(b"ABC").size(SizeId(9)).build()?;
//! assert_eq!((dm.rows(), dm.cols()), (26, 26));
//! # Ok(())
//! # }
//! ```
//!
//! ### Encoding Without Drawing
//!
//! ```rust
//! use dmism::{encode, EncodeOptions, Mode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let enc = encode(b"AIMAIMAIM", &EncodeOptions::default())?;
//!
//! assert_eq!(enc.codewords, [230, 91, 11, 91, 11, 91, 11, 254]);
//! assert_eq!(enc.segments[0].mode, Mode::C40);
//! # Ok(())
//! # }
//! ```
//!
//! ## Symbol Components
//!
//! ### Finder Pattern
//! Every data region is framed by a solid "L" on its left and bottom edges and by alternating
//! dark and light modules on its top and right edges.
//!
//! ### Data Regions
//! Larger symbols are split into a grid of data regions. The codeword bits are placed over the
//! regions as if they formed one contiguous mapping matrix.
//!
//! ### Encodation Modes
//! - **ASCII**: One codeword per character or per digit pair
//! - **C40 / Text**: Three characters in two codewords, upper case or lower case biased
//! - **X12**: Three characters of the ANSI X12 set in two codewords
//! - **EDIFACT**: Four 6-bit characters in three codewords
//! - **Base256**: Length prefixed raw bytes

pub mod builder;
pub(crate) mod common;

pub use builder::{encode, Color, DMBuilder, DataMatrix, EncodeOptions, Encoded, Module};
pub use common::error::{DMError, DMResult};
pub use common::metadata::{Shape, SizeId, SymbolSize};
pub use common::{Mode, Segment};
