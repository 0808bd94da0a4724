mod symbol;

pub use symbol::{Color, DataMatrix, Module};

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::common::{
    codec::{encode_data, Segment},
    ec::{ecc, interleave},
    error::{DMError, DMResult},
    metadata::{Shape, SizeId, SymbolSize},
    placement::Placement,
};

// Longest input accepted by default, twice the largest data capacity
pub const DEFAULT_MAX_INPUT_LEN: usize = 3116;

// Encoding options
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct EncodeOptions {
    pub rect_extension: bool,
    pub shape: Shape,
    pub size: Option<SizeId>,
    pub max_input_len: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            rect_extension: false,
            shape: Shape::Any,
            size: None,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

/// Data codewords of a symbol, padded to its capacity, before error correction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Encoded {
    pub codewords: Vec<u8>,
    pub segments: Vec<Segment>,
    pub size: SymbolSize,
}

/// Encodes `data` into the data codewords of the smallest fitting symbol, or of the
/// forced size if one is set. The shape setting doesn't apply to a forced size.
pub fn encode(data: &[u8], options: &EncodeOptions) -> DMResult<Encoded> {
    if data.is_empty() {
        return Err(DMError::EmptyData);
    }
    if data.len() > options.max_input_len {
        return Err(DMError::DataTooLong {
            required: data.len(),
            capacity: options.max_input_len,
        });
    }

    let encoding = encode_data(data)?;
    let required = encoding.min_len();

    let size = match options.size {
        Some(id) => id.symbol_size(options.rect_extension)?.check_forced(required)?,
        None => SymbolSize::select(required, options.rect_extension, options.shape)?,
    };

    let (codewords, segments) = encoding.finish(size.data_codewords())?;
    debug_assert!(codewords.len() == size.data_codewords(), "Codewords not padded to {size}");

    Ok(Encoded { codewords, segments, size })
}

// Builder
//------------------------------------------------------------------------------

pub struct DMBuilder<'a> {
    data: Cow<'a, [u8]>,
    options: EncodeOptions,
}

impl<'a> DMBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data: Cow::Borrowed(data), options: EncodeOptions::default() }
    }

    /// Converts `text` to Windows-1252 bytes, a superset of ISO-8859-1. Characters
    /// outside it give [`DMError::InvalidChar`].
    pub fn from_text(text: &str) -> DMResult<DMBuilder<'static>> {
        let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
        if had_errors {
            return Err(DMError::InvalidChar);
        }
        Ok(DMBuilder { data: Cow::Owned(bytes.into_owned()), options: EncodeOptions::default() })
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = Cow::Borrowed(data);
        self
    }

    pub fn rect_extension(&mut self, enabled: bool) -> &mut Self {
        self.options.rect_extension = enabled;
        self
    }

    pub fn shape(&mut self, shape: Shape) -> &mut Self {
        self.options.shape = shape;
        self
    }

    pub fn size(&mut self, size: SizeId) -> &mut Self {
        self.options.size = Some(size);
        self
    }

    pub fn unset_size(&mut self) -> &mut Self {
        self.options.size = None;
        self
    }

    pub fn max_input_len(&mut self, len: usize) -> &mut Self {
        self.options.max_input_len = len;
        self
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn metadata(&self) -> String {
        let size = match self.options.size.map(SizeId::dimensions) {
            Some(Ok((rows, cols))) => format!("{rows}x{cols}"),
            Some(Err(_)) => "Invalid".to_string(),
            None => "None".to_string(),
        };
        format!(
            "{{ Size: {size}, Shape: {:?}, Rect extension: {} }}",
            self.options.shape, self.options.rect_extension
        )
    }
}


impl DMBuilder<'_> {
    pub fn encode(&self) -> DMResult<Encoded> {
        encode(&self.data, &self.options)
    }

    pub fn build(&self) -> DMResult<DataMatrix> {
        debug!(len = self.data.len(), metadata = %self.metadata(), "Generating data matrix");

        let Encoded { codewords, segments, size } = self.encode()?;
        debug!(size = %size, segments = segments.len(), "Encoded data");

        let blocks = ecc(&codewords, &size)?;
        debug_assert!(blocks.iter().all(|b| b.is_valid()), "Nonzero syndromes in {size}");
        let payload = interleave(&blocks);
        debug!(blocks = blocks.len(), total = payload.len(), "Computed error correction");

        let placement = Placement::new(&size)?;
        let mut dm = DataMatrix::new(size, payload, segments);
        dm.draw_finders();
        dm.draw_data(&placement)?;

        debug!(
            rows = dm.rows(),
            cols = dm.cols(),
            dark = dm.count_dark_modules(),
            "Data matrix generated"
        );
        Ok(dm)
    }
}


#[cfg(test)]
mod builder_proptests {
    use proptest::prelude::*;

    use super::DMBuilder;
    use crate::common::{ec::Block, metadata::SymbolSize};

    // Inverse of the round-robin interleaving over full blocks
    fn deinterleave(codewords: &[u8], size: &SymbolSize) -> Vec<Block> {
        let lens = (0..size.block_count())
            .map(|b| size.block_data_len(b) + size.ecc_per_block())
            .collect::<Vec<_>>();
        let mut blocks = lens.iter().map(|&l| Vec::with_capacity(l)).collect::<Vec<_>>();
        let mut cws = codewords.iter();
        for i in 0..lens.iter().copied().max().unwrap_or(0) {
            for (b, &l) in blocks.iter_mut().zip(lens.iter()) {
                if i < l {
                    b.push(*cws.next().unwrap());
                }
            }
        }
        assert!(cws.next().is_none());
        blocks
            .iter()
            .enumerate()
            .map(|(i, b)| Block::with_encoded(b, size.block_data_len(i)))
            .collect()
    }

    proptest! {
        #[test]
        fn proptest_ecc_syndromes(
            data in prop::collection::vec(any::<u8>(), 1..700),
            rect_extension in any::<bool>(),
        ) {
            let dm = DMBuilder::new(&data).rect_extension(rect_extension).build().unwrap();
            let size = dm.size();
            prop_assert_eq!(dm.codewords().len(), size.total_codewords());

            let blocks = deinterleave(dm.codewords(), &size);
            let mut data_cws = vec![0; size.data_codewords()];
            for (i, b) in blocks.iter().enumerate() {
                prop_assert!(b.is_valid(), "Block {} of {} has errors", i, size);
                for (j, &cw) in b.data().iter().enumerate() {
                    data_cws[j * blocks.len() + i] = cw;
                }
            }
            prop_assert_eq!(&data_cws[..], dm.data_codewords());
        }
    }
}
