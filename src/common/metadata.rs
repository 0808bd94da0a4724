use std::fmt::{Display, Formatter};

use tracing::trace;

use super::error::{DMError, DMResult};

// Symbol size
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct SymbolSize {
    rows: usize,
    cols: usize,
    // Data region dimensions including the finder border
    region_rows: usize,
    region_cols: usize,
    data_codewords: usize,
    data_per_block: usize,
    ecc_per_block: usize,
}

impl SymbolSize {
    const fn new(
        rows: usize,
        cols: usize,
        region_rows: usize,
        region_cols: usize,
        data_codewords: usize,
        data_per_block: usize,
        ecc_per_block: usize,
    ) -> Self {
        Self { rows, cols, region_rows, region_cols, data_codewords, data_per_block, ecc_per_block }
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn region_rows(&self) -> usize {
        self.region_rows
    }

    pub const fn region_cols(&self) -> usize {
        self.region_cols
    }

    pub const fn data_codewords(&self) -> usize {
        self.data_codewords
    }

    pub const fn data_per_block(&self) -> usize {
        self.data_per_block
    }

    pub const fn ecc_per_block(&self) -> usize {
        self.ecc_per_block
    }

    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub const fn is_extension(&self) -> bool {
        !self.is_square()
            && !matches!(
                (self.rows, self.cols),
                (8, 18) | (8, 32) | (12, 26) | (12, 36) | (16, 36) | (16, 48)
            )
    }

    pub const fn region_count(&self) -> (usize, usize) {
        (self.rows / self.region_rows, self.cols / self.region_cols)
    }

    // Dimensions of the mapping matrix, i.e. the symbol without any finder border
    pub const fn mapping_size(&self) -> (usize, usize) {
        let (vr, hr) = self.region_count();
        (self.rows - 2 * vr, self.cols - 2 * hr)
    }

    pub const fn block_count(&self) -> usize {
        self.data_codewords.div_ceil(self.data_per_block)
    }

    // Data codewords in block `b` when the stream is dealt round-robin over all blocks
    pub fn block_data_len(&self, b: usize) -> usize {
        let blocks = self.block_count();
        debug_assert!(b < blocks, "Block index out of range: Index {b}, Blocks {blocks}");
        (self.data_codewords - b).div_ceil(blocks)
    }

    pub const fn ecc_codewords(&self) -> usize {
        self.block_count() * self.ecc_per_block
    }

    pub const fn total_codewords(&self) -> usize {
        self.data_codewords + self.ecc_codewords()
    }

    pub fn from_dimensions(rows: usize, cols: usize, rect_extension: bool) -> DMResult<Self> {
        catalog(rect_extension)
            .iter()
            .find(|s| s.rows == rows && s.cols == cols)
            .copied()
            .ok_or(DMError::InvalidSize)
    }
}

impl Display for SymbolSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

// Geometry tables
//------------------------------------------------------------------------------

const fn sz(
    rows: usize,
    cols: usize,
    region_rows: usize,
    region_cols: usize,
    data_codewords: usize,
    data_per_block: usize,
    ecc_per_block: usize,
) -> SymbolSize {
    SymbolSize::new(
        rows,
        cols,
        region_rows,
        region_cols,
        data_codewords,
        data_per_block,
        ecc_per_block,
    )
}

pub static MAX_DATA_CODEWORDS: usize = 1558;

// Standard sizes ordered by capacity, squares first on ties
pub static BASE_SIZES: [SymbolSize; 30] = [
    sz(10, 10, 10, 10, 3, 3, 5),
    sz(12, 12, 12, 12, 5, 5, 7),
    sz(8, 18, 8, 18, 5, 5, 7),
    sz(14, 14, 14, 14, 8, 8, 10),
    sz(8, 32, 8, 16, 10, 10, 11),
    sz(16, 16, 16, 16, 12, 12, 12),
    sz(12, 26, 12, 26, 16, 16, 14),
    sz(18, 18, 18, 18, 18, 18, 14),
    sz(20, 20, 20, 20, 22, 22, 18),
    sz(12, 36, 12, 18, 22, 22, 18),
    sz(22, 22, 22, 22, 30, 30, 20),
    sz(16, 36, 16, 18, 32, 32, 24),
    sz(24, 24, 24, 24, 36, 36, 24),
    sz(26, 26, 26, 26, 44, 44, 28),
    sz(16, 48, 16, 24, 49, 49, 28),
    sz(32, 32, 16, 16, 62, 62, 36),
    sz(36, 36, 18, 18, 86, 86, 42),
    sz(40, 40, 20, 20, 114, 114, 48),
    sz(44, 44, 22, 22, 144, 144, 56),
    sz(48, 48, 24, 24, 174, 174, 68),
    sz(52, 52, 26, 26, 204, 102, 42),
    sz(64, 64, 16, 16, 280, 140, 56),
    sz(72, 72, 18, 18, 368, 92, 36),
    sz(80, 80, 20, 20, 456, 114, 48),
    sz(88, 88, 22, 22, 576, 144, 56),
    sz(96, 96, 24, 24, 696, 174, 68),
    sz(104, 104, 26, 26, 816, 136, 56),
    sz(120, 120, 20, 20, 1050, 175, 68),
    sz(132, 132, 22, 22, 1304, 163, 62),
    sz(144, 144, 24, 24, 1558, 156, 62),
];

// Standard sizes plus the rectangular extension (DMRE) sizes, ordered by capacity
pub static EXTENDED_SIZES: [SymbolSize; 42] = [
    sz(10, 10, 10, 10, 3, 3, 5),
    sz(12, 12, 12, 12, 5, 5, 7),
    sz(8, 18, 8, 18, 5, 5, 7),
    sz(14, 14, 14, 14, 8, 8, 10),
    sz(8, 32, 8, 16, 10, 10, 11),
    sz(16, 16, 16, 16, 12, 12, 12),
    sz(12, 26, 12, 26, 16, 16, 14),
    sz(18, 18, 18, 18, 18, 18, 14),
    sz(8, 48, 8, 24, 18, 18, 15),
    sz(20, 20, 20, 20, 22, 22, 18),
    sz(12, 36, 12, 18, 22, 22, 18),
    sz(8, 64, 8, 16, 24, 24, 18),
    sz(22, 22, 22, 22, 30, 30, 20),
    sz(16, 36, 16, 18, 32, 32, 24),
    sz(24, 24, 24, 24, 36, 36, 24),
    sz(12, 64, 12, 16, 43, 43, 27),
    sz(26, 26, 26, 26, 44, 44, 28),
    sz(16, 48, 16, 24, 49, 49, 28),
    sz(24, 32, 24, 16, 49, 49, 28),
    sz(26, 32, 26, 16, 52, 52, 32),
    sz(24, 36, 24, 18, 55, 55, 33),
    sz(32, 32, 16, 16, 62, 62, 36),
    sz(16, 64, 16, 16, 62, 62, 36),
    sz(26, 40, 26, 20, 70, 70, 38),
    sz(24, 48, 24, 24, 80, 80, 41),
    sz(36, 36, 18, 18, 86, 86, 42),
    sz(26, 48, 26, 24, 90, 90, 42),
    sz(24, 64, 24, 16, 108, 108, 46),
    sz(40, 40, 20, 20, 114, 114, 48),
    sz(26, 64, 26, 16, 118, 118, 50),
    sz(44, 44, 22, 22, 144, 144, 56),
    sz(48, 48, 24, 24, 174, 174, 68),
    sz(52, 52, 26, 26, 204, 102, 42),
    sz(64, 64, 16, 16, 280, 140, 56),
    sz(72, 72, 18, 18, 368, 92, 36),
    sz(80, 80, 20, 20, 456, 114, 48),
    sz(88, 88, 22, 22, 576, 144, 56),
    sz(96, 96, 24, 24, 696, 174, 68),
    sz(104, 104, 26, 26, 816, 136, 56),
    sz(120, 120, 20, 20, 1050, 175, 68),
    sz(132, 132, 22, 22, 1304, 163, 62),
    sz(144, 144, 24, 24, 1558, 156, 62),
];

pub fn catalog(rect_extension: bool) -> &'static [SymbolSize] {
    if rect_extension {
        &EXTENDED_SIZES
    } else {
        &BASE_SIZES
    }
}

// Size id
//------------------------------------------------------------------------------

// Stable external size numbers, independent of the capacity order of the catalogs.
// 1-24 are the squares, 25-30 the standard rectangles and 31-42 the DMRE sizes.
static SIZE_IDS: [(usize, usize); 42] = [
    (10, 10),
    (12, 12),
    (14, 14),
    (16, 16),
    (18, 18),
    (20, 20),
    (22, 22),
    (24, 24),
    (26, 26),
    (32, 32),
    (36, 36),
    (40, 40),
    (44, 44),
    (48, 48),
    (52, 52),
    (64, 64),
    (72, 72),
    (80, 80),
    (88, 88),
    (96, 96),
    (104, 104),
    (120, 120),
    (132, 132),
    (144, 144),
    (8, 18),
    (8, 32),
    (12, 26),
    (12, 36),
    (16, 36),
    (16, 48),
    (8, 48),
    (8, 64),
    (12, 64),
    (16, 64),
    (24, 32),
    (24, 36),
    (24, 48),
    (24, 64),
    (26, 32),
    (26, 40),
    (26, 48),
    (26, 64),
];

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct SizeId(pub usize);

impl SizeId {
    pub fn dimensions(self) -> DMResult<(usize, usize)> {
        match self.0 {
            1..=42 => Ok(SIZE_IDS[self.0 - 1]),
            _ => Err(DMError::InvalidSize),
        }
    }

    // Position of the size in the capacity ordered catalog
    pub fn catalog_index(self, rect_extension: bool) -> DMResult<usize> {
        let (rows, cols) = self.dimensions()?;
        catalog(rect_extension)
            .iter()
            .position(|s| s.rows == rows && s.cols == cols)
            .ok_or(DMError::InvalidSize)
    }

    pub fn symbol_size(self, rect_extension: bool) -> DMResult<SymbolSize> {
        let index = self.catalog_index(rect_extension)?;
        Ok(catalog(rect_extension)[index])
    }
}

// Shape
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum Shape {
    #[default]
    Any,
    Square,
    Rectangle,
}

impl Shape {
    pub fn allows(self, size: &SymbolSize) -> bool {
        match self {
            Self::Any => true,
            Self::Square => size.is_square(),
            Self::Rectangle => !size.is_square(),
        }
    }
}

// Size selector
//------------------------------------------------------------------------------

impl SymbolSize {
    pub fn select(required: usize, rect_extension: bool, shape: Shape) -> DMResult<Self> {
        let sizes = catalog(rect_extension);
        let size = sizes
            .iter()
            .filter(|s| shape.allows(s))
            .find(|s| s.data_codewords >= required)
            .copied();

        match size {
            Some(s) => {
                trace!(required, size = %s, "Selected symbol size");
                Ok(s)
            }
            None => {
                let capacity = sizes
                    .iter()
                    .filter(|s| shape.allows(s))
                    .map(|s| s.data_codewords)
                    .max()
                    .unwrap_or(0);
                Err(DMError::DataTooLong { required, capacity })
            }
        }
    }

    pub fn check_forced(self, required: usize) -> DMResult<Self> {
        if self.data_codewords < required {
            return Err(DMError::InvalidForcedSize {
                rows: self.rows,
                cols: self.cols,
                capacity: self.data_codewords,
                required,
            });
        }
        Ok(self)
    }
}
