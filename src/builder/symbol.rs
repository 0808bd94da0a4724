use std::ops::Deref;

use crate::common::{
    bitstream::BitStream,
    codec::Segment,
    error::{DMError, DMResult},
    metadata::SymbolSize,
    placement::{Cell, Placement},
};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Finder(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Finder(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataMatrix {
    grid: Vec<Module>,
    size: SymbolSize,
    // Interleaved data and error correction codewords
    codewords: Vec<u8>,
    segments: Vec<Segment>,
}

// Data Matrix type for builder
//------------------------------------------------------------------------------

impl DataMatrix {
    pub(crate) fn new(size: SymbolSize, codewords: Vec<u8>, segments: Vec<Segment>) -> Self {
        debug_assert!(
            codewords.len() == size.total_codewords(),
            "Codeword count doesn't match size {size}: {}",
            codewords.len()
        );

        let grid = vec![Module::Empty; size.rows() * size.cols()];
        Self { grid, size, codewords, segments }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn size(&self) -> SymbolSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    pub fn cols(&self) -> usize {
        self.size.cols()
    }

    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    // Interleaving keeps the data codewords in order at the front of the stream
    pub fn data_codewords(&self) -> &[u8] {
        &self.codewords[..self.size.data_codewords()]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn to_debug_str(&self) -> String {
        let (h, w) = (self.rows(), self.cols());
        let mut res = String::with_capacity(h * (w + 1) + 1);
        res.push('\n');
        for r in 0..h {
            for c in 0..w {
                let ch = match self.get(r, c) {
                    Module::Empty => '.',
                    Module::Finder(Color::Dark) => 'f',
                    Module::Finder(Color::Light) => 'F',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(ch);
            }
            res.push('\n');
        }
        res
    }

    pub fn get(&self, r: usize, c: usize) -> Module {
        debug_assert!(r < self.rows(), "Row out of bounds: {r}");
        debug_assert!(c < self.cols(), "Column out of bounds: {c}");

        self.grid[r * self.cols() + c]
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        *self.get(r, c) == Color::Dark
    }

    fn set(&mut self, r: usize, c: usize, module: Module) {
        let w = self.cols();
        self.grid[r * w + c] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl DataMatrix {
    // Solid left column and bottom row, alternating top row and right column, per region
    pub(crate) fn draw_finders(&mut self) {
        let (fh, fw) = (self.size.region_rows(), self.size.region_cols());
        let (vr, hr) = self.size.region_count();
        for i in 0..vr {
            for j in 0..hr {
                self.draw_finder_at(i * fh, j * fw, fh, fw);
            }
        }
    }

    fn draw_finder_at(&mut self, r0: usize, c0: usize, fh: usize, fw: usize) {
        for c in 0..fw {
            self.set(r0, c0 + c, Module::Finder(Color::from(c % 2 == 0)));
            self.set(r0 + fh - 1, c0 + c, Module::Finder(Color::Dark));
        }
        for r in 0..fh {
            self.set(r0 + r, c0, Module::Finder(Color::Dark));
            self.set(r0 + r, c0 + fw - 1, Module::Finder(Color::from(r % 2 == 1)));
        }
    }
}


// Data placement
//------------------------------------------------------------------------------

impl DataMatrix {
    // Draws each mapping cell into its region, skipping the finder rows and columns
    pub(crate) fn draw_data(&mut self, placement: &Placement) -> DMResult<()> {
        let total_bits = self.size.total_codewords() * 8;
        let (nrow, ncol) = self.size.mapping_size();
        if (placement.nrow(), placement.ncol()) != (nrow, ncol) {
            return Err(DMError::InternalPlacementMismatch {
                placed: placement.nrow() * placement.ncol(),
                expected: nrow * ncol,
            });
        }

        let bits = BitStream::from(&self.codewords);
        if bits.len() != total_bits {
            return Err(DMError::InternalPlacementMismatch {
                placed: bits.len(),
                expected: total_bits,
            });
        }

        let (fh, fw) = (self.size.region_rows() - 2, self.size.region_cols() - 2);
        for (r, c, cell) in placement.iter() {
            let dark = match cell {
                Cell::Data(i) => bits.get(i),
                Cell::Fixed(dark) => dark,
                Cell::Empty => {
                    return Err(DMError::InternalPlacementMismatch {
                        placed: r * ncol + c,
                        expected: nrow * ncol,
                    })
                }
            };
            let (sr, sc) = (1 + r + 2 * (r / fh), 1 + c + 2 * (c / fw));
            debug_assert!(self.get(sr, sc) == Module::Empty, "Module ({sr}, {sc}) drawn twice");

            self.set(sr, sc, Module::Data(Color::from(dark)));
        }

        debug_assert!(
            !self.grid.contains(&Module::Empty),
            "Empty modules left in {} symbol",
            self.size
        );
        Ok(())
    }
}

#[cfg(test)]
mod data_tests {
    use super::{DataMatrix, Module};
    use crate::common::{
        error::DMError,
        metadata::{SymbolSize, BASE_SIZES, EXTENDED_SIZES},
        placement::Placement,
    };

    #[test]
    fn test_draw_data_fills_every_size() {
        for size in BASE_SIZES.iter().chain(EXTENDED_SIZES.iter()) {
            let cws = (0..size.total_codewords()).map(|i| (i * 31 % 256) as u8).collect();
            let mut dm = DataMatrix::new(*size, cws, vec![]);
            dm.draw_finders();
            dm.draw_data(&Placement::new(size).unwrap()).unwrap();
            assert!(dm.grid().iter().all(|&m| m != Module::Empty), "Size {size}");
        }
    }

    #[test]
    fn test_draw_data_first_codeword() {
        // Codeword 0b10000001 lands on mapping (2, 6) and (4, 0)
        let size = SymbolSize::from_dimensions(10, 10, false).unwrap();
        let mut cws = vec![0; 8];
        cws[0] = 0b10000001;
        let mut dm = DataMatrix::new(size, cws, vec![]);
        dm.draw_finders();
        dm.draw_data(&Placement::new(&size).unwrap()).unwrap();
        assert!(dm.is_dark(3, 7));
        assert!(dm.is_dark(5, 1));
        assert_eq!(dm.count_dark_modules(), 27 + 2);
    }

    #[test]
    fn test_draw_data_mismatch() {
        let size = SymbolSize::from_dimensions(10, 10, false).unwrap();
        let other = SymbolSize::from_dimensions(12, 12, false).unwrap();
        let mut dm = DataMatrix::new(size, vec![0; 8], vec![]);
        let err = dm.draw_data(&Placement::new(&other).unwrap()).unwrap_err();
        assert!(matches!(err, DMError::InternalPlacementMismatch { .. }));
        assert!(err.is_internal());
    }
}
