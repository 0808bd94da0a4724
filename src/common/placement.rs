use tracing::trace;

use super::error::{DMError, DMResult};
use super::metadata::SymbolSize;

// Mapping matrix cell
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Cell {
    Empty,
    // Index of the bit in the codeword stream, most significant bit of each codeword first
    Data(usize),
    // Fixed pattern in the bottom right corner left over by the walk
    Fixed(bool),
}

// Corner rules
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Corner {
    A,
    B,
    C,
    D,
}

// Exceptional placement of one codeword where the diagonal walk meets the
// corners of the mapping matrix
#[derive(Debug, Clone, Copy)]
pub struct CornerRule {
    pub corner: Corner,
    // Walk position triggering the rule, row relative to nrow and absolute col
    pub trigger: (i16, i16),
    // Applies when ncol % modulus == residue, or != residue if `equal` is false
    pub modulus: i16,
    pub residue: i16,
    pub equal: bool,
    // Cells of bits 7 to 0; negative coordinates count back from nrow or ncol
    pub cells: [(i16, i16); 8],
}

impl CornerRule {
    pub fn applies(&self, ncol: i16) -> bool {
        (ncol % self.modulus == self.residue) == self.equal
    }

    pub fn is_triggered(&self, r: i16, c: i16, nrow: i16, ncol: i16) -> bool {
        r == nrow + self.trigger.0 && c == self.trigger.1 && self.applies(ncol)
    }
}

pub static CORNER_RULES: [CornerRule; 4] = [
    CornerRule {
        corner: Corner::A,
        trigger: (0, 0),
        modulus: 1,
        residue: 0,
        equal: true,
        cells: [(-1, 0), (-1, 1), (-1, 2), (0, -2), (0, -1), (1, -1), (2, -1), (3, -1)],
    },
    CornerRule {
        corner: Corner::B,
        trigger: (-2, 0),
        modulus: 4,
        residue: 0,
        equal: false,
        cells: [(-3, 0), (-2, 0), (-1, 0), (0, -4), (0, -3), (0, -2), (0, -1), (1, -1)],
    },
    CornerRule {
        corner: Corner::C,
        trigger: (-2, 0),
        modulus: 8,
        residue: 4,
        equal: true,
        cells: [(-3, 0), (-2, 0), (-1, 0), (0, -2), (0, -1), (1, -1), (2, -1), (3, -1)],
    },
    CornerRule {
        corner: Corner::D,
        trigger: (4, 2),
        modulus: 8,
        residue: 0,
        equal: true,
        cells: [(-1, 0), (-1, -1), (0, -3), (0, -2), (0, -1), (1, -3), (1, -2), (1, -1)],
    },
];

// Bits 7 to 0 of the regular "utah" shape relative to its anchor
static UTAH: [(i16, i16); 8] =
    [(-2, -2), (-2, -1), (-1, -2), (-1, -1), (-1, 0), (0, -2), (0, -1), (0, 0)];

// Placement
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Placement {
    nrow: i16,
    ncol: i16,
    cells: Vec<Cell>,
    // Codewords placed by each corner rule, for inspection
    corners: Vec<(Corner, usize)>,
}

impl Placement {
    // Walks the mapping matrix of the size, placing every bit of its codewords
    pub fn new(size: &SymbolSize) -> DMResult<Self> {
        let (nrow, ncol) = size.mapping_size();
        let mut pl = Self {
            nrow: nrow as i16,
            ncol: ncol as i16,
            cells: vec![Cell::Empty; nrow * ncol],
            corners: Vec::with_capacity(4),
        };
        let placed = pl.walk();
        pl.fill_fixed_corner();
        pl.verify(size.total_codewords(), placed)?;
        trace!(corners = ?pl.corners, "Placed {placed} codewords in {nrow}x{ncol} mapping for {size}");
        Ok(pl)
    }

    pub fn nrow(&self) -> usize {
        self.nrow as usize
    }

    pub fn ncol(&self) -> usize {
        self.ncol as usize
    }

    #[cfg(test)]
    pub fn corners(&self) -> &[(Corner, usize)] {
        &self.corners
    }

    #[cfg(test)]
    pub fn get(&self, r: usize, c: usize) -> Cell {
        debug_assert!(r < self.nrow() && c < self.ncol(), "Out of mapping bounds: ({r}, {c})");

        self.cells[r * self.ncol() + c]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let ncol = self.ncol();
        self.cells.iter().enumerate().map(move |(i, &cell)| (i / ncol, i % ncol, cell))
    }

    // Returns the number of codewords placed
    fn walk(&mut self) -> usize {
        let (nrow, ncol) = (self.nrow, self.ncol);
        let mut p = 0;
        let (mut r, mut c) = (4i16, 0i16);
        loop {
            for rule in CORNER_RULES.iter() {
                if rule.is_triggered(r, c, nrow, ncol) {
                    self.place_corner(rule, p);
                    p += 1;
                }
            }

            // Up and to the right
            loop {
                if r < nrow && c >= 0 && self.is_free(r, c) {
                    self.place_utah(r, c, p);
                    p += 1;
                }
                r -= 2;
                c += 2;
                if !(r >= 0 && c < ncol) {
                    break;
                }
            }
            r += 1;
            c += 3;

            // Down and to the left
            loop {
                if r >= 0 && c < ncol && self.is_free(r, c) {
                    self.place_utah(r, c, p);
                    p += 1;
                }
                r += 2;
                c -= 2;
                if !(r < nrow && c >= 0) {
                    break;
                }
            }
            r += 3;
            c += 1;

            if !(r < nrow || c < ncol) {
                break;
            }
        }
        p
    }

    fn is_free(&self, r: i16, c: i16) -> bool {
        self.cells[(r * self.ncol + c) as usize] == Cell::Empty
    }

    fn place_utah(&mut self, r: i16, c: i16, p: usize) {
        for (bit, &(dr, dc)) in UTAH.iter().enumerate() {
            self.place_bit(r + dr, c + dc, p * 8 + bit);
        }
    }

    fn place_corner(&mut self, rule: &CornerRule, p: usize) {
        let (nrow, ncol) = (self.nrow, self.ncol);
        for (bit, &(r, c)) in rule.cells.iter().enumerate() {
            let r = if r < 0 { nrow + r } else { r };
            let c = if c < 0 { ncol + c } else { c };
            self.place_bit(r, c, p * 8 + bit);
        }
        self.corners.push((rule.corner, p));
    }

    // Wraps coordinates that fall off the mapping matrix onto the opposite edge
    fn place_bit(&mut self, mut r: i16, mut c: i16, bit: usize) {
        let (nrow, ncol) = (self.nrow, self.ncol);
        if r < 0 {
            r += nrow;
            c += 4 - ((nrow + 4) % 8);
        }
        if c < 0 {
            c += ncol;
            r += 4 - ((ncol + 4) % 8);
        }
        if r >= nrow {
            r -= nrow;
        }
        debug_assert!(
            (0..nrow).contains(&r) && (0..ncol).contains(&c),
            "Bit {bit} wrapped out of mapping: ({r}, {c})"
        );

        self.cells[(r * ncol + c) as usize] = Cell::Data(bit);
    }

    // Sizes whose mapping leaves a 2x2 corner free carry a fixed pattern there
    fn fill_fixed_corner(&mut self) {
        let (nrow, ncol) = (self.nrow, self.ncol);
        if !self.is_free(nrow - 1, ncol - 1) {
            return;
        }
        for (r, c, dark) in [
            (nrow - 1, ncol - 1, true),
            (nrow - 2, ncol - 2, true),
            (nrow - 1, ncol - 2, false),
            (nrow - 2, ncol - 1, false),
        ] {
            self.cells[(r * ncol + c) as usize] = Cell::Fixed(dark);
        }
    }

    // Every codeword bit lands in exactly one cell and no cell is left empty
    fn verify(&self, total_codewords: usize, placed: usize) -> DMResult<()> {
        let bits = total_codewords * 8;
        let mut seen = vec![false; bits];
        let mut data_cells = 0;
        for &cell in self.cells.iter() {
            match cell {
                Cell::Data(i) if i < bits && !seen[i] => {
                    seen[i] = true;
                    data_cells += 1;
                }
                Cell::Fixed(_) => {}
                _ => {
                    return Err(DMError::InternalPlacementMismatch {
                        placed: placed * 8,
                        expected: bits,
                    })
                }
            }
        }
        if placed != total_codewords || data_cells != bits {
            return Err(DMError::InternalPlacementMismatch { placed: data_cells, expected: bits });
        }
        Ok(())
    }
}
