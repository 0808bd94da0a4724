use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitStream {
    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self { data: Vec::with_capacity(bit_capacity.div_ceil(8)), len: 0 }
    }

    pub fn from(inp: &[u8]) -> Self {
        Self { data: inp.to_vec(), len: inp.len() << 3 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "Out of bitstream bounds: Len {}, Pos {}", self.len, pos);

        (self.data[pos >> 3] << (pos & 7)) & 0b10000000 != 0
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(size <= 16, "Bits from only u8 and u16 can be pushed: Size {size}");

        for i in (0..size).rev() {
            let bit = (bits >> i) & T::one() == T::one();
            self.push(bit);
        }
    }

    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }
        self.len += 1;
    }

    // Zero fills up to the next byte boundary
    pub fn align(&mut self) {
        let offset = self.len & 7;
        if offset > 0 {
            self.len += 8 - offset;
        }
    }
}
