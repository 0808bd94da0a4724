mod block;
mod galois;

pub use block::Block;

use super::{
    error::{DMError, DMResult},
    metadata::SymbolSize,
};

// Error correction
//------------------------------------------------------------------------------

// Deals the data codewords round-robin over the blocks of the size and computes the
// error correction codewords of each block
pub fn ecc(data: &[u8], size: &SymbolSize) -> DMResult<Vec<Block>> {
    if data.len() != size.data_codewords() {
        return Err(DMError::InternalPlacementMismatch {
            placed: data.len() * 8,
            expected: size.data_codewords() * 8,
        });
    }

    let ecc_len = size.ecc_per_block();
    let blocks = blockify(data, size.block_count())
        .iter()
        .map(|b| Block::new(b, ecc_len))
        .collect::<Vec<_>>();

    debug_assert!(
        blocks.iter().enumerate().all(|(i, b)| b.data_len() == size.block_data_len(i)),
        "Block lengths don't match size {size}"
    );
    Ok(blocks)
}

pub fn blockify(data: &[u8], block_count: usize) -> Vec<Vec<u8>> {
    let mut blocks = vec![Vec::with_capacity(data.len().div_ceil(block_count)); block_count];
    for (i, &cw) in data.iter().enumerate() {
        blocks[i % block_count].push(cw);
    }
    blocks
}

// Round-robin over each block's data followed by its ecc. Blocks shorter by one data
// codeword therefore start their ecc one round earlier, which is the layout required
// for 144x144 symbols.
pub fn interleave(blocks: &[Block]) -> Vec<u8> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if let Some(&cw) = b.full().get(i) {
                res.push(cw);
            }
        }
    }
    res
}
