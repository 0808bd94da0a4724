use super::galois::{generator_poly, G};

// Block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Block {
    // Data codewords followed by error correction codewords
    data: Vec<u8>,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], ecc_len: usize) -> Self {
        let dlen = raw.len();
        let mut data = Vec::with_capacity(dlen + ecc_len);
        data.extend_from_slice(raw);
        data.resize(dlen + ecc_len, 0);
        let mut block = Self { data, dlen };
        block.compute_ecc();
        block
    }

    #[cfg(test)]
    pub fn with_encoded(encoded: &[u8], dlen: usize) -> Self {
        debug_assert!(dlen <= encoded.len(), "Data length exceeds block length");
        Self { data: encoded.to_vec(), dlen }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn ec_len(&self) -> usize {
        self.data.len() - self.dlen
    }

    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn full(&self) -> &[u8] {
        &self.data
    }

    #[cfg(test)]
    pub fn full_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[cfg(test)]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    #[cfg(test)]
    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..]
    }

    // Performs polynomial long division with data polynomial(num)
    // and generator polynomial(den) to compute remainder polynomial,
    // the coefficients of which are the ecc
    fn compute_ecc(&mut self) {
        let gen_poly = generator_poly(self.ec_len());

        let mut rem = self.data.clone();
        for i in 0..self.dlen {
            let lead_coeff = G(rem[i]);
            if lead_coeff.0 == 0 {
                continue;
            }

            for (u, &v) in rem[i + 1..].iter_mut().zip(gen_poly.iter()) {
                *u ^= (lead_coeff * v).0;
            }
        }

        let dlen = self.dlen;
        self.data[dlen..].copy_from_slice(&rem[dlen..]);
    }
}

// Syndrome check
//------------------------------------------------------------------------------

impl Block {
    // Evaluates the codeword polynomial at a^1..a^n; all zero for an intact block
    pub fn syndromes(&self) -> Vec<u8> {
        (1..=self.ec_len())
            .map(|i| {
                let x = G::gen_pow(i);
                self.data.iter().fold(G(0), |acc, &c| acc * x + G(c)).into()
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.syndromes().iter().all(|&s| s == 0)
    }
}
