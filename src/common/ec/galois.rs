use std::ops::{Add, AddAssign, Div, Mul, MulAssign};

// Galois field GF(256) over x^8 + x^5 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x12D;

pub(crate) static EXP_TABLE: [u8; 512] = build_exp_table();

pub(crate) static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table[510] = table[0];
    table[511] = table[1];
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) struct G(pub u8);

impl G {
    pub fn gen_pow(i: usize) -> Self {
        G(EXP_TABLE[i % 255])
    }

    pub fn log(self) -> usize {
        debug_assert!(self.0 != 0, "Log of zero is undefined");
        LOG_TABLE[self.0 as usize] as usize
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

impl Add for G {
    type Output = G;
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self::Output {
        G(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    #[allow(clippy::suspicious_op_assign_impl)]
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for G {
    type Output = G;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.0 == 0 || rhs.0 == 0 {
            return G(0);
        }
        G(EXP_TABLE[self.log() + rhs.log()])
    }
}

impl MulAssign for G {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for G {
    type Output = G;
    fn div(self, rhs: Self) -> Self::Output {
        debug_assert!(rhs.0 != 0, "Division by zero");
        if self.0 == 0 {
            return G(0);
        }
        G(EXP_TABLE[self.log() + 255 - rhs.log()])
    }
}

// Generator polynomial
//------------------------------------------------------------------------------

// Coefficients of (x - a^1)(x - a^2)...(x - a^n), highest degree first, leading 1 dropped
pub(crate) fn generator_poly(n: usize) -> Vec<G> {
    let mut poly = vec![G(1)];
    for i in 1..=n {
        let root = G::gen_pow(i);
        let mut next = vec![G(0); poly.len() + 1];
        for (j, &c) in poly.iter().enumerate() {
            next[j] += c;
            next[j + 1] += c * root;
        }
        poly = next;
    }
    poly.split_off(1)
}

#[cfg(test)]
mod galois_tests {
    use super::{generator_poly, G, EXP_TABLE, LOG_TABLE};

    #[test]
    fn test_exp_log_tables() {
        assert_eq!(EXP_TABLE[0], 1);
        assert_eq!(EXP_TABLE[8], 0x2D);
        for i in 1..=255usize {
            assert_eq!(EXP_TABLE[LOG_TABLE[i] as usize] as usize, i);
        }
        let mut seen = [false; 256];
        for &e in EXP_TABLE[..255].iter() {
            assert!(!seen[e as usize], "Generator is not primitive");
            seen[e as usize] = true;
        }
    }

    #[test]
    fn test_mul_div() {
        for a in 1..=255u8 {
            for b in [1u8, 2, 45, 128, 255] {
                let p = G(a) * G(b);
                assert_eq!(p / G(b), G(a));
            }
        }
        assert_eq!(G(0) * G(7), G(0));
        assert_eq!(G(5) + G(5), G(0));
    }

    #[test]
    fn test_generator_roots() {
        for n in [5, 7, 10, 62, 68] {
            let gen = generator_poly(n);
            assert_eq!(gen.len(), n);
            for i in 1..=n {
                let x = G::gen_pow(i);
                let eval = gen.iter().fold(G(1), |acc, &c| acc * x + c);
                assert_eq!(eval, G(0), "a^{i} is not a root of degree {n} generator");
            }
        }
    }
}
