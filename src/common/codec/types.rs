// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Ascii = 0,
    C40 = 1,
    Text = 2,
    X12 = 3,
    Edifact = 4,
    Base256 = 5,
}

pub(crate) const MODES: [Mode; 6] =
    [Mode::Ascii, Mode::C40, Mode::Text, Mode::X12, Mode::Edifact, Mode::Base256];

// Special codewords
pub(crate) static PAD: u8 = 129;
pub(crate) static DIGIT_PAIR_BASE: u8 = 130;
pub(crate) static UPPER_SHIFT: u8 = 235;
pub(crate) static UNLATCH: u8 = 254;

// Special values inside C40, Text and EDIFACT
pub(crate) static SHIFT_2_UPPER_SHIFT: u8 = 30;
pub(crate) static EDIFACT_UNLATCH: u8 = 31;

impl Mode {
    pub fn latch(self) -> Option<u8> {
        match self {
            Self::Ascii => None,
            Self::C40 => Some(230),
            Self::Base256 => Some(231),
            Self::X12 => Some(238),
            Self::Text => Some(239),
            Self::Edifact => Some(240),
        }
    }

    pub fn can_encode(self, byte: u8) -> bool {
        match self {
            Self::Ascii | Self::C40 | Self::Text | Self::Base256 => true,
            Self::X12 => x12_value(byte).is_some(),
            Self::Edifact => edifact_value(byte).is_some(),
        }
    }
}

// Character tables
//------------------------------------------------------------------------------

// Shift set (0 for the basic set, 1 to 3 for the shift sets) and value of a byte below 128
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) struct CharEntry {
    pub shift: u8,
    pub value: u8,
}

const fn char_entry(b: u8, text: bool) -> CharEntry {
    let (shift, value) = match b {
        0..=31 => (1, b),
        b' ' => (0, 3),
        b'!'..=b'/' => (2, b - b'!'),
        b'0'..=b'9' => (0, b - b'0' + 4),
        b':'..=b'@' => (2, b - b':' + 15),
        b'A'..=b'Z' if text => (3, b - b'A' + 1),
        b'A'..=b'Z' => (0, b - b'A' + 14),
        b'['..=b'_' => (2, b - b'[' + 22),
        b'`' if text => (3, 0),
        b'a'..=b'z' if text => (0, b - b'a' + 14),
        b'{'..=127 if text => (3, b - b'{' + 27),
        _ => (3, b - b'`'),
    };
    CharEntry { shift, value }
}

const fn build_char_table(text: bool) -> [CharEntry; 128] {
    let mut table = [CharEntry { shift: 0, value: 0 }; 128];
    let mut b = 0;
    while b < 128 {
        table[b] = char_entry(b as u8, text);
        b += 1;
    }
    table
}

pub(crate) static C40_TABLE: [CharEntry; 128] = build_char_table(false);

pub(crate) static TEXT_TABLE: [CharEntry; 128] = build_char_table(true);

pub(crate) fn x12_value(b: u8) -> Option<u8> {
    match b {
        b'\r' => Some(0),
        b'*' => Some(1),
        b'>' => Some(2),
        b' ' => Some(3),
        b'0'..=b'9' => Some(b - b'0' + 4),
        b'A'..=b'Z' => Some(b - b'A' + 14),
        _ => None,
    }
}

pub(crate) fn edifact_value(b: u8) -> Option<u8> {
    match b {
        b' '..=b'^' => Some(b & 0x3F),
        _ => None,
    }
}

// Appends the values encoding `b` in a triple mode, returns the number of values pushed
pub(crate) fn push_triple_values(mode: Mode, b: u8, out: &mut Vec<u8>) -> Option<usize> {
    let table = match mode {
        Mode::C40 => &C40_TABLE,
        Mode::Text => &TEXT_TABLE,
        Mode::X12 => {
            out.push(x12_value(b)?);
            return Some(1);
        }
        _ => return None,
    };

    let mut count = 0;
    let low = if b >= 128 {
        out.push(1);
        out.push(SHIFT_2_UPPER_SHIFT);
        count += 2;
        b - 128
    } else {
        b
    };
    let entry = table[low as usize];
    if entry.shift > 0 {
        out.push(entry.shift - 1);
        count += 1;
    }
    out.push(entry.value);
    Some(count + 1)
}

// Two codewords for three values
pub(crate) fn pack_triple(v: &[u8]) -> [u8; 2] {
    debug_assert!(v.len() == 3, "Triple must have 3 values: Len {}", v.len());
    debug_assert!(v.iter().all(|&x| x < 40), "Triple value out of range: {v:?}");

    let n = 1600 * v[0] as u16 + 40 * v[1] as u16 + v[2] as u16 + 1;
    [(n >> 8) as u8, (n & 0xFF) as u8]
}

pub(crate) fn is_digit_pair(data: &[u8], pos: usize) -> bool {
    data.get(pos).is_some_and(u8::is_ascii_digit)
        && data.get(pos + 1).is_some_and(u8::is_ascii_digit)
}

// Appends the ascii encodation of the data, packing digit pairs
pub(crate) fn push_ascii(data: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < data.len() {
        if is_digit_pair(data, i) {
            out.push(DIGIT_PAIR_BASE + 10 * (data[i] - b'0') + (data[i + 1] - b'0'));
            i += 2;
            continue;
        }
        let b = data[i];
        if b >= 128 {
            out.push(UPPER_SHIFT);
            out.push(b - 127);
        } else {
            out.push(b + 1);
        }
        i += 1;
    }
}

pub(crate) fn ascii_len(data: &[u8]) -> usize {
    let mut res = Vec::with_capacity(data.len() * 2);
    push_ascii(data, &mut res);
    res.len()
}

// 255-state randomising of base 256 codewords, `pos` is the 1-based stream position
pub(crate) fn randomize_255(b: u8, pos: usize) -> u8 {
    let prn = (149 * pos) % 255 + 1;
    ((b as usize + prn) % 256) as u8
}

// 253-state randomising of pad codewords, `pos` is the 1-based stream position
pub(crate) fn randomize_253(pos: usize) -> u8 {
    let prn = (149 * pos) % 253 + 1;
    let res = PAD as usize + prn;
    if res <= 254 {
        res as u8
    } else {
        (res - 254) as u8
    }
}

#[cfg(test)]
mod types_tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_latch_codewords() {
        assert_eq!(Mode::Ascii.latch(), None);
        assert_eq!(Mode::C40.latch(), Some(230));
        assert_eq!(Mode::Base256.latch(), Some(231));
        assert_eq!(Mode::X12.latch(), Some(238));
        assert_eq!(Mode::Text.latch(), Some(239));
        assert_eq!(Mode::Edifact.latch(), Some(240));
    }

    // Reference shift and value tables, indexed by byte
    #[test]
    fn test_c40_table() {
        let shifts = [
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            2, 2, 2, 2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
            3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
        ];
        let values = [
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
            24, 25, 26, 27, 28, 29, 30, 31, 3, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 4,
            5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 16, 17, 18, 19, 20, 21, 14, 15, 16, 17, 18, 19, 20,
            21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 22, 23,
            24, 25, 26, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20,
            21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
        ];
        for b in 0..128 {
            let e = C40_TABLE[b];
            assert_eq!((e.shift, e.value), (shifts[b], values[b]), "Byte {b}");
        }
    }

    #[test]
    fn test_text_table() {
        let shifts = [
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
            3, 3, 3, 3, 2, 2, 2, 2, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3,
        ];
        let values = [
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
            24, 25, 26, 27, 28, 29, 30, 31, 3, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 4,
            5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 16, 17, 18, 19, 20, 21, 1, 2, 3, 4, 5, 6, 7, 8, 9,
            10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 22, 23, 24, 25,
            26, 0, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33,
            34, 35, 36, 37, 38, 39, 27, 28, 29, 30, 31,
        ];
        for b in 0..128 {
            let e = TEXT_TABLE[b];
            assert_eq!((e.shift, e.value), (shifts[b], values[b]), "Byte {b}");
        }
    }

    #[test_case(Mode::C40, b'A', vec![14])]
    #[test_case(Mode::C40, b'a', vec![2, 1])]
    #[test_case(Mode::C40, b'!', vec![1, 0])]
    #[test_case(Mode::C40, b'\n', vec![0, 10])]
    #[test_case(Mode::C40, 0xCB, vec![1, 30, 24])]
    #[test_case(Mode::C40, 0xE1, vec![1, 30, 2, 1])]
    #[test_case(Mode::Text, b'a', vec![14])]
    #[test_case(Mode::Text, b'A', vec![2, 1])]
    #[test_case(Mode::X12, b'>', vec![2])]
    #[test_case(Mode::X12, b'Z', vec![39])]
    fn test_push_triple_values(mode: Mode, b: u8, exp: Vec<u8>) {
        let mut out = vec![];
        let n = push_triple_values(mode, b, &mut out).unwrap();
        assert_eq!(n, exp.len());
        assert_eq!(out, exp);
    }

    #[test]
    fn test_push_triple_values_rejects() {
        let mut out = vec![];
        assert_eq!(push_triple_values(Mode::X12, b'a', &mut out), None);
        assert_eq!(push_triple_values(Mode::Ascii, b'a', &mut out), None);
        assert!(out.is_empty());
    }

    #[test]
    fn test_pack_triple() {
        // A, I, M
        assert_eq!(pack_triple(&[14, 22, 26]), [91, 11]);
        assert_eq!(pack_triple(&[0, 0, 0]), [0, 1]);
        assert_eq!(pack_triple(&[39, 39, 39]), [250, 0]);
    }

    #[test]
    fn test_edifact_value() {
        assert_eq!(edifact_value(b' '), Some(32));
        assert_eq!(edifact_value(b'?'), Some(63));
        assert_eq!(edifact_value(b'@'), Some(0));
        assert_eq!(edifact_value(b'^'), Some(30));
        assert_eq!(edifact_value(b'_'), None);
        assert_eq!(edifact_value(b'a'), None);
        assert!(Mode::Edifact.can_encode(b'A'));
        assert!(!Mode::X12.can_encode(b'a'));
    }

    #[test_case(b"123456", vec![142, 164, 186])]
    #[test_case(b"A", vec![66])]
    #[test_case(b"1A", vec![50, 66])]
    #[test_case(b"123", vec![142, 52])]
    #[test_case(b"\xA3", vec![235, 36])]
    #[test_case(b"a9", vec![98, 58])]
    fn test_push_ascii(data: &[u8], exp: Vec<u8>) {
        let mut out = vec![];
        push_ascii(data, &mut out);
        assert_eq!(out, exp);
        assert_eq!(ascii_len(data), exp.len());
    }

    #[test]
    fn test_randomize_255() {
        assert_eq!(randomize_255(0, 1), 150);
        assert_eq!(randomize_255(200, 1), 94);
        assert_ne!(randomize_255(0x41, 3), randomize_255(0x41, 4));
    }

    #[test]
    fn test_randomize_253() {
        assert_eq!(randomize_253(3), 70);
        assert_eq!(randomize_253(4), 220);
    }
}
