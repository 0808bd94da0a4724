use super::types::{Mode, MODES};

// Look-ahead mode selection
//------------------------------------------------------------------------------

// Costs are counted in twelfths of a codeword so every per-character cost is integral
pub(crate) const UNIT: u16 = 12;

// Number of bytes from the current position considered by the look-ahead
pub(crate) const WINDOW: usize = 9;

// Cost of leaving EDIFACT, charged wherever its run ends inside the window
pub(crate) const EDIFACT_UNLATCH_COST: u16 = UNIT;

// Modes in the order that wins ties
static PRIORITY: [Mode; 6] =
    [Mode::C40, Mode::X12, Mode::Text, Mode::Edifact, Mode::Base256, Mode::Ascii];

// Starting cost of each candidate mode, indexed by current mode then candidate
pub(crate) static INITIAL_COST: [[u16; 6]; 6] = build_initial_costs();

// Cost of one input byte in each mode, indexed by mode then byte
pub(crate) static BYTE_COST: [[u16; 256]; 6] = build_byte_costs();

const fn build_initial_costs() -> [[u16; 6]; 6] {
    let mut table = [[0; 6]; 6];
    let mut cur = 0;
    while cur < 6 {
        let mut cand = 0;
        while cand < 6 {
            // Leaving a non-ascii mode costs an unlatch before the next latch
            let exit = if cur == Mode::Ascii as usize { 0 } else { UNIT };
            table[cur][cand] = if cur == cand {
                0
            } else if cand == Mode::Ascii as usize {
                exit
            } else if cand == Mode::Base256 as usize {
                exit + UNIT + UNIT / 4
            } else {
                exit + UNIT
            };
            cand += 1;
        }
        cur += 1;
    }
    table
}

const fn byte_cost(mode: Mode, b: u8) -> u16 {
    let high = b > 127;
    let low = if high { b & 0x7F } else { b };
    match mode {
        Mode::Ascii => {
            let base = if b.is_ascii_digit() { UNIT / 2 } else { UNIT };
            if high {
                base + UNIT
            } else {
                base
            }
        }
        Mode::C40 | Mode::Text => {
            let basic = match mode {
                Mode::C40 => low.is_ascii_uppercase(),
                _ => low.is_ascii_lowercase(),
            } || low == b' '
                || low.is_ascii_digit();
            let base = if basic { UNIT * 2 / 3 } else { UNIT * 4 / 3 };
            if high {
                base + UNIT * 4 / 3
            } else {
                base
            }
        }
        Mode::X12 => match b {
            b'\r' | b'*' | b'>' | b' ' | b'0'..=b'9' | b'A'..=b'Z' => UNIT * 2 / 3,
            _ => UNIT * 4,
        },
        Mode::Edifact => match b {
            b' '..=b'^' => UNIT * 3 / 4,
            _ => UNIT * 6,
        },
        Mode::Base256 => UNIT,
    }
}

const fn build_byte_costs() -> [[u16; 256]; 6] {
    let mut table = [[0; 256]; 6];
    let mut m = 0;
    while m < 6 {
        let mut b = 0;
        while b < 256 {
            table[m][b] = byte_cost(MODES[m], b as u8);
            b += 1;
        }
        m += 1;
    }
    table
}

// Returns the mode the encoder should continue in at `pos`. A different mode is
// chosen only if it is strictly cheaper over the window and can encode the byte at
// `pos`; ties go to the earlier mode in PRIORITY.
pub(crate) fn look_ahead(data: &[u8], pos: usize, current: Mode) -> Mode {
    debug_assert!(pos < data.len(), "Look-ahead past end: Pos {pos}, Len {}", data.len());

    let mut costs = INITIAL_COST[current as usize];
    let mut edifact_open = true;
    for &b in data.iter().take(pos + WINDOW).skip(pos) {
        for m in MODES {
            if m != Mode::Edifact {
                costs[m as usize] += BYTE_COST[m as usize][b as usize];
            }
        }

        // An EDIFACT run ends at the first byte it can't encode, the rest is ascii
        let edifact = &mut costs[Mode::Edifact as usize];
        if edifact_open && Mode::Edifact.can_encode(b) {
            *edifact += BYTE_COST[Mode::Edifact as usize][b as usize];
        } else {
            if edifact_open {
                *edifact += EDIFACT_UNLATCH_COST;
                edifact_open = false;
            }
            *edifact += BYTE_COST[Mode::Ascii as usize][b as usize];
        }
    }
    // A run reaching the end of the input unlatches there
    if edifact_open && pos + WINDOW >= data.len() {
        costs[Mode::Edifact as usize] += EDIFACT_UNLATCH_COST;
    }

    let first = data[pos];
    let mut best = if current.can_encode(first) { Some(current) } else { None };
    for m in PRIORITY {
        if m == current || !m.can_encode(first) {
            continue;
        }
        match best {
            Some(b) if costs[m as usize] >= costs[b as usize] => {}
            _ => best = Some(m),
        }
    }
    best.unwrap_or(Mode::Ascii)
}
