pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use std::iter;

    use tracing::{debug, trace};

    use super::super::lookahead::look_ahead;
    use super::super::types::{
        edifact_value, is_digit_pair, pack_triple, push_ascii, push_triple_values, Mode,
        EDIFACT_UNLATCH, UNLATCH,
    };
    use super::super::Segment;
    use super::writer::{pack_edifact, pad, push_base256, Tail};
    use crate::common::error::{DMError, DMResult};

    // Codeword stream of the data before the symbol size is known. The tail holds the
    // end-of-data handling that depends on the space left in the symbol.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Encoding {
        codewords: Vec<u8>,
        tail: Tail,
        // Mode each input byte ended up encoded in
        char_modes: Vec<Mode>,
    }

    impl Encoding {
        pub fn ascii(data: &[u8]) -> Self {
            let mut codewords = Vec::with_capacity(data.len());
            push_ascii(data, &mut codewords);
            Self { codewords, tail: Tail::None, char_modes: vec![Mode::Ascii; data.len()] }
        }

        // Smallest number of data codewords a symbol must hold
        pub fn min_len(&self) -> usize {
            self.codewords.len() + self.tail.min_len()
        }

        #[cfg(test)]
        pub fn codewords(&self) -> &[u8] {
            &self.codewords
        }

        #[cfg(test)]
        pub fn char_modes(&self) -> &[Mode] {
            &self.char_modes
        }

        // Completes the stream for a symbol holding `capacity` data codewords
        pub fn finish(self, capacity: usize) -> DMResult<(Vec<u8>, Vec<Segment>)> {
            let required = self.min_len();
            if required > capacity {
                return Err(DMError::DataTooLong { required, capacity });
            }

            let Self { mut codewords, tail, mut char_modes } = self;
            let avail = capacity - codewords.len();
            tail.finish(avail, &mut codewords, &mut char_modes);
            pad(&mut codewords, capacity);

            debug_assert!(
                codewords.len() == capacity,
                "Finished stream doesn't fill capacity: Len {}, Capacity {capacity}",
                codewords.len()
            );
            Ok((codewords, build_segments(&char_modes)))
        }
    }

    // Encodes the data with look-ahead mode switching. Falls back to plain ascii when
    // that is shorter.
    pub fn encode_data(data: &[u8]) -> DMResult<Encoding> {
        if data.is_empty() {
            return Err(DMError::EmptyData);
        }

        let optimised = Encoder::new(data).run()?;
        let ascii = Encoding::ascii(data);
        if optimised.min_len() > ascii.min_len() {
            debug!(
                "Ascii encodation is shorter: Optimised {}, Ascii {}",
                optimised.min_len(),
                ascii.min_len()
            );
            return Ok(ascii);
        }

        debug!("Encoded {} bytes into {} codewords", data.len(), optimised.min_len());
        Ok(optimised)
    }

    struct Encoder<'a> {
        data: &'a [u8],
        pos: usize,
        mode: Mode,
        // Input position where the current mode was entered
        run_start: usize,
        codewords: Vec<u8>,
        char_modes: Vec<Mode>,
        // Values not yet packed in C40, Text, X12 or EDIFACT
        values: Vec<u8>,
        // Input position and codeword count at the last empty triple buffer
        checkpoint: (usize, usize),
        // Bytes of the open base 256 field
        field: Vec<u8>,
    }

    impl<'a> Encoder<'a> {
        fn new(data: &'a [u8]) -> Self {
            Self {
                data,
                pos: 0,
                mode: Mode::Ascii,
                run_start: 0,
                codewords: Vec::with_capacity(data.len()),
                char_modes: Vec::with_capacity(data.len()),
                values: Vec::with_capacity(4),
                checkpoint: (0, 0),
                field: Vec::new(),
            }
        }

        fn run(mut self) -> DMResult<Encoding> {
            while self.pos < self.data.len() {
                match self.mode {
                    Mode::Ascii => self.step_ascii(),
                    Mode::C40 | Mode::Text | Mode::X12 => self.step_triple()?,
                    Mode::Edifact => self.step_edifact(),
                    Mode::Base256 => self.step_base256()?,
                }
            }

            let tail = self.close()?;
            debug_assert!(
                self.char_modes.len() == self.data.len(),
                "Every byte must have a mode: Modes {}, Len {}",
                self.char_modes.len(),
                self.data.len()
            );
            Ok(Encoding { codewords: self.codewords, tail, char_modes: self.char_modes })
        }

        fn step_ascii(&mut self) {
            let pos = self.pos;
            if is_digit_pair(self.data, pos) {
                push_ascii(&self.data[pos..pos + 2], &mut self.codewords);
                self.char_modes.extend([Mode::Ascii; 2]);
                self.pos += 2;
                return;
            }

            let next = look_ahead(self.data, pos, Mode::Ascii);
            if let Some(latch) = next.latch() {
                trace!("Latch to {next:?} at {pos}");
                self.codewords.push(latch);
                self.mode = next;
                self.run_start = pos;
                self.checkpoint = (pos, self.codewords.len());
                self.values.clear();
                self.field.clear();
                return;
            }

            push_ascii(&self.data[pos..pos + 1], &mut self.codewords);
            self.char_modes.push(Mode::Ascii);
            self.pos += 1;
        }

        fn step_triple(&mut self) -> DMResult<()> {
            let (pos, mode) = (self.pos, self.mode);
            if self.values.is_empty() {
                self.checkpoint = (pos, self.codewords.len());
                if pos > self.run_start && look_ahead(self.data, pos, mode) != mode {
                    self.unlatch();
                    return Ok(());
                }
            }

            let b = self.data[pos];
            if !mode.can_encode(b) {
                // Bytes since the last triple boundary are re-encoded in ascii
                trace!("Forced exit from {mode:?} at {pos}");
                self.rewind();
                self.unlatch();
                return Ok(());
            }

            push_triple_values(mode, b, &mut self.values)
                .ok_or(DMError::InternalEncodingTable("triple values"))?;
            self.char_modes.push(mode);
            self.pos += 1;
            while self.values.len() >= 3 {
                self.codewords.extend(pack_triple(&self.values[..3]));
                self.values.drain(..3);
            }
            Ok(())
        }

        fn step_edifact(&mut self) {
            let pos = self.pos;
            if self.values.len() == 3 && look_ahead(self.data, pos, Mode::Edifact) != Mode::Edifact
            {
                self.unlatch_edifact();
                return;
            }

            let Some(v) = edifact_value(self.data[pos]) else {
                trace!("Forced exit from Edifact at {pos}");
                self.unlatch_edifact();
                return;
            };

            self.values.push(v);
            self.char_modes.push(Mode::Edifact);
            self.pos += 1;
            if self.values.len() == 4 {
                self.codewords.extend(pack_edifact(&self.values));
                self.values.clear();
            }
        }

        fn step_base256(&mut self) -> DMResult<()> {
            let pos = self.pos;
            if pos > self.run_start && look_ahead(self.data, pos, Mode::Base256) != Mode::Base256 {
                // Leaving base 256 takes no codeword
                push_base256(&self.field, &mut self.codewords)?;
                self.field.clear();
                self.mode = Mode::Ascii;
                return Ok(());
            }

            self.field.push(self.data[pos]);
            self.char_modes.push(Mode::Base256);
            self.pos += 1;
            Ok(())
        }

        fn unlatch(&mut self) {
            trace!("Unlatch from {:?} at {}", self.mode, self.pos);
            self.codewords.push(UNLATCH);
            self.values.clear();
            self.mode = Mode::Ascii;
        }

        fn unlatch_edifact(&mut self) {
            trace!("Unlatch from Edifact at {}", self.pos);
            self.values.push(EDIFACT_UNLATCH);
            self.codewords.extend(pack_edifact(&self.values));
            self.values.clear();
            self.mode = Mode::Ascii;
        }

        fn rewind(&mut self) {
            let (pos, len) = self.checkpoint;
            self.codewords.truncate(len);
            self.char_modes.truncate(pos);
            self.values.clear();
            self.pos = pos;
        }

        // End of data handling that doesn't depend on the symbol size
        fn close(&mut self) -> DMResult<Tail> {
            match self.mode {
                Mode::Ascii => Ok(Tail::None),
                Mode::Base256 => {
                    push_base256(&self.field, &mut self.codewords)?;
                    self.field.clear();
                    Ok(Tail::None)
                }
                Mode::Edifact => {
                    let pending = &self.data[self.pos - self.values.len()..self.pos];
                    Ok(Tail::Edifact(pending.to_vec()))
                }
                Mode::C40 | Mode::Text | Mode::X12 => self.close_triple(),
            }
        }

        // Packs the bytes since the last triple boundary, dropping trailing bytes until
        // the values form whole triples, a padded pair outside X12, or whole triples and
        // one lone single-value byte
        fn close_triple(&mut self) -> DMResult<Tail> {
            if self.values.is_empty() {
                return Ok(Tail::Unlatch);
            }

            let (data, mode) = (self.data, self.mode);
            self.rewind();
            let chars = &data[self.pos..];
            let mut values = Vec::with_capacity(chars.len() * 4);
            let mut counts = Vec::with_capacity(chars.len());
            for &b in chars {
                let n = push_triple_values(mode, b, &mut values)
                    .ok_or(DMError::InternalEncodingTable("triple values"))?;
                counts.push(n);
            }

            let mut keep = chars.len();
            let mut total = values.len();
            let mut lone = None;
            loop {
                match total % 3 {
                    0 => break,
                    2 if mode != Mode::X12 => break,
                    1 if keep == chars.len() && counts[keep - 1] == 1 => {
                        keep -= 1;
                        total -= 1;
                        lone = Some(chars[keep]);
                        break;
                    }
                    _ => {
                        keep -= 1;
                        total -= counts[keep];
                    }
                }
            }

            for triple in values[..total].chunks(3) {
                let padded = [triple[0], triple.get(1).copied().unwrap_or(0), 0];
                let triple = if triple.len() == 3 { triple } else { &padded[..] };
                self.codewords.extend(pack_triple(triple));
            }
            self.char_modes.extend(iter::repeat(mode).take(keep));
            self.pos += keep;

            if let Some(b) = lone {
                self.char_modes.push(Mode::Ascii);
                self.pos += 1;
                return Ok(Tail::LoneChar(b));
            }
            if keep == chars.len() {
                return Ok(Tail::Unlatch);
            }

            trace!("Backtracked {} bytes out of {mode:?}", chars.len() - keep);
            self.codewords.push(UNLATCH);
            push_ascii(&chars[keep..], &mut self.codewords);
            self.char_modes.extend(iter::repeat(Mode::Ascii).take(chars.len() - keep));
            self.pos = self.data.len();
            Ok(Tail::None)
        }
    }

    // Groups consecutive bytes encoded in the same mode
    pub(crate) fn build_segments(char_modes: &[Mode]) -> Vec<Segment> {
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        for (i, &m) in char_modes.iter().enumerate() {
            if i > 0 && char_modes[seg_start] != m {
                segs.push(Segment::new(char_modes[seg_start], seg_start, i - seg_start));
                seg_start = i;
            }
        }
        if let Some(&m) = char_modes.get(seg_start) {
            segs.push(Segment::new(m, seg_start, char_modes.len() - seg_start));
        }
        segs
    }


    #[cfg(test)]
    mod encode_proptests {
        use proptest::prelude::*;

        use super::{Encoder, Encoding};

        pub fn edifact_strategy() -> BoxedStrategy<Vec<u8>> {
            prop::collection::vec(prop::sample::select(b"./:;@[]^".to_vec()), 1..200).boxed()
        }

        proptest! {
            #[test]
            fn proptest_edifact_run(data in edifact_strategy()) {
                let enc = Encoder::new(&data).run().unwrap();
                prop_assert!(enc.min_len() <= Encoding::ascii(&data).min_len());
            }
        }
    }
}

// Writer for the end of data and padding
//------------------------------------------------------------------------------

pub(super) mod writer {
    use super::super::types::{
        ascii_len, push_ascii, randomize_253, randomize_255, Mode, EDIFACT_UNLATCH, PAD, UNLATCH,
    };
    use crate::common::bitstream::BitStream;
    use crate::common::error::{DMError, DMResult};
    use crate::common::metadata::MAX_DATA_CODEWORDS;

    // End of data handling deferred until the space left in the symbol is known
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Tail {
        None,
        // Triple mode ended on a boundary, unlatch if codewords follow
        Unlatch,
        // Single-value byte after whole triples, ascii without unlatch if it fills the symbol
        LoneChar(u8),
        // Bytes pending in EDIFACT
        Edifact(Vec<u8>),
    }

    impl Tail {
        pub fn min_len(&self) -> usize {
            match self {
                Self::None | Self::Unlatch => 0,
                Self::LoneChar(_) => 1,
                Self::Edifact(chars) => {
                    let alen = ascii_len(chars);
                    if alen <= 2 {
                        alen
                    } else {
                        edifact_unlatch_len(chars.len())
                    }
                }
            }
        }

        pub fn finish(self, avail: usize, out: &mut Vec<u8>, char_modes: &mut [Mode]) {
            debug_assert!(avail >= self.min_len(), "Tail doesn't fit: Avail {avail}");

            match self {
                Self::None => {}
                Self::Unlatch => {
                    if avail > 0 {
                        out.push(UNLATCH);
                    }
                }
                Self::LoneChar(b) => {
                    if avail > 1 {
                        out.push(UNLATCH);
                    }
                    push_ascii(&[b], out);
                }
                Self::Edifact(chars) => {
                    if avail <= 2 && ascii_len(&chars) <= avail {
                        push_ascii(&chars, out);
                        let len = char_modes.len();
                        char_modes[len - chars.len()..].fill(Mode::Ascii);
                        return;
                    }
                    let mut values = chars.iter().map(|&b| b & 0x3F).collect::<Vec<_>>();
                    values.push(EDIFACT_UNLATCH);
                    out.extend(pack_edifact(&values));
                }
            }
        }
    }

    fn edifact_unlatch_len(pending: usize) -> usize {
        (6 * (pending + 1)).div_ceil(8)
    }

    // Four 6-bit values per three codewords, a short group is zero filled
    pub fn pack_edifact(values: &[u8]) -> Vec<u8> {
        debug_assert!(values.len() <= 4, "Too many EDIFACT values: {}", values.len());

        let mut bs = BitStream::with_capacity(values.len() * 6);
        for &v in values {
            bs.push_bits(v, 6);
        }
        bs.align();
        bs.into_data()
    }

    // Appends the randomised length field and bytes of a base 256 field
    pub fn push_base256(field: &[u8], out: &mut Vec<u8>) -> DMResult<()> {
        let n = field.len();
        let header = match n {
            0..=249 => vec![n as u8],
            250..=1749 => vec![(n / 250 + 249) as u8, (n % 250) as u8],
            _ => {
                return Err(DMError::DataTooLong {
                    required: out.len() + n + 2,
                    capacity: MAX_DATA_CODEWORDS,
                })
            }
        };
        for &b in header.iter().chain(field) {
            let pos = out.len() + 1;
            out.push(randomize_255(b, pos));
        }
        Ok(())
    }

    pub fn pad(out: &mut Vec<u8>, capacity: usize) {
        if out.len() < capacity {
            out.push(PAD);
        }
        while out.len() < capacity {
            let pos = out.len() + 1;
            out.push(randomize_253(pos));
        }
    }

}
