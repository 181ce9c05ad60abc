//! # Han Xin Encodation Modes
//!
//! Character grouping, cheapest-cost mode selection and bit-stream
//! emission for the eight stream modes. Mode selection is a dynamic
//! program over per-item bit costs (scaled by 3 so the 10/3-bit numeric
//! digit stays integral) with mode-switch overheads; ties prefer the
//! incumbent mode so runs stay long.

use super::tables::{
    self, DOUBLE_TERMINATOR, REGION_SWITCH, REGION_TERMINATOR, TEXT_SWITCH, TEXT_TERMINATOR,
};

/// Stream modes with their 4-bit indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Numeric,
    Text,
    Binary,
    Region1,
    Region2,
    Double,
    Four,
}

impl Mode {
    pub fn indicator(self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Text => 0b0010,
            Mode::Binary => 0b0011,
            Mode::Region1 => 0b0100,
            Mode::Region2 => 0b0101,
            Mode::Double => 0b0110,
            Mode::Four => 0b0111,
        }
    }
}

/// ECI mode indicator.
pub const ECI_INDICATOR: u32 = 0b1000;

/// One encodable unit: a bare byte or a grouped GB 18030 sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Byte(u8),
    Pair([u8; 2]),
    Quad([u8; 4]),
}

impl Item {
    fn len(self) -> usize {
        match self {
            Item::Byte(_) => 1,
            Item::Pair(_) => 2,
            Item::Quad(_) => 4,
        }
    }

    fn push_bytes(self, out: &mut Vec<u8>) {
        match self {
            Item::Byte(b) => out.push(b),
            Item::Pair(p) => out.extend_from_slice(&p),
            Item::Quad(q) => out.extend_from_slice(&q),
        }
    }
}

fn valid_second(b: u8) -> bool {
    (0x40..=0xFE).contains(&b) && b != 0x7F
}

/// Group a byte stream into GB 18030 sequences. With `grouped` false every
/// byte stands alone and only numeric/text/binary modes can apply.
pub fn group(bytes: &[u8], grouped: bool) -> Vec<Item> {
    let mut items = Vec::with_capacity(bytes.len());
    if !grouped {
        items.extend(bytes.iter().map(|&b| Item::Byte(b)));
        return items;
    }
    let mut i = 0;
    while i < bytes.len() {
        let b1 = bytes[i];
        if (0x81..=0xFE).contains(&b1) && i + 1 < bytes.len() {
            let b2 = bytes[i + 1];
            if valid_second(b2) {
                items.push(Item::Pair([b1, b2]));
                i += 2;
                continue;
            }
            if (0x30..=0x39).contains(&b2)
                && i + 3 < bytes.len()
                && (0x81..=0xFE).contains(&bytes[i + 2])
                && (0x30..=0x39).contains(&bytes[i + 3])
            {
                items.push(Item::Quad([b1, b2, bytes[i + 2], bytes[i + 3]]));
                i += 4;
                continue;
            }
        }
        items.push(Item::Byte(b1));
        i += 1;
    }
    items
}

fn in_region1(p: [u8; 2]) -> bool {
    (0xB0..=0xD7).contains(&p[0]) && (0xA1..=0xFE).contains(&p[1])
}

fn in_region2(p: [u8; 2]) -> bool {
    (0xD8..=0xF7).contains(&p[0]) && (0xA1..=0xFE).contains(&p[1])
}

/// Double-byte pairs outside the GB 2312 plane are always eligible;
/// pairs that live in the GB 2312 symbol rows need the full-multibyte
/// option, otherwise they travel as binary.
fn in_double(p: [u8; 2], full_multibyte: bool) -> bool {
    if in_region1(p) || in_region2(p) {
        return false;
    }
    full_multibyte || p[0] <= 0xA0 || p[0] >= 0xF8 || p[1] < 0xA1
}

pub fn region1_index(p: [u8; 2]) -> u16 {
    (p[0] - 0xB0) as u16 * 94 + (p[1] - 0xA1) as u16
}

pub fn region2_index(p: [u8; 2]) -> u16 {
    (p[0] - 0xD8) as u16 * 94 + (p[1] - 0xA1) as u16
}

pub fn double_index(p: [u8; 2]) -> u16 {
    (p[0] - 0x81) as u16 * 190 + (p[1] - 0x40) as u16 - u16::from(p[1] > 0x7F)
}

pub fn quad_index(q: [u8; 4]) -> u32 {
    ((q[0] - 0x81) as u32 * 10 + (q[1] - 0x30) as u32) * 1260
        + (q[2] - 0x81) as u32 * 10
        + (q[3] - 0x30) as u32
}

const MODES: [Mode; 7] = [
    Mode::Numeric,
    Mode::Text,
    Mode::Binary,
    Mode::Region1,
    Mode::Region2,
    Mode::Double,
    Mode::Four,
];

/// Per-item cost in third-of-bit units; `None` means ineligible.
fn item_cost(mode: Mode, item: Item, full_multibyte: bool) -> Option<u32> {
    match (mode, item) {
        (Mode::Numeric, Item::Byte(b)) if b.is_ascii_digit() => Some(10),
        (Mode::Text, Item::Byte(b)) if tables::text_encodable(b) => Some(18),
        (Mode::Binary, item) => Some(24 * item.len() as u32),
        (Mode::Region1, Item::Pair(p)) if in_region1(p) => Some(36),
        (Mode::Region2, Item::Pair(p)) if in_region2(p) => Some(36),
        (Mode::Double, Item::Pair(p)) if in_double(p, full_multibyte) => Some(45),
        (Mode::Four, Item::Quad(_)) => Some(75),
        _ => None,
    }
}

/// Indicator plus any length prefix, in third-of-bit units.
fn enter_cost(mode: Mode) -> u32 {
    match mode {
        Mode::Binary => 12 + 48, // indicator + 16-bit count
        Mode::Four => 0,         // indicator is charged per character
        _ => 12,
    }
}

/// Terminator emitted when leaving the mode (also at end of stream).
fn leave_cost(mode: Mode) -> u32 {
    match mode {
        Mode::Numeric => 30,
        Mode::Text => 18,
        Mode::Region1 | Mode::Region2 => 36,
        Mode::Double => 45,
        Mode::Binary | Mode::Four => 0,
    }
}

fn switch_cost(from: Mode, to: Mode) -> u32 {
    match (from, to) {
        // regions flip with a 12-bit sentinel, no terminator/indicator
        (Mode::Region1, Mode::Region2) | (Mode::Region2, Mode::Region1) => 36,
        _ => leave_cost(from) + enter_cost(to),
    }
}

/// A run of consecutive items in one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub mode: Mode,
    pub items: Vec<Item>,
}

/// Choose the cheapest mode per item by dynamic programming and collapse
/// the assignment into runs.
pub fn select_modes(items: &[Item], full_multibyte: bool) -> Vec<Run> {
    if items.is_empty() {
        return Vec::new();
    }
    const INF: u32 = u32::MAX / 2;
    let n = items.len();
    let mut cost = vec![[INF; 7]; n];
    let mut prev = vec![[0usize; 7]; n];

    for (m, &mode) in MODES.iter().enumerate() {
        if let Some(c) = item_cost(mode, items[0], full_multibyte) {
            cost[0][m] = enter_cost(mode) + c;
        }
    }
    for i in 1..n {
        for (m, &mode) in MODES.iter().enumerate() {
            let Some(c) = item_cost(mode, items[i], full_multibyte) else { continue };
            // incumbent first so ties keep the current mode
            let mut best = cost[i - 1][m];
            let mut best_p = m;
            for (p, &pmode) in MODES.iter().enumerate() {
                if p == m || cost[i - 1][p] >= INF {
                    continue;
                }
                let via = cost[i - 1][p] + switch_cost(pmode, mode);
                if via < best {
                    best = via;
                    best_p = p;
                }
            }
            if best < INF {
                cost[i][m] = best + c;
                prev[i][m] = best_p;
            }
        }
    }

    let mut end = 0;
    let mut end_cost = INF;
    for (m, &mode) in MODES.iter().enumerate() {
        if cost[n - 1][m] < INF && cost[n - 1][m] + leave_cost(mode) < end_cost {
            end_cost = cost[n - 1][m] + leave_cost(mode);
            end = m;
        }
    }

    let mut assignment = vec![0usize; n];
    let mut m = end;
    for i in (0..n).rev() {
        assignment[i] = m;
        m = prev[i][m];
    }

    let mut runs: Vec<Run> = Vec::new();
    for (i, &m) in assignment.iter().enumerate() {
        let mode = MODES[m];
        match runs.last_mut() {
            Some(run) if run.mode == mode && mode != Mode::Four => run.items.push(items[i]),
            _ => runs.push(Run { mode, items: vec![items[i]] }),
        }
    }
    runs
}

/// MSB-first bit accumulator for the codeword stream.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bits: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: u32, width: u8) {
        for i in (0..width).rev() {
            let bit = (value >> i) & 1;
            if self.bits % 8 == 0 {
                self.bytes.push(0);
            }
            if bit != 0 {
                let at = self.bits;
                *self.bytes.last_mut().unwrap() |= 1 << (7 - at % 8);
            }
            self.bits += 1;
        }
    }

    pub fn bit_len(&self) -> usize {
        self.bits
    }

    /// Zero-padded to a whole number of bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Emit the ECI switch codeword: UTF-8-style 8/16/24-bit value forms.
pub fn emit_eci(bw: &mut BitWriter, eci: u32) {
    bw.push(ECI_INDICATOR, 4);
    if eci < 128 {
        bw.push(eci, 8);
    } else if eci < 16384 {
        bw.push(0b10 << 14 | eci, 16);
    } else {
        bw.push(0b110 << 21 | eci, 24);
    }
}

fn eci_bits(eci: u32) -> usize {
    if eci < 128 {
        12
    } else if eci < 16384 {
        20
    } else {
        28
    }
}

fn emit_numeric(bw: &mut BitWriter, items: &[Item]) {
    bw.push(Mode::Numeric.indicator(), 4);
    let digits: Vec<u32> = items
        .iter()
        .map(|i| match i {
            Item::Byte(b) => (b - b'0') as u32,
            _ => unreachable!("numeric runs hold digits"),
        })
        .collect();
    let mut chunks = digits.chunks_exact(3);
    for c in &mut chunks {
        bw.push(c[0] * 100 + c[1] * 10 + c[2], 10);
    }
    match chunks.remainder() {
        [] => {}
        [d] => bw.push(*d, 4),
        [d, e] => bw.push(d * 10 + e, 7),
        _ => unreachable!(),
    }
    bw.push(0x3FF, 10);
}

fn emit_text(bw: &mut BitWriter, items: &[Item]) {
    bw.push(Mode::Text.indicator(), 4);
    let mut submode = 1u8;
    for item in items {
        let Item::Byte(b) = *item else { unreachable!("text runs hold bytes") };
        let (idx, wanted) = match (tables::text1_index(b), tables::text2_index(b)) {
            (Some(i), _) => (i, 1),
            (None, Some(i)) => (i, 2),
            (None, None) => unreachable!("eligibility checked by the DP"),
        };
        if submode != wanted {
            bw.push(TEXT_SWITCH as u32, 6);
            submode = wanted;
        }
        bw.push(idx as u32, 6);
    }
    bw.push(TEXT_TERMINATOR as u32, 6);
}

fn emit_binary(bw: &mut BitWriter, items: &[Item]) {
    bw.push(Mode::Binary.indicator(), 4);
    let mut bytes = Vec::new();
    for item in items {
        item.push_bytes(&mut bytes);
    }
    bw.push(bytes.len() as u32, 16);
    for b in bytes {
        bw.push(b as u32, 8);
    }
}

fn emit_double(bw: &mut BitWriter, items: &[Item]) {
    bw.push(Mode::Double.indicator(), 4);
    for item in items {
        let Item::Pair(p) = *item else { unreachable!("double runs hold pairs") };
        bw.push(double_index(p) as u32, 15);
    }
    bw.push(DOUBLE_TERMINATOR as u32, 15);
}

fn emit_four(bw: &mut BitWriter, items: &[Item]) {
    for item in items {
        let Item::Quad(q) = *item else { unreachable!("four-byte runs hold quads") };
        bw.push(Mode::Four.indicator(), 4);
        bw.push(quad_index(q), 21);
    }
}

/// Emit a maximal sequence of Region One/Two runs, flipping regions with
/// the 0xFFE sentinel, and return how many runs were consumed.
fn emit_region(bw: &mut BitWriter, runs: &[Run]) -> usize {
    let mut current = runs[0].mode;
    bw.push(current.indicator(), 4);
    let mut used = 0;
    for run in runs {
        if run.mode != Mode::Region1 && run.mode != Mode::Region2 {
            break;
        }
        if run.mode != current {
            bw.push(REGION_SWITCH as u32, 12);
            current = run.mode;
        }
        for item in &run.items {
            let Item::Pair(p) = *item else { unreachable!("region runs hold pairs") };
            let idx = if current == Mode::Region1 { region1_index(p) } else { region2_index(p) };
            bw.push(idx as u32, 12);
        }
        used += 1;
    }
    bw.push(REGION_TERMINATOR as u32, 12);
    used
}

/// Emit all runs into the writer.
pub fn emit_runs(bw: &mut BitWriter, runs: &[Run]) {
    let mut i = 0;
    while i < runs.len() {
        let run = &runs[i];
        match run.mode {
            Mode::Numeric => emit_numeric(bw, &run.items),
            Mode::Text => emit_text(bw, &run.items),
            Mode::Binary => emit_binary(bw, &run.items),
            Mode::Double => emit_double(bw, &run.items),
            Mode::Four => emit_four(bw, &run.items),
            Mode::Region1 | Mode::Region2 => {
                i += emit_region(bw, &runs[i..]);
                continue;
            }
        }
        i += 1;
    }
}

/// Capacity estimate in bits for version selection. A partial numeric
/// group is charged as a full 10-bit group here, which keeps the
/// documented capacity boundaries; the emitted tail is shorter.
pub fn estimate_bits(runs: &[Run], eci: Option<u32>) -> usize {
    let mut bits = eci.map(eci_bits).unwrap_or(0);
    let mut i = 0;
    while i < runs.len() {
        let run = &runs[i];
        match run.mode {
            Mode::Numeric => {
                bits += 4 + 10 * run.items.len().div_ceil(3) + 10;
            }
            Mode::Text => {
                let mut submode = 1u8;
                bits += 4 + 6;
                for item in &run.items {
                    let Item::Byte(b) = *item else { unreachable!() };
                    let wanted = if tables::text1_index(b).is_some() { 1 } else { 2 };
                    if wanted != submode {
                        bits += 6;
                        submode = wanted;
                    }
                    bits += 6;
                }
            }
            Mode::Binary => {
                let len: usize = run.items.iter().map(|i| i.len()).sum();
                bits += 4 + 16 + 8 * len;
            }
            Mode::Double => bits += 4 + 15 * run.items.len() + 15,
            Mode::Four => bits += 25 * run.items.len(),
            Mode::Region1 | Mode::Region2 => {
                bits += 4 + 12; // indicator + terminator
                let mut current = run.mode;
                for r in &runs[i..] {
                    if r.mode != Mode::Region1 && r.mode != Mode::Region2 {
                        break;
                    }
                    if r.mode != current {
                        bits += 12;
                        current = r.mode;
                    }
                    bits += 12 * r.items.len();
                    i += 1;
                }
                continue;
            }
        }
        i += 1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_run_mode(bytes: &[u8], grouped: bool, fm: bool) -> Vec<(Mode, usize)> {
        let items = group(bytes, grouped);
        select_modes(&items, fm)
            .into_iter()
            .map(|r| (r.mode, r.items.len()))
            .collect()
    }

    #[test]
    fn test_digits_pick_numeric() {
        assert_eq!(single_run_mode(b"12345", false, false), vec![(Mode::Numeric, 5)]);
    }

    #[test]
    fn test_latin1_byte_picks_binary() {
        assert_eq!(single_run_mode(&[0xE9], false, false), vec![(Mode::Binary, 1)]);
    }

    #[test]
    fn test_text_run() {
        assert_eq!(single_run_mode(b"AB-CD", false, false), vec![(Mode::Text, 5)]);
    }

    #[test]
    fn test_region_one_pair() {
        // U+554A GB 0xB0A1, first Region One character
        assert_eq!(single_run_mode(&[0xB0, 0xA1], true, false), vec![(Mode::Region1, 1)]);
        assert_eq!(region1_index([0xB0, 0xA1]), 0);
    }

    #[test]
    fn test_symbol_row_pair_needs_full_multibyte() {
        // U+03B2 GB 0xA6C2 sits in the GB 2312 symbol rows
        assert_eq!(single_run_mode(&[0xA6, 0xC2], true, false), vec![(Mode::Binary, 1)]);
        assert_eq!(single_run_mode(&[0xA6, 0xC2], true, true), vec![(Mode::Double, 1)]);
    }

    #[test]
    fn test_quad_picks_four_byte() {
        // U+0080 -> 81 30 81 30, index 0
        let runs = single_run_mode(&[0x81, 0x30, 0x81, 0x30], true, false);
        assert_eq!(runs, vec![(Mode::Four, 1)]);
        assert_eq!(quad_index([0x81, 0x30, 0x81, 0x30]), 0);
    }

    #[test]
    fn test_double_index_skips_7f() {
        assert_eq!(double_index([0x81, 0x40]), 0);
        assert_eq!(double_index([0x81, 0x7E]), 0x3E);
        assert_eq!(double_index([0x81, 0x80]), 0x3F);
        assert_eq!(double_index([0x82, 0x40]), 190);
    }

    #[test]
    fn test_binary_emission_latin1() {
        // 0011 | count=1 (16 bits) | 0xE9 -> 30 00 1E 90
        let items = group(&[0xE9], false);
        let runs = select_modes(&items, false);
        let mut bw = BitWriter::new();
        emit_runs(&mut bw, &runs);
        assert_eq!(bw.bit_len(), 28);
        assert_eq!(bw.into_bytes(), vec![0x30, 0x00, 0x1E, 0x90]);
    }

    #[test]
    fn test_numeric_emission_exact_group() {
        // 0001 | 123 | terminator -> 0001 0001111011 1111111111 (24 bits)
        let items = group(b"123", false);
        let runs = select_modes(&items, false);
        let mut bw = BitWriter::new();
        emit_runs(&mut bw, &runs);
        assert_eq!(bw.bit_len(), 24);
        assert_eq!(bw.into_bytes(), vec![0b0001_0001, 0b1110_1111, 0b1111_1111]);
    }

    #[test]
    fn test_numeric_estimate_charges_full_tail_group() {
        let items = group(b"1234", false);
        let runs = select_modes(&items, false);
        // estimate: 4 + 2*10 + 10 = 34; emitted: 4 + 10 + 4 + 10 = 28
        assert_eq!(estimate_bits(&runs, None), 34);
        let mut bw = BitWriter::new();
        emit_runs(&mut bw, &runs);
        assert_eq!(bw.bit_len(), 28);
    }

    #[test]
    fn test_eci_forms() {
        let mut bw = BitWriter::new();
        emit_eci(&mut bw, 3);
        assert_eq!(bw.bit_len(), 12);
        assert_eq!(bw.into_bytes(), vec![0x80, 0x30]);

        let mut bw = BitWriter::new();
        emit_eci(&mut bw, 899);
        assert_eq!(bw.bit_len(), 20);

        let mut bw = BitWriter::new();
        emit_eci(&mut bw, 16364);
        assert_eq!(bw.bit_len(), 20);

        let mut bw = BitWriter::new();
        emit_eci(&mut bw, 999_999);
        assert_eq!(bw.bit_len(), 28);
    }

    #[test]
    fn test_region_switch_merges_runs() {
        // Region One then Region Two pair: one indicator, one 0xFFE flip
        let items = vec![Item::Pair([0xB0, 0xA1]), Item::Pair([0xD8, 0xA1])];
        let runs = select_modes(&items, false);
        assert_eq!(runs.len(), 2);
        let mut bw = BitWriter::new();
        emit_runs(&mut bw, &runs);
        // 4 + 12 + 12 + 12 + 12 = 52 bits
        assert_eq!(bw.bit_len(), 52);
        assert_eq!(estimate_bits(&runs, None), 52);
    }

    #[test]
    fn test_ties_prefer_incumbent_mode() {
        // "A1A" with a lone digit: staying in text beats a numeric detour
        assert_eq!(single_run_mode(b"A1A", false, false), vec![(Mode::Text, 3)]);
    }
}
