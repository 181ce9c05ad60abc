//! # Code 49 Encoder
//!
//! Stacked linear reference symbology: 2 to 8 rows of 70 modules. Data is
//! encoded as codewords 0..=48 (digits, upper case, seven punctuation
//! marks, two shifts, FNC1 and the numeric/pad character); lower case and
//! controls travel behind shift characters, and digit runs compact five
//! digits into three base-48 codewords.
//!
//! The starting encodation (alphanumeric or numeric) is not a data
//! codeword: it rides in the final row next to the Mod-2401 symbol check
//! word, so an all-digit symbol pays no latch. Rows 1..r-1 carry seven
//! payload codewords plus a weighted row check; payload capacity is
//! `7 * (rows - 1)`: 49 alphanumeric characters or 81 digits at the full
//! eight rows.

use crate::error::EncodeError;
use crate::input::InputToken;
use crate::matrix::Matrix;

/// Symbol width in modules: start (2) + 8 characters of 8 + stop (4).
pub const WIDTH: usize = 70;

/// Payload codewords per row; the eighth character is the row check.
const ROW_PAYLOAD: usize = 7;

/// Maximum payload codewords (8 rows).
const MAX_CODEWORDS: usize = ROW_PAYLOAD * 7;

const SHIFT1: u8 = 43;
const SHIFT2: u8 = 44;
const FNC1: u8 = 45;
const NUMERIC: u8 = 48; // doubles as the pad character

/// Start modes, encoded in the final row.
const START_ALPHA: u8 = 0;
const START_NUMERIC: u8 = 2;

/// Module patterns for codewords 0..=48: dark guard, six code bits, dark
/// guard.
const PATTERNS: [u8; 49] = [
    0x81, 0x83, 0x85, 0x87, 0x89, 0x8B, 0x8D, 0x8F, 0x91, 0x93, 0x95, 0x97, 0x99, 0x9B, 0x9D,
    0x9F, 0xA1, 0xA3, 0xA5, 0xA7, 0xA9, 0xAB, 0xAD, 0xAF, 0xB1, 0xB3, 0xB5, 0xB7, 0xB9, 0xBB,
    0xBD, 0xBF, 0xC1, 0xC3, 0xC5, 0xC7, 0xC9, 0xCB, 0xCD, 0xCF, 0xD1, 0xD3, 0xD5, 0xD7, 0xD9,
    0xDB, 0xDD, 0xDF, 0xE1,
];

/// Direct codes: digits, upper case and the seven base punctuation marks.
fn base_code(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'Z' => Some(b - b'A' + 10),
        b'-' => Some(36),
        b'.' => Some(37),
        b' ' => Some(38),
        b'$' => Some(39),
        b'/' => Some(40),
        b'+' => Some(41),
        b'%' => Some(42),
        _ => None,
    }
}

/// Shift-1 codes: controls then the remaining mid-range punctuation.
fn shift1_code(b: u8) -> Option<u8> {
    match b {
        0x00..=0x1F => Some(b),
        b'!' => Some(32),
        b'"' => Some(33),
        b'#' => Some(34),
        b'&' => Some(35),
        b'\'' => Some(36),
        b'(' => Some(37),
        b')' => Some(38),
        b'*' => Some(39),
        b',' => Some(40),
        b':' => Some(41),
        b';' => Some(42),
        b'<' => Some(43),
        b'=' => Some(44),
        b'>' => Some(45),
        b'?' => Some(46),
        b'@' => Some(47),
        _ => None,
    }
}

/// Shift-2 codes: lower case and the high punctuation, DEL included.
fn shift2_code(b: u8) -> Option<u8> {
    match b {
        b'a'..=b'z' => Some(b - b'a' + 10),
        b'[' => Some(36),
        b'\\' => Some(37),
        b']' => Some(38),
        b'^' => Some(39),
        b'_' => Some(40),
        b'`' => Some(41),
        b'{' => Some(42),
        b'|' => Some(43),
        b'}' => Some(44),
        b'~' => Some(45),
        0x7F => Some(46),
        _ => None,
    }
}

fn digit_run(data: &[u8], at: usize) -> usize {
    data[at..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Pack a digit group of length 3..=5 into base-48 codewords.
fn pack_digits(codes: &mut Vec<u8>, digits: &[u8]) {
    let value: u32 = digits.iter().fold(0, |acc, &d| acc * 10 + (d - b'0') as u32);
    match digits.len() {
        5 => {
            codes.push((value / 2304) as u8);
            codes.push((value / 48 % 48) as u8);
            codes.push((value % 48) as u8);
        }
        4 => {
            let value = value + 100_000;
            codes.push((value / 2304) as u8);
            codes.push((value / 48 % 48) as u8);
            codes.push((value % 48) as u8);
        }
        3 => {
            codes.push((value / 48) as u8);
            codes.push((value % 48) as u8);
        }
        _ => unreachable!("groups of 3..=5 only"),
    }
}

/// Emit one compacted digit run, splitting so no 1 or 2 digit group is
/// left behind a five-group.
fn pack_run(codes: &mut Vec<u8>, data: &[u8], at: usize, run: usize) {
    let mut i = at;
    let mut left = run;
    while left >= 5 {
        let take = match left {
            6 => 3,
            7 => 4,
            _ => 5,
        };
        pack_digits(codes, &data[i..i + take]);
        i += take;
        left -= take;
    }
    if left >= 3 {
        pack_digits(codes, &data[i..i + left]);
    } else {
        for k in 0..left {
            codes.push(data[i + k] - b'0');
        }
    }
}

/// Convert input tokens into `(start_mode, payload codewords)`.
fn codewords(tokens: &[InputToken], gs1: bool) -> Result<(u8, Vec<u8>), EncodeError> {
    let mut data = Vec::with_capacity(tokens.len());
    for t in tokens {
        match t {
            InputToken::Byte(b) => data.push(*b),
            InputToken::Fnc(1) => data.push(0x1D), // FNC1 rides the GS slot
            InputToken::Fnc(_) => {
                return Err(EncodeError::invalid_data(431, "Invalid character in input data"));
            }
        }
    }
    if data.iter().any(|&b| b >= 0x80) {
        return Err(EncodeError::invalid_data(431, "Invalid character in input data"));
    }
    // a symbol opening with a long digit run starts latched into numeric
    let start_mode = if !gs1 && digit_run(&data, 0) >= 5 { START_NUMERIC } else { START_ALPHA };

    let mut codes = Vec::with_capacity(data.len());
    if gs1 {
        codes.push(FNC1);
    }
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        if b == 0x1D {
            codes.push(FNC1);
            i += 1;
            continue;
        }
        let run = digit_run(&data, i);
        if run >= 5 {
            let latched_start = i == 0 && start_mode == START_NUMERIC;
            if !latched_start {
                codes.push(NUMERIC);
            }
            pack_run(&mut codes, &data, i, run);
            i += run;
            if i < data.len() {
                codes.push(NUMERIC); // return to alphanumeric
            }
            continue;
        }
        if let Some(c) = base_code(b) {
            codes.push(c);
        } else if let Some(c) = shift1_code(b) {
            codes.push(SHIFT1);
            codes.push(c);
        } else if let Some(c) = shift2_code(b) {
            codes.push(SHIFT2);
            codes.push(c);
        } else {
            return Err(EncodeError::invalid_data(431, "Invalid character in input data"));
        }
        i += 1;
    }
    Ok((start_mode, codes))
}

fn row_check(payload: &[u8]) -> u8 {
    let sum: u32 = payload.iter().enumerate().map(|(i, &c)| (i as u32 + 1) * c as u32).sum();
    (sum % 49) as u8
}

fn draw_row(matrix: &mut Matrix, chars: &[u8; 8]) {
    let mut modules = Vec::with_capacity(WIDTH);
    modules.extend([true, false]); // start
    for &c in chars {
        let p = PATTERNS[c as usize];
        for bit in (0..8).rev() {
            modules.push(p & (1 << bit) != 0);
        }
    }
    modules.extend([true, true, true, true]); // stop
    matrix.push_row(&modules);
}

/// Encode tokens into a stacked Code 49 matrix.
pub fn encode(tokens: &[InputToken], gs1: bool) -> Result<Matrix, EncodeError> {
    let (start_mode, mut codes) = codewords(tokens, gs1)?;
    if codes.len() > MAX_CODEWORDS {
        return Err(EncodeError::too_long(
            430,
            format!("Input too long, requires {} codewords (maximum {MAX_CODEWORDS})", codes.len()),
        ));
    }
    let data_rows = codes.len().div_ceil(ROW_PAYLOAD).max(1);
    codes.resize(data_rows * ROW_PAYLOAD, NUMERIC); // pad

    // symbol check over all payload codewords, mod 2401
    let check: u32 = codes
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as u32 + 1) * c as u32 % 2401)
        .sum::<u32>()
        % 2401;

    let mut matrix = Matrix::with_width(WIDTH);
    for r in 0..data_rows {
        let payload = &codes[r * ROW_PAYLOAD..(r + 1) * ROW_PAYLOAD];
        let mut chars = [0u8; 8];
        chars[..ROW_PAYLOAD].copy_from_slice(payload);
        chars[7] = row_check(payload);
        draw_row(&mut matrix, &chars);
    }
    let mut last = [NUMERIC; 8];
    last[0] = start_mode;
    last[1] = (check / 49) as u8;
    last[2] = (check % 49) as u8;
    last[7] = row_check(&last[..7]);
    draw_row(&mut matrix, &last);

    debug_assert_eq!(matrix.rows(), data_rows + 1);
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(data: &[u8]) -> Vec<InputToken> {
        data.iter().map(|&b| InputToken::Byte(b)).collect()
    }

    #[test]
    fn test_minimal_symbol() {
        let m = encode(&bytes(b"12345"), false).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.width(), 70);
    }

    #[test]
    fn test_capacity_boundaries() {
        // ANSI/AIM BC6 Table 1: 49 alphanumeric, 81 numeric
        let m = encode(&bytes(&[b'A'; 49]), false).unwrap();
        assert_eq!((m.rows(), m.width()), (8, 70));
        let err = encode(&bytes(&[b'A'; 50]), false).unwrap_err();
        assert_eq!(err.code, 430);
        assert_eq!(err.status(), 5);

        let m = encode(&bytes(&[b'0'; 81]), false).unwrap();
        assert_eq!((m.rows(), m.width()), (8, 70));
        assert!(encode(&bytes(&[b'0'; 82]), false).is_err());
    }

    #[test]
    fn test_non_ascii_rejected() {
        let err = encode(&bytes("é".as_bytes()), false).unwrap_err();
        assert_eq!(err.to_string(), "Error 431: Invalid character in input data");
    }

    #[test]
    fn test_digit_packing() {
        // 12345 -> base 48: 5*2304 + 17*48 + 9, numeric start mode
        let (mode, codes) = codewords(&bytes(b"12345"), false).unwrap();
        assert_eq!(mode, START_NUMERIC);
        assert_eq!(codes, vec![5, 17, 9]);
        // 678 as a 3-digit tail: 14*48 + 6
        let (_, codes) = codewords(&bytes(b"12345678"), false).unwrap();
        assert_eq!(codes, vec![5, 17, 9, 14, 6]);
        // 4-digit tail carries the 100000 sentinel: 106789
        let (_, codes) = codewords(&bytes(b"123456789"), false).unwrap();
        assert_eq!(codes, vec![5, 17, 9, 46, 16, 37]);
    }

    #[test]
    fn test_seven_digits_split_four_three() {
        // 1234567 -> 1234 (+100000) then 567
        let (mode, codes) = codewords(&bytes(b"1234567"), false).unwrap();
        assert_eq!(mode, START_NUMERIC);
        assert_eq!(codes, vec![43, 45, 2, 11, 39]);
    }

    #[test]
    fn test_mixed_content_latches() {
        // digits inside text need the explicit numeric latch and return
        let (mode, codes) = codewords(&bytes(b"A1234567A"), false).unwrap();
        assert_eq!(mode, START_ALPHA);
        assert_eq!(codes, vec![10, NUMERIC, 43, 45, 2, 11, 39, NUMERIC, 10]);
    }

    #[test]
    fn test_shifts() {
        let (_, codes) = codewords(&bytes(b"ab"), false).unwrap();
        assert_eq!(codes, vec![SHIFT2, 10, SHIFT2, 11]);
        let (_, codes) = codewords(&bytes(b"\x1fA"), false).unwrap();
        assert_eq!(codes, vec![SHIFT1, 0x1F, 10]);
    }

    #[test]
    fn test_gs1_prefixes_fnc1() {
        let (mode, codes) = codewords(&bytes(b"901234567"), true).unwrap();
        assert_eq!(mode, START_ALPHA);
        assert_eq!(codes[0], FNC1);
        assert_eq!(codes[1], NUMERIC);
    }

    #[test]
    fn test_rows_scale_with_length() {
        for (len, rows) in [(7usize, 2usize), (8, 3), (14, 3), (15, 4), (49, 8)] {
            let m = encode(&bytes(&vec![b'A'; len]), false).unwrap();
            assert_eq!(m.rows(), rows, "len {len}");
        }
    }

    #[test]
    fn test_deterministic() {
        let a = encode(&bytes(b"EXAMPLE 2"), false).unwrap();
        let b = encode(&bytes(b"EXAMPLE 2"), false).unwrap();
        assert_eq!(a, b);
    }
}
