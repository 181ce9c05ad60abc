//! # Composite Driver
//!
//! Binds a GS1-128 linear component to a MicroPDF417-derived 2-D
//! composite stack carrying additional GS1 data. The linear payload comes
//! from the symbol's `primary` field, the 2-D payload from the encode
//! data; both pass through the GS1 parser and any failure is tagged with
//! the component it came from.
//!
//! The composite stack packs the reduced 2-D data into base-900
//! codewords, appends GF(929) Reed-Solomon check codewords and lays the
//! stream out over 4 rows (5 when the data codewords exceed 20), each
//! codeword 10 modules wide, above a separator row and the linear row.

use crate::code128;
use crate::error::{Diagnostic, EncodeError};
use crate::gs1::{self, Gs1Options};
use crate::matrix::Matrix;

/// Check codewords appended to every composite stack.
const ECC_CODEWORDS: usize = 8;

/// Codeword threshold separating 4-row from 5-row stacks.
const FOUR_ROW_LIMIT: usize = 20;

/// Most codewords a stack can carry (5 rows of 30).
const MAX_CODEWORDS: usize = 150;

/// Horizontal offset of the stack relative to the linear component.
const STACK_OFFSET: usize = 2;

/// Reed-Solomon over the prime field GF(929), generator element 3, as
/// used by the PDF417 family. Check codewords are the negated remainder.
fn rs929(data: &[u16], nsym: usize) -> Vec<u16> {
    let mut genp = vec![0u32; nsym + 1];
    genp[0] = 1;
    let mut root: u32 = 1;
    for i in 0..nsym {
        root = root * 3 % 929;
        for j in (1..=i + 1).rev() {
            genp[j] = (genp[j - 1] + genp[j] * (929 - root)) % 929;
        }
        genp[0] = genp[0] * (929 - root) % 929;
    }
    let mut rem = vec![0u32; nsym];
    for &d in data {
        let factor = (d as u32 + rem[nsym - 1]) % 929;
        for j in (1..nsym).rev() {
            rem[j] = (rem[j - 1] + 929 - factor * genp[j] % 929) % 929;
        }
        rem[0] = (929 - factor * genp[0] % 929) % 929;
    }
    rem.iter().rev().map(|&r| ((929 - r) % 929) as u16).collect()
}

/// Byte compaction: six bytes to five base-900 codewords, remainder
/// bytes one to one, with a leading byte-count codeword.
fn pack_codewords(reduced: &[u8]) -> Vec<u16> {
    let mut out = vec![reduced.len() as u16 % 900];
    let mut chunks = reduced.chunks_exact(6);
    for c in &mut chunks {
        let mut v: u64 = 0;
        for &b in c {
            v = v << 8 | b as u64;
        }
        let mut group = [0u16; 5];
        for slot in group.iter_mut().rev() {
            *slot = (v % 900) as u16;
            v /= 900;
        }
        out.extend_from_slice(&group);
    }
    out.extend(chunks.remainder().iter().map(|&b| b as u16));
    out
}

/// Reduced 2-D data must stay within CSET 82 plus the GS separator, even
/// when lint checks are suppressed.
fn check_2d_charset(reduced: &[u8]) -> Result<(), EncodeError> {
    use crate::gs1::table::Cset;
    for &b in reduced {
        if b != gs1::GS && !Cset::Cset82.contains(b) {
            return Err(EncodeError::invalid_data(441, "Invalid character in 2D component"));
        }
    }
    Ok(())
}

/// Build the composite stack matrix for reduced GS1 bytes.
fn encode_stack(reduced: &[u8]) -> Result<Matrix, EncodeError> {
    let mut codewords = pack_codewords(reduced);
    if codewords.len() + ECC_CODEWORDS > MAX_CODEWORDS {
        return Err(EncodeError::too_long(
            448,
            format!(
                "Input too long, requires {} codewords (maximum {})",
                codewords.len() + ECC_CODEWORDS,
                MAX_CODEWORDS
            ),
        ));
    }
    let checks = rs929(&codewords, ECC_CODEWORDS);
    codewords.extend(checks);

    let rows = if codewords.len() <= FOUR_ROW_LIMIT { 4 } else { 5 };
    let cols = codewords.len().div_ceil(rows);
    let width = cols * 10;
    let mut matrix = Matrix::with_width(width);
    for r in 0..rows {
        let mut modules = vec![false; width];
        for c in 0..cols {
            let Some(&cw) = codewords.get(r * cols + c) else { break };
            for bit in 0..10 {
                modules[c * 10 + bit] = cw & (1 << (9 - bit)) != 0;
            }
        }
        matrix.push_row(&modules);
    }
    Ok(matrix)
}

/// Result of a composite encode: the combined matrix and the linear HRT.
#[derive(Debug)]
pub struct CompositeOutput {
    pub matrix: Matrix,
    pub hrt: String,
    pub diagnostic: Diagnostic,
}

/// Encode `primary` (linear GS1) plus `data` (2-D GS1) into one symbol.
pub fn encode(primary: &[u8], data: &[u8], opts: &Gs1Options) -> Result<CompositeOutput, EncodeError> {
    if primary.is_empty() {
        return Err(EncodeError::invalid_data(445, "No primary (linear component)"));
    }
    let mut diagnostic = Diagnostic::Clean;

    let linear = gs1::verify(primary, opts).map_err(|e| e.in_component(" in linear component"))?;
    if let Some(w) = linear.diagnostic.warning() {
        let mut w = w.clone();
        w.message.push_str(" in linear component");
        diagnostic.merge(w);
    }
    let linear_matrix = code128::encode(&linear.reduced)
        .map_err(|e| e.in_component(" in linear component"))?;

    let twod = gs1::verify(data, opts).map_err(|e| e.in_component(" in 2D component"))?;
    if let Some(w) = twod.diagnostic.warning() {
        let mut w = w.clone();
        w.message.push_str(" in 2D component");
        diagnostic.merge(w);
    }
    check_2d_charset(&twod.reduced)?;
    let stack = encode_stack(&twod.reduced).map_err(|e| e.in_component(" in 2D component"))?;

    // stack above, separator row, linear row(s) below
    let width = linear_matrix.width().max(stack.width() + STACK_OFFSET);
    let mut matrix = Matrix::with_width(width);
    for r in 0..stack.rows() {
        let mut modules = vec![false; width];
        for c in 0..stack.width() {
            modules[STACK_OFFSET + c] = stack.get(r, c);
        }
        matrix.push_row(&modules);
    }
    let separator: Vec<bool> = (0..width).map(|c| c % 2 == 0).collect();
    matrix.push_row(&separator);
    for r in 0..linear_matrix.rows() {
        let mut modules = vec![false; width];
        for c in 0..linear_matrix.width() {
            modules[c] = linear_matrix.get(r, c);
        }
        matrix.push_row(&modules);
    }

    Ok(CompositeOutput { matrix, hrt: linear.hrt, diagnostic })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WarnKind;

    fn opts() -> Gs1Options {
        Gs1Options::default()
    }

    #[test]
    fn test_basic_composite() {
        let out = encode(b"[01]12345678901231", b"[21]1234", &opts()).unwrap();
        // 4 stack rows + separator + 1 linear row
        assert_eq!(out.matrix.rows(), 6);
        assert_eq!(out.hrt, "(01)12345678901231");
        assert_eq!(out.diagnostic, Diagnostic::Clean);
    }

    #[test]
    fn test_linear_warning_tagged() {
        let out = encode(b"[01]12345678901234", b"[20]12", &opts()).unwrap();
        let w = out.diagnostic.warning().unwrap();
        assert_eq!(w.kind, WarnKind::NonCompliant);
        assert_eq!(
            w.errtxt(),
            "Warning 261: AI (01) position 14: Bad checksum '4', expected '1' in linear component"
        );
    }

    #[test]
    fn test_2d_warning_tagged() {
        let out = encode(b"[01]12345678901231", b"[20]1A", &opts()).unwrap();
        let w = out.diagnostic.warning().unwrap();
        assert_eq!(
            w.errtxt(),
            "Warning 261: AI (20) position 2: Non-numeric character 'A' in 2D component"
        );
    }

    #[test]
    fn test_errors_tagged_per_component() {
        let err = encode(b"[01]123456789012345", b"[20]12", &opts()).unwrap_err();
        assert_eq!(err.to_string(), "Error 259: Invalid data length for AI (01) in linear component");

        let err = encode(b"[01]12345678901231", b"[20]123", &opts()).unwrap_err();
        assert_eq!(err.to_string(), "Error 259: Invalid data length for AI (20) in 2D component");

        let err = encode(b"[01]12345678901231", b"[20]1\x7f", &opts()).unwrap_err();
        assert_eq!(err.to_string(), "Error 263: DEL characters are not supported by GS1 in 2D component");
    }

    #[test]
    fn test_five_row_stack() {
        // enough 2-D data to push past the 4-row limit
        let out = encode(b"[01]12345678901231", b"[91]ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ", &opts()).unwrap();
        assert_eq!(out.matrix.rows(), 7);
    }

    #[test]
    fn test_rs929_roundtrip_property() {
        // check symbols make the codeword polynomial vanish at 3^i
        let data = vec![100u16, 200, 300, 400, 500];
        let checks = rs929(&data, 8);
        let mut cw = data.clone();
        cw.extend(&checks);
        let mut root: u64 = 1;
        for _ in 0..8 {
            root = root * 3 % 929;
            let mut acc: u64 = 0;
            for &c in &cw {
                acc = (acc * root + c as u64) % 929;
            }
            assert_eq!(acc, 0, "syndrome at root {root}");
        }
    }

    #[test]
    fn test_missing_primary() {
        let err = encode(b"", b"[20]12", &opts()).unwrap_err();
        assert_eq!(err.code, 445);
    }
}
