//! # ECI Registry and Segment Planner
//!
//! Extended Channel Interpretation support: maps ECI numbers to character
//! encodings, converts Unicode input to the declared charset, and validates
//! multi-segment input plans.
//!
//! ## Supported ECIs
//!
//! | ECI | Charset | ECI | Charset |
//! |-----|---------|-----|---------|
//! | 0/3 | ISO 8859-1 | 24 | Windows-1256 |
//! | 4–18 | ISO 8859-2…16 | 25/33 | UTF-16BE/LE |
//! | 20 | Shift JIS | 26 | UTF-8 |
//! | 21–23 | Windows-1250/1/2 | 27/170 | ASCII |
//! | 28 | Big5 | 29/31 | GB 2312 / GBK |
//! | 30 | EUC-KR | 32 | GB 18030 |
//! | 34/35 | UTF-32BE/LE | 899 | 8-bit binary |
//!
//! Single-byte ISO sets without an exact `encoding_rs` table (8859-9,
//! 8859-11) use their Windows supersets, which agree on every allocated
//! code point.

use encoding_rs::Encoding;

use crate::error::{Diagnostic, EncodeError, Warning, WarnKind};

/// Maximum number of segments accepted by `encode_segs`.
pub const MAX_SEGMENTS: usize = 256;

/// Maximum total input bytes across all segments.
pub const MAX_DATA_LEN: usize = 39_000;

/// One ECI-tagged run of input. `eci` 0 means "none declared".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub eci: u32,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(eci: u32, data: impl Into<Vec<u8>>) -> Self {
        Segment { eci, data: data.into() }
    }
}

/// True if the ECI names a charset this library can transcode into.
pub fn is_convertible(eci: u32) -> bool {
    matches!(
        eci,
        0 | 3..=18 | 20..=35 | 170 | 899
    ) && eci != 14 && eci != 19
}

fn table(eci: u32) -> Option<&'static Encoding> {
    use encoding_rs::*;
    Some(match eci {
        4 => ISO_8859_2,
        5 => ISO_8859_3,
        6 => ISO_8859_4,
        7 => ISO_8859_5,
        8 => ISO_8859_6,
        9 => ISO_8859_7,
        10 => ISO_8859_8,
        11 => WINDOWS_1254, // ISO 8859-9 superset
        12 => ISO_8859_10,
        13 => WINDOWS_874, // ISO 8859-11 superset
        15 => ISO_8859_13,
        16 => ISO_8859_14,
        17 => ISO_8859_15,
        18 => ISO_8859_16,
        20 => SHIFT_JIS,
        21 => WINDOWS_1250,
        22 => WINDOWS_1251,
        23 => WINDOWS_1252,
        24 => WINDOWS_1256,
        28 => BIG5,
        29 => GBK, // GB 2312 carried by its GBK superset
        31 => GBK,
        32 => GB18030,
        30 => EUC_KR,
        _ => return None,
    })
}

/// Convert Unicode text to the byte encoding named by `eci`.
///
/// Returns `None` when some character has no representation in that
/// charset; callers turn this into error 545.
pub fn encode_text(eci: u32, text: &str) -> Option<Vec<u8>> {
    match eci {
        0 | 3 => {
            let mut out = Vec::with_capacity(text.len());
            for c in text.chars() {
                let v = c as u32;
                if v >= 0x100 {
                    return None;
                }
                out.push(v as u8);
            }
            Some(out)
        }
        26 => Some(text.as_bytes().to_vec()),
        27 | 170 => {
            if text.is_ascii() {
                Some(text.as_bytes().to_vec())
            } else {
                None
            }
        }
        25 | 33 => {
            let mut out = Vec::with_capacity(text.len() * 2);
            for u in text.encode_utf16() {
                let b = u.to_be_bytes();
                if eci == 25 {
                    out.extend_from_slice(&b);
                } else {
                    out.extend_from_slice(&[b[1], b[0]]);
                }
            }
            Some(out)
        }
        34 | 35 => {
            let mut out = Vec::with_capacity(text.len() * 4);
            for c in text.chars() {
                let b = (c as u32).to_be_bytes();
                if eci == 34 {
                    out.extend_from_slice(&b);
                } else {
                    out.extend_from_slice(&[b[3], b[2], b[1], b[0]]);
                }
            }
            Some(out)
        }
        899 => Some(text.as_bytes().to_vec()),
        _ => {
            let enc = table(eci)?;
            let (bytes, _, had_unmappable) = enc.encode(text);
            if had_unmappable {
                None
            } else {
                Some(bytes.into_owned())
            }
        }
    }
}

/// Validate UTF-8 input (UNICODE mode) into a `str`.
pub fn to_unicode(data: &[u8]) -> Result<&str, EncodeError> {
    std::str::from_utf8(data)
        .map_err(|_| EncodeError::invalid_data(245, "Invalid UTF-8 in input data"))
}

/// Latin-1 bytes for `text`, if every character fits.
pub fn latin1(text: &str) -> Option<Vec<u8>> {
    encode_text(3, text)
}

/// A validated multi-segment plan.
#[derive(Debug, Clone)]
pub struct Plan {
    pub segments: Vec<Segment>,
    pub diagnostic: Diagnostic,
}

/// Validate segment count, total length and the ECI sequence.
///
/// `multi_segment` is false for symbologies that only take one segment
/// (everything here except Han Xin).
pub fn plan(segments: &[Segment], multi_segment: bool) -> Result<Plan, EncodeError> {
    if segments.is_empty() {
        return Err(EncodeError::invalid_data(228, "No input data"));
    }
    if segments.len() > 1 && !multi_segment {
        return Err(EncodeError::invalid_option(775, "Symbology does not support multiple segments"));
    }
    if segments.len() > MAX_SEGMENTS {
        return Err(EncodeError::invalid_data(771, format!("Too many segments (maximum {MAX_SEGMENTS})")));
    }
    let total: usize = segments.iter().map(|s| s.data.len()).sum();
    if total > MAX_DATA_LEN {
        return Err(EncodeError::too_long(772, format!("Input too long (maximum {MAX_DATA_LEN} bytes)")));
    }
    let mut diagnostic = Diagnostic::Clean;
    let mut out = Vec::with_capacity(segments.len());
    let mut prev_eci: Option<u32> = None;
    for (idx, seg) in segments.iter().enumerate() {
        if seg.data.is_empty() {
            if segments.len() == 1 {
                return Err(EncodeError::invalid_data(228, "No input data"));
            }
            return Err(EncodeError::invalid_data(773, format!("Segment {idx} empty")));
        }
        let mut eci = seg.eci;
        if eci == 1 || eci == 2 || eci == 14 || eci == 19 || eci > 999_999 {
            return Err(EncodeError::invalid_option(218, format!("Invalid ECI code {eci}")));
        }
        if idx > 0 && eci == 0 {
            // A trailing untagged segment narrows to UTF-8 so the switch
            // stays representable in the stream.
            eci = 26;
            diagnostic.merge(Warning::new(WarnKind::UsesEci, 222, "Converted to ECI 26"));
        }
        if let Some(prev) = prev_eci {
            if idx > 0 && eci == prev {
                return Err(EncodeError::invalid_option(776, "Segment ECIs must be consecutive (repeated ECI)"));
            }
        }
        prev_eci = Some(eci);
        out.push(Segment { eci, data: seg.data.clone() });
    }
    Ok(Plan { segments: out, diagnostic })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_conversion() {
        assert_eq!(encode_text(3, "é"), Some(vec![0xE9]));
        assert_eq!(encode_text(3, "β"), None);
    }

    #[test]
    fn test_iso_8859_7_greek() {
        assert_eq!(encode_text(9, "β"), Some(vec![0xE2]));
    }

    #[test]
    fn test_gb18030() {
        // U+00E9 é -> 0xA8A6 in GB 18030
        assert_eq!(encode_text(32, "é"), Some(vec![0xA8, 0xA6]));
        // U+0080 -> 4-byte sequence 81 30 81 30
        assert_eq!(encode_text(32, "\u{0080}"), Some(vec![0x81, 0x30, 0x81, 0x30]));
    }

    #[test]
    fn test_utf16be() {
        assert_eq!(encode_text(25, "ကA"), Some(vec![0x10, 0x00, 0x00, 0x41]));
    }

    #[test]
    fn test_plan_rejects_multi_for_linear() {
        let segs = vec![Segment::new(3, "a"), Segment::new(7, "b")];
        let err = plan(&segs, false).unwrap_err();
        assert_eq!(err.code, 775);
    }

    #[test]
    fn test_plan_rejects_repeated_eci() {
        let segs = vec![Segment::new(3, "a"), Segment::new(3, "b")];
        let err = plan(&segs, true).unwrap_err();
        assert_eq!(err.code, 776);
    }

    #[test]
    fn test_plan_narrows_untagged_followup() {
        let segs = vec![Segment::new(3, "a"), Segment::new(0, "b")];
        let p = plan(&segs, true).unwrap();
        assert_eq!(p.segments[1].eci, 26);
        assert_eq!(p.diagnostic.warning().unwrap().code, 222);
    }
}
