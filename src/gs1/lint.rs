//! # GS1 Lint Rules
//!
//! Per-component validation rules referenced from the AI table. Every
//! failure becomes a `Warning 261` with the offending position (1-based,
//! relative to the whole AI data field) and a short description; the
//! structural layer upstream has already guaranteed the field's charset
//! class and length range.

/// Lint rule tags. Names follow the GS1 syntax-dictionary vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lint {
    /// Mod-10 checksum over the field, last digit is the check
    Csum,
    /// Mod-1271 alphanumeric check character pair (last two chars)
    CsumAlpha,
    /// Company-prefix key: leading digits must be numeric
    Key,
    /// Date YYMMDD where day 00 means "end of month"
    Yymmd0,
    /// Date YYMMDD, day 01..=31 strictly
    Yymmdd,
    /// Date YYYYMMDD with full leap handling
    Yyyymmdd,
    /// Hour 00..=23
    Hh,
    /// HHMM time of day
    HhMm,
    /// HHMMSS time of day
    HhMmSs,
    /// HH then optional MM then optional SS
    HhOptMmSs,
    /// ISO 3166-1 numeric country code
    Iso3166,
    /// Concatenation of 1..=5 ISO 3166-1 numeric codes
    Iso3166List,
    /// ISO 3166-1 numeric code or 999
    Iso3166999,
    /// ISO 3166-1 alpha-2 code
    Iso3166Alpha2,
    /// ISO 4217 numeric currency code
    Iso4217,
    /// Percent-encoding well-formedness
    PcEnc,
    /// 20-digit latitude/longitude pair
    LatLong,
    /// Single character 0 or 1
    YesNo,
    /// Importer index character
    ImporterIdx,
    /// Two-digit media type
    MediaType,
    /// ISO/IEC 5218 biological sex code
    Iso5218,
    /// Field must not be all zeros
    NonZero,
    /// Digit must be zero
    Zero,
    /// No leading zero
    NoZeroPrefix,
    /// Winding direction 0, 1 or 9
    Winding,
    /// PPTT piece/total, both non-zero, piece <= total
    PieceOfTotal,
    /// ISO 13616 IBAN: country code then MOD-97-10 check
    Iban,
    /// North American Coupon Code grammar
    CouponCode,
    /// Positive offer file coupon code
    CouponPosOffer,
    /// Hyphen placement: no leading, trailing or doubled hyphen
    Hyphen,
    /// "n/m" position in sequence, both non-zero, n <= m
    PosInSeqSlash,
    /// At least one non-digit required
    HasNonDigit,
}

/// A lint finding: 1-based position within the part plus a description.
pub type LintError = (usize, String);

/// GS1 mod-10 check digit for `digits` (everything before the check).
pub fn mod10_check(digits: &[u8]) -> u8 {
    let mut sum = 0u32;
    for (i, &d) in digits.iter().rev().enumerate() {
        let v = (d - b'0') as u32;
        sum += if i % 2 == 0 { v * 3 } else { v };
    }
    (b'0' + ((10 - sum % 10) % 10) as u8)
}

fn csum(data: &str) -> Result<(), LintError> {
    let bytes = data.as_bytes();
    if bytes.len() < 2 || !data.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(()); // numeric class already linted separately
    }
    let expected = mod10_check(&bytes[..bytes.len() - 1]);
    let got = bytes[bytes.len() - 1];
    if got != expected {
        return Err((
            bytes.len(),
            format!("Bad checksum '{}', expected '{}'", got as char, expected as char),
        ));
    }
    Ok(())
}

/// Alphanumeric value of a character for the mod-1271 check pair.
fn alnum_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'A'..=b'Z' => Some((b - b'A' + 10) as u32),
        b'a'..=b'z' => Some((b - b'a' + 10) as u32),
        _ => None,
    }
}

fn csum_alpha(data: &str) -> Result<(), LintError> {
    let bytes = data.as_bytes();
    if bytes.len() < 3 {
        return Ok(());
    }
    let body = &bytes[..bytes.len() - 2];
    let mut sum = 0u32;
    let mut weight = 2u32;
    for &b in body.iter().rev() {
        let Some(v) = alnum_value(b) else { continue };
        sum = (sum + v * weight) % 1271;
        weight = if weight >= 36 { 2 } else { weight + 2 };
    }
    const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let expected = [ALPHABET[(sum / 36) as usize], ALPHABET[(sum % 36) as usize]];
    let got = &bytes[bytes.len() - 2..];
    if got != expected {
        return Err((
            bytes.len() - 1,
            format!(
                "Bad checksum characters '{}{}', expected '{}{}'",
                got[0] as char, got[1] as char, expected[0] as char, expected[1] as char
            ),
        ));
    }
    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
            if leap { 29 } else { 28 }
        }
        _ => 0,
    }
}

fn two(data: &str, at: usize) -> u32 {
    data[at..at + 2].parse().unwrap_or(100)
}

fn date_yymmdd(data: &str, day0_ok: bool) -> Result<(), LintError> {
    if data.len() < 6 || !data.is_ascii() {
        return Ok(());
    }
    let (yy, mm, dd) = (two(data, 0), two(data, 2), two(data, 4));
    if yy > 99 {
        return Ok(());
    }
    // Two-digit years pivot into 2000..=2049 before wrapping back
    let year = if yy <= 49 { 2000 + yy } else { 1900 + yy };
    if mm == 0 || mm > 12 {
        return Err((3, format!("Invalid month '{}'", &data[2..4])));
    }
    if dd > days_in_month(year, mm) || (!day0_ok && dd == 0) {
        return Err((5, format!("Invalid day '{}'", &data[4..6])));
    }
    Ok(())
}

fn date_yyyymmdd(data: &str) -> Result<(), LintError> {
    if data.len() < 8 || !data.is_ascii() {
        return Ok(());
    }
    let year: u32 = data[0..4].parse().unwrap_or(0);
    let (mm, dd) = (two(data, 4), two(data, 6));
    if mm == 0 || mm > 12 {
        return Err((5, format!("Invalid month '{}'", &data[4..6])));
    }
    if dd == 0 || dd > days_in_month(year, mm) {
        return Err((7, format!("Invalid day '{}'", &data[6..8])));
    }
    Ok(())
}

fn hour(data: &str) -> Result<(), LintError> {
    if data.len() >= 2 && two(data, 0) > 23 {
        return Err((1, format!("Invalid hour '{}'", &data[0..2])));
    }
    Ok(())
}

fn minute(data: &str, at: usize) -> Result<(), LintError> {
    if data.len() >= at + 2 && two(data, at) > 59 {
        return Err((at + 1, format!("Invalid minute '{}'", &data[at..at + 2])));
    }
    Ok(())
}

fn second(data: &str, at: usize) -> Result<(), LintError> {
    if data.len() >= at + 2 && two(data, at) > 59 {
        return Err((at + 1, format!("Invalid second '{}'", &data[at..at + 2])));
    }
    Ok(())
}

/// ISO 3166-1 numeric codes (2024 edition).
const ISO3166_NUMERIC: &[u16] = &[
    4, 8, 10, 12, 16, 20, 24, 28, 31, 32, 36, 40, 44, 48, 50, 51, 52, 56, 60, 64, 68, 70, 72, 74,
    76, 84, 86, 90, 92, 96, 100, 104, 108, 112, 116, 120, 124, 132, 136, 140, 144, 148, 152, 156,
    158, 162, 166, 170, 174, 175, 178, 180, 184, 188, 191, 192, 196, 203, 204, 208, 212, 214, 218,
    222, 226, 231, 232, 233, 234, 238, 239, 242, 246, 248, 250, 254, 258, 260, 262, 266, 268, 270,
    275, 276, 288, 292, 296, 300, 304, 308, 312, 316, 320, 324, 328, 332, 334, 336, 340, 344, 348,
    352, 356, 360, 364, 368, 372, 376, 380, 384, 388, 392, 398, 400, 404, 408, 410, 414, 417, 418,
    422, 426, 428, 430, 434, 438, 440, 442, 446, 450, 454, 458, 462, 466, 470, 474, 478, 480, 484,
    492, 496, 498, 499, 500, 504, 508, 512, 516, 520, 524, 528, 531, 533, 534, 535, 540, 548, 554,
    558, 562, 566, 570, 574, 578, 580, 581, 583, 584, 585, 586, 591, 598, 600, 604, 608, 612, 616,
    620, 624, 626, 630, 634, 638, 642, 643, 646, 652, 654, 659, 660, 662, 663, 666, 670, 674, 678,
    682, 686, 688, 690, 694, 702, 703, 704, 705, 706, 710, 716, 724, 728, 729, 732, 740, 744, 748,
    752, 756, 760, 762, 764, 768, 772, 776, 780, 784, 788, 792, 795, 796, 798, 800, 804, 807, 818,
    826, 831, 832, 833, 834, 840, 850, 854, 858, 860, 862, 876, 882, 887, 894,
];

/// ISO 3166-1 alpha-2 codes (2024 edition).
const ISO3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// ISO 4217 numeric currency codes (2024 edition).
const ISO4217_NUMERIC: &[u16] = &[
    8, 12, 32, 36, 44, 48, 50, 51, 52, 60, 64, 68, 72, 84, 90, 96, 104, 108, 116, 124, 132, 136,
    144, 152, 156, 170, 174, 188, 191, 192, 203, 208, 214, 222, 230, 232, 238, 242, 262, 270, 292,
    320, 324, 328, 332, 340, 344, 348, 352, 356, 360, 364, 368, 376, 388, 392, 398, 400, 404, 408,
    410, 414, 417, 418, 422, 426, 430, 434, 446, 454, 458, 462, 480, 484, 496, 498, 504, 512, 516,
    524, 532, 533, 548, 554, 558, 566, 578, 586, 590, 598, 600, 604, 608, 634, 643, 646, 654, 678,
    682, 690, 694, 702, 704, 706, 710, 728, 748, 752, 756, 760, 764, 776, 780, 784, 788, 800, 807,
    818, 826, 834, 840, 858, 860, 882, 886, 901, 925, 926, 927, 928, 929, 930, 931, 932, 933, 934,
    936, 938, 940, 941, 943, 944, 946, 947, 948, 949, 950, 951, 952, 953, 955, 956, 957, 958, 959,
    960, 961, 962, 963, 964, 965, 967, 968, 969, 970, 971, 972, 973, 975, 976, 977, 978, 979, 980,
    981, 984, 985, 986, 990, 994, 997, 999,
];

fn country3(data: &str, at: usize) -> Result<(), LintError> {
    if data.len() < at + 3 {
        return Err((at + 1, "Not a whole number of country codes".to_string()));
    }
    let code: u16 = data[at..at + 3].parse().unwrap_or(1000);
    if ISO3166_NUMERIC.binary_search(&code).is_err() {
        return Err((at + 1, format!("Unknown country code '{}'", &data[at..at + 3])));
    }
    Ok(())
}

fn pcenc(data: &str) -> Result<(), LintError> {
    let bytes = data.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err((i + 1, "Invalid % escape".to_string()));
            }
            for j in [i + 1, i + 2] {
                if !bytes[j].is_ascii_hexdigit() {
                    return Err((j + 1, "Invalid character for percent encoding".to_string()));
                }
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn latlong(data: &str) -> Result<(), LintError> {
    if data.len() != 20 || !data.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    let lat: u64 = data[..10].parse().unwrap_or(u64::MAX);
    let long: u64 = data[10..].parse().unwrap_or(u64::MAX);
    if lat > 1_800_000_000 {
        return Err((10, "Invalid latitude".to_string()));
    }
    if long > 3_600_000_000 {
        return Err((20, "Invalid longitude".to_string()));
    }
    Ok(())
}

fn iban(data: &str) -> Result<(), LintError> {
    let bytes = data.as_bytes();
    if bytes.len() < 5 {
        return Err((1, "IBAN too short".to_string()));
    }
    let cc = &data[..2];
    if !bytes[0].is_ascii_uppercase() || !bytes[1].is_ascii_uppercase() {
        return Err((1, format!("Non-alphabetic IBAN country code '{cc}'")));
    }
    if ISO3166_ALPHA2.binary_search(&cc).is_err() {
        return Err((1, format!("Invalid IBAN country code '{cc}'")));
    }
    let check = &data[2..4];
    if !bytes[2].is_ascii_digit() || !bytes[3].is_ascii_digit() {
        return Err((3, format!("Non-numeric IBAN checksum '{check}'")));
    }
    for (i, &b) in bytes.iter().enumerate().skip(4) {
        if !b.is_ascii_digit() && !b.is_ascii_uppercase() {
            return Err((i + 1, format!("Invalid IBAN character '{}'", b as char)));
        }
    }
    // MOD 97-10 with the check digits zeroed gives the expected pair
    let mut rem: u32 = 0;
    let rotated = bytes[4..].iter().chain(bytes[..2].iter()).chain(b"00".iter());
    for &b in rotated {
        let v = match b {
            b'0'..=b'9' => (b - b'0') as u32,
            _ => (b - b'A' + 10) as u32,
        };
        rem = if v < 10 { (rem * 10 + v) % 97 } else { (rem * 100 + v) % 97 };
    }
    let expected = 98 - rem;
    let given = ((bytes[2] - b'0') * 10 + (bytes[3] - b'0')) as u32;
    if given != expected {
        return Err((3, format!("Bad IBAN checksum '{check}', expected '{expected:02}'")));
    }
    Ok(())
}

// North American Coupon Code field walk. VLI fields report "missing" when
// the data runs out, value fields report "incomplete" at the field start;
// fields whose finding names a character report it quoted at its own
// position, the rest report the field start unquoted.

fn coupon_vli(b: &[u8], p: &mut usize, name: &str, lo: u8, hi: u8, allow9: bool) -> Result<usize, LintError> {
    let Some(&c) = b.get(*p) else {
        return Err((*p + 1, format!("{name} missing")));
    };
    if !c.is_ascii_digit() {
        return Err((*p + 1, format!("Non-numeric {name} '{}'", c as char)));
    }
    let v = c - b'0';
    if (v < lo || v > hi) && !(allow9 && v == 9) {
        return Err((*p + 1, format!("Invalid {name} '{}'", c as char)));
    }
    *p += 1;
    Ok(v as usize)
}

fn coupon_code_digit(b: &[u8], p: &mut usize, name: &str, valid: &[u8]) -> Result<(), LintError> {
    let Some(&c) = b.get(*p) else {
        return Err((*p + 1, format!("{name} incomplete")));
    };
    if !c.is_ascii_digit() {
        return Err((*p + 1, format!("Non-numeric {name}")));
    }
    if !valid.contains(&c) {
        return Err((*p + 1, format!("Invalid {name} '{}'", c as char)));
    }
    *p += 1;
    Ok(())
}

fn coupon_field(b: &[u8], p: &mut usize, len: usize, name: &str, quoted: bool) -> Result<(), LintError> {
    let start = *p;
    if b.len() < start + len {
        return Err((start + 1, format!("{name} incomplete")));
    }
    for (i, &c) in b[start..start + len].iter().enumerate() {
        if !c.is_ascii_digit() {
            return if quoted {
                Err((start + i + 1, format!("Non-numeric {name} '{}'", c as char)))
            } else {
                Err((start + 1, format!("Non-numeric {name}")))
            };
        }
    }
    *p += len;
    Ok(())
}

fn coupon_date(data: &str, p: &mut usize, name: &str) -> Result<(), LintError> {
    let b = data.as_bytes();
    let start = *p;
    if b.len() < start + 6 {
        return Err((start + 1, format!("{name} incomplete")));
    }
    if b[start..start + 6].iter().any(|c| !c.is_ascii_digit()) {
        return Err((start + 1, format!("Non-numeric {name}")));
    }
    date_yymmdd(&data[start..start + 6], false).map_err(|(pos, msg)| (start + pos, msg))?;
    *p += 6;
    Ok(())
}

/// Purchase requirement codes admit 0..=4 and 9.
const COUPON_REQ_CODES: &[u8] = b"012349";

/// One purchase-requirement chain: VLI, requirement, code, family code.
fn coupon_purchase(data: &str, p: &mut usize, who: &str) -> Result<(), LintError> {
    let b = data.as_bytes();
    let vli = coupon_vli(b, p, &format!("{who} Purch. Req. VLI"), 1, 5, false)?;
    coupon_field(b, p, vli, &format!("{who} Purch. Req."), true)?;
    coupon_code_digit(b, p, &format!("{who} Purch. Req. Code"), COUPON_REQ_CODES)?;
    coupon_field(b, p, 3, &format!("{who} Purch. Family Code"), false)?;
    Ok(())
}

/// Company prefix for the 2nd/3rd purchase chains. VLI 9 repeats the
/// primary prefix and carries no digits of its own.
fn coupon_prefix(data: &str, p: &mut usize, who: &str) -> Result<(), LintError> {
    let b = data.as_bytes();
    let vli = coupon_vli(b, p, &format!("{who} Purch. GS1 Co. Prefix VLI"), 0, 6, true)?;
    if vli != 9 {
        coupon_field(b, p, 6 + vli, &format!("{who} Purch. GS1 Co. Prefix"), true)?;
    }
    Ok(())
}

/// North American Coupon Code grammar: the required prefix / offer /
/// save-value / primary-purchase chain, then optional data fields selected
/// by a leading tag digit, each with its own VLI-sized sub-fields.
fn coupon_code(data: &str) -> Result<(), LintError> {
    let b = data.as_bytes();
    let mut p = 0usize;

    let vli = coupon_vli(b, &mut p, "Primary GS1 Co. Prefix VLI", 0, 6, false)?;
    coupon_field(b, &mut p, 6 + vli, "Primary GS1 Co. Prefix", true)?;
    coupon_field(b, &mut p, 6, "Offer Code", false)?;
    let save = coupon_vli(b, &mut p, "Save Value VLI", 1, 5, false)?;
    coupon_field(b, &mut p, save, "Save Value", true)?;
    coupon_purchase(data, &mut p, "Primary")?;

    while p < b.len() {
        let tag = b[p];
        if !tag.is_ascii_digit() {
            return Err((p + 1, format!("Non-numeric Data Field '{}'", tag as char)));
        }
        p += 1;
        match tag {
            b'1' => {
                coupon_code_digit(b, &mut p, "Add. Purch. Rules Code", b"0123")?;
                coupon_purchase(data, &mut p, "2nd")?;
                coupon_prefix(data, &mut p, "2nd")?;
            }
            b'2' => {
                coupon_purchase(data, &mut p, "3rd")?;
                coupon_prefix(data, &mut p, "3rd")?;
            }
            b'3' => coupon_date(data, &mut p, "Expiration Date")?,
            b'4' => coupon_date(data, &mut p, "Start Date")?,
            b'5' => {
                let vli = coupon_vli(b, &mut p, "Serial Number VLI", 0, 9, false)?;
                coupon_field(b, &mut p, 6 + vli, "Serial Number", true)?;
            }
            b'6' => {
                let vli = coupon_vli(b, &mut p, "Retailer ID VLI", 1, 7, false)?;
                coupon_field(b, &mut p, 6 + vli, "Retailer ID", true)?;
            }
            b'9' => {
                coupon_code_digit(b, &mut p, "Save Value Code", b"01256")?;
                coupon_code_digit(b, &mut p, "Save Value Applies To", b"012")?;
                coupon_code_digit(b, &mut p, "Store Coupon Flag", b"0123456789")?;
                coupon_code_digit(b, &mut p, "Don't Multiply Flag", b"01")?;
            }
            _ => return Err((p, format!("Invalid Data Field '{}'", tag as char))),
        }
    }
    Ok(())
}

/// Positive-offer-file coupon: format flag, funder ID, offer code and
/// serial number, with nothing allowed past the serial.
fn coupon_pos_offer(data: &str) -> Result<(), LintError> {
    let b = data.as_bytes();
    let mut p = 0usize;
    match b.first() {
        None => return Err((1, "Coupon Format incomplete".to_string())),
        Some(c) if !c.is_ascii_digit() => {
            return Err((1, "Non-numeric Coupon Format".to_string()));
        }
        Some(&c) if c != b'0' && c != b'1' => {
            return Err((1, "Coupon Format must be 0 or 1".to_string()));
        }
        _ => p = 1,
    }
    let vli = coupon_vli(b, &mut p, "Coupon Funder ID VLI", 0, 6, false)?;
    coupon_field(b, &mut p, 6 + vli, "Coupon Funder ID", true)?;
    coupon_field(b, &mut p, 6, "Offer Code", false)?;
    let vli = coupon_vli(b, &mut p, "Serial Number VLI", 0, 9, false)?;
    coupon_field(b, &mut p, 6 + vli, "Serial Number", true)?;
    if p < b.len() {
        return Err((p + 1, "Reserved trailing characters".to_string()));
    }
    Ok(())
}

/// Run `lint` against a single part's data. `data` is the part slice.
pub fn apply(lint: Lint, data: &str) -> Result<(), LintError> {
    match lint {
        Lint::Csum => csum(data),
        Lint::CsumAlpha => csum_alpha(data),
        Lint::Key => {
            match data.bytes().take(4).position(|b| !b.is_ascii_digit()) {
                Some(pos) => Err((pos + 1, "Non-numeric company prefix".to_string())),
                None => Ok(()),
            }
        }
        Lint::Yymmd0 => date_yymmdd(data, true),
        Lint::Yymmdd => date_yymmdd(data, false),
        Lint::Yyyymmdd => date_yyyymmdd(data),
        Lint::Hh => hour(data),
        Lint::HhMm => {
            hour(data)?;
            minute(data, 2)
        }
        Lint::HhMmSs => {
            hour(data)?;
            minute(data, 2)?;
            second(data, 4)
        }
        Lint::HhOptMmSs => {
            hour(data)?;
            if data.len() >= 4 {
                minute(data, 2)?;
            }
            if data.len() >= 6 {
                second(data, 4)?;
            }
            Ok(())
        }
        Lint::Iso3166 => country3(data, 0),
        Lint::Iso3166999 => {
            if data.len() >= 3 && &data[..3] == "999" {
                Ok(())
            } else {
                country3(data, 0)
            }
        }
        Lint::Iso3166List => {
            if data.len() % 3 != 0 {
                return Err((1, "Not a whole number of country codes".to_string()));
            }
            for at in (0..data.len()).step_by(3) {
                country3(data, at)?;
            }
            Ok(())
        }
        Lint::Iso3166Alpha2 => {
            if data.len() != 2 || ISO3166_ALPHA2.binary_search(&data).is_err() {
                Err((1, format!("Unknown country code '{data}'")))
            } else {
                Ok(())
            }
        }
        Lint::Iso4217 => {
            let code: u16 = data.get(..3).and_then(|s| s.parse().ok()).unwrap_or(1000);
            if ISO4217_NUMERIC.binary_search(&code).is_err() {
                Err((1, format!("Unknown currency code '{}'", data.get(..3).unwrap_or(data))))
            } else {
                Ok(())
            }
        }
        Lint::PcEnc => pcenc(data),
        Lint::LatLong => latlong(data),
        Lint::YesNo => match data.as_bytes() {
            [b'0'] | [b'1'] => Ok(()),
            _ => Err((1, "Neither 0 nor 1 for yes or no".to_string())),
        },
        Lint::ImporterIdx => {
            // The importer index is the final character of the extension
            match data.as_bytes().last() {
                Some(b'-' | b'_' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z') | None => Ok(()),
                Some(&c) => Err((data.len(), format!("Invalid importer index '{}'", c as char))),
            }
        }
        Lint::MediaType => {
            let v: u32 = data.parse().unwrap_or(0);
            if (1..=10).contains(&v) || (80..=99).contains(&v) {
                Ok(())
            } else {
                Err((data.len() + 1, "Invalid AIDC media type".to_string()))
            }
        }
        Lint::Iso5218 => match data.as_bytes() {
            [b'0'] | [b'1'] | [b'2'] | [b'9'] => Ok(()),
            _ => Err((1, format!("Invalid biological sex code '{data}'"))),
        },
        Lint::NonZero => {
            if data.bytes().all(|b| b == b'0') {
                Err((1, "Zero not permitted".to_string()))
            } else {
                Ok(())
            }
        }
        Lint::Zero => {
            if data.starts_with('0') {
                Ok(())
            } else {
                Err((1, "Zero is required".to_string()))
            }
        }
        Lint::NoZeroPrefix => {
            if data.len() > 1 && data.starts_with('0') {
                Err((1, "Zero prefix is not permitted".to_string()))
            } else {
                Ok(())
            }
        }
        Lint::Winding => match data.as_bytes() {
            [b'0'] | [b'1'] | [b'9'] => Ok(()),
            _ => Err((1, format!("Invalid winding direction '{data}'"))),
        },
        Lint::PieceOfTotal => {
            if data.len() != 4 || !data.bytes().all(|b| b.is_ascii_digit()) {
                return Ok(());
            }
            let piece = two(data, 0);
            let total = two(data, 2);
            if piece == 0 {
                Err((1, "Piece number cannot be zero".to_string()))
            } else if total == 0 {
                Err((3, "Total number cannot be zero".to_string()))
            } else if piece > total {
                Err((1, format!("Piece number '{piece:02}' exceeds total '{total:02}'")))
            } else {
                Ok(())
            }
        }
        Lint::Iban => iban(data),
        Lint::CouponCode => coupon_code(data),
        Lint::CouponPosOffer => coupon_pos_offer(data),
        Lint::Hyphen => {
            let bytes = data.as_bytes();
            let bad = bytes.first() == Some(&b'-')
                || bytes.last() == Some(&b'-')
                || data.contains("--");
            if bad { Err((1, "Invalid hyphen placement".to_string())) } else { Ok(()) }
        }
        Lint::PosInSeqSlash => {
            let Some((pos, total)) = data.split_once('/') else {
                return Err((1, "Missing '/' separator".to_string()));
            };
            let p: u32 = pos.parse().unwrap_or(0);
            let t: u32 = total.parse().unwrap_or(0);
            if p == 0 || t == 0 || p > t {
                Err((1, format!("Invalid position in sequence '{data}'")))
            } else {
                Ok(())
            }
        }
        Lint::HasNonDigit => {
            if data.bytes().all(|b| b.is_ascii_digit()) {
                Err((1, "A non-digit character is required".to_string()))
            } else {
                Ok(())
            }
        }
    }
}
