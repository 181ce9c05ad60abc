//! # GS1 Application Identifier Table
//!
//! The closed AI registry per the GS1 General Specifications (2024
//! edition). Each entry describes an AI or a contiguous range of AIs
//! sharing one format, as a list of data parts: character-set class,
//! minimum/maximum length and the lint rules that apply to the part.
//!
//! Measure AIs (310x..369x) carry their decimal-point digit in the fourth
//! position, so each row of those is a range entry covering x = 0..=5.
//! Entries are sorted by numeric AI value for binary search; bracketed
//! input can never be ambiguous because leading zeros are only legal in
//! the two-digit AIs 00..09, which the parser enforces before lookup.

use super::lint::Lint;

/// Character-set class of one data part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cset {
    /// Digits only
    Numeric,
    /// GS1 "character set 82" (invariant printable ASCII subset)
    Cset82,
    /// File-safe/URI-safe set: digits, upper case, `# - /`
    Cset39,
    /// URL-safe base 64 plus padding `=`
    Cset64,
}

impl Cset {
    /// Membership test for a single byte.
    pub fn contains(self, b: u8) -> bool {
        match self {
            Cset::Numeric => b.is_ascii_digit(),
            Cset::Cset82 => matches!(b,
                b'!' | b'"' | b'%' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b'-'
                | b'.' | b'/' | b'0'..=b'9' | b':' | b';' | b'<' | b'=' | b'>' | b'?'
                | b'A'..=b'Z' | b'_' | b'a'..=b'z'),
            Cset::Cset39 => matches!(b, b'#' | b'-' | b'/' | b'0'..=b'9' | b'A'..=b'Z'),
            Cset::Cset64 => matches!(b, b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'-' | b'_' | b'='),
        }
    }

    /// Name used in lint messages, e.g. "CSET 82".
    pub fn name(self) -> &'static str {
        match self {
            Cset::Numeric => "numeric",
            Cset::Cset82 => "CSET 82",
            Cset::Cset39 => "CSET 39",
            Cset::Cset64 => "CSET 64",
        }
    }
}

/// One data part of an AI.
#[derive(Debug, Clone, Copy)]
pub struct Part {
    pub cset: Cset,
    pub min: u8,
    pub max: u8,
    pub lints: &'static [Lint],
}

/// An AI (or range of AIs) and its format.
#[derive(Debug, Clone, Copy)]
pub struct AiEntry {
    pub first: u16,
    pub last: u16,
    pub parts: &'static [Part],
}

impl AiEntry {
    pub fn min_len(&self) -> usize {
        self.parts.iter().map(|p| p.min as usize).sum()
    }

    pub fn max_len(&self) -> usize {
        self.parts.iter().map(|p| p.max as usize).sum()
    }
}

const fn part(cset: Cset, min: u8, max: u8, lints: &'static [Lint]) -> Part {
    Part { cset, min, max, lints }
}

const fn n(len: u8, lints: &'static [Lint]) -> Part {
    part(Cset::Numeric, len, len, lints)
}

const fn n_var(min: u8, max: u8, lints: &'static [Lint]) -> Part {
    part(Cset::Numeric, min, max, lints)
}

const fn x_var(min: u8, max: u8, lints: &'static [Lint]) -> Part {
    part(Cset::Cset82, min, max, lints)
}

const fn ai(first: u16, last: u16, parts: &'static [Part]) -> AiEntry {
    AiEntry { first, last, parts }
}

const NONE: &[Lint] = &[];
const CSUM: &[Lint] = &[Lint::Csum];
const CSUM_KEY: &[Lint] = &[Lint::Csum, Lint::Key];
const CSUMALPHA: &[Lint] = &[Lint::CsumAlpha, Lint::Key];
const DATE0: &[Lint] = &[Lint::Yymmd0];
const DATE: &[Lint] = &[Lint::Yymmdd];
const DATE8: &[Lint] = &[Lint::Yyyymmdd];
const HHMM: &[Lint] = &[Lint::HhMm];
const HHOPT: &[Lint] = &[Lint::HhOptMmSs];
const CC: &[Lint] = &[Lint::Iso3166];
const CCLIST: &[Lint] = &[Lint::Iso3166List];
const CC999: &[Lint] = &[Lint::Iso3166999];
const CCA2: &[Lint] = &[Lint::Iso3166Alpha2];
const CUR: &[Lint] = &[Lint::Iso4217];
const PCENC: &[Lint] = &[Lint::PcEnc];
const LATLONG: &[Lint] = &[Lint::LatLong];
const YESNO: &[Lint] = &[Lint::YesNo];
const IMPIDX: &[Lint] = &[Lint::ImporterIdx];
const MEDIA: &[Lint] = &[Lint::MediaType];
const SEX: &[Lint] = &[Lint::Iso5218];
const NONZERO: &[Lint] = &[Lint::NonZero];
const ZERO: &[Lint] = &[Lint::Zero];
const NOZEROPFX: &[Lint] = &[Lint::NoZeroPrefix];
const WINDING: &[Lint] = &[Lint::Winding];
const PIECE: &[Lint] = &[Lint::PieceOfTotal];
const IBAN: &[Lint] = &[Lint::Iban];
const COUPON: &[Lint] = &[Lint::CouponCode];
const COUPONPOS: &[Lint] = &[Lint::CouponPosOffer];
const SEQSLASH: &[Lint] = &[Lint::PosInSeqSlash];
const KEY: &[Lint] = &[Lint::Key];

/// The AI registry, ordered by numeric AI value for binary search.
pub static AI_TABLE: &[AiEntry] = &[
    ai(0, 0, &[n(18, CSUM)]),                                  // SSCC
    ai(1, 3, &[n(14, CSUM)]),                                  // GTIN / CONTENT / MTO GTIN
    ai(10, 10, &[x_var(1, 20, NONE)]),                         // BATCH/LOT
    ai(11, 13, &[n(6, DATE0)]),                                // PROD DATE / DUE DATE / PACK DATE
    ai(15, 17, &[n(6, DATE0)]),                                // BEST BY / SELL BY / USE BY
    ai(20, 20, &[n(2, NONE)]),                                 // VARIANT
    ai(21, 21, &[x_var(1, 20, NONE)]),                         // SERIAL
    ai(22, 22, &[x_var(1, 20, NONE)]),                         // CPV
    ai(30, 30, &[n_var(1, 8, NONE)]),                          // VAR. COUNT
    ai(37, 37, &[n_var(1, 8, NONE)]),                          // COUNT
    ai(90, 90, &[x_var(1, 30, NONE)]),                         // Mutually agreed
    ai(91, 99, &[x_var(1, 90, NONE)]),                         // Internal
    ai(235, 235, &[x_var(1, 28, NONE)]),                       // TPX
    ai(240, 241, &[x_var(1, 30, NONE)]),                       // ADDITIONAL ID / CUST. PART NO.
    ai(242, 242, &[n_var(1, 6, NONE)]),                        // MTO VARIANT
    ai(243, 243, &[x_var(1, 20, NONE)]),                       // PCN
    ai(250, 251, &[x_var(1, 30, NONE)]),                       // SECONDARY SERIAL / REF. TO SOURCE
    ai(253, 253, &[n(13, CSUM_KEY), x_var(0, 17, NONE)]),      // GDTI
    ai(254, 254, &[x_var(1, 20, NONE)]),                       // GLN EXTENSION
    ai(255, 255, &[n(13, CSUM_KEY), n_var(0, 12, NONE)]),      // GCN
    ai(400, 400, &[x_var(1, 30, NONE)]),                       // ORDER NUMBER
    ai(401, 401, &[x_var(1, 30, KEY)]),                        // GINC
    ai(402, 402, &[n(17, CSUM_KEY)]),                          // GSIN
    ai(403, 403, &[x_var(1, 30, NONE)]),                       // ROUTE
    ai(410, 417, &[n(13, CSUM_KEY)]),                          // GLN family
    ai(420, 420, &[x_var(1, 20, NONE)]),                       // SHIP TO POST
    ai(421, 421, &[n(3, CC), x_var(1, 9, NONE)]),              // SHIP TO POST + country
    ai(422, 422, &[n(3, CC)]),                                 // ORIGIN
    ai(423, 423, &[part(Cset::Numeric, 3, 15, CCLIST)]),       // COUNTRY - INITIAL PROCESS
    ai(424, 424, &[n(3, CC)]),                                 // COUNTRY - PROCESS
    ai(425, 425, &[part(Cset::Numeric, 3, 15, CCLIST)]),       // COUNTRY - DISASSEMBLY
    ai(426, 426, &[n(3, CC)]),                                 // COUNTRY - FULL PROCESS
    ai(427, 427, &[x_var(1, 3, NONE)]),                        // ORIGIN SUBDIVISION
    ai(710, 716, &[x_var(1, 20, NONE)]),                       // NHRN family
    // Trade measures (net weight, length, width, height, area, volume)
    ai(3100, 3105, &[n(6, NONE)]),
    ai(3110, 3115, &[n(6, NONE)]),
    ai(3120, 3125, &[n(6, NONE)]),
    ai(3130, 3135, &[n(6, NONE)]),
    ai(3140, 3145, &[n(6, NONE)]),
    ai(3150, 3155, &[n(6, NONE)]),
    ai(3160, 3165, &[n(6, NONE)]),
    // Logistic measures
    ai(3200, 3205, &[n(6, NONE)]),
    ai(3210, 3215, &[n(6, NONE)]),
    ai(3220, 3225, &[n(6, NONE)]),
    ai(3230, 3235, &[n(6, NONE)]),
    ai(3240, 3245, &[n(6, NONE)]),
    ai(3250, 3255, &[n(6, NONE)]),
    ai(3260, 3265, &[n(6, NONE)]),
    ai(3270, 3275, &[n(6, NONE)]),
    ai(3280, 3285, &[n(6, NONE)]),
    ai(3290, 3295, &[n(6, NONE)]),
    ai(3300, 3305, &[n(6, NONE)]),
    ai(3310, 3315, &[n(6, NONE)]),
    ai(3320, 3325, &[n(6, NONE)]),
    ai(3330, 3335, &[n(6, NONE)]),
    ai(3340, 3345, &[n(6, NONE)]),
    ai(3350, 3355, &[n(6, NONE)]),
    ai(3360, 3365, &[n(6, NONE)]),
    ai(3370, 3375, &[n(6, NONE)]),
    ai(3400, 3405, &[n(6, NONE)]),
    ai(3410, 3415, &[n(6, NONE)]),
    ai(3420, 3425, &[n(6, NONE)]),
    ai(3430, 3435, &[n(6, NONE)]),
    ai(3440, 3445, &[n(6, NONE)]),
    ai(3450, 3455, &[n(6, NONE)]),
    ai(3460, 3465, &[n(6, NONE)]),
    ai(3470, 3475, &[n(6, NONE)]),
    ai(3480, 3485, &[n(6, NONE)]),
    ai(3490, 3495, &[n(6, NONE)]),
    ai(3500, 3505, &[n(6, NONE)]),
    ai(3510, 3515, &[n(6, NONE)]),
    ai(3520, 3525, &[n(6, NONE)]),
    ai(3530, 3535, &[n(6, NONE)]),
    ai(3540, 3545, &[n(6, NONE)]),
    ai(3550, 3555, &[n(6, NONE)]),
    ai(3560, 3565, &[n(6, NONE)]),
    ai(3570, 3575, &[n(6, NONE)]),
    ai(3600, 3605, &[n(6, NONE)]),
    ai(3610, 3615, &[n(6, NONE)]),
    ai(3620, 3625, &[n(6, NONE)]),
    ai(3630, 3635, &[n(6, NONE)]),
    ai(3640, 3645, &[n(6, NONE)]),
    ai(3650, 3655, &[n(6, NONE)]),
    ai(3660, 3665, &[n(6, NONE)]),
    ai(3670, 3675, &[n(6, NONE)]),
    ai(3680, 3685, &[n(6, NONE)]),
    ai(3690, 3695, &[n(6, NONE)]),
    ai(3900, 3909, &[n_var(1, 15, NONE)]),                     // AMOUNT
    ai(3910, 3919, &[n(3, CUR), n_var(1, 15, NONE)]),          // AMOUNT + currency
    ai(3920, 3929, &[n_var(1, 15, NONE)]),                     // PRICE
    ai(3930, 3939, &[n(3, CUR), n_var(1, 15, NONE)]),          // PRICE + currency
    ai(3940, 3943, &[n(4, NONE)]),                             // PRCNT OFF
    ai(3950, 3955, &[n(6, NONE)]),                             // PRICE/UoM
    ai(4300, 4301, &[x_var(1, 35, PCENC)]),                    // SHIP TO COMP / NAME
    ai(4302, 4306, &[x_var(1, 70, PCENC)]),                    // SHIP TO address lines
    ai(4307, 4307, &[part(Cset::Cset82, 2, 2, CCA2)]),         // SHIP TO COUNTRY
    ai(4308, 4308, &[x_var(1, 30, NONE)]),                     // SHIP TO PHONE
    ai(4309, 4309, &[n(20, LATLONG)]),                         // SHIP TO GEO
    ai(4310, 4311, &[x_var(1, 35, PCENC)]),                    // RTN TO COMP / NAME
    ai(4312, 4316, &[x_var(1, 70, PCENC)]),                    // RTN TO address lines
    ai(4317, 4317, &[part(Cset::Cset82, 2, 2, CCA2)]),         // RTN TO COUNTRY
    ai(4318, 4318, &[x_var(1, 20, NONE)]),                     // RTN TO POST
    ai(4319, 4319, &[x_var(1, 30, NONE)]),                     // RTN TO PHONE
    ai(4320, 4320, &[x_var(1, 35, NONE)]),                     // SRV DESCRIPTION
    ai(4321, 4323, &[n(1, YESNO)]),                            // DANGEROUS GOODS / AUTH LEAVE / SIG REQD
    ai(4324, 4325, &[n(6, DATE0), n(4, HHMM)]),                // NBEF/NAFT DEL DT
    ai(4326, 4326, &[n(6, DATE)]),                             // REL DATE
    ai(4330, 4333, &[n(6, NONE), part(Cset::Cset39, 0, 1, NONE)]), // MAX/MIN TEMPERATURE F/C
    ai(7001, 7001, &[n(13, NONE)]),                            // NSN
    ai(7002, 7002, &[x_var(1, 30, NONE)]),                     // MEAT CUT
    ai(7003, 7003, &[n(6, DATE0), n(4, HHMM)]),                // EXPIRY TIME
    ai(7004, 7004, &[n_var(1, 4, NONE)]),                      // ACTIVE POTENCY
    ai(7005, 7005, &[x_var(1, 12, NONE)]),                     // CATCH AREA
    ai(7006, 7006, &[n(6, DATE)]),                             // FIRST FREEZE DATE
    ai(7007, 7007, &[part(Cset::Numeric, 6, 12, DATE)]),       // HARVEST DATE (range)
    ai(7008, 7008, &[x_var(1, 3, NONE)]),                      // AQUATIC SPECIES
    ai(7009, 7009, &[x_var(1, 10, NONE)]),                     // FISHING GEAR TYPE
    ai(7010, 7010, &[x_var(1, 2, NONE)]),                      // PROD METHOD
    ai(7011, 7011, &[n(6, DATE0), part(Cset::Numeric, 0, 4, HHMM)]), // TEST BY DATE
    ai(7020, 7022, &[x_var(1, 20, NONE)]),                     // REFURB LOT / FUNC STAT / REV STAT
    ai(7023, 7023, &[x_var(1, 30, KEY)]),                      // GIAI - ASSEMBLY
    ai(7030, 7039, &[n(3, CC999), x_var(1, 27, NONE)]),        // PROCESSOR # s
    ai(7040, 7040, &[n(1, NONZERO), part(Cset::Cset82, 3, 3, IMPIDX)]), // UIC+EXT
    ai(7230, 7239, &[part(Cset::Cset82, 2, 2, NONE), x_var(1, 28, NONE)]), // CERT # s
    ai(7240, 7240, &[x_var(1, 20, NONE)]),                     // PROTOCOL
    ai(7241, 7241, &[n(2, MEDIA)]),                            // AIDC MEDIA TYPE
    ai(7242, 7242, &[x_var(1, 25, NONE)]),                     // VCN
    ai(7250, 7250, &[n(8, DATE8)]),                            // DOB
    ai(7251, 7251, &[n(8, DATE8), n(4, HHMM)]),                // DOB TIME
    ai(7252, 7252, &[n(1, SEX)]),                              // BIO SEX
    ai(7253, 7254, &[x_var(1, 40, PCENC)]),                    // FAMILY/GIVEN NAME
    ai(7255, 7255, &[x_var(1, 10, NONE)]),                     // SUFFIX
    ai(7256, 7256, &[x_var(1, 90, PCENC)]),                    // FULL NAME
    ai(7257, 7257, &[x_var(1, 70, PCENC)]),                    // PERSON ADDR
    ai(7258, 7258, &[part(Cset::Cset82, 3, 3, SEQSLASH)]),     // BIRTH SEQUENCE
    ai(7259, 7259, &[x_var(1, 40, PCENC)]),                    // BABY
    ai(8001, 8001, &[n(4, NONZERO), n(5, NONZERO), n(3, NONZERO), n(1, WINDING), n(1, NONE)]), // DIMENSIONS
    ai(8002, 8002, &[x_var(1, 20, NONE)]),                     // CMT No.
    ai(8003, 8003, &[n(1, ZERO), n(13, CSUM_KEY), x_var(0, 16, NONE)]), // GRAI
    ai(8004, 8004, &[x_var(1, 30, KEY)]),                      // GIAI
    ai(8005, 8005, &[n(6, NONE)]),                             // PRICE PER UNIT
    ai(8006, 8006, &[n(14, CSUM), part(Cset::Numeric, 4, 4, PIECE)]), // ITIP
    ai(8007, 8007, &[part(Cset::Cset82, 5, 34, IBAN)]),        // IBAN
    ai(8008, 8008, &[n(6, DATE0), part(Cset::Numeric, 2, 6, HHOPT)]), // PROD TIME
    ai(8009, 8009, &[x_var(1, 50, NONE)]),                     // OPTSEN
    ai(8010, 8010, &[part(Cset::Cset39, 1, 30, KEY)]),         // CPID
    ai(8011, 8011, &[n_var(1, 12, NOZEROPFX)]),                // CPID SERIAL
    ai(8012, 8012, &[x_var(1, 20, NONE)]),                     // VERSION
    ai(8013, 8013, &[x_var(1, 25, CSUMALPHA)]),                // GMN
    ai(8014, 8014, &[x_var(1, 25, CSUMALPHA)]),                // MUDI
    ai(8017, 8018, &[n(18, CSUM_KEY)]),                        // GSRN PROVIDER/RECIPIENT
    ai(8019, 8019, &[n_var(1, 10, NONE)]),                     // SRIN
    ai(8020, 8020, &[x_var(1, 25, NONE)]),                     // REF No.
    ai(8026, 8026, &[n(14, CSUM), part(Cset::Numeric, 4, 4, PIECE)]), // ITIP CONTENT
    ai(8030, 8030, &[part(Cset::Cset64, 1, 90, NONE)]),        // DIGSIG
    ai(8110, 8110, &[x_var(1, 70, COUPON)]),                   // Coupon code (NACC)
    ai(8111, 8111, &[n(4, NONE)]),                             // POINTS
    ai(8112, 8112, &[x_var(1, 70, COUPONPOS)]),                // Positive offer file coupon
    ai(8200, 8200, &[x_var(1, 70, NONE)]),                     // PRODUCT URL
];

/// Find the table entry for a numeric AI.
pub fn lookup(ai_num: u16) -> Option<&'static AiEntry> {
    let idx = AI_TABLE.partition_point(|e| e.last < ai_num);
    let entry = AI_TABLE.get(idx)?;
    if ai_num >= entry.first && ai_num <= entry.last {
        Some(entry)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted_for_binary_search() {
        for pair in AI_TABLE.windows(2) {
            assert!(pair[0].last < pair[1].first, "overlap at {}", pair[1].first);
            assert!(pair[0].first <= pair[0].last);
        }
    }

    #[test]
    fn test_lookup_known_ais() {
        assert_eq!(lookup(0).unwrap().min_len(), 18);
        assert_eq!(lookup(1).unwrap().max_len(), 14);
        let batch = lookup(10).unwrap();
        assert_eq!((batch.min_len(), batch.max_len()), (1, 20));
        assert!(lookup(3105).is_some());
        assert!(lookup(3106).is_none()); // decimal digit above 5
        assert!(lookup(8006).is_some());
        assert!(lookup(91).is_some());
        assert!(lookup(99).is_some());
    }

    #[test]
    fn test_lookup_unknown_ais() {
        for bad in [4u16, 9, 14, 18, 19, 23, 24, 25, 26, 100, 200, 2100, 9999] {
            assert!(lookup(bad).is_none(), "AI {bad} should be unknown");
        }
    }

    #[test]
    fn test_gdti_shape() {
        let gdti = lookup(253).unwrap();
        assert_eq!(gdti.min_len(), 13);
        assert_eq!(gdti.max_len(), 30);
        assert_eq!(gdti.parts[0].lints[0], Lint::Csum);
    }

    #[test]
    fn test_dimension_ai_parts() {
        let dims = lookup(8001).unwrap();
        assert_eq!(dims.min_len(), 14);
        assert_eq!(dims.parts[3].lints[0], Lint::Winding);
    }
}
