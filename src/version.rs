//! Symbol versions, error correction levels and the static per-version tables.

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the version for `ver`, or `None` outside [1, 40].
    pub const fn checked(ver: u8) -> Option<Self> {
        if Version::MIN.value() <= ver && ver <= Version::MAX.value() {
            Some(Self(ver))
        } else {
            None
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of the symbol in modules: `4 * version + 17`.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }

    /// Iterates every version from `self` to `last`, inclusive.
    pub fn up_to(self, last: Version) -> impl Iterator<Item = Version> {
        (self.0..=last.0).map(Version)
    }

    /// Number of data bits that fit in a symbol of this version once all
    /// function patterns are excluded. Includes remainder bits, so the
    /// result need not be a multiple of 8.
    pub fn num_raw_data_modules(self) -> usize {
        let ver = usize::from(self.0);
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    /// Total codewords (data plus error correction) of this version.
    pub fn num_raw_codewords(self) -> usize {
        self.num_raw_data_modules() / 8
    }

    /// Number of 8-bit data codewords at the given error correction level,
    /// with remainder bits discarded.
    pub fn num_data_codewords(self, ecl: QrCodeEcc) -> usize {
        self.num_raw_codewords() - self.ecc_codewords_per_block(ecl) * self.num_blocks(ecl)
    }

    pub fn ecc_codewords_per_block(self, ecl: QrCodeEcc) -> usize {
        table_get(&ECC_CODEWORDS_PER_BLOCK, self, ecl)
    }

    pub fn num_blocks(self, ecl: QrCodeEcc) -> usize {
        table_get(&NUM_ERROR_CORRECTION_BLOCKS, self, ecl)
    }

    /// Ascending centre coordinates of the alignment patterns, used on both
    /// axes. Empty for version 1.
    pub fn alignment_pattern_positions(self) -> Vec<usize> {
        let ver = usize::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let numalign = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
        };
        let size = self.size();
        let mut result: Vec<usize> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    /// Character count field band: 0 for versions 1–9, 1 for 10–26, 2 for 27–40.
    pub(crate) fn band(self) -> usize {
        usize::from((self.0 + 7) / 17)
    }
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// All levels, weakest first.
    pub const ALL: [QrCodeEcc; 4] = [
        QrCodeEcc::Low,
        QrCodeEcc::Medium,
        QrCodeEcc::Quartile,
        QrCodeEcc::High,
    ];

    /// Row index into the per-version tables (0 to 3).
    pub fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// The 2-bit value stored in the format information field.
    pub fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

// Index: [ecl][version]; column 0 is padding.
static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];
