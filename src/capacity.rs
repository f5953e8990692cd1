//! Version selection and capacity queries.

use tracing::debug;

use crate::error::DataTooLong;
use crate::segment::{QrSegment, QrSegmentMode};
use crate::version::{QrCodeEcc, Version};

/// Outcome of version selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Plan {
    pub version: Version,
    /// Error correction level after any boost.
    pub ecl: QrCodeEcc,
    /// Bits taken by mode indicators, count fields and payloads.
    pub data_used_bits: usize,
}

impl Plan {
    /// Data capacity in bits of the planned version and level.
    pub fn capacity_bits(&self) -> usize {
        self.version.num_data_codewords(self.ecl) * 8
    }
}

/// Finds the smallest version in `minversion..=maxversion` that holds `segs`
/// at level `ecl`.
///
/// If `boostecl` is `true`, the level is raised to the highest one that
/// still fits without changing the version.
///
/// # Panics
///
/// Panics if `minversion > maxversion`.
pub fn plan(
    segs: &[QrSegment],
    ecl: QrCodeEcc,
    minversion: Version,
    maxversion: Version,
    boostecl: bool,
) -> Result<Plan, DataTooLong> {
    assert!(minversion <= maxversion, "Invalid value");

    let mut last_err = DataTooLong::SegmentTooLong;
    let mut found: Option<(Version, usize)> = None;
    for version in minversion.up_to(maxversion) {
        let datacapacitybits: usize = version.num_data_codewords(ecl) * 8;
        match QrSegment::get_total_bits(segs, version) {
            Some(n) if n <= datacapacitybits => {
                found = Some((version, n));
                break;
            }
            Some(n) => last_err = DataTooLong::DataOverCapacity(n, datacapacitybits),
            None => last_err = DataTooLong::SegmentTooLong,
        }
    }
    let (version, datausedbits) = found.ok_or(last_err)?;

    let mut chosen = ecl;
    if boostecl {
        for newecl in [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            if newecl > chosen && datausedbits <= version.num_data_codewords(newecl) * 8 {
                chosen = newecl;
            }
        }
        if chosen != ecl {
            debug!(
                ?ecl,
                boosted = ?chosen,
                version = version.value(),
                "boosted error correction level"
            );
        }
    }

    Ok(Plan {
        version,
        ecl: chosen,
        data_used_bits: datausedbits,
    })
}

/// Maximum number of characters (bytes for byte mode) a single segment of
/// `mode` can carry in a symbol of `version` at level `ecl`.
///
/// Accounts for the mode indicator, the count field and the count field's
/// own limit. Returns 0 for [`QrSegmentMode::Eci`].
pub fn max_chars(mode: QrSegmentMode, ecl: QrCodeEcc, version: Version) -> usize {
    let ccbits = mode.num_char_count_bits(version);
    let capacity = version.num_data_codewords(ecl) * 8;
    let Some(avail) = capacity.checked_sub(4 + usize::from(ccbits)) else {
        return 0;
    };
    let chars = match mode {
        QrSegmentMode::Numeric => {
            let rem = avail % 10;
            let tail = if rem >= 7 {
                2
            } else if rem >= 4 {
                1
            } else {
                0
            };
            avail / 10 * 3 + tail
        }
        QrSegmentMode::Alphanumeric => avail / 11 * 2 + usize::from(avail % 11 >= 6),
        QrSegmentMode::Byte => avail / 8,
        QrSegmentMode::Kanji => avail / 13,
        QrSegmentMode::Eci => return 0,
    };
    chars.min((1usize << ccbits) - 1)
}
