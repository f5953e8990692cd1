//! Segments: typed, immutable chunks of encoded input.

use crate::bits::BitBuffer;
use crate::error::InvalidCharacter;
use crate::version::Version;

/// The 45 characters of alphanumeric mode, in code value order.
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Bit width of the character count field at the given version.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[ver.band()]
    }
}

/// A segment of character/binary/control data in a QR code symbol.
///
/// Instances are immutable. The mid-level way to create a segment is to take
/// the payload data and call a static factory function such as
/// [`QrSegment::make_numeric`]. The low-level way is to build the bit buffer
/// yourself and call [`QrSegment::new`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: BitBuffer,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::with_capacity(data.len() * 8);
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        QrSegment::new(QrSegmentMode::Byte, data.len(), bb)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// Groups of three digits take 10 bits; a trailing pair takes 7 and a
    /// trailing single digit 4.
    pub fn make_numeric(text: &str) -> Result<Self, InvalidCharacter> {
        let mut bb = BitBuffer::with_capacity(text.len() * 10 / 3 + 4);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for (position, c) in text.chars().enumerate() {
            if !c.is_ascii_digit() {
                return Err(InvalidCharacter {
                    mode: QrSegmentMode::Numeric,
                    character: c,
                    position,
                });
            }
            accumdata = accumdata * 10 + (c as u32 - '0' as u32);
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Ok(QrSegment::new(QrSegmentMode::Numeric, text.len(), bb))
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    pub fn make_alphanumeric(text: &str) -> Result<Self, InvalidCharacter> {
        let mut bb = BitBuffer::with_capacity(text.len() * 11 / 2 + 6);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        let mut numchars: usize = 0;
        for (position, c) in text.chars().enumerate() {
            let i = ALPHANUMERIC_CHARSET.find(c).ok_or(InvalidCharacter {
                mode: QrSegmentMode::Alphanumeric,
                character: c,
                position,
            })?;
            accumdata = accumdata * 45 + i as u32;
            accumcount += 1;
            numchars += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        Ok(QrSegment::new(QrSegmentMode::Alphanumeric, numchars, bb))
    }

    /// Returns zero or one segment for the given text.
    ///
    /// The whole text goes into numeric mode when it is all digits, into
    /// alphanumeric mode when every character is in [`ALPHANUMERIC_CHARSET`],
    /// and otherwise into byte mode as UTF-8. Empty text yields no segments.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            Vec::new()
        } else if QrSegment::is_numeric(text) {
            QrSegment::make_numeric(text).into_iter().collect()
        } else if QrSegment::is_alphanumeric(text) {
            QrSegment::make_alphanumeric(text).into_iter().collect()
        } else {
            vec![QrSegment::make_bytes(text.as_bytes())]
        }
    }

    /// Creates a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// Returns `None` if the value is 1 000 000 or more.
    pub fn make_eci(assignval: u32) -> Option<Self> {
        let mut bb = BitBuffer::with_capacity(24);
        if assignval < 1 << 7 {
            bb.append_bits(assignval, 8);
        } else if assignval < 1 << 14 {
            bb.append_bits(0b10, 2);
            bb.append_bits(assignval, 14);
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assignval, 21);
        } else {
            return None;
        }
        Some(QrSegment::new(QrSegmentMode::Eci, 0, bb))
    }

    /// Creates a segment from a caller-built payload.
    ///
    /// Nothing checks that `numchars` or the bits agree with `mode`; this is
    /// how kanji (13 bits per character from an external code table) and
    /// other pre-encoded data get in.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: BitBuffer) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn data(&self) -> &BitBuffer {
        &self.data
    }

    /// Payload length in bits, excluding the mode indicator and count field.
    pub fn bit_length(&self) -> usize {
        self.data.len()
    }

    /// Number of bits needed to encode the given segments at the given
    /// version, including mode indicators and count fields.
    ///
    /// Returns `None` if a segment has too many characters for its count
    /// field at this version, or if the sum overflows.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    /// Tests whether the string can be encoded in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the string can be encoded in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}
