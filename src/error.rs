//! Error types returned by the encoder.

use thiserror::Error;

use crate::segment::QrSegmentMode;

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maxversion argument if it was less than `Version::MAX`.
/// - Split the text data into better or optimal segments to reduce the number of bits required.
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataTooLong {
    /// A segment's character count overflows its count field at every version tried.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length exceeds capacity: (used bits, capacity bits) at the largest version tried.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// A character that the targeted segment mode cannot represent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("character {character:?} at position {position} cannot be encoded in {mode:?} mode")]
pub struct InvalidCharacter {
    pub mode: QrSegmentMode,
    pub character: char,
    pub position: usize,
}

/// Returned when a byte view is requested from a bit buffer whose length is
/// not a multiple of 8.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("bit buffer length {0} is not a multiple of 8")]
pub struct UnalignedBits(pub usize);
