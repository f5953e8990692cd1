//! The encoded symbol and the entry points that build it.

use tracing::debug;

use crate::capacity;
use crate::codewords;
use crate::error::DataTooLong;
use crate::mask::{self, Mask};
use crate::matrix::ModuleMatrix;
use crate::segment::QrSegment;
use crate::version::{QrCodeEcc, Version};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct covers QR Code Model 2: versions 1 to 40, all four error
/// correction levels, and the numeric, alphanumeric, byte, kanji and ECI
/// segment modes. Instances are immutable after creation and own their
/// module grid.
///
/// # Creation
///
/// - High-level: use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: build segments with the [`QrSegment`] factories and call
///   [`QrCode::encode_segments`] or [`QrCode::encode_segments_advanced`].
///
/// # Example
///
/// ```rust
/// use qrgrid::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// println!("Version: {}", qr.version().value());
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    // The version number of this QR Code, between 1 and 40 (inclusive).
    version: Version,

    // The width and height of this QR Code, measured in modules, between
    // 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    // The error correction level used in this QR Code.
    errorcorrectionlevel: QrCodeEcc,

    // The index of the mask pattern used in this QR Code.
    mask: Mask,

    // The modules of this QR Code (false = light, true = dark), row-major.
    // Accessed through get_module().
    modules: Vec<bool>,
}

impl QrCode {
    /// Encodes a Unicode text string at the given error correction level.
    ///
    /// The smallest possible version is chosen automatically, the level may
    /// be raised when that costs no extra size, and the mask is selected by
    /// penalty score.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the text does not fit in any version at
    /// the given level.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrgrid::{QrCode, QrCodeEcc};
    ///
    /// let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
    /// assert_eq!(qr.size(), 21);
    /// assert_eq!(qr.error_correction_level(), QrCodeEcc::Quartile);
    /// ```
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self, DataTooLong> {
        let segs = QrSegment::make_segments(text);
        Self::encode_segments(&segs, ecl)
    }

    /// Encodes arbitrary binary data as a single byte mode segment.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the data does not fit in any version at
    /// the given level.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self, DataTooLong> {
        let segs = [QrSegment::make_bytes(data)];
        Self::encode_segments(&segs, ecl)
    }

    /// Encodes the given segments over the full version range, with
    /// automatic mask selection and level boosting.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the segments do not fit in any version at
    /// the given level.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self, DataTooLong> {
        Self::encode_segments_advanced(segs, ecl, Version::MIN, Version::MAX, None, true)
    }

    /// Encodes the given segments with every parameter explicit.
    ///
    /// The smallest version in `minversion..=maxversion` that holds the data
    /// is chosen. If `boostecl` is `true`, the level may end up higher than
    /// `ecl` when that does not require a larger version. `mask` is `None`
    /// for automatic selection or a fixed pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the segments do not fit in any version of
    /// the range at level `ecl`.
    ///
    /// # Panics
    ///
    /// Panics if `minversion > maxversion`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrgrid::{Mask, QrCode, QrCodeEcc, QrSegment, Version};
    ///
    /// let segs = QrSegment::make_segments("3141592653589793238462643383");
    /// let qr = QrCode::encode_segments_advanced(
    ///     &segs,
    ///     QrCodeEcc::High,
    ///     Version::new(5),
    ///     Version::new(5),
    ///     Some(Mask::new(3)),
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(qr.size(), 37);
    /// assert_eq!(qr.mask(), Mask::new(3));
    /// ```
    pub fn encode_segments_advanced(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, DataTooLong> {
        let plan = capacity::plan(segs, ecl, minversion, maxversion, boostecl)?;
        let datacodewords = codewords::encode_data_codewords(segs, &plan);
        let allcodewords =
            codewords::add_ecc_and_interleave(&datacodewords, plan.version, plan.ecl);

        let mut matrix = ModuleMatrix::new(plan.version);
        matrix.draw_codewords(&allcodewords);
        let mask = mask::choose_and_apply(&mut matrix, plan.ecl, mask);

        debug!(
            version = plan.version.value(),
            ecl = ?plan.ecl,
            mask = mask.value(),
            data_bits = plan.data_used_bits,
            capacity_bits = plan.capacity_bits(),
            "encoded QR code"
        );

        Ok(Self {
            version: plan.version,
            size: plan.version.size() as i32,
            errorcorrectionlevel: plan.ecl,
            mask,
            modules: matrix.into_modules(),
        })
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level, after any boost.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module (pixel) at the given coordinates,
    /// which is `false` for light or `true` for dark.
    ///
    /// The top left corner has the coordinates (x=0, y=0). If the given
    /// coordinates are out of bounds, then `false` (light) is returned.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x)
            && (0..self.size).contains(&y)
            && self.modules[(y * self.size + x) as usize]
    }
}
