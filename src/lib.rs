//! # qrgrid
//!
//! A Rust library for encoding text or binary data into QR Code symbols.
//!
//! `qrgrid` implements the QR Code Model 2 encoder: versions 1 to 40, four error correction
//! levels, and numeric, alphanumeric, byte, kanji and ECI segments. The output is a square grid
//! of dark and light modules, exposed through [`QrCode::size`] and [`QrCode::get_module`].
//! Rendering to SVG or console text is provided in [`render`].
//!
//! ## Features
//!
//! - Automatic selection of the smallest version that holds the data.
//! - Optional boosting of the error correction level when it costs no extra size.
//! - Automatic mask selection by penalty score, or a fixed mask.
//! - Hand-built segment lists for mixed-mode or pre-encoded kanji content.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrgrid = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qrgrid::{render, QrCode, QrCodeEcc};
//!
//! let qr = QrCode::encode_text("Hello, world!", QrCodeEcc::Medium).unwrap();
//! for y in 0..qr.size() {
//!     for x in 0..qr.size() {
//!         let _dark: bool = qr.get_module(x, y);
//!     }
//! }
//! let svg = render::to_svg_string(&qr, 4);
//! assert!(svg.starts_with("<?xml"));
//! ```
//!
//! Mixing segment modes manually:
//!
//! ```rust
//! use qrgrid::{QrCode, QrCodeEcc, QrSegment};
//!
//! let segs = vec![
//!     QrSegment::make_alphanumeric("THE SQUARE ROOT OF 2 IS 1.").unwrap(),
//!     QrSegment::make_numeric("41421356237309504880168872420969807856967187537694").unwrap(),
//! ];
//! let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low).unwrap();
//! println!("{} modules wide", qr.size());
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: the [`QrCode`] result and its `encode_*` entry points.
//! - [`segment`]: data segments and their bit encodings.
//! - [`capacity`]: version selection and capacity queries.
//! - [`codewords`]: data codewords, error correction blocks and interleaving.
//! - [`matrix`]: function patterns and codeword placement.
//! - [`mask`]: mask patterns, penalty scoring and format/version information.
//! - [`render`]: SVG and console text output.

#![forbid(unsafe_code)]

pub mod bits;
pub mod capacity;
pub mod codewords;
pub mod error;
pub mod mask;
pub mod matrix;
pub mod qrcode;
pub mod reed_solomon;
pub mod render;
pub mod segment;
pub mod version;

pub use bits::BitBuffer;
pub use error::{DataTooLong, InvalidCharacter, UnalignedBits};
pub use mask::Mask;
pub use qrcode::QrCode;
pub use segment::{QrSegment, QrSegmentMode};
pub use version::{QrCodeEcc, Version};
