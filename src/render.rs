//! Text renderers built only on [`QrCode::size`] and [`QrCode::get_module`].

use crate::qrcode::QrCode;

/// Returns a string of SVG code for an image depicting the given QR Code,
/// with the given number of border modules.
///
/// The string always uses Unix newlines (\n), regardless of the platform.
///
/// # Panics
///
/// Panics if `border` is negative or the image dimension overflows.
pub fn to_svg_string(qr: &QrCode, border: i32) -> String {
    assert!(border >= 0, "Border must be non-negative");
    assert!(border <= (i32::MAX - qr.size()) / 2, "Border is too large");
    let dimension = qr.size() + border * 2;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                result += &format!(" M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Returns the QR Code as text, two characters per module, surrounded by
/// `border` light modules on every side. Each row ends with a newline.
///
/// # Panics
///
/// Panics if `border` is negative.
pub fn to_console_string(qr: &QrCode, border: i32) -> String {
    assert!(border >= 0, "Border must be non-negative");
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            result += if qr.get_module(x, y) { "██" } else { "  " };
        }
        result.push('\n');
    }
    result
}
