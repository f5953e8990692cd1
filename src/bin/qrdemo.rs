//! qrdemo - encode text into QR Codes and print them to the console.

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use qrgrid::{render, BitBuffer, Mask, QrCode, QrCodeEcc, QrSegment, QrSegmentMode, Version};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrdemo", version, about = "QR Code encoder demo")]
struct Cli {
    /// Text to encode; without it the demo suite runs
    text: Option<String>,

    /// Error correction level
    #[arg(long, value_enum, default_value_t = EccArg::Low)]
    ecc: EccArg,

    /// Smallest version to consider
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=40))]
    min_version: u8,

    /// Largest version to consider
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u8).range(1..=40))]
    max_version: u8,

    /// Force a mask pattern instead of choosing one by penalty score
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
    mask: Option<u8>,

    /// Keep the requested error correction level even when a higher one fits
    #[arg(long)]
    no_boost: bool,

    /// Print SVG instead of console blocks
    #[arg(long)]
    svg: bool,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = 4)]
    border: i32,

    /// Run one demo of the suite
    #[arg(long, value_enum)]
    demo: Option<Demo>,

    /// Log encoder decisions
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EccArg {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<EccArg> for QrCodeEcc {
    fn from(ecc: EccArg) -> Self {
        match ecc {
            EccArg::Low => QrCodeEcc::Low,
            EccArg::Medium => QrCodeEcc::Medium,
            EccArg::Quartile => QrCodeEcc::Quartile,
            EccArg::High => QrCodeEcc::High,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    Basic,
    Variety,
    Segment,
    Mask,
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    ensure!(cli.border >= 0, "border must be non-negative");
    let printer = Printer {
        svg: cli.svg,
        border: cli.border,
    };

    if let Some(text) = &cli.text {
        ensure!(
            cli.min_version <= cli.max_version,
            "min-version {} is above max-version {}",
            cli.min_version,
            cli.max_version
        );
        let segs = QrSegment::make_segments(text);
        let qr = QrCode::encode_segments_advanced(
            &segs,
            cli.ecc.into(),
            Version::new(cli.min_version),
            Version::new(cli.max_version),
            cli.mask.map(Mask::new),
            !cli.no_boost,
        )?;
        info!(
            version = qr.version().value(),
            ecl = ?qr.error_correction_level(),
            mask = qr.mask().value(),
            "encoded input text"
        );
        printer.print(&qr, text);
        return Ok(());
    }

    match cli.demo.unwrap_or(Demo::All) {
        Demo::Basic => do_basic_demo(&printer)?,
        Demo::Variety => do_variety_demo(&printer)?,
        Demo::Segment => do_segment_demo(&printer)?,
        Demo::Mask => do_mask_demo(&printer)?,
        Demo::All => {
            do_basic_demo(&printer)?;
            do_variety_demo(&printer)?;
            do_segment_demo(&printer)?;
            do_mask_demo(&printer)?;
        }
    }
    Ok(())
}

struct Printer {
    svg: bool,
    border: i32,
}

impl Printer {
    fn print(&self, qr: &QrCode, caption: &str) {
        println!("{}", caption);
        if self.svg {
            print!("{}", render::to_svg_string(qr, self.border));
        } else {
            print!("{}", render::to_console_string(qr, self.border));
        }
        println!();
    }
}

/*---- Demo suite ----*/

// Creates a single QR Code from text, then one from raw bytes.
fn do_basic_demo(printer: &Printer) -> Result<()> {
    let text = "Hello, world!";
    let qr = QrCode::encode_text(text, QrCodeEcc::Low)?;
    printer.print(&qr, text);
    println!("{}", render::to_svg_string(&qr, 4));

    // UTF-8 bytes of a URL
    let qr = QrCode::encode_binary(b"https://www.heise.de", QrCodeEcc::Low)?;
    printer.print(&qr, "UTF-8 binary-encoded version of https://www.heise.de");
    Ok(())
}

// Creates a variety of QR Codes that exercise different features of the library.
fn do_variety_demo(printer: &Printer) -> Result<()> {
    let qr = QrCode::encode_text(
        "314159265358979323846264338327950288419716939937510",
        QrCodeEcc::Medium,
    )?;
    printer.print(&qr, "Numeric mode encoding (3.33 bits per digit)");

    let qr = QrCode::encode_text(
        "DOLLAR-AMOUNT:$39.87 PERCENTAGE:100.00% OPERATIONS:+-*/",
        QrCodeEcc::High,
    )?;
    printer.print(&qr, "Alphanumeric mode encoding (5.5 bits per character)");

    let qr = QrCode::encode_text("こんにちwa、世界！ αβγδ", QrCodeEcc::Quartile)?;
    printer.print(&qr, "Unicode text as UTF-8");

    let qr = QrCode::encode_text(
        concat!(
            "Alice was beginning to get very tired of sitting by her sister on the bank, ",
            "and of having nothing to do: once or twice she had peeped into the book her sister was reading, ",
            "but it had no pictures or conversations in it, 'and what is the use of a book,' thought Alice ",
            "'without pictures or conversations?' So she was considering in her own mind (as well as she could, ",
            "for the hot day made her feel very sleepy and stupid), whether the pleasure of making a ",
            "daisy-chain would be worth the trouble of getting up and picking the daisies, when suddenly ",
            "a White Rabbit with pink eyes ran close by her."
        ),
        QrCodeEcc::High,
    )?;
    printer.print(&qr, "Moderately large QR Code using longer text");
    Ok(())
}

// Creates QR Codes with manually specified segments for better compactness.
fn do_segment_demo(printer: &Printer) -> Result<()> {
    let silver0 = "THE SQUARE ROOT OF 2 IS 1.";
    let silver1 = "41421356237309504880168872420969807856967187537694807317667973799";
    let qr = QrCode::encode_text(&[silver0, silver1].concat(), QrCodeEcc::Low)?;
    printer.print(&qr, "Illustration \"silver\"");

    let segs = vec![
        QrSegment::make_alphanumeric(silver0)?,
        QrSegment::make_numeric(silver1)?,
    ];
    let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low)?;
    printer.print(&qr, "Illustration \"silver\" alpha + numeric");

    let golden0 = "Golden ratio φ = 1.";
    let golden1 = "6180339887498948482045868343656381177203091798057628621354486227052604628189024497072072041893911374";
    let golden2 = "......";
    let qr = QrCode::encode_text(&[golden0, golden1, golden2].concat(), QrCodeEcc::Low)?;
    printer.print(&qr, "Illustration \"golden\"");

    let segs = vec![
        QrSegment::make_bytes(golden0.as_bytes()),
        QrSegment::make_numeric(golden1)?,
        QrSegment::make_alphanumeric(golden2)?,
    ];
    let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low)?;
    printer.print(&qr, "Illustration \"golden\" bytes + numeric + alpha");

    let madoka = "「魔法少女まどか☆マギカ」って、　ИАИ　ｄｅｓｕ　κα？";
    let qr = QrCode::encode_text(madoka, QrCodeEcc::Low)?;
    printer.print(
        &qr,
        "Illustration \"Madoka\": kanji, kana, Cyrillic, full-width Latin, Greek characters",
    );

    // Shift JIS derived 13-bit values for the same text
    let kanjichars: [u32; 29] = [
        0x0035, 0x1002, 0x0FC0, 0x0AED, 0x0AD7, 0x015C, 0x0147, 0x0129, 0x0059, 0x01BD,
        0x018D, 0x018A, 0x0036, 0x0141, 0x0144, 0x0001, 0x0000, 0x0249, 0x0240, 0x0249,
        0x0000, 0x0104, 0x0105, 0x0113, 0x0115, 0x0000, 0x0208, 0x01FF, 0x0008,
    ];
    let mut bb = BitBuffer::new();
    for &c in &kanjichars {
        bb.append_bits(c, 13);
    }
    let segs = vec![QrSegment::new(QrSegmentMode::Kanji, kanjichars.len(), bb)];
    let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low)?;
    printer.print(&qr, "Kanji mode encoding (13 bits per character)");
    Ok(())
}

// Creates QR Codes with the same size and contents but different mask patterns.
fn do_mask_demo(printer: &Printer) -> Result<()> {
    let segs = QrSegment::make_segments("https://www.nayuki.io/");
    for (mask, caption) in [(None, "Automatic mask"), (Some(Mask::new(3)), "Force mask 3")] {
        let qr = QrCode::encode_segments_advanced(
            &segs,
            QrCodeEcc::High,
            Version::MIN,
            Version::MAX,
            mask,
            true,
        )?;
        printer.print(&qr, caption);
    }

    let segs = QrSegment::make_segments(
        "維基百科（Wikipedia，聆聽i/ˌwɪkᵻˈpiːdi.ə/）是一個自由內容、公開編輯且多語言的網路百科全書協作計畫",
    );
    for mask in [0, 1, 5, 7] {
        let qr = QrCode::encode_segments_advanced(
            &segs,
            QrCodeEcc::Medium,
            Version::MIN,
            Version::MAX,
            Some(Mask::new(mask)),
            true,
        )?;
        printer.print(&qr, &format!("Force mask {}", mask));
    }
    Ok(())
}
